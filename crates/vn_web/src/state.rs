use std::sync::Arc;

use vn_core::PostStore;
use vn_scrapers::IngestPipeline;

pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub pipeline: Arc<IngestPipeline>,
}
