use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod render;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/posts", get(handlers::list_posts))
        .route("/api/posts/check", get(handlers::check_post))
        .route("/api/posts/:slug", get(handlers::get_post))
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/:main", get(handlers::list_by_category))
        .route("/api/crawl", post(handlers::crawl))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use super::AppState;
    pub use vn_core::{ArticleRecord, Error, Result};
}
