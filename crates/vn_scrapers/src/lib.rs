pub mod assets;
pub mod cloudinary;
pub mod extract;
pub mod feeds;
pub mod fetch;
pub mod pipeline;
pub mod profiles;

pub use pipeline::IngestPipeline;
pub use profiles::SourceProfile;

pub mod prelude {
    pub use super::assets::{AssetHost, AssetResolver};
    pub use super::fetch::Fetcher;
    pub use super::pipeline::IngestPipeline;
    pub use super::profiles::{classify, known_profiles, SourceProfile};
    pub use vn_core::{Error, IngestOutcome, Result};
}
