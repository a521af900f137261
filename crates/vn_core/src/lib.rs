pub mod error;
pub mod slug;
pub mod storage;
pub mod taxonomy;
pub mod types;

pub use error::Error;
pub use storage::PostStore;
pub use types::{
    ArticleRecord, AssetBundle, ExtractedFields, IngestOutcome, Page, RawDocument, RewriteResult,
    UploadedAsset,
};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use super::storage::PostStore;
    pub use super::types::{ArticleRecord, IngestOutcome, Page};
    pub use super::{Error, Result};
}
