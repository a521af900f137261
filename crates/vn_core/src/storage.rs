use async_trait::async_trait;
use crate::types::{ArticleRecord, Page};
use crate::Result;

/// Persistence seam for article records.
///
/// Implementations must enforce slug uniqueness in `insert` and surface a
/// violation as [`crate::Error::DuplicateSlug`]. The title existence check
/// and the insert are not atomic as a pair; the slug constraint is the
/// stronger guard against concurrent double-ingestion.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Store a new article. Fails with `DuplicateSlug` if the slug exists.
    async fn insert(&self, record: &ArticleRecord) -> Result<()>;

    /// Exact-title existence check used by the ingestion duplicate guard.
    async fn exists_by_title(&self, title: &str) -> Result<bool>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>>;

    /// Newest-first listing.
    async fn list(
        &self,
        page: usize,
        limit: usize,
        published_only: bool,
    ) -> Result<Page<ArticleRecord>>;

    /// Newest-first listing filtered by normalized category slug. With
    /// `sub_slug` present both levels must match.
    async fn list_by_category(
        &self,
        main_slug: &str,
        sub_slug: Option<&str>,
        page: usize,
        limit: usize,
    ) -> Result<Page<ArticleRecord>>;

    /// Case-insensitive substring search over title, content, tags,
    /// author and both category names.
    async fn search(&self, query: &str, page: usize, limit: usize)
        -> Result<Page<ArticleRecord>>;

    /// Narrow update: mark a record as cross-posted to Facebook.
    async fn mark_facebook_posted(&self, slug: &str, post_id: &str) -> Result<()>;
}
