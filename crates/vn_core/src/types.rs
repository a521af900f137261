use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fetched page. Lives only for the duration of one ingestion run.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub html: String,
}

/// Per-field extraction output. Every field except `title` may be empty.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub title: String,
    pub description: String,
    pub author: String,
    /// Raw publish-date string as found in the page; not parsed here.
    pub published_at_raw: String,
    pub tags: Vec<String>,
    pub main_category: String,
    pub sub_category: String,
    pub paragraphs: Vec<String>,
    pub html_content: String,
}

impl ExtractedFields {
    /// Canonical plain-text body: paragraphs joined with a blank line.
    pub fn content(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

/// One image after the upload attempt. `hosted_url` is `None` when the
/// upload failed; that never invalidates the surrounding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub original_url: String,
    pub hosted_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    pub thumbnail: Option<UploadedAsset>,
    pub images: Vec<UploadedAsset>,
}

impl AssetBundle {
    pub fn thumbnail_url(&self) -> Option<String> {
        self.thumbnail.as_ref().and_then(|a| a.hosted_url.clone())
    }

    /// Hosted URLs of the inline images that uploaded successfully,
    /// in discovery order.
    pub fn hosted_images(&self) -> Vec<String> {
        self.images
            .iter()
            .filter_map(|a| a.hosted_url.clone())
            .collect()
    }
}

/// Rewrite output. Both fields empty is a valid, non-fatal outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub rewrite_title: String,
    pub rewritten: String,
}

/// The persisted article document. Created once per successful ingestion
/// and mutated only through narrow updates such as
/// [`crate::storage::PostStore::mark_facebook_posted`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub rewrite_title: String,
    pub slug: String,
    pub content: String,
    pub rewritten: String,
    pub html_content: String,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
    pub description: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub main_category: String,
    pub sub_category: String,
    /// Normalized category slugs, computed once at write time by the same
    /// slug function used for the taxonomy. Category listing filters on
    /// these instead of re-slugifying free text per row.
    pub main_category_slug: String,
    pub sub_category_slug: String,
    pub tags: Vec<String>,
    pub read_time: u32,
    pub original_url: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub facebook_posted: bool,
    pub facebook_post_id: String,
    pub facebook_post_time: Option<DateTime<Utc>>,
}

/// Outcome of one ingestion run. A duplicate title is a rejection, not an
/// error: callers are expected to skip it silently.
#[derive(Debug)]
pub enum IngestOutcome {
    Persisted(Box<ArticleRecord>),
    Duplicate { title: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: usize, page: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    pub fn empty(page: usize, limit: usize) -> Self {
        Self::new(Vec::new(), 0, page, limit)
    }
}
