//! Image discovery, normalization and upload.
//!
//! Discovery walks the document once for a thumbnail candidate and once
//! for inline content images, resolves every URL to absolute form against
//! the document's own URL, drops lazy-load placeholders, and deduplicates.
//! Uploads fan out concurrently under a semaphore; each failure is caught
//! into an absent result for that asset only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use url::Url;

use crate::extract::{meta_name, meta_property};
use vn_core::{AssetBundle, RawDocument, Result, UploadedAsset};

/// Content store for article images. Implementations take a source URL
/// and return the hosted one.
#[async_trait]
pub trait AssetHost: Send + Sync {
    async fn upload(&self, source_url: &str) -> Result<String>;
}

/// Keeps original URLs untouched. Used when no CDN is configured, so
/// records then reference publisher-hosted images directly.
pub struct PassthroughHost;

#[async_trait]
impl AssetHost for PassthroughHost {
    async fn upload(&self, source_url: &str) -> Result<String> {
        Ok(source_url.to_string())
    }
}

const HERO_IMAGE_SELECTORS: &str = ".article-avatar img, .dt-news__avatar img, .main-img img";
const CONTENT_IMAGE_SELECTORS: &str =
    ".fck_detail img, .article-content img, .dt-news__content img, .content-detail img, .article-body img";

/// Lazy-loading markup keeps the real source off `src`; first present
/// attribute wins per element.
const IMAGE_SRC_ATTRS: [&str; 4] = ["data-src", "src", "data-original", "data-lazy-src"];

const UPLOAD_CONCURRENCY: usize = 10;

fn is_placeholder(url: &str) -> bool {
    url.contains("spacer.gif") || url.contains("blank.gif")
}

/// Absolute URLs pass through; root-relative paths resolve against the
/// article's own URL. Anything unresolvable is dropped.
fn fix_image_url(src: &str, base: Option<&Url>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    if src.starts_with('/') {
        return base.and_then(|b| b.join(src).ok()).map(|u| u.to_string());
    }
    Some(src.to_string())
}

/// Thumbnail candidate plus the ordered, deduplicated inline image URLs.
pub fn discover_candidates(document: &RawDocument) -> (Option<String>, Vec<String>) {
    let html = Html::parse_document(&document.html);
    let base = Url::parse(&document.url).ok();

    let raw_thumbnail = meta_property("og:image")(&html)
        .or_else(|| meta_name("twitter:image")(&html))
        .or_else(|| {
            Selector::parse(HERO_IMAGE_SELECTORS).ok().and_then(|sel| {
                html.select(&sel)
                    .next()
                    .and_then(|el| el.value().attr("src"))
                    .map(str::to_string)
            })
        });
    let thumbnail = raw_thumbnail
        .as_deref()
        .and_then(|src| fix_image_url(src, base.as_ref()))
        .filter(|url| !is_placeholder(url));

    let mut inline = Vec::new();
    let mut seen = HashSet::new();
    if let Ok(selector) = Selector::parse(CONTENT_IMAGE_SELECTORS) {
        for element in html.select(&selector) {
            let Some(src) = IMAGE_SRC_ATTRS
                .iter()
                .find_map(|attr| element.value().attr(attr))
            else {
                continue;
            };
            let Some(fixed) = fix_image_url(src, base.as_ref()) else {
                continue;
            };
            if is_placeholder(&fixed) {
                continue;
            }
            if seen.insert(fixed.clone()) {
                inline.push(fixed);
            }
        }
    }

    (thumbnail, inline)
}

pub struct AssetResolver {
    host: Arc<dyn AssetHost>,
    semaphore: Arc<Semaphore>,
}

impl AssetResolver {
    pub fn new(host: Arc<dyn AssetHost>) -> Self {
        Self {
            host,
            semaphore: Arc::new(Semaphore::new(UPLOAD_CONCURRENCY)),
        }
    }

    /// Upload every distinct candidate at most once. A URL that appears
    /// both as thumbnail and inline is uploaded a single time and reused.
    pub async fn resolve(&self, document: &RawDocument) -> AssetBundle {
        let (thumbnail_url, inline_urls) = discover_candidates(document);

        let mut unique: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for candidate in thumbnail_url.iter().chain(inline_urls.iter()) {
            if seen.insert(candidate.clone()) {
                unique.push(candidate.clone());
            }
        }

        let uploads = unique.into_iter().map(|source| {
            let host = self.host.clone();
            let semaphore = self.semaphore.clone();
            async move {
                let _permit = semaphore.acquire().await.ok();
                match host.upload(&source).await {
                    Ok(hosted) => (source, Some(hosted)),
                    Err(e) => {
                        tracing::warn!("image upload failed for {}: {}", source, e);
                        (source, None)
                    }
                }
            }
        });
        let results: HashMap<String, Option<String>> = join_all(uploads).await.into_iter().collect();

        AssetBundle {
            thumbnail: thumbnail_url.map(|url| UploadedAsset {
                hosted_url: results.get(&url).cloned().flatten(),
                original_url: url,
            }),
            images: inline_urls
                .into_iter()
                .map(|url| UploadedAsset {
                    hosted_url: results.get(&url).cloned().flatten(),
                    original_url: url,
                })
                .collect(),
        }
    }
}
