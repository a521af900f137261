//! The ingestion orchestrator.
//!
//! One run moves strictly forward: classify → fetch → extract → resolve
//! assets → normalize → rewrite → persistence guard → insert. Failures
//! before extraction are fatal to the run; asset and rewrite failures are
//! absorbed by their stages and never fail it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};

use crate::assets::AssetResolver;
use crate::extract;
use crate::fetch::Fetcher;
use crate::profiles::{classify, SourceProfile};
use vn_core::{slug, ArticleRecord, Error, IngestOutcome, PostStore, Result};
use vn_rewrite::Rewriter;

pub struct IngestPipeline {
    fetcher: Fetcher,
    profiles: Vec<SourceProfile>,
    resolver: AssetResolver,
    rewriter: Rewriter,
    store: Arc<dyn PostStore>,
}

impl IngestPipeline {
    pub fn new(
        fetcher: Fetcher,
        profiles: Vec<SourceProfile>,
        resolver: AssetResolver,
        rewriter: Rewriter,
        store: Arc<dyn PostStore>,
    ) -> Self {
        Self {
            fetcher,
            profiles,
            resolver,
            rewriter,
            store,
        }
    }

    pub fn profiles(&self) -> &[SourceProfile] {
        &self.profiles
    }

    /// Run the full pipeline for one article URL.
    pub async fn ingest(&self, url: &str) -> Result<IngestOutcome> {
        let profile = classify(&self.profiles, url);
        tracing::info!("ingesting {} ({})", url, profile.name);

        let document = self.fetcher.fetch(url).await?;
        let fields = extract::extract(&document, profile)?;
        let assets = self.resolver.resolve(&document).await;

        let content = fields.content();
        let article_slug = slug::article_slug(url, &fields.title);
        let read_time = slug::read_time(&content);

        let rewrite = self.rewriter.rewrite(&fields.title, &content).await;

        if self.store.exists_by_title(&fields.title).await? {
            tracing::info!("duplicate title, skipping: {}", fields.title);
            return Ok(IngestOutcome::Duplicate {
                title: fields.title,
            });
        }

        let now = Utc::now();
        let published_at = DateTime::parse_from_rfc3339(&fields.published_at_raw)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(now);

        let record = ArticleRecord {
            title: fields.title,
            rewrite_title: rewrite.rewrite_title,
            slug: article_slug,
            content,
            rewritten: rewrite.rewritten,
            html_content: fields.html_content,
            thumbnail: assets.thumbnail_url(),
            images: assets.hosted_images(),
            description: fields.description,
            author: fields.author,
            published_at,
            source: profile.name.clone(),
            main_category_slug: slug::slugify(&fields.main_category),
            sub_category_slug: slug::slugify(&fields.sub_category),
            main_category: fields.main_category,
            sub_category: fields.sub_category,
            tags: fields.tags,
            read_time,
            original_url: url.to_string(),
            published: true,
            created_at: now,
            facebook_posted: false,
            facebook_post_id: String::new(),
            facebook_post_time: None,
        };

        self.store.insert(&record).await?;
        tracing::info!("persisted {} ({} min read)", record.slug, record.read_time);
        Ok(IngestOutcome::Persisted(Box::new(record)))
    }

    /// Scan a profile's front page for article links. Relative hrefs are
    /// resolved against the homepage; links that leave the publisher are
    /// dropped.
    pub async fn discover(&self, profile: &SourceProfile) -> Result<Vec<String>> {
        if profile.homepage.is_empty() {
            return Err(Error::InvalidUrl(format!(
                "profile {} has no homepage configured",
                profile.name
            )));
        }

        let document = self.fetcher.fetch(&profile.homepage).await?;
        let html = Html::parse_document(&document.html);
        let selector = Selector::parse(&profile.link_selector)
            .map_err(|e| Error::Extraction(format!("invalid link selector: {}", e)))?;

        let mut urls = Vec::new();
        for link in html.select(&selector) {
            if let Some(href) = link.value().attr("href") {
                let url = if href.starts_with("http") {
                    href.to_string()
                } else {
                    format!("{}{}", profile.homepage.trim_end_matches('/'), href)
                };
                if profile.matches(&url) {
                    urls.push(url);
                }
            }
        }

        urls.sort();
        urls.dedup();
        Ok(urls)
    }
}
