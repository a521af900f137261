//! RSS-based article discovery.
//!
//! Publishers expose per-section feeds that are cheaper to poll than the
//! homepage. Entries map onto the same URL-tail slug rule the pipeline
//! uses, so a feed item can be checked against storage before fetching.

use chrono::{DateTime, Utc};
use feed_rs::parser;

use vn_core::{Error, Result};

#[derive(Debug, Clone)]
pub struct FeedArticle {
    pub title: String,
    pub link: String,
    pub slug: String,
    pub thumbnail: Option<String>,
    pub snippet: String,
    pub published: Option<DateTime<Utc>>,
}

pub async fn fetch_feed(client: &reqwest::Client, feed_url: &str) -> Result<Vec<FeedArticle>> {
    let response = client
        .get(feed_url)
        .send()
        .await
        .map_err(|e| Error::Fetch(format!("{}: {}", feed_url, e)))?;

    if !response.status().is_success() {
        return Err(Error::Fetch(format!(
            "{}: unexpected status {}",
            feed_url,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Fetch(format!("{}: {}", feed_url, e)))?;

    parse_feed(&bytes).map_err(|e| Error::Fetch(format!("{}: {}", feed_url, e)))
}

fn parse_feed(bytes: &[u8]) -> std::result::Result<Vec<FeedArticle>, feed_rs::parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;
    Ok(feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let slug = link
                .rsplit('/')
                .next()
                .unwrap_or("")
                .trim_end_matches(".html")
                .to_string();
            let thumbnail = entry
                .media
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|c| c.url.as_ref().map(|u| u.to_string()));
            FeedArticle {
                title: entry.title.map(|t| t.content).unwrap_or_default(),
                link,
                slug,
                thumbnail,
                snippet: entry.summary.map(|s| s.content).unwrap_or_default(),
                published: entry.published,
            }
        })
        .collect())
}
