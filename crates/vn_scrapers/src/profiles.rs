//! Per-publisher extraction profiles.
//!
//! A profile is plain configuration: URL fragments that identify the
//! publisher plus ordered selector lists the extractor tries before its
//! generic fallbacks. Unknown sites get the generic profile, so extraction
//! degrades instead of failing outright.

use lazy_static::lazy_static;

#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub name: String,
    /// Short name accepted on the command line, e.g. `vnexpress`.
    pub cli_name: String,
    pub url_matchers: Vec<String>,
    pub title_selectors: Vec<String>,
    pub author_selectors: Vec<String>,
    pub content_selectors: Vec<String>,
    /// Front page scanned for article links by `discover`.
    pub homepage: String,
    pub link_selector: String,
}

impl SourceProfile {
    pub fn matches(&self, url: &str) -> bool {
        self.url_matchers.iter().any(|m| url.contains(m.as_str()))
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// The publishers this pipeline knows how to read. Order matters: the
/// first matching profile wins.
pub fn known_profiles() -> Vec<SourceProfile> {
    vec![
        SourceProfile {
            name: "VnExpress".to_string(),
            cli_name: "vnexpress".to_string(),
            url_matchers: strings(&["vnexpress.net"]),
            title_selectors: strings(&[
                "h1.title-detail",
                "h1.title",
                "h1.title_news_detail",
                "h1.article-title",
            ]),
            author_selectors: strings(&[".author_mail", ".author", ".author_top"]),
            content_selectors: strings(&[".fck_detail", ".article-content", ".normal"]),
            homepage: "https://vnexpress.net".to_string(),
            link_selector: ".title-news a".to_string(),
        },
        SourceProfile {
            name: "Dân Trí".to_string(),
            cli_name: "dantri".to_string(),
            url_matchers: strings(&["dantri.com.vn"]),
            title_selectors: strings(&["h1.dt-news__title"]),
            author_selectors: Vec::new(),
            content_selectors: strings(&[".dt-news__content"]),
            homepage: "https://dantri.com.vn".to_string(),
            link_selector: "article a".to_string(),
        },
        SourceProfile {
            name: "Tuổi Trẻ".to_string(),
            cli_name: "tuoitre".to_string(),
            url_matchers: strings(&["tuoitre.vn"]),
            title_selectors: Vec::new(),
            author_selectors: Vec::new(),
            content_selectors: Vec::new(),
            homepage: "https://tuoitre.vn".to_string(),
            link_selector: "article a".to_string(),
        },
        SourceProfile {
            name: "Thanh Niên".to_string(),
            cli_name: "thanhnien".to_string(),
            url_matchers: strings(&["thanhnien.vn"]),
            title_selectors: Vec::new(),
            author_selectors: Vec::new(),
            content_selectors: Vec::new(),
            homepage: "https://thanhnien.vn".to_string(),
            link_selector: "article a".to_string(),
        },
        SourceProfile {
            name: "VietnamNet".to_string(),
            cli_name: "vietnamnet".to_string(),
            url_matchers: strings(&["vietnamnet.vn"]),
            title_selectors: Vec::new(),
            author_selectors: Vec::new(),
            content_selectors: Vec::new(),
            homepage: "https://vietnamnet.vn".to_string(),
            link_selector: "article a".to_string(),
        },
    ]
}

/// Fallback profile for sites no matcher recognizes. Carries the broad
/// selector patterns common across Vietnamese news markup; the extractor's
/// generic chains overlap with these on purpose.
pub fn generic_profile() -> SourceProfile {
    SourceProfile {
        name: "Unknown".to_string(),
        cli_name: "unknown".to_string(),
        url_matchers: Vec::new(),
        title_selectors: Vec::new(),
        author_selectors: Vec::new(),
        content_selectors: Vec::new(),
        homepage: String::new(),
        link_selector: "article a".to_string(),
    }
}

lazy_static! {
    static ref GENERIC: SourceProfile = generic_profile();
}

/// First profile whose matcher appears in the URL, or the generic profile.
pub fn classify<'a>(profiles: &'a [SourceProfile], url: &str) -> &'a SourceProfile {
    profiles
        .iter()
        .find(|p| p.matches(url))
        .unwrap_or(&GENERIC)
}
