//! Field extraction over parsed article HTML.
//!
//! Every field is read through an ordered fallback chain: profile-specific
//! selectors first, then the generic cross-publisher ones, then a
//! last-resort probe. Each strategy is a pure function over the parsed
//! document and the first non-empty trimmed result wins, so chains stay
//! declarative and appendable per publisher.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::profiles::SourceProfile;
use vn_core::{Error, ExtractedFields, RawDocument, Result};

pub type Strategy = Box<dyn Fn(&Html) -> Option<String> + Send + Sync>;

/// Run a fallback chain: first strategy returning a non-empty trimmed
/// value wins.
pub fn run_chain(document: &Html, chain: &[Strategy]) -> Option<String> {
    chain.iter().find_map(|probe| {
        probe(document)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matching a CSS selector.
pub fn css<S: Into<String>>(selector: S) -> Strategy {
    let selector = selector.into();
    Box::new(move |document| {
        let parsed = parse_selector(&selector)?;
        document.select(&parsed).next().map(|el| element_text(&el))
    })
}

/// Attribute of the first element matching a CSS selector.
pub fn attr<S: Into<String>>(selector: S, name: &'static str) -> Strategy {
    let selector = selector.into();
    Box::new(move |document| {
        let parsed = parse_selector(&selector)?;
        document
            .select(&parsed)
            .next()
            .and_then(|el| el.value().attr(name))
            .map(str::to_string)
    })
}

pub fn meta_name(name: &str) -> Strategy {
    attr(format!("meta[name='{}']", name), "content")
}

pub fn meta_property(property: &str) -> Strategy {
    attr(format!("meta[property='{}']", property), "content")
}

pub fn meta_itemprop(property: &str) -> Strategy {
    attr(format!("meta[itemprop='{}']", property), "content")
}

const GENERIC_TITLE_SELECTORS: &str = "h1.title-detail, h1.title, h1.article-title, h1.st-name, h1.dt-news__title, h1.news-title, h1.article__title";
const GENERIC_AUTHOR_SELECTORS: &str = ".author, .author-name, .article-author, .bio__info";
const GENERIC_CONTENT_SELECTORS: &[&str] = &[
    ".fck_detail",
    ".article-content",
    ".dt-news__content",
    ".content-detail",
    ".detail-content",
    ".article-body",
];
const SUMMARY_SELECTORS: &str = ".article-summary, .article-sapo, .sapo, .description";
const DATE_SELECTORS: &str = ".date, .time-update, .time, .article-date, .article__date";
const BREADCRUMB_SELECTORS: &str = ".breadcrumb li a, .breadcrumbs a, .bread-crumbs a, .navigation a";
const TAG_SELECTORS: &str = ".tags a, .article-tags a, .tag-item, .keyword-tags a";

lazy_static! {
    static ref AUTHOR_PREFIX: Regex = Regex::new(r"(?i)^(Bởi|Tác giả|Author|By)\s*").unwrap();
    static ref PARAGRAPH: Selector = Selector::parse("p").unwrap();
}

fn title_chain(profile: &SourceProfile) -> Vec<Strategy> {
    let mut chain: Vec<Strategy> = profile
        .title_selectors
        .iter()
        .map(|s| css(s.as_str()))
        .collect();
    chain.push(css(GENERIC_TITLE_SELECTORS));
    chain.push(meta_property("og:title"));
    chain.push(css("title"));
    chain.push(css("h1"));
    chain
}

fn description_chain() -> Vec<Strategy> {
    vec![
        meta_name("description"),
        meta_property("og:description"),
        css(SUMMARY_SELECTORS),
    ]
}

fn author_chain(profile: &SourceProfile) -> Vec<Strategy> {
    let mut chain: Vec<Strategy> = profile
        .author_selectors
        .iter()
        .map(|s| css(s.as_str()))
        .collect();
    chain.push(css(GENERIC_AUTHOR_SELECTORS));
    chain
}

fn published_chain() -> Vec<Strategy> {
    vec![
        meta_property("article:published_time"),
        meta_itemprop("datePublished"),
        attr("time[itemprop='datePublished']", "datetime"),
        css(DATE_SELECTORS),
    ]
}

/// Drop the leading honorific token publishers prepend to bylines.
fn clean_author(author: String) -> String {
    AUTHOR_PREFIX.replace(&author, "").trim().to_string()
}

fn extract_tags(document: &Html) -> Vec<String> {
    if let Some(keywords) = meta_name("keywords")(document) {
        let tags: Vec<String> = keywords
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            return tags;
        }
    }

    let Some(selector) = parse_selector(TAG_SELECTORS) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Breadcrumb navigation first; with at least two entries the first is the
/// main category and the last the sub category. Otherwise fall back to
/// section metadata for the main category only.
fn extract_categories(document: &Html) -> (String, String) {
    if let Some(selector) = parse_selector(BREADCRUMB_SELECTORS) {
        let crumbs: Vec<String> = document
            .select(&selector)
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .collect();
        if crumbs.len() >= 2 {
            let main = crumbs[0].clone();
            let sub = crumbs[crumbs.len() - 1].clone();
            return (main, sub);
        }
    }

    let main = meta_property("article:section")(document).unwrap_or_default();
    (main.trim().to_string(), String::new())
}

/// Walk the content selectors in priority order. The first selector with a
/// matching container provides the raw HTML; the first selector whose
/// containers hold non-empty paragraphs provides the text body. When no
/// paragraphs turn up anywhere, the first container's full text becomes a
/// single inferred paragraph.
fn extract_body(document: &Html, profile: &SourceProfile) -> (Vec<String>, String) {
    let selectors: Vec<&str> = profile
        .content_selectors
        .iter()
        .map(String::as_str)
        .chain(GENERIC_CONTENT_SELECTORS.iter().copied())
        .collect();

    let mut html_content = String::new();
    let mut fallback_text = String::new();
    let mut paragraphs: Vec<String> = Vec::new();

    for selector in selectors {
        let Some(parsed) = parse_selector(selector) else {
            continue;
        };
        let Some(first) = document.select(&parsed).next() else {
            continue;
        };

        if html_content.is_empty() {
            html_content = first.inner_html().trim().to_string();
            fallback_text = element_text(&first);
        }

        if paragraphs.is_empty() {
            for container in document.select(&parsed) {
                for paragraph in container.select(&PARAGRAPH) {
                    let text = element_text(&paragraph);
                    if !text.is_empty() {
                        paragraphs.push(text);
                    }
                }
            }
        }

        if !html_content.is_empty() && !paragraphs.is_empty() {
            break;
        }
    }

    if paragraphs.is_empty() && !fallback_text.is_empty() {
        paragraphs.push(fallback_text);
    }

    (paragraphs, html_content)
}

/// Extract all article fields. Missing optional fields come back empty;
/// only a title that no fallback can produce is an error.
pub fn extract(document: &RawDocument, profile: &SourceProfile) -> Result<ExtractedFields> {
    let html = Html::parse_document(&document.html);

    let title = run_chain(&html, &title_chain(profile))
        .ok_or_else(|| Error::Extraction(format!("no title found for {}", document.url)))?;

    let description = run_chain(&html, &description_chain()).unwrap_or_default();
    let author = clean_author(run_chain(&html, &author_chain(profile)).unwrap_or_default());
    let published_at_raw = run_chain(&html, &published_chain()).unwrap_or_default();
    let tags = extract_tags(&html);
    let (main_category, sub_category) = extract_categories(&html);
    let (paragraphs, html_content) = extract_body(&html, profile);

    Ok(ExtractedFields {
        title,
        description,
        author,
        published_at_raw,
        tags,
        main_category,
        sub_category,
        paragraphs,
        html_content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::{generic_profile, known_profiles};

    fn doc(html: &str) -> RawDocument {
        RawDocument {
            url: "https://vnexpress.net/bai-viet-123.html".to_string(),
            html: html.to_string(),
        }
    }

    fn vnexpress() -> SourceProfile {
        known_profiles().into_iter().next().unwrap()
    }

    #[test]
    fn test_profile_title_wins_over_generic() {
        let html = r#"
            <html><body>
                <h1 class="title-detail">Tiêu đề riêng</h1>
                <h1 class="news-title">Tiêu đề chung</h1>
                <div class="fck_detail"><p>Đoạn một.</p></div>
            </body></html>
        "#;
        let fields = extract(&doc(html), &vnexpress()).unwrap();
        assert_eq!(fields.title, "Tiêu đề riêng");
    }

    #[test]
    fn test_title_falls_back_to_og_then_page_title() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="Tiêu đề og" />
                <title>Tiêu đề trang</title>
            </head><body><div class="article-body"><p>Nội dung.</p></div></body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.title, "Tiêu đề og");

        let html = r#"<html><head><title>Tiêu đề trang</title></head><body></body></html>"#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.title, "Tiêu đề trang");
    }

    #[test]
    fn test_no_title_is_extraction_error() {
        let html = "<html><body><div><span>không có gì</span></div></body></html>";
        let result = extract(&doc(html), &generic_profile());
        assert!(matches!(result, Err(Error::Extraction(_))));
    }

    #[test]
    fn test_any_h1_prevents_extraction_error() {
        let html = "<html><body><h1>Chỉ còn mỗi cái này</h1></body></html>";
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.title, "Chỉ còn mỗi cái này");
    }

    #[test]
    fn test_author_prefix_stripped() {
        let html = r#"
            <html><body>
                <h1>Bài</h1>
                <p class="author">Bởi Nguyễn Văn A</p>
            </body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.author, "Nguyễn Văn A");

        let html = r#"<html><body><h1>Bài</h1><p class="author">By John Doe</p></body></html>"#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.author, "John Doe");
    }

    #[test]
    fn test_tags_from_keywords_meta() {
        let html = r#"
            <html><head><meta name="keywords" content="AI, công nghệ , ,báo chí" /></head>
            <body><h1>Bài</h1></body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.tags, vec!["AI", "công nghệ", "báo chí"]);
    }

    #[test]
    fn test_tags_from_link_elements() {
        let html = r#"
            <html><body><h1>Bài</h1>
                <div class="tags"><a>AI</a><a>robot</a></div>
            </body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.tags, vec!["AI", "robot"]);
    }

    #[test]
    fn test_breadcrumbs_first_and_last() {
        let html = r#"
            <html><body><h1>Bài</h1>
                <ul class="breadcrumb">
                    <li><a>Công nghệ</a></li>
                    <li><a>Chuyển đổi số</a></li>
                    <li><a>AI</a></li>
                </ul>
            </body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.main_category, "Công nghệ");
        assert_eq!(fields.sub_category, "AI");
    }

    #[test]
    fn test_single_breadcrumb_uses_section_meta() {
        let html = r#"
            <html><head><meta property="article:section" content="Khoa học" /></head>
            <body><h1>Bài</h1><ul class="breadcrumb"><li><a>Trang chủ</a></li></ul></body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.main_category, "Khoa học");
        assert_eq!(fields.sub_category, "");
    }

    #[test]
    fn test_body_paragraphs_and_html() {
        let html = r#"
            <html><body><h1>Bài</h1>
                <div class="fck_detail">
                    <p>Đoạn một.</p>
                    <p>  </p>
                    <p>Đoạn hai.</p>
                </div>
            </body></html>
        "#;
        let fields = extract(&doc(html), &vnexpress()).unwrap();
        assert_eq!(fields.paragraphs, vec!["Đoạn một.", "Đoạn hai."]);
        assert_eq!(fields.content(), "Đoạn một.\n\nĐoạn hai.");
        assert!(fields.html_content.contains("<p>Đoạn một.</p>"));
    }

    #[test]
    fn test_body_without_paragraph_tags_becomes_single_paragraph() {
        let html = r#"
            <html><body><h1>Bài</h1>
                <div class="article-body">Chỉ là chữ trần, không có thẻ đoạn.</div>
            </body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(
            fields.paragraphs,
            vec!["Chỉ là chữ trần, không có thẻ đoạn."]
        );
    }

    #[test]
    fn test_html_from_first_container_even_if_paragraphs_elsewhere() {
        // The first matching selector has no <p>; a later one does. HTML
        // keeps coming from the first hit.
        let html = r#"
            <html><body><h1>Bài</h1>
                <div class="fck_detail"><span>toàn span</span></div>
                <div class="article-content"><p>Đoạn thật.</p></div>
            </body></html>
        "#;
        let fields = extract(&doc(html), &vnexpress()).unwrap();
        assert!(fields.html_content.contains("toàn span"));
        assert_eq!(fields.paragraphs, vec!["Đoạn thật."]);
    }

    #[test]
    fn test_published_date_passthrough() {
        let html = r#"
            <html><head><meta property="article:published_time" content="2025-06-01T08:30:00+07:00" /></head>
            <body><h1>Bài</h1></body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.published_at_raw, "2025-06-01T08:30:00+07:00");

        let html = r#"<html><body><h1>Bài</h1><span class="time">Thứ bảy, 1/6/2025</span></body></html>"#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.published_at_raw, "Thứ bảy, 1/6/2025");
    }

    #[test]
    fn test_description_chain() {
        let html = r#"
            <html><head><meta property="og:description" content="Mô tả og" /></head>
            <body><h1>Bài</h1><div class="sapo">Mô tả sapo</div></body></html>
        "#;
        let fields = extract(&doc(html), &generic_profile()).unwrap();
        assert_eq!(fields.description, "Mô tả og");
    }
}
