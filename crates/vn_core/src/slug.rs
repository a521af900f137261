//! Slug derivation and read-time estimation.
//!
//! `slugify` is the single source of truth for slug generation: both the
//! category taxonomy and article categorization go through it, because
//! category membership is decided by slug equality rather than a foreign
//! key. It folds the Vietnamese diacritic set through an explicit table —
//! not a generic Unicode decomposition — so its output is stable against
//! library behavior changes.

use chrono::Utc;

/// Fold one lowercase Vietnamese character to its base Latin letter.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ'
        | 'ặ' | 'ẳ' | 'ẵ' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ'
        | 'ợ' | 'ở' | 'ỡ' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        _ => c,
    }
}

/// Lowercase, fold diacritics, drop everything but ASCII alphanumerics,
/// and collapse whitespace/underscore/hyphen runs into single hyphens.
/// Deterministic and idempotent; never produces leading or trailing
/// hyphens.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.to_lowercase().chars().map(fold_diacritic) {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_sep = true;
        }
    }
    out
}

/// Derive an article slug: the URL's last path segment without its
/// `.html` suffix, falling back to the slugified title, falling back to
/// a timestamped placeholder when both are empty.
pub fn article_slug(url: &str, title: &str) -> String {
    let tail = url
        .rsplit('/')
        .next()
        .unwrap_or("")
        .trim_end_matches(".html");
    if !tail.is_empty() {
        return tail.to_string();
    }
    let from_title = slugify(title);
    if !from_title.is_empty() {
        return from_title;
    }
    format!("article-{}", Utc::now().timestamp_millis())
}

/// Estimated reading time in minutes at 200 words per minute, rounded up.
pub fn read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count().max(1);
    words.div_ceil(200) as u32
}
