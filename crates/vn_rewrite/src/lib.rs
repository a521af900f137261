//! AI rewrite of crawled articles.
//!
//! Strictly an enrichment: the stage builds a fixed Vietnamese prompt,
//! sends it to a generative model, parses the two-section response and
//! sanitizes the result. Every failure degrades to an empty result and a
//! logged error; ingestion never depends on this stage succeeding.

use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;

use vn_core::{Result, RewriteResult};

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;

/// Seam to the generative text service.
#[async_trait]
pub trait TextModel: Send + Sync {
    fn name(&self) -> &str;

    /// One complete response for one prompt; no streaming.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

lazy_static! {
    static ref TITLE_MARKER: Regex = Regex::new(r"(?i)Tiêu(?:\s|_)đề:\s*(.+)").unwrap();
    static ref CONTENT_MARKER: Regex = Regex::new(r"(?is)Nội(?:\s|_)dung:\s*(.*)").unwrap();
    static ref FORBIDDEN_CHARS: Regex = Regex::new(r#"[*"'“”‘’!#]+"#).unwrap();
    static ref EXTRA_SPACE: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// The fixed instruction prompt. The response format contract (two literal
/// section markers) and the character ban are what the parser and the
/// sanitizer below rely on.
fn build_prompt(title: &str, content: &str) -> String {
    format!(
        "Viết lại bài viết sau theo phong cách tự nhiên, dễ hiểu, phù hợp với độc giả Việt Nam.\n\
Tiêu đề sát với tiêu đề gốc, hấp dẫn, kích thích người dùng nhấp vào đọc nhưng không giật gân, gây sốc.\n\n\
Không sử dụng bất kỳ ký tự đặc biệt nào trong tiêu đề hoặc nội dung, bao gồm: *, \", ', !, #, hoặc viết HOA TOÀN BỘ.\n\
Không in đậm, không in nghiêng, không chèn định dạng markdown.\n\n\
Nội dung cần được giữ đầy đủ thông tin, diễn đạt lại bằng ngôn từ mới, dễ đọc, chia đoạn hợp lý để tăng sự cuốn hút.\n\
Không rút gọn quá mức, không thêm nhận xét cá nhân hay thông tin không có trong bài gốc.\n\n\
Chỉ trả về kết quả với hai phần:\n\
Tiêu đề: ...\n\
Nội dung: ...\n\n\
Bài viết gốc:\n\
Tiêu đề: {}\n\
Nội dung: {}",
        title, content
    )
}

/// Content policy, not a parsing necessity: the model is instructed to
/// avoid these characters, the sanitizer guarantees stored text never
/// contains them regardless of compliance.
fn clean_text(text: &str) -> String {
    let stripped = FORBIDDEN_CHARS.replace_all(text, "");
    EXTRA_SPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Split the raw response on the literal section markers. A missing
/// marker leaves that field empty.
fn parse_response(raw: &str) -> RewriteResult {
    let rewrite_title = TITLE_MARKER
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default();
    let rewritten = CONTENT_MARKER
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| clean_text(m.as_str()))
        .unwrap_or_default();
    RewriteResult {
        rewrite_title,
        rewritten,
    }
}

pub struct Rewriter {
    model: Arc<dyn TextModel>,
}

impl Rewriter {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Best-effort rewrite: at most one retry on model failure, then the
    /// empty result. Never surfaces an error to the ingestion run.
    pub async fn rewrite(&self, title: &str, content: &str) -> RewriteResult {
        let prompt = build_prompt(title, content);
        let raw = match self.model.generate(&prompt).await {
            Ok(raw) => raw,
            Err(first) => {
                tracing::warn!("rewrite attempt failed, retrying once: {}", first);
                match self.model.generate(&prompt).await {
                    Ok(raw) => raw,
                    Err(second) => {
                        tracing::error!(
                            "rewrite failed via {}: {}",
                            self.model.name(),
                            second
                        );
                        return RewriteResult::default();
                    }
                }
            }
        };
        parse_response(&raw)
    }
}
