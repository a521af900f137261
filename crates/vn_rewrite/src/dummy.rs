use async_trait::async_trait;

use crate::TextModel;
use vn_core::Result;

/// Offline model for wiring and tests. The original article is embedded
/// at the tail of the prompt in the exact response format the parser
/// expects, so echoing that tail produces a valid two-section answer.
pub struct DummyModel;

#[async_trait]
impl TextModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let original = prompt
            .split("Bài viết gốc:")
            .nth(1)
            .unwrap_or(prompt)
            .trim();
        Ok(original.to_string())
    }
}
