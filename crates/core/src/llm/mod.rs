pub mod anthropic;
pub mod error;
pub mod json;
pub mod prompt;

use crate::domain::recommendation::Recommendation;
use crate::llm::prompt::RenderedPrompt;

#[derive(Debug, Clone, Copy)]
pub enum Provider {
    Anthropic,
}

/// External reasoning capability: one rendered prompt in, one validated
/// recommendation out. Single attempt per invocation; callers see transport
/// and schema failures as distinct `ReasoningError` kinds.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate_recommendation(
        &self,
        prompt: RenderedPrompt,
    ) -> anyhow::Result<Recommendation>;
}
