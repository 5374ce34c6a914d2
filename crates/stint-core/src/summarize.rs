//! Text-generation collaborator interface.

use async_trait::async_trait;

use crate::error::Result;

/// The LLM summarization collaborator. Prompt construction lives with the
/// callers; this trait only carries text in and text out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;
}
