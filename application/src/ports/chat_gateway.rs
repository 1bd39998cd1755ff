//! Chat gateway port — the opaque text-completion collaborator.
//!
//! Used for the conversational reply when an utterance resolves to chat,
//! and by the local resolver backend for LLM-assisted disambiguation. The
//! model behind it is an external service; this port is text-in/text-out
//! only.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatGatewayError {
    #[error("gateway unreachable: {0}")]
    Unreachable(String),
    #[error("gateway returned malformed body: {0}")]
    Malformed(String),
}

/// Port for language-model text completion.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Complete a prompt into free-form text.
    async fn complete(&self, prompt: &str) -> Result<String, ChatGatewayError>;
}
