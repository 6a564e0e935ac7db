use crate::llm::Provider;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningErrorKind {
    /// The call could not complete (connection, timeout, non-2xx status).
    Transport,
    /// The call completed but the reply did not match the output contract.
    Schema,
}

#[derive(Debug, Clone)]
pub struct ReasoningError {
    pub provider: Provider,
    pub kind: ReasoningErrorKind,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl fmt::Display for ReasoningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ReasoningErrorKind::Transport => "transport",
            ReasoningErrorKind::Schema => "schema",
        };
        write!(
            f,
            "reasoning error (provider={:?}, kind={kind}): {}",
            self.provider, self.detail
        )
    }
}

impl std::error::Error for ReasoningError {}
