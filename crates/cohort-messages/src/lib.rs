//! Confirmation-message generation
//!
//! After a subject's group is revealed, the portal shows a short thank-you
//! message. Generation is an external collaborator: the core's enrollment
//! result never depends on it. Callers go through
//! [`generate_or_fallback`], which bounds the call with a timeout and
//! substitutes a caller-supplied, protocol-blind fallback sentence on any
//! failure.

mod http;

pub use http::{GeneratorConfig, HttpGenerator};

use std::time::Duration;

/// Message generation errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// HTTP transport failure
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("generation service returned {0}")]
    Status(u16),

    /// Response body did not contain a usable message
    #[error("generation response malformed: {0}")]
    Malformed(String),
}

/// A source of confirmation messages
///
/// Input is the assigned group's display name only; the message must stay
/// blind (no protocol detail beyond the name).
#[async_trait::async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Generate a short confirmation message for `group_name`
    async fn generate(&self, group_name: &str) -> Result<String, MessageError>;
}

/// Fixed-text generator for the unconfigured case and for tests
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    text: String,
}

impl StaticGenerator {
    /// Create generator that always returns `text`
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait::async_trait]
impl MessageGenerator for StaticGenerator {
    async fn generate(&self, _group_name: &str) -> Result<String, MessageError> {
        Ok(self.text.clone())
    }
}

/// Generate a confirmation message, or fall back
///
/// Bounds the generator call with `timeout`; any error or overrun yields
/// the caller-supplied `fallback` sentence. This function never fails and
/// never blocks longer than `timeout`.
pub async fn generate_or_fallback(
    generator: &dyn MessageGenerator,
    group_name: &str,
    fallback: &str,
    timeout: Duration,
) -> String {
    match tokio::time::timeout(timeout, generator.generate(group_name)).await {
        Ok(Ok(message)) if !message.trim().is_empty() => message,
        Ok(Ok(_)) => {
            tracing::warn!("generator returned empty message, using fallback");
            fallback.to_string()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "message generation failed, using fallback");
            fallback.to_string()
        }
        Err(_) => {
            tracing::warn!(?timeout, "message generation timed out, using fallback");
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Thank you for participating. Your assignment is confirmed.";

    struct FailingGenerator;

    #[async_trait::async_trait]
    impl MessageGenerator for FailingGenerator {
        async fn generate(&self, _group_name: &str) -> Result<String, MessageError> {
            Err(MessageError::Status(503))
        }
    }

    struct StalledGenerator;

    #[async_trait::async_trait]
    impl MessageGenerator for StalledGenerator {
        async fn generate(&self, _group_name: &str) -> Result<String, MessageError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn static_generator_passes_through() {
        let generator = StaticGenerator::new("Welcome!");
        let msg =
            generate_or_fallback(&generator, "Group A", FALLBACK, Duration::from_secs(1)).await;
        assert_eq!(msg, "Welcome!");
    }

    #[tokio::test]
    async fn failure_yields_fallback() {
        let msg =
            generate_or_fallback(&FailingGenerator, "Group A", FALLBACK, Duration::from_secs(1))
                .await;
        assert_eq!(msg, FALLBACK);
    }

    #[tokio::test]
    async fn empty_message_yields_fallback() {
        let generator = StaticGenerator::new("   ");
        let msg =
            generate_or_fallback(&generator, "Group A", FALLBACK, Duration::from_secs(1)).await;
        assert_eq!(msg, FALLBACK);
    }

    #[tokio::test]
    async fn timeout_yields_fallback() {
        let msg = generate_or_fallback(
            &StalledGenerator,
            "Group A",
            FALLBACK,
            Duration::from_millis(20),
        )
        .await;
        assert_eq!(msg, FALLBACK);
    }
}
