//! Reply drafting.

use std::sync::Arc;

use tracing::debug;

use crate::error::{LlmError, TriageError};
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::types::{Category, Email};

const REPLY_MAX_TOKENS: u32 = 400;

/// Drafts a short reply for a classified email.
///
/// Each call is an independent completion request; nothing is shared with
/// the classification request.
pub struct ResponseGenerator {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    pub async fn generate(&self, email: &Email, category: Category) -> Result<String, TriageError> {
        let (subject, body) = email.require_fields()?;

        let request = CompletionRequest::new(vec![ChatMessage::user(build_reply_prompt(
            subject, body, category,
        ))])
        .with_temperature(self.temperature)
        .with_max_tokens(REPLY_MAX_TOKENS);

        let response = self.llm.complete(request).await?;
        let reply = response.content.trim();
        if reply.is_empty() {
            return Err(TriageError::Upstream(LlmError::InvalidResponse {
                provider: self.llm.model_name().to_string(),
                reason: "empty completion".to_string(),
            }));
        }

        debug!(id = %email.id, category = %category, chars = reply.len(), "Drafted reply");
        Ok(reply.to_string())
    }
}

fn build_reply_prompt(subject: &str, body: &str, category: Category) -> String {
    format!(
        "Write a short, polite customer-service reply to the email below.\n\n\
         Subject: {subject}\n\
         Body: {body}\n\
         Category: {category}\n\n\
         Keep it under 120 words and address the sender's main point."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{ScriptedLlm, upstream_failure};

    fn sample() -> Email {
        Email::new(
            "004",
            "tech.user@example.com",
            "Need help with installation",
            "I keep getting error code 5123.",
            "2024-03-15T14:20:00Z",
        )
    }

    #[tokio::test]
    async fn sends_full_prompt_not_bare_label() {
        let llm = Arc::new(ScriptedLlm::new(|_| Ok("We're on it.".into())));
        let generator = ResponseGenerator::new(llm.clone(), 0.1);

        let reply = generator
            .generate(&sample(), Category::SupportRequest)
            .await
            .unwrap();
        assert_eq!(reply, "We're on it.");

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert_ne!(prompt, "support_request");
        assert!(prompt.contains("Need help with installation"));
        assert!(prompt.contains("error code 5123"));
        assert!(prompt.contains("Category: support_request"));
        assert!(prompt.starts_with("Write a short"));
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let llm = Arc::new(ScriptedLlm::new(|_| Ok("\n  Thanks!  \n".into())));
        let generator = ResponseGenerator::new(llm, 0.1);
        let reply = generator.generate(&sample(), Category::Feedback).await.unwrap();
        assert_eq!(reply, "Thanks!");
    }

    #[tokio::test]
    async fn empty_completion_is_upstream_error() {
        let llm = Arc::new(ScriptedLlm::new(|_| Ok("   ".into())));
        let generator = ResponseGenerator::new(llm, 0.1);
        let err = generator.generate(&sample(), Category::Other).await.unwrap_err();
        assert!(matches!(err, TriageError::Upstream(LlmError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn missing_body_skips_request() {
        let llm = Arc::new(ScriptedLlm::new(|_| Ok("hi".into())));
        let generator = ResponseGenerator::new(llm.clone(), 0.1);
        let mut email = sample();
        email.body = None;

        let err = generator.generate(&email, Category::Inquiry).await.unwrap_err();
        assert!(matches!(err, TriageError::MissingFields { .. }));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_upstream_error() {
        let llm = Arc::new(ScriptedLlm::new(|_| Err(upstream_failure())));
        let generator = ResponseGenerator::new(llm, 0.1);
        let err = generator.generate(&sample(), Category::Inquiry).await.unwrap_err();
        assert!(matches!(err, TriageError::Upstream(_)));
    }
}
