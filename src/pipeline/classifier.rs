//! LLM-backed email classifier.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::TriageError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::types::{Category, Email};

/// A label is a word or two; keep the call cheap.
const CLASSIFY_MAX_TOKENS: u32 = 16;

/// Maps an email to one `Category` with a single completion request.
pub struct Classifier {
    llm: Arc<dyn LlmProvider>,
    temperature: f32,
}

impl Classifier {
    pub fn new(llm: Arc<dyn LlmProvider>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    /// Classify an email.
    ///
    /// Fails with `MissingFields` before any request when subject or body is
    /// absent. Model output that is not a known label becomes `Other`.
    pub async fn classify(&self, email: &Email) -> Result<Category, TriageError> {
        let (subject, body) = email.require_fields()?;

        let request = CompletionRequest::new(vec![ChatMessage::user(build_classify_prompt(
            subject, body,
        ))])
        .with_temperature(self.temperature)
        .with_max_tokens(CLASSIFY_MAX_TOKENS);

        let response = self.llm.complete(request).await?;

        match Category::parse_model_output(&response.content) {
            Some(category) => {
                debug!(id = %email.id, category = %category, "Classified email");
                Ok(category)
            }
            None => {
                warn!(
                    id = %email.id,
                    raw_label = %response.content,
                    "Unrecognized classification, falling back to other"
                );
                Ok(Category::Other)
            }
        }
    }
}

fn build_classify_prompt(subject: &str, body: &str) -> String {
    let labels: Vec<&str> = Category::ALL.iter().map(Category::label).collect();
    format!(
        "Classify the following email into exactly one category.\n\n\
         Subject: {subject}\n\
         Body: {body}\n\n\
         Categories: {}\n\n\
         Respond with just the category name. If no category fits, respond with \"other\".",
        labels.join(", ")
    )
}
