//! Email processor: runs each email through classify → draft → dispatch.
//!
//! Flow per email:
//! 1. `Classifier::classify()` → `Category`
//! 2. `ResponseGenerator::generate()` → reply draft
//! 3. `Dispatcher::dispatch()` → category actions
//!
//! Emails are processed strictly in input order, one at a time. A failure on
//! one email is recorded on its `ProcessingResult` and the batch moves on.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::error::TriageError;
use crate::llm::provider::LlmProvider;
use crate::pipeline::classifier::Classifier;
use crate::pipeline::dispatch::{ActionSink, DispatchOutcome, Dispatcher};
use crate::pipeline::responder::ResponseGenerator;
use crate::pipeline::types::{BatchReport, Category, Email, ProcessingResult};

/// Batch runner for the triage pipeline.
pub struct EmailProcessor {
    classifier: Classifier,
    responder: ResponseGenerator,
    dispatcher: Dispatcher,
}

impl EmailProcessor {
    pub fn new(classifier: Classifier, responder: ResponseGenerator, dispatcher: Dispatcher) -> Self {
        Self {
            classifier,
            responder,
            dispatcher,
        }
    }

    /// Wire all three stages to one provider and one action sink.
    pub fn from_provider(
        llm: Arc<dyn LlmProvider>,
        temperature: f32,
        sink: Arc<dyn ActionSink>,
    ) -> Self {
        Self::new(
            Classifier::new(Arc::clone(&llm), temperature),
            ResponseGenerator::new(llm, temperature),
            Dispatcher::new(sink),
        )
    }

    /// Process a single email. Never fails; errors land in `result.error`.
    pub async fn process(&self, email: &Email) -> ProcessingResult {
        let started = Instant::now();

        let category = match self.classifier.classify(email).await {
            Ok(category) => category,
            Err(e) => {
                error!(id = %email.id, error = %e, "Classification failed");
                return finish(email, None, None, Vec::new(), Some(e.to_string()), started);
            }
        };

        let reply = match self.responder.generate(email, category).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(id = %email.id, category = %category, error = %e, "Reply generation failed");
                return finish(email, Some(category), None, Vec::new(), Some(e.to_string()), started);
            }
        };

        let outcome = self.dispatcher.dispatch(email, category, &reply).await;
        let error = dispatch_error(&outcome);

        finish(
            email,
            Some(category),
            Some(reply),
            outcome.performed_labels(),
            error,
            started,
        )
    }

    /// Process a batch in input order.
    ///
    /// Emails without subject or body are skipped and listed in
    /// `BatchReport::skipped`. Every other email yields exactly one result.
    pub async fn process_batch(&self, emails: &[Email]) -> BatchReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("batch", %run_id);

        async {
            info!(count = emails.len(), "Processing email batch");

            let mut results = Vec::with_capacity(emails.len());
            let mut skipped = Vec::new();

            for email in emails {
                if email.subject_and_body().is_none() {
                    let e = TriageError::MissingFields {
                        id: email.id.clone(),
                    };
                    warn!(id = %email.id, "{e}. Skipping");
                    skipped.push(email.id.clone());
                    continue;
                }

                let result = self
                    .process(email)
                    .instrument(info_span!("email", id = %email.id))
                    .await;

                info!(
                    id = %email.id,
                    category = result.category.map(|c| c.label()).unwrap_or("none"),
                    processing_time = result.processing_time,
                    ok = result.is_success(),
                    "Processed email"
                );
                results.push(result);
            }

            info!(
                processed = results.len(),
                skipped = skipped.len(),
                total = emails.len(),
                "Batch processing complete"
            );

            BatchReport {
                run_id,
                results,
                skipped,
            }
        }
        .instrument(span)
        .await
    }
}

fn dispatch_error(outcome: &DispatchOutcome) -> Option<String> {
    if outcome.is_clean() {
        return None;
    }
    let failures: Vec<String> = outcome
        .failed
        .iter()
        .map(|(action, reason)| format!("{}: {}", action.label(), reason))
        .collect();
    Some(format!("action failed: {}", failures.join("; ")))
}

fn finish(
    email: &Email,
    category: Option<Category>,
    response: Option<String>,
    actions: Vec<String>,
    error: Option<String>,
    started: Instant,
) -> ProcessingResult {
    ProcessingResult {
        email: email.clone(),
        category,
        response,
        actions,
        error,
        processing_time: started.elapsed().as_secs_f64(),
    }
}
