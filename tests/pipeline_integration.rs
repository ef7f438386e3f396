//! End-to-end tests: sample batch → stub LLM → dispatch → CSV report.
//!
//! The stub provider answers by keyword so each sample email lands in a
//! known category without any network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mail_triage::error::{LlmError, TriageError};
use mail_triage::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
};
use mail_triage::pipeline::{ActionSink, Category, DispatchAction, Email, EmailProcessor};
use mail_triage::report::write_report;
use mail_triage::sample::sample_emails;

/// Keyword-driven stub LLM (no real API calls).
#[derive(Default)]
struct StubLlm {
    calls: AtomicUsize,
    fail_on_subject: Option<&'static str>,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = &request.messages[0].content;

        if let Some(subject) = self.fail_on_subject
            && prompt.contains(subject)
        {
            return Err(LlmError::Timeout {
                provider: "stub".into(),
                timeout: std::time::Duration::from_secs(30),
            });
        }

        let content = if prompt.starts_with("Classify") {
            if prompt.contains("damaged") {
                "complaint"
            } else if prompt.contains("compatible") {
                "Inquiry"
            } else if prompt.contains("thank you") {
                "feedback"
            } else if prompt.contains("error code") {
                "support_request"
            } else {
                "other"
            }
        } else {
            "Thanks for your email, we'll be in touch shortly."
        };

        Ok(CompletionResponse {
            content: content.to_string(),
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

/// Counts actions per email.
#[derive(Default)]
struct CountingSink {
    actions: Mutex<Vec<(String, &'static str)>>,
}

impl CountingSink {
    fn count(&self, email_id: &str, label: &str) -> usize {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, l)| id == email_id && *l == label)
            .count()
    }

    fn total(&self) -> usize {
        self.actions.lock().unwrap().len()
    }
}

#[async_trait]
impl ActionSink for CountingSink {
    async fn perform(&self, action: &DispatchAction) -> Result<(), TriageError> {
        self.actions
            .lock()
            .unwrap()
            .push((action.email_id().to_string(), action.label()));
        Ok(())
    }
}

fn setup(llm: StubLlm) -> (Arc<StubLlm>, Arc<CountingSink>, EmailProcessor) {
    let llm = Arc::new(llm);
    let sink = Arc::new(CountingSink::default());
    let processor = EmailProcessor::from_provider(llm.clone(), 0.1, sink.clone());
    (llm, sink, processor)
}

#[tokio::test]
async fn complaint_triggers_ticket_and_acknowledgement_once() {
    let (_llm, sink, processor) = setup(StubLlm::default());
    let complaint = sample_emails().into_iter().next().unwrap();
    assert_eq!(complaint.id, "001");

    let report = processor.process_batch(&[complaint]).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].category, Some(Category::Complaint));
    assert_eq!(sink.count("001", "urgent_ticket"), 1);
    assert_eq!(sink.count("001", "complaint_acknowledgement"), 1);
    assert_eq!(sink.total(), 2);
}

#[tokio::test]
async fn sample_batch_covers_every_category_in_order() {
    let (llm, sink, processor) = setup(StubLlm::default());

    let report = processor.process_batch(&sample_emails()).await;

    let categories: Vec<Option<Category>> = report.results.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![
            Some(Category::Complaint),
            Some(Category::Inquiry),
            Some(Category::Feedback),
            Some(Category::SupportRequest),
            Some(Category::Other),
        ]
    );
    assert!(report.results.iter().all(|r| r.is_success()));
    // Two requests per email: classify + draft.
    assert_eq!(llm.calls.load(Ordering::SeqCst), 10);
    assert_eq!(sink.count("002", "standard_reply"), 1);
    assert_eq!(sink.count("003", "feedback_log_entry"), 1);
    assert_eq!(sink.count("004", "support_ticket"), 1);
    assert_eq!(sink.count("005", "standard_reply"), 1);

    let summary = report.summary();
    assert_eq!(summary.processed, 5);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.by_category.len(), 5);
}

#[tokio::test]
async fn timeout_mid_batch_is_recorded_and_batch_completes() {
    let (_llm, sink, processor) = setup(StubLlm {
        fail_on_subject: Some("Amazing customer support"),
        ..Default::default()
    });

    let report = processor.process_batch(&sample_emails()).await;

    assert_eq!(report.results.len(), 5);
    let failed = &report.results[2];
    assert_eq!(failed.email.id, "003");
    assert!(failed.category.is_none());
    assert!(failed.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(sink.count("003", "feedback_log_entry"), 0);
    // Later emails still processed.
    assert_eq!(report.results[3].category, Some(Category::SupportRequest));
    assert_eq!(report.summary().failed, 1);
}

#[tokio::test]
async fn incomplete_emails_are_skipped_without_requests() {
    let (llm, _sink, processor) = setup(StubLlm::default());
    let mut emails = sample_emails();
    emails[1].subject = None;
    emails.push(Email {
        id: "006".into(),
        sender: "blank@example.com".into(),
        subject: Some("Hello".into()),
        body: Some("".into()),
        timestamp: "2024-03-15T16:00:00Z".into(),
    });

    let report = processor.process_batch(&emails).await;

    assert_eq!(report.results.len(), 4);
    assert_eq!(report.skipped, vec!["002", "006"]);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 8);
}

#[tokio::test]
async fn report_file_has_one_row_per_result() {
    let (_llm, _sink, processor) = setup(StubLlm::default());
    let report = processor.process_batch(&sample_emails()).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report").join("report.csv");
    write_report(&report, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let classifications: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[1].to_string())
        .collect();
    assert_eq!(
        classifications,
        vec!["complaint", "inquiry", "feedback", "support_request", "other"]
    );
}
