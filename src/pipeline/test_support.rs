//! Stub providers shared by the pipeline unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{LlmError, TriageError};
use crate::llm::provider::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};
use crate::pipeline::dispatch::{ActionSink, DispatchAction};

type Script = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

/// LLM stub driven by a closure over the prompt text. Records every prompt.
pub struct ScriptedLlm {
    script: Box<Script>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Classification prompts get `label`; everything else gets `reply`.
    pub fn fixed(label: &'static str, reply: &'static str) -> Self {
        Self::new(move |prompt| {
            if is_classification_prompt(prompt) {
                Ok(label.to_string())
            } else {
                Ok(reply.to_string())
            }
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub fn is_classification_prompt(prompt: &str) -> bool {
    prompt.starts_with("Classify")
}

pub fn upstream_failure() -> LlmError {
    LlmError::RequestFailed {
        provider: "stub".into(),
        reason: "connection reset".into(),
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt.clone());

        let content = (self.script)(&prompt)?;
        Ok(CompletionResponse {
            content,
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
            response_id: None,
        })
    }
}

/// Sink that records actions, optionally failing on one action label.
#[derive(Default)]
pub struct RecordingSink {
    performed: Mutex<Vec<DispatchAction>>,
    fail_on: Option<&'static str>,
}

impl RecordingSink {
    pub fn failing_on(label: &'static str) -> Self {
        Self {
            performed: Mutex::new(Vec::new()),
            fail_on: Some(label),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.performed
            .lock()
            .unwrap()
            .iter()
            .map(DispatchAction::label)
            .collect()
    }
}

#[async_trait]
impl ActionSink for RecordingSink {
    async fn perform(&self, action: &DispatchAction) -> Result<(), TriageError> {
        if self.fail_on == Some(action.label()) {
            return Err(TriageError::Action {
                action: action.label().to_string(),
                reason: "sink unavailable".to_string(),
            });
        }
        self.performed.lock().unwrap().push(action.clone());
        Ok(())
    }
}
