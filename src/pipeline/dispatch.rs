//! Category dispatch: turns a classified email into side-effect actions.
//!
//! | Category          | Actions                                      |
//! |-------------------|----------------------------------------------|
//! | `complaint`       | urgent ticket, then complaint acknowledgement |
//! | `inquiry`         | standard reply                               |
//! | `feedback`        | feedback log entry                           |
//! | `support_request` | support ticket                               |
//! | `other`           | standard reply                               |
//!
//! Actions are executed through an `ActionSink`. The default sink only logs.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::TriageError;
use crate::pipeline::types::{Category, Email};

// ── Actions ─────────────────────────────────────────────────────────

/// A concrete side effect produced by dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DispatchAction {
    /// High-priority ticket for a complaint.
    UrgentTicket {
        ticket_id: Uuid,
        email_id: String,
        category: Category,
        context: String,
    },
    /// Complaint-specific acknowledgement sent back to the customer.
    ComplaintAcknowledgement {
        email_id: String,
        to: String,
        reply: String,
    },
    /// Standard acknowledgement sent back to the customer.
    StandardReply {
        email_id: String,
        to: String,
        reply: String,
    },
    /// Feedback body recorded for later review.
    FeedbackLogEntry { email_id: String, feedback: String },
    /// Regular support ticket.
    SupportTicket {
        ticket_id: Uuid,
        email_id: String,
        context: String,
    },
}

impl DispatchAction {
    /// Short label for logging and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UrgentTicket { .. } => "urgent_ticket",
            Self::ComplaintAcknowledgement { .. } => "complaint_acknowledgement",
            Self::StandardReply { .. } => "standard_reply",
            Self::FeedbackLogEntry { .. } => "feedback_log_entry",
            Self::SupportTicket { .. } => "support_ticket",
        }
    }

    pub fn email_id(&self) -> &str {
        match self {
            Self::UrgentTicket { email_id, .. }
            | Self::ComplaintAcknowledgement { email_id, .. }
            | Self::StandardReply { email_id, .. }
            | Self::FeedbackLogEntry { email_id, .. }
            | Self::SupportTicket { email_id, .. } => email_id,
        }
    }
}

// ── Sink ────────────────────────────────────────────────────────────

/// Executes dispatch actions (ticketing, mail sending, feedback storage).
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn perform(&self, action: &DispatchAction) -> Result<(), TriageError>;
}

/// Mock sink: every action becomes a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingActionSink;

#[async_trait]
impl ActionSink for LoggingActionSink {
    async fn perform(&self, action: &DispatchAction) -> Result<(), TriageError> {
        match action {
            DispatchAction::UrgentTicket {
                ticket_id,
                email_id,
                category,
                ..
            } => info!(%ticket_id, email_id = %email_id, category = %category, "Creating urgent ticket"),
            DispatchAction::ComplaintAcknowledgement { email_id, to, .. } => {
                info!(email_id = %email_id, to = %to, "Sending complaint response")
            }
            DispatchAction::StandardReply { email_id, to, .. } => {
                info!(email_id = %email_id, to = %to, "Sending standard response")
            }
            DispatchAction::FeedbackLogEntry { email_id, feedback } => {
                info!(email_id = %email_id, chars = feedback.len(), "Logging customer feedback")
            }
            DispatchAction::SupportTicket {
                ticket_id,
                email_id,
                ..
            } => info!(%ticket_id, email_id = %email_id, "Creating support ticket"),
        }
        Ok(())
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

/// What happened when an email was dispatched.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub performed: Vec<DispatchAction>,
    /// Actions whose sink call failed, with the error message.
    pub failed: Vec<(DispatchAction, String)>,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn performed_labels(&self) -> Vec<String> {
        self.performed.iter().map(|a| a.label().to_string()).collect()
    }
}

/// Routes classified emails to their category's actions.
pub struct Dispatcher {
    sink: Arc<dyn ActionSink>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn ActionSink>) -> Self {
        Self { sink }
    }

    /// Build the actions for a category without executing them.
    pub fn plan(email: &Email, category: Category, reply: &str) -> Vec<DispatchAction> {
        let body = email.body.clone().unwrap_or_default();
        match category {
            Category::Complaint => vec![
                DispatchAction::UrgentTicket {
                    ticket_id: Uuid::new_v4(),
                    email_id: email.id.clone(),
                    category,
                    context: body,
                },
                DispatchAction::ComplaintAcknowledgement {
                    email_id: email.id.clone(),
                    to: email.sender.clone(),
                    reply: reply.to_string(),
                },
            ],
            Category::Inquiry | Category::Other => vec![DispatchAction::StandardReply {
                email_id: email.id.clone(),
                to: email.sender.clone(),
                reply: reply.to_string(),
            }],
            Category::Feedback => vec![DispatchAction::FeedbackLogEntry {
                email_id: email.id.clone(),
                feedback: body,
            }],
            Category::SupportRequest => vec![DispatchAction::SupportTicket {
                ticket_id: Uuid::new_v4(),
                email_id: email.id.clone(),
                context: body,
            }],
        }
    }

    /// Execute every action for `category`.
    ///
    /// A failing action is logged and recorded; the rest still run.
    pub async fn dispatch(&self, email: &Email, category: Category, reply: &str) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for action in Self::plan(email, category, reply) {
            match self.sink.perform(&action).await {
                Ok(()) => outcome.performed.push(action),
                Err(e) => {
                    error!(
                        email_id = %email.id,
                        action = action.label(),
                        error = %e,
                        "Dispatch action failed"
                    );
                    outcome.failed.push((action, e.to_string()));
                }
            }
        }

        outcome
    }

    /// Dispatch from a raw label. Unknown labels perform nothing.
    pub async fn dispatch_label(
        &self,
        email: &Email,
        label: &str,
        reply: &str,
    ) -> Result<DispatchOutcome, TriageError> {
        let category: Category = label.parse().inspect_err(|_| {
            warn!(email_id = %email.id, label = %label, "No handler for category");
        })?;
        Ok(self.dispatch(email, category, reply).await)
    }
}
