//! Email triage pipeline.
//!
//! Every email in a batch flows through:
//! 1. `Classifier::classify()`: LLM picks one `Category`
//! 2. `ResponseGenerator::generate()`: LLM drafts a reply
//! 3. `Dispatcher::dispatch()`: category-specific actions via an `ActionSink`
//!
//! `EmailProcessor` drives the stages and collects a `BatchReport`.

pub mod classifier;
pub mod dispatch;
pub mod processor;
pub mod responder;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use classifier::Classifier;
pub use dispatch::{ActionSink, DispatchAction, DispatchOutcome, Dispatcher, LoggingActionSink};
pub use processor::EmailProcessor;
pub use responder::ResponseGenerator;
pub use types::{BatchReport, BatchSummary, Category, Email, ProcessingResult};
