//! mail-triage: LLM email classification, reply drafting and dispatch.

pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod sample;
pub mod text;
