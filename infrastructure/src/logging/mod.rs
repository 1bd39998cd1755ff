//! Structured logging adapters

pub mod jsonl_audit;

pub use jsonl_audit::JsonlAuditLogger;
