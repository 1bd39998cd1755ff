//! Execution result types

pub mod entities;

pub use entities::{ExecutionEvent, ExecutionResult};
