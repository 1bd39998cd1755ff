//! Infrastructure layer for herald
//!
//! This crate contains the adapters behind the application ports: the HTTP
//! and in-process resolver backends, the HTTP and in-process tool
//! transports with the sandboxed tool registry, the Ollama chat gateway,
//! the figment configuration loader and the JSONL audit logger.

pub mod config;
pub mod llm;
pub mod logging;
pub mod resolver;
pub mod security;
pub mod tools;
pub mod transport;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use llm::OllamaGateway;
pub use logging::JsonlAuditLogger;
pub use resolver::{HttpResolverClient, LocalResolverBackend, LocalResolverOptions};
pub use tools::{InMemoryManagement, ManagementService, RunnerConfig};
pub use transport::{HttpToolTransport, LocalToolTransport};
