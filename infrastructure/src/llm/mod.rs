//! Language-model adapters

pub mod ollama;

pub use ollama::OllamaGateway;
