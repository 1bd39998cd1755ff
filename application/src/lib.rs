//! Application layer for herald
//!
//! This crate contains the three pipeline services (resolver, planner,
//! executor), the pipeline use case that chains them, the port definitions
//! their adapters implement, and the configuration value types. It depends
//! only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LlmConfig, ResolverConfig, ResolverMode};
pub use ports::{
    audit::{AuditEvent, AuditSink, NoopAudit},
    chat_gateway::{ChatGateway, ChatGatewayError},
    resolver_backend::{
        BackendError, ResolveConstraints, ResolveContext, ResolveRequest, ResolveResponse,
        ResolverBackend, ResolverBackendConfig,
    },
    transport::{ToolTransport, TransportResponse},
};
pub use use_cases::{
    execute::Executor,
    pipeline::{Pipeline, PipelineOutcome},
    plan::{CommandRule, Planner, PlannerRules, StepRule},
    resolve::ResolverService,
};
