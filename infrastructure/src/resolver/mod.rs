//! Resolver backends — remote HTTP client and the in-process stack

pub mod fuzzy;
pub mod http_client;
pub mod local;

pub use http_client::HttpResolverClient;
pub use local::{LocalResolverBackend, LocalResolverOptions};
