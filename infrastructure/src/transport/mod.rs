//! Tool transports — the two interchangeable `execute` implementations

pub mod http;
pub mod local;

pub use http::HttpToolTransport;
pub use local::LocalToolTransport;
