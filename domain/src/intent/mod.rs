//! Intent model — the resolver's output vocabulary

pub mod entities;

pub use entities::{Intent, IntentKind, ResolverMeta};
