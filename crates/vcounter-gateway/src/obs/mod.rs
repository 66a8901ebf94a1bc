//! Observability: tracing subscriber setup and the in-process metrics registry.

pub mod logging;
pub mod metrics;
