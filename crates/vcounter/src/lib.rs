//! Top-level facade crate for vcounter.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use vcounter_core::*;
}

pub mod gateway {
    pub use vcounter_gateway::*;
}
