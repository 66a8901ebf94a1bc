//! vcounter gateway library entry.
//!
//! Wires config, store backends, metrics, and the HTTP surface around
//! `vcounter_core::VisitorCounter`. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
pub mod transport;
