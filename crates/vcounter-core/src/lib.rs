//! vcounter core: the counter record, the document store contract, and the
//! read/increment/write sequence that backs the visitor endpoint.
//!
//! This crate carries no transport or runtime dependencies. The gateway plugs a
//! concrete [`store::DocumentStore`] in and exposes [`counter::VisitorCounter`]
//! over HTTP.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `CounterError`/`Result` so a bad store
//! response never takes the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod error;
pub mod record;
pub mod store;

pub use counter::VisitorCounter;
/// Shared result type.
pub use error::{CounterError, Result};
pub use record::{CounterRecord, COUNTER_ID};
pub use store::{DocumentStore, ReadOutcome};
