//! HTTP transport for the counter endpoint.

pub mod http;
