//! Integration tests module
//!
//! Runs the full provisioning pipeline against in-memory fakes and a
//! mock HTTP file server.

pub mod common;
pub mod http;
pub mod pipeline;
