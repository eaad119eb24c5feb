//! Remote file server access.

pub mod client;

pub use client::HttpFileSource;
