//! Rigup: one-shot developer workstation provisioning
//!
//! Rigup fetches the file list of a curated file server, picks what to
//! install with a fixed policy, then downloads, extracts and silently
//! installs it under one working directory and registers new tool `bin`
//! directories on the user's PATH.

/// Core module re-exported from `rigup-core`.
pub mod core {
    pub use rigup_core::core::*;
    pub use rigup_core::*;

    /// Path module re-exported from rigup-core.
    pub mod path {
        pub use rigup_core::core::path::*;
    }
}

/// Configuration management.
pub mod config;

/// Capability traits and their production and in-memory implementations.
pub mod di;

/// The provisioning pipeline.
pub mod provision;

/// File server client.
pub mod remote;
