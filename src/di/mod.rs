//! Dependency injection infrastructure for Rigup
//!
//! Every side effect of the provisioning pipeline (network, console,
//! subprocesses, the persistent environment) goes through a trait defined
//! here, so each stage can be tested against in-memory fakes.
//!
//! # Example (Production)
//! ```no_run
//! use rigup::config::Config;
//! use rigup::di::ServiceContainer;
//!
//! # fn example() -> rigup::core::RigupResult<()> {
//! let container = ServiceContainer::new(&Config::default())?;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{Confirmer, EnvStore, FileSource, ProcessOutput, ProcessRunner};
