//! Core utilities shared by the Rigup binary: the error type, config and
//! working-directory path helpers, and PATH-value reconciliation.

pub mod core {
    pub mod error;
    pub mod error_help;
    pub mod path;

    pub use error::{RigupError, RigupResult};
    pub use error_help::{format_error_with_help, ErrorHelp};
}

pub mod path_list;

pub use crate::core::{format_error_with_help, ErrorHelp, RigupError, RigupResult};
