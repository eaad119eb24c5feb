//! User-facing rendering of fatal errors.

use crate::core::error::RigupError;

/// Remediation hints attached to an error when it is reported.
pub trait ErrorHelp {
    /// A short hint telling the operator what to check next.
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for RigupError {
    fn help(&self) -> Option<&'static str> {
        match self {
            RigupError::ManifestFetch(_) | RigupError::Http(_) => {
                Some("Check that the server is reachable, or pass another one with --url.")
            }
            RigupError::Environment(_) => Some(
                "Check permissions on the working directory and the user environment. \
                 A backup of the environment is kept in the working directory.",
            ),
            RigupError::Config(_) | RigupError::Yaml(_) => {
                Some("Fix or delete the config file; defaults are recreated on the next run.")
            }
            RigupError::Prompt(_) => Some("Run rigup from an interactive terminal."),
            _ => None,
        }
    }
}

/// Format an error with its hint, if any.
pub fn format_error_with_help(err: &RigupError) -> String {
    match err.help() {
        Some(hint) => format!("Error: {}\n\n  Hint: {}", err, hint),
        None => format!("Error: {}", err),
    }
}
