use crate::core::{RigupError, RigupResult};
use crate::di::Confirmer;
use std::io::{self, BufRead, Write};

/// Whether a free-text answer means "proceed".
///
/// An empty answer, or one whose lower-cased form starts with `y`, proceeds.
pub fn is_affirmative(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.is_empty() || trimmed.to_lowercase().starts_with('y')
}

/// Confirmer reading answers from the console
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, prompt: &str) -> RigupResult<bool> {
        print!("{} (Y/n): ", prompt);
        io::stdout()
            .flush()
            .map_err(|e| RigupError::Prompt(format!("Failed to write to stdout: {}", e)))?;

        // EOF leaves the answer empty, which proceeds
        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| RigupError::Prompt(format!("Failed to read from stdin: {}", e)))?;

        Ok(is_affirmative(&input))
    }
}
