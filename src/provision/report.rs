use crate::core::RigupError;
use tracing::warn;

/// One item a stage gave up on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub file: String,
    pub reason: String,
}

/// Per-item outcome of one pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemReport {
    /// Items the stage finished, in processing order
    pub completed: Vec<String>,
    /// Items that failed and were skipped
    pub skipped: Vec<Skipped>,
    /// Items the operator declined
    pub declined: Vec<String>,
    /// Items left for the operator to handle by hand
    pub manual: Vec<String>,
}

impl ItemReport {
    pub fn complete(&mut self, file: &str) {
        self.completed.push(file.to_string());
    }

    /// Record and announce a failed item
    pub fn skip(&mut self, stage: &str, file: &str, err: &RigupError) {
        let reason = match err {
            RigupError::Item { reason, .. } => reason.clone(),
            other => other.to_string(),
        };
        warn!(stage, file, error = %reason, "Skipping item");
        println!("⚠ {} failed for {}, skipping: {}", stage, file, reason);
        self.skipped.push(Skipped {
            file: file.to_string(),
            reason,
        });
    }

    pub fn decline(&mut self, stage: &str, file: &str) {
        println!("{} skipped for {}.", stage, file);
        self.declined.push(file.to_string());
    }

    pub fn leave_manual(&mut self, file: &str, note: &str) {
        println!("{}: {}", file, note);
        self.manual.push(file.to_string());
    }

    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
