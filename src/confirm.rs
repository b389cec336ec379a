//! # Confirmation Gate
//!
//! Human-in-the-loop safety gate for mutating commands.
//!
//! The gate is an explicit boolean decision, independent of any interactive
//! runtime, so command logic can be tested by injecting both outcomes.
//! A declined confirmation is not an error: the command becomes a no-op.

use std::io::{self, BufRead, Write};
use tracing::debug;

/// Decision function gating a mutating call.
///
/// `target` is the name the decision is keyed on (the database name for
/// policy updates).
pub trait ConfirmationGate: Send + Sync {
    /// Whether the mutating call should proceed
    fn should_proceed(&self, target: &str) -> bool;
}

/// Interactive y/N prompt on stdin.
///
/// `force` short-circuits to proceed without prompting (the `--yes` flag).
/// Policy updates are a low-impact change, so anything other than an
/// explicit yes declines.
#[derive(Debug, Clone, Copy)]
pub struct StdinConfirmation {
    pub force: bool,
}

impl ConfirmationGate for StdinConfirmation {
    fn should_proceed(&self, target: &str) -> bool {
        if self.force {
            debug!("Confirmation bypassed by force flag for '{}'", target);
            return true;
        }

        print!("Set long-term retention policy on database '{target}'? [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Fixed-outcome gate for non-interactive callers and tests
#[derive(Debug, Clone, Copy)]
pub struct PresetDecision(pub bool);

impl ConfirmationGate for PresetDecision {
    fn should_proceed(&self, _target: &str) -> bool {
        self.0
    }
}
