//! Terminal confirmation for mutating operations.

use awsop_core::{ConfirmError, ConfirmGate, ConfirmRequest};
use dialoguer::Confirm;
use std::io::IsTerminal;

/// Asks on the terminal. Without a terminal to ask on, the answer is no.
pub struct TerminalConfirm {
    interactive: bool,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal() && std::io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmGate for TerminalConfirm {
    fn confirm(&self, request: &ConfirmRequest) -> Result<bool, ConfirmError> {
        if !self.interactive {
            tracing::warn!("{} needs confirmation but no terminal is attached; use --force", request);
            return Ok(false);
        }
        Confirm::new()
            .with_prompt(format!("Run {}?", request))
            .default(false)
            .interact()
            .map_err(|e| ConfirmError(e.to_string()))
    }
}
