//! Operator confirmation port
//!
//! The deployment engine calls these synchronously and blocks until the
//! operator answers. Non-interactive deployments substitute
//! [`AutoDecline`], which never blocks.

use dialoguer::{Confirm, Input, Password};
use tracing::warn;

/// Interactive decision points during a pass.
pub trait Prompt: Send + Sync {
    /// Escalation gate after the Linux retry budget is exhausted; returns
    /// once the operator acknowledges the failure.
    fn acknowledge_failure(&self, node_name: &str);

    /// Ask for a node's Administrator password. `None` means the operator
    /// declined and the node is skipped.
    fn request_password(&self, node_name: &str) -> Option<String>;

    /// Ask whether to retry a failed Windows bootstrap attempt.
    fn confirm_retry(&self, node_name: &str) -> bool;
}

/// Terminal prompts for an attended run.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn acknowledge_failure(&self, node_name: &str) {
        let result = Input::<String>::new()
            .with_prompt(format!(
                "{node_name}: bootstrap failed, press <Enter> to continue"
            ))
            .allow_empty(true)
            .interact_text();
        if let Err(e) = result {
            warn!(node = %node_name, error = %e, "Failure acknowledgment prompt unavailable");
        }
    }

    fn request_password(&self, node_name: &str) -> Option<String> {
        let entered = Password::new()
            .with_prompt(format!(
                "{node_name}: enter Administrator password (or n to cancel)"
            ))
            .allow_empty_password(true)
            .interact();
        match entered {
            Ok(password) if password == "n" || password.is_empty() => None,
            Ok(password) => Some(password),
            Err(e) => {
                warn!(node = %node_name, error = %e, "Password prompt unavailable, skipping node");
                None
            }
        }
    }

    fn confirm_retry(&self, node_name: &str) -> bool {
        Confirm::new()
            .with_prompt(format!("{node_name}: bootstrap failed, try again?"))
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

/// Unattended policy: never blocks, declines everything.
pub struct AutoDecline;

impl Prompt for AutoDecline {
    fn acknowledge_failure(&self, node_name: &str) {
        warn!(node = %node_name, "Bootstrap failed, continuing without acknowledgment");
    }

    fn request_password(&self, node_name: &str) -> Option<String> {
        warn!(node = %node_name, "No stored password and prompting disabled, skipping node");
        None
    }

    fn confirm_retry(&self, _node_name: &str) -> bool {
        false
    }
}
