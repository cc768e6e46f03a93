//! `knife bootstrap` invocation
//!
//! Builds the platform-specific argument vectors and runs knife as a child
//! process. One call is one bootstrap attempt; retry policy lives with the
//! executors in [`crate::deploy`].

use anyhow::{Context, Result};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// Run list applied to every bootstrapped node.
pub const RUN_LIST: &str = "recipe[chef_client_schedule]";

/// Per-connection session timeout passed to knife, in seconds.
pub const SESSION_TIMEOUT_SECS: u32 = 110;

/// Hard cap on one knife invocation; the child is killed past this.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Parameters of a Linux (SSH) bootstrap attempt.
#[derive(Debug, Clone)]
pub struct LinuxBootstrap {
    pub host: String,
    pub ssh_user: String,
    pub node_name: String,
    pub keyfile: PathBuf,
}

/// Parameters of a Windows (WinRM) bootstrap attempt.
#[derive(Debug, Clone)]
pub struct WindowsBootstrap {
    pub host: String,
    pub node_name: String,
    pub password: String,
}

/// Trait for the remote bootstrap action, mockable in tests.
///
/// `Ok(true)` is a successful attempt, `Ok(false)` a failed one (non-zero
/// exit or attempt timeout); `Err` means knife could not be executed at
/// all and propagates distinctly.
pub trait KnifeOps: Send + Sync {
    fn bootstrap_linux(&self, req: &LinuxBootstrap) -> impl Future<Output = Result<bool>> + Send;

    fn bootstrap_windows(
        &self,
        req: &WindowsBootstrap,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Production knife runner.
pub struct KnifeCli;

impl KnifeOps for KnifeCli {
    async fn bootstrap_linux(&self, req: &LinuxBootstrap) -> Result<bool> {
        let args = linux_args(req);
        run_knife(&args, &args.join(" ")).await
    }

    async fn bootstrap_windows(&self, req: &WindowsBootstrap) -> Result<bool> {
        let args = windows_args(req);
        run_knife(&args, &redact_password(&args)).await
    }
}

/// Argument vector for a Linux bootstrap (without the `knife` program name).
fn linux_args(req: &LinuxBootstrap) -> Vec<String> {
    vec![
        "bootstrap".to_string(),
        req.host.clone(),
        "--bootstrap-preinstall-command".to_string(),
        "rm -f /etc/chef/client.pem".to_string(),
        "--connection-protocol".to_string(),
        "ssh".to_string(),
        "--connection-user".to_string(),
        req.ssh_user.clone(),
        "--node-name".to_string(),
        req.node_name.clone(),
        "--run-list".to_string(),
        RUN_LIST.to_string(),
        "--session-timeout".to_string(),
        SESSION_TIMEOUT_SECS.to_string(),
        "--ssh-identity-file".to_string(),
        req.keyfile.display().to_string(),
        "--ssh-verify-host-key".to_string(),
        "never".to_string(),
        "--sudo".to_string(),
    ]
}

/// Argument vector for a Windows bootstrap (without the `knife` program name).
fn windows_args(req: &WindowsBootstrap) -> Vec<String> {
    vec![
        "bootstrap".to_string(),
        req.host.clone(),
        "--connection-password".to_string(),
        req.password.clone(),
        "--connection-protocol".to_string(),
        "winrm".to_string(),
        "--connection-user".to_string(),
        "Administrator".to_string(),
        "--node-name".to_string(),
        req.node_name.clone(),
        "--run-list".to_string(),
        RUN_LIST.to_string(),
        "--session-timeout".to_string(),
        SESSION_TIMEOUT_SECS.to_string(),
    ]
}

/// Loggable form of an argument vector with the connection password hidden.
fn redact_password(args: &[String]) -> String {
    let mut display = Vec::with_capacity(args.len());
    let mut redact_next = false;
    for arg in args {
        if redact_next {
            display.push("<redacted>");
            redact_next = false;
            continue;
        }
        if arg == "--connection-password" {
            redact_next = true;
        }
        display.push(arg);
    }
    display.join(" ")
}

/// Run one knife attempt, inheriting stdio so its output stays visible.
async fn run_knife(args: &[String], display: &str) -> Result<bool> {
    info!("# knife {display}");

    let mut child = Command::new("knife")
        .args(args)
        .spawn()
        .context("Failed to spawn knife")?;

    match tokio::time::timeout(ATTEMPT_TIMEOUT, child.wait()).await {
        Ok(Ok(status)) => Ok(status.success()),
        Ok(Err(e)) => Err(e).context("Failed waiting for knife"),
        Err(_) => {
            warn!(
                timeout_secs = ATTEMPT_TIMEOUT.as_secs(),
                "knife bootstrap attempt timed out, killing process"
            );
            if let Err(e) = child.kill().await {
                warn!(error = %e, "Failed to kill timed-out knife process");
            }
            Ok(false)
        }
    }
}
