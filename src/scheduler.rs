//! Pass scheduling and process lifetime
//!
//! One-shot mode runs a single pass and exits with its result. Interval
//! mode runs a pass immediately, then repeats on a fixed period until a
//! termination signal arrives. The signal is only observed between
//! passes, so a pass in flight always runs to completion, and at most one
//! pass is ever in flight.

use crate::aws::Ec2Ops;
use crate::deploy::Deployer;
use crate::inventory::Inventory;
use crate::knife::KnifeOps;
use crate::prompt::Prompt;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

/// How the process schedules reconciliation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run exactly one pass and exit.
    OneShot,
    /// Run a pass immediately, then repeat on this period.
    Interval(Duration),
}

/// Drive the deployer according to the run mode.
pub async fn run<C, I, K, P>(deployer: &Deployer<C, I, K, P>, mode: RunMode) -> Result<()>
where
    C: Ec2Ops,
    I: Inventory,
    K: KnifeOps,
    P: Prompt,
{
    match mode {
        RunMode::OneShot => {
            deployer.run_pass().await?;
            Ok(())
        }
        RunMode::Interval(period) => {
            let mut sigterm =
                signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

            loop {
                // A failed pass is logged and retried on the next tick.
                if let Err(e) = deployer.run_pass().await {
                    error!(error = ?e, "Reconciliation pass failed");
                }

                info!(
                    interval_secs = period.as_secs(),
                    "Sleeping until next pass"
                );
                tokio::select! {
                    _ = tokio::time::sleep(period) => {}
                    _ = sigterm.recv() => {
                        info!("Termination signal received, exiting");
                        break;
                    }
                    result = tokio::signal::ctrl_c() => {
                        result.context("Failed to listen for interrupt")?;
                        info!("Interrupt received, exiting");
                        break;
                    }
                }
            }
            Ok(())
        }
    }
}
