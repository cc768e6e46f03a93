//! Reconciliation pass orchestration
//!
//! One pass scans every region, classifies every instance against the
//! enrolled-node set, and dispatches eligible instances to the platform
//! executors. Regions fail independently; a cloud error inside a region
//! abandons only that region's remaining instances.

mod classify;
mod lifecycle;
mod linux;
mod report;
mod windows;

pub use classify::{classify, Action};
pub use report::PassReport;

use crate::aws::{classify_anyhow_error, Ec2Ops};
use crate::credentials::{Keystore, PasswordStore};
use crate::instance::{Ec2Instance, Platform};
use crate::inventory::Inventory;
use crate::knife::KnifeOps;
use crate::outcome::DeployOutcome;
use crate::prompt::Prompt;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, error, info};

/// Retry limits for automatic bootstrap attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Wall-clock budget for Linux bootstrap retries.
    pub linux_budget: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            // Keep trying for 5 minutes
            linux_budget: Duration::from_secs(300),
        }
    }
}

/// All collaborators of a reconciliation pass, constructed once at startup.
pub struct Deployer<C, I, K, P> {
    pub cloud: C,
    pub inventory: I,
    pub knife: K,
    pub prompt: P,
    pub keystore: Keystore,
    pub passwords: PasswordStore,
    pub policy: RetryPolicy,
}

impl<C, I, K, P> Deployer<C, I, K, P>
where
    C: Ec2Ops,
    I: Inventory,
    K: KnifeOps,
    P: Prompt,
{
    /// Run one full reconciliation pass and return its report.
    pub async fn run_pass(&self) -> Result<PassReport> {
        let enrolled = self
            .inventory
            .enrolled_nodes()
            .await
            .context("Failed to read enrolled node list")?;
        info!(enrolled = enrolled.len(), "Starting reconciliation pass");

        let mut report = PassReport::new();
        let regions = self
            .cloud
            .list_regions()
            .await
            .context("Failed to enumerate regions")?;

        for region in &regions {
            debug!(region = %region, "Checking region");

            let instances = match self.cloud.list_instances(region).await {
                Ok(instances) => instances,
                Err(e) => {
                    if classify_anyhow_error(&e).is_access_denied() {
                        error!(region = %region, "Listing denied, skipping region");
                    } else {
                        error!(region = %region, error = ?e, "Listing failed, skipping region");
                    }
                    continue;
                }
            };

            if let Err(e) = self
                .process_region(&instances, &enrolled, &mut report)
                .await
            {
                error!(region = %region, error = ?e, "Abandoning region after cloud error");
            }
        }

        report.log_summary();
        Ok(report)
    }

    async fn process_region(
        &self,
        instances: &[Ec2Instance],
        enrolled: &HashSet<String>,
        report: &mut PassReport,
    ) -> Result<()> {
        for instance in instances {
            let node_name = instance.node_name();
            let outcome = self
                .process_instance(instance, enrolled.contains(&node_name))
                .await?;
            report.record(outcome, node_name);
        }
        Ok(())
    }

    async fn process_instance(
        &self,
        instance: &Ec2Instance,
        enrolled: bool,
    ) -> Result<DeployOutcome> {
        match classify(instance, enrolled) {
            Action::Finish(outcome) => Ok(outcome),
            Action::Bootstrap(Platform::Linux) => {
                linux::deploy_linux(
                    &self.cloud,
                    &self.knife,
                    &self.prompt,
                    &self.keystore,
                    &self.policy,
                    instance,
                )
                .await
            }
            Action::Bootstrap(Platform::Windows) => {
                windows::deploy_windows(
                    &self.cloud,
                    &self.knife,
                    &self.prompt,
                    &self.passwords,
                    instance,
                )
                .await
            }
        }
    }
}
