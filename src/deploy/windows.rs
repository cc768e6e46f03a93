//! Windows bootstrap executor
//!
//! WinRM-based `knife bootstrap` as `Administrator`. Unlike the Linux
//! path, retries are unbounded and operator-driven. The password prompt
//! happens after a stopped instance is started, so a decline still goes
//! through the guaranteed stop.

use super::lifecycle;
use crate::aws::Ec2Ops;
use crate::credentials::PasswordStore;
use crate::instance::{Ec2Instance, InstanceState};
use crate::knife::{KnifeOps, WindowsBootstrap};
use crate::outcome::DeployOutcome;
use crate::prompt::Prompt;
use anyhow::{Context, Result};
use tracing::{error, info};

pub(crate) async fn deploy_windows<C, K, P>(
    cloud: &C,
    knife: &K,
    prompt: &P,
    passwords: &PasswordStore,
    instance: &Ec2Instance,
) -> Result<DeployOutcome>
where
    C: Ec2Ops,
    K: KnifeOps,
    P: Prompt,
{
    let started_here = instance.state == InstanceState::Stopped;
    if started_here {
        lifecycle::start_and_wait(cloud, instance).await?;
    }

    let result = bootstrap_running(cloud, knife, prompt, passwords, instance).await;

    // Restore the original power state on every path, including errors.
    if started_here {
        lifecycle::stop_and_wait(cloud, instance).await?;
    }

    result
}

async fn bootstrap_running<C, K, P>(
    cloud: &C,
    knife: &K,
    prompt: &P,
    passwords: &PasswordStore,
    instance: &Ec2Instance,
) -> Result<DeployOutcome>
where
    C: Ec2Ops,
    K: KnifeOps,
    P: Prompt,
{
    let node_name = instance.node_name();

    let fresh = cloud
        .describe_instance(&instance.region, &instance.id)
        .await?;
    let host = fresh
        .public_dns
        .with_context(|| format!("Instance {} has no public address", node_name))?;

    info!(node = %node_name, host = %host, "Bootstrapping windows node");

    let password = match passwords.get(&node_name)? {
        Some(password) => {
            info!(
                node = %node_name,
                store = %passwords.path().display(),
                "Using stored Administrator password"
            );
            password
        }
        None => match prompt.request_password(&node_name) {
            Some(password) => {
                // Persisted before the first attempt.
                passwords.set(&node_name, &password)?;
                password
            }
            None => return Ok(DeployOutcome::Skipped),
        },
    };

    let request = WindowsBootstrap {
        host,
        node_name: node_name.clone(),
        password,
    };

    loop {
        if knife.bootstrap_windows(&request).await? {
            return Ok(DeployOutcome::BootstrapSuccess);
        }
        error!(node = %node_name, "Bootstrap attempt failed");
        if !prompt.confirm_retry(&node_name) {
            return Ok(DeployOutcome::BootstrapFailure);
        }
    }
}
