//! Linux bootstrap executor
//!
//! SSH-based `knife bootstrap` under a wall-clock retry budget. Keyfile
//! resolution happens before any mutation; if this executor started the
//! instance, it stops it again on every exit path.

use super::lifecycle;
use super::RetryPolicy;
use crate::aws::Ec2Ops;
use crate::credentials::Keystore;
use crate::instance::{Ec2Instance, InstanceState};
use crate::knife::{KnifeOps, LinuxBootstrap};
use crate::outcome::DeployOutcome;
use crate::prompt::Prompt;
use crate::tags::{DEFAULT_SSH_USER, TAG_SSH_KEYFILE, TAG_SSH_USER};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

pub(crate) async fn deploy_linux<C, K, P>(
    cloud: &C,
    knife: &K,
    prompt: &P,
    keystore: &Keystore,
    policy: &RetryPolicy,
    instance: &Ec2Instance,
) -> Result<DeployOutcome>
where
    C: Ec2Ops,
    K: KnifeOps,
    P: Prompt,
{
    let node_name = instance.node_name();

    // Keyfile resolution comes first; a configuration defect must not
    // touch the instance.
    let keyfile_name = instance
        .tag(TAG_SSH_KEYFILE)
        .map(str::to_string)
        .or_else(|| instance.key_name.clone());
    let Some(keyfile_name) = keyfile_name else {
        error!(node = %node_name, "Unknown keyfile");
        return Ok(DeployOutcome::KeyfileUnknown);
    };
    let Some(keyfile) = keystore.keyfile(&keyfile_name) else {
        error!(node = %node_name, keyfile = %keyfile_name, "Missing keyfile");
        return Ok(DeployOutcome::KeyfileMissing);
    };

    let started_here = instance.state == InstanceState::Stopped;
    if started_here {
        lifecycle::start_and_wait(cloud, instance).await?;
    }

    let result = bootstrap_running(cloud, knife, prompt, policy, instance, keyfile).await;

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
    policy: &RetryPolicy,
    instance: &Ec2Instance,
    keyfile: PathBuf,
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
    let ssh_user = instance
        .tag(TAG_SSH_USER)
        .unwrap_or(DEFAULT_SSH_USER)
        .to_string();

    let request = LinuxBootstrap {
        host,
        ssh_user,
        node_name: node_name.clone(),
        keyfile,
    };

    let budget = policy.linux_budget;
    let started_at = Instant::now();
    loop {
        let elapsed = started_at.elapsed();
        if elapsed >= budget {
            break;
        }
        info!(
            node = %node_name,
            elapsed_secs = elapsed.as_secs(),
            budget_secs = budget.as_secs(),
            "Attempting bootstrap"
        );
        if knife.bootstrap_linux(&request).await? {
            return Ok(DeployOutcome::BootstrapSuccess);
        }
        error!(node = %node_name, "Bootstrap attempt failed");
    }

    // Budget exhausted; this blocks until the operator acknowledges.
    prompt.acknowledge_failure(&node_name);
    Ok(DeployOutcome::BootstrapFailure)
}
