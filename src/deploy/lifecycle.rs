//! Instance power-state transitions
//!
//! Issue the request, then block until the cloud reports the target state.
//! No timeout is imposed here; API errors propagate to the executor.

use crate::aws::Ec2Ops;
use crate::instance::Ec2Instance;
use anyhow::Result;
use tracing::info;

pub(crate) async fn start_and_wait<C: Ec2Ops>(cloud: &C, instance: &Ec2Instance) -> Result<()> {
    info!(node = %instance.node_name(), "Starting instance");
    cloud.start_instance(&instance.region, &instance.id).await?;
    cloud
        .wait_until_running(&instance.region, &instance.id)
        .await?;
    info!(node = %instance.node_name(), "Instance is running");
    Ok(())
}

pub(crate) async fn stop_and_wait<C: Ec2Ops>(cloud: &C, instance: &Ec2Instance) -> Result<()> {
    info!(node = %instance.node_name(), "Stopping instance");
    cloud.stop_instance(&instance.region, &instance.id).await?;
    cloud
        .wait_until_stopped(&instance.region, &instance.id)
        .await?;
    info!(node = %instance.node_name(), "Instance is stopped");
    Ok(())
}
