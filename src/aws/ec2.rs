//! EC2 fleet client
//!
//! One client per scanned region, all built from a single loaded SDK
//! config. Instance listings are converted into the crate's own
//! [`Ec2Instance`] model at the API boundary.

use crate::instance::{Ec2Instance, InstanceState, Platform};
use crate::wait::{wait_for_condition, WaitConfig};
use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::types::PlatformValues;
use aws_sdk_ec2::Client;
use std::collections::HashMap;
use tracing::debug;

/// EC2 access spanning every region of the account.
pub struct Ec2Fleet {
    config: SdkConfig,
}

impl Ec2Fleet {
    /// Load AWS configuration (credentials, default region) from the
    /// environment.
    pub async fn new() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self { config }
    }

    /// Client pinned to the account's default region, used for region
    /// enumeration.
    fn home_client(&self) -> Client {
        Client::new(&self.config)
    }

    /// Client pinned to a specific region, sharing the loaded credentials.
    fn client_for(&self, region: &str) -> Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.config)
            .region(Region::new(region.to_string()))
            .build();
        Client::from_conf(conf)
    }

    /// Every region the compute API advertises to this account.
    pub async fn list_regions(&self) -> Result<Vec<String>> {
        let response = self
            .home_client()
            .describe_regions()
            .send()
            .await
            .context("Failed to describe regions")?;

        let regions: Vec<String> = response
            .regions()
            .iter()
            .filter_map(|r| r.region_name().map(|n| n.to_string()))
            .collect();

        debug!(count = regions.len(), "Enumerated regions");
        Ok(regions)
    }

    /// Every instance in one region, regardless of lifecycle state.
    pub async fn list_instances(&self, region: &str) -> Result<Vec<Ec2Instance>> {
        let client = self.client_for(region);
        let mut instances = Vec::new();

        let mut pages = client.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.context("Failed to describe instances")?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    instances.push(instance_from_sdk(region, instance)?);
                }
            }
        }

        debug!(region = %region, count = instances.len(), "Listed instances");
        Ok(instances)
    }

    /// Refresh a single instance's metadata.
    pub async fn describe_instance(&self, region: &str, instance_id: &str) -> Result<Ec2Instance> {
        let response = self
            .client_for(region)
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .context("Failed to describe instance")?;

        let instance = response
            .reservations()
            .first()
            .and_then(|r| r.instances().first())
            .context("Instance not found")?;

        instance_from_sdk(region, instance)
    }

    /// Issue a start request. Does not wait; see [`Self::wait_until_running`].
    pub async fn start_instance(&self, region: &str, instance_id: &str) -> Result<()> {
        self.client_for(region)
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .context("Failed to start instance")?;
        Ok(())
    }

    /// Issue a stop request. Does not wait; see [`Self::wait_until_stopped`].
    pub async fn stop_instance(&self, region: &str, instance_id: &str) -> Result<()> {
        self.client_for(region)
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .context("Failed to stop instance")?;
        Ok(())
    }

    /// Block until the cloud reports the instance running.
    pub async fn wait_until_running(&self, region: &str, instance_id: &str) -> Result<()> {
        self.wait_until_state(region, instance_id, InstanceState::Running)
            .await
    }

    /// Block until the cloud reports the instance stopped.
    pub async fn wait_until_stopped(&self, region: &str, instance_id: &str) -> Result<()> {
        self.wait_until_state(region, instance_id, InstanceState::Stopped)
            .await
    }

    async fn wait_until_state(
        &self,
        region: &str,
        instance_id: &str,
        target: InstanceState,
    ) -> Result<()> {
        wait_for_condition(
            WaitConfig::default(),
            || async {
                let instance = self.describe_instance(region, instance_id).await?;
                Ok(instance.state == target)
            },
            &format!("EC2 instance {} {}", instance_id, target.as_str()),
        )
        .await
    }
}

/// Convert an SDK instance into the crate model.
///
/// An unrecognized lifecycle state is an error, not a skip; it fails the
/// region's listing so the gap is visible.
fn instance_from_sdk(
    region: &str,
    instance: &aws_sdk_ec2::types::Instance,
) -> Result<Ec2Instance> {
    let id = instance
        .instance_id()
        .context("Instance has no ID")?
        .to_string();

    let state_name = instance
        .state()
        .and_then(|s| s.name())
        .with_context(|| format!("Instance {} has no lifecycle state", id))?;
    let state = InstanceState::parse(state_name.as_str())?;

    let platform = if matches!(instance.platform(), Some(PlatformValues::Windows)) {
        Platform::Windows
    } else {
        Platform::Linux
    };

    let tags: HashMap<String, String> = instance
        .tags()
        .iter()
        .filter_map(|t| match (t.key(), t.value()) {
            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
            _ => None,
        })
        .collect();

    let public_dns = instance
        .public_dns_name()
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string());

    Ok(Ec2Instance {
        id,
        region: region.to_string(),
        state,
        platform,
        tags,
        key_name: instance.key_name().map(|k| k.to_string()),
        public_dns,
    })
}
