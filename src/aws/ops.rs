//! EC2 operations trait for testing

use super::Ec2Fleet;
use crate::instance::Ec2Instance;
use anyhow::Result;
use std::future::Future;

/// Trait for the EC2 operations the reconciler performs.
///
/// This trait abstracts the fleet client to enable unit testing of the
/// pass logic without hitting real AWS.
pub trait Ec2Ops: Send + Sync {
    /// Enumerate every region the compute API advertises
    fn list_regions(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// List every instance in a region
    fn list_instances(
        &self,
        region: &str,
    ) -> impl Future<Output = Result<Vec<Ec2Instance>>> + Send;

    /// Refresh a single instance's metadata
    fn describe_instance(
        &self,
        region: &str,
        instance_id: &str,
    ) -> impl Future<Output = Result<Ec2Instance>> + Send;

    /// Issue a start request
    fn start_instance(
        &self,
        region: &str,
        instance_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Issue a stop request
    fn stop_instance(
        &self,
        region: &str,
        instance_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Block until the instance is running
    fn wait_until_running(
        &self,
        region: &str,
        instance_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Block until the instance is stopped
    fn wait_until_stopped(
        &self,
        region: &str,
        instance_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl Ec2Ops for Ec2Fleet {
    async fn list_regions(&self) -> Result<Vec<String>> {
        Ec2Fleet::list_regions(self).await
    }

    async fn list_instances(&self, region: &str) -> Result<Vec<Ec2Instance>> {
        Ec2Fleet::list_instances(self, region).await
    }

    async fn describe_instance(&self, region: &str, instance_id: &str) -> Result<Ec2Instance> {
        Ec2Fleet::describe_instance(self, region, instance_id).await
    }

    async fn start_instance(&self, region: &str, instance_id: &str) -> Result<()> {
        Ec2Fleet::start_instance(self, region, instance_id).await
    }

    async fn stop_instance(&self, region: &str, instance_id: &str) -> Result<()> {
        Ec2Fleet::stop_instance(self, region, instance_id).await
    }

    async fn wait_until_running(&self, region: &str, instance_id: &str) -> Result<()> {
        Ec2Fleet::wait_until_running(self, region, instance_id).await
    }

    async fn wait_until_stopped(&self, region: &str, instance_id: &str) -> Result<()> {
        Ec2Fleet::wait_until_stopped(self, region, instance_id).await
    }
}
