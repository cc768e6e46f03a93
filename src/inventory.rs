//! Enrolled-node inventory access
//!
//! Enrollment itself happens as a side effect of `knife bootstrap`; this
//! module only reads the current node list.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::future::Future;
use tokio::process::Command;

/// Read-only view of the configuration-management inventory.
pub trait Inventory: Send + Sync {
    /// The set of currently enrolled node names.
    fn enrolled_nodes(&self) -> impl Future<Output = Result<HashSet<String>>> + Send;
}

/// Inventory backed by `knife node list`.
pub struct KnifeInventory;

impl Inventory for KnifeInventory {
    async fn enrolled_nodes(&self) -> Result<HashSet<String>> {
        let output = Command::new("knife")
            .args(["node", "list"])
            .output()
            .await
            .context("Failed to run `knife node list`")?;

        if !output.status.success() {
            anyhow::bail!(
                "`knife node list` exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(parse_node_list(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// One node name per line; blank lines are ignored.
fn parse_node_list(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_node_per_line() {
        let nodes = parse_node_list("aws.us-east-1.i-1\naws.eu-west-1.i-2\n");
        assert_eq!(nodes.len(), 2);
        assert!(nodes.contains("aws.us-east-1.i-1"));
        assert!(nodes.contains("aws.eu-west-1.i-2"));
    }

    #[test]
    fn skips_blank_lines_and_whitespace() {
        let nodes = parse_node_list("\n  aws.us-east-1.i-1  \n\n");
        assert_eq!(nodes.len(), 1);
        assert!(nodes.contains("aws.us-east-1.i-1"));
    }

    #[test]
    fn empty_output_is_empty_set() {
        assert!(parse_node_list("").is_empty());
    }
}
