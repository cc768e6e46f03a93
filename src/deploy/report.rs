//! Pass audit reporting
//!
//! Outcomes are grouped by kind in the order each kind was first observed,
//! so repeated passes over the same fleet produce identical summaries.

use crate::outcome::DeployOutcome;
use tracing::info;

/// Aggregated outcomes of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    groups: Vec<(DeployOutcome, Vec<String>)>,
}

impl PassReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one instance's outcome.
    pub fn record(&mut self, outcome: DeployOutcome, node_name: String) {
        match self.groups.iter_mut().find(|(kind, _)| *kind == outcome) {
            Some((_, nodes)) => nodes.push(node_name),
            None => self.groups.push((outcome, vec![node_name])),
        }
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> &[(DeployOutcome, Vec<String>)] {
        &self.groups
    }

    /// Nodes recorded under one outcome kind.
    pub fn nodes_with(&self, outcome: DeployOutcome) -> &[String] {
        self.groups
            .iter()
            .find(|(kind, _)| *kind == outcome)
            .map(|(_, nodes)| nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of instances recorded.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, nodes)| nodes.len()).sum()
    }

    /// Emit the audit summary: one line per kind with its count, and one
    /// line per node for detail-worthy kinds.
    pub fn log_summary(&self) {
        for (outcome, nodes) in &self.groups {
            info!("### {} ({})", outcome, nodes.len());
            if outcome.report_details() {
                for node in nodes {
                    info!("  {} {}", node, outcome);
                }
            }
        }
    }
}
