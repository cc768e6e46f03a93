//! Per-instance decision table
//!
//! Pure classification; every side effect lives with the executors.

use crate::instance::{Ec2Instance, InstanceState, Platform};
use crate::outcome::DeployOutcome;
use crate::tags::TAG_INSTALL_CHEF;

/// What the pass should do with one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The outcome is already decided; no mutation takes place.
    Finish(DeployOutcome),
    /// Eligible for enrollment; dispatch to the platform executor.
    Bootstrap(Platform),
}

/// Classify an instance given whether its node name is already enrolled.
///
/// Enrollment wins over every other check: an enrolled instance is never
/// re-bootstrapped or power-cycled. The exclusion tag is checked next,
/// then the lifecycle state decides between skipping and bootstrapping.
pub fn classify(instance: &Ec2Instance, enrolled: bool) -> Action {
    if enrolled {
        return Action::Finish(DeployOutcome::ChefNodeExists);
    }
    if instance.tag(TAG_INSTALL_CHEF) == Some("false") {
        return Action::Finish(DeployOutcome::ExcludedWithTag);
    }
    match instance.state {
        InstanceState::Pending => Action::Finish(DeployOutcome::InstanceStatePending),
        InstanceState::ShuttingDown => Action::Finish(DeployOutcome::InstanceStateShuttingDown),
        InstanceState::Stopping => Action::Finish(DeployOutcome::InstanceStateStopping),
        InstanceState::Terminated => Action::Finish(DeployOutcome::InstanceStateTerminated),
        InstanceState::Running | InstanceState::Stopped => {
            Action::Bootstrap(instance.platform)
        }
    }
}
