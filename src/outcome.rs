//! Per-instance deployment outcomes
//!
//! Every instance scanned during a reconciliation pass resolves to exactly
//! one of these kinds. The set is closed; the reporter matches it
//! exhaustively. A few kinds are part of the audit vocabulary but are not
//! produced by the automatic decision path (e.g. `VpcIgnored`).

/// Result of processing a single instance during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployOutcome {
    /// Bootstrap was attempted and gave up after the retry policy ran out.
    BootstrapFailure,
    /// The node was bootstrapped; it will appear in the inventory on a
    /// later pass.
    BootstrapSuccess,
    /// The node is already enrolled; nothing to do.
    ChefNodeExists,
    /// Reserved: node known to the inventory but absent from the fleet.
    ChefNodeMissing,
    /// The instance opted out via its exclusion tag.
    ExcludedWithTag,
    InstanceStatePending,
    InstanceStateShuttingDown,
    /// Reserved: stopped instances are normally bootstrapped, not skipped.
    InstanceStateStopped,
    InstanceStateStopping,
    InstanceStateTerminated,
    /// The named keyfile does not exist in the keyfile directory.
    KeyfileMissing,
    /// Neither the keyfile tag nor the key-pair name identify a keyfile.
    KeyfileUnknown,
    /// Reserved platform classification kind.
    PlatformIsLinux,
    /// Reserved platform classification kind.
    PlatformIsWindows,
    /// The operator declined to supply credentials for this node.
    Skipped,
    /// Reserved: instance lives in a VPC that is not managed.
    VpcIgnored,
}

impl DeployOutcome {
    /// Audit label, matching the names used in the pass summary.
    pub fn label(&self) -> &'static str {
        match self {
            DeployOutcome::BootstrapFailure => "BOOTSTRAP_FAILURE",
            DeployOutcome::BootstrapSuccess => "BOOTSTRAP_SUCCESS",
            DeployOutcome::ChefNodeExists => "CHEF_NODE_EXISTS",
            DeployOutcome::ChefNodeMissing => "CHEF_NODE_MISSING",
            DeployOutcome::ExcludedWithTag => "EXCLUDED_WITH_TAG",
            DeployOutcome::InstanceStatePending => "INSTANCE_STATE_PENDING",
            DeployOutcome::InstanceStateShuttingDown => "INSTANCE_STATE_SHUTTING_DOWN",
            DeployOutcome::InstanceStateStopped => "INSTANCE_STATE_STOPPED",
            DeployOutcome::InstanceStateStopping => "INSTANCE_STATE_STOPPING",
            DeployOutcome::InstanceStateTerminated => "INSTANCE_STATE_TERMINATED",
            DeployOutcome::KeyfileMissing => "KEYFILE_MISSING",
            DeployOutcome::KeyfileUnknown => "KEYFILE_UNKNOWN",
            DeployOutcome::PlatformIsLinux => "PLATFORM_IS_LINUX",
            DeployOutcome::PlatformIsWindows => "PLATFORM_IS_WINDOWS",
            DeployOutcome::Skipped => "SKIPPED",
            DeployOutcome::VpcIgnored => "VPC_IGNORED",
        }
    }

    /// Whether the pass summary lists every affected node for this kind.
    pub fn report_details(&self) -> bool {
        matches!(
            self,
            DeployOutcome::BootstrapFailure | DeployOutcome::BootstrapSuccess
        )
    }
}

impl std::fmt::Display for DeployOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
