//! Per-resource install states and the aggregate batch report

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where one resource is in the install state machine
///
/// `Pending -> Fetching -> Writing -> Succeeded | Failed`, plus the
/// terminal `Skipped`, `NotAttempted` (batch cancelled or halted first)
/// and `RolledBack` (written, then undone by rollback-on-error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    Pending,
    Fetching,
    Writing,
    Succeeded,
    Failed { reason: String, attempts: u32 },
    Skipped,
    NotAttempted,
    RolledBack,
}

impl InstallState {
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            InstallState::Pending | InstallState::Fetching | InstallState::Writing
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            InstallState::Pending => "pending",
            InstallState::Fetching => "fetching",
            InstallState::Writing => "writing",
            InstallState::Succeeded => "installed",
            InstallState::Failed { .. } => "failed",
            InstallState::Skipped => "skipped",
            InstallState::NotAttempted => "not attempted",
            InstallState::RolledBack => "rolled back",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallState::Failed { reason, attempts } => {
                write!(f, "failed after {attempts} attempt(s): {reason}")
            }
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub id: String,
    /// Resolved destination, `None` when it was rejected
    pub destination: Option<PathBuf>,
    pub state: InstallState,
    /// Content came from the artifact cache instead of the transport
    pub from_cache: bool,
}

impl ResourceOutcome {
    pub(crate) fn pending(id: &str) -> Self {
        Self {
            id: id.to_string(),
            destination: None,
            state: InstallState::Pending,
            from_cache: false,
        }
    }
}

/// Aggregate result of one batch, outcomes in plan order
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    pub outcomes: Vec<ResourceOutcome>,
    pub elapsed: Duration,
    /// The batch stopped early on cancellation
    pub cancelled: bool,
    /// A failure triggered rollback of the batch's writes
    pub rolled_back: bool,
}

impl InstallReport {
    fn count(&self, predicate: impl Fn(&InstallState) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.state))
            .count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|state| *state == InstallState::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(|state| matches!(state, InstallState::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|state| *state == InstallState::Skipped)
    }

    pub fn not_attempted(&self) -> usize {
        self.count(|state| *state == InstallState::NotAttempted)
    }

    pub fn rolled_back_count(&self) -> usize {
        self.count(|state| *state == InstallState::RolledBack)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.state, InstallState::Failed { .. }))
    }

    pub fn outcome(&self, id: &str) -> Option<&ResourceOutcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }

    /// Every resource ended installed or skipped
    pub fn is_success(&self) -> bool {
        !self.cancelled && !self.rolled_back && self.failed() == 0
    }
}
