//! Scheduler lifecycle.

use std::fmt;

/// Lifecycle of a [`Scheduler`](super::Scheduler).
///
/// ```text
/// Uninitialized ──▶ Running ──▶ Converged
///                          ├──▶ MaxGenerationsReached
///                          └──▶ Aborted
/// ```
///
/// Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerState {
    Uninitialized,
    Running,
    Converged,
    MaxGenerationsReached,
    Aborted,
}

impl SchedulerState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SchedulerState::Converged | SchedulerState::MaxGenerationsReached | SchedulerState::Aborted
        )
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchedulerState::Uninitialized => "uninitialized",
            SchedulerState::Running => "running",
            SchedulerState::Converged => "converged",
            SchedulerState::MaxGenerationsReached => "max-generations-reached",
            SchedulerState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The best fitness reached the configured target.
    TargetReached,
    /// No significant improvement for `stagnation_limit` generations.
    Stagnation,
    MaxGenerations,
    /// The cancellation token was set.
    Cancelled,
    /// The wall-clock time limit passed.
    TimeLimit,
    /// An operator or the evaluator failed.
    Error,
}

impl StopReason {
    /// The terminal state this reason leads to.
    pub fn state(self) -> SchedulerState {
        match self {
            StopReason::TargetReached | StopReason::Stagnation => SchedulerState::Converged,
            StopReason::MaxGenerations => SchedulerState::MaxGenerationsReached,
            StopReason::Cancelled | StopReason::TimeLimit | StopReason::Error => {
                SchedulerState::Aborted
            }
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::TargetReached => "target fitness reached",
            StopReason::Stagnation => "stagnation",
            StopReason::MaxGenerations => "max generations",
            StopReason::Cancelled => "cancelled",
            StopReason::TimeLimit => "time limit",
            StopReason::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SchedulerState::Uninitialized.is_terminal());
        assert!(!SchedulerState::Running.is_terminal());
        assert!(SchedulerState::Converged.is_terminal());
        assert!(SchedulerState::MaxGenerationsReached.is_terminal());
        assert!(SchedulerState::Aborted.is_terminal());
    }

    #[test]
    fn test_reason_to_state() {
        assert_eq!(StopReason::Stagnation.state(), SchedulerState::Converged);
        assert_eq!(StopReason::TargetReached.state(), SchedulerState::Converged);
        assert_eq!(
            StopReason::MaxGenerations.state(),
            SchedulerState::MaxGenerationsReached
        );
        assert_eq!(StopReason::Cancelled.state(), SchedulerState::Aborted);
        assert_eq!(StopReason::Error.state(), SchedulerState::Aborted);
    }
}
