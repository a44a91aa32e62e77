//! Checked transitions for lifecycle enums such as
//! [`StreamState`](crate::domain::notifications::StreamState).

use std::fmt::Debug;
use thiserror::Error;

/// A transition the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot transition from {from:?} to {to:?}")]
pub struct InvalidTransition<S: Debug> {
    pub from: S,
    pub to: S,
}

/// Lifecycle enum with an explicit transition table.
///
/// ```ignore
/// let open = StreamState::Authenticating.transition_to(StreamState::Open)?;
/// assert!(StreamState::Closed.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug {
    /// Targets reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn transition_to(&self, target: Self) -> Result<Self, InvalidTransition<Self>> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(InvalidTransition { from: *self, to: target })
        }
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
