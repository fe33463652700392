//! Status transition rule.
//!
//! A bug may move between statuses only along this fixed table:
//!
//! - open → in-progress, resolved, closed
//! - in-progress → open, resolved, closed
//! - resolved → in-progress, closed, open
//! - closed → open (reopen)
//!
//! Staying in the same status is always allowed.

use crate::models::Status;

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status transition from '{from}' to '{to}'")]
pub struct InvalidTransition {
    pub from: Status,
    pub to: Status,
}

impl Status {
    /// Statuses reachable from this one in a single update, excluding itself.
    pub fn allowed_transitions(&self) -> &'static [Status] {
        match self {
            Status::Open => &[Status::InProgress, Status::Resolved, Status::Closed],
            Status::InProgress => &[Status::Open, Status::Resolved, Status::Closed],
            Status::Resolved => &[Status::InProgress, Status::Closed, Status::Open],
            Status::Closed => &[Status::Open],
        }
    }

    /// Whether an update may change the status from `self` to `next`.
    pub fn can_transition_to(&self, next: Status) -> bool {
        *self == next || self.allowed_transitions().contains(&next)
    }

    /// Checks a transition, returning the target status when allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `next` is not reachable from `self`.
    pub fn transition_to(&self, next: Status) -> Result<Status, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: *self,
                to: next,
            })
        }
    }
}

/// Checks a transition between raw status strings.
///
/// Any side that is absent or not a known status makes the transition
/// invalid, even when both sides are equal.
pub fn is_valid_transition(current: Option<&str>, next: Option<&str>) -> bool {
    let (Some(current), Some(next)) = (current, next) else {
        return false;
    };
    match (current.parse::<Status>(), next.parse::<Status>()) {
        (Ok(current), Ok(next)) => current.can_transition_to(next),
        _ => false,
    }
}
