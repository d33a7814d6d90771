//! State machine trait for status enums.
//!
//! Every status enum in the billing domain (invoice, subscription, purchase,
//! add-on) is a small state machine. The trait gives all of them a validated
//! `transition_to` for free; saga idempotency guards are built on top of it.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors declare which transitions are legal; `transition_to`
/// validates and performs the change.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if a transition from `self` to `target` is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Performs the transition, returning an error if it is not valid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_transition(self, target))
        }
    }
}
