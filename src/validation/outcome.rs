//! Outcome of a form validation run.

use super::BindingId;

/// Result of running [`Form::validate`](super::Form::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormValidation {
    /// Every validatable passed.
    Valid,
    /// At least one validatable failed; carries the earliest-bound offender.
    Invalid(BindingId),
    /// A newer validate/reset cycle started while this run was in flight.
    /// No events were emitted and no focus moved.
    Superseded,
}

impl FormValidation {
    /// Check whether every validatable passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Check whether some validatable failed.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// Check whether this run was superseded by a newer one.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// Get the offending binding (if any).
    pub fn invalid_binding(&self) -> Option<BindingId> {
        match self {
            Self::Invalid(id) => Some(*id),
            _ => None,
        }
    }
}
