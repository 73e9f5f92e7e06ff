//! Validatable trait for components that participate in form validation.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Type alias for boxed futures used in async validation.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Diagnostic carried by a deferred validation that failed outright.
///
/// A failed deferred counts as an ordinary invalid result; the message is
/// retained for logging only and never reaches the caller of
/// [`Form::validate`](crate::validation::Form::validate).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Human-readable failure reason.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of invoking a single validatable.
///
/// A component declares up front whether its answer is immediate or
/// deferred; the orchestrator never probes the returned value at runtime.
pub enum Validation {
    /// The component knows its answer synchronously.
    Ready(bool),
    /// The answer arrives later. A settled `Err` counts as invalid.
    Pending(BoxFuture<'static, Result<bool, ValidationError>>),
}

impl Validation {
    /// An immediate result.
    pub fn ready(valid: bool) -> Self {
        Self::Ready(valid)
    }

    /// An immediate pass.
    pub fn valid() -> Self {
        Self::Ready(true)
    }

    /// An immediate failure.
    pub fn invalid() -> Self {
        Self::Ready(false)
    }

    /// A deferred result from an infallible future.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = bool> + Send + 'static,
    {
        Self::Pending(Box::pin(async move { Ok(fut.await) }))
    }

    /// A deferred result from a future that may fail outright.
    pub fn fallible<F>(fut: F) -> Self
    where
        F: Future<Output = Result<bool, ValidationError>> + Send + 'static,
    {
        Self::Pending(Box::pin(fut))
    }

    /// Check whether this is a deferred result.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl std::fmt::Debug for Validation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(valid) => f.debug_tuple("Ready").field(valid).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Trait for components that can be validated by a [`Form`].
///
/// Registered components are invoked in registration order. Focusing is an
/// optional capability; the default implementation reports it unsupported.
///
/// [`Form`]: crate::validation::Form
pub trait Validatable: Send + Sync {
    /// Run this component's validation.
    fn validate(&self) -> Validation;

    /// Clear any recorded validation state.
    ///
    /// Must tolerate being called repeatedly.
    fn reset_validation(&self);

    /// Move input focus to this component.
    ///
    /// Returns `true` if the component handled the request. Components
    /// without a focusable surface keep the default.
    fn focus(&self) -> bool {
        false
    }
}
