//! Form events and interaction payloads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::validation::BindingId;

/// Notification emitted by a [`Form`](crate::validation::Form).
#[derive(Debug, Clone)]
pub enum FormEvent {
    /// Validation passed and a sink is attached; carries the original
    /// interaction payload, if any.
    Submit(Option<InteractionEvent>),
    /// A reset was requested. Emitted before the deferred reset work runs
    /// so hosts can restore their values first.
    Reset,
    /// A validation run finished with every validatable passing.
    ValidationSuccess,
    /// A validation run failed; names the earliest-bound offender.
    ValidationError(BindingId),
}

/// Sender for form events.
pub type FormEventSender = mpsc::UnboundedSender<FormEvent>;

/// Receiver for form events.
pub type FormEventReceiver = mpsc::UnboundedReceiver<FormEvent>;

/// Create a form event channel pair.
pub fn channel() -> (FormEventSender, FormEventReceiver) {
    mpsc::unbounded_channel()
}

/// A host interaction (native submit/reset trigger) handed to the form.
///
/// Cheap to clone; both halves observe the same flags. The form consumes
/// the event so the host's native action neither fires nor propagates.
#[derive(Debug, Clone, Default)]
pub struct InteractionEvent {
    default_prevented: Arc<AtomicBool>,
    propagation_stopped: Arc<AtomicBool>,
}

impl InteractionEvent {
    /// Create a fresh, unconsumed interaction event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the interaction's default action.
    pub fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }

    /// Stop the interaction from propagating further.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.store(true, Ordering::SeqCst);
    }

    /// Suppress the default action and stop propagation.
    pub fn consume(&self) {
        self.prevent_default();
        self.stop_propagation();
    }

    /// Check whether the default action was suppressed.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }

    /// Check whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.load(Ordering::SeqCst)
    }
}
