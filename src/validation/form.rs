//! Form orchestrator: validation lifecycle, submit/reset, focus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::join_all;
use log::{debug, trace};

use super::registry::{BindingId, Registry};
use super::validatable::{BoxFuture, Validatable, Validation, ValidationError};
use super::FormValidation;
use crate::event::{FormEvent, FormEventReceiver, FormEventSender};
use crate::focus::{FocusId, FocusScope, FocusTarget};
use crate::wakeup::{WakeupHandle, WakeupSender};

/// Configuration flags for a [`Form`].
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Move focus into the form on mount and after reset.
    pub autofocus: bool,
    /// Do not move focus to the offending validatable on failure.
    pub no_error_focus: bool,
    /// Suppress the post-reset autofocus.
    pub no_reset_focus: bool,
    /// Failure aggregation policy. Only an explicit `Some(false)` stops at
    /// the first synchronous failure; unset behaves like collect-all.
    pub greedy: Option<bool>,
}

impl FormOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable mount/reset autofocus.
    pub fn with_autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }

    /// Keep focus where it is on validation failure.
    pub fn with_no_error_focus(mut self) -> Self {
        self.no_error_focus = true;
        self
    }

    /// Suppress the post-reset autofocus.
    pub fn with_no_reset_focus(mut self) -> Self {
        self.no_reset_focus = true;
        self
    }

    /// Set the aggregation policy explicitly.
    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = Some(greedy);
        self
    }
}

/// Work queued to run after the host's state updates settle.
#[derive(Debug)]
enum Deferred {
    /// Post-reset continuation: reset validation, then autofocus.
    ResetFollowUp,
}

type NativeSubmit = Arc<dyn Fn() + Send + Sync>;

/// Inner state for [`Form`].
struct FormInner {
    registry: Registry,
    focus: FocusScope,
    events: Option<FormEventSender>,
    native_submit: Option<NativeSubmit>,
    deferred: Vec<Deferred>,
}

/// Orchestrates the validation lifecycle of a group of bound validatables.
///
/// Cheap to clone; clones share state. All methods take `&self`, so a form
/// handle can be captured by handlers and spawned tasks alike.
///
/// # Example
///
/// ```ignore
/// let form = Form::new();
/// let mut events = form.subscribe();
///
/// let name = form.bind(name_field.clone());
///
/// if form.validate().await.is_valid() {
///     // proceed with submission
/// }
/// ```
#[derive(Clone)]
pub struct Form {
    inner: Arc<RwLock<FormInner>>,
    /// Run epoch. Bumped by every validate/reset cycle; a run whose
    /// snapshot no longer matches discards its outcome.
    epoch: Arc<AtomicU64>,
    options: FormOptions,
    wakeup: WakeupHandle,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    /// Create a form with default options.
    pub fn new() -> Self {
        Self::with_options(FormOptions::default())
    }

    /// Create a form with the given options.
    pub fn with_options(options: FormOptions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FormInner {
                registry: Registry::new(),
                focus: FocusScope::new(),
                events: None,
                native_submit: None,
                deferred: Vec::new(),
            })),
            epoch: Arc::new(AtomicU64::new(0)),
            options,
            wakeup: WakeupHandle::new(),
        }
    }

    /// Get the form's options.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    fn read(&self) -> RwLockReadGuard<'_, FormInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // =========================================================================
    // Host wiring
    // =========================================================================

    /// Attach an event sink, returning the receiver.
    ///
    /// Replaces any previously attached sink. While a live sink is
    /// attached, successful submits emit [`FormEvent::Submit`] instead of
    /// invoking the native submit fallback.
    pub fn subscribe(&self) -> FormEventReceiver {
        let (tx, rx) = crate::event::channel();
        self.write().events = Some(tx);
        rx
    }

    /// Install the host's native submission behavior.
    ///
    /// Invoked after a successful validation when no event sink is
    /// attached.
    pub fn set_native_submit(&self, f: impl Fn() + Send + Sync + 'static) {
        self.write().native_submit = Some(Arc::new(f));
    }

    /// Install the wakeup sender (called by the host runtime).
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.wakeup.install(sender);
    }

    /// Replace the focusable descendants reported by the host's render.
    pub fn set_focus_targets(&self, targets: Vec<FocusTarget>) {
        self.write().focus.set_targets(targets);
    }

    /// Take the pending focus request, if any.
    pub fn take_focus_request(&self) -> Option<FocusId> {
        self.write().focus.take_request()
    }

    fn emit(&self, event: FormEvent) {
        if let Some(tx) = self.read().events.as_ref() {
            // Receiver dropped means nobody is listening anymore.
            let _ = tx.send(event);
        }
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Bind a validatable, returning its handle.
    ///
    /// Binding order determines validation order, failure tie-break, and
    /// error-focus priority.
    pub fn bind(&self, validatable: Arc<dyn Validatable>) -> BindingId {
        self.write().registry.bind(validatable)
    }

    /// Unbind by handle. No-op if the handle is not bound.
    pub fn unbind(&self, id: BindingId) {
        if !self.write().registry.unbind(id) {
            trace!("unbind of unknown {id} ignored");
        }
    }

    /// Number of bound validatables.
    pub fn len(&self) -> usize {
        self.read().registry.len()
    }

    /// Check whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.read().registry.is_empty()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate every bound validatable under the configured options.
    ///
    /// Resolves [`FormValidation::Superseded`] without emitting anything
    /// when a newer validate/reset cycle started while deferred results
    /// were still settling.
    pub async fn validate(&self) -> FormValidation {
        self.run_validation(None).await
    }

    /// Validate with an explicit error-focus override.
    pub async fn validate_with_focus(&self, focus: bool) -> FormValidation {
        self.run_validation(Some(focus)).await
    }

    async fn run_validation(&self, force_focus: Option<bool>) -> FormValidation {
        let focus = force_focus.unwrap_or(!self.options.no_error_focus);
        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let fail_fast = self.options.greedy == Some(false);

        let entries = self.read().registry.snapshot();
        trace!(
            "validation run {my_epoch}: {} bound, fail_fast={fail_fast}",
            entries.len()
        );

        let mut sync_failures: Vec<BindingId> = Vec::new();
        let mut pending: Vec<BoxFuture<'static, (BindingId, Result<bool, ValidationError>)>> =
            Vec::new();

        for (id, validatable) in &entries {
            match validatable.validate() {
                Validation::Ready(true) => {}
                Validation::Ready(false) => {
                    if fail_fast {
                        // Remaining validatables are never invoked; any
                        // already-collected deferreds are dropped unawaited.
                        self.report_failure(*id, &entries, focus);
                        return FormValidation::Invalid(*id);
                    }
                    sync_failures.push(*id);
                }
                Validation::Pending(fut) => {
                    let id = *id;
                    pending.push(Box::pin(async move { (id, fut.await) }));
                }
            }
        }

        if pending.is_empty() {
            return match sync_failures.first().copied() {
                None => {
                    self.emit(FormEvent::ValidationSuccess);
                    FormValidation::Valid
                }
                Some(id) => {
                    self.report_failure(id, &entries, focus);
                    FormValidation::Invalid(id)
                }
            };
        }

        let settled = join_all(pending).await;

        if self.epoch.load(Ordering::SeqCst) != my_epoch {
            debug!("validation run {my_epoch} superseded, dropping outcome");
            return FormValidation::Superseded;
        }

        let mut failures = sync_failures;
        for (id, result) in settled {
            match result {
                Ok(true) => {}
                Ok(false) => failures.push(id),
                Err(err) => {
                    debug!("deferred validation for {id} failed: {err}");
                    failures.push(id);
                }
            }
        }

        // First failure means earliest binding order, never settlement
        // order; ids are monotonic so the minimum is the earliest.
        match failures.iter().min().copied() {
            None => {
                self.emit(FormEvent::ValidationSuccess);
                FormValidation::Valid
            }
            Some(id) => {
                self.report_failure(id, &entries, focus);
                FormValidation::Invalid(id)
            }
        }
    }

    fn report_failure(
        &self,
        id: BindingId,
        entries: &[(BindingId, Arc<dyn Validatable>)],
        focus: bool,
    ) {
        debug!("validation failed at {id}");
        self.emit(FormEvent::ValidationError(id));

        if focus {
            if let Some((_, validatable)) = entries.iter().find(|(eid, _)| *eid == id) {
                if !validatable.focus() {
                    trace!("{id} does not support focusing");
                }
            }
        }
    }

    /// Reset validation state on every bound validatable, in binding
    /// order. Invalidates any in-flight validation run.
    pub fn reset_validation(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let entries = self.read().registry.snapshot();
        for (_, validatable) in &entries {
            validatable.reset_validation();
        }
    }

    // =========================================================================
    // Submit / reset
    // =========================================================================

    /// Handle a submit interaction.
    ///
    /// Consumes the interaction event, validates, and on success either
    /// emits [`FormEvent::Submit`] (live sink attached) or invokes the
    /// native submit fallback. Nothing happens on failure or when the run
    /// was superseded.
    pub async fn submit(&self, event: Option<crate::event::InteractionEvent>) {
        if let Some(event) = &event {
            event.consume();
        }

        if !self.validate().await.is_valid() {
            return;
        }

        let sink_attached = self
            .read()
            .events
            .as_ref()
            .is_some_and(|tx| !tx.is_closed());

        if sink_attached {
            self.emit(FormEvent::Submit(event));
            return;
        }

        // Clone out of the lock; the fallback may call back into the form.
        let fallback = self.read().native_submit.clone();
        if let Some(fallback) = fallback {
            fallback();
        }
    }

    /// Handle a reset interaction.
    ///
    /// Consumes the interaction event and emits [`FormEvent::Reset`]
    /// immediately, then queues the reset follow-up (reset validation and,
    /// with autofocus enabled, refocus the form) for the next
    /// [`settle`](Self::settle) pass so the host can restore its values
    /// first.
    pub fn reset(&self, event: Option<crate::event::InteractionEvent>) {
        if let Some(event) = &event {
            event.consume();
        }

        self.emit(FormEvent::Reset);
        self.write().deferred.push(Deferred::ResetFollowUp);
        self.wakeup.send();
    }

    /// Run queued deferred work.
    ///
    /// The host calls this after flushing the state updates its
    /// [`FormEvent::Reset`] handler made.
    pub fn settle(&self) {
        let work: Vec<Deferred> = {
            let mut inner = self.write();
            inner.deferred.drain(..).collect()
        };

        for deferred in work {
            match deferred {
                Deferred::ResetFollowUp => {
                    self.reset_validation();
                    if self.options.autofocus && !self.options.no_reset_focus {
                        self.focus();
                    }
                }
            }
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus into the form: the first autofocus-marked descendant,
    /// else the first with a non-negative tab index. No-op when no target
    /// qualifies.
    pub fn focus(&self) {
        let requested = self.write().focus.request_focus();
        if requested {
            self.wakeup.send();
        } else {
            trace!("focus(): no focusable target");
        }
    }

    /// Initial-mount hook: applies the autofocus option.
    pub fn mount(&self) {
        if self.options.autofocus {
            self.focus();
        }
    }
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("len", &self.len())
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .field("options", &self.options)
            .finish()
    }
}
