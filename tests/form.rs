//! Tests for submit/reset handling, deferred reset work, focus
//! resolution, and host wiring.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use formwork::prelude::*;

/// Validatable that counts resets and reports a scripted result.
struct Probe {
    valid: bool,
    resets: AtomicUsize,
}

impl Probe {
    fn new(valid: bool) -> Arc<Self> {
        Arc::new(Self {
            valid,
            resets: AtomicUsize::new(0),
        })
    }

    fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Validatable for Probe {
    fn validate(&self) -> Validation {
        Validation::ready(self.valid)
    }

    fn reset_validation(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

fn drain(rx: &mut FormEventReceiver) -> Vec<FormEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        events.push(ev);
    }
    events
}

#[tokio::test]
async fn test_submit_emits_when_sink_attached() {
    let form = Form::new();
    let mut rx = form.subscribe();
    form.bind(Probe::new(true));

    let event = InteractionEvent::new();
    form.submit(Some(event.clone())).await;

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], FormEvent::ValidationSuccess));
    assert!(matches!(events[1], FormEvent::Submit(Some(_))));
}

#[tokio::test]
async fn test_submit_falls_back_to_native_submit() {
    let form = Form::new();
    form.bind(Probe::new(true));

    let submits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&submits);
    form.set_native_submit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    form.submit(None).await;
    assert_eq!(submits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_submit_does_nothing() {
    let form = Form::new();
    form.bind(Probe::new(false));

    let submits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&submits);
    form.set_native_submit(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut rx = form.subscribe();
    form.submit(None).await;

    assert_eq!(submits.load(Ordering::SeqCst), 0);
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], FormEvent::ValidationError(_)));
}

#[tokio::test]
async fn test_reset_emits_immediately_and_defers_reset_validation() {
    let form = Form::new();
    let mut rx = form.subscribe();
    let probe = Probe::new(true);
    form.bind(probe.clone());

    let event = InteractionEvent::new();
    form.reset(Some(event.clone()));

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
    assert!(matches!(drain(&mut rx)[..], [FormEvent::Reset]));
    assert_eq!(probe.resets(), 0, "reset work runs on settle, not before");

    form.settle();
    assert_eq!(probe.resets(), 1);

    // An idle settle is a no-op.
    form.settle();
    assert_eq!(probe.resets(), 1);
}

#[test]
fn test_reset_autofocus_after_settle() {
    let form = Form::with_options(FormOptions::new().with_autofocus());
    form.set_focus_targets(vec![
        FocusTarget::new("name", 0),
        FocusTarget::new("email", 1),
    ]);

    form.reset(None);
    assert!(form.take_focus_request().is_none());

    form.settle();
    assert_eq!(form.take_focus_request(), Some(FocusId::new("name")));
}

#[test]
fn test_no_reset_focus_suppresses_autofocus() {
    let form = Form::with_options(FormOptions::new().with_autofocus().with_no_reset_focus());
    form.set_focus_targets(vec![FocusTarget::new("name", 0)]);

    form.reset(None);
    form.settle();
    assert!(form.take_focus_request().is_none());
}

#[test]
fn test_focus_prefers_autofocus_marker() {
    let form = Form::new();
    form.set_focus_targets(vec![
        FocusTarget::new("first", 0),
        FocusTarget::new("marked", 2).with_autofocus(),
    ]);

    form.focus();
    assert_eq!(form.take_focus_request(), Some(FocusId::new("marked")));
}

#[test]
fn test_focus_skips_negative_tab_index() {
    let form = Form::new();
    form.set_focus_targets(vec![
        FocusTarget::new("hidden", -1),
        FocusTarget::new("reachable", 0),
    ]);

    form.focus();
    assert_eq!(form.take_focus_request(), Some(FocusId::new("reachable")));
}

#[test]
fn test_focus_without_target_is_noop() {
    let form = Form::new();
    form.set_focus_targets(vec![FocusTarget::new("hidden", -1)]);

    form.focus();
    assert!(form.take_focus_request().is_none());

    // No targets at all is equally fine.
    form.set_focus_targets(Vec::new());
    form.focus();
    assert!(form.take_focus_request().is_none());
}

#[test]
fn test_mount_applies_autofocus_option() {
    let form = Form::with_options(FormOptions::new().with_autofocus());
    form.set_focus_targets(vec![FocusTarget::new("name", 0)]);
    form.mount();
    assert_eq!(form.take_focus_request(), Some(FocusId::new("name")));

    let plain = Form::new();
    plain.set_focus_targets(vec![FocusTarget::new("name", 0)]);
    plain.mount();
    assert!(plain.take_focus_request().is_none());
}

#[tokio::test]
async fn test_reset_signals_wakeup() {
    let form = Form::new();
    let (tx, mut rx) = formwork::wakeup::channel();
    form.install_wakeup(tx);

    form.reset(None);
    assert_eq!(rx.recv().await, Some(()));
    rx.drain();
}

#[test]
fn test_unbind_absent_handle_is_noop() {
    let form = Form::new();
    let id = form.bind(Probe::new(true));
    assert_eq!(form.len(), 1);

    form.unbind(id);
    assert!(form.is_empty());

    // Unbinding again must not error.
    form.unbind(id);
    assert!(form.is_empty());
}
