//! Reference field implementation and built-in validation rules.
//!
//! [`Field`] is a reactive value cell carrying sync and async rules. It
//! implements [`Validatable`], so it binds directly to a
//! [`Form`](super::Form):
//!
//! ```ignore
//! let email: Field<String> = Field::builder(String::new())
//!     .required("Email is required")
//!     .email("Please enter a valid email")
//!     .build();
//!
//! let form = Form::new();
//! form.bind(Arc::new(email.clone()));
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use std::future::Future;

use super::validatable::{BoxFuture, Validatable, Validation};

/// Type alias for sync validation rule closures.
type SyncRule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

/// Type alias for async validation rule closures.
type AsyncRule<V> = Box<dyn Fn(V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// Unique identifier for a Field instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__field_{}", self.0)
    }
}

/// Internal state for a field.
#[derive(Debug)]
struct FieldInner<V> {
    value: V,
    error: Option<String>,
}

/// A validated value cell.
///
/// Cheap to clone; clones share value, error slot, and focus flag, so a
/// host can hold one handle while the form validates another.
pub struct Field<V> {
    id: FieldId,
    inner: Arc<RwLock<FieldInner<V>>>,
    sync_rules: Arc<Vec<SyncRule<V>>>,
    async_rules: Arc<Vec<AsyncRule<V>>>,
    /// Focus request flag, checked by the host runtime.
    focus_requested: Arc<AtomicBool>,
}

impl<V> Clone for Field<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            sync_rules: Arc::clone(&self.sync_rules),
            async_rules: Arc::clone(&self.async_rules),
            focus_requested: Arc::clone(&self.focus_requested),
        }
    }
}

impl<V> Field<V> {
    /// Start building a field with the given initial value.
    pub fn builder(initial: V) -> FieldBuilder<V> {
        FieldBuilder {
            initial,
            sync_rules: Vec::new(),
            async_rules: Vec::new(),
        }
    }

    /// A rule-less field.
    pub fn new(initial: V) -> Self {
        Self::builder(initial).build()
    }

    /// This field's id.
    pub fn id(&self) -> FieldId {
        self.id
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FieldInner<V>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FieldInner<V>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Get a clone of the current value.
    pub fn value(&self) -> V
    where
        V: Clone,
    {
        self.read().value.clone()
    }

    /// Set a new value.
    pub fn set(&self, value: V) {
        self.write().value = value;
    }

    /// The current validation error message (if any).
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Check if the field carries a validation error.
    pub fn has_error(&self) -> bool {
        self.read().error.is_some()
    }

    /// Set a validation error.
    pub fn set_error(&self, msg: impl Into<String>) {
        self.write().error = Some(msg.into());
    }

    /// Clear the validation error.
    pub fn clear_error(&self) {
        self.write().error = None;
    }

    /// Take the pending focus request, if any.
    pub fn take_focus_request(&self) -> bool {
        self.focus_requested.swap(false, Ordering::SeqCst)
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Field<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("value", &inner.value)
            .field("error", &inner.error)
            .finish()
    }
}

fn store_error<V>(inner: &Arc<RwLock<FieldInner<V>>>, error: Option<String>) {
    let mut guard = inner.write().unwrap_or_else(|e| e.into_inner());
    guard.error = error;
}

impl<V: Clone + Send + Sync + 'static> Validatable for Field<V> {
    fn validate(&self) -> Validation {
        let value = self.value();

        for rule in self.sync_rules.iter() {
            if let Err(msg) = rule(&value) {
                store_error(&self.inner, Some(msg));
                return Validation::invalid();
            }
        }

        if self.async_rules.is_empty() {
            store_error(&self.inner, None);
            return Validation::valid();
        }

        let rules = Arc::clone(&self.async_rules);
        let inner = Arc::clone(&self.inner);
        Validation::pending(async move {
            for rule in rules.iter() {
                if let Err(msg) = rule(value.clone()).await {
                    store_error(&inner, Some(msg));
                    return false;
                }
            }
            store_error(&inner, None);
            true
        })
    }

    fn reset_validation(&self) {
        self.clear_error();
    }

    fn focus(&self) -> bool {
        self.focus_requested.store(true, Ordering::SeqCst);
        true
    }
}

/// Builder for a [`Field`]'s rule set.
pub struct FieldBuilder<V> {
    initial: V,
    sync_rules: Vec<SyncRule<V>>,
    async_rules: Vec<AsyncRule<V>>,
}

impl<V> FieldBuilder<V> {
    /// Finish building.
    pub fn build(self) -> Field<V> {
        Field {
            id: FieldId::new(),
            inner: Arc::new(RwLock::new(FieldInner {
                value: self.initial,
                error: None,
            })),
            sync_rules: Arc::new(self.sync_rules),
            async_rules: Arc::new(self.async_rules),
            focus_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> FieldBuilder<V> {
    /// Add a custom synchronous validation rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.sync_rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Add a custom asynchronous validation rule.
    pub fn rule_async<F, Fut>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        self.async_rules.push(Box::new(move |v| {
            let fut = f(v);
            let msg = msg.clone();
            Box::pin(async move { if fut.await { Ok(()) } else { Err(msg) } })
        }));
        self
    }
}

// Built-in rules for String values
impl FieldBuilder<String> {
    /// Require the field to be non-empty.
    pub fn required(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        self.rule(move |v| re.is_match(v), msg)
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(
            |v| {
                if v.is_empty() {
                    true // Empty is valid; use required() for non-empty
                } else {
                    email_address::EmailAddress::is_valid(v)
                }
            },
            msg,
        )
    }

    /// Require the value to equal another value.
    pub fn equals(self, other: String, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v == &other, msg)
    }
}

// Built-in rules for bool values
impl FieldBuilder<bool> {
    /// Require the checkbox to be checked.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|&v| v, msg)
    }

    /// Require the checkbox to be unchecked.
    pub fn unchecked(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|&v| !v, msg)
    }
}

// Built-in rules for Option<usize> values
impl FieldBuilder<Option<usize>> {
    /// Require that an option is selected.
    pub fn selected(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|v| v.is_some(), msg)
    }
}
