//! Ordered registry of bound validatables.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Validatable;

/// Stable handle for a bound validatable.
///
/// Ids are minted from a process-wide monotonic counter, so within any one
/// registry the key order is exactly the binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(u64);

impl BindingId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__binding_{}", self.0)
    }
}

/// Ordered collection of validatables, keyed by binding handle.
///
/// Removal goes through the handle rather than an identity scan, and
/// iteration works on snapshots so an unbind can never shift indices under
/// a running validation pass.
#[derive(Default)]
pub struct Registry {
    entries: BTreeMap<BindingId, Arc<dyn Validatable>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a validatable, returning its handle.
    pub fn bind(&mut self, validatable: Arc<dyn Validatable>) -> BindingId {
        let id = BindingId::new();
        self.entries.insert(id, validatable);
        id
    }

    /// Unbind by handle. Returns `false` if the handle was not bound.
    pub fn unbind(&mut self, id: BindingId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Look up a bound validatable.
    pub fn get(&self, id: BindingId) -> Option<&Arc<dyn Validatable>> {
        self.entries.get(&id)
    }

    /// Number of bound validatables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone the entries in binding order.
    pub fn snapshot(&self) -> Vec<(BindingId, Arc<dyn Validatable>)> {
        self.entries
            .iter()
            .map(|(id, v)| (*id, Arc::clone(v)))
            .collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entries.len())
            .finish()
    }
}
