//! Focus resolution for the form's focusable descendants.

/// Unique identifier for a focusable element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusId(pub String);

impl FocusId {
    /// Create a new focus ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for FocusId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FocusId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One focusable descendant of the form, as reported by the host.
#[derive(Debug, Clone)]
pub struct FocusTarget {
    /// Element identifier.
    pub id: FocusId,
    /// Explicit autofocus marker; wins over tab order.
    pub autofocus: bool,
    /// Tab index; negative means unreachable by form focus.
    pub tab_index: i32,
}

impl FocusTarget {
    /// A plain target with the given tab index.
    pub fn new(id: impl Into<FocusId>, tab_index: i32) -> Self {
        Self {
            id: id.into(),
            autofocus: false,
            tab_index,
        }
    }

    /// Mark this target with the autofocus marker.
    pub fn with_autofocus(mut self) -> Self {
        self.autofocus = true;
        self
    }
}

/// Tracks the form's focusable descendants and a pending focus request.
///
/// The host reports targets during render via `set_targets` and picks up
/// requests with `take_request`, the same handshake the runtime uses for
/// element focus elsewhere.
#[derive(Debug, Default)]
pub struct FocusScope {
    targets: Vec<FocusTarget>,
    request: Option<FocusId>,
}

impl FocusScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list of focusable descendants (document order).
    pub fn set_targets(&mut self, targets: Vec<FocusTarget>) {
        self.targets = targets;
    }

    /// Resolve the element that form focus should land on: the first
    /// autofocus-marked target, else the first with a non-negative tab
    /// index.
    pub fn resolve(&self) -> Option<&FocusTarget> {
        self.targets
            .iter()
            .find(|t| t.autofocus)
            .or_else(|| self.targets.iter().find(|t| t.tab_index >= 0))
    }

    /// File a focus request for the resolved target.
    ///
    /// Returns `false` (and files nothing) when no target qualifies.
    pub fn request_focus(&mut self) -> bool {
        match self.resolve().map(|t| t.id.clone()) {
            Some(id) => {
                self.request = Some(id);
                true
            }
            None => false,
        }
    }

    /// Take the pending focus request, if any.
    pub fn take_request(&mut self) -> Option<FocusId> {
        self.request.take()
    }
}
