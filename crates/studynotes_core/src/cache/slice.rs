//! Loading/error state machine for one cached collection.

/// Operation kinds that carry their own loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    List,
    Fetch,
    Create,
    Update,
    Delete,
}

impl CacheOp {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        match self {
            Self::List => 0,
            Self::Fetch => 1,
            Self::Create => 2,
            Self::Update => 3,
            Self::Delete => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Items, loading flags and last error of one collection.
///
/// Transitions:
/// - `start(op)`: op in flight, previous error cleared.
/// - `succeed(op, apply)`: op done, `apply` edits items.
/// - `fail(op, message)`: op done, items untouched, error recorded.
/// - `discard(op)`: op done, nothing applied (stale response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSlice<T> {
    items: Vec<T>,
    error: Option<String>,
    in_flight: [u32; CacheOp::COUNT],
}

impl<T> Default for CacheSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
            in_flight: [0; CacheOp::COUNT],
        }
    }
}

impl<T> CacheSlice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether any operation is in flight.
    pub fn loading(&self) -> bool {
        self.in_flight.iter().any(|count| *count > 0)
    }

    pub fn is_loading(&self, op: CacheOp) -> bool {
        self.in_flight[op.index()] > 0
    }

    pub fn start(&mut self, op: CacheOp) {
        self.in_flight[op.index()] += 1;
        self.error = None;
    }

    pub fn succeed<F>(&mut self, op: CacheOp, apply: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        self.finish(op);
        apply(&mut self.items);
    }

    pub fn fail(&mut self, op: CacheOp, message: impl Into<String>) {
        self.finish(op);
        self.error = Some(message.into());
    }

    pub fn discard(&mut self, op: CacheOp) {
        self.finish(op);
    }

    /// Edits items outside any operation, for confirmed side-channel changes.
    pub fn edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        edit(&mut self.items);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn finish(&mut self, op: CacheOp) {
        let slot = &mut self.in_flight[op.index()];
        *slot = slot.saturating_sub(1);
    }
}
