//! Transient status notifications (loading/success/error/warning).
use std::time::{Duration, Instant};

/// How long a settled toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Loading,
    Success,
    Error,
    Warning,
}

/// Handle returned by [`Toasts::loading`] so the caller can hide it once the request settles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct Toasts {
    next_id: u64,
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        });
        id
    }

    /// Show a loading toast; it stays until [`Toasts::hide`] is called.
    pub fn loading(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Loading, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Error, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> ToastId {
        self.push(ToastKind::Warning, message)
    }

    pub fn hide(&mut self, id: ToastId) {
        self.items.retain(|t| t.id != id);
    }

    /// Drop settled toasts older than [`TOAST_TTL`]. Loading toasts never expire.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| {
            t.kind == ToastKind::Loading || now.saturating_duration_since(t.shown_at) < TOAST_TTL
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if any toast of `kind` is showing.
    pub fn any(&self, kind: ToastKind) -> bool {
        self.items.iter().any(|t| t.kind == kind)
    }

    /// Latest toast, if any.
    pub fn last(&self) -> Option<&Toast> {
        self.items.last()
    }
}
