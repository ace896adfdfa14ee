// Hierarchy-based handler dispatch

use anyhow::Result;

use crate::event::{Event, Kind};
use crate::session::RunContext;

/// Control value returned up the event-processing call chain.
///
/// `Abort` is the fail-fast signal: not an error, but a request to halt the
/// run. The engine distinguishes it from handler failures by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

impl Flow {
    pub fn is_abort(self) -> bool {
        matches!(self, Self::Abort)
    }
}

/// A single dispatchable handler over state `S`.
pub type HandlerFn<S> = fn(&mut S, &Event, &mut RunContext) -> Result<Flow>;

/// One dispatch table: ordered tag registrations plus a default handler.
///
/// A handler registered against an abstract ancestor tag (say `FailType`)
/// transparently covers every concrete kind deriving from it, so tables
/// never need to enumerate concrete kinds.
pub struct HandlerTable<S> {
    entries: Vec<(Kind, HandlerFn<S>)>,
    default: HandlerFn<S>,
}

fn noop<S>(_state: &mut S, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    Ok(Flow::Continue)
}

impl<S> HandlerTable<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            default: noop,
        }
    }

    /// Registers `handler` for `kind` and all its descendants.
    pub fn on(mut self, kind: Kind, handler: HandlerFn<S>) -> Self {
        self.entries.push((kind, handler));
        self
    }

    /// Replaces the no-op fallback invoked when no registration matches.
    pub fn default_handler(mut self, handler: HandlerFn<S>) -> Self {
        self.default = handler;
        self
    }

    /// Resolves the most specific registration for `event.kind` and runs it.
    ///
    /// Specificity is derivation distance: an exact match beats any ancestor
    /// match. Among incomparable ancestors at equal distance, the
    /// earliest-registered entry wins.
    pub fn dispatch(&self, state: &mut S, event: &Event, cx: &mut RunContext) -> Result<Flow> {
        let mut best: Option<(usize, HandlerFn<S>)> = None;
        for (tag, handler) in &self.entries {
            if let Some(distance) = cx.hierarchy.distance(&event.kind, tag)
                && best.is_none_or(|(closest, _)| distance < closest)
            {
                best = Some((distance, *handler));
            }
        }

        match best {
            Some((_, handler)) => handler(state, event, cx),
            None => (self.default)(state, event, cx),
        }
    }
}

impl<S> Default for HandlerTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
