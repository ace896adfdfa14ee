// Legacy forwarding - compatibility seam for unadopted event kinds

use anyhow::Result;

use crate::event::{Event, Kind};
use crate::hierarchy::TagHierarchy;

/// External default-handling mechanism, interface only.
///
/// Third-party extensions that predate the tag hierarchy register their
/// formatting there; this crate only decides when to hand an event over.
pub trait LegacyHandler: Send {
    /// Whether the mechanism has a handler for this kind at all.
    fn handles(&self, kind: &Kind) -> bool;

    fn handle(&mut self, event: &Event) -> Result<()>;
}

/// Routes events of unadopted kinds to the external mechanism.
#[derive(Default)]
pub struct LegacyForwarder {
    handler: Option<Box<dyn LegacyHandler>>,
}

impl LegacyForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(handler: Box<dyn LegacyHandler>) -> Self {
        Self {
            handler: Some(handler),
        }
    }

    /// Immediate forwarding path, run once per event by the session.
    ///
    /// Kinds adopted into the hierarchy (descendants of `Known`) are never
    /// forwarded. Returns whether the external handler was invoked.
    pub fn forward(&mut self, hierarchy: &TagHierarchy, event: &Event) -> Result<bool> {
        if hierarchy.is_descendant(&event.kind, &Kind::Known) {
            return Ok(false);
        }
        self.replay(event)
    }

    /// Deferred replay path, used by summary aggregation.
    ///
    /// Skips the `Known` check: deferred kinds are adopted tags whose
    /// interpretation is still delegated to the external mechanism.
    pub fn replay(&mut self, event: &Event) -> Result<bool> {
        match &mut self.handler {
            Some(handler) if handler.handles(&event.kind) => {
                handler.handle(event)?;
                Ok(true)
            }
            _ => {
                tracing::debug!(kind = %event.kind, "no legacy handler for kind, skipping");
                Ok(false)
            }
        }
    }
}
