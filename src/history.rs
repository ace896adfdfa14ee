// Append-only event log for the current run

use crate::event::Event;

/// Every event observed since run start, in emission order.
///
/// Written once per processed event, read back at summary time to
/// reconstruct the failure list and replay deferred events. No in-place
/// mutation: the only write operation is [`append`](Self::append).
#[derive(Debug, Default, Clone)]
pub struct History {
    events: Vec<Event>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
