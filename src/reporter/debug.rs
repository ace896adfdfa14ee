// Debug reporter - dumps every event as one JSON line

use std::io::Write as _;

use anyhow::Result;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::Event;
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

fn dump(_state: &mut (), event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let line = serde_json::to_string(event)?;
    writeln!(cx.out, "event: {line}")?;
    Ok(Flow::Continue)
}

pub fn handler() -> Box<dyn EventHandler> {
    Box::new(TableHandler::new(
        (),
        HandlerTable::new().default_handler(dump),
    ))
}
