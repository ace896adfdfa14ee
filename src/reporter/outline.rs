// Outline reporter - narrative nesting-context output

use std::io::Write as _;

use anyhow::Result;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::render::ContextDiff;
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

fn begin_suite(state: &mut ContextDiff, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    state.reset();
    Ok(Flow::Continue)
}

fn begin_test(state: &mut ContextDiff, event: &Event, cx: &mut RunContext) -> Result<Flow> {
    state.render(&event.contexts(), &mut cx.out)?;
    if let Some(name) = event.str_field("name") {
        let indent = "  ".repeat(state.depth());
        write!(cx.out, "\n  {indent}- {name}")?;
    }
    Ok(Flow::Continue)
}

// any other event narrates newly entered contexts only
fn trace_contexts(state: &mut ContextDiff, event: &Event, cx: &mut RunContext) -> Result<Flow> {
    if event.get("testing-contexts").is_some() {
        state.render(&event.contexts(), &mut cx.out)?;
    }
    Ok(Flow::Continue)
}

fn finish(state: &mut ContextDiff, event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let flow = trace_contexts(state, event, cx)?;
    writeln!(cx.out)?;
    Ok(flow)
}

pub fn handler() -> Box<dyn EventHandler> {
    let table = HandlerTable::new()
        .on(Kind::BeginSuite, begin_suite)
        .on(Kind::BeginTest, begin_test)
        .on(Kind::Summary, finish)
        .default_handler(trace_contexts);
    Box::new(TableHandler::new(ContextDiff::new(), table))
}
