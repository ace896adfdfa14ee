// Progress glyph stream - one character per test outcome

use std::io::Write as _;

use anyhow::Result;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

pub struct ProgressState {
    column: usize,
    wrap: usize,
}

fn put_glyph(state: &mut ProgressState, cx: &mut RunContext, glyph: String) -> Result<Flow> {
    write!(cx.out, "{glyph}")?;
    cx.out.flush()?;

    state.column += 1;
    // wrap of zero means an unbroken glyph line
    if state.wrap > 0 && state.column >= state.wrap {
        writeln!(cx.out)?;
        state.column = 0;
    }
    Ok(Flow::Continue)
}

fn pass(state: &mut ProgressState, _event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let glyph = cx.theme.green(".");
    put_glyph(state, cx, glyph)
}

fn fail(state: &mut ProgressState, _event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let glyph = cx.theme.red("F");
    put_glyph(state, cx, glyph)
}

fn error(state: &mut ProgressState, _event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let glyph = cx.theme.red("E");
    put_glyph(state, cx, glyph)
}

fn pending(state: &mut ProgressState, _event: &Event, cx: &mut RunContext) -> Result<Flow> {
    let glyph = cx.theme.yellow("*");
    put_glyph(state, cx, glyph)
}

// close the glyph line before the summary block starts
fn finish(state: &mut ProgressState, _event: &Event, cx: &mut RunContext) -> Result<Flow> {
    if state.column > 0 {
        writeln!(cx.out)?;
        state.column = 0;
    }
    Ok(Flow::Continue)
}

pub fn handler(wrap: usize) -> Box<dyn EventHandler> {
    let table = HandlerTable::new()
        .on(Kind::Pass, pass)
        .on(Kind::Fail, fail)
        .on(Kind::Error, error)
        .on(Kind::Pending, pending)
        .on(Kind::Summary, finish);
    Box::new(TableHandler::new(ProgressState { column: 0, wrap }, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Theme;
    use crate::session::BufferSink;

    fn run(events: &[Kind], wrap: usize) -> String {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::plain());
        let mut handler = handler(wrap);
        for kind in events {
            handler.handle(&Event::new(kind.clone()), &mut cx).unwrap();
        }
        sink.contents()
    }

    #[test]
    fn test_glyphs_per_outcome() {
        let out = run(&[Kind::Pass, Kind::Fail, Kind::Error, Kind::Pending], 80);
        assert_eq!(out, ".FE*");
    }

    #[test]
    fn test_unrelated_kinds_print_nothing() {
        let out = run(&[Kind::BeginTest, Kind::EndGroup], 80);
        assert_eq!(out, "");
    }

    #[test]
    fn test_line_wraps_at_width() {
        let out = run(&[Kind::Pass, Kind::Pass, Kind::Pass], 2);
        assert_eq!(out, "..\n.");
    }

    #[test]
    fn test_zero_width_never_wraps() {
        let out = run(&[Kind::Pass, Kind::Pass, Kind::Pass, Kind::Fail], 0);
        assert_eq!(out, "...F");
    }

    #[test]
    fn test_summary_closes_open_line() {
        let out = run(&[Kind::Pass, Kind::Summary], 80);
        assert_eq!(out, ".\n");
    }

    #[test]
    fn test_summary_on_clean_column_adds_nothing() {
        let out = run(&[Kind::Pass, Kind::Pass, Kind::Summary], 2);
        assert_eq!(out, "..\n");
    }
}
