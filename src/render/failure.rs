// Failure and error detail rendering

use anyhow::Result;
use dissimilar::{Chunk, diff};
use serde_json::Value;
use std::fmt::Write as _;
use std::io::Write as _;

use crate::event::{Event, Kind};
use crate::render::theme::Theme;
use crate::session::RunContext;

/// External stack-trace formatter seam.
pub type TraceFormatter = fn(&[String]) -> String;

pub fn default_trace_format(frames: &[String]) -> String {
    frames
        .iter()
        .map(|frame| format!("    at {frame}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Colored character diff between an expected and an actual value.
pub fn value_diff(expected: &Value, actual: &Value, theme: &Theme) -> String {
    let expected_str = pretty(expected);
    let actual_str = pretty(actual);

    let mut output = String::new();
    let _ = writeln!(output, "Diff (Expected - / Actual +):");

    for chunk in diff(&expected_str, &actual_str) {
        match chunk {
            Chunk::Equal(text) => output.push_str(&theme.dim(text)),
            Chunk::Delete(text) => output.push_str(&theme.red(text)),
            Chunk::Insert(text) => output.push_str(&theme.green(text)),
        }
    }

    output
}

fn banner_text(event: &Event) -> String {
    let name = match event.str_field("name") {
        Some(name) => name.to_string(),
        None => {
            // reconstruct from the named-test stack, outermost-first
            let mut vars = event.vars();
            vars.reverse();
            vars.join(" ")
        }
    };

    match event.location() {
        Some(location) => format!("❌ {name} ({location})"),
        None => format!("❌ {name}"),
    }
}

/// Prints the full detail block for one fail-type or error-type event.
///
/// Used both immediately (the `failures` reporter) and at end-of-run when
/// the summary replays every failure out of the history.
pub fn render_failure(event: &Event, cx: &mut RunContext) -> Result<()> {
    let banner = cx.theme.banner(&banner_text(event));
    writeln!(cx.out)?;
    writeln!(cx.out, "{banner}")?;

    let contexts = event.contexts();
    if !contexts.is_empty() {
        writeln!(cx.out, "  {}", contexts.join(" "))?;
    }

    if let Some(message) = event.message() {
        writeln!(cx.out, "  {message}")?;
    }

    if cx.hierarchy.is_descendant(&event.kind, &Kind::Error) {
        render_error_body(event, cx)?;
    } else {
        render_assertion_body(event, cx)?;
    }

    render_captured_output(event, cx)?;
    Ok(())
}

fn render_assertion_body(event: &Event, cx: &mut RunContext) -> Result<()> {
    if let (Some(expected), Some(candidates)) = (event.expected(), event.candidates()) {
        // equality assertion against a sequence of candidate actuals
        for candidate in candidates {
            let rendered = value_diff(expected, candidate, &cx.theme);
            writeln!(cx.out, "{rendered}")?;
        }
        return Ok(());
    }

    if let Some(expected) = event.expected() {
        writeln!(cx.out, "  expected: {}", pretty(expected))?;
    }
    if let Some(actual) = event.actual() {
        writeln!(cx.out, "    actual: {}", pretty(actual))?;
    }
    Ok(())
}

fn render_error_body(event: &Event, cx: &mut RunContext) -> Result<()> {
    if let Some(frames) = event.backtrace() {
        let formatted = (cx.trace_fmt)(&frames);
        writeln!(cx.out, "{formatted}")?;
    } else if let Some(actual) = event.actual() {
        writeln!(cx.out, "  raised: {}", pretty(actual))?;
    }
    Ok(())
}

fn render_captured_output(event: &Event, cx: &mut RunContext) -> Result<()> {
    let Some(output) = event.captured_output() else {
        return Ok(());
    };
    let output = output.trim_end_matches('\n');
    if output.is_empty() {
        return Ok(());
    }

    writeln!(cx.out, "  ─── captured output ───")?;
    for line in output.lines() {
        writeln!(cx.out, "  | {line}")?;
    }
    writeln!(cx.out, "  ───────────────────────")?;
    Ok(())
}
