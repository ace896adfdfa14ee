// Run orchestration - owns per-run state and fans events out to reporters

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::ReportConfig;
use crate::dispatch::Flow;
use crate::event::Event;
use crate::hierarchy::TagHierarchy;
use crate::history::History;
use crate::legacy::LegacyForwarder;
use crate::render::failure::{TraceFormatter, default_trace_format};
use crate::render::theme::Theme;
use crate::reporter::{CountersHandle, Reporter, ReporterRegistry};

/// Shared mutable state of one run, threaded through every handler call.
///
/// Constructed per run and never shared across concurrent runs. Handlers
/// reach the hierarchy, the history and the output sink through it.
pub struct RunContext {
    pub hierarchy: TagHierarchy,
    pub history: History,
    pub fail_fast: bool,
    pub theme: Theme,
    pub trace_fmt: TraceFormatter,
    pub legacy: LegacyForwarder,
    pub started_at: Option<DateTime<Local>>,
    /// Tallies published by a counting reporter, readable after the run.
    pub counters: Option<CountersHandle>,
    pub out: Box<dyn Write + Send>,
}

impl RunContext {
    pub fn new(out: Box<dyn Write + Send>, theme: Theme) -> Self {
        Self {
            hierarchy: TagHierarchy::new(),
            history: History::new(),
            fail_fast: false,
            theme,
            trace_fmt: default_trace_format,
            legacy: LegacyForwarder::new(),
            started_at: None,
            counters: None,
            out,
        }
    }

    /// Context writing colored output to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), Theme::colored())
    }

    /// Context writing plain text into a discarded in-memory buffer.
    /// Keep a [`BufferSink`] clone yourself when the output matters.
    pub fn buffered() -> Self {
        Self::new(Box::new(BufferSink::new()), Theme::plain())
    }
}

/// In-memory output sink, cloneable so tests and capture hosts can read
/// back what the reporters wrote.
#[derive(Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl Write for BufferSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One reporting run: context plus the active reporters, in configured order.
pub struct Session {
    cx: RunContext,
    reporters: Vec<Reporter>,
}

impl Session {
    pub fn new(cx: RunContext, reporters: Vec<Reporter>) -> Self {
        Self { cx, reporters }
    }

    /// Builds a stdout session from a resolved configuration.
    pub fn from_config(config: &ReportConfig, registry: &ReporterRegistry) -> Result<Self> {
        let theme = if config.color {
            Theme::colored()
        } else {
            Theme::plain()
        };
        let mut cx = RunContext::new(Box::new(io::stdout()), theme);
        cx.fail_fast = config.fail_fast;
        cx.started_at = Some(Local::now());

        let reporters = registry.resolve(config, &mut cx)?;
        Ok(Self::new(cx, reporters))
    }

    pub fn context(&self) -> &RunContext {
        &self.cx
    }

    pub fn context_mut(&mut self) -> &mut RunContext {
        &mut self.cx
    }

    /// Handle to the tallies of the counting reporter, when one is active.
    pub fn counters(&self) -> Option<CountersHandle> {
        self.cx.counters.clone()
    }

    /// Processes one lifecycle event.
    ///
    /// Appends to the history exactly once, runs the legacy forwarder once
    /// (independent of reporter configuration), then every reporter in
    /// order. Handler errors propagate untouched; the first `Abort`
    /// short-circuits the remaining reporters and is returned to the engine.
    pub fn process(&mut self, event: Event) -> Result<Flow> {
        self.cx.history.append(event.clone());
        self.cx.legacy.forward(&self.cx.hierarchy, &event)?;

        for reporter in &mut self.reporters {
            if reporter.handle(&event, &mut self.cx)?.is_abort() {
                tracing::debug!(kind = %event.kind, reporter = reporter.name(), "run aborted");
                return Ok(Flow::Abort);
            }
        }
        Ok(Flow::Continue)
    }

    /// Flushes the output sink at end of run.
    pub fn finish(&mut self) -> Result<()> {
        self.cx.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Kind;
    use crate::reporter;

    #[test]
    fn test_history_grows_by_one_per_event() {
        let mut session = Session::new(RunContext::buffered(), Vec::new());
        session.process(Event::new(Kind::Pass)).unwrap();
        session.process(Event::new(Kind::Fail)).unwrap();
        assert_eq!(session.context().history.len(), 2);
    }

    #[test]
    fn test_abort_short_circuits_reporters() {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::plain());
        cx.fail_fast = true;

        // fail-fast first, progress second: the glyph must never print
        let mut aborting = Reporter::new("aborting");
        aborting.push(reporter::failfast::handler());
        aborting.push(reporter::progress::handler(80));

        let mut session = Session::new(cx, vec![aborting]);
        let flow = session.process(Event::new(Kind::Fail)).unwrap();
        assert!(flow.is_abort());
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn test_buffer_sink_round_trip() {
        let sink = BufferSink::new();
        let mut writer = sink.clone();
        writer.write_all(b"hello").unwrap();
        assert_eq!(sink.contents(), "hello");
    }
}
