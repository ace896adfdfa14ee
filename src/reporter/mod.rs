// Reporter module - pluggable event-handler pipelines

pub mod counters;
pub mod debug;
pub mod failfast;
pub mod failures;
pub mod outline;
pub mod progress;
pub mod summary;

use std::collections::HashMap;

use anyhow::{Result, bail};

pub use counters::{Counters, CountersHandle};

use crate::config::ReportConfig;
use crate::dispatch::{Flow, HandlerTable};
use crate::event::Event;
use crate::session::RunContext;

/// One independently stateful pipeline stage of a reporter.
pub trait EventHandler: Send {
    fn handle(&mut self, event: &Event, cx: &mut RunContext) -> Result<Flow>;
}

/// A dispatch table bound to its state, usable as a pipeline stage.
pub struct TableHandler<S> {
    state: S,
    table: HandlerTable<S>,
}

impl<S> TableHandler<S> {
    pub fn new(state: S, table: HandlerTable<S>) -> Self {
        Self { state, table }
    }
}

impl<S: Send> EventHandler for TableHandler<S> {
    fn handle(&mut self, event: &Event, cx: &mut RunContext) -> Result<Flow> {
        self.table.dispatch(&mut self.state, event, cx)
    }
}

/// Named, ordered list of pipeline stages.
///
/// Invocation runs every stage in order for side effect. Stage errors are
/// never swallowed; the first `Abort` short-circuits the rest. Composition
/// is list concatenation.
pub struct Reporter {
    name: String,
    handlers: Vec<Box<dyn EventHandler>>,
}

impl Reporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn with(mut self, handler: Box<dyn EventHandler>) -> Self {
        self.push(handler);
        self
    }

    /// Appends every stage of `other` after this reporter's own.
    pub fn compose(&mut self, other: Reporter) {
        self.handlers.extend(other.handlers);
    }

    pub fn handle(&mut self, event: &Event, cx: &mut RunContext) -> Result<Flow> {
        for handler in &mut self.handlers {
            if handler.handle(event, cx)?.is_abort() {
                return Ok(Flow::Abort);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Builds one reporter from the run configuration. The run context is
/// available so builders can publish shared state on it, the way the
/// standard reporter publishes its counter handle.
pub type ReporterBuilder = fn(&ReportConfig, &mut RunContext) -> Reporter;

/// Name → builder registry for built-in and user-supplied reporters.
pub struct ReporterRegistry {
    builders: HashMap<String, ReporterBuilder>,
}

impl ReporterRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
        };
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register("dots", dots_reporter);
        self.register("outline", outline_reporter);
        self.register("debug", debug_reporter);
        self.register("failures", failures_reporter);
    }

    pub fn register(&mut self, name: &str, builder: ReporterBuilder) {
        self.builders.insert(name.to_string(), builder);
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Maps the configured id list to reporter instances, in order.
    pub fn resolve(&self, config: &ReportConfig, cx: &mut RunContext) -> Result<Vec<Reporter>> {
        let mut reporters = Vec::with_capacity(config.reporters.len());
        for id in &config.reporters {
            let Some(builder) = self.builders.get(id) else {
                bail!("unknown reporter '{id}'");
            };
            tracing::debug!(reporter = %id, "resolved reporter");
            reporters.push(builder(config, cx));
        }
        Ok(reporters)
    }
}

impl Default for ReporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard reporter: glyph stream, counters, end-of-run summary, and the
/// fail-fast check last so the failing event is already counted and printed.
/// The counter handle lands on the context for the host's exit status.
fn dots_reporter(config: &ReportConfig, cx: &mut RunContext) -> Reporter {
    let (counter, handle) = counters::handler();
    cx.counters = Some(handle);
    Reporter::new("dots")
        .with(progress::handler(config.glyph_wrap))
        .with(counter)
        .with(summary::handler())
        .with(failfast::handler())
}

fn outline_reporter(_config: &ReportConfig, _cx: &mut RunContext) -> Reporter {
    Reporter::new("outline").with(outline::handler())
}

fn debug_reporter(_config: &ReportConfig, _cx: &mut RunContext) -> Reporter {
    Reporter::new("debug").with(debug::handler())
}

fn failures_reporter(_config: &ReportConfig, _cx: &mut RunContext) -> Reporter {
    Reporter::new("failures").with(failures::handler())
}
