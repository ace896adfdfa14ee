// Render module - stateful and stateless text rendering

pub mod context_diff;
pub mod failure;
pub mod theme;

pub use context_diff::ContextDiff;
pub use failure::{TraceFormatter, default_trace_format, render_failure, value_diff};
pub use theme::Theme;
