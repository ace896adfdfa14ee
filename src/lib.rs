pub mod config;
pub mod dispatch;
pub mod event;
pub mod hierarchy;
pub mod history;
pub mod legacy;
pub mod logging;
pub mod render;
pub mod reporter;
pub mod session;

pub use config::ReportConfig;
pub use dispatch::{Flow, HandlerTable};
pub use event::{Event, Kind};
pub use hierarchy::{HierarchyError, TagHierarchy};
pub use history::History;
pub use legacy::{LegacyForwarder, LegacyHandler};
pub use render::{ContextDiff, Theme, render_failure};
pub use reporter::{Counters, CountersHandle, EventHandler, Reporter, ReporterRegistry, TableHandler};
pub use session::{BufferSink, RunContext, Session};
