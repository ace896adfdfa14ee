// Outcome counters - pass/fail/error/pending tallies

use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde::Serialize;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

/// Per-run outcome tallies.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub pass: usize,
    pub fail: usize,
    pub error: usize,
    pub pending: usize,
}

impl Counters {
    /// Total assertions observed: every pass, fail and error.
    pub fn assertions(&self) -> usize {
        self.pass + self.fail + self.error
    }

    pub fn all_passed(&self) -> bool {
        self.fail == 0 && self.error == 0
    }

    /// Exit-status contract for the surrounding CLI.
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() { 0 } else { 1 }
    }
}

/// Shared counter handle; the mutex keeps increments exact if the host
/// feeds one reporter from parallel workers.
pub type CountersHandle = Arc<Mutex<Counters>>;

fn count_pass(state: &mut CountersHandle, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    state.lock().unwrap().pass += 1;
    Ok(Flow::Continue)
}

fn count_fail(state: &mut CountersHandle, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    state.lock().unwrap().fail += 1;
    Ok(Flow::Continue)
}

fn count_error(state: &mut CountersHandle, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    state.lock().unwrap().error += 1;
    Ok(Flow::Continue)
}

fn count_pending(state: &mut CountersHandle, _event: &Event, _cx: &mut RunContext) -> Result<Flow> {
    state.lock().unwrap().pending += 1;
    Ok(Flow::Continue)
}

/// Counter pipeline stage plus the handle to read final tallies from.
pub fn handler() -> (Box<dyn EventHandler>, CountersHandle) {
    let counters: CountersHandle = Arc::default();
    let table = HandlerTable::new()
        .on(Kind::Pass, count_pass)
        .on(Kind::Fail, count_fail)
        .on(Kind::Error, count_error)
        .on(Kind::Pending, count_pending);
    (
        Box::new(TableHandler::new(Arc::clone(&counters), table)),
        counters,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_outcome_any_interleaving() {
        let mut cx = RunContext::buffered();
        let (mut handler, counts) = handler();

        let kinds = [
            Kind::Fail,
            Kind::Pass,
            Kind::Pending,
            Kind::Error,
            Kind::Pass,
            Kind::Fail,
            Kind::Pass,
        ];
        for kind in kinds {
            handler.handle(&Event::new(kind), &mut cx).unwrap();
        }

        let counts = counts.lock().unwrap();
        assert_eq!(
            *counts,
            Counters {
                pass: 3,
                fail: 2,
                error: 1,
                pending: 1,
            }
        );
        assert_eq!(counts.assertions(), 6);
    }

    #[test]
    fn test_undefined_kinds_are_noops() {
        let mut cx = RunContext::buffered();
        let (mut handler, counts) = handler();

        for kind in [Kind::BeginTest, Kind::EndGroup, Kind::Summary] {
            handler.handle(&Event::new(kind), &mut cx).unwrap();
        }
        assert_eq!(*counts.lock().unwrap(), Counters::default());
    }

    #[test]
    fn test_exit_code_contract() {
        let clean = Counters {
            pass: 4,
            pending: 1,
            ..Counters::default()
        };
        assert_eq!(clean.exit_code(), 0);

        let failed = Counters {
            fail: 1,
            ..Counters::default()
        };
        assert_eq!(failed.exit_code(), 1);

        let errored = Counters {
            error: 1,
            ..Counters::default()
        };
        assert_eq!(errored.exit_code(), 1);
    }

    #[test]
    fn test_counters_serialize() {
        let counts = Counters {
            pass: 2,
            ..Counters::default()
        };
        let value = serde_json::to_value(&counts).unwrap();
        assert_eq!(value["pass"], 2);
        assert_eq!(value["fail"], 0);
    }
}
