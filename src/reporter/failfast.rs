// Fail-fast controller - aborts the run on the first unhandled failure

use anyhow::Result;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

// registered against the abstract fail-type tag; covers fail, error, and
// any extension kind derived from them
fn check(_state: &mut (), event: &Event, cx: &mut RunContext) -> Result<Flow> {
    if !cx.fail_fast {
        return Ok(Flow::Continue);
    }
    // an already-handled (rethrown) failure was aborted upstream
    if event.bool_field("handled").unwrap_or(false) {
        return Ok(Flow::Continue);
    }
    Ok(Flow::Abort)
}

pub fn handler() -> Box<dyn EventHandler> {
    Box::new(TableHandler::new(
        (),
        HandlerTable::new().on(Kind::FailType, check),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(fail_fast: bool, event: Event) -> Flow {
        let mut cx = RunContext::buffered();
        cx.fail_fast = fail_fast;
        handler().handle(&event, &mut cx).unwrap()
    }

    #[test]
    fn test_aborts_on_first_failure_when_enabled() {
        assert!(run(true, Event::new(Kind::Fail)).is_abort());
        assert!(run(true, Event::new(Kind::Error)).is_abort());
    }

    #[test]
    fn test_covers_derived_extension_kinds() {
        let mut cx = RunContext::buffered();
        cx.fail_fast = true;
        let flaky = Kind::from_tag("flaky");
        cx.hierarchy.derive(flaky.clone(), Kind::Fail).unwrap();

        let flow = handler().handle(&Event::new(flaky), &mut cx).unwrap();
        assert!(flow.is_abort());
    }

    #[test]
    fn test_disabled_never_aborts() {
        assert!(!run(false, Event::new(Kind::Fail)).is_abort());
        assert!(!run(false, Event::new(Kind::Error)).is_abort());
    }

    #[test]
    fn test_handled_marker_suppresses_abort() {
        let event = Event::new(Kind::Fail).with("handled", true);
        assert!(!run(true, event).is_abort());
    }

    #[test]
    fn test_non_failures_never_abort() {
        assert!(!run(true, Event::new(Kind::Pass)).is_abort());
        assert!(!run(true, Event::new(Kind::Pending)).is_abort());
    }
}
