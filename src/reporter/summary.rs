// End-of-run summary aggregation

use std::io::Write as _;

use anyhow::Result;
use chrono::Local;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::render::render_failure;
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

fn collect(cx: &RunContext, ancestor: &Kind) -> Vec<Event> {
    cx.history
        .events()
        .iter()
        .filter(|e| cx.hierarchy.is_descendant(&e.kind, ancestor))
        .cloned()
        .collect()
}

fn aggregate_line(event: &Event) -> (String, bool, bool) {
    let tests = event.count("test");
    let pass = event.count("pass");
    let fail = event.count("fail");
    let error = event.count("error");
    let pending = event.count("pending");
    let assertions = pass + fail + error;

    let mut line = format!("{tests} tests, {assertions} assertions, ");
    if error > 0 {
        line.push_str(&format!("{error} errors, "));
    }
    if pending > 0 {
        line.push_str(&format!("{pending} pending, "));
    }
    line.push_str(&format!("{fail} failures."));

    (line, fail == 0 && error == 0, pending > 0)
}

fn summarize(_state: &mut (), event: &Event, cx: &mut RunContext) -> Result<Flow> {
    // failures are shown once, together, regardless of interleaving
    for failure in collect(cx, &Kind::FailType) {
        render_failure(&failure, cx)?;
    }

    // deferred kinds get their postponed legacy interpretation now
    for deferred in collect(cx, &Kind::Deferred) {
        cx.legacy.replay(&deferred)?;
    }

    let (line, clean, pending) = aggregate_line(event);
    let colored = if clean && !pending {
        cx.theme.green(&line)
    } else if clean {
        cx.theme.yellow(&line)
    } else {
        cx.theme.red(&line)
    };
    writeln!(cx.out)?;
    writeln!(cx.out, "{colored}")?;

    if let Some(started_at) = cx.started_at {
        let elapsed = Local::now().signed_duration_since(started_at);
        let seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        let note = cx.theme.dim(&format!("Finished in {seconds:.2}s"));
        writeln!(cx.out, "{note}")?;
    }

    Ok(Flow::Continue)
}

pub fn handler() -> Box<dyn EventHandler> {
    Box::new(TableHandler::new(
        (),
        HandlerTable::new().on(Kind::Summary, summarize),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::{LegacyForwarder, LegacyHandler};
    use crate::render::Theme;
    use crate::session::BufferSink;
    use std::sync::{Arc, Mutex};

    fn summary_event(test: u64, pass: u64, fail: u64, error: u64, pending: u64) -> Event {
        Event::new(Kind::Summary)
            .with("test", test)
            .with("pass", pass)
            .with("fail", fail)
            .with("error", error)
            .with("pending", pending)
    }

    #[test]
    fn test_aggregate_line_full() {
        let (line, clean, _) = aggregate_line(&summary_event(1, 1, 1, 1, 0));
        assert_eq!(line, "1 tests, 3 assertions, 1 errors, 1 failures.");
        assert!(!clean);
    }

    #[test]
    fn test_aggregate_line_omits_zero_sections() {
        let (line, clean, pending) = aggregate_line(&summary_event(4, 9, 0, 0, 0));
        assert_eq!(line, "4 tests, 9 assertions, 0 failures.");
        assert!(clean);
        assert!(!pending);
    }

    #[test]
    fn test_aggregate_line_pending_only() {
        let (line, clean, pending) = aggregate_line(&summary_event(2, 1, 0, 0, 1));
        assert_eq!(line, "2 tests, 1 assertions, 1 pending, 0 failures.");
        assert!(clean);
        assert!(pending);
    }

    #[test]
    fn test_summary_reprints_failures_from_history_in_order() {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::plain());
        cx.history.append(Event::new(Kind::Fail).with("name", "first"));
        cx.history.append(Event::new(Kind::Pass));
        cx.history.append(Event::new(Kind::Error).with("name", "second"));

        handler()
            .handle(&summary_event(1, 1, 1, 1, 0), &mut cx)
            .unwrap();

        let text = sink.contents();
        let first = text.find("❌ first").unwrap();
        let second = text.find("❌ second").unwrap();
        assert!(first < second);
        assert!(text.contains("1 tests, 3 assertions, 1 errors, 1 failures."));
    }

    #[derive(Clone, Default)]
    struct Recording {
        seen: Arc<Mutex<Vec<Kind>>>,
    }

    impl LegacyHandler for Recording {
        fn handles(&self, _kind: &Kind) -> bool {
            true
        }

        fn handle(&mut self, event: &Event) -> Result<()> {
            self.seen.lock().unwrap().push(event.kind.clone());
            Ok(())
        }
    }

    #[test]
    fn test_summary_replays_deferred_events_once() {
        let recording = Recording::default();
        let mut cx = RunContext::buffered();
        cx.legacy = LegacyForwarder::with_handler(Box::new(recording.clone()));
        let postponed = Kind::from_tag("postponed");
        cx.hierarchy.derive(postponed.clone(), Kind::Deferred).unwrap();

        cx.history.append(Event::new(postponed.clone()));
        cx.history.append(Event::new(Kind::Pass));

        handler()
            .handle(&summary_event(1, 1, 0, 0, 0), &mut cx)
            .unwrap();
        assert_eq!(*recording.seen.lock().unwrap(), vec![postponed]);
    }

    fn colored_summary(event: Event) -> String {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::colored());
        handler().handle(&event, &mut cx).unwrap();
        sink.contents()
    }

    #[test]
    fn test_failing_summary_line_red() {
        let text = colored_summary(summary_event(1, 0, 1, 0, 0));
        assert!(text.contains("\u{1b}[31m1 tests, 1 assertions, 1 failures.\u{1b}[0m"));
    }

    #[test]
    fn test_clean_summary_line_green() {
        let text = colored_summary(summary_event(2, 2, 0, 0, 0));
        assert!(text.contains("\u{1b}[32m2 tests, 2 assertions, 0 failures.\u{1b}[0m"));
    }

    #[test]
    fn test_pending_summary_line_yellow() {
        let text = colored_summary(summary_event(2, 1, 0, 0, 1));
        assert!(text.contains("\u{1b}[33m2 tests, 1 assertions, 1 pending, 0 failures.\u{1b}[0m"));
    }

    #[test]
    fn test_summary_elapsed_suffix_when_started_at_set() {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::plain());
        cx.started_at = Some(Local::now());

        handler()
            .handle(&summary_event(0, 0, 0, 0, 0), &mut cx)
            .unwrap();
        assert!(sink.contents().contains("Finished in"));
    }
}
