// Immediate failure detail - prints the full block as failures happen

use anyhow::Result;

use crate::dispatch::{Flow, HandlerTable};
use crate::event::{Event, Kind};
use crate::render::render_failure;
use crate::reporter::{EventHandler, TableHandler};
use crate::session::RunContext;

fn detail(_state: &mut (), event: &Event, cx: &mut RunContext) -> Result<Flow> {
    render_failure(event, cx)?;
    Ok(Flow::Continue)
}

pub fn handler() -> Box<dyn EventHandler> {
    Box::new(TableHandler::new(
        (),
        HandlerTable::new().on(Kind::FailType, detail),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Theme;
    use crate::session::BufferSink;

    #[test]
    fn test_prints_detail_for_failures_only() {
        let sink = BufferSink::new();
        let mut cx = RunContext::new(Box::new(sink.clone()), Theme::plain());
        let mut handler = handler();

        handler.handle(&Event::new(Kind::Pass), &mut cx).unwrap();
        assert_eq!(sink.contents(), "");

        handler
            .handle(&Event::new(Kind::Fail).with("name", "adds"), &mut cx)
            .unwrap();
        assert!(sink.contents().contains("❌ adds"));
    }
}
