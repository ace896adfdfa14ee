// Incremental "testing under ..." context printing

use std::io::{self, Write};

const MARGIN: &str = "  ";
const INDENT: &str = "  ";

/// Prints only the newly entered frames of the nested context stack.
///
/// Holds one snapshot of the previously printed stack (outermost-first) and
/// re-derives the diff from scratch on every call, so revisiting a context
/// non-monotonically still renders correctly. One instance per reporter
/// lifecycle; reset at each top-level suite boundary.
#[derive(Debug, Default)]
pub struct ContextDiff {
    previous: Vec<String>,
}

impl ContextDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Depth of the currently open stack, for indenting leaf lines.
    pub fn depth(&self) -> usize {
        self.previous.len()
    }

    /// Renders the frames of `current` (most-recent-first) that were not
    /// already printed, each on its own line indented by its nesting depth.
    pub fn render(&mut self, current: &[String], out: &mut dyn Write) -> io::Result<()> {
        let current: Vec<String> = current.iter().rev().cloned().collect();

        let shared = self
            .previous
            .iter()
            .zip(current.iter())
            .take_while(|(prev, cur)| prev == cur)
            .count();

        for (offset, frame) in current[shared..].iter().enumerate() {
            let depth = shared + offset;
            write!(out, "\n{MARGIN}{}{frame}", INDENT.repeat(depth))?;
        }

        self.previous = current;
        Ok(())
    }
}
