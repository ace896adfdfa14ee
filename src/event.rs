// Lifecycle events emitted by the execution engine

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Event kind tag.
///
/// Built-in kinds are enum variants; extensions register `Custom` tags and
/// wire them into the [`TagHierarchy`](crate::hierarchy::TagHierarchy).
/// `Known`, `FailType` and `Deferred` are abstract ancestor tags: no event
/// carries them directly, handlers register against them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Pass,
    Fail,
    Error,
    Pending,
    BeginSuite,
    EndSuite,
    BeginGroup,
    EndGroup,
    BeginTest,
    EndTest,
    Summary,
    Known,
    FailType,
    Deferred,
    Custom(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
            Self::Pending => "pending",
            Self::BeginSuite => "begin-suite",
            Self::EndSuite => "end-suite",
            Self::BeginGroup => "begin-group",
            Self::EndGroup => "end-group",
            Self::BeginTest => "begin-test",
            Self::EndTest => "end-test",
            Self::Summary => "summary",
            Self::Known => "known",
            Self::FailType => "fail-type",
            Self::Deferred => "deferred",
            Self::Custom(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            "error" => Self::Error,
            "pending" => Self::Pending,
            "begin-suite" => Self::BeginSuite,
            "end-suite" => Self::EndSuite,
            "begin-group" => Self::BeginGroup,
            "end-group" => Self::EndGroup,
            "begin-test" => Self::BeginTest,
            "end-test" => Self::EndTest,
            "summary" => Self::Summary,
            "known" => Self::Known,
            "fail-type" => Self::FailType,
            "deferred" => Self::Deferred,
            _ => Self::Custom(tag.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Kind {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One structured test-lifecycle record.
///
/// An open field set keyed by name; which fields are present depends on the
/// kind. Events are immutable once built: the reporter layer only reads them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub kind: Kind,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Event {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            fields: Map::new(),
        }
    }

    /// Builder-style field attachment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Aggregate count field; absent counts read as zero.
    pub fn count(&self, key: &str) -> u64 {
        self.get(key).and_then(Value::as_u64).unwrap_or(0)
    }

    fn str_seq(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Open "testing under ..." descriptions, most-recent-first.
    pub fn contexts(&self) -> Vec<String> {
        self.str_seq("testing-contexts")
    }

    /// Active named-test stack, innermost-first.
    pub fn vars(&self) -> Vec<String> {
        self.str_seq("testing-vars")
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    pub fn expected(&self) -> Option<&Value> {
        self.get("expected")
    }

    pub fn actual(&self) -> Option<&Value> {
        self.get("actual")
    }

    /// Candidate actual values for an equality assertion, when the engine
    /// compared against a sequence of them.
    pub fn candidates(&self) -> Option<&Vec<Value>> {
        self.get("candidates")?.as_array()
    }

    /// Captured exception frames, outermost call last.
    pub fn backtrace(&self) -> Option<Vec<String>> {
        let frames = self.str_seq("backtrace");
        self.get("backtrace").map(|_| frames)
    }

    /// Stdout/stderr text attached to the originating testable, if any.
    pub fn captured_output(&self) -> Option<&str> {
        self.get("testable")?.get("output")?.as_str()
    }

    /// `file:line` source location when both parts are present.
    pub fn location(&self) -> Option<String> {
        let file = self.str_field("file")?;
        let line = self.get("line").and_then(Value::as_u64)?;
        Some(format!("{file}:{line}"))
    }
}
