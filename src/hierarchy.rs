// Tag hierarchy - registrable is-a graph over event kind tags

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::event::Kind;

/// Hierarchy registration errors
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("deriving '{child}' from '{parent}' would create a cycle")]
    Cycle { child: Kind, parent: Kind },
}

/// Is-a forest over kind tags.
///
/// Reflexive and transitively closed for queries; mutated only through
/// [`derive`](Self::derive). Dispatch assumes a DAG, so cycles are rejected
/// at registration time.
#[derive(Debug, Clone)]
pub struct TagHierarchy {
    parents: HashMap<Kind, Vec<Kind>>,
}

impl TagHierarchy {
    /// Hierarchy pre-seeded with the built-in kinds.
    ///
    /// Every built-in concrete kind descends from `Known`; `Fail` and
    /// `Error` additionally descend from `FailType`.
    pub fn new() -> Self {
        let mut hierarchy = Self {
            parents: HashMap::new(),
        };

        let edges = [
            (Kind::FailType, Kind::Known),
            (Kind::Deferred, Kind::Known),
            (Kind::Fail, Kind::FailType),
            (Kind::Error, Kind::FailType),
            (Kind::Pass, Kind::Known),
            (Kind::Pending, Kind::Known),
            (Kind::BeginSuite, Kind::Known),
            (Kind::EndSuite, Kind::Known),
            (Kind::BeginGroup, Kind::Known),
            (Kind::EndGroup, Kind::Known),
            (Kind::BeginTest, Kind::Known),
            (Kind::EndTest, Kind::Known),
            (Kind::Summary, Kind::Known),
        ];
        for (child, parent) in edges {
            hierarchy.parents.entry(child).or_default().push(parent);
        }

        hierarchy
    }

    /// Registers `child` is-a `parent`.
    ///
    /// Fails without mutating the hierarchy if the edge would close a cycle.
    /// Re-registering an existing edge is a no-op.
    pub fn derive(&mut self, child: Kind, parent: Kind) -> Result<(), HierarchyError> {
        if self.is_descendant(&parent, &child) {
            return Err(HierarchyError::Cycle { child, parent });
        }

        let parents = self.parents.entry(child).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
        Ok(())
    }

    /// True iff `ancestor` is reachable from `tag` via zero or more edges.
    pub fn is_descendant(&self, tag: &Kind, ancestor: &Kind) -> bool {
        self.distance(tag, ancestor).is_some()
    }

    /// Shortest derivation path from `tag` up to `ancestor`.
    ///
    /// `Some(0)` for an exact match; `None` when unreachable. Dispatch uses
    /// this as its specificity measure.
    pub fn distance(&self, tag: &Kind, ancestor: &Kind) -> Option<usize> {
        if tag == ancestor {
            return Some(0);
        }

        let mut visited: HashSet<&Kind> = HashSet::new();
        let mut queue: VecDeque<(&Kind, usize)> = VecDeque::new();
        queue.push_back((tag, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if let Some(parents) = self.parents.get(current) {
                for parent in parents {
                    if parent == ancestor {
                        return Some(depth + 1);
                    }
                    if visited.insert(parent) {
                        queue.push_back((parent, depth + 1));
                    }
                }
            }
        }

        None
    }
}

impl Default for TagHierarchy {
    fn default() -> Self {
        Self::new()
    }
}
