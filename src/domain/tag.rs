use std::collections::HashMap;

use git2::Oid;

/// Whether a tag is a plain reference or a tag object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagKind {
    Lightweight,
    Annotated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagEntry {
    name: String,
    kind: TagKind,
}

/// Known tag name for each tagged commit
///
/// When several tags point at the same commit an annotated tag always
/// replaces a lightweight one. Between tags of the same kind the greatest
/// name wins, so the outcome never depends on enumeration order.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: HashMap<Oid, TagEntry>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tag on `commit`, applying the precedence rule
    pub fn insert(&mut self, commit: Oid, name: impl Into<String>, kind: TagKind) {
        let candidate = TagEntry {
            name: name.into(),
            kind,
        };

        let keep_existing = self.entries.get(&commit).is_some_and(|existing| {
            (existing.kind, existing.name.as_str()) >= (candidate.kind, candidate.name.as_str())
        });
        if !keep_existing {
            self.entries.insert(commit, candidate);
        }
    }

    /// The winning tag name for `commit`
    pub fn get(&self, commit: &Oid) -> Option<&str> {
        self.entries.get(commit).map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
