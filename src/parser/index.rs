use std::collections::HashMap;

use crate::error::ExtractError;
use crate::model::{Effect, EffectId, Rank};

/// How a reference's text is compared with record names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    Exact,
    CaseInsensitive,
}

impl MatchPolicy {
    fn key(self, name: &str) -> String {
        match self {
            MatchPolicy::Exact => name.to_string(),
            MatchPolicy::CaseInsensitive => name.to_lowercase(),
        }
    }
}

/// Name → id join table for one collection, built once before dependents run.
/// On duplicate names the first record wins.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    kind: &'static str,
    policy: MatchPolicy,
    ids: HashMap<String, T>,
}

impl<T: Copy> NameIndex<T> {
    pub fn build<'a>(
        kind: &'static str,
        policy: MatchPolicy,
        entries: impl IntoIterator<Item = (&'a str, T)>,
    ) -> Self {
        let mut ids = HashMap::new();
        for (name, id) in entries {
            ids.entry(policy.key(name)).or_insert(id);
        }
        Self { kind, policy, ids }
    }

    pub fn get(&self, name: &str) -> Option<T> {
        self.ids.get(&self.policy.key(name)).copied()
    }

    pub fn resolve(&self, name: &str) -> Result<T, ExtractError> {
        self.get(name).ok_or_else(|| ExtractError::UnresolvedReference {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

/// Rank names → level, matched case-insensitively.
pub fn ranks(ranks: &[Rank]) -> NameIndex<u32> {
    NameIndex::build(
        "rank",
        MatchPolicy::CaseInsensitive,
        ranks.iter().map(|r| (r.name.as_str(), r.level)),
    )
}

/// Effect names → id, matched exactly.
pub fn effects(effects: &[Effect]) -> NameIndex<EffectId> {
    NameIndex::build(
        "effect",
        MatchPolicy::Exact,
        effects.iter().map(|e| (e.name.as_str(), e.id)),
    )
}
