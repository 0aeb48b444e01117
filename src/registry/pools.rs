use serde::Deserialize;
use std::collections::BTreeMap;

/// Candidate words and phrases keyed by slot name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WordPools {
    pools: BTreeMap<String, Vec<String>>,
}

impl WordPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool<S: Into<String>>(mut self, slot: S, words: &[&str]) -> Self {
        self.pools
            .insert(slot.into(), words.iter().map(|w| w.to_string()).collect());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&[String]> {
        self.pools.get(slot).map(Vec::as_slice)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
