use ember_core::IdentifierId;
use indexmap::IndexMap;

/// One lexical scope's name → rank table. The donor implements this as a
/// linear-probed hash table with an occupancy bitmap over a size-class arena
/// (`lexical_analyser.cpp`'s `ScopeMap`), doubling at a 2/3 load factor. An
/// `IndexMap` gives the same amortized-O(1) insert/lookup and the same
/// "assign ranks in insertion order" property without hand-rolled probing.
#[derive(Debug, Clone, Default)]
pub struct ScopeMap {
    entries: IndexMap<IdentifierId, u16>,
}

impl ScopeMap {
    pub fn new() -> Self {
        ScopeMap::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: IdentifierId) -> Option<u16> {
        self.entries.get(&name).copied()
    }

    /// Inserts `name` at the next sequential rank. Returns `false` (and
    /// leaves the map untouched) if `name` is already bound in this scope —
    /// the caller reports this as a non-fatal duplicate-definition error,
    /// mirroring `scope_map_add_nogrow`'s `check_duplicates` branch.
    pub fn insert(&mut self, name: IdentifierId) -> bool {
        if self.entries.contains_key(&name) {
            return false;
        }
        let rank = self.entries.len() as u16;
        self.entries.insert(name, rank);
        true
    }
}
