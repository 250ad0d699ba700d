use crate::ids::IdentifierId;
use indexmap::IndexSet;

/// Interns identifier spellings, assigning each a stable `IdentifierId`.
/// Real source identifiers are allocated starting at `IdentifierId::FIRST_NATURAL`;
/// lower ids are reserved for the AST lowering passes' synthetic definitions
/// and are never handed out by `intern`.
pub trait Interner {
    fn intern(&mut self, text: &str) -> IdentifierId;
    fn resolve(&self, id: IdentifierId) -> Option<&str>;
}

/// `IndexSet`-backed interner, modeled on the donor's `Interner` (a dedup map
/// paired with insertion-ordered storage for `Symbol` reuse).
#[derive(Debug, Default)]
pub struct SimpleInterner {
    strings: IndexSet<String>,
}

impl SimpleInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Interner for SimpleInterner {
    fn intern(&mut self, text: &str) -> IdentifierId {
        let (index, _) = self.strings.insert_full(text.to_owned());
        let raw = index as u32 + IdentifierId::FIRST_NATURAL.as_u32();
        IdentifierId::new(raw)
    }

    fn resolve(&self, id: IdentifierId) -> Option<&str> {
        let raw = id.as_u32();
        if raw < IdentifierId::FIRST_NATURAL.as_u32() {
            return None;
        }
        let index = (raw - IdentifierId::FIRST_NATURAL.as_u32()) as usize;
        self.strings.get_index(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_spelling_twice_returns_same_id() {
        let mut interner = SimpleInterner::new();
        let a = interner.intern("foo");
        let b = interner.intern("foo");
        assert_eq!(a, b);
    }

    #[test]
    fn interned_ids_start_at_first_natural() {
        let mut interner = SimpleInterner::new();
        let id = interner.intern("x");
        assert_eq!(id, IdentifierId::FIRST_NATURAL);
        assert_eq!(interner.resolve(id), Some("x"));
    }

    #[test]
    fn resolving_a_reserved_id_returns_none() {
        let interner = SimpleInterner::new();
        assert_eq!(interner.resolve(IdentifierId::FIRST_SYNTH), None);
    }
}
