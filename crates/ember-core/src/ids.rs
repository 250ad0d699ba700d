use std::fmt;

/// Opaque locator into the consolidated source byte space. Zero denotes the
/// hard-coded prelude (no real file backs it).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceId(u32);

impl SourceId {
    pub const INVALID: SourceId = SourceId(0);

    pub fn new(raw: u32) -> Self {
        SourceId(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

/// Identifier handle. Ids below `FIRST_NATURAL` are reserved for the AST
/// lowering passes' synthetic definitions; real source identifiers start at
/// `FIRST_NATURAL`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentifierId(u32);

impl IdentifierId {
    pub const INVALID: IdentifierId = IdentifierId(0);
    /// The single synthetic name used by set-operation lowering (spec §4.1.3).
    pub const FIRST_SYNTH: IdentifierId = IdentifierId(1);
    /// First id available to value-to-location lifting (spec §4.1.4).
    pub const SECOND_SYNTH: IdentifierId = IdentifierId(2);
    /// First id available to real, user-written identifiers.
    pub const FIRST_NATURAL: IdentifierId = IdentifierId(65536);

    pub fn new(raw: u32) -> Self {
        IdentifierId(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_invalid(self) -> bool {
        self.0 == 0
    }

    pub fn is_synthetic(self) -> bool {
        self.0 < Self::FIRST_NATURAL.0
    }

    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(IdentifierId)
    }
}

impl fmt::Debug for IdentifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentifierId({})", self.0)
    }
}

/// Allocates successive synthetic identifiers for the value-to-location
/// lowering pass, bounded by `IdentifierId::FIRST_NATURAL`.
pub struct SyntheticIdAllocator {
    next: IdentifierId,
}

impl SyntheticIdAllocator {
    pub fn new() -> Self {
        SyntheticIdAllocator {
            next: IdentifierId::SECOND_SYNTH,
        }
    }

    /// Returns `None` once the reserved synthetic range is exhausted.
    pub fn alloc(&mut self) -> Option<IdentifierId> {
        if self.next.as_u32() >= IdentifierId::FIRST_NATURAL.as_u32() {
            return None;
        }
        let id = self.next;
        self.next = IdentifierId::new(id.as_u32() + 1);
        Some(id)
    }
}

impl Default for SyntheticIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_allocator_starts_at_second_synth() {
        let mut alloc = SyntheticIdAllocator::new();
        assert_eq!(alloc.alloc(), Some(IdentifierId::SECOND_SYNTH));
        assert_eq!(alloc.alloc(), Some(IdentifierId::new(3)));
    }

    #[test]
    fn synthetic_allocator_exhausts_at_first_natural() {
        let mut alloc = SyntheticIdAllocator {
            next: IdentifierId::new(IdentifierId::FIRST_NATURAL.as_u32() - 1),
        };
        assert!(alloc.alloc().is_some());
        assert_eq!(alloc.alloc(), None);
    }

    #[test]
    fn identifier_is_synthetic() {
        assert!(IdentifierId::FIRST_SYNTH.is_synthetic());
        assert!(!IdentifierId::FIRST_NATURAL.is_synthetic());
    }
}
