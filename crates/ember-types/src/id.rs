use crate::tag::{StructureIndexKind, TypeTag};
use ember_core::SourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(0);

    pub(crate) fn new(raw: u32) -> Self {
        TypeId(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_invalid(self) -> bool {
        self.0 == 0
    }
}

/// The stable, small record every `TypeId` refers to. Structural data
/// (payload) is separated from this so that forward references (an alias
/// created before its target composite is sealed) and distinct-type
/// aliasing can be expressed without waiting on the structure to be known.
#[derive(Debug, Clone)]
pub struct TypeName {
    pub tag: TypeTag,
    pub source: SourceId,
    /// `self` unless this name is an alias created via `distinct`, in which
    /// case it names the root of the distinct-equivalence chain.
    pub distinct_root: TypeId,
    pub is_distinct: bool,
    pub structure_index_kind: StructureIndexKind,
    /// Meaning depends on `structure_index_kind`: a composite arena index
    /// for `Builder`/`Normal`, or the `TypeId` being forwarded to for
    /// `Indirect` (stored via `TypeId::new` in the low 32 bits either way).
    pub structure_index: u32,
}
