use crate::id::TypeId;
use crate::tag::TypeTag;

/// Structural data for non-composite types (composites live in their own
/// arena — see `composite.rs` — since their members grow incrementally
/// while open). Every variant here is content-hashable, which is what lets
/// `type_create_numeric(Integer, {32, true})` called twice return the same
/// `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypePayload {
    Simple,
    Numeric {
        bits: u8,
        is_signed: bool,
    },
    Reference {
        referenced: TypeId,
        is_opt: bool,
        is_multi: bool,
        is_mut: bool,
    },
    Array {
        element: TypeId,
        count: u64,
    },
    Signature {
        params: Vec<TypeId>,
        return_type: TypeId,
        is_proc: bool,
        parameter_list_is_unbound: bool,
        return_type_is_unbound: bool,
    },
}

/// Key used by `TypePool`'s structural dedup map. Composites are keyed
/// separately (`StructureKey::Composite`) since they are only ever dedup'd
/// once fully sealed with no pending members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StructureKey {
    Payload(TypeTag, TypePayload),
    Composite(Vec<(u32, u32, u8)>),
}
