/// Mirrors the donor's `enum class TypeTag : u8`
/// (`examples/original_source/core/core.hpp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Invalid,
    Indirection,
    Void,
    Type,
    Definition,
    CompInteger,
    CompFloat,
    Boolean,
    TypeInfo,
    TypeBuilder,
    Divergent,
    Integer,
    Float,
    Slice,
    Ptr,
    Array,
    Func,
    Builtin,
    Composite,
    TailArray,
    CompositeLiteral,
    ArrayLiteral,
    Variadic,
    Trait,
}

impl TypeTag {
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            TypeTag::Ptr | TypeTag::Slice | TypeTag::TailArray | TypeTag::Variadic
        )
    }

    pub fn is_composite(self) -> bool {
        matches!(self, TypeTag::Composite | TypeTag::CompositeLiteral)
    }

    pub fn is_array(self) -> bool {
        matches!(self, TypeTag::Array | TypeTag::ArrayLiteral)
    }

    pub fn is_signature(self) -> bool {
        matches!(self, TypeTag::Func | TypeTag::Builtin)
    }
}

/// What kind of thing a composite type represents — a user-defined record,
/// a function signature's implicit parameter record, or a lexical block's
/// implicit local-variable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDisposition {
    Invalid,
    User,
    Signature,
    Block,
}

/// Size, stride (size rounded up to alignment) and alignment of a type, all
/// in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeMetrics {
    pub size: u64,
    pub stride: u64,
    pub align: u32,
}

impl TypeMetrics {
    pub const ZERO: TypeMetrics = TypeMetrics {
        size: 0,
        stride: 0,
        align: 1,
    };

    pub fn scalar(bytes: u64) -> TypeMetrics {
        TypeMetrics {
            size: bytes,
            stride: bytes,
            align: bytes as u32,
        }
    }
}

/// Discriminates how a `TypeName`'s structural payload must be looked up:
/// still mutable in the open-composite builder arena, forwarding to a parent
/// that has not sealed yet (an alias created before its target composite),
/// or resolved to a normal, content-hashed structural entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureIndexKind {
    Builder,
    Indirect,
    Normal,
}
