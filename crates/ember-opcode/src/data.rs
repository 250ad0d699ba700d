use crate::id::OpcodeId;
use crate::tag::{ArithmeticOpKind, BitwiseOpKind, CompareKind, ShiftKind, SliceKind};
use ember_core::IdentifierId;

/// Flags carried by `ReferenceType` (pointer/slice/tail-array type expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferenceTypeFlags {
    pub is_opt: bool,
    pub is_multi: bool,
    pub is_mut: bool,
}

/// Per-opcode attachment data. The donor packs these as raw little-endian
/// bytes following the opcode byte (`put_opcode_attachs`, `memcpy`); here each
/// opcode instead carries its own typed payload variant, which
/// `opcode_effects` pattern-matches on directly instead of re-parsing bytes
/// at fixed offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum OpcodeData {
    None,
    /// A deferred single-target code region, reserved via a fixup and
    /// patched in `complete_fixups` once the target's address is known.
    BodyTarget(OpcodeId),
    /// A deferred two-target code region (`IfElse`'s then/else branches,
    /// `LoopFinally`'s body/finally clauses).
    TwoBodyTargets {
        primary: OpcodeId,
        secondary: OpcodeId,
    },
    ScopeAlloc {
        is_mut: bool,
    },
    FileGlobalAlloc {
        is_mut: bool,
        file_index: u32,
        rank: u16,
    },
    LoadScope {
        out: u16,
        rank: u16,
    },
    LoadClosure {
        rank: u16,
    },
    LoadMember {
        name: IdentifierId,
    },
    ExecBuiltin {
        builtin_id: u32,
    },
    Signature {
        value_count: u8,
    },
    DynSignature {
        value_count: u8,
        closed_over_value_count: u16,
    },
    TemplateParamRank(u8),
    ArrayPreInit {
        leading_element_count: u16,
        following_element_counts: Vec<u16>,
    },
    ArrayPostInit {
        total_element_count: u16,
        index_count: u16,
    },
    CompositePreInit {
        leading_member_count: u16,
        named_members: Vec<(IdentifierId, u16)>,
    },
    CompositePostInit {
        total_member_count: u16,
    },
    ArithmeticOp(ArithmeticOpKind),
    BitwiseOp(BitwiseOpKind),
    Shift(ShiftKind),
    Compare(CompareKind),
    Slice(SliceKind),
    ReferenceType(ReferenceTypeFlags),
    /// `ValueInteger`'s literal payload, copied straight from the source
    /// node's `LitIntegerData::value` (and from a desugared `LitChar`'s code
    /// point, which the donor also routes through `ValueInteger`).
    Integer(u64),
    /// `ValueFloat`'s literal payload, from `LitFloatData::value`.
    Float(f64),
    /// `ValueString`'s literal payload: the interned string id from
    /// `LitStringData::string_id`, not the string's contents.
    StringRef(IdentifierId),
}
