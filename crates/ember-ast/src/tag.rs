/// Discriminates the ~90 kinds of AST node. Mirrors the donor's
/// `enum class AstTag : u8` exactly in ordering and meaning (see
/// `examples/original_source/core/core.hpp`), so that the numeric value of a
/// tag is stable across passes that persist it (none currently do, but the
/// layout is kept faithful regardless).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum AstTag {
    Invalid = 0,
    Builtin,
    File,
    CompositeInitializer,
    ArrayInitializer,
    Wildcard,
    Where,
    Expects,
    Ensures,
    Definition,
    Parameter,
    Block,
    If,
    For,
    ForEach,
    Switch,
    Case,
    Func,
    Signature,
    Trait,
    Impl,
    Catch,
    Unreachable,
    Undefined,
    Identifier,
    LitInteger,
    LitFloat,
    LitChar,
    LitString,
    OpSliceOf,
    Return,
    Leave,
    Yield,
    ParameterList,
    Call,
    UOpTypeTailArray,
    UOpTypeSlice,
    UOpTypeMultiPtr,
    UOpTypeOptMultiPtr,
    UOpEval,
    UOpTry,
    UOpDefer,
    UOpDistinct,
    UOpAddr,
    UOpDeref,
    UOpBitNot,
    UOpLogNot,
    UOpTypeOptPtr,
    UOpTypeVarArgs,
    ImpliedMember,
    UOpTypePtr,
    UOpNegate,
    UOpPos,
    OpAdd,
    OpSub,
    OpMul,
    OpDiv,
    OpAddTC,
    OpSubTC,
    OpMulTC,
    OpMod,
    OpBitAnd,
    OpBitOr,
    OpBitXor,
    OpShiftL,
    OpShiftR,
    OpLogAnd,
    OpLogOr,
    Member,
    OpCmpLT,
    OpCmpGT,
    OpCmpLE,
    OpCmpGE,
    OpCmpNE,
    OpCmpEQ,
    OpSet,
    OpSetAdd,
    OpSetSub,
    OpSetMul,
    OpSetDiv,
    OpSetAddTC,
    OpSetSubTC,
    OpSetMulTC,
    OpSetMod,
    OpSetBitAnd,
    OpSetBitOr,
    OpSetBitXor,
    OpSetShiftL,
    OpSetShiftR,
    OpTypeArray,
    OpArrayIndex,
}

impl AstTag {
    /// Total number of enumerants, i.e. one past the highest discriminant.
    pub const COUNT: u8 = AstTag::OpArrayIndex as u8 + 1;

    pub fn from_u8(raw: u8) -> Option<AstTag> {
        if raw >= Self::COUNT {
            return None;
        }
        // SAFETY: `AstTag` is `repr(u8)` and every discriminant in
        // `0..COUNT` is assigned to exactly one enumerant above.
        Some(unsafe { std::mem::transmute::<u8, AstTag>(raw) })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the op-assignment family (`OpSetAdd` ..= `OpSetShiftR`,
    /// excluding plain `OpSet`) is lowered by the set-operation expansion
    /// pass (spec §4.1.3).
    pub fn is_compound_set_op(self) -> bool {
        matches!(
            self,
            AstTag::OpSetAdd
                | AstTag::OpSetSub
                | AstTag::OpSetMul
                | AstTag::OpSetDiv
                | AstTag::OpSetAddTC
                | AstTag::OpSetSubTC
                | AstTag::OpSetMulTC
                | AstTag::OpSetMod
                | AstTag::OpSetBitAnd
                | AstTag::OpSetBitOr
                | AstTag::OpSetBitXor
                | AstTag::OpSetShiftL
                | AstTag::OpSetShiftR
        )
    }

    /// The non-assignment operator a compound set-op lowers to, e.g.
    /// `OpSetAdd` -> `OpAdd`.
    pub fn set_op_base(self) -> Option<AstTag> {
        Some(match self {
            AstTag::OpSetAdd => AstTag::OpAdd,
            AstTag::OpSetSub => AstTag::OpSub,
            AstTag::OpSetMul => AstTag::OpMul,
            AstTag::OpSetDiv => AstTag::OpDiv,
            AstTag::OpSetAddTC => AstTag::OpAddTC,
            AstTag::OpSetSubTC => AstTag::OpSubTC,
            AstTag::OpSetMulTC => AstTag::OpMulTC,
            AstTag::OpSetMod => AstTag::OpMod,
            AstTag::OpSetBitAnd => AstTag::OpBitAnd,
            AstTag::OpSetBitOr => AstTag::OpBitOr,
            AstTag::OpSetBitXor => AstTag::OpBitXor,
            AstTag::OpSetShiftL => AstTag::OpShiftL,
            AstTag::OpSetShiftR => AstTag::OpShiftR,
            _ => return None,
        })
    }

    /// A node whose *parent* needs it to denote a location (the left-hand
    /// side of `&`, `[]`, or `.field`), per spec §4.1.4.
    pub fn needs_location(self) -> bool {
        matches!(
            self,
            AstTag::UOpAddr | AstTag::OpSliceOf | AstTag::OpArrayIndex | AstTag::Member
        )
    }

    /// A node that itself denotes a location and therefore never needs to be
    /// outlined by the value-to-location lowering pass.
    pub fn provides_location(self) -> bool {
        matches!(
            self,
            AstTag::UOpDeref | AstTag::OpArrayIndex | AstTag::Member | AstTag::Identifier
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            AstTag::LitInteger | AstTag::LitFloat | AstTag::LitChar | AstTag::LitString
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_round_trips() {
        for raw in 0..AstTag::COUNT {
            let tag = AstTag::from_u8(raw).unwrap();
            assert_eq!(tag.as_u8(), raw);
        }
    }

    #[test]
    fn from_u8_rejects_out_of_range() {
        assert!(AstTag::from_u8(AstTag::COUNT).is_none());
        assert!(AstTag::from_u8(255).is_none());
    }

    #[test]
    fn set_op_base_covers_every_compound_variant() {
        let compound = [
            AstTag::OpSetAdd,
            AstTag::OpSetSub,
            AstTag::OpSetMul,
            AstTag::OpSetDiv,
            AstTag::OpSetAddTC,
            AstTag::OpSetSubTC,
            AstTag::OpSetMulTC,
            AstTag::OpSetMod,
            AstTag::OpSetBitAnd,
            AstTag::OpSetBitOr,
            AstTag::OpSetBitXor,
            AstTag::OpSetShiftL,
            AstTag::OpSetShiftR,
        ];
        for tag in compound {
            assert!(tag.is_compound_set_op());
            assert!(tag.set_op_base().is_some());
        }
        assert!(!AstTag::OpSet.is_compound_set_op());
        assert_eq!(AstTag::OpSet.set_op_base(), None);
    }

    #[test]
    fn needs_and_provides_location_are_disjoint_from_identifier() {
        assert!(AstTag::Identifier.provides_location());
        assert!(!AstTag::Identifier.needs_location());
    }
}
