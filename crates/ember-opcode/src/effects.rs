use crate::data::OpcodeData;
use crate::tag::{Opcode, SliceKind};

/// Net effect an instruction has on each of the VM's four stacks. Positive
/// values push, negative values pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpcodeEffects {
    pub values_diff: i32,
    pub write_ctxs_diff: i32,
    pub scopes_diff: i32,
    pub closures_diff: i32,
}

/// The single source of truth for instruction stack effects (spec §4.3.3).
/// Mirrors `opcode_effects` in the donor, translated from its byte-offset
/// `memcpy` reads to matching on `OpcodeData`'s typed payload.
pub fn opcode_effects(code: Opcode, expects_write_ctx: bool, data: &OpcodeData) -> OpcodeEffects {
    let mut effects = OpcodeEffects::default();

    match code {
        Opcode::EndCode | Opcode::Args | Opcode::Return => effects,

        Opcode::SetWriteCtx
        | Opcode::ScopeAllocTyped
        | Opcode::FileGlobalAllocTyped
        | Opcode::CompleteParamTypedNoDefault
        | Opcode::CompleteParamTypedWithDefault => {
            effects.values_diff = -1;
            effects.write_ctxs_diff = 1;
            effects
        }

        Opcode::ScopeBegin => {
            effects.scopes_diff = 1;
            effects
        }

        Opcode::ScopeEnd => {
            effects.scopes_diff = -1;
            effects
        }

        Opcode::ScopeAllocUntyped | Opcode::FileGlobalAllocUntyped | Opcode::CompleteParamUntyped => {
            effects.values_diff = -1;
            effects
        }

        Opcode::PopClosure => {
            effects.closures_diff = -1;
            effects
        }

        Opcode::LoadScope
        | Opcode::LoadGlobal
        | Opcode::LoadMember
        | Opcode::LoadClosure
        | Opcode::LoadBuiltin
        | Opcode::LoopFinally
        | Opcode::Undefined
        | Opcode::Unreachable
        | Opcode::ValueInteger
        | Opcode::ValueFloat
        | Opcode::ValueString
        | Opcode::ValueVoid => {
            if expects_write_ctx {
                effects.write_ctxs_diff = -1;
            } else {
                effects.values_diff += 1;
            }
            effects
        }

        Opcode::ExecBuiltin => {
            debug_assert!(expects_write_ctx);
            effects.write_ctxs_diff -= 1;
            effects
        }

        Opcode::Signature => {
            let OpcodeData::Signature { value_count } = data else {
                panic!("Signature opcode without Signature data");
            };
            let value_count = *value_count as i32;
            if expects_write_ctx {
                effects.values_diff = -value_count;
                effects.write_ctxs_diff = -1;
            } else {
                effects.values_diff = -(value_count - 1);
            }
            effects
        }

        Opcode::DynSignature => {
            let OpcodeData::DynSignature {
                value_count,
                closed_over_value_count,
            } = data
            else {
                panic!("DynSignature opcode without DynSignature data");
            };
            let total = *value_count as i32 + *closed_over_value_count as i32;
            if expects_write_ctx {
                effects.values_diff = -total;
                effects.write_ctxs_diff = -1;
            } else {
                effects.values_diff = -(total - 1);
            }
            effects
        }

        Opcode::BindBody
        | Opcode::BindBodyWithClosure
        | Opcode::Call
        | Opcode::IfElse
        | Opcode::AddressOf
        | Opcode::Dereference
        | Opcode::BitNot
        | Opcode::LogicalNot
        | Opcode::Negate
        | Opcode::UnaryPlus
        | Opcode::ReferenceType => {
            if expects_write_ctx {
                effects.values_diff = -1;
                effects.write_ctxs_diff = -1;
            }
            effects
        }

        Opcode::ArrayPreInit => {
            debug_assert!(expects_write_ctx);
            let OpcodeData::ArrayPreInit {
                leading_element_count,
                following_element_counts,
            } = data
            else {
                panic!("ArrayPreInit opcode without ArrayPreInit data");
            };
            let index_count = following_element_counts.len() as i32;
            let total_element_count: i32 =
                *leading_element_count as i32 + following_element_counts.iter().map(|&c| c as i32).sum::<i32>();
            effects.values_diff = -index_count;
            effects.write_ctxs_diff = total_element_count - 1;
            effects
        }

        Opcode::ArrayPostInit => {
            debug_assert!(!expects_write_ctx);
            let OpcodeData::ArrayPostInit {
                total_element_count,
                index_count,
            } = data
            else {
                panic!("ArrayPostInit opcode without ArrayPostInit data");
            };
            effects.values_diff = 1 - (*total_element_count as i32 + *index_count as i32);
            effects
        }

        Opcode::CompositePreInit => {
            debug_assert!(expects_write_ctx);
            let OpcodeData::CompositePreInit {
                leading_member_count,
                named_members,
            } = data
            else {
                panic!("CompositePreInit opcode without CompositePreInit data");
            };
            let total_member_count: i32 =
                *leading_member_count as i32 + named_members.iter().map(|&(_, c)| c as i32).sum::<i32>();
            effects.write_ctxs_diff = total_member_count - 1;
            effects
        }

        Opcode::CompositePostInit => {
            debug_assert!(!expects_write_ctx);
            let OpcodeData::CompositePostInit { total_member_count } = data else {
                panic!("CompositePostInit opcode without CompositePostInit data");
            };
            effects.values_diff = 1 - *total_member_count as i32;
            effects
        }

        Opcode::If | Opcode::Loop | Opcode::DiscardVoid => {
            debug_assert!(!expects_write_ctx);
            effects.values_diff = -1;
            effects
        }

        Opcode::Slice => {
            let OpcodeData::Slice(kind) = data else {
                panic!("Slice opcode without Slice data");
            };
            let values_diff = match kind {
                SliceKind::NoBounds => 1,
                SliceKind::BothBounds => -1,
                SliceKind::BeginBound | SliceKind::EndBound => 0,
            };
            if expects_write_ctx {
                effects.values_diff = values_diff - 1;
                effects.write_ctxs_diff = -1;
            } else {
                effects.values_diff = values_diff;
            }
            effects
        }

        Opcode::Index
        | Opcode::BinaryArithmeticOp
        | Opcode::Shift
        | Opcode::BinaryBitwiseOp
        | Opcode::LogicalAnd
        | Opcode::LogicalOr
        | Opcode::Compare
        | Opcode::ArrayType => {
            if expects_write_ctx {
                effects.values_diff = -2;
                effects.write_ctxs_diff = -1;
            } else {
                effects.values_diff = -1;
            }
            effects
        }

        Opcode::Switch => unimplemented!("Switch opcode effects are not part of the supported subset"),

        Opcode::Invalid => panic!("opcode_effects called on Opcode::Invalid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_code_has_no_effect() {
        let e = opcode_effects(Opcode::EndCode, false, &OpcodeData::None);
        assert_eq!(e, OpcodeEffects::default());
    }

    #[test]
    fn load_scope_pushes_a_value_without_write_ctx() {
        let e = opcode_effects(Opcode::LoadScope, false, &OpcodeData::LoadScope { out: 0, rank: 0 });
        assert_eq!(e.values_diff, 1);
        assert_eq!(e.write_ctxs_diff, 0);
    }

    #[test]
    fn load_scope_consumes_write_ctx_instead_when_expected() {
        let e = opcode_effects(Opcode::LoadScope, true, &OpcodeData::LoadScope { out: 0, rank: 0 });
        assert_eq!(e.values_diff, 0);
        assert_eq!(e.write_ctxs_diff, -1);
    }

    #[test]
    fn binary_arithmetic_op_pops_two_and_pushes_one() {
        let e = opcode_effects(
            Opcode::BinaryArithmeticOp,
            false,
            &OpcodeData::ArithmeticOp(crate::tag::ArithmeticOpKind::Add),
        );
        assert_eq!(e.values_diff, -1);
    }

    #[test]
    fn call_without_write_ctx_is_a_no_op_on_the_stacks() {
        let e = opcode_effects(Opcode::Call, false, &OpcodeData::None);
        assert_eq!(e, OpcodeEffects::default());
    }

    #[test]
    fn call_with_write_ctx_consumes_a_value_and_a_write_ctx() {
        let e = opcode_effects(Opcode::Call, true, &OpcodeData::None);
        assert_eq!(e.values_diff, -1);
        assert_eq!(e.write_ctxs_diff, -1);
    }
}
