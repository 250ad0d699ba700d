use crate::data::OpcodeData;
use crate::error::{OpcodeError, OpcodeResult};
use crate::fixup::{Fixup, FixupSlot};
use crate::id::OpcodeId;
use crate::tag::Opcode;
use ember_ast::AstNodeId;
use ember_core::SourceId;

/// One emitted instruction: its tag, the `expects_write_context` bit packed
/// into the donor's high bit of the opcode byte, and its typed attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct OpcodeInstr {
    pub code: Opcode,
    pub expects_write_ctx: bool,
    pub data: OpcodeData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceMapping {
    code_begin: OpcodeId,
    source: SourceId,
}

/// Stack-oriented bytecode emitter with deferred emission via a fixup stack
/// and `(opcode_offset, source_id)` back-mapping (spec §4.3).
#[derive(Debug)]
pub struct OpcodePool {
    instrs: Vec<OpcodeInstr>,
    sources: Vec<SourceMapping>,
    fixups: Vec<Fixup>,
}

impl Default for OpcodePool {
    fn default() -> Self {
        Self::new()
    }
}

impl OpcodePool {
    pub fn new() -> Self {
        let mut pool = OpcodePool {
            instrs: Vec::new(),
            sources: Vec::new(),
            fixups: Vec::new(),
        };
        // Reserve slot 0 so `OpcodeId::INVALID` never aliases a real instruction.
        pool.instrs.push(OpcodeInstr {
            code: Opcode::Invalid,
            expects_write_ctx: false,
            data: OpcodeData::None,
        });
        pool
    }

    pub fn next_id(&self) -> OpcodeId {
        OpcodeId::new(self.instrs.len() as u32)
    }

    pub fn instr_at(&self, id: OpcodeId) -> &OpcodeInstr {
        &self.instrs[id.as_u32() as usize]
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.len() <= 1
    }

    /// Every real instruction (slot 0, the reserved `Invalid` sentinel, is
    /// skipped) paired with its id, in emission order.
    pub fn instrs(&self) -> impl Iterator<Item = (OpcodeId, &OpcodeInstr)> {
        self.instrs.iter().enumerate().skip(1).map(|(i, instr)| (OpcodeId::new(i as u32), instr))
    }

    /// Emits one instruction, returning its id. A new source mapping entry is
    /// only appended when the source differs from the previous emission,
    /// keeping the mapping table sparse; `source_id_of_opcode` fills the gaps
    /// by binary search.
    pub fn emit(&mut self, code: Opcode, expects_write_ctx: bool, source: SourceId, data: OpcodeData) -> OpcodeId {
        let id = self.next_id();
        if self.sources.last().map(|m| m.source) != Some(source) {
            self.sources.push(SourceMapping { code_begin: id, source });
        }
        self.instrs.push(OpcodeInstr {
            code,
            expects_write_ctx,
            data,
        });
        id
    }

    /// Overwrites a previously reserved jump-target field once the target
    /// address is known (spec §4.3.2 step 3).
    pub fn patch_target(&mut self, at: OpcodeId, slot: FixupSlot, target: OpcodeId) {
        let instr = &mut self.instrs[at.as_u32() as usize];
        match (&mut instr.data, slot) {
            (OpcodeData::BodyTarget(t), FixupSlot::Primary) => *t = target,
            (OpcodeData::TwoBodyTargets { primary, .. }, FixupSlot::Primary) => *primary = target,
            (OpcodeData::TwoBodyTargets { secondary, .. }, FixupSlot::Secondary) => *secondary = target,
            _ => panic!("patch_target: instruction at {at:?} has no matching jump-target field"),
        }
    }

    pub fn push_fixup(&mut self, fixup: Fixup) {
        self.fixups.push(fixup);
    }

    fn complete_single_fixup(
        &mut self,
        fixup: Fixup,
        emit_node: &mut impl FnMut(&mut OpcodePool, AstNodeId, bool) -> OpcodeResult<()>,
    ) -> OpcodeResult<()> {
        let fixup_loc = self.next_id();
        if let Some((at, slot)) = fixup.patch {
            self.patch_target(at, slot, fixup_loc);
        }
        emit_node(self, fixup.node_id, fixup.expects_write_ctx)
    }

    /// Drains the fixup stack (spec §4.3.2). `emit_node` must emit the full
    /// instruction sequence for one AST node, honoring the given
    /// `expects_write_context` bit for its tail instruction; it may itself
    /// push further fixups, which are drained in turn.
    pub fn complete_fixups(
        &mut self,
        mut emit_node: impl FnMut(&mut OpcodePool, AstNodeId, bool) -> OpcodeResult<()>,
    ) -> OpcodeResult<()> {
        while let Some(curr) = self.fixups.pop() {
            if curr.patch.is_none() {
                let prev = self.fixups.pop().ok_or(OpcodeError::DanglingContinuation)?;
                if prev.patch.is_none() {
                    return Err(OpcodeError::TransitiveContinuation);
                }
                self.complete_single_fixup(prev, &mut emit_node)?;
            }

            self.complete_single_fixup(curr, &mut emit_node)?;

            let source = self.sources.last().map(|m| m.source).unwrap_or(SourceId::INVALID);

            if curr.has_template_parameter_type && curr.has_template_parameter_value {
                self.emit(
                    Opcode::CompleteParamTypedWithDefault,
                    false,
                    source,
                    OpcodeData::TemplateParamRank(curr.template_parameter_rank),
                );
            } else if curr.has_template_parameter_type {
                self.emit(
                    Opcode::CompleteParamTypedNoDefault,
                    false,
                    source,
                    OpcodeData::TemplateParamRank(curr.template_parameter_rank),
                );
            } else if curr.has_template_parameter_value {
                self.emit(
                    Opcode::CompleteParamUntyped,
                    false,
                    source,
                    OpcodeData::TemplateParamRank(curr.template_parameter_rank),
                );
            } else if curr.is_func_body {
                self.emit(Opcode::Return, false, source, OpcodeData::None);
            }

            self.emit(Opcode::EndCode, false, source, OpcodeData::None);
        }

        Ok(())
    }

    /// Binary-searches for the source id covering `id` (spec §4.3.4): the
    /// largest mapping entry whose `code_begin` is `<= id`.
    pub fn source_id_of_opcode(&self, id: OpcodeId) -> OpcodeResult<SourceId> {
        if self.sources.is_empty() {
            return Err(OpcodeError::NoSourceMappings);
        }
        let mut lo = 0usize;
        let mut hi = self.sources.len() - 1;
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            if self.sources[mid].code_begin <= id {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Ok(self.sources[lo].source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(n: u32) -> AstNodeId {
        AstNodeId::new(n)
    }

    #[test]
    fn source_mapping_is_sparse_and_binary_searches_correctly() {
        let mut pool = OpcodePool::new();
        let s1 = SourceId::new(1);
        let s2 = SourceId::new(2);

        let a = pool.emit(Opcode::ValueInteger, false, s1, OpcodeData::None);
        let b = pool.emit(Opcode::ValueInteger, false, s1, OpcodeData::None);
        let c = pool.emit(Opcode::BinaryArithmeticOp, false, s2, OpcodeData::ArithmeticOp(crate::tag::ArithmeticOpKind::Add));

        assert_eq!(pool.source_id_of_opcode(a).unwrap(), s1);
        assert_eq!(pool.source_id_of_opcode(b).unwrap(), s1);
        assert_eq!(pool.source_id_of_opcode(c).unwrap(), s2);
    }

    #[test]
    fn fixup_patches_body_target_to_its_deferred_position() {
        let mut pool = OpcodePool::new();
        let source = SourceId::new(1);

        let if_id = pool.emit(Opcode::If, false, source, OpcodeData::BodyTarget(OpcodeId::INVALID));
        pool.push_fixup(Fixup::new(Some((if_id, FixupSlot::Primary)), node(7), false));

        pool.complete_fixups(|p, n, write_ctx| {
            assert_eq!(n, node(7));
            assert!(!write_ctx);
            p.emit(Opcode::ValueVoid, false, source, OpcodeData::None);
            Ok(())
        })
        .unwrap();

        let OpcodeData::BodyTarget(target) = &pool.instr_at(if_id).data else {
            panic!("expected BodyTarget");
        };
        let target = *target;
        assert_eq!(target, OpcodeId::new(2));
        assert_eq!(pool.instr_at(target).code, Opcode::ValueVoid);
    }

    #[test]
    fn function_body_fixup_appends_return_then_end_code() {
        let mut pool = OpcodePool::new();
        let source = SourceId::new(1);

        let call_id = pool.emit(Opcode::BindBody, true, source, OpcodeData::BodyTarget(OpcodeId::INVALID));
        pool.push_fixup(Fixup::for_function_body(Some((call_id, FixupSlot::Primary)), node(3)));

        pool.complete_fixups(|p, _n, write_ctx| {
            assert!(write_ctx);
            p.emit(Opcode::ValueInteger, true, source, OpcodeData::None);
            Ok(())
        })
        .unwrap();

        let codes: Vec<Opcode> = (2..pool.len()).map(|i| pool.instr_at(OpcodeId::new(i as u32)).code).collect();
        assert_eq!(codes, vec![Opcode::ValueInteger, Opcode::Return, Opcode::EndCode]);
    }

    #[test]
    fn continuation_fixup_emits_preceding_region_first() {
        let mut pool = OpcodePool::new();
        let source = SourceId::new(1);

        let param_id = pool.emit(Opcode::Signature, false, source, OpcodeData::Signature { value_count: 1 });
        pool.push_fixup(Fixup::new(Some((param_id, FixupSlot::Primary)), node(10), false));
        pool.push_fixup(Fixup::for_template_parameter(None, node(11), 0, true, true));

        let mut seen = Vec::new();
        pool.complete_fixups(|p, n, _write_ctx| {
            seen.push(n);
            p.emit(Opcode::ValueVoid, false, source, OpcodeData::None);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, vec![node(10), node(11)]);
    }
}
