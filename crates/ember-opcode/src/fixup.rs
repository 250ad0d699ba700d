use crate::id::OpcodeId;
use ember_ast::AstNodeId;

/// Identifies which jump-target field of a deferred-body opcode a fixup
/// patches. Most body-bearing opcodes (`If`, `Loop`, `Call`, `BindBody`, ...)
/// have a single target; `IfElse` and `LoopFinally` have two, reached via two
/// separate fixups against the same instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupSlot {
    Primary,
    Secondary,
}

/// A deferred code region: the AST node that still needs to be compiled, and
/// where to patch the jump target once its address is known. `patch` is
/// `None` for a *continuation* fixup, which shares its region with the fixup
/// immediately preceding it on the stack rather than patching anything of
/// its own (spec §4.3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixup {
    pub patch: Option<(OpcodeId, FixupSlot)>,
    pub node_id: AstNodeId,
    pub expects_write_ctx: bool,
    pub is_func_body: bool,
    pub template_parameter_rank: u8,
    pub has_template_parameter_type: bool,
    pub has_template_parameter_value: bool,
}

impl Fixup {
    pub fn new(patch: Option<(OpcodeId, FixupSlot)>, node_id: AstNodeId, expects_write_ctx: bool) -> Self {
        Fixup {
            patch,
            node_id,
            expects_write_ctx,
            is_func_body: false,
            template_parameter_rank: 0,
            has_template_parameter_type: false,
            has_template_parameter_value: false,
        }
    }

    pub fn for_function_body(patch: Option<(OpcodeId, FixupSlot)>, node_id: AstNodeId) -> Self {
        let mut fixup = Fixup::new(patch, node_id, true);
        fixup.is_func_body = true;
        fixup
    }

    pub fn for_template_parameter(
        patch: Option<(OpcodeId, FixupSlot)>,
        node_id: AstNodeId,
        rank: u8,
        has_type: bool,
        has_value: bool,
    ) -> Self {
        let mut fixup = Fixup::new(patch, node_id, false);
        fixup.template_parameter_rank = rank;
        fixup.has_template_parameter_type = has_type;
        fixup.has_template_parameter_value = has_value;
        fixup
    }
}
