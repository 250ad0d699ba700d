//! AST → (file type, opcodes) (spec §4.5's worked demonstration pipeline).
//! This is deliberately narrow: it covers the node kinds the bundled fixtures
//! exercise (literals, identifier loads, binary arithmetic, function
//! definitions), not the full ~90-tag surface `ember-ast` can represent —
//! a complete emitter is out of scope without the tokenizer/parser that
//! would otherwise produce arbitrary trees to drive it.

use crate::error::{PipelineError, PipelineResult};
use crate::trace::Tracer;
use ember_ast::attach::DefinitionData;
use ember_ast::{AstNodeId, AstPool, AstTag};
use ember_core::SourceId;
use ember_opcode::{ArithmeticOpKind, Fixup, FixupSlot, Opcode, OpcodeData, OpcodeId, OpcodePool};
use ember_scope::{LexicalAnalyser, NameBinding};
use ember_types::{TypeDisposition, TypeId, TypePool};

/// Builds the file type (spec §8 scenario 1): one composite, left open, with
/// one member per top-level `Definition`, in source order. Member types
/// aren't resolved here — that needs the type checker this front-end doesn't
/// ship — so the composite never gets sealed; it stays open, matching the
/// donor's behavior for a front-end run that stops after name resolution.
pub fn compile_file_type(types: &mut TypePool, ast: &AstPool, root: AstNodeId, tracer: &mut dyn Tracer) -> PipelineResult<TypeId> {
    debug_assert_eq!(ast.tag_of(root), AstTag::File);
    let file_type = types.create_composite(TypeDisposition::User, false, SourceId::INVALID);
    tracer.trace_type_created(file_type.as_u32(), "file composite (open)");
    for node in ast.direct_children_of(root) {
        if ast.tag_of(node) == AstTag::Definition {
            let data = ast.attachment_as::<DefinitionData>(node);
            types
                .add_composite_member(file_type, data.identifier_id, false, true, false)
                .map_err(PipelineError::Type)?;
        }
    }
    Ok(file_type)
}

fn arithmetic_kind(tag: AstTag) -> Option<ArithmeticOpKind> {
    Some(match tag {
        AstTag::OpAdd => ArithmeticOpKind::Add,
        AstTag::OpSub => ArithmeticOpKind::Sub,
        AstTag::OpMul => ArithmeticOpKind::Mul,
        AstTag::OpDiv => ArithmeticOpKind::Div,
        AstTag::OpAddTC => ArithmeticOpKind::AddTruncating,
        AstTag::OpSubTC => ArithmeticOpKind::SubTruncating,
        AstTag::OpMulTC => ArithmeticOpKind::MulTruncating,
        AstTag::OpMod => ArithmeticOpKind::Mod,
        _ => return None,
    })
}

/// Emits the instruction sequence for one expression node, honoring
/// `expects_write_ctx` on its own tail instruction. May push further fixups
/// (only `Func` does, for its deferred body) which the caller is
/// responsible for draining via `OpcodePool::complete_fixups`.
fn emit_expr(
    pool: &mut OpcodePool,
    ast: &AstPool,
    analyser: &LexicalAnalyser,
    tracer: &mut dyn Tracer,
    node: AstNodeId,
    expects_write_ctx: bool,
) -> PipelineResult<()> {
    let tag = ast.tag_of(node);
    let source = ast.source_id_of(node);

    if let Some(kind) = arithmetic_kind(tag) {
        let lhs = ast.first_child_of(node).expect("binary op always has a lhs child");
        let rhs = ast.next_sibling_of(lhs).expect("binary op always has a rhs sibling");
        emit_expr(pool, ast, analyser, tracer, lhs, false)?;
        emit_expr(pool, ast, analyser, tracer, rhs, false)?;
        let id = pool.emit(Opcode::BinaryArithmeticOp, expects_write_ctx, source, OpcodeData::ArithmeticOp(kind));
        tracer.trace_opcode_emitted(id.as_u32(), "BinaryArithmeticOp");
        return Ok(());
    }

    match tag {
        AstTag::LitInteger => {
            let data = ast.attachment_as::<ember_ast::attach::LitIntegerData>(node);
            let id = pool.emit(Opcode::ValueInteger, expects_write_ctx, source, OpcodeData::Integer(data.value));
            tracer.trace_opcode_emitted(id.as_u32(), "ValueInteger");
            Ok(())
        }
        AstTag::LitFloat => {
            let data = ast.attachment_as::<ember_ast::attach::LitFloatData>(node);
            let id = pool.emit(Opcode::ValueFloat, expects_write_ctx, source, OpcodeData::Float(data.value));
            tracer.trace_opcode_emitted(id.as_u32(), "ValueFloat");
            Ok(())
        }
        AstTag::LitChar => {
            // The donor routes character literals through the same
            // `ValueInteger` opcode as integer literals; no separate
            // `ValueChar` exists.
            let data = ast.attachment_as::<ember_ast::attach::LitCharData>(node);
            let id = pool.emit(Opcode::ValueInteger, expects_write_ctx, source, OpcodeData::Integer(data.code_point as u64));
            tracer.trace_opcode_emitted(id.as_u32(), "ValueInteger");
            Ok(())
        }
        AstTag::LitString => {
            let data = ast.attachment_as::<ember_ast::attach::LitStringData>(node);
            let id = pool.emit(Opcode::ValueString, expects_write_ctx, source, OpcodeData::StringRef(data.string_id));
            tracer.trace_opcode_emitted(id.as_u32(), "ValueString");
            Ok(())
        }
        AstTag::Identifier => {
            let binding = analyser.binding_of(node).ok_or(PipelineError::UnresolvedBinding)?;
            match binding {
                NameBinding::Lexical { out, rank } => {
                    let id = pool.emit(Opcode::LoadScope, expects_write_ctx, source, OpcodeData::LoadScope { out, rank });
                    tracer.trace_opcode_emitted(id.as_u32(), "LoadScope");
                    Ok(())
                }
                NameBinding::Closure { .. } => Err(PipelineError::UnsupportedBinding { kind: "Closure" }),
                NameBinding::Global { .. } => Err(PipelineError::UnsupportedBinding { kind: "Global" }),
            }
        }
        AstTag::OpArrayIndex => {
            let base = ast.first_child_of(node).expect("OpArrayIndex always has a base child");
            let index = ast.next_sibling_of(base).expect("OpArrayIndex always has an index sibling");
            emit_expr(pool, ast, analyser, tracer, base, false)?;
            emit_expr(pool, ast, analyser, tracer, index, false)?;
            let id = pool.emit(Opcode::Index, expects_write_ctx, source, OpcodeData::None);
            tracer.trace_opcode_emitted(id.as_u32(), "Index");
            Ok(())
        }
        AstTag::UOpAddr => {
            let operand = ast.first_child_of(node).expect("UOpAddr always has an operand child");
            emit_expr(pool, ast, analyser, tracer, operand, false)?;
            let id = pool.emit(Opcode::AddressOf, expects_write_ctx, source, OpcodeData::None);
            tracer.trace_opcode_emitted(id.as_u32(), "AddressOf");
            Ok(())
        }
        AstTag::UOpDeref => {
            let operand = ast.first_child_of(node).expect("UOpDeref always has an operand child");
            emit_expr(pool, ast, analyser, tracer, operand, false)?;
            let id = pool.emit(Opcode::Dereference, expects_write_ctx, source, OpcodeData::None);
            tracer.trace_opcode_emitted(id.as_u32(), "Dereference");
            Ok(())
        }
        // `a[i] = v` / `*p = v` / `x = v`: evaluate the right-hand side,
        // move it onto the write-context stack, then re-emit the
        // left-hand side with `expects_write_ctx` set so its own tail
        // instruction (`Index`, `Dereference`, or `LoadScope`) performs
        // the store instead of a load. Compound set-ops (`+=` and
        // friends) never reach here: `ember-ast`'s lowering pass expands
        // them into a plain `OpSet` over a synthetic pointer beforehand.
        AstTag::OpSet => {
            let lhs = ast.first_child_of(node).expect("OpSet always has a lhs child");
            let rhs = ast.next_sibling_of(lhs).expect("OpSet always has a rhs sibling");
            emit_expr(pool, ast, analyser, tracer, rhs, false)?;
            let wc_id = pool.emit(Opcode::SetWriteCtx, false, source, OpcodeData::None);
            tracer.trace_opcode_emitted(wc_id.as_u32(), "SetWriteCtx");
            emit_expr(pool, ast, analyser, tracer, lhs, true)
        }
        AstTag::Func => {
            let signature = ast.first_child_of(node).expect("Func always has a Signature child");
            let body = ast.next_sibling_of(signature).expect("Func's Signature always has a body sibling");
            let value_count = ast.direct_children_of(signature).count() as u8;

            let sig_id = pool.emit(Opcode::Signature, false, source, OpcodeData::Signature { value_count });
            tracer.trace_opcode_emitted(sig_id.as_u32(), "Signature");

            let call_id = pool.emit(Opcode::BindBody, true, source, OpcodeData::BodyTarget(OpcodeId::INVALID));
            tracer.trace_opcode_emitted(call_id.as_u32(), "BindBody");

            pool.push_fixup(Fixup::for_function_body(Some((call_id, FixupSlot::Primary)), body));
            Ok(())
        }
        other => Err(PipelineError::UnsupportedNode { tag: other }),
    }
}

/// Compiles one file-level `Definition`'s value expression into `pool`,
/// closing its own region with `EndCode` and then draining any body fixups
/// the expression pushed (spec §8 scenario 2's exact opcode trace is
/// produced by this split: the definition's own region closes before its
/// function body, if any, is compiled).
fn compile_definition(
    pool: &mut OpcodePool,
    ast: &AstPool,
    analyser: &LexicalAnalyser,
    tracer: &mut dyn Tracer,
    def_node: AstNodeId,
) -> PipelineResult<()> {
    let value = ast.first_child_of(def_node).expect("Definition always has a value child");
    let source = ast.source_id_of(def_node);

    emit_expr(pool, ast, analyser, tracer, value, false)?;
    let end_id = pool.emit(Opcode::EndCode, false, source, OpcodeData::None);
    tracer.trace_opcode_emitted(end_id.as_u32(), "EndCode");

    // `complete_fixups` is generic over `ember_opcode::OpcodeError`; a
    // `PipelineError` raised inside the closure is stashed here and
    // re-raised once the drain completes rather than forcing a variant
    // conversion between the two crates' error types.
    let mut deferred_error: Option<PipelineError> = None;
    pool.complete_fixups(|p, n, write_ctx| {
        if deferred_error.is_some() {
            return Ok(());
        }
        if let Err(e) = emit_expr(p, ast, analyser, tracer, n, write_ctx) {
            deferred_error = Some(e);
        }
        Ok(())
    })?;
    if let Some(e) = deferred_error {
        return Err(e);
    }

    Ok(())
}

/// Everything `compile_ast` produces for one file: the emitted opcodes and
/// the file's composite type (spec §8 scenario 1 observes both).
pub struct CompiledFile {
    pub opcodes: OpcodePool,
    pub types: TypePool,
    pub file_type: TypeId,
}

/// Resolves names across `root` against `analyser`'s live scope stack, builds
/// the file composite type, then emits opcodes for each of `root`'s
/// top-level `Definition`s.
pub fn compile_ast(
    ast: &AstPool,
    root: AstNodeId,
    analyser: &LexicalAnalyser,
    tracer: &mut dyn Tracer,
) -> PipelineResult<CompiledFile> {
    debug_assert_eq!(ast.tag_of(root), AstTag::File);
    tracer.trace_ast_root("File", ast.word_len());

    let mut types = TypePool::new();
    let file_type = compile_file_type(&mut types, ast, root, tracer)?;

    let mut opcodes = OpcodePool::new();
    for node in ast.direct_children_of(root) {
        if ast.tag_of(node) == AstTag::Definition {
            compile_definition(&mut opcodes, ast, analyser, tracer, node)?;
        }
    }
    Ok(CompiledFile { opcodes, types, file_type })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::trace::NoopTracer;
    use ember_core::CollectingSink;
    use ember_opcode::OpcodeInstr;

    fn run(fixture: fixtures::Fixture) -> CompiledFile {
        let mut errors = CollectingSink::new();
        let mut analyser = LexicalAnalyser::new();
        analyser
            .set_prelude_scope(&fixture.ast, fixture.root, &fixture.interner, &mut errors)
            .unwrap();
        let mut tracer = NoopTracer;
        compile_ast(&fixture.ast, fixture.root, &analyser, &mut tracer).unwrap()
    }

    /// spec §8 scenario 1: `let x = 3`.
    #[test]
    fn let_binding_emits_value_integer_then_end_code() {
        let compiled = run(fixtures::by_name("let-binding").unwrap());
        let pool = &compiled.opcodes;
        let codes: Vec<Opcode> = pool.instrs().map(|(_, instr)| instr.code).collect();
        assert_eq!(codes, vec![Opcode::ValueInteger, Opcode::EndCode]);

        let (_, first) = pool.instrs().next().unwrap();
        assert_eq!(first.data, OpcodeData::Integer(3));
    }

    /// spec §8 scenario 1's type-pool observation: one open composite (the
    /// file type) with one member named `x`.
    #[test]
    fn let_binding_records_one_open_file_composite_with_one_member() {
        let mut fixture = fixtures::by_name("let-binding").unwrap();
        let x = ember_core::Interner::intern(&mut fixture.interner, "x");
        let compiled = run(fixture);

        assert!(matches!(
            compiled.types.metrics_from_id(compiled.file_type),
            Err(ember_types::TypeError::UnresolvedMetrics(_))
        ));
        let member = compiled.types.member_by_name(compiled.file_type, x).unwrap();
        assert_eq!(member.name, x);
        assert_eq!(member.rank, 0);
    }

    /// spec §8 scenario 2's exact prescribed opcode trace.
    #[test]
    fn function_add_emits_signature_then_deferred_body() {
        let compiled = run(fixtures::by_name("function-add").unwrap());
        let pool = &compiled.opcodes;
        let codes: Vec<Opcode> = pool.instrs().map(|(_, instr)| instr.code).collect();
        assert_eq!(
            codes,
            vec![
                Opcode::Signature,
                Opcode::BindBody,
                Opcode::EndCode,
                Opcode::LoadScope,
                Opcode::LoadScope,
                Opcode::BinaryArithmeticOp,
                Opcode::Return,
                Opcode::EndCode,
            ]
        );

        let mut instrs = pool.instrs();
        let (_, sig) = instrs.next().unwrap();
        assert_eq!(sig.data, OpcodeData::Signature { value_count: 2 });

        let load_scopes: Vec<&OpcodeData> = pool
            .instrs()
            .filter(|(_, instr)| instr.code == Opcode::LoadScope)
            .map(|(_, instr)| &instr.data)
            .collect();
        assert_eq!(load_scopes, vec![&OpcodeData::LoadScope { out: 0, rank: 0 }, &OpcodeData::LoadScope { out: 0, rank: 1 }]);
    }

    /// spec §8 scenario 3: `a[i] = v` evaluates the new value, moves it onto
    /// the write-context stack, then re-emits the index expression with
    /// `expects_write_ctx` set so `Index` performs the store directly rather
    /// than a load.
    #[test]
    fn array_store_emits_index_with_expects_write_ctx_after_set_write_ctx() {
        let compiled = run(fixtures::by_name("array-store").unwrap());
        let pool = &compiled.opcodes;
        let instrs: Vec<&OpcodeInstr> = pool.instrs().map(|(_, instr)| instr).collect();

        // The last six instructions belong to the `a[i] = v` definition;
        // the three `let`s that precede it each emit `ValueInteger, EndCode`.
        let tail = &instrs[instrs.len() - 6..];
        let codes: Vec<Opcode> = tail.iter().map(|instr| instr.code).collect();
        assert_eq!(
            codes,
            vec![
                Opcode::LoadScope,
                Opcode::SetWriteCtx,
                Opcode::LoadScope,
                Opcode::LoadScope,
                Opcode::Index,
                Opcode::EndCode,
            ]
        );

        let index_instr = &tail[4];
        assert!(index_instr.expects_write_ctx);
    }
}
