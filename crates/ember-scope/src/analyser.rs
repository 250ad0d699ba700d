use crate::binding::NameBinding;
use crate::error::{ScopeError, ScopeResult};
use crate::scope_map::ScopeMap;
use ember_ast::{AstNodeId, AstPool, AstTag, MAX_AST_DEPTH};
use ember_core::{Diagnostic, ErrorSink, Interner};
use indexmap::IndexMap;

/// Depth-stacked scope resolver (spec §4.4). Walks a completed, lowered AST
/// and binds every `Identifier` occurrence to the `Definition`/`Parameter`
/// that introduces it, recording the result in a side table keyed by
/// `AstNodeId` rather than mutating the AST's own attachment words in place
/// (`ember-ast` exposes no such mutation API, and keeping the two concerns
/// decoupled means the scope analyser never needs write access to the AST).
#[derive(Debug, Default)]
pub struct LexicalAnalyser {
    scopes: Vec<ScopeMap>,
    bindings: IndexMap<AstNodeId, NameBinding>,
}

impl LexicalAnalyser {
    pub fn new() -> Self {
        LexicalAnalyser::default()
    }

    pub fn binding_of(&self, node: AstNodeId) -> Option<NameBinding> {
        self.bindings.get(&node).copied()
    }

    pub fn bindings(&self) -> &IndexMap<AstNodeId, NameBinding> {
        &self.bindings
    }

    fn push_scope(&mut self, scope: ScopeMap) -> ScopeResult<()> {
        if self.scopes.len() as u32 >= MAX_AST_DEPTH {
            return Err(ScopeError::MaxDepthExceeded { max_depth: MAX_AST_DEPTH });
        }
        self.scopes.push(scope);
        Ok(())
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Binds the prelude's own top-level definitions, leaving its scope
    /// live underneath every later file's resolution. Must be called at
    /// most once, before any `resolve_names` call.
    pub fn set_prelude_scope(
        &mut self,
        ast: &AstPool,
        prelude: AstNodeId,
        interner: &dyn Interner,
        errors: &mut dyn ErrorSink,
    ) -> ScopeResult<()> {
        debug_assert!(ast.tag_of(prelude) == AstTag::File);
        debug_assert!(self.scopes.is_empty());
        self.resolve_names_root(ast, prelude, interner, errors)
    }

    /// Binds one file's definitions and expressions against the live scope
    /// stack (prelude plus any enclosing scopes), then pops the file's own
    /// top-level scope back off before returning.
    pub fn resolve_names(
        &mut self,
        ast: &AstPool,
        root: AstNodeId,
        interner: &dyn Interner,
        errors: &mut dyn ErrorSink,
    ) -> ScopeResult<()> {
        debug_assert!(ast.tag_of(root) == AstTag::File);
        debug_assert!(!self.scopes.is_empty());
        let result = self.resolve_names_root(ast, root, interner, errors);
        self.pop_scope();
        result
    }

    fn resolve_names_root(
        &mut self,
        ast: &AstPool,
        root: AstNodeId,
        interner: &dyn Interner,
        errors: &mut dyn ErrorSink,
    ) -> ScopeResult<()> {
        let mut scope = ScopeMap::new();

        for node in ast.direct_children_of(root) {
            if ast.tag_of(node) != AstTag::Definition {
                continue;
            }
            let data = ast.attachment_as::<ember_ast::attach::DefinitionData>(node);
            if !scope.insert(data.identifier_id) {
                report_duplicate(ast, node, data.identifier_id, interner, errors);
            }
        }

        self.push_scope(scope)?;

        let mut has_error = false;

        for node in ast.direct_children_of(root) {
            if ast.tag_of(node) == AstTag::Definition {
                if let Some(value) = ast.first_child_of(node) {
                    self.resolve_names_rec(ast, value, true, interner, errors, &mut has_error)?;
                    if let Some(type_expr) = ast.next_sibling_of(value) {
                        self.resolve_names_rec(ast, type_expr, true, interner, errors, &mut has_error)?;
                    }
                }
            } else {
                self.resolve_names_rec(ast, node, true, interner, errors, &mut has_error)?;
            }
        }

        if has_error {
            return Err(ScopeError::UnresolvedNames);
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_names_rec(
        &mut self,
        ast: &AstPool,
        node: AstNodeId,
        do_pop: bool,
        interner: &dyn Interner,
        errors: &mut dyn ErrorSink,
        has_error: &mut bool,
    ) -> ScopeResult<()> {
        let tag = ast.tag_of(node);

        if tag == AstTag::Identifier {
            let data = ast.attachment_as::<ember_ast::attach::IdentifierData>(node);

            for depth in (0..self.scopes.len()).rev() {
                if let Some(rank) = self.scopes[depth].get(data.identifier_id) {
                    let out = (self.scopes.len() - 1 - depth) as u16;
                    self.bindings.insert(node, NameBinding::Lexical { out, rank });
                    return Ok(());
                }
            }

            let name = interner.resolve(data.identifier_id).unwrap_or("<unknown>");
            errors.report(Diagnostic::error(
                ast.source_id_of(node),
                format!("identifier `{name}` is not defined"),
            ));
            *has_error = true;
            return Ok(());
        }

        if tag == AstTag::Func {
            // A function's signature scope must stay live for its sibling
            // body, so it is popped explicitly here rather than by the
            // generic `Block`/`Signature` handling below.
            let signature = ast.first_child_of(node).expect("Func always has a Signature child");
            self.resolve_names_rec(ast, signature, false, interner, errors, has_error)?;

            let body = ast.next_sibling_of(signature).expect("Func's Signature always has a body sibling");
            self.resolve_names_rec(ast, body, true, interner, errors, has_error)?;

            self.pop_scope();
            return Ok(());
        }

        let mut needs_pop = false;

        if tag == AstTag::Definition || tag == AstTag::Parameter {
            let identifier_id = if tag == AstTag::Definition {
                ast.attachment_as::<ember_ast::attach::DefinitionData>(node).identifier_id
            } else {
                ast.attachment_as::<ember_ast::attach::ParameterData>(node).identifier_id
            };

            let scope = self.scopes.last_mut().expect("at least one scope is live during resolution");
            if !scope.insert(identifier_id) {
                report_duplicate(ast, node, identifier_id, interner, errors);
            }
        } else if tag == AstTag::Block || tag == AstTag::Signature {
            self.push_scope(ScopeMap::new())?;
            needs_pop = true;
        }

        for child in ast.direct_children_of(node) {
            self.resolve_names_rec(ast, child, true, interner, errors, has_error)?;
        }

        if needs_pop && do_pop {
            self.pop_scope();
        }

        Ok(())
    }
}

fn report_duplicate(
    ast: &AstPool,
    node: AstNodeId,
    identifier_id: ember_core::IdentifierId,
    interner: &dyn Interner,
    errors: &mut dyn ErrorSink,
) {
    let name = interner.resolve(identifier_id).unwrap_or("<unknown>");
    errors.report(Diagnostic::error(
        ast.source_id_of(node),
        format!("name `{name}` defined more than once"),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_ast::attach::{DefinitionData, IdentifierData, ParameterData};
    use ember_ast::{AstBuilderToken, AstPool};
    use ember_core::{ErrorSink, SimpleInterner, SourceId};

    fn ident(pool: &mut AstPool, id: ember_core::IdentifierId) -> AstBuilderToken {
        pool.push_typed_node(
            AstBuilderToken::NO_CHILDREN,
            SourceId::new(1),
            0,
            &IdentifierData { identifier_id: id },
        )
    }

    fn definition(
        pool: &mut AstPool,
        value: AstBuilderToken,
        id: ember_core::IdentifierId,
    ) -> AstBuilderToken {
        pool.push_typed_node(value, SourceId::new(1), 0, &DefinitionData { identifier_id: id })
    }

    fn parameter(pool: &mut AstPool, id: ember_core::IdentifierId) -> AstBuilderToken {
        pool.push_typed_node(
            AstBuilderToken::NO_CHILDREN,
            SourceId::new(1),
            0,
            &ParameterData { identifier_id: id },
        )
    }

    fn block(pool: &mut AstPool, first_child: AstBuilderToken) -> AstBuilderToken {
        pool.push_node(first_child, SourceId::new(1), AstTag::Block, 0, &[])
    }

    fn file(pool: &mut AstPool, first_child: AstBuilderToken) -> AstBuilderToken {
        pool.push_node(first_child, SourceId::new(1), AstTag::File, 0, &[])
    }

    /// `let x = 1; { let y = x; }` — the inner `x` occurrence resolves one
    /// scope out (`out=1`), and the outer `x` `Definition` is at rank 0 of
    /// the file scope.
    #[test]
    fn inner_scope_reference_binds_with_nonzero_out() {
        let mut pool = AstPool::new();
        let mut interner = SimpleInterner::new();
        let x = interner.intern("x");
        let y = interner.intern("y");

        // File { Definition(x, 1), Block { Definition(y, x) } }
        let one = pool.push_node(AstBuilderToken::NO_CHILDREN, SourceId::new(1), AstTag::LitInteger, 0, &[]);
        let outer_def = definition(&mut pool, one, x);
        let x_ref = ident(&mut pool, x);
        let inner_def = definition(&mut pool, x_ref, y);
        let _inner_block = block(&mut pool, inner_def);
        file(&mut pool, outer_def);

        let root = pool.complete_ast().unwrap();
        let mut analyser = LexicalAnalyser::new();
        let mut errors = ember_core::CollectingSink::new();
        analyser.set_prelude_scope(&pool, root, &interner, &mut errors).unwrap();

        assert!(!errors.has_errors());

        let block_node = pool.next_sibling_of(pool.first_child_of(root).unwrap()).unwrap();
        let def_in_block = pool.first_child_of(block_node).unwrap();
        let x_occurrence = pool.first_child_of(def_in_block).unwrap();

        let binding = analyser.binding_of(x_occurrence).expect("x should resolve");
        match binding {
            NameBinding::Lexical { out, .. } => assert_eq!(out, 1),
            other => panic!("expected Lexical, got {other:?}"),
        }
    }

    /// A function's `Signature` scope stays visible to its body, and is
    /// popped only after the body has been resolved.
    #[test]
    fn function_parameter_is_visible_in_body() {
        let mut pool = AstPool::new();
        let mut interner = SimpleInterner::new();
        let f = interner.intern("f");
        let a = interner.intern("a");

        // File { Definition(f) { Func { Signature { Parameter(a) }, Block { Identifier(a) } } } }
        let param = parameter(&mut pool, a);
        let signature = pool.push_node(param, SourceId::new(1), AstTag::Signature, 0, &[]);
        let a_ref = ident(&mut pool, a);
        let _body = block(&mut pool, a_ref);
        let func = pool.push_node(signature, SourceId::new(1), AstTag::Func, 0, &[]);
        let def = definition(&mut pool, func, f);
        file(&mut pool, def);

        let root = pool.complete_ast().unwrap();
        let mut analyser = LexicalAnalyser::new();
        let mut errors = ember_core::CollectingSink::new();
        analyser.set_prelude_scope(&pool, root, &interner, &mut errors).unwrap();

        assert!(!errors.has_errors());
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_reported() {
        let mut pool = AstPool::new();
        let mut interner = SimpleInterner::new();
        let x = interner.intern("x");

        let one = pool.push_node(AstBuilderToken::NO_CHILDREN, SourceId::new(1), AstTag::LitInteger, 0, &[]);
        let def_a = definition(&mut pool, one, x);
        let two = pool.push_node(AstBuilderToken::NO_CHILDREN, SourceId::new(1), AstTag::LitInteger, 0, &[]);
        let _def_b = definition(&mut pool, two, x);
        file(&mut pool, def_a);

        let root = pool.complete_ast().unwrap();
        let mut analyser = LexicalAnalyser::new();
        let mut errors = ember_core::CollectingSink::new();
        analyser.set_prelude_scope(&pool, root, &interner, &mut errors).unwrap();

        assert!(errors.has_errors());
    }

    #[test]
    fn unresolved_identifier_is_reported_and_surfaced_as_an_error() {
        let mut pool = AstPool::new();
        let interner = SimpleInterner::new();
        let missing = ember_core::IdentifierId::FIRST_NATURAL;

        let x_ref = ident(&mut pool, missing);
        file(&mut pool, x_ref);

        let root = pool.complete_ast().unwrap();
        let mut analyser = LexicalAnalyser::new();
        let mut errors = ember_core::CollectingSink::new();
        let result = analyser.set_prelude_scope(&pool, root, &interner, &mut errors);

        assert!(matches!(result, Err(ScopeError::UnresolvedNames)));
        assert!(errors.has_errors());
    }

    /// A `Definition` may reference another `Definition` declared later in
    /// the same file, because the root scope is pre-populated with every
    /// top-level name before any value expression is resolved.
    #[test]
    fn forward_reference_between_file_level_definitions_resolves() {
        let mut pool = AstPool::new();
        let mut interner = SimpleInterner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");

        let b_ref = ident(&mut pool, b);
        let def_a = definition(&mut pool, b_ref, a);

        let one = pool.push_node(AstBuilderToken::NO_CHILDREN, SourceId::new(1), AstTag::LitInteger, 0, &[]);
        let _def_b = definition(&mut pool, one, b);

        file(&mut pool, def_a);

        let root = pool.complete_ast().unwrap();
        let mut analyser = LexicalAnalyser::new();
        let mut errors = ember_core::CollectingSink::new();
        analyser.set_prelude_scope(&pool, root, &interner, &mut errors).unwrap();

        assert!(!errors.has_errors());
    }
}
