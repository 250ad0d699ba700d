//! Bundled smoke-test ASTs, built directly through `ember_ast::AstPool`'s
//! builder API rather than parsed from source text — no tokenizer/parser
//! ships with this front-end (spec §4.5), so these stand in for the source
//! snippets spec §8's testable scenarios describe.

use ember_ast::attach::{DefinitionData, IdentifierData, LitIntegerData, ParameterData};
use ember_ast::{AstBuilderToken, AstNodeId, AstPool, AstTag};
use ember_core::{SimpleInterner, SourceId};

/// One named fixture: the AST it builds, its root, and the interner that
/// holds the spellings of every identifier it references.
pub struct Fixture {
    pub name: &'static str,
    pub description: &'static str,
    pub ast: AstPool,
    pub root: AstNodeId,
    pub interner: SimpleInterner,
}

const SOURCE: SourceId = SourceId::INVALID;

/// spec §8 scenario 1: `let x = 3` at file scope.
fn let_binding() -> Fixture {
    let mut ast = AstPool::new();
    let mut interner = SimpleInterner::new();
    let x = interner.intern("x");

    let three = pool_push_lit_integer(&mut ast, 3);
    let def_x = ast.push_typed_node(three, SOURCE, 0, &DefinitionData { identifier_id: x });
    ast.push_node(def_x, SOURCE, AstTag::File, 0, &[]);

    let root = ast.complete_ast().expect("fixture AST is well-formed");
    Fixture {
        name: "let-binding",
        description: "let x = 3",
        ast,
        root,
        interner,
    }
}

fn pool_push_lit_integer(pool: &mut AstPool, value: u64) -> AstBuilderToken {
    pool.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &LitIntegerData { value })
}

/// spec §8 scenario 2: `let add = func(a: s32, b: s32) -> s32 = a + b`.
/// Parameter type annotations aren't represented here: nothing downstream
/// of this demonstration pipeline consumes them (`ember-types`'s numeric
/// construction is exercised directly by its own tests instead).
fn function_add() -> Fixture {
    let mut ast = AstPool::new();
    let mut interner = SimpleInterner::new();
    let add = interner.intern("add");
    let a = interner.intern("a");
    let b = interner.intern("b");

    let param_a = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &ParameterData { identifier_id: a });
    // `push_node`'s `first_child` token only threads the *first* child;
    // `param_b` becomes its sibling simply by being pushed next, before the
    // `Signature` node that roots both of them.
    let _param_b = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &ParameterData { identifier_id: b });
    let signature = ast.push_node(param_a, SOURCE, AstTag::Signature, 0, &[]);

    let a_ref = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &IdentifierData { identifier_id: a });
    let _b_ref = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &IdentifierData { identifier_id: b });
    let _sum = ast.push_node(a_ref, SOURCE, AstTag::OpAdd, 0, &[]);

    let func = ast.push_node(signature, SOURCE, AstTag::Func, 0, &[]);
    let def_add = ast.push_typed_node(func, SOURCE, 0, &DefinitionData { identifier_id: add });
    ast.push_node(def_add, SOURCE, AstTag::File, 0, &[]);

    let root = ast.complete_ast().expect("fixture AST is well-formed");
    Fixture {
        name: "function-add",
        description: "let add = func(a: s32, b: s32) -> s32 = a + b",
        ast,
        root,
        interner,
    }
}

/// spec §8 scenario 3: `a[i] = v`, with `a`, `i` and `v` each a preceding
/// file-scope `let` so the store's operands are ordinary lexical loads.
fn array_store() -> Fixture {
    let mut ast = AstPool::new();
    let mut interner = SimpleInterner::new();
    let a = interner.intern("a");
    let i = interner.intern("i");
    let v = interner.intern("v");

    let zero = pool_push_lit_integer(&mut ast, 0);
    let def_a = ast.push_typed_node(zero, SOURCE, 0, &DefinitionData { identifier_id: a });
    let zero_i = pool_push_lit_integer(&mut ast, 0);
    let _def_i = ast.push_typed_node(zero_i, SOURCE, 0, &DefinitionData { identifier_id: i });
    let zero_v = pool_push_lit_integer(&mut ast, 0);
    let _def_v = ast.push_typed_node(zero_v, SOURCE, 0, &DefinitionData { identifier_id: v });

    let a_ref = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &IdentifierData { identifier_id: a });
    let _i_ref = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &IdentifierData { identifier_id: i });
    let index = ast.push_node(a_ref, SOURCE, AstTag::OpArrayIndex, 0, &[]);
    let _v_ref = ast.push_typed_node(AstBuilderToken::NO_CHILDREN, SOURCE, 0, &IdentifierData { identifier_id: v });
    let set = ast.push_node(index, SOURCE, AstTag::OpSet, 0, &[]);

    // The store itself has no name of its own; it rides along as the
    // value of one more file-scope definition purely so this demonstration
    // pipeline (which only walks a `File`'s `Definition` children) has
    // somewhere to hang it.
    let store = interner.intern("store");
    // `_def_i`, `_def_v` and `def_store` chain onto `def_a` as siblings by
    // virtue of having been pushed in between it and the `File` node below.
    let _def_store = ast.push_typed_node(set, SOURCE, 0, &DefinitionData { identifier_id: store });

    ast.push_node(def_a, SOURCE, AstTag::File, 0, &[]);

    let root = ast.complete_ast().expect("fixture AST is well-formed");
    Fixture {
        name: "array-store",
        description: "a[i] = v",
        ast,
        root,
        interner,
    }
}

/// Every bundled fixture, in the order `--list` prints them.
pub fn all() -> Vec<Fixture> {
    vec![let_binding(), function_add(), array_store()]
}

pub fn by_name(name: &str) -> Option<Fixture> {
    all().into_iter().find(|f| f.name == name)
}
