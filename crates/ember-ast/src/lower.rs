//! The two AST lowering passes (spec §4.1.3, §4.1.4). Both rebuild a tree by
//! recursively copying the old one through the ordinary post-order builder
//! (`AstPool::push_node`) and finalising with `complete_ast`, exactly the
//! mechanism used for original construction — only the shape of a handful of
//! node kinds changes along the way.
//!
//! Mirrors `examples/original_source/core/ast_pool.cpp`'s `lower_tags_rec`/
//! `lower_locs_rec` family, generalised to safe, owned Rust data instead of
//! in-place pointer arithmetic over a shared arena.

use crate::attach::{DefinitionData, IdentifierData, NodeAttachment};
use crate::node::{AstBuilderToken, AstResult};
use crate::pool::AstPool;
use crate::tag::AstTag;
use ember_core::{IdentifierId, SyntheticIdAllocator};

/// Pass A: expands every `OpSetAdd` .. `OpSetShiftR` node into
/// `{ let _u = lhs.&; _u.* = _u.* op rhs }`. Plain `OpSet` (`=`) is left
/// untouched — it has no "op" to preserve against repeated lhs evaluation.
pub fn lower_set_operations(pool: &mut AstPool, root: crate::node::AstNodeId) -> AstResult<crate::node::AstNodeId> {
    lower_set_ops_node(pool, root);
    pool.complete_ast()
}

fn lower_set_ops_node(pool: &mut AstPool, node: crate::node::AstNodeId) -> AstBuilderToken {
    let tag = pool.tag_of(node);
    if tag.is_compound_set_op() {
        return lower_compound_set_op(pool, node);
    }
    copy_with_lowered_children(pool, node, lower_set_ops_node)
}

fn lower_compound_set_op(pool: &mut AstPool, node: crate::node::AstNodeId) -> AstBuilderToken {
    let source = pool.source_id_of(node);
    let base_op = pool
        .tag_of(node)
        .set_op_base()
        .expect("lower_compound_set_op called on a non-set-op node");

    let mut children = pool.direct_children_of(node);
    let lhs = children.next().expect("set-op node missing lhs");
    let rhs = children.next().expect("set-op node missing rhs");
    drop(children);

    // let _u = <lowered lhs>.&
    let lowered_lhs = lower_set_ops_node(pool, lhs);
    let addr_token = pool.push_node(lowered_lhs, source, AstTag::UOpAddr, 0, &[]);
    let def_token = pool.push_typed_node(
        addr_token,
        source,
        0,
        &DefinitionData {
            identifier_id: IdentifierId::FIRST_SYNTH,
        },
    );

    // _u.* = _u.* <op> <rhs>
    let ident_for_target =
        pool.push_typed_node(AstBuilderToken::NO_CHILDREN, source, 0, &IdentifierData {
            identifier_id: IdentifierId::FIRST_SYNTH,
        });
    let deref_target = pool.push_node(ident_for_target, source, AstTag::UOpDeref, 0, &[]);

    let ident_for_operand =
        pool.push_typed_node(AstBuilderToken::NO_CHILDREN, source, 0, &IdentifierData {
            identifier_id: IdentifierId::FIRST_SYNTH,
        });
    let deref_operand = pool.push_node(ident_for_operand, source, AstTag::UOpDeref, 0, &[]);

    lower_set_ops_node(pool, rhs);
    pool.push_node(deref_operand, source, base_op, 0, &[]);

    pool.push_node(deref_target, source, AstTag::OpSet, 0, &[]);

    pool.push_node(def_token, source, AstTag::Block, 0, &[])
}

fn copy_with_lowered_children(
    pool: &mut AstPool,
    node: crate::node::AstNodeId,
    lower_child: fn(&mut AstPool, crate::node::AstNodeId) -> AstBuilderToken,
) -> AstBuilderToken {
    let header = pool.header_of(node);
    let attachment = pool.attachment_of(node).to_vec();
    let source = pool.source_id_of(node);
    let children: Vec<crate::node::AstNodeId> = pool.direct_children_of(node).collect();

    let mut first_child_token = AstBuilderToken::NO_CHILDREN;
    for (index, child) in children.into_iter().enumerate() {
        let token = lower_child(pool, child);
        if index == 0 {
            first_child_token = token;
        }
    }
    pool.push_node(first_child_token, source, header.tag, header.flags, &attachment)
}

/// Pass B: outlines any non-location operand of `&`/`[]`/`.field` into a
/// synthetic `let` binding, scoped to the nearest enclosing `Block`/`File`.
pub fn lower_value_to_location(
    pool: &mut AstPool,
    root: crate::node::AstNodeId,
    synth: &mut SyntheticIdAllocator,
) -> AstResult<crate::node::AstNodeId> {
    lower_locations_block_like(pool, root, synth)?;
    pool.complete_ast()
}

fn lower_locations_block_like(
    pool: &mut AstPool,
    node: crate::node::AstNodeId,
    synth: &mut SyntheticIdAllocator,
) -> AstResult<AstBuilderToken> {
    let header = pool.header_of(node);
    let attachment = pool.attachment_of(node).to_vec();
    let source = pool.source_id_of(node);
    let children: Vec<crate::node::AstNodeId> = pool.direct_children_of(node).collect();

    let mut first_token: Option<AstBuilderToken> = None;
    for child in children {
        let mut defs = Vec::new();
        let stmt_token = lower_locations_promote(pool, child, synth, &mut defs)?;
        if first_token.is_none() {
            first_token = defs.first().copied().or(Some(stmt_token));
        }
    }

    Ok(pool.push_node(
        first_token.unwrap_or(AstBuilderToken::NO_CHILDREN),
        source,
        header.tag,
        header.flags,
        &attachment,
    ))
}

/// Recursively lowers `node`, hoisting any value-expression that sits where
/// a location is required into a synthetic `Definition` pushed immediately
/// before it (and thus, by the flat builder's append order, before whatever
/// statement it belongs to). `defs` collects the tokens of hoisted
/// definitions purely so the caller can identify the first one pushed; the
/// definitions are already in their correct builder position by the time
/// this returns.
fn lower_locations_promote(
    pool: &mut AstPool,
    node: crate::node::AstNodeId,
    synth: &mut SyntheticIdAllocator,
    defs: &mut Vec<AstBuilderToken>,
) -> AstResult<AstBuilderToken> {
    let tag = pool.tag_of(node);

    if tag == AstTag::Block {
        return lower_locations_block_like(pool, node, synth);
    }

    let header = pool.header_of(node);
    let attachment = pool.attachment_of(node).to_vec();
    let source = pool.source_id_of(node);
    let mut children = pool.direct_children_of(node);
    let first_child = children.next();
    let rest: Vec<crate::node::AstNodeId> = children.collect();

    let Some(first_child) = first_child else {
        return Ok(pool.push_node(AstBuilderToken::NO_CHILDREN, source, header.tag, header.flags, &attachment));
    };

    let first_child_tag = pool.tag_of(first_child);
    let needs_promotion = tag.needs_location() && !first_child_tag.provides_location();

    let first_child_token = if needs_promotion {
        let value_token = lower_locations_promote(pool, first_child, synth, defs)?;
        let id = synth
            .alloc()
            .ok_or(crate::node::AstError::SyntheticIdsExhausted)?;
        let def_token = pool.push_typed_node(
            value_token,
            source,
            0,
            &DefinitionData { identifier_id: id },
        );
        defs.push(def_token);

        pool.push_typed_node(
            AstBuilderToken::NO_CHILDREN,
            source,
            0,
            &IdentifierData { identifier_id: id },
        )
    } else {
        lower_locations_promote(pool, first_child, synth, defs)?
    };

    for child in rest {
        lower_locations_promote(pool, child, synth, defs)?;
    }

    Ok(pool.push_node(first_child_token, source, header.tag, header.flags, &attachment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::AstNodeId;
    use ember_core::SourceId;

    fn identifier(pool: &mut AstPool, id: IdentifierId) -> AstBuilderToken {
        pool.push_typed_node(
            AstBuilderToken::NO_CHILDREN,
            SourceId::new(1),
            0,
            &IdentifierData { identifier_id: id },
        )
    }

    fn count_identifier(pool: &AstPool, root: AstNodeId, id: IdentifierId) -> usize {
        let mut count = if pool.tag_of(root) == AstTag::Identifier
            && pool.attachment_as::<IdentifierData>(root).identifier_id == id
        {
            1
        } else {
            0
        };
        for (node, _) in pool.preorder_ancestors_of(root) {
            if pool.tag_of(node) == AstTag::Identifier
                && pool.attachment_as::<IdentifierData>(node).identifier_id == id
            {
                count += 1;
            }
        }
        count
    }

    #[test]
    fn set_op_lowering_produces_block_with_definition_and_set() {
        let x = IdentifierId::new(100);
        let mut pool = AstPool::new();
        let lhs = identifier(&mut pool, x);
        let rhs = pool.push_typed_node(
            AstBuilderToken::NO_CHILDREN,
            SourceId::new(1),
            0,
            &crate::attach::LitIntegerData { value: 1 },
        );
        pool.push_node(lhs, SourceId::new(1), AstTag::OpSetAdd, 0, &[]);
        let _ = rhs;
        let root = pool.complete_ast().unwrap();

        let lowered_root = lower_set_operations(&mut pool, root).unwrap();

        assert_eq!(pool.tag_of(lowered_root), AstTag::Block);
        let children: Vec<AstNodeId> = pool.direct_children_of(lowered_root).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(pool.tag_of(children[0]), AstTag::Definition);
        assert_eq!(pool.tag_of(children[1]), AstTag::OpSet);
        assert_eq!(
            pool.attachment_as::<DefinitionData>(children[0]).identifier_id,
            IdentifierId::FIRST_SYNTH
        );

        // lhs (x) appears exactly once in the lowered tree: inside the
        // Definition's `.&` expression.
        assert_eq!(count_identifier(&pool, lowered_root, x), 1);
    }

    #[test]
    fn value_to_location_lifting_hoists_non_location_operand() {
        let a = IdentifierId::new(101);
        let b = IdentifierId::new(102);
        let mut pool = AstPool::new();
        let lhs = identifier(&mut pool, a);
        let rhs = identifier(&mut pool, b);
        let _ = rhs;
        let add = pool.push_node(lhs, SourceId::new(1), AstTag::OpAdd, 0, &[]);
        let addr = pool.push_node(add, SourceId::new(1), AstTag::UOpAddr, 0, &[]);
        pool.push_node(addr, SourceId::new(1), AstTag::Block, 0, &[]);
        let root = pool.complete_ast().unwrap();

        let mut synth = SyntheticIdAllocator::new();
        let lowered_root = lower_value_to_location(&mut pool, root, &mut synth).unwrap();

        assert_eq!(pool.tag_of(lowered_root), AstTag::Block);
        let children: Vec<AstNodeId> = pool.direct_children_of(lowered_root).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(pool.tag_of(children[0]), AstTag::Definition);
        assert_eq!(pool.tag_of(children[1]), AstTag::UOpAddr);

        let hoisted_id = pool.attachment_as::<DefinitionData>(children[0]).identifier_id;
        assert_eq!(hoisted_id, IdentifierId::SECOND_SYNTH);

        let addr_child = pool.first_child_of(children[1]).unwrap();
        assert_eq!(pool.tag_of(addr_child), AstTag::Identifier);
        assert_eq!(
            pool.attachment_as::<IdentifierData>(addr_child).identifier_id,
            hoisted_id
        );
    }
}
