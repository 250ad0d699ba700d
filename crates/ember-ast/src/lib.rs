//! AST construction pipeline: a post-order scratch builder finalised into a
//! preorder, sibling-linked canonical tree (`AstPool::complete_ast`), plus
//! the two lowering passes that rewrite that tree before scope resolution
//! and opcode emission consume it (spec §4.1).

pub mod attach;
pub mod flags;
pub mod lower;
pub mod node;
pub mod pool;
pub mod tag;

pub use attach::NodeAttachment;
pub use lower::{lower_set_operations, lower_value_to_location};
pub use node::{AstBuilderToken, AstError, AstNodeHeader, AstNodeId, AstResult, MAX_AST_DEPTH};
pub use pool::AstPool;
pub use tag::AstTag;
