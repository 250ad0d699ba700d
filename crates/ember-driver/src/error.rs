use ember_ast::AstTag;
use ember_opcode::OpcodeError;
use ember_types::TypeError;
use thiserror::Error;

/// Failures specific to the driver's own demonstration pipeline — as
/// opposed to `ember_core::FatalError`, which covers the four cores'
/// own unrecoverable conditions.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no emitter is wired up for AST tag {tag:?}")]
    UnsupportedNode { tag: AstTag },

    #[error("identifier occurrence has no resolved binding; run scope resolution first")]
    UnresolvedBinding,

    #[error("identifier resolved to a {kind} binding, which the demonstration emitter does not lower")]
    UnsupportedBinding { kind: &'static str },

    #[error(transparent)]
    Opcode(#[from] OpcodeError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("no fixture named {name:?}")]
    UnknownFixture { name: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
