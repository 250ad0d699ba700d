use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpcodeError {
    #[error("fixup continuation with no preceding fixup to continue")]
    DanglingContinuation,

    #[error("fixup continuation follows a fixup that is itself deferred (non-transitive continuation)")]
    TransitiveContinuation,

    #[error("no source mapping recorded for opcode stream")]
    NoSourceMappings,
}

pub type OpcodeResult<T> = Result<T, OpcodeError>;
