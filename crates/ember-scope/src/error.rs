use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("scope stack depth exceeded its {max_depth} limit")]
    MaxDepthExceeded { max_depth: u32 },

    #[error("one or more names failed to resolve; see the error sink for details")]
    UnresolvedNames,
}

pub type ScopeResult<T> = Result<T, ScopeError>;
