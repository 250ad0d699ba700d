use crate::ids::SourceId;
use std::path::PathBuf;

/// Unrecoverable conditions. Propagated with `?` up to `main`, which maps
/// each variant to a process exit code — the idiomatic replacement for the
/// donor's longjmp-based `error_exit`.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: file is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("{path}: file contains a NUL byte, which is not permitted in source text")]
    NulByte { path: PathBuf },

    #[error("source {source_id:?}: maximum parse tree depth ({max_depth}) exceeded")]
    AstDepthExceeded { source_id: SourceId, max_depth: u32 },

    #[error("source {source_id:?}: exhausted the synthetic identifier range while lowering")]
    SyntheticIdsExhausted { source_id: SourceId },

    #[error("composite type member '{name}' was already resolved")]
    MemberAlreadyResolved { name: String },

    #[error("composite type already has a member named '{name}'")]
    DuplicateMember { name: String },

    #[error("type {type_id} has unresolved members and cannot be queried for metrics")]
    UnresolvedTypeMetrics { type_id: u32 },

    #[error("compilation reported {count} error diagnostic(s)")]
    DiagnosticsReported { count: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type FatalResult<T> = Result<T, FatalError>;
