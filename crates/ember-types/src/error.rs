use crate::id::TypeId;
use ember_core::IdentifierId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("member {name:?} already has a resolved type")]
    MemberAlreadyResolved { name: IdentifierId },

    #[error("duplicate member {name:?} in composite")]
    DuplicateMember { name: IdentifierId },

    #[error("composite member {name:?} not found")]
    MemberNotFound { name: IdentifierId },

    #[error("composite has no member at rank {rank}")]
    RankNotFound { rank: u32 },

    #[error("type {0:?} has no composite builder to add members to")]
    NotAnOpenComposite(TypeId),

    #[error("type {0:?} is not a composite type")]
    NotAComposite(TypeId),

    #[error("composite {0:?} cannot be sealed: one or more members are unresolved")]
    IncompleteComposite(TypeId),

    #[error("type {0:?} has no computed size/stride/align metrics yet")]
    UnresolvedMetrics(TypeId),

    #[error("type id {0:?} is invalid or out of range")]
    InvalidTypeId(TypeId),
}

pub type TypeResult<T> = Result<T, TypeError>;
