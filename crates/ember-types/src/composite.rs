use crate::id::TypeId;
use crate::tag::{TypeDisposition, TypeMetrics};
use ember_core::IdentifierId;
use indexmap::IndexMap;

/// A member's type, in one of two states: declared but not yet resolved (the
/// declaring expression has not been type-checked yet, which happens for
/// forward-referencing composites), or resolved to a concrete `TypeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Pending,
    Resolved(TypeId),
}

/// A member's byte offset within its composite, known only once every member
/// before it has a resolved type and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberValue {
    Pending,
    Resolved(u64),
}

/// One field of a composite type, in declaration order. `rank` is that
/// declaration order, stored explicitly so `type_member_by_rank` does not
/// depend on the member list never being reordered.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: IdentifierId,
    pub rank: u32,
    pub member_type: MemberType,
    pub offset: MemberValue,
    pub is_global: bool,
    pub is_pub: bool,
    pub is_mut: bool,
}

impl Member {
    pub fn is_resolved(&self) -> bool {
        matches!(self.member_type, MemberType::Resolved(_)) && matches!(self.offset, MemberValue::Resolved(_))
    }
}

/// A composite type still being constructed. Members may be added in any
/// order of resolution, but not re-resolved once set — `TypeError::MemberAlreadyResolved`
/// guards against a member's type or offset being overwritten silently.
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    pub disposition: TypeDisposition,
    pub members: Vec<Member>,
    by_name: IndexMap<IdentifierId, usize>,
    pub is_mut: bool,
}

impl CompositeBuilder {
    pub fn new(disposition: TypeDisposition) -> Self {
        CompositeBuilder {
            disposition,
            members: Vec::new(),
            by_name: IndexMap::new(),
            is_mut: false,
        }
    }

    pub fn member_index_by_name(&self, name: IdentifierId) -> Option<usize> {
        self.by_name.get(&name).copied()
    }

    pub fn push_member(&mut self, name: IdentifierId, is_global: bool, is_pub: bool, is_mut: bool) -> usize {
        let rank = self.members.len() as u32;
        let index = self.members.len();
        self.members.push(Member {
            name,
            rank,
            member_type: MemberType::Pending,
            offset: MemberValue::Pending,
            is_global,
            is_pub,
            is_mut,
        });
        self.by_name.insert(name, index);
        index
    }

    pub fn all_resolved(&self) -> bool {
        self.members.iter().all(Member::is_resolved)
    }
}

/// A composite whose member list is frozen. Its structural key is content-
/// hashed only once every member is resolved, at which point it can be
/// deduplicated against other sealed composites with identical shape.
#[derive(Debug, Clone)]
pub struct CompositeSealed {
    pub disposition: TypeDisposition,
    pub members: Vec<Member>,
    by_name: IndexMap<IdentifierId, usize>,
    pub metrics: TypeMetrics,
}

impl CompositeSealed {
    pub fn member_by_name(&self, name: IdentifierId) -> Option<&Member> {
        self.by_name.get(&name).map(|&i| &self.members[i])
    }

    pub fn member_by_rank(&self, rank: u32) -> Option<&Member> {
        self.members.get(rank as usize)
    }

    pub(crate) fn from_builder(builder: CompositeBuilder, metrics: TypeMetrics) -> Self {
        let mut by_name = IndexMap::new();
        for (index, member) in builder.members.iter().enumerate() {
            by_name.insert(member.name, index);
        }
        CompositeSealed {
            disposition: builder.disposition,
            members: builder.members,
            by_name,
            metrics,
        }
    }
}

/// One slot of the composite arena. Each `Builder`-kind `TypeName` indexes
/// into this arena; `type_seal_composite` transitions the slot in place so
/// existing `TypeId`s referring to it keep working.
#[derive(Debug, Clone)]
pub enum CompositeState {
    Open(CompositeBuilder),
    Sealed(CompositeSealed),
}

impl CompositeState {
    pub fn as_open(&self) -> Option<&CompositeBuilder> {
        match self {
            CompositeState::Open(b) => Some(b),
            CompositeState::Sealed(_) => None,
        }
    }

    pub fn as_open_mut(&mut self) -> Option<&mut CompositeBuilder> {
        match self {
            CompositeState::Open(b) => Some(b),
            CompositeState::Sealed(_) => None,
        }
    }

    pub fn as_sealed(&self) -> Option<&CompositeSealed> {
        match self {
            CompositeState::Sealed(s) => Some(s),
            CompositeState::Open(_) => None,
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, CompositeState::Sealed(_))
    }
}
