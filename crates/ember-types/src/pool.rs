use crate::composite::{CompositeBuilder, CompositeSealed, CompositeState, Member};
use crate::error::{TypeError, TypeResult};
use crate::id::{TypeId, TypeName};
use crate::payload::{StructureKey, TypePayload};
use crate::tag::{StructureIndexKind, TypeDisposition, TypeMetrics, TypeTag};
use ember_core::{IdentifierId, SourceId};
use indexmap::IndexMap;

/// Interns structural types. `TypeId`s are stable for the lifetime of the
/// pool; composites additionally go through an open/sealed lifecycle so
/// members can be added incrementally while their declaring expressions are
/// still being checked.
///
/// Non-composite structure is deduplicated eagerly through `payload_dedup`.
/// Composite structure is only deduplicated once sealed, since two distinct
/// open composites cannot yet be compared for structural equality.
#[derive(Debug)]
pub struct TypePool {
    names: Vec<TypeName>,
    payloads: Vec<TypePayload>,
    composites: Vec<CompositeState>,
    payload_dedup: IndexMap<StructureKey, TypeId>,
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl TypePool {
    pub fn new() -> Self {
        let mut pool = TypePool {
            names: Vec::new(),
            payloads: Vec::new(),
            composites: Vec::new(),
            payload_dedup: IndexMap::new(),
        };
        // Slot 0 is reserved so `TypeId::INVALID` never aliases a real type.
        pool.names.push(TypeName {
            tag: TypeTag::Invalid,
            source: SourceId::INVALID,
            distinct_root: TypeId::INVALID,
            is_distinct: false,
            structure_index_kind: StructureIndexKind::Normal,
            structure_index: 0,
        });
        pool
    }

    fn push_name(&mut self, name: TypeName) -> TypeId {
        let id = TypeId::new(self.names.len() as u32);
        self.names.push(name);
        id
    }

    fn name(&self, id: TypeId) -> TypeResult<&TypeName> {
        self.names
            .get(id.as_u32() as usize)
            .filter(|_| !id.is_invalid())
            .ok_or(TypeError::InvalidTypeId(id))
    }

    pub fn tag_of(&self, id: TypeId) -> TypeTag {
        self.name(id).map(|n| n.tag).unwrap_or(TypeTag::Invalid)
    }

    fn intern_payload(&mut self, tag: TypeTag, source: SourceId, payload: TypePayload) -> TypeId {
        let key = StructureKey::Payload(tag, payload.clone());
        if let Some(&existing) = self.payload_dedup.get(&key) {
            return existing;
        }
        let structure_index = self.payloads.len() as u32;
        self.payloads.push(payload);
        let id = self.push_name(TypeName {
            tag,
            source,
            distinct_root: TypeId::INVALID,
            is_distinct: false,
            structure_index_kind: StructureIndexKind::Normal,
            structure_index,
        });
        self.payload_dedup.insert(key, id);
        id
    }

    pub fn create_simple(&mut self, tag: TypeTag, source: SourceId) -> TypeId {
        debug_assert!(!tag.is_composite() && !tag.is_array() && !tag.is_signature() && !tag.is_reference());
        self.intern_payload(tag, source, TypePayload::Simple)
    }

    pub fn create_numeric(&mut self, tag: TypeTag, bits: u8, is_signed: bool, source: SourceId) -> TypeId {
        debug_assert!(matches!(tag, TypeTag::Integer | TypeTag::Float));
        self.intern_payload(tag, source, TypePayload::Numeric { bits, is_signed })
    }

    pub fn create_reference(
        &mut self,
        tag: TypeTag,
        referenced: TypeId,
        is_opt: bool,
        is_multi: bool,
        is_mut: bool,
        source: SourceId,
    ) -> TypeId {
        debug_assert!(tag.is_reference());
        self.intern_payload(
            tag,
            source,
            TypePayload::Reference {
                referenced,
                is_opt,
                is_multi,
                is_mut,
            },
        )
    }

    pub fn create_array(&mut self, element: TypeId, count: u64, is_literal: bool, source: SourceId) -> TypeId {
        let tag = if is_literal { TypeTag::ArrayLiteral } else { TypeTag::Array };
        self.intern_payload(tag, source, TypePayload::Array { element, count })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_signature(
        &mut self,
        params: Vec<TypeId>,
        return_type: TypeId,
        is_proc: bool,
        parameter_list_is_unbound: bool,
        return_type_is_unbound: bool,
        source: SourceId,
    ) -> TypeId {
        let tag = if is_proc { TypeTag::Builtin } else { TypeTag::Func };
        self.intern_payload(
            tag,
            source,
            TypePayload::Signature {
                params,
                return_type,
                is_proc,
                parameter_list_is_unbound,
                return_type_is_unbound,
            },
        )
    }

    /// Begins a new open composite. Members may be added with
    /// `add_composite_member` until `seal_composite` is called.
    pub fn create_composite(&mut self, disposition: TypeDisposition, is_literal: bool, source: SourceId) -> TypeId {
        let tag = if is_literal {
            TypeTag::CompositeLiteral
        } else {
            TypeTag::Composite
        };
        let structure_index = self.composites.len() as u32;
        self.composites.push(CompositeState::Open(CompositeBuilder::new(disposition)));
        self.push_name(TypeName {
            tag,
            source,
            distinct_root: TypeId::INVALID,
            is_distinct: false,
            structure_index_kind: StructureIndexKind::Builder,
            structure_index,
        })
    }

    /// Creates a new `TypeId` that forwards to `target`'s composite builder
    /// slot. Used when a definition needs a `TypeId` for a composite before
    /// that composite has finished being parsed (the cyclic/self-referential
    /// composite case — e.g. a linked-list node containing a pointer to its
    /// own type).
    pub fn create_forward_alias(&mut self, target: TypeId, source: SourceId) -> TypeResult<TypeId> {
        let tag = self.name(target)?.tag;
        if !tag.is_composite() {
            return Err(TypeError::NotAComposite(target));
        }
        Ok(self.push_name(TypeName {
            tag,
            source,
            distinct_root: TypeId::INVALID,
            is_distinct: false,
            structure_index_kind: StructureIndexKind::Indirect,
            structure_index: target.as_u32(),
        }))
    }

    fn composite_arena_index(&self, id: TypeId) -> TypeResult<usize> {
        let mut current = self.name(id)?;
        let mut hops = 0;
        loop {
            match current.structure_index_kind {
                StructureIndexKind::Indirect => {
                    hops += 1;
                    if hops > self.names.len() {
                        return Err(TypeError::NotAComposite(id));
                    }
                    current = self.name(TypeId::new(current.structure_index))?;
                }
                StructureIndexKind::Builder | StructureIndexKind::Normal => {
                    return Ok(current.structure_index as usize);
                }
            }
        }
    }

    fn composite_state(&self, id: TypeId) -> TypeResult<&CompositeState> {
        if !self.name(id)?.tag.is_composite() {
            return Err(TypeError::NotAComposite(id));
        }
        let index = self.composite_arena_index(id)?;
        Ok(&self.composites[index])
    }

    fn composite_state_mut(&mut self, id: TypeId) -> TypeResult<&mut CompositeState> {
        if !self.name(id)?.tag.is_composite() {
            return Err(TypeError::NotAComposite(id));
        }
        let index = self.composite_arena_index(id)?;
        Ok(&mut self.composites[index])
    }

    pub fn add_composite_member(
        &mut self,
        composite: TypeId,
        name: IdentifierId,
        is_global: bool,
        is_pub: bool,
        is_mut: bool,
    ) -> TypeResult<u32> {
        let builder = self
            .composite_state_mut(composite)?
            .as_open_mut()
            .ok_or(TypeError::NotAnOpenComposite(composite))?;
        if builder.member_index_by_name(name).is_some() {
            return Err(TypeError::DuplicateMember { name });
        }
        Ok(builder.push_member(name, is_global, is_pub, is_mut) as u32)
    }

    pub fn set_composite_member_info(
        &mut self,
        composite: TypeId,
        name: IdentifierId,
        member_type: TypeId,
        offset: u64,
    ) -> TypeResult<()> {
        let builder = self
            .composite_state_mut(composite)?
            .as_open_mut()
            .ok_or(TypeError::NotAnOpenComposite(composite))?;
        let index = builder
            .member_index_by_name(name)
            .ok_or(TypeError::MemberNotFound { name })?;
        let member = &mut builder.members[index];
        if member.is_resolved() {
            return Err(TypeError::MemberAlreadyResolved { name });
        }
        member.member_type = crate::composite::MemberType::Resolved(member_type);
        member.offset = crate::composite::MemberValue::Resolved(offset);
        Ok(())
    }

    /// Freezes a composite's member list and assigns it computed metrics.
    /// Sealed composites are deduplicated structurally: two composites with
    /// the same disposition and same `(type, offset, flags)` member sequence
    /// collapse to the same `TypeId`, exactly like scalar payloads.
    pub fn seal_composite(&mut self, composite: TypeId, metrics: TypeMetrics) -> TypeResult<TypeId> {
        {
            let state = self.composite_state(composite)?;
            let builder = state.as_open().ok_or(TypeError::NotAnOpenComposite(composite))?;
            if !builder.all_resolved() {
                return Err(TypeError::IncompleteComposite(composite));
            }
        }
        let index = self.composite_arena_index(composite)?;
        let key = structural_key_of(&self.composites[index]);
        let placeholder = CompositeState::Open(CompositeBuilder::new(TypeDisposition::Invalid));
        if let CompositeState::Open(builder) = std::mem::replace(&mut self.composites[index], placeholder) {
            self.composites[index] = CompositeState::Sealed(CompositeSealed::from_builder(builder, metrics));
        }
        if let Some(&existing) = self.payload_dedup.get(&key) {
            return Ok(existing);
        }
        self.payload_dedup.insert(key, composite);
        Ok(composite)
    }

    /// Creates a nominally distinct alias of `base`: same structure, but
    /// never implicitly convertible to or from `base` or any of its other
    /// distinct aliases (used for named, non-structural type declarations).
    pub fn create_distinct(&mut self, base: TypeId, source: SourceId) -> TypeResult<TypeId> {
        let base_name = self.name(base)?;
        let tag = base_name.tag;
        let structure_index_kind = base_name.structure_index_kind;
        let structure_index = base_name.structure_index;
        let root = if base_name.is_distinct {
            base_name.distinct_root
        } else {
            base
        };
        Ok(self.push_name(TypeName {
            tag,
            source,
            distinct_root: root,
            is_distinct: true,
            structure_index_kind,
            structure_index,
        }))
    }

    fn resolve_distinct_root(&self, id: TypeId) -> TypeId {
        match self.name(id) {
            Ok(n) if n.is_distinct => n.distinct_root,
            _ => id,
        }
    }

    /// Structural + distinct-identity equality: two types are equal if they
    /// name the same distinct root (after distinct aliasing is unwound) and
    /// resolve to the same interned structure.
    pub fn type_is_equal(&self, a: TypeId, b: TypeId) -> bool {
        let a = self.resolve_distinct_root(a);
        let b = self.resolve_distinct_root(b);
        if a == b {
            return true;
        }
        let (Ok(na), Ok(nb)) = (self.name(a), self.name(b)) else {
            return false;
        };
        if na.tag != nb.tag {
            return false;
        }
        if na.tag.is_composite() {
            return self
                .composite_arena_index(a)
                .ok()
                .zip(self.composite_arena_index(b).ok())
                .map(|(ia, ib)| ia == ib)
                .unwrap_or(false);
        }
        self.payloads.get(na.structure_index as usize) == self.payloads.get(nb.structure_index as usize)
    }

    /// Mirrors the donor's widening-conversion table: numeric widening within
    /// the same signedness, comptime-numeric literals converting to any
    /// concrete numeric of the same kind, and optional-pointer widening.
    pub fn can_implicitly_convert_from_to(&self, from: TypeId, to: TypeId) -> bool {
        if self.type_is_equal(from, to) {
            return true;
        }
        let (Ok(nf), Ok(nt)) = (self.name(from), self.name(to)) else {
            return false;
        };
        match (nf.tag, nt.tag) {
            (TypeTag::CompInteger, TypeTag::Integer) | (TypeTag::CompFloat, TypeTag::Float) => true,
            (TypeTag::Integer, TypeTag::Integer) => {
                match (self.payloads.get(nf.structure_index as usize), self.payloads.get(nt.structure_index as usize)) {
                    (
                        Some(TypePayload::Numeric { bits: fb, is_signed: fs }),
                        Some(TypePayload::Numeric { bits: tb, is_signed: ts }),
                    ) => fs == ts && fb <= tb,
                    _ => false,
                }
            }
            (TypeTag::Ptr, TypeTag::Ptr) => match (
                self.payloads.get(nf.structure_index as usize),
                self.payloads.get(nt.structure_index as usize),
            ) {
                (
                    Some(TypePayload::Reference { referenced: rf, is_opt: false, .. }),
                    Some(TypePayload::Reference { referenced: rt, is_opt: true, .. }),
                ) => self.type_is_equal(*rf, *rt),
                _ => false,
            },
            _ => false,
        }
    }

    /// Finds the common type two operands of a binary operation can both
    /// convert to, preferring the more specific side. Returns `None` when
    /// neither side converts to the other.
    pub fn unify(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        if self.type_is_equal(a, b) {
            return Some(a);
        }
        if self.can_implicitly_convert_from_to(a, b) {
            return Some(b);
        }
        if self.can_implicitly_convert_from_to(b, a) {
            return Some(a);
        }
        None
    }

    pub fn member_by_name(&self, composite: TypeId, name: IdentifierId) -> TypeResult<&Member> {
        match self.composite_state(composite)? {
            CompositeState::Sealed(s) => s.member_by_name(name).ok_or(TypeError::MemberNotFound { name }),
            CompositeState::Open(b) => b
                .member_index_by_name(name)
                .map(|i| &b.members[i])
                .ok_or(TypeError::MemberNotFound { name }),
        }
    }

    pub fn member_by_rank(&self, composite: TypeId, rank: u32) -> TypeResult<&Member> {
        match self.composite_state(composite)? {
            CompositeState::Sealed(s) => s.member_by_rank(rank).ok_or(TypeError::RankNotFound { rank }),
            CompositeState::Open(b) => b.members.get(rank as usize).ok_or(TypeError::RankNotFound { rank }),
        }
    }

    pub fn metrics_from_id(&self, id: TypeId) -> TypeResult<TypeMetrics> {
        let name = self.name(id)?;
        if name.tag.is_composite() {
            return match self.composite_state(id)? {
                CompositeState::Sealed(s) => Ok(s.metrics),
                CompositeState::Open(_) => Err(TypeError::UnresolvedMetrics(id)),
            };
        }
        let payload = self
            .payloads
            .get(name.structure_index as usize)
            .ok_or(TypeError::UnresolvedMetrics(id))?;
        Ok(match (name.tag, payload) {
            (TypeTag::Boolean, _) => TypeMetrics::scalar(1),
            (TypeTag::Integer | TypeTag::Float, TypePayload::Numeric { bits, .. }) => {
                let bytes = (*bits as u32).div_ceil(8).next_power_of_two();
                TypeMetrics::scalar(bytes as u64)
            }
            (tag, _) if tag.is_reference() => TypeMetrics::scalar(8),
            (TypeTag::Array | TypeTag::ArrayLiteral, TypePayload::Array { element, count }) => {
                let elem = self.metrics_from_id(*element)?;
                let size = if *count == 0 { 0 } else { (*count - 1) * elem.stride + elem.size };
                TypeMetrics {
                    size,
                    stride: *count * elem.stride,
                    align: elem.align,
                }
            }
            (TypeTag::Void, _) => TypeMetrics::ZERO,
            _ => return Err(TypeError::UnresolvedMetrics(id)),
        })
    }
}

fn structural_key_of(state: &CompositeState) -> StructureKey {
    match state {
        CompositeState::Open(builder) => {
            StructureKey::Composite(builder.members.iter().map(member_key).collect())
        }
        CompositeState::Sealed(sealed) => {
            StructureKey::Composite(sealed.members.iter().map(member_key).collect())
        }
    }
}

fn member_key(m: &Member) -> (u32, u32, u8) {
    let type_id = match m.member_type {
        crate::composite::MemberType::Resolved(id) => id.as_u32(),
        crate::composite::MemberType::Pending => u32::MAX,
    };
    let offset = match m.offset {
        crate::composite::MemberValue::Resolved(o) => o as u32,
        crate::composite::MemberValue::Pending => u32::MAX,
    };
    let flags = (m.is_global as u8) | ((m.is_pub as u8) << 1) | ((m.is_mut as u8) << 2);
    (type_id, offset, flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(n: u32) -> IdentifierId {
        IdentifierId::new(IdentifierId::FIRST_NATURAL.as_u32() + n)
    }

    #[test]
    fn interning_same_numeric_twice_returns_same_id() {
        let mut pool = TypePool::new();
        let a = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);
        let b = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);
        assert_eq!(a, b);
        let c = pool.create_numeric(TypeTag::Integer, 32, false, SourceId::INVALID);
        assert_ne!(a, c);
    }

    #[test]
    fn resolving_a_member_twice_is_rejected() {
        let mut pool = TypePool::new();
        let s32 = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);
        let composite = pool.create_composite(TypeDisposition::User, false, SourceId::INVALID);
        pool.add_composite_member(composite, ident(0), false, true, false).unwrap();
        pool.set_composite_member_info(composite, ident(0), s32, 0).unwrap();
        let err = pool.set_composite_member_info(composite, ident(0), s32, 0).unwrap_err();
        assert!(matches!(err, TypeError::MemberAlreadyResolved { .. }));
    }

    #[test]
    fn self_referential_composite_seals_through_a_forward_alias() {
        let mut pool = TypePool::new();
        // struct Node { next: *?Node, value: s32 }
        let node = pool.create_composite(TypeDisposition::User, false, SourceId::INVALID);
        let node_alias = pool.create_forward_alias(node, SourceId::INVALID).unwrap();
        let next_ptr = pool.create_reference(TypeTag::Ptr, node_alias, true, false, false, SourceId::INVALID);
        let s32 = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);

        pool.add_composite_member(node, ident(0), false, true, false).unwrap();
        pool.add_composite_member(node, ident(1), false, true, false).unwrap();
        pool.set_composite_member_info(node, ident(0), next_ptr, 0).unwrap();
        pool.set_composite_member_info(node, ident(1), s32, 8).unwrap();

        let sealed = pool
            .seal_composite(node, TypeMetrics { size: 16, stride: 16, align: 8 })
            .unwrap();
        assert_eq!(sealed, node);
        assert!(pool.member_by_name(sealed, ident(1)).is_ok());
        // The alias still resolves to the now-sealed arena slot.
        assert!(pool.member_by_name(node_alias, ident(0)).is_ok());
    }

    #[test]
    fn comp_integer_implicitly_converts_to_sized_integer_but_not_back() {
        let mut pool = TypePool::new();
        let lit = pool.create_simple(TypeTag::CompInteger, SourceId::INVALID);
        let s32 = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);
        assert!(pool.can_implicitly_convert_from_to(lit, s32));
        assert!(!pool.can_implicitly_convert_from_to(s32, lit));
    }

    #[test]
    fn distinct_alias_is_not_implicitly_convertible_from_its_base() {
        let mut pool = TypePool::new();
        let s32 = pool.create_numeric(TypeTag::Integer, 32, true, SourceId::INVALID);
        let meters = pool.create_distinct(s32, SourceId::INVALID).unwrap();
        assert!(!pool.type_is_equal(s32, meters));
        assert!(!pool.can_implicitly_convert_from_to(s32, meters));
    }
}
