//! Typed attachment views for the representative tag subset this crate
//! implements beyond the generic header + raw-word storage (spec §3's
//! "AstNode" data model). Every other tag still round-trips correctly
//! through `AstPool::push_node`/`attachment_of` — it just has no typed
//! accessor yet.

use crate::tag::AstTag;
use ember_core::IdentifierId;

/// A tag-gated view onto a node's trailing attachment words.
pub trait NodeAttachment: Sized {
    const TAG: AstTag;

    fn from_words(words: &[u64]) -> Self;
    fn to_words(&self) -> Vec<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierData {
    pub identifier_id: IdentifierId,
}

impl NodeAttachment for IdentifierData {
    const TAG: AstTag = AstTag::Identifier;

    fn from_words(words: &[u64]) -> Self {
        IdentifierData {
            identifier_id: IdentifierId::new(words[0] as u32),
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.identifier_id.as_u32() as u64]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionData {
    pub identifier_id: IdentifierId,
}

impl NodeAttachment for DefinitionData {
    const TAG: AstTag = AstTag::Definition;

    fn from_words(words: &[u64]) -> Self {
        DefinitionData {
            identifier_id: IdentifierId::new(words[0] as u32),
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.identifier_id.as_u32() as u64]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterData {
    pub identifier_id: IdentifierId,
}

impl NodeAttachment for ParameterData {
    const TAG: AstTag = AstTag::Parameter;

    fn from_words(words: &[u64]) -> Self {
        ParameterData {
            identifier_id: IdentifierId::new(words[0] as u32),
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.identifier_id.as_u32() as u64]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitIntegerData {
    pub value: u64,
}

impl NodeAttachment for LitIntegerData {
    const TAG: AstTag = AstTag::LitInteger;

    fn from_words(words: &[u64]) -> Self {
        LitIntegerData { value: words[0] }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.value]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LitFloatData {
    pub value: f64,
}

impl NodeAttachment for LitFloatData {
    const TAG: AstTag = AstTag::LitFloat;

    fn from_words(words: &[u64]) -> Self {
        LitFloatData {
            value: f64::from_bits(words[0]),
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.value.to_bits()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitCharData {
    pub code_point: u32,
}

impl NodeAttachment for LitCharData {
    const TAG: AstTag = AstTag::LitChar;

    fn from_words(words: &[u64]) -> Self {
        LitCharData {
            code_point: words[0] as u32,
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.code_point as u64]
    }
}

/// The string contents are interned by the (out-of-scope) identifier/string
/// interner collaborator; the node attaches only the resulting id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LitStringData {
    pub string_id: IdentifierId,
}

impl NodeAttachment for LitStringData {
    const TAG: AstTag = AstTag::LitString;

    fn from_words(words: &[u64]) -> Self {
        LitStringData {
            string_id: IdentifierId::new(words[0] as u32),
        }
    }

    fn to_words(&self) -> Vec<u64> {
        vec![self.string_id.as_u32() as u64]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lit_float_round_trips_through_bits() {
        let data = LitFloatData { value: 3.5 };
        let words = data.to_words();
        assert_eq!(LitFloatData::from_words(&words).value, 3.5);
    }
}
