/// The resolved meaning of an identifier occurrence (spec's `NameBinding`
/// data model). The lexical scope analyser itself only ever produces
/// `Lexical` bindings (`resolve_names_rec`'s `Identifier` case walks the live
/// scope stack and nothing else); `Closure` and `Global` are the encodings a
/// later closure-conversion / global-promotion pass rewrites some lexical
/// bindings into, and are modeled here so downstream consumers have one type
/// to match on regardless of which pass produced a given binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameBinding {
    /// Found `out` scopes above the occurrence, at `rank` within that scope.
    Lexical { out: u16, rank: u16 },
    /// Closed over from an enclosing function's scope.
    Closure { rank: u16 },
    /// A file-level global.
    Global { file_index: u32, rank: u16 },
}

impl NameBinding {
    pub fn is_lexical(&self) -> bool {
        matches!(self, NameBinding::Lexical { .. })
    }
}
