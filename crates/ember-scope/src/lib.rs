//! Lexical scope analyser: walks a completed, lowered AST and binds every
//! `Identifier` occurrence to the `Definition`/`Parameter` that introduces
//! it, using a depth-stacked scope table (spec §4.4).

pub mod analyser;
pub mod binding;
pub mod error;
pub mod scope_map;

pub use analyser::LexicalAnalyser;
pub use binding::NameBinding;
pub use error::{ScopeError, ScopeResult};
pub use scope_map::ScopeMap;
