//! Ambient, cross-cutting data shared by every other crate in the workspace:
//! opaque id newtypes, the diagnostic vocabulary, and the minimal
//! `Interner`/`ErrorSink`/`SourceReader` interfaces the four compiler cores
//! are driven through.

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod interner;
pub mod source;

pub use diagnostics::{CollectingSink, Diagnostic, ErrorSink, PrintingSink, Severity};
pub use error::{FatalError, FatalResult};
pub use ids::{IdentifierId, SourceId, SyntheticIdAllocator};
pub use interner::{Interner, SimpleInterner};
pub use source::{FsSourceReader, SourceFile, SourceReader};
