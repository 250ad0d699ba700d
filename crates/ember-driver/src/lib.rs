//! CLI driver tying the four compiler cores together: config loading,
//! bundled smoke-test fixtures, and the three debug subcommands (spec §6).
//! There is no tokenizer/parser here — real source text is out of scope —
//! so the fixtures stand in for it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod pipeline;
pub mod trace;

pub use cli::Cli;
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{compile_ast, compile_file_type, CompiledFile};
