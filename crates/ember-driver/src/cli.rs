use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ember", bin_name = "ember")]
#[command(about = "Front-end driver for the ember compiler core")]
pub struct Cli {
    #[command(flatten)]
    pub limits: LimitArgs,

    /// Path to a TOML config file; CLI flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Runtime-limit knobs, spec §6's CLI surface. All are optional: an unset
/// flag leaves the config file's (or the built-in default's) value alone.
#[derive(Args, Default)]
pub struct LimitArgs {
    #[arg(long, value_name = "N")]
    pub worker_thread_count: Option<u32>,

    #[arg(long, value_name = "N")]
    pub max_string_length: Option<u32>,

    #[arg(long, value_name = "N")]
    pub max_concurrent_reads: Option<u32>,

    #[arg(long, value_name = "N")]
    pub file_capacity: Option<u32>,

    #[arg(long, value_name = "N")]
    pub identifier_capacity: Option<u32>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate configuration and confirm every input file exists.
    Check {
        /// Source files to check for presence (not parsed: no tokenizer/parser
        /// ships in this front-end).
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Print the preorder dump of a bundled smoke-test fixture's AST.
    Ast {
        /// Name of a fixture from `ember::fixtures` (see `--list` to enumerate).
        #[arg(long, value_name = "NAME")]
        fixture: Option<String>,

        /// List available fixture names and exit.
        #[arg(long)]
        list: bool,
    },

    /// Run a bundled fixture through scope resolution and opcode emission,
    /// then print the resulting opcode stream.
    DumpOpcodes {
        #[arg(long, value_name = "NAME")]
        fixture: Option<String>,

        #[arg(long)]
        list: bool,

        /// Print one line per emitted opcode instead of just the tally.
        #[arg(short = 'v', long)]
        verbose: bool,
    },
}
