use std::process::ExitCode;

use clap::Parser;
use ember::cli::{Cli, Command};
use ember::commands;
use ember_core::FatalError;

/// Maps a `FatalError` to a process exit code (spec §7's "OS-error-encoded
/// exit code" requirement, the idiomatic replacement for the donor's
/// longjmp-anchored `error_exit`).
fn exit_code_for(err: &FatalError) -> u8 {
    match err {
        FatalError::Io { .. } | FatalError::NotUtf8 { .. } | FatalError::NulByte { .. } => 66, // EX_NOINPUT
        FatalError::Config(_) => 78,                                                          // EX_CONFIG
        FatalError::DiagnosticsReported { .. } => 1,
        _ => 70, // EX_SOFTWARE
    }
}

fn run(cli: Cli) -> Result<(), FatalError> {
    match &cli.command {
        Command::Check { files } => commands::check(cli.config.as_ref(), &cli.limits, files),
        Command::Ast { fixture, list } => commands::ast(fixture.as_deref(), *list),
        Command::DumpOpcodes { fixture, list, verbose } => commands::dump_opcodes(fixture.as_deref(), *list, *verbose),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
