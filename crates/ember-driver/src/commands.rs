//! Subcommand bodies. Kept in one module rather than split one-file-per-
//! subcommand: this driver only has three, and a dedicated directory for
//! each would be more indirection than the surface needs.

use crate::cli::{Command, LimitArgs};
use crate::config::Config;
use crate::fixtures;
use crate::pipeline::compile_ast;
use crate::trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
use ember_core::{CollectingSink, FatalError, FatalResult};
use ember_scope::LexicalAnalyser;
use std::path::PathBuf;

fn load_config(config_path: Option<&PathBuf>, limits: &LimitArgs) -> FatalResult<Config> {
    let mut config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(n) = limits.worker_thread_count {
        config.limits.worker_thread_count = n;
    }
    if let Some(n) = limits.max_string_length {
        config.limits.max_string_length = n;
    }
    if let Some(n) = limits.max_concurrent_reads {
        config.limits.max_concurrent_reads = n;
    }
    if let Some(n) = limits.file_capacity {
        config.limits.file_capacity = n;
    }
    if let Some(n) = limits.identifier_capacity {
        config.limits.identifier_capacity = n;
    }

    config.limits.validate()?;
    Ok(config)
}

/// Validates configuration and confirms every named file is present and
/// readable. Does not parse file contents: no tokenizer/parser ships with
/// this front-end, so `check` can only promise the inputs *exist*.
pub fn check(config_path: Option<&PathBuf>, limits: &LimitArgs, files: &[PathBuf]) -> FatalResult<()> {
    let config = load_config(config_path, limits)?;
    if config.logging.config.enable {
        eprintln!("[config] {config:?}");
    }

    for file in files {
        std::fs::metadata(file).map_err(|source| FatalError::Io {
            path: file.clone(),
            source,
        })?;
    }

    println!("ok: configuration valid, {} file(s) present", files.len());
    Ok(())
}

fn resolve_fixture(name: Option<&str>) -> Result<fixtures::Fixture, String> {
    match name {
        Some(name) => fixtures::by_name(name).ok_or_else(|| format!("no fixture named {name:?}")),
        None => Err("no --fixture given; pass --list to see available names".to_owned()),
    }
}

fn print_fixture_list() {
    for fixture in fixtures::all() {
        println!("{:<16} {}", fixture.name, fixture.description);
    }
}

/// Prints a fixture's AST as an indented preorder tag dump.
pub fn ast(fixture: Option<&str>, list: bool) -> FatalResult<()> {
    if list {
        print_fixture_list();
        return Ok(());
    }

    let fixture = resolve_fixture(fixture).map_err(FatalError::Config)?;
    println!("{} ({})", fixture.name, fixture.description);
    println!("{:?}", fixture.ast.tag_of(fixture.root));
    for (node, depth) in fixture.ast.preorder_ancestors_of(fixture.root) {
        println!("{}{:?}", "  ".repeat(depth as usize + 1), fixture.ast.tag_of(node));
    }
    Ok(())
}

/// Runs scope resolution then opcode emission over a fixture, printing
/// either a tally or (with `--verbose`) one line per emitted opcode.
pub fn dump_opcodes(fixture: Option<&str>, list: bool, verbose: bool) -> FatalResult<()> {
    if list {
        print_fixture_list();
        return Ok(());
    }

    let fixture = resolve_fixture(fixture).map_err(FatalError::Config)?;
    let mut errors = CollectingSink::new();
    let mut analyser = LexicalAnalyser::new();
    analyser
        .set_prelude_scope(&fixture.ast, fixture.root, &fixture.interner, &mut errors)
        .map_err(|e| FatalError::Config(e.to_string()))?;

    let mut tracer: Box<dyn Tracer> = if verbose {
        Box::new(PrintTracer::new(Verbosity::Verbose))
    } else {
        Box::new(NoopTracer)
    };

    let compiled = compile_ast(&fixture.ast, fixture.root, &analyser, tracer.as_mut()).map_err(|e| FatalError::Config(e.to_string()))?;
    let pool = &compiled.opcodes;

    if verbose {
        println!("file type: {:?} (open)", compiled.types.tag_of(compiled.file_type));
        for (id, instr) in pool.instrs() {
            println!("{:>4}: {:?}", id.as_u32(), instr.code);
        }
    } else {
        println!("{} opcode(s) emitted", pool.len() - 1);
    }

    Ok(())
}
