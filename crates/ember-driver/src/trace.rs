//! Ambient pipeline tracing: a trait with a no-op implementation the
//! compiler eliminates, and a printing implementation used when a
//! `logging.*` toggle is enabled.

/// How much detail a `PrintTracer` emits per stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Default,
    Verbose,
}

/// Instrumentation hooks for the four pipeline stages, matching the
/// `logging.{asts,types,opcodes,diagnostics}` config toggles.
pub trait Tracer {
    fn trace_ast_root(&mut self, root_tag: &str, word_len: usize);
    fn trace_type_created(&mut self, type_id: u32, description: &str);
    fn trace_opcode_emitted(&mut self, opcode_id: u32, code: &str);
    fn trace_diagnostic(&mut self, message: &str);
}

/// Eliminated entirely by the optimizer; used whenever the matching
/// `logging.*` toggle is off.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_ast_root(&mut self, _root_tag: &str, _word_len: usize) {}
    #[inline(always)]
    fn trace_type_created(&mut self, _type_id: u32, _description: &str) {}
    #[inline(always)]
    fn trace_opcode_emitted(&mut self, _opcode_id: u32, _code: &str) {}
    #[inline(always)]
    fn trace_diagnostic(&mut self, _message: &str) {}
}

/// Prints each traced event to stderr as it happens.
pub struct PrintTracer {
    verbosity: Verbosity,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        PrintTracer { verbosity }
    }
}

impl Tracer for PrintTracer {
    fn trace_ast_root(&mut self, root_tag: &str, word_len: usize) {
        eprintln!("[ast] root={root_tag} words={word_len}");
    }

    fn trace_type_created(&mut self, type_id: u32, description: &str) {
        eprintln!("[types] #{type_id} {description}");
    }

    fn trace_opcode_emitted(&mut self, opcode_id: u32, code: &str) {
        if self.verbosity == Verbosity::Verbose {
            eprintln!("[opcodes] #{opcode_id} {code}");
        }
    }

    fn trace_diagnostic(&mut self, message: &str) {
        eprintln!("[diagnostics] {message}");
    }
}
