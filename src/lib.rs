//! A tree‑walking interpreter for Lox.
//!
//! Source text flows through [`scanner`] → [`parser`] → [`resolver`] →
//! [`interpreter`].  Each stage reports its diagnostics through an
//! [`error::Reporter`] and tells the caller how it went; [`Lox`] strings the
//! stages together and keeps one interpreter alive between runs, which is
//! what the REPL needs.

pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stack;
pub mod token;
pub mod value;

use std::io::Write;

use log::info;

use crate::error::{Reporter, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;

/// Outcome of running a piece of source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Lexing, syntax or resolution errors were reported; nothing ran.
    CompileError,
    /// A runtime error was reported and the run stopped there.
    RuntimeError,
}

impl Status {
    /// Conventional `sysexits`-style process exit code.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::CompileError => 65,
            Status::RuntimeError => 70,
        }
    }
}

/// An interpreter session: globals survive from one [`Lox::run`] to the next.
pub struct Lox {
    interpreter: Interpreter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    /// Scans, parses, resolves and runs `source`.  Any static error stops
    /// the pipeline before evaluation; `Err` is reserved for host I/O faults.
    pub fn run(&mut self, source: &str, reporter: &mut dyn Reporter) -> Result<Status> {
        let scanned = scanner::scan_tokens(source, reporter);

        // Keep parsing after lexing errors so syntax errors surface too.
        let parsed = Parser::new(scanned.tokens).parse(reporter);
        if scanned.errors > 0 || !parsed.is_ok() {
            info!("Static errors found, skipping resolution");
            return Ok(Status::CompileError);
        }

        let resolution = Resolver::new().resolve(&parsed.statements, reporter);
        if !resolution.is_ok() {
            info!("Resolution errors found, skipping evaluation");
            return Ok(Status::CompileError);
        }

        self.interpreter.resolve(resolution.locals);
        self.interpreter.interpret(&parsed.statements, reporter)
    }
}
