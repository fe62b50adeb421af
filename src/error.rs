//! Centralised error hierarchy and diagnostic hooks for the **Lox interpreter**.
//!
//! All subsystems (scanner, parser, resolver, runtime, CLI) convert their
//! internal failure modes into one of the variants defined here.  Static
//! diagnostics and runtime errors are *reported* through a [`Reporter`]; the
//! passes themselves never print.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `location` is `" at end"` or `" at 'x'"`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },

    /// Static‑analysis failure (e.g. reading a local in its own initializer).
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: String,
        line: usize,
    },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**, located at `token`.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**, located at `token`.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **interpreter**.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        LoxError::Runtime(RuntimeError::new(token, msg))
    }

    /// Hands a static or runtime error to `reporter`.  I/O and UTF‑8
    /// failures are host faults and are not language diagnostics.
    pub fn report_to(&self, reporter: &mut dyn Reporter) {
        match self {
            LoxError::Lex { message, line } => reporter.report(*line, "", message),
            LoxError::Parse {
                message,
                location,
                line,
            }
            | LoxError::Resolve {
                message,
                location,
                line,
            } => reporter.report(*line, location, message),
            LoxError::Runtime(e) => reporter.runtime_error(e),
            LoxError::Io(_) | LoxError::Utf8(_) => {}
        }
    }
}

/// A language-level runtime error: the offending token plus a message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: line={}, msg={}",
            token.line, message
        );

        Self {
            token: token.clone(),
            message,
        }
    }
}

/// `" at end"` for the EOF sentinel, `" at 'lexeme'"` otherwise.
fn location_of(token: &Token) -> String {
    if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Diagnostic sink the passes call into.  The core never prints on its own.
pub trait Reporter {
    /// Syntax or resolution diagnostic.
    fn report(&mut self, line: usize, location: &str, message: &str);

    /// The runtime error that halted the current run.
    fn runtime_error(&mut self, error: &RuntimeError);
}

/// Prints diagnostics to stderr in the classic `[line N] Error...` format.
#[derive(Debug, Default)]
pub struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        eprintln!("[line {}] Error{}: {}", line, location, message);
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{}", error);
    }
}

/// Collects diagnostics in memory, for embedders that render them elsewhere.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    /// Formatted syntax / resolution diagnostics, in report order.
    pub errors: Vec<String>,

    /// Runtime errors, in report order (at most one per run).
    pub runtime_errors: Vec<RuntimeError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.runtime_errors.is_empty()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.errors
            .push(format!("[line {}] Error{}: {}", line, location, message));
    }

    fn runtime_error(&mut self, error: &RuntimeError) {
        self.runtime_errors.push(error.clone());
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
