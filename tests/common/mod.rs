#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::ast::Stmt;
use rox::error::Diagnostics;
use rox::parser::{Parsed, Parser};
use rox::scanner;
use rox::{Lox, Status};

/// In-memory `print` sink that stays readable after the interpreter takes it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("program output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Everything one run produced.
pub struct Run {
    pub status: Status,
    pub output: String,
    pub diagnostics: Diagnostics,
}

impl Run {
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }

    /// Message of the single runtime error, if one was reported.
    pub fn runtime_message(&self) -> Option<&str> {
        self.diagnostics
            .runtime_errors
            .first()
            .map(|e| e.message.as_str())
    }
}

/// Runs `source` in a fresh session.
pub fn run_source(source: &str) -> Run {
    let out = SharedBuffer::default();
    let mut lox = Lox::with_output(Box::new(out.clone()));
    let mut diagnostics = Diagnostics::new();

    let status = lox
        .run(source, &mut diagnostics)
        .expect("in-memory output never fails");

    Run {
        status,
        output: out.contents(),
        diagnostics,
    }
}

/// Scans and parses `source`, collecting diagnostics.
pub fn parse_source(source: &str) -> (Parsed, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let scanned = scanner::scan_tokens(source, &mut diagnostics);
    let parsed = Parser::new(scanned.tokens).parse(&mut diagnostics);
    (parsed, diagnostics)
}

/// Parses `source`, failing the test on any syntax error.
pub fn parse_ok(source: &str) -> Vec<Stmt> {
    let (parsed, diagnostics) = parse_source(source);
    assert!(
        parsed.is_ok(),
        "unexpected syntax errors: {:?}",
        diagnostics.errors
    );
    parsed.statements
}
