use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use rox::environment::Environment;
use rox::token::{Token, TokenType};
use rox::value::Value;
use rox::Lox;

fn name(lexeme: &str) -> Token {
    Token::new(TokenType::IDENTIFIER, lexeme, 1)
}

fn frame(enclosing: Option<&Rc<RefCell<Environment>>>) -> Rc<RefCell<Environment>> {
    let env = match enclosing {
        Some(parent) => Environment::with_enclosing(Rc::clone(parent)),
        None => Environment::new(),
    };
    Rc::new(RefCell::new(env))
}

#[test]
fn define_get_and_redefine() {
    let mut env = Environment::new();

    env.define("a", Value::Number(1.0));
    env.define("a", Value::String("again".into()));

    assert_eq!(env.get(&name("a")), Ok(Value::String("again".into())));
}

#[test]
fn lookup_walks_enclosing_frames() {
    let globals = frame(None);
    globals.borrow_mut().define("a", Value::Bool(true));

    let inner = frame(Some(&globals));

    assert_eq!(inner.borrow().get(&name("a")), Ok(Value::Bool(true)));
    assert!(inner.borrow().enclosing().is_some());
    assert!(globals.borrow().enclosing().is_none());
}

#[test]
fn assign_updates_nearest_binding_and_never_creates_one() {
    let globals = frame(None);
    globals.borrow_mut().define("a", Value::Nil);
    let inner = frame(Some(&globals));

    inner
        .borrow_mut()
        .assign(&name("a"), Value::Number(2.0))
        .unwrap();
    assert_eq!(globals.borrow().get(&name("a")), Ok(Value::Number(2.0)));

    let err = inner
        .borrow_mut()
        .assign(&name("b"), Value::Nil)
        .unwrap_err();
    assert_eq!(err.message, "Undefined variable 'b'.");
    assert!(inner.borrow().get(&name("b")).is_err());
}

#[test]
fn distance_access_targets_exactly_one_frame() {
    let outer = frame(None);
    outer.borrow_mut().define("x", Value::String("outer".into()));
    let middle = frame(Some(&outer));
    middle.borrow_mut().define("x", Value::String("middle".into()));
    let inner = frame(Some(&middle));

    assert_eq!(
        Environment::get_at(&inner, 2, &name("x")),
        Ok(Value::String("outer".into()))
    );
    assert_eq!(
        Environment::get_at(&inner, 1, &name("x")),
        Ok(Value::String("middle".into()))
    );
    // Not present in the frame itself, and no fallback search.
    assert!(Environment::get_at(&inner, 0, &name("x")).is_err());

    Environment::assign_at(&inner, 2, &name("x"), Value::Number(3.0)).unwrap();
    assert_eq!(outer.borrow().get(&name("x")), Ok(Value::Number(3.0)));
    assert_eq!(
        middle.borrow().get(&name("x")),
        Ok(Value::String("middle".into()))
    );
}

#[test]
fn ancestor_stops_at_the_root() {
    let outer = frame(None);
    let inner = frame(Some(&outer));

    let found = Environment::ancestor(&inner, 1).unwrap();
    assert!(Rc::ptr_eq(&found, &outer));
    assert!(Environment::ancestor(&inner, 2).is_none());
    assert!(Environment::get_at(&inner, 5, &name("x")).is_err());
}

#[test]
fn session_globals_are_visible_to_the_host() {
    let mut lox = Lox::with_output(Box::new(std::io::sink()));
    let mut diagnostics = rox::error::Diagnostics::new();

    lox.run("var answer = 6 * 7;", &mut diagnostics).unwrap();

    let globals = lox.interpreter_mut().globals();
    assert_eq!(
        globals.borrow().get(&name("answer")),
        Ok(Value::Number(42.0))
    );
    assert!(globals.borrow().get(&name("clock")).is_ok());
}
