mod common;

use pretty_assertions::assert_eq;

use rox::ast::{Expr, ExprId, Stmt};
use rox::error::Diagnostics;
use rox::resolver::{Resolution, Resolver};

use common::parse_ok;

/// Every variable read / assignment in source order, as `(name, id)`.
fn references(statements: &[Stmt]) -> Vec<(String, ExprId)> {
    fn walk_expr(expr: &Expr, out: &mut Vec<(String, ExprId)>) {
        match expr {
            Expr::Literal(_) => {}
            Expr::Grouping(inner) => walk_expr(inner, out),
            Expr::Unary { right, .. } => walk_expr(right, out),
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                walk_expr(left, out);
                walk_expr(right, out);
            }
            Expr::Variable { id, name } => out.push((name.lexeme.clone(), *id)),
            Expr::Assign { id, name, value } => {
                walk_expr(value, out);
                out.push((format!("{}=", name.lexeme), *id));
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                walk_expr(callee, out);
                arguments.iter().for_each(|a| walk_expr(a, out));
            }
        }
    }

    fn walk_stmt(stmt: &Stmt, out: &mut Vec<(String, ExprId)>) {
        match stmt {
            Stmt::Expression(e) | Stmt::Print(e) => walk_expr(e, out),
            Stmt::Var { initializer, .. } => {
                if let Some(e) = initializer {
                    walk_expr(e, out);
                }
            }
            Stmt::Block(stmts) => stmts.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                walk_expr(condition, out);
                walk_stmt(then_branch, out);
                if let Some(e) = else_branch {
                    walk_stmt(e, out);
                }
            }
            Stmt::While { condition, body } => {
                walk_expr(condition, out);
                walk_stmt(body, out);
            }
            Stmt::Function(decl) => decl.body.iter().for_each(|s| walk_stmt(s, out)),
            Stmt::Return { value, .. } => {
                if let Some(e) = value {
                    walk_expr(e, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    statements.iter().for_each(|s| walk_stmt(s, &mut out));
    out
}

fn resolve(statements: &[Stmt]) -> (Resolution, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let resolution = Resolver::new().resolve(statements, &mut diagnostics);
    (resolution, diagnostics)
}

/// `(name, distance)` for every reference, `None` meaning global.
fn distances(source: &str) -> Vec<(String, Option<usize>)> {
    let statements = parse_ok(source);
    let (resolution, diagnostics) = resolve(&statements);
    assert!(diagnostics.is_empty(), "{:?}", diagnostics.errors);

    references(&statements)
        .into_iter()
        .map(|(name, id)| (name, resolution.locals.get(&id).copied()))
        .collect()
}

fn d(name: &str, distance: Option<usize>) -> (String, Option<usize>) {
    (name.to_string(), distance)
}

#[test]
fn top_level_names_stay_unresolved() {
    assert_eq!(
        distances("var a = 1; print a; a = 2;"),
        vec![d("a", None), d("a=", None)]
    );
}

#[test]
fn block_locals_resolve_by_depth() {
    assert_eq!(
        distances("{ var a = 1; { var b = a; print a + b; } }"),
        vec![d("a", Some(1)), d("a", Some(1)), d("b", Some(0))]
    );
}

#[test]
fn function_parameters_and_closures() {
    assert_eq!(
        distances(
            "fun outer(x) { var y = x; fun inner() { return x + y + outer; } return inner; }"
        ),
        vec![
            d("x", Some(0)),
            d("x", Some(1)),
            d("y", Some(1)),
            d("outer", None),
            d("inner", Some(0)),
        ]
    );
}

#[test]
fn local_function_can_call_itself() {
    assert_eq!(
        distances("{ fun f(n) { if (n > 0) f(n - 1); } }"),
        vec![d("n", Some(0)), d("f", Some(1)), d("n", Some(0))]
    );
}

#[test]
fn shadowing_picks_the_innermost_binding() {
    assert_eq!(
        distances("{ var a = 1; { var a = 2; print a; } print a; }"),
        vec![d("a", Some(0)), d("a", Some(0))]
    );
}

#[test]
fn reading_local_in_own_initializer_is_an_error() {
    let statements = parse_ok("var a = 1; { var a = a; }");
    let (resolution, diagnostics) = resolve(&statements);

    assert_eq!(resolution.errors, 1);
    assert_eq!(
        diagnostics.errors,
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn global_initializer_may_mention_itself() {
    let statements = parse_ok("var a = a;");
    let (resolution, _) = resolve(&statements);

    assert!(resolution.is_ok());
}

#[test]
fn redeclaring_in_the_same_scope_is_allowed() {
    let statements = parse_ok("{ var a = 1; var a = 2; print a; } fun f(x, x) {}");
    let (resolution, diagnostics) = resolve(&statements);

    assert!(resolution.is_ok(), "{:?}", diagnostics.errors);
}

#[test]
fn resolution_continues_past_errors() {
    let statements = parse_ok("{ var a = a; } { var b = b; } return 1;");
    let (resolution, diagnostics) = resolve(&statements);

    assert_eq!(resolution.errors, 3);
    assert_eq!(
        diagnostics.errors,
        vec![
            "[line 1] Error at 'a': Can't read local variable in its own initializer.",
            "[line 1] Error at 'b': Can't read local variable in its own initializer.",
            "[line 1] Error at 'return': Can't return from top-level code.",
        ]
    );
}

#[test]
fn resolving_twice_gives_the_same_table() {
    let statements = parse_ok(
        "fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }
         { var c = counter(); c(); }",
    );

    let (first, _) = resolve(&statements);
    let (second, _) = resolve(&statements);

    assert!(!first.locals.is_empty());
    assert_eq!(first, second);
}
