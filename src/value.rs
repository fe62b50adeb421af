use std::fmt;
use std::rc::Rc;

use crate::ast::LiteralValue;
use crate::callable::{Callable, LoxFunction, NativeFunction};

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    NativeFunction(Rc<NativeFunction>),
    Function(Rc<LoxFunction>),
    Number(f64),
    String(String),
    Bool(bool),
    Nil,
}

impl Value {
    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// The callable behind this value, if it can be called at all.
    pub fn as_callable(&self) -> Option<&dyn Callable> {
        let callable: &dyn Callable = match self {
            Value::NativeFunction(native) => &**native,
            Value::Function(function) => &**function,
            _ => return None,
        };

        Some(callable)
    }

    /// Name of the runtime type, for log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::NativeFunction(_) | Value::Function(_) => "function",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::Str(s) => Value::String(s.clone()),
            LiteralValue::True => Value::Bool(true),
            LiteralValue::False => Value::Bool(false),
            LiteralValue::Nil => Value::Nil,
        }
    }
}

/// `nil` equals only `nil`; other values compare within their own type;
/// functions compare by identity.  Mismatched types are simply unequal.
///
/// Numbers compare as values, not as IEEE operands: `NaN` equals `NaN` and
/// `0` differs from `-0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => same_number(*a, *b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NativeFunction(native) => write!(f, "{}", native),

            Value::Function(function) => write!(f, "{}", function),

            Value::Number(n) => format_number(f, *n),

            Value::String(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

/// `10.0` → `10`, `10.5` → `10.5`.  Rust's `Display` for `f64` already drops
/// the fraction of integral values; only the non-finite spellings differ.
///
/// Numbers always print in plain positional notation, never with an
/// exponent: `1e24` prints as `1000000000000000000000000` and `1e-7` as
/// `0.0000001`.
fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", n)
    }
}
