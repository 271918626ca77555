//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime values
//! in the interpreter. Values are tagged; there is no null or uninitialized marker.
//! A variable that was never bound is simply absent from its scope.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 64-bit signed integer
//! - [`Value::Float`]: 64-bit IEEE float
//! - [`Value::Str`]: string (escapes already decoded)
//! - [`Value::Char`]: character stored as an integer
//!
//! # Declared types
//!
//! Declared type names are plain text (`"unsigned long"`, `"const char*"`).
//! [`TypeClass::of`] maps them to the value kind a declaration produces.

use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Char(i64),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

/// Value kind implied by a declared type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Int,
    Float,
    Char,
    Str,
    /// Pointers and arrays of anything but `char`; values are stored as-is
    Opaque,
}

impl TypeClass {
    pub fn of(type_name: &str) -> TypeClass {
        let indirection = type_name.matches('*').count()
            + type_name.matches("[]").count();
        let base = type_name.trim_end_matches(&['*', '[', ']'][..]);
        let words: Vec<&str> = base
            .split_whitespace()
            .filter(|w| *w != "const")
            .collect();
        let is_char = words.contains(&"char");

        match indirection {
            0 if words.contains(&"float") || words.contains(&"double") => {
                TypeClass::Float
            }
            0 if is_char => TypeClass::Char,
            0 => TypeClass::Int,
            1 if is_char => TypeClass::Str,
            _ => TypeClass::Opaque,
        }
    }
}

impl Value {
    /// Zero value of a declared type, used for declarations without initializer
    pub fn zero_for(type_name: &str) -> Value {
        match TypeClass::of(type_name) {
            TypeClass::Float => Value::Float(0.0),
            TypeClass::Char => Value::Char(0),
            TypeClass::Str => Value::Str(String::new()),
            TypeClass::Int | TypeClass::Opaque => Value::Int(0),
        }
    }

    /// Convert to the numeric kind of a declared type. Strings and values of
    /// pointer or array types pass through unchanged.
    pub fn convert_to(self, type_name: &str) -> Value {
        if matches!(self, Value::Str(_)) {
            return self;
        }
        match TypeClass::of(type_name) {
            TypeClass::Float => Value::Float(self.as_float().unwrap_or(0.0)),
            TypeClass::Char => Value::Char(self.as_int().unwrap_or(0)),
            TypeClass::Int => Value::Int(self.as_int().unwrap_or(0)),
            TypeClass::Str | TypeClass::Opaque => self,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Char(_) => "char",
        }
    }

    /// C truthiness. Strings are always true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) | Value::Char(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(_) => true,
        }
    }

    /// Integer view: floats truncate toward zero, strings have none
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) | Value::Char(n) => Some(*n),
            Value::Float(x) => Some(*x as i64),
            Value::Str(_) => None,
        }
    }

    /// Floating-point view; strings have none
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) | Value::Char(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(b as i64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Char(c) => match u8::try_from(*c) {
                Ok(b) if b.is_ascii_graphic() || b == b' ' => {
                    write!(f, "'{}' ({})", b as char, c)
                }
                _ => write!(f, "{}", c),
            },
        }
    }
}
