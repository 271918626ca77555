//! C source code parser
//!
//! This module transforms C source text into a syntax tree:
//! - [`lexer`]: Tokenization (source text → lazy token stream)
//! - [`parse`]: Parser struct, diagnostics and error recovery
//! - [`ast`]: Statement and expression node definitions
//!
//! # Supported C Subset
//!
//! - Types: keyword runs (`int`, `unsigned long`, `double`, ...), `const`, pointers, arrays
//! - Statements: declarations, `if`/`else`, `while`, `for`, `return`, `break`, `continue`, blocks
//! - Expressions: arithmetic, logical, bitwise, ternary, assignment, calls, casts
//! - No preprocessor (directive lines are skipped)
//! - No structs, unions, enums, typedefs or function pointers
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent for declarations and statements, Pratt-style
//! precedence climbing for expressions. No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse, Diagnostic, ParseError, Parser};
