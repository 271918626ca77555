//! # Introduction
//!
//! cstep parses and executes a K&R-style subset of C. A host either runs a
//! program to completion or drives it one top-level statement of `main` at a
//! time, inspecting scopes and captured output between steps. A terminal UI
//! built with [ratatui](https://docs.rs/ratatui) ships as the `cstep` binary.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter → (Run | Step) → Terminal output
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST with a Pratt parser,
//!    collecting every diagnostic before failing.
//! 2. [`interpreter`]: walks the AST; run mode and step mode share one
//!    statement and expression evaluator.
//! 3. [`memory`]: tagged [`memory::Value`]s held in an arena of lexical
//!    scopes.
//! 4. [`terminal`]: the buffer that records built-in output.
//! 5. [`ui`]: ratatui-based stepping front end; not part of the stable
//!    library API.
//!
//! ## Example
//!
//! ```
//! use cstep::interpreter::Interpreter;
//! use cstep::memory::Value;
//!
//! let source = r#"
//!     int square(int n) { return n * n; }
//!     int main() {
//!         printf("%d\n", square(7));
//!         return 0;
//!     }
//! "#;
//!
//! let mut interp = Interpreter::from_source(source).unwrap();
//! assert_eq!(interp.run().unwrap(), Value::Int(0));
//! assert_eq!(interp.output(), "49\n");
//! ```
//!
//! ## Supported C subset
//!
//! Types: `int`, `char`, `float`, `double`, `long`, `short`, `signed`,
//! `unsigned`, `const` and `char*` strings. Pointer and array syntax is
//! accepted but not modeled.
//! Control flow: `if/else`, `while`, `for`, `break`, `continue`, `return`.
//! Built-ins: `printf`, `putchar`, `sleep` and the `math.h` basics.

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod terminal;
pub mod ui;
