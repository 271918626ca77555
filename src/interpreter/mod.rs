//! C interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Interpreter`] itself, run mode and function calls
//! - [`stepping`]: Single-step execution over `main`'s top-level statements
//! - [`builtins`]: `printf`, `putchar`, `sleep` and the math library
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Every statement returns a [`Flow`]
//! signal, so `return`, `break` and `continue` unwind through nested blocks
//! as ordinary return values rather than interpreter-wide flags.
//!
//! Run mode and step mode share the same statement and expression
//! evaluation; stepping only decides how much of `main` runs per call.

pub mod builtins;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
pub mod format;
mod loops;
mod ops;
mod statements;
pub mod stepping;

pub use builtins::BuiltinFn;
pub use config::Config;
pub use engine::{Flow, Interpreter};
pub use errors::RuntimeError;
pub use stepping::StepOutcome;
