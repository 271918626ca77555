//! Memory model for the interpreter
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Float, Str, Char)
//! - [`scope`]: Arena of lexical scopes linked by parent index
//!
//! # Ownership
//!
//! Each scope owns its bindings. Assignment copies the value into the target
//! binding, so two variables never alias one another.

pub mod scope;
pub mod value;

pub use scope::{ScopeArena, ScopeId};
pub use value::{TypeClass, Value};
