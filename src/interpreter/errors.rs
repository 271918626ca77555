//! Runtime error types for the C interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors, which live in
//! [`crate::parser::ParseError`]).
//!
//! Runtime errors propagate out of nested blocks, loops and calls the same way
//! a `return` does. `run()` treats them as terminal; during stepping they are
//! reported in the step outcome and the host decides whether to continue.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Undefined variable reference
    #[error("Undefined variable '{name}' at line {}", .location.line)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Undefined function call (including prototypes without a definition)
    #[error("Undefined function '{name}' at line {}", .location.line)]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Division by zero at line {}", .location.line)]
    DivisionByZero { location: SourceLocation },

    #[error("Modulo by zero at line {}", .location.line)]
    ModuloByZero { location: SourceLocation },

    /// Left side of an assignment or increment is not a variable
    #[error("Invalid assignment target '{target}' at line {}", .location.line)]
    InvalidAssignmentTarget {
        target: String,
        location: SourceLocation,
    },

    /// Main function not found
    #[error("No main() function found")]
    NoEntryPoint,

    /// Operator the evaluator has no rule for. The grammar should make this
    /// unreachable.
    #[error("Unknown operator '{operator}' at line {}", .location.line)]
    UnknownOperator {
        operator: String,
        location: SourceLocation,
    },

    /// Type error
    #[error("Type error at line {}: expected {expected}, got {got}", .location.line)]
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// Syntax that parses but has no runtime model (indexing, pointers)
    #[error("Unsupported operation: {message} at line {}", .location.line)]
    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },

    /// Built-in called with too few arguments
    #[error(
        "Function '{function}' expects {expected} argument{}, got {got} at line {}",
        plural(.expected),
        .location.line
    )]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Invalid printf format string
    #[error("Invalid printf format at line {}: {message}", .location.line)]
    InvalidFormat {
        message: String,
        location: SourceLocation,
    },

    /// Too many nested calls
    #[error("Call depth limit of {limit} exceeded in '{function}' at line {}", .location.line)]
    CallDepthExceeded {
        function: String,
        limit: usize,
        location: SourceLocation,
    },

    /// `step()` called while stepping is disabled
    #[error("Single-step mode is not enabled")]
    SteppingDisabled,
}

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::ModuloByZero { location }
            | RuntimeError::InvalidAssignmentTarget { location, .. }
            | RuntimeError::UnknownOperator { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::UnsupportedOperation { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::InvalidFormat { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. } => Some(location),
            RuntimeError::NoEntryPoint | RuntimeError::SteppingDisabled => None,
        }
    }
}
