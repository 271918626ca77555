pub mod assign;
pub mod binary;
pub mod unary;

// Operators are added as `impl Interpreter` methods; only the pure
// value-level helpers are free functions.
