//! Interpreter configuration
//!
//! [`Config`] is built with chained `with_*` methods:
//!
//! ```
//! use cstep::interpreter::Config;
//!
//! let config = Config::default().with_echo_output(true).with_max_call_depth(64);
//! assert_eq!(config.max_call_depth, 64);
//! ```

use crate::interpreter::constants::DEFAULT_MAX_CALL_DEPTH;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Also write built-in output to stdout as it is produced
    pub echo_output: bool,
    /// Deepest allowed nesting of user function calls
    pub max_call_depth: usize,
    /// Skip the right operand of `&&`/`||` when the left decides the result.
    /// `false` evaluates both operands before combining them.
    pub short_circuit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            echo_output: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            short_circuit: true,
        }
    }
}

impl Config {
    pub fn with_echo_output(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_short_circuit(mut self, short_circuit: bool) -> Self {
        self.short_circuit = short_circuit;
        self
    }
}
