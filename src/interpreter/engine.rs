// Execution engine for the C interpreter

use crate::interpreter::builtins::{self, BuiltinFn};
use crate::interpreter::config::Config;
use crate::interpreter::constants::{ENTRY_POINT, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::stepping::StepState;
use crate::memory::{ScopeArena, ScopeId, Value};
use crate::parser::ast::{Block, Expr, FunctionDecl, Program, SourceLocation, Stmt};
use crate::parser::{parse, ParseError};
use crate::terminal::Terminal;
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Control-flow signal returned by every statement execution.
///
/// Blocks stop at the first non-`Normal` flow and hand it to their caller.
/// Loops consume `Break` and `Continue`; function calls consume `Return`.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Option<Value>),
    Break,
    Continue,
}

impl Flow {
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }
}

/// The main interpreter that executes a C program
pub struct Interpreter {
    /// Parsed program. Shared so statement references can be held while the
    /// interpreter itself is mutably borrowed.
    pub(crate) program: Rc<Program>,

    /// Function name -> index into `program.declarations`
    functions: FxHashMap<String, usize>,

    /// Host-callable functions, checked before user functions
    builtins: FxHashMap<String, BuiltinFn>,

    pub(crate) scopes: ScopeArena,

    /// Output written by built-ins
    pub(crate) terminal: Terminal,

    pub(crate) config: Config,

    /// Number of user function calls currently active
    call_depth: usize,

    /// Location of the statement being executed
    pub(crate) current_location: SourceLocation,

    pub(crate) stepping_enabled: bool,

    /// Pending queue of `main`'s statements; created by the first step
    pub(crate) step_state: Option<StepState>,

    /// Whether top-level variable declarations have been evaluated
    globals_initialized: bool,
}

impl Interpreter {
    /// Create an interpreter for an already parsed program
    pub fn new(program: Program) -> Self {
        Self::with_config(program, Config::default())
    }

    pub fn with_config(program: Program, config: Config) -> Self {
        let mut functions = FxHashMap::default();
        for (index, decl) in program.functions() {
            // A definition wins over any prototype of the same name
            if decl.body.is_some() || !functions.contains_key(&decl.name) {
                functions.insert(decl.name.clone(), index);
            }
        }

        info!(
            "loaded program: {} declarations, {} functions",
            program.declarations.len(),
            functions.len()
        );

        Interpreter {
            program: Rc::new(program),
            functions,
            builtins: builtins::default_registry(),
            scopes: ScopeArena::new(),
            terminal: Terminal::new(config.echo_output),
            config,
            call_depth: 0,
            current_location: SourceLocation::new(1, 1),
            stepping_enabled: false,
            step_state: None,
            globals_initialized: false,
        }
    }

    /// Parse `source` and build an interpreter for it
    pub fn from_source(source: &str) -> Result<Self, ParseError> {
        Ok(Self::new(parse(source)?))
    }

    /// Parse `source` and build an interpreter with the given configuration
    pub fn from_source_with_config(
        source: &str,
        config: Config,
    ) -> Result<Self, ParseError> {
        Ok(Self::with_config(parse(source)?, config))
    }

    /// Run `main` to completion and return its value.
    ///
    /// A body that runs off its end returns `0`. Runtime errors are terminal.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        let program = Rc::clone(&self.program);
        let body = match &self.entry_point(&program)?.body {
            Some(body) => body,
            None => return Err(RuntimeError::NoEntryPoint),
        };

        self.initialize_globals()?;

        let root = self.scopes.root();
        let flow = self.with_scope(root, |interp, scope| {
            interp.execute_statements(&body.statements, scope)
        })?;

        let value = match flow {
            Flow::Return(Some(value)) => value,
            _ => Value::Int(0),
        };
        info!("run finished, main returned {}", value);
        Ok(value)
    }

    /// Discard all execution state without re-parsing.
    ///
    /// Scopes, the step queue, captured output and the call depth are
    /// cleared. Whether stepping is enabled is kept.
    pub fn reset(&mut self) {
        debug!("reset");
        self.scopes = ScopeArena::new();
        self.step_state = None;
        self.terminal.clear();
        self.call_depth = 0;
        self.current_location = SourceLocation::new(1, 1);
        self.globals_initialized = false;
    }

    /// Add or replace a built-in function
    pub fn register_builtin(&mut self, name: &str, function: BuiltinFn) {
        self.builtins.insert(name.to_string(), function);
    }

    pub fn has_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Everything the program has printed so far
    pub fn output(&self) -> String {
        self.terminal.output()
    }

    /// Location of the statement executed most recently
    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    /// Record built-in output at the current statement's location
    pub fn write_output(&mut self, text: &str) {
        let location = self.current_location;
        self.terminal.write(text, location);
    }

    /// Index of `main` in the program's declarations, if it is defined
    pub(crate) fn entry_index(&self) -> Result<usize, RuntimeError> {
        self.functions
            .get(ENTRY_POINT)
            .copied()
            .filter(|&index| {
                self.program
                    .function_at(index)
                    .is_some_and(|decl| decl.body.is_some())
            })
            .ok_or(RuntimeError::NoEntryPoint)
    }

    /// The declaration of `main`, if it is defined
    pub(crate) fn entry_point<'p>(
        &self,
        program: &'p Program,
    ) -> Result<&'p FunctionDecl, RuntimeError> {
        let index = self.entry_index()?;
        program.function_at(index).ok_or(RuntimeError::NoEntryPoint)
    }

    /// Evaluate the top-level variable declarations into the root scope,
    /// once per reset
    pub(crate) fn initialize_globals(&mut self) -> Result<(), RuntimeError> {
        if self.globals_initialized {
            return Ok(());
        }
        self.globals_initialized = true;

        let program = Rc::clone(&self.program);
        let root = self.scopes.root();
        for stmt in &program.declarations {
            if let Stmt::VarDecl { .. } = stmt {
                self.execute_statement(stmt, root)?;
            }
        }
        Ok(())
    }

    /// Run `f` in a fresh scope chained to `parent`. The scope is released
    /// when `f` returns, including on error.
    pub(crate) fn with_scope<T>(
        &mut self,
        parent: ScopeId,
        f: impl FnOnce(&mut Self, ScopeId) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let scope = self.scopes.push(parent);
        let result = f(self, scope);
        self.scopes.pop(scope);
        result
    }

    /// Resolve and invoke a call: built-ins first, then user functions.
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[Expr],
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if let Some(&builtin) = self.builtins.get(name) {
            debug!("call builtin {}() at line {}", name, location.line);
            return builtin(self, args, scope, location);
        }

        let program = Rc::clone(&self.program);
        let decl = self
            .functions
            .get(name)
            .and_then(|&index| program.function_at(index))
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            })?;
        let body = decl
            .body
            .as_ref()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            })?;

        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                function: name.to_string(),
                limit: self.config.max_call_depth,
                location,
            });
        }

        // Arguments are evaluated in the caller's scope. Excess arguments
        // are never evaluated; missing ones leave the parameter unbound.
        let mut bindings = Vec::with_capacity(decl.params.len());
        for (param, arg) in decl.params.iter().zip(args) {
            let value = self.evaluate(arg, scope)?;
            if let Some(param_name) = &param.name {
                bindings.push((param_name.as_str(), value));
            }
        }

        debug!(
            "call {}() with {} argument(s), depth {}",
            name,
            bindings.len(),
            self.call_depth + 1
        );

        self.call_depth += 1;
        let caller_location = self.current_location;
        let root = self.scopes.root();
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.with_scope(root, |interp, fn_scope| {
                for (param_name, value) in bindings {
                    interp.scopes.define(fn_scope, param_name, value);
                }
                interp.execute_function_body(body, fn_scope)
            })
        });
        self.call_depth -= 1;
        self.current_location = caller_location;
        result
    }

    /// Execute a function body in `scope` and produce its return value.
    /// A `break` or `continue` escaping the body ends it like running off
    /// the end does.
    fn execute_function_body(
        &mut self,
        body: &Block,
        scope: ScopeId,
    ) -> Result<Value, RuntimeError> {
        match self.execute_statements(&body.statements, scope)? {
            Flow::Return(Some(value)) => Ok(value),
            _ => Ok(Value::Int(0)),
        }
    }
}
