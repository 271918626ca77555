//! Single-step execution
//!
//! The first [`Interpreter::step`] evaluates the globals, pushes `main`'s
//! scope and queues `main`'s top-level statements. Each later call executes
//! exactly one queued statement to completion, so a loop or a call nested in
//! that statement runs in full within the one step.
//!
//! Once the queue is exhausted, or a `return` fires at the top level, every
//! further step reports completion without executing anything.

use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{SourceLocation, Stmt};
use log::debug;
use std::rc::Rc;

/// Result of one call to [`Interpreter::step`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepOutcome {
    /// The statement this step executed, if any
    pub statement: Option<Stmt>,
    pub location: Option<SourceLocation>,
    /// No statements remain
    pub finished: bool,
    pub returned: bool,
    pub broke: bool,
    pub continued: bool,
    /// `main`'s return value once known. Stays `None` when stepping
    /// finished because the last statement failed.
    pub return_value: Option<Value>,
    /// Runtime error raised while executing the statement
    pub error: Option<RuntimeError>,
}

/// Progress through `main` while stepping
#[derive(Debug, Clone)]
pub(crate) struct StepState {
    /// Index of `main` in the program's declarations
    main_index: usize,
    pub(crate) scope: ScopeId,
    /// Next statement to execute
    cursor: usize,
    finished: bool,
    return_value: Option<Value>,
}

impl StepState {
    fn finished_outcome(&self) -> StepOutcome {
        StepOutcome {
            finished: true,
            return_value: self.return_value.clone(),
            ..StepOutcome::default()
        }
    }
}

impl Interpreter {
    pub fn enable_stepping(&mut self) {
        self.stepping_enabled = true;
    }

    /// Disallow [`Interpreter::step`]. The queue is kept, so enabling again
    /// resumes where stepping left off.
    pub fn disable_stepping(&mut self) {
        self.stepping_enabled = false;
    }

    pub fn is_stepping_enabled(&self) -> bool {
        self.stepping_enabled
    }

    /// Whether stepping has run out of statements
    pub fn is_finished(&self) -> bool {
        self.step_state.as_ref().is_some_and(|state| state.finished)
    }

    /// Scope holding `main`'s locals while stepping, or the root scope
    pub fn current_scope(&self) -> ScopeId {
        match &self.step_state {
            Some(state) => state.scope,
            None => self.scopes.root(),
        }
    }

    /// Location of the statement the next step will execute
    pub fn next_location(&self) -> Option<SourceLocation> {
        let program = &self.program;
        let (main_index, cursor) = match &self.step_state {
            Some(state) if state.finished => return None,
            Some(state) => (state.main_index, state.cursor),
            None => {
                let main = self.entry_point(program).ok()?;
                let body = main.body.as_ref()?;
                return body.statements.first().map(Stmt::location);
            }
        };
        let body = program.function_at(main_index)?.body.as_ref()?;
        body.statements.get(cursor).map(Stmt::location)
    }

    /// Execute the next top-level statement of `main`.
    ///
    /// Fails only when stepping is disabled or `main` is missing. Errors
    /// raised by the statement itself are reported in the outcome and the
    /// queue still advances.
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        if !self.stepping_enabled {
            return Err(RuntimeError::SteppingDisabled);
        }

        let program = Rc::clone(&self.program);

        if self.step_state.is_none() {
            let main_index = self.entry_index()?;
            debug!("stepping started in main");
            if let Err(error) = self.initialize_globals() {
                let root = self.scopes.root();
                self.step_state = Some(StepState {
                    main_index,
                    scope: root,
                    cursor: 0,
                    finished: true,
                    return_value: None,
                });
                return Ok(StepOutcome {
                    finished: true,
                    error: Some(error),
                    ..StepOutcome::default()
                });
            }
            let root = self.scopes.root();
            let scope = self.scopes.push(root);
            self.step_state = Some(StepState {
                main_index,
                scope,
                cursor: 0,
                finished: false,
                return_value: None,
            });
        }

        let (main_index, scope, cursor) = match &self.step_state {
            Some(state) if state.finished => return Ok(state.finished_outcome()),
            Some(state) => (state.main_index, state.scope, state.cursor),
            None => return Err(RuntimeError::NoEntryPoint),
        };

        let statements = program
            .function_at(main_index)
            .and_then(|decl| decl.body.as_ref())
            .map(|body| body.statements.as_slice())
            .unwrap_or_default();

        let Some(stmt) = statements.get(cursor) else {
            return Ok(self.finish_stepping(Some(Value::Int(0))));
        };

        debug!("step {}: line {}: {}", cursor + 1, stmt.location().line, stmt.summary());

        let mut outcome = StepOutcome {
            statement: Some(stmt.clone()),
            location: Some(stmt.location()),
            ..StepOutcome::default()
        };
        if let Some(state) = self.step_state.as_mut() {
            state.cursor += 1;
        }

        let mut finished = cursor + 1 >= statements.len();
        let mut return_value = Some(Value::Int(0));
        match self.execute_statement(stmt, scope) {
            Ok(Flow::Normal) => {}
            Ok(Flow::Return(value)) => {
                outcome.returned = true;
                return_value = Some(value.unwrap_or(Value::Int(0)));
                finished = true;
            }
            // Escaping main's body ends it, as in run mode
            Ok(Flow::Break) => {
                outcome.broke = true;
                finished = true;
            }
            Ok(Flow::Continue) => {
                outcome.continued = true;
                finished = true;
            }
            Err(error) => {
                outcome.error = Some(error);
                return_value = None;
            }
        }

        if finished {
            let done = self.finish_stepping(return_value);
            outcome.finished = true;
            outcome.return_value = done.return_value;
        }
        Ok(outcome)
    }

    fn finish_stepping(&mut self, return_value: Option<Value>) -> StepOutcome {
        match self.step_state.as_mut() {
            Some(state) => {
                state.finished = true;
                state.return_value = return_value;
                debug!("stepping finished");
                state.finished_outcome()
            }
            None => StepOutcome {
                finished: true,
                ..StepOutcome::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepper(source: &str) -> Interpreter {
        let mut interp = Interpreter::from_source(source).expect("parse failed");
        interp.enable_stepping();
        interp
    }

    #[test]
    fn test_step_requires_enabling() {
        let mut interp = Interpreter::from_source("int main() { return 0; }").unwrap();
        assert_eq!(interp.step(), Err(RuntimeError::SteppingDisabled));
    }

    #[test]
    fn test_step_without_main() {
        let mut interp = stepper("int helper() { return 1; }");
        assert_eq!(interp.step(), Err(RuntimeError::NoEntryPoint));
    }

    #[test]
    fn test_steps_through_top_level_statements() {
        let mut interp = stepper("int main() {\n int x = 1;\n x = x + 1;\n return x;\n}");

        let first = interp.step().unwrap();
        assert_eq!(first.location, Some(SourceLocation::new(2, 2)));
        assert!(!first.finished);

        let second = interp.step().unwrap();
        assert!(!second.finished);
        assert_eq!(interp.next_location(), Some(SourceLocation::new(4, 2)));

        let third = interp.step().unwrap();
        assert!(third.returned);
        assert!(third.finished);
        assert_eq!(third.return_value, Some(Value::Int(2)));

        let after = interp.step().unwrap();
        assert!(after.finished);
        assert!(after.statement.is_none());
        assert_eq!(after.return_value, Some(Value::Int(2)));
        assert_eq!(interp.next_location(), None);
    }

    #[test]
    fn test_error_is_reported_and_queue_advances() {
        let mut interp = stepper("int main() { int x = 1 / 0; x = 5; return x; }");

        let failed = interp.step().unwrap();
        assert!(matches!(failed.error, Some(RuntimeError::DivisionByZero { .. })));
        assert!(!failed.finished);

        let next = interp.step().unwrap();
        assert!(next.error.is_none());
        assert_eq!(interp.step().unwrap().return_value, Some(Value::Int(5)));
    }

    #[test]
    fn test_error_in_last_statement_has_no_return_value() {
        let mut interp = stepper("int main() { int x = 1; return x / 0; }");
        interp.step().unwrap();

        let failed = interp.step().unwrap();
        assert!(failed.finished);
        assert!(matches!(failed.error, Some(RuntimeError::DivisionByZero { .. })));
        assert_eq!(failed.return_value, None);

        let after = interp.step().unwrap();
        assert!(after.finished);
        assert_eq!(after.return_value, None);
    }

    #[test]
    fn test_loop_runs_within_one_step() {
        let mut interp = stepper(
            "int main() { int s = 0; for (int i = 0; i < 4; i++) { s += i; } return s; }",
        );
        interp.step().unwrap();
        interp.step().unwrap();
        let scope = interp.current_scope();
        assert_eq!(interp.scopes().get(scope, "s"), Some(&Value::Int(6)));
    }

    #[test]
    fn test_disable_keeps_position() {
        let mut interp = stepper("int main() { int a = 1; int b = 2; return a + b; }");
        interp.step().unwrap();
        interp.disable_stepping();
        assert_eq!(interp.step(), Err(RuntimeError::SteppingDisabled));
        interp.enable_stepping();

        let outcome = interp.step().unwrap();
        assert_eq!(outcome.statement.map(|s| s.summary()), Some("int b = 2;".to_string()));
    }

    #[test]
    fn test_running_off_the_end_returns_zero() {
        let mut interp = stepper("int main() { int a = 1; }");
        let outcome = interp.step().unwrap();
        assert!(outcome.finished);
        assert!(!outcome.returned);
        assert_eq!(outcome.return_value, Some(Value::Int(0)));
    }

    #[test]
    fn test_empty_main_finishes_on_first_step() {
        let mut interp = stepper("int main() { }");
        let outcome = interp.step().unwrap();
        assert!(outcome.finished);
        assert!(outcome.statement.is_none());
    }
}
