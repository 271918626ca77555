//! Loop statement execution (`while`, `for`).
//!
//! Adds `impl Interpreter` methods for the two loop forms supported by the
//! C subset. `break` and `continue` are consumed here via `LoopBodyResult`;
//! a `return` leaves the loop as [`LoopBodyResult::Exit`] and keeps
//! propagating to the enclosing function.

use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::ScopeId;
use crate::parser::ast::{Block, Expr, Stmt};

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`; the loop should iterate again.
    Continue,
    /// `break` was encountered; the loop should exit cleanly.
    Break,
    /// `return` fired; the loop unwinds and hands the flow to its caller.
    Exit(Flow),
}

impl Interpreter {
    /// Executes one iteration of `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &Block,
        scope: ScopeId,
    ) -> Result<LoopBodyResult, RuntimeError> {
        let result = match self.execute_block(body, scope)? {
            Flow::Normal | Flow::Continue => LoopBodyResult::Continue,
            Flow::Break => LoopBodyResult::Break,
            flow @ Flow::Return(_) => LoopBodyResult::Exit(flow),
        };
        Ok(result)
    }

    /// Executes a `while (condition) { body }` loop.
    ///
    /// The condition is evaluated before each iteration.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Block,
        scope: ScopeId,
    ) -> Result<Flow, RuntimeError> {
        loop {
            if !self.evaluate(condition, scope)?.is_truthy() {
                break;
            }

            match self.execute_loop_body(body, scope)? {
                LoopBodyResult::Exit(flow) => return Ok(flow),
                LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `for (init; condition; post) { body }` loop.
    ///
    /// `init`, `condition`, and `post` are all optional, matching C semantics.
    /// A missing condition is treated as always-true. The initializer lives in
    /// a header scope that is released when the loop ends. The post expression
    /// runs after a normal or `continue`d iteration, never after `break` or
    /// `return`.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        post: Option<&Expr>,
        body: &Block,
        scope: ScopeId,
    ) -> Result<Flow, RuntimeError> {
        self.with_scope(scope, |interp, header| {
            if let Some(init) = init {
                interp.execute_statement(init, header)?;
            }

            loop {
                if let Some(condition) = condition {
                    if !interp.evaluate(condition, header)?.is_truthy() {
                        break;
                    }
                }

                match interp.execute_loop_body(body, header)? {
                    LoopBodyResult::Exit(flow) => return Ok(flow),
                    LoopBodyResult::Break => break,
                    LoopBodyResult::Continue => {}
                }

                if let Some(post) = post {
                    interp.evaluate(post, header)?;
                }
            }
            Ok(Flow::Normal)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;
    use crate::memory::Value;

    fn run(source: &str) -> Value {
        let mut interp = Interpreter::from_source(source).expect("parse failed");
        interp.run().expect("run failed")
    }

    #[test]
    fn test_for_sum_runs_body_five_times() {
        let source = "
            int main() {
                int sum = 0;
                int runs = 0;
                int i;
                for (i = 0; i < 5; i++) { sum += i; runs++; }
                return sum * 100 + runs;
            }
        ";
        assert_eq!(run(source), Value::Int(1005));
    }

    #[test]
    fn test_continue_still_runs_post_expression() {
        let source = "
            int main() {
                int odd = 0;
                for (int i = 0; i < 10; i++) {
                    if (i % 2 == 0) continue;
                    odd += 1;
                }
                return odd;
            }
        ";
        assert_eq!(run(source), Value::Int(5));
    }

    #[test]
    fn test_break_leaves_only_inner_loop() {
        let source = "
            int main() {
                int outer = 0;
                int inner = 0;
                int i = 0;
                while (i < 3) {
                    int j = 0;
                    while (1) {
                        if (j == 2) break;
                        inner++;
                        j++;
                    }
                    outer++;
                    i++;
                }
                return outer * 10 + inner;
            }
        ";
        assert_eq!(run(source), Value::Int(36));
    }

    #[test]
    fn test_for_header_variable_is_scoped_to_loop() {
        let source = "
            int main() {
                int i = 42;
                for (int i = 0; i < 3; i++) {}
                return i;
            }
        ";
        assert_eq!(run(source), Value::Int(42));
    }

    #[test]
    fn test_return_from_inside_loop() {
        let source = "
            int find(int target) {
                for (int i = 0; ; i++) { if (i * i >= target) return i; }
            }
            int main() { return find(50); }
        ";
        assert_eq!(run(source), Value::Int(8));
    }

    #[test]
    fn test_loop_iteration_scope_is_fresh() {
        let source = "
            int main() {
                int total = 0;
                int i = 0;
                while (i < 3) { int local; local += 1; total += local; i++; }
                return total;
            }
        ";
        assert_eq!(run(source), Value::Int(3));
    }
}
