//! Statement execution implementation
//!
//! This module handles the execution of all C statement types, including:
//!
//! - Variable declarations and initializations
//! - Control flow (if/else; loops live in [`super::loops`])
//! - Returns, breaks and continues
//! - Blocks and compound statements
//!
//! # Control Flow
//!
//! Every statement returns a [`Flow`]. A statement sequence stops at the first
//! non-`Normal` flow and returns it, so `return` unwinds through any number of
//! nested blocks until a function boundary consumes it.

use crate::interpreter::constants::{STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::interpreter::engine::{Flow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{Block, Expr, Stmt};

impl Interpreter {
    /// Execute one statement in `scope`
    pub(crate) fn execute_statement(
        &mut self,
        stmt: &Stmt,
        scope: ScopeId,
    ) -> Result<Flow, RuntimeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.execute_stmt(stmt, scope)
        })
    }

    fn execute_stmt(&mut self, stmt: &Stmt, scope: ScopeId) -> Result<Flow, RuntimeError> {
        self.current_location = stmt.location();

        match stmt {
            // Functions are indexed when the interpreter is built
            Stmt::Function(_) => Ok(Flow::Normal),
            Stmt::VarDecl {
                var_type,
                name,
                init,
                ..
            } => {
                self.execute_var_decl(var_type, name, init.as_ref(), scope)?;
                Ok(Flow::Normal)
            }
            Stmt::Block(block) => self.execute_block(block, scope),
            Stmt::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                if self.evaluate(condition, scope)?.is_truthy() {
                    self.execute_block(consequence, scope)
                } else if let Some(alternative) = alternative {
                    self.execute_block(alternative, scope)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While {
                condition, body, ..
            } => self.execute_while(condition, body, scope),
            Stmt::For {
                init,
                condition,
                post,
                body,
                ..
            } => self.execute_for(
                init.as_deref(),
                condition.as_ref(),
                post.as_ref(),
                body,
                scope,
            ),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => Some(self.evaluate(expr, scope)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
            Stmt::Expression { expr, .. } => {
                self.evaluate(expr, scope)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Execute statements in order, stopping at the first non-normal flow
    pub(crate) fn execute_statements(
        &mut self,
        statements: &[Stmt],
        scope: ScopeId,
    ) -> Result<Flow, RuntimeError> {
        for stmt in statements {
            let flow = self.execute_statement(stmt, scope)?;
            if !flow.is_normal() {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a block in its own child scope
    pub(crate) fn execute_block(
        &mut self,
        block: &Block,
        parent: ScopeId,
    ) -> Result<Flow, RuntimeError> {
        self.with_scope(parent, |interp, scope| {
            interp.execute_statements(&block.statements, scope)
        })
    }

    /// Bind a declared variable in `scope`, shadowing any outer binding.
    ///
    /// Without an initializer the variable gets the zero value of its type.
    /// An initializer is converted to the declared numeric kind.
    pub(crate) fn execute_var_decl(
        &mut self,
        var_type: &str,
        name: &str,
        init: Option<&Expr>,
        scope: ScopeId,
    ) -> Result<(), RuntimeError> {
        let value = match init {
            Some(expr) => self.evaluate(expr, scope)?.convert_to(var_type),
            None => Value::zero_for(var_type),
        };
        self.scopes.define(scope, name, value);
        Ok(())
    }
}
