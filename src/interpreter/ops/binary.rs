//! Binary operator evaluation
//!
//! If either operand is a float both are promoted and arithmetic yields a
//! float. Comparisons always yield `Int` 1/0. Otherwise arithmetic is 64-bit
//! signed with wrap-around; `Char` operands promote to `Int`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{BinOp, Expr, SourceLocation};

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        scope: ScopeId,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if matches!(op, BinOp::And | BinOp::Or) && self.config.short_circuit {
            let lhs = self.evaluate(left, scope)?.is_truthy();
            let decided = match op {
                BinOp::And => !lhs,
                _ => lhs,
            };
            if decided {
                return Ok(Value::from(lhs));
            }
            let rhs = self.evaluate(right, scope)?.is_truthy();
            return Ok(Value::from(rhs));
        }

        let lhs = self.evaluate(left, scope)?;
        let rhs = self.evaluate(right, scope)?;
        apply_binary_op(op, &lhs, &rhs, location)
    }
}

/// Combine two already evaluated operands
pub(crate) fn apply_binary_op(
    op: BinOp,
    left: &Value,
    right: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match op {
        BinOp::And => return Ok(Value::from(left.is_truthy() && right.is_truthy())),
        BinOp::Or => return Ok(Value::from(left.is_truthy() || right.is_truthy())),
        _ => {}
    }

    match (left, right) {
        (Value::Str(a), Value::Str(b)) => match op {
            BinOp::Eq => Ok(Value::from(a == b)),
            BinOp::Ne => Ok(Value::from(a != b)),
            _ => Err(type_error(op, left, right, location)),
        },
        (Value::Str(_), _) | (_, Value::Str(_)) => Err(type_error(op, left, right, location)),
        _ if left.is_float() || right.is_float() => {
            let a = left.as_float().unwrap_or(0.0);
            let b = right.as_float().unwrap_or(0.0);
            float_op(op, a, b, location)
        }
        _ => {
            let a = left.as_int().unwrap_or(0);
            let b = right.as_int().unwrap_or(0);
            int_op(op, a, b, location)
        }
    }
}

fn type_error(op: BinOp, left: &Value, right: &Value, location: SourceLocation) -> RuntimeError {
    RuntimeError::TypeError {
        expected: "numeric operands".to_string(),
        got: format!("{} {} {}", left.type_name(), op.symbol(), right.type_name()),
        location,
    }
}

fn float_op(op: BinOp, a: f64, b: f64, location: SourceLocation) -> Result<Value, RuntimeError> {
    let value = match op {
        BinOp::Add => Value::Float(a + b),
        BinOp::Sub => Value::Float(a - b),
        BinOp::Mul => Value::Float(a * b),
        BinOp::Div => Value::Float(a / b),
        BinOp::Mod => Value::Float(a % b),
        BinOp::Eq => Value::from(a == b),
        BinOp::Ne => Value::from(a != b),
        BinOp::Lt => Value::from(a < b),
        BinOp::Le => Value::from(a <= b),
        BinOp::Gt => Value::from(a > b),
        BinOp::Ge => Value::from(a >= b),
        // Bitwise operators work on the truncated integers
        _ => return int_op(op, a as i64, b as i64, location),
    };
    Ok(value)
}

fn int_op(op: BinOp, a: i64, b: i64, location: SourceLocation) -> Result<Value, RuntimeError> {
    let value = match op {
        BinOp::Add => Value::Int(a.wrapping_add(b)),
        BinOp::Sub => Value::Int(a.wrapping_sub(b)),
        BinOp::Mul => Value::Int(a.wrapping_mul(b)),
        BinOp::Div => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { location });
            }
            Value::Int(a.wrapping_div(b))
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::ModuloByZero { location });
            }
            Value::Int(a.wrapping_rem(b))
        }
        BinOp::Eq => Value::from(a == b),
        BinOp::Ne => Value::from(a != b),
        BinOp::Lt => Value::from(a < b),
        BinOp::Le => Value::from(a <= b),
        BinOp::Gt => Value::from(a > b),
        BinOp::Ge => Value::from(a >= b),
        BinOp::BitAnd => Value::Int(a & b),
        BinOp::BitOr => Value::Int(a | b),
        BinOp::BitXor => Value::Int(a ^ b),
        BinOp::Shl => Value::Int(shift_left(a, b)),
        BinOp::Shr => Value::Int(shift_right(a, b)),
        BinOp::And => Value::from(a != 0 && b != 0),
        BinOp::Or => Value::from(a != 0 || b != 0),
    };
    Ok(value)
}

/// Shift counts are unsigned; 64 or more shifts every bit out
fn shift_left(value: i64, count: i64) -> i64 {
    match u32::try_from(count as u64) {
        Ok(n) if n < 64 => value << n,
        _ => 0,
    }
}

fn shift_right(value: i64, count: i64) -> i64 {
    match u32::try_from(count as u64) {
        Ok(n) if n < 64 => value >> n,
        _ if value < 0 => -1,
        _ => 0,
    }
}
