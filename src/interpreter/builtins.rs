//! Built-in function implementations
//!
//! Built-ins are plain function pointers stored in the interpreter's registry
//! and are resolved before user-defined functions. Each one receives the
//! unevaluated argument expressions and the calling scope, and evaluates only
//! what it needs.
//!
//! # Supported Built-ins
//!
//! - `printf(format, ...)`: Formatted output to the terminal; returns bytes written
//! - `putchar(c)`: Single byte output; returns `c`
//! - `sleep(ms)`: Blocks the calling thread
//! - `sqrt pow sin cos tan fabs floor ceil log log10 exp`: Float math
//! - `abs`: Absolute value; stays an integer for integer input
//!
//! Hosts add their own with [`Interpreter::register_builtin`].

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::format::format_printf;
use crate::memory::{ScopeId, Value};
use crate::parser::ast::{Expr, SourceLocation};
use rustc_hash::FxHashMap;
use std::thread;
use std::time::Duration;

/// Signature shared by every built-in
pub type BuiltinFn =
    fn(&mut Interpreter, &[Expr], ScopeId, SourceLocation) -> Result<Value, RuntimeError>;

/// The registry every interpreter starts with
pub(crate) fn default_registry() -> FxHashMap<String, BuiltinFn> {
    let entries: [(&str, BuiltinFn); 15] = [
        ("printf", builtin_printf),
        ("putchar", builtin_putchar),
        ("sleep", builtin_sleep),
        ("sqrt", builtin_sqrt),
        ("pow", builtin_pow),
        ("sin", builtin_sin),
        ("cos", builtin_cos),
        ("tan", builtin_tan),
        ("abs", builtin_abs),
        ("fabs", builtin_fabs),
        ("floor", builtin_floor),
        ("ceil", builtin_ceil),
        ("log", builtin_log),
        ("log10", builtin_log10),
        ("exp", builtin_exp),
    ];
    entries
        .into_iter()
        .map(|(name, function)| (name.to_string(), function))
        .collect()
}

fn builtin_printf(
    interp: &mut Interpreter,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let Some((format_expr, rest)) = args.split_first() else {
        return Ok(Value::Int(0));
    };

    let format = match interp.evaluate(format_expr, scope)? {
        Value::Str(s) => s,
        other => {
            return Err(RuntimeError::InvalidFormat {
                message: format!("format must be a string, got {}", other.type_name()),
                location,
            })
        }
    };

    let mut values = Vec::with_capacity(rest.len());
    for arg in rest {
        values.push(interp.evaluate(arg, scope)?);
    }

    let output = format_printf(&format, &values, location)?;
    interp.write_output(&output);
    Ok(Value::Int(output.len() as i64))
}

fn builtin_putchar(
    interp: &mut Interpreter,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let arg = single_arg("putchar", args, location)?;
    let value = interp.evaluate(arg, scope)?;
    let code = value.as_int().ok_or_else(|| RuntimeError::TypeError {
        expected: "character code".to_string(),
        got: value.type_name().to_string(),
        location,
    })?;
    interp.write_output(&char::from(code as u8).to_string());
    Ok(Value::Int(code))
}

fn builtin_sleep(
    interp: &mut Interpreter,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let arg = single_arg("sleep", args, location)?;
    let value = interp.evaluate(arg, scope)?;
    let millis = value.as_int().ok_or_else(|| RuntimeError::TypeError {
        expected: "milliseconds".to_string(),
        got: value.type_name().to_string(),
        location,
    })?;
    if let Ok(millis) = u64::try_from(millis) {
        thread::sleep(Duration::from_millis(millis));
    }
    Ok(Value::Int(0))
}

/// The argument of a one-argument built-in; extra arguments are ignored
fn single_arg<'a>(
    name: &str,
    args: &'a [Expr],
    location: SourceLocation,
) -> Result<&'a Expr, RuntimeError> {
    args.first().ok_or_else(|| RuntimeError::ArgumentCountMismatch {
        function: name.to_string(),
        expected: 1,
        got: 0,
        location,
    })
}

/// Evaluate the first `N` arguments as floats
fn float_args<const N: usize>(
    interp: &mut Interpreter,
    name: &str,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<[f64; N], RuntimeError> {
    if args.len() < N {
        return Err(RuntimeError::ArgumentCountMismatch {
            function: name.to_string(),
            expected: N,
            got: args.len(),
            location,
        });
    }
    let mut values = [0.0; N];
    for (slot, arg) in values.iter_mut().zip(args) {
        let value = interp.evaluate(arg, scope)?;
        *slot = value.as_float().ok_or_else(|| RuntimeError::TypeError {
            expected: format!("numeric argument to {}", name),
            got: value.type_name().to_string(),
            location,
        })?;
    }
    Ok(values)
}

macro_rules! unary_math_builtin {
    ($fn_name:ident, $c_name:literal, $op:expr) => {
        fn $fn_name(
            interp: &mut Interpreter,
            args: &[Expr],
            scope: ScopeId,
            location: SourceLocation,
        ) -> Result<Value, RuntimeError> {
            let [x] = float_args::<1>(interp, $c_name, args, scope, location)?;
            let op: fn(f64) -> f64 = $op;
            Ok(Value::Float(op(x)))
        }
    };
}

unary_math_builtin!(builtin_sqrt, "sqrt", f64::sqrt);
unary_math_builtin!(builtin_sin, "sin", f64::sin);
unary_math_builtin!(builtin_cos, "cos", f64::cos);
unary_math_builtin!(builtin_tan, "tan", f64::tan);
unary_math_builtin!(builtin_fabs, "fabs", f64::abs);
unary_math_builtin!(builtin_floor, "floor", f64::floor);
unary_math_builtin!(builtin_ceil, "ceil", f64::ceil);
unary_math_builtin!(builtin_log, "log", f64::ln);
unary_math_builtin!(builtin_log10, "log10", f64::log10);
unary_math_builtin!(builtin_exp, "exp", f64::exp);

fn builtin_pow(
    interp: &mut Interpreter,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let [base, exponent] = float_args::<2>(interp, "pow", args, scope, location)?;
    Ok(Value::Float(base.powf(exponent)))
}

fn builtin_abs(
    interp: &mut Interpreter,
    args: &[Expr],
    scope: ScopeId,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let arg = single_arg("abs", args, location)?;
    match interp.evaluate(arg, scope)? {
        Value::Int(n) | Value::Char(n) => Ok(Value::Int(n.wrapping_abs())),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(RuntimeError::TypeError {
            expected: "numeric argument to abs".to_string(),
            got: other.type_name().to_string(),
            location,
        }),
    }
}
