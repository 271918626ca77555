// Integration tests for the C interpreter

use cstep::interpreter::constants::DEFAULT_MAX_CALL_DEPTH;
use cstep::interpreter::{Config, Interpreter, RuntimeError};
use cstep::memory::Value;

fn run(source: &str) -> (Value, String) {
    let mut interpreter = Interpreter::from_source(source).expect("Parsing failed");
    let value = interpreter.run().expect("Execution failed");
    (value, interpreter.output())
}

fn run_err(source: &str) -> RuntimeError {
    let mut interpreter = Interpreter::from_source(source).expect("Parsing failed");
    interpreter
        .run()
        .expect_err("Execution should have failed")
}

#[test]
fn test_simple_arithmetic() {
    let source = r#"
        int main() {
            int x = 5;
            int y = 10;
            int z = x + y;
            return z;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(15));
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(run("int main() { return 1 + 2 * 3; }").0, Value::Int(5));
    assert_eq!(run("int main() { return 1 - 2 - 3; }").0, Value::Int(-4));
    assert_eq!(run("int main() { return (1 + 2) * 3; }").0, Value::Int(9));
    assert_eq!(run("int main() { return 1 < 2 == 1; }").0, Value::Int(1));
    assert_eq!(run("int main() { return 0 ? 1 : 0 ? 2 : 3; }").0, Value::Int(3));
    assert_eq!(run("int main() { int a; int b; a = b = 4; return a + b; }").0, Value::Int(8));
}

#[test]
fn test_function_call() {
    let source = r#"
        int add(int a, int b) {
            return a + b;
        }

        int main() {
            int result = add(3, 4);
            return result;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(7));
}

#[test]
fn test_recursive_factorial_and_fibonacci() {
    let source = r#"
        int factorial(int n) {
            if (n <= 1) return 1;
            return n * factorial(n - 1);
        }

        int fibonacci(int n) {
            if (n < 2) return n;
            return fibonacci(n - 1) + fibonacci(n - 2);
        }

        int main() {
            printf("%d %d\n", factorial(6), fibonacci(7));
            return 0;
        }
    "#;

    assert_eq!(run(source).1, "720 13\n");
}

#[test]
fn test_for_loop_runs_five_times() {
    let source = r#"
        int main() {
            int i;
            int sum = 0;
            int runs = 0;
            for (i = 0; i < 5; i++) {
                sum += i;
                runs++;
            }
            printf("%d %d %d\n", sum, runs, i);
            return sum;
        }
    "#;

    let (value, output) = run(source);
    assert_eq!(value, Value::Int(10));
    assert_eq!(output, "10 5 5\n");
}

#[test]
fn test_break_only_leaves_inner_loop() {
    let source = r#"
        int main() {
            int outer = 0;
            int inner_total = 0;
            while (outer < 3) {
                int j = 0;
                while (1) {
                    if (j == 2) break;
                    j++;
                    inner_total++;
                }
                outer++;
            }
            printf("%d %d\n", outer, inner_total);
            return 0;
        }
    "#;

    assert_eq!(run(source).1, "3 6\n");
}

#[test]
fn test_continue_still_runs_for_post() {
    let source = r#"
        int main() {
            int odd = 0;
            for (int i = 0; i < 6; i++) {
                if (i % 2 == 0) continue;
                odd += i;
            }
            return odd;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(9));
}

#[test]
fn test_division_and_modulo_by_zero() {
    assert!(matches!(
        run_err("int main() { return 5 / 0; }"),
        RuntimeError::DivisionByZero { .. }
    ));
    assert!(matches!(
        run_err("int main() { return 5 % 0; }"),
        RuntimeError::ModuloByZero { .. }
    ));

    // Float division follows IEEE instead
    let (_, output) = run(r#"int main() { printf("%f\n", 1.0 / 0); return 0; }"#);
    assert_eq!(output, "inf\n");
}

#[test]
fn test_error_stops_remaining_statements() {
    let source = r#"
        int main() {
            printf("before\n");
            int x = 1 / 0;
            printf("after\n");
            return 0;
        }
    "#;

    let mut interpreter = Interpreter::from_source(source).unwrap();
    let err = interpreter.run().unwrap_err();
    assert_eq!(err.to_string(), "Division by zero at line 4");
    assert_eq!(interpreter.output(), "before\n");
}

#[test]
fn test_reset_then_run_is_identical() {
    let source = r#"
        int calls = 0;

        int tick(int n) {
            calls++;
            printf("tick %d\n", n);
            return n * 2;
        }

        int main() {
            int total = 0;
            for (int i = 0; i < 3; i++) {
                total += tick(i);
            }
            return total + calls;
        }
    "#;

    let mut interpreter = Interpreter::from_source(source).unwrap();
    let first = interpreter.run().unwrap();
    let first_output = interpreter.output();

    interpreter.reset();
    let second = interpreter.run().unwrap();

    assert_eq!(first, Value::Int(9));
    assert_eq!(first, second);
    assert_eq!(first_output, interpreter.output());
    assert_eq!(first_output, "tick 0\ntick 1\ntick 2\n");
}

#[test]
fn test_globals_are_initialized_in_order() {
    let source = r#"
        int base = 40;
        int answer = base + 2;
        double ratio;

        int main() {
            printf("%d %.1f\n", answer, ratio);
            return answer;
        }
    "#;

    assert_eq!(run(source), (Value::Int(42), "42 0.0\n".to_string()));
}

#[test]
fn test_functions_share_globals() {
    let source = r#"
        int counter = 0;

        void bump(int by) {
            counter += by;
        }

        int main() {
            bump(3);
            bump(4);
            return counter;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(7));
}

#[test]
fn test_callee_cannot_see_caller_locals() {
    let source = r#"
        int peek() {
            return secret;
        }

        int main() {
            int secret = 1;
            return peek();
        }
    "#;

    match run_err(source) {
        RuntimeError::UndefinedVariable { name, .. } => assert_eq!(name, "secret"),
        other => panic!("Expected UndefinedVariable, got {:?}", other),
    }
}

#[test]
fn test_prototype_then_definition() {
    let source = r#"
        int twice(int n);

        int main() {
            return twice(21);
        }

        int twice(int n) {
            return n * 2;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(42));
}

#[test]
fn test_prototype_without_definition_is_undefined() {
    let source = r#"
        int missing(int n);
        int main() { return missing(1); }
    "#;

    assert!(matches!(
        run_err(source),
        RuntimeError::UndefinedFunction { ref name, .. } if name == "missing"
    ));
}

#[test]
fn test_missing_main() {
    let mut interpreter = Interpreter::from_source("int helper() { return 1; }").unwrap();
    assert_eq!(interpreter.run(), Err(RuntimeError::NoEntryPoint));
}

#[test]
fn test_main_without_return_yields_zero() {
    let (value, output) = run(r#"int main() { printf("done\n"); }"#);
    assert_eq!(value, Value::Int(0));
    assert_eq!(output, "done\n");
}

#[test]
fn test_call_depth_limit() {
    let source = r#"
        int forever(int n) {
            return forever(n + 1);
        }

        int main() {
            return forever(0);
        }
    "#;

    let config = Config::default().with_max_call_depth(20);
    let mut interpreter = Interpreter::from_source_with_config(source, config).unwrap();
    match interpreter.run() {
        Err(RuntimeError::CallDepthExceeded { function, limit, .. }) => {
            assert_eq!(function, "forever");
            assert_eq!(limit, 20);
        }
        other => panic!("Expected CallDepthExceeded, got {:?}", other),
    }
}

#[test]
fn test_deep_recursion_under_default_limit() {
    let source = r#"
        int down(int n) {
            if (n == 0) return 0;
            return 1 + down(n - 1);
        }

        int main() {
            return down(500);
        }
    "#;

    assert_eq!(run(source).0, Value::Int(500));
}

#[test]
fn test_unbounded_recursion_hits_default_limit() {
    let source = r#"
        int up(int n) {
            return 1 + up(n + 1);
        }

        int main() {
            return up(0);
        }
    "#;

    match run_err(source) {
        RuntimeError::CallDepthExceeded { function, limit, .. } => {
            assert_eq!(function, "up");
            assert_eq!(limit, DEFAULT_MAX_CALL_DEPTH);
        }
        other => panic!("Expected CallDepthExceeded, got {:?}", other),
    }
}

#[test]
fn test_short_circuit_is_configurable() {
    let source = r#"
        int hits = 0;

        int touch() {
            hits++;
            return 1;
        }

        int main() {
            int a = 0 && touch();
            int b = 1 || touch();
            return hits;
        }
    "#;

    assert_eq!(run(source).0, Value::Int(0));

    let config = Config::default().with_short_circuit(false);
    let mut eager = Interpreter::from_source_with_config(source, config).unwrap();
    assert_eq!(eager.run().unwrap(), Value::Int(2));
}

#[test]
fn test_string_comparison_and_type_errors() {
    let source = r#"
        int main() {
            char *name = "cstep";
            if (name == "cstep") return 1;
            return 0;
        }
    "#;
    assert_eq!(run(source).0, Value::Int(1));

    assert!(matches!(
        run_err(r#"int main() { return "a" - 1; }"#),
        RuntimeError::TypeError { .. }
    ));
}

#[test]
fn test_unsupported_pointer_and_index_operations() {
    assert!(matches!(
        run_err("int main() { int x = 1; return *x; }"),
        RuntimeError::UnsupportedOperation { .. }
    ));
    assert!(matches!(
        run_err("int main() { int a[3]; return a[0]; }"),
        RuntimeError::UnsupportedOperation { .. }
    ));
}

#[test]
fn test_invalid_assignment_target() {
    assert!(matches!(
        run_err("int main() { 3 = 4; return 0; }"),
        RuntimeError::InvalidAssignmentTarget { .. }
    ));
}

#[test]
fn test_printf_end_to_end() {
    let source = r#"
        int main() {
            char c = 'A';
            printf("[%5d|%-5d|%05d]\n", 42, 42, 42);
            printf("%c%c %s!\n", c, c + 1, "hello");
            printf("%.2f %e %g\n", 3.14159, 1234.5, 0.0001);
            printf("%x %X %o %%\n", 255, 255, 8);
            putchar('!');
            putchar('\n');
            return 0;
        }
    "#;

    assert_eq!(
        run(source).1,
        "[   42|42   |00042]\nAB hello!\n3.14 1.234500e+03 0.0001\nff FF 10 %\n!\n"
    );
}

#[test]
fn test_math_builtins() {
    let source = r#"
        int main() {
            printf("%.1f %.1f %.1f %d\n", sqrt(16), pow(2, 3), floor(2.7), abs(-5));
            return 0;
        }
    "#;

    assert_eq!(run(source).1, "4.0 8.0 2.0 5\n");
}

#[test]
fn test_output_chunks_track_source_lines() {
    let source = "int main() {\n  printf(\"a\");\n  printf(\"b\\n\");\n  return 0;\n}";
    let mut interpreter = Interpreter::from_source(source).unwrap();
    interpreter.run().unwrap();

    let lines: Vec<usize> = interpreter
        .terminal()
        .chunks()
        .iter()
        .map(|chunk| chunk.location.line)
        .collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(interpreter.terminal().lines(), vec!["ab".to_string()]);
}

#[test]
fn test_parse_error_missing_paren() {
    let source = r#"
        int main() {
            int x = 2;
            if (x > 1 {
                return 1;
            }
            return 0;
        }
    "#;

    let err = Interpreter::from_source(source).err().expect("Parse should fail");
    assert!(!err.diagnostics.is_empty());
    assert_eq!(err.diagnostics[0].location.line, 4);
}
