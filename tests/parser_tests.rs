// Parser tests through the public API

use cstep::parser::ast::{Expr, Program, Stmt};
use cstep::parser::lexer::{Lexer, TokenKind};
use cstep::parser::parse;

fn main_body(program: &Program) -> &[Stmt] {
    program
        .functions()
        .find(|(_, f)| f.name == "main")
        .and_then(|(_, f)| f.body.as_ref())
        .map(|b| b.statements.as_slice())
        .expect("main with a body")
}

/// Shape of the expression returned by `main`
fn returned_shape(expr_source: &str) -> String {
    let program = parse(&format!("int main() {{ return {}; }}", expr_source)).unwrap();
    match &main_body(&program)[0] {
        Stmt::Return {
            value: Some(expr), ..
        } => expr.to_string(),
        other => panic!("Expected return, got {:?}", other),
    }
}

#[test]
fn test_operator_pairs_follow_precedence() {
    let pairs = [
        ("a + b * c", "(a + (b * c))"),
        ("a * b + c", "((a * b) + c)"),
        ("a - b - c", "((a - b) - c)"),
        ("a == b && c", "((a == b) && c)"),
        ("a || b && c", "(a || (b && c))"),
        ("a & b | c ^ d", "((a & b) | (c ^ d))"),
        ("a << b < c", "((a << b) < c)"),
        ("!a == -b", "((!a) == (-b))"),
    ];
    for (source, shape) in pairs {
        assert_eq!(returned_shape(source), shape, "shape of {}", source);
    }
}

#[test]
fn test_ternary_and_assignment_right_associate() {
    assert_eq!(returned_shape("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    assert_eq!(returned_shape("a = b = c"), "(a = (b = c))");
}

#[test]
fn test_program_structure() {
    let source = r#"
#include <stdio.h>
#define UNUSED 1

int total = 0, count;
double average(int sum, int n);

/* definition */
double average(int sum, int n) {
    return (double) sum / n;
}

int main(void) {
    for (int i = 0; i < 3; i++) total += i;
    return 0;
}
"#;
    let program = parse(source).unwrap();

    let names: Vec<String> = program
        .declarations
        .iter()
        .map(|stmt| match stmt {
            Stmt::VarDecl { name, .. } => format!("var {}", name),
            Stmt::Function(f) if f.body.is_none() => format!("proto {}", f.name),
            Stmt::Function(f) => format!("fn {}", f.name),
            other => panic!("unexpected top-level {:?}", other),
        })
        .collect();
    assert_eq!(
        names,
        vec!["var total", "var count", "proto average", "fn average", "fn main"]
    );

    match &main_body(&program)[0] {
        Stmt::For {
            init: Some(init),
            condition: Some(_),
            post: Some(_),
            body,
            ..
        } => {
            assert!(matches!(**init, Stmt::VarDecl { ref name, .. } if name == "i"));
            assert_eq!(body.statements.len(), 1);
        }
        other => panic!("Expected for loop, got {:?}", other),
    }
}

#[test]
fn test_declared_type_names() {
    let program =
        parse("int main() { unsigned long n; const char *s = \"x\"; float v[4]; return 0; }")
            .unwrap();
    let types: Vec<&str> = main_body(&program)
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::VarDecl { var_type, .. } => Some(var_type.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(types, vec!["unsigned long", "const char*", "float[]"]);
}

#[test]
fn test_locations_are_one_based() {
    let program = parse("int main() {\n    return x;\n}").unwrap();
    match &main_body(&program)[0] {
        Stmt::Return {
            value: Some(Expr::Identifier(name, location)),
            ..
        } => {
            assert_eq!(name, "x");
            assert_eq!((location.line, location.column), (2, 12));
        }
        other => panic!("Expected return of identifier, got {:?}", other),
    }
}

#[test]
fn test_missing_paren_fails_construction() {
    let source = "int main() {\n  int x = 2;\n  if (x > 1 { x = 0; }\n  return x;\n}";
    let err = parse(source).unwrap_err();

    assert!(!err.diagnostics.is_empty());
    assert_eq!(err.diagnostics[0].expected, Some(TokenKind::RParen));
    assert_eq!(err.diagnostics[0].location.line, 3);
    assert!(err.to_string().contains("line 3"));
}

#[test]
fn test_every_error_is_reported() {
    let source = "int main() {\n  int = 1;\n  x = (2;\n  return 0;\n}";
    let err = parse(source).unwrap_err();

    let lines: Vec<usize> = err.diagnostics.iter().map(|d| d.location.line).collect();
    assert!(lines.contains(&2));
    assert!(lines.contains(&3));
}

#[test]
fn test_lexer_stream_ends_with_single_eof() {
    let kinds: Vec<TokenKind> = Lexer::new("x += 1; // done").map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::PlusEq,
            TokenKind::IntLiteral,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}
