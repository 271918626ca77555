//! Syntax tree definitions for the C subset
//!
//! The tree is split into two closed families, [`Stmt`] and [`Expr`], so the
//! evaluator can match exhaustively on every node kind. Nodes are plain data:
//! they are built once by the parser and never mutated afterwards.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Binary infix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }

    /// Relational and equality operators yield an integer boolean.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
    Inc,    // ++x
    Dec,    // --x
    Deref,  // *x
    AddrOf, // &x
}

impl PrefixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOp::Neg => "-",
            PrefixOp::Not => "!",
            PrefixOp::BitNot => "~",
            PrefixOp::Inc => "++",
            PrefixOp::Dec => "--",
            PrefixOp::Deref => "*",
            PrefixOp::AddrOf => "&",
        }
    }
}

/// Postfix unary operators (value-before-mutation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn symbol(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

/// Plain and compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    /// The binary operator a compound assignment applies, `None` for plain `=`.
    pub fn binary_op(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
            AssignOp::BitAnd => Some(BinOp::BitAnd),
            AssignOp::BitOr => Some(BinOp::BitOr),
            AssignOp::BitXor => Some(BinOp::BitXor),
            AssignOp::Shl => Some(BinOp::Shl),
            AssignOp::Shr => Some(BinOp::Shr),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        }
    }
}

/// Function parameter. Prototypes may omit the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub param_type: String,
    pub name: Option<String>,
}

/// Braced statement sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub location: SourceLocation,
}

impl Block {
    pub fn new(statements: Vec<Stmt>, location: SourceLocation) -> Self {
        Block {
            statements,
            location,
        }
    }
}

/// Function definition or prototype (`body` is `None` for prototypes)
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub return_type: String,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Option<Block>,
    pub location: SourceLocation,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Function(FunctionDecl),
    VarDecl {
        var_type: String,
        name: String,
        init: Option<Expr>,
        location: SourceLocation,
    },
    Block(Block),
    If {
        condition: Expr,
        consequence: Block,
        alternative: Option<Block>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Block,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        post: Option<Expr>,
        body: Block,
        location: SourceLocation,
    },
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Function(decl) => decl.location,
            Stmt::Block(block) => block.location,
            Stmt::VarDecl { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Expression { location, .. } => *location,
        }
    }

    /// Short human-readable label used by step outcomes and the TUI.
    pub fn summary(&self) -> String {
        match self {
            Stmt::Function(decl) => format!("{} {}(...)", decl.return_type, decl.name),
            Stmt::VarDecl {
                var_type,
                name,
                init: Some(init),
                ..
            } => format!("{} {} = {};", var_type, name, init),
            Stmt::VarDecl { var_type, name, .. } => format!("{} {};", var_type, name),
            Stmt::Block(_) => "{ ... }".to_string(),
            Stmt::If { condition, .. } => format!("if ({}) ...", condition),
            Stmt::While { condition, .. } => format!("while ({}) ...", condition),
            Stmt::For { .. } => "for (...) ...".to_string(),
            Stmt::Return { value: Some(v), .. } => format!("return {};", v),
            Stmt::Return { value: None, .. } => "return;".to_string(),
            Stmt::Break { .. } => "break;".to_string(),
            Stmt::Continue { .. } => "continue;".to_string(),
            Stmt::Expression { expr, .. } => format!("{};", expr),
        }
    }
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(String, SourceLocation),
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    StringLiteral(String, SourceLocation),
    CharLiteral(u8, SourceLocation),
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    Ternary {
        condition: Box<Expr>,
        consequence: Box<Expr>,
        alternative: Box<Expr>,
        location: SourceLocation,
    },
    Cast {
        target_type: String,
        expr: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Identifier(_, loc)
            | Expr::IntLiteral(_, loc)
            | Expr::FloatLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::CharLiteral(_, loc) => *loc,
            Expr::Prefix { location, .. }
            | Expr::Postfix { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Call { location, .. }
            | Expr::Index { location, .. }
            | Expr::Ternary { location, .. }
            | Expr::Cast { location, .. } => *location,
        }
    }
}

/// Fully parenthesized rendering; the shape of the tree is visible in the output.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name, _) => write!(f, "{}", name),
            Expr::IntLiteral(n, _) => write!(f, "{}", n),
            Expr::FloatLiteral(x, _) => write!(f, "{:?}", x),
            Expr::StringLiteral(s, _) => write!(f, "\"{}\"", s),
            Expr::CharLiteral(c, _) => {
                if c.is_ascii_graphic() || *c == b' ' {
                    write!(f, "'{}'", *c as char)
                } else {
                    write!(f, "'\\x{:02x}'", c)
                }
            }
            Expr::Prefix { op, operand, .. } => write!(f, "({}{})", op.symbol(), operand),
            Expr::Postfix { op, operand, .. } => write!(f, "({}{})", operand, op.symbol()),
            Expr::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", left, op.symbol(), right),
            Expr::Assign {
                target, op, value, ..
            } => write!(f, "({} {} {})", target, op.symbol(), value),
            Expr::Call { callee, args, .. } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Index { base, index, .. } => write!(f, "{}[{}]", base, index),
            Expr::Ternary {
                condition,
                consequence,
                alternative,
                ..
            } => write!(f, "({} ? {} : {})", condition, consequence, alternative),
            Expr::Cast {
                target_type, expr, ..
            } => write!(f, "(({}) {})", target_type, expr),
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// All top-level declarations in source order (functions, prototypes, globals)
    pub declarations: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Iterate over the function declarations together with their indices.
    pub fn functions(&self) -> impl Iterator<Item = (usize, &FunctionDecl)> {
        self.declarations
            .iter()
            .enumerate()
            .filter_map(|(i, stmt)| match stmt {
                Stmt::Function(decl) => Some((i, decl)),
                _ => None,
            })
    }

    /// Look up a function declaration by its index in `declarations`.
    pub fn function_at(&self, index: usize) -> Option<&FunctionDecl> {
        match self.declarations.get(index) {
            Some(Stmt::Function(decl)) => Some(decl),
            _ => None,
        }
    }
}
