//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a lazy [`Token`] stream consumed by the parser.
//! `#include` and other preprocessor directives are skipped line-wise rather
//! than parsed. Characters that start no token become [`TokenKind::Illegal`];
//! the parser reports them, the lexer itself never fails.

use super::ast::SourceLocation;
use std::fmt;

/// Every kind of token the lexer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,

    // Identifiers
    Ident,

    // Type keywords
    Int,
    Char,
    Void,
    Float,
    Double,
    Long,
    Short,
    Signed,
    Unsigned,
    Const,

    // Control keywords
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,

    // Reserved without grammar
    Auto,
    Case,
    Default,
    Do,
    Enum,
    Extern,
    Goto,
    Register,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Volatile,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    LtLtEq,    // <<=
    GtGtEq,    // >>=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Member access
    Dot,   // .
    Arrow, // ->

    // Ternary
    Question, // ?
    Colon,    // :

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    Illegal,
    Eof,
}

impl TokenKind {
    /// Keywords that may start a type specifier.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Char
                | TokenKind::Void
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Long
                | TokenKind::Short
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Const
        )
    }

    /// Keywords that begin a statement; the parser resynchronizes on these.
    pub fn is_statement_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Continue
        ) || self.is_type_keyword()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::CharLiteral => "character literal",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "'int'",
            TokenKind::Char => "'char'",
            TokenKind::Void => "'void'",
            TokenKind::Float => "'float'",
            TokenKind::Double => "'double'",
            TokenKind::Long => "'long'",
            TokenKind::Short => "'short'",
            TokenKind::Signed => "'signed'",
            TokenKind::Unsigned => "'unsigned'",
            TokenKind::Const => "'const'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::Return => "'return'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Auto => "'auto'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Do => "'do'",
            TokenKind::Enum => "'enum'",
            TokenKind::Extern => "'extern'",
            TokenKind::Goto => "'goto'",
            TokenKind::Register => "'register'",
            TokenKind::Sizeof => "'sizeof'",
            TokenKind::Static => "'static'",
            TokenKind::Struct => "'struct'",
            TokenKind::Switch => "'switch'",
            TokenKind::Typedef => "'typedef'",
            TokenKind::Union => "'union'",
            TokenKind::Volatile => "'volatile'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::LtLt => "'<<'",
            TokenKind::GtGt => "'>>'",
            TokenKind::Eq => "'='",
            TokenKind::PlusEq => "'+='",
            TokenKind::MinusEq => "'-='",
            TokenKind::StarEq => "'*='",
            TokenKind::SlashEq => "'/='",
            TokenKind::PercentEq => "'%='",
            TokenKind::AmpEq => "'&='",
            TokenKind::PipeEq => "'|='",
            TokenKind::CaretEq => "'^='",
            TokenKind::LtLtEq => "'<<='",
            TokenKind::GtGtEq => "'>>='",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Dot => "'.'",
            TokenKind::Arrow => "'->'",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Illegal => "illegal character",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

/// A classified lexical unit with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. Literals keep their raw text: numeric
    /// suffixes are dropped, quotes are stripped and escapes stay undecoded.
    pub literal: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Token {
            kind,
            literal: literal.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Ident => write!(f, "identifier '{}'", self.literal),
            TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                write!(f, "number '{}'", self.literal)
            }
            TokenKind::StringLiteral => write!(f, "string \"{}\"", self.literal),
            TokenKind::CharLiteral => write!(f, "character '{}'", self.literal),
            TokenKind::Illegal => {
                write!(f, "illegal character '{}'", self.literal)
            }
            kind => write!(f, "{}", kind),
        }
    }
}

fn keyword(ident: &str) -> Option<TokenKind> {
    let kind = match ident {
        "auto" => TokenKind::Auto,
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "char" => TokenKind::Char,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "default" => TokenKind::Default,
        "do" => TokenKind::Do,
        "double" => TokenKind::Double,
        "else" => TokenKind::Else,
        "enum" => TokenKind::Enum,
        "extern" => TokenKind::Extern,
        "float" => TokenKind::Float,
        "for" => TokenKind::For,
        "goto" => TokenKind::Goto,
        "if" => TokenKind::If,
        "int" => TokenKind::Int,
        "long" => TokenKind::Long,
        "register" => TokenKind::Register,
        "return" => TokenKind::Return,
        "short" => TokenKind::Short,
        "signed" => TokenKind::Signed,
        "sizeof" => TokenKind::Sizeof,
        "static" => TokenKind::Static,
        "struct" => TokenKind::Struct,
        "switch" => TokenKind::Switch,
        "typedef" => TokenKind::Typedef,
        "union" => TokenKind::Union,
        "unsigned" => TokenKind::Unsigned,
        "void" => TokenKind::Void,
        "volatile" => TokenKind::Volatile,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

/// Value of a character literal given its raw text (quotes stripped).
///
/// A leading backslash decodes a single escape; otherwise the first byte is
/// the value. An empty literal is `0`.
pub fn char_literal_value(raw: &str) -> u8 {
    let bytes = raw.as_bytes();
    match bytes {
        [] => 0,
        [b'\\', escaped, ..] => match escaped {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'0' => 0,
            b'\\' => b'\\',
            b'\'' => b'\'',
            b'"' => b'"',
            other => *other,
        },
        [first, ..] => *first,
    }
}

/// Decode the escapes of a raw string literal body.
///
/// Recognizes `\n \t \r \\ \" \' \0`. Any other escaped character is kept
/// as written, backslash included.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Lexer for C source code
///
/// Implements [`Iterator`]; the sequence ends with exactly one
/// [`TokenKind::Eof`] token.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Get next token
    fn next_token(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.position;
        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Token::new(TokenKind::Eof, "", loc),
        };

        let kind = match ch {
            '"' => {
                return self.quoted_literal('"', TokenKind::StringLiteral, loc);
            }
            '\'' => {
                return self.quoted_literal('\'', TokenKind::CharLiteral, loc);
            }
            '0'..='9' => return self.number_literal(ch, loc),
            c if c.is_alphabetic() || c == '_' => {
                return self.identifier_or_keyword(ch, loc);
            }

            '+' => self.choose(
                &[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEq)],
                TokenKind::Plus,
            ),
            '-' => self.choose(
                &[
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEq),
                    ('>', TokenKind::Arrow),
                ],
                TokenKind::Minus,
            ),
            '*' => self.choose(&[('=', TokenKind::StarEq)], TokenKind::Star),
            '/' => self.choose(&[('=', TokenKind::SlashEq)], TokenKind::Slash),
            '%' => self.choose(&[('=', TokenKind::PercentEq)], TokenKind::Percent),
            '=' => self.choose(&[('=', TokenKind::EqEq)], TokenKind::Eq),
            '!' => self.choose(&[('=', TokenKind::NotEq)], TokenKind::Bang),
            '^' => self.choose(&[('=', TokenKind::CaretEq)], TokenKind::Caret),
            '&' => self.choose(
                &[('&', TokenKind::AndAnd), ('=', TokenKind::AmpEq)],
                TokenKind::Amp,
            ),
            '|' => self.choose(
                &[('|', TokenKind::OrOr), ('=', TokenKind::PipeEq)],
                TokenKind::Pipe,
            ),
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    self.choose(&[('=', TokenKind::LtLtEq)], TokenKind::LtLt)
                } else {
                    self.choose(&[('=', TokenKind::Le)], TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.choose(&[('=', TokenKind::GtGtEq)], TokenKind::GtGt)
                } else {
                    self.choose(&[('=', TokenKind::Ge)], TokenKind::Gt)
                }
            }
            '~' => TokenKind::Tilde,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => TokenKind::Illegal,
        };

        let literal: String = self.input[start..self.position].iter().collect();
        Token::new(kind, literal, loc)
    }

    /// Consume one more character if it matches one of `options`.
    fn choose(
        &mut self,
        options: &[(char, TokenKind)],
        fallback: TokenKind,
    ) -> TokenKind {
        if let Some(next) = self.peek() {
            for &(ch, kind) in options {
                if next == ch {
                    self.advance();
                    return kind;
                }
            }
        }
        fallback
    }

    /// String or character literal. The opening quote is already consumed.
    /// An unterminated literal yields the text accumulated up to EOF.
    fn quoted_literal(
        &mut self,
        quote: char,
        kind: TokenKind,
        loc: SourceLocation,
    ) -> Token {
        let mut text = String::new();

        while let Some(ch) = self.advance() {
            if ch == quote {
                break;
            }
            text.push(ch);
            if ch == '\\' {
                if let Some(escaped) = self.advance() {
                    text.push(escaped);
                }
            }
        }

        Token::new(kind, text, loc)
    }

    /// Parse numeric literal (integer, fraction, exponent, dropped suffix)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);
        let mut kind = TokenKind::IntLiteral;

        self.take_digits(&mut num_str);

        if self.peek() == Some('.') {
            kind = TokenKind::FloatLiteral;
            num_str.push('.');
            self.advance();
            self.take_digits(&mut num_str);
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            kind = TokenKind::FloatLiteral;
            num_str.push('e');
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek() {
                num_str.push(sign);
                self.advance();
            }
            self.take_digits(&mut num_str);
        }

        // Suffixes like L, U, F carry no information here
        if matches!(self.peek(), Some('l' | 'L' | 'u' | 'U' | 'f' | 'F')) {
            self.advance();
            if matches!(self.peek(), Some('l' | 'L' | 'u' | 'U')) {
                self.advance();
            }
        }

        Token::new(kind, num_str, loc)
    }

    fn take_digits(&mut self, out: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = keyword(&ident).unwrap_or(TokenKind::Ident);
        Token::new(kind, ident, loc)
    }

    /// Skip whitespace, comments and preprocessor lines
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    self.skip_line();
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.skip_block_comment();
                }
                Some('#') if self.at_line_start() => {
                    self.skip_line();
                }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */); an unterminated one runs to EOF
    fn skip_block_comment(&mut self) {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// True when only whitespace precedes the cursor on the current line.
    fn at_line_start(&self) -> bool {
        self.input[..self.position]
            .iter()
            .rev()
            .take_while(|&&c| c != '\n')
            .all(|c| c.is_whitespace())
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        self.skip_trivia();
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}
