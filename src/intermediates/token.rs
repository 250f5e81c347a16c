//! A list of Tokens is the result of lexing, just chunked program data
//! with no regard for syntax. You're probably looking for [Token], not
//! TokenType, since you want that sweet location (span) data

use crate::span::Span;
use indexmap::IndexMap;

/// The kind of token (If, Int, Comma, etc), and any additional data
/// associated (for example Int: the value, as an i64)
#[derive(PartialEq, Clone, Debug)]
pub enum TokenType {
    Identifier(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Contents between the quotes, escapes left as written
    Str(String),
    Char(String),
    Func,
    If,
    Else,
    While,
    Return,
    Print,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Times,
    Divide,
    Assignment,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
}
impl TokenType {
    /// What kind of token this is, without any of its data. Used when
    /// listing what the parser expected
    pub fn name(&self) -> &'static str {
        use TokenType::*;
        match self {
            Identifier(_) => "identifier",
            Int(_) => "int literal",
            Float(_) => "float literal",
            Bool(_) => "bool literal",
            Str(_) => "string literal",
            Char(_) => "char literal",
            Func => "func",
            If => "if",
            Else => "else",
            While => "while",
            Return => "return",
            Print => "print",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            Plus => "+",
            Minus => "-",
            Times => "*",
            Divide => "/",
            Assignment => "=",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            Semicolon => ";",
            Comma => ",",
        }
    }
    /// The text this token stands for, quotes stripped from strings and chars
    pub fn lexeme(&self) -> String {
        use TokenType::*;
        match self {
            Identifier(s) | Str(s) | Char(s) => s.clone(),
            Int(i) => i.to_string(),
            Float(f) => crate::ast::fmt_float(*f),
            Bool(b) => b.to_string(),
            other => other.name().to_string(),
        }
    }
    /// Which group the token summary files this kind of token under
    pub fn category(&self) -> &'static str {
        use TokenType::*;
        match self {
            Func | If | Else | While | Return | Print => "Keywords",
            Identifier(_) => "Identifiers",
            Plus | Minus | Times | Divide | Assignment => "Arithmetic Operators",
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => "Relational Operators",
            Int(_) | Float(_) | Bool(_) | Str(_) | Char(_) => "Constants",
            LParen | RParen => "Parentheses",
            LBrace | RBrace | Semicolon | Comma => "Punctuations",
        }
    }
}
impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenType::*;
        match self {
            Identifier(name) => write!(f, "identifier `{}`", name),
            Int(_) | Float(_) | Bool(_) => write!(f, "{} `{}`", self.name(), self.lexeme()),
            Str(s) => write!(f, "string literal \"{}\"", s),
            Char(c) => write!(f, "char literal '{}'", c),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// All tokens have a location ([Token::span]) and a type ([Token::kind]),
/// but only some kinds of tokens have additional data (literal, name)
/// so THAT is encoded in the TokenType enum
#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    pub kind: TokenType,
    pub span: Span,
}
impl Token {
    pub fn line(&self) -> usize {
        self.span.lo.0
    }
    pub fn col(&self) -> usize {
        self.span.lo.1
    }
}
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

/// Tokens grouped by category, groups in the order they were first seen
#[derive(PartialEq, Debug, Default)]
pub struct TokenSummary {
    pub groups: IndexMap<&'static str, Vec<String>>,
}
impl TokenSummary {
    pub fn new(tokens: &[Token]) -> Self {
        let mut groups: IndexMap<&'static str, Vec<String>> = IndexMap::new();
        for token in tokens {
            groups.entry(token.kind.category()).or_insert_with(Vec::new).push(token.kind.lexeme());
        }
        Self { groups }
    }
}
impl std::fmt::Display for TokenSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (name, items) in &self.groups {
            writeln!(f, "{} ({}): {}", name, items.len(), items.join(", "))?;
        }
        Ok(())
    }
}
