// Tokens for predicate lexical analysis

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Operator kinds carried by operator tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Concat,
    And,
    Or,
    Not,
    In,
    Like,
    Between,
}

/// Conversion function kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncKind {
    ToChar,
    ToNumber,
    ToDate,
}

/// Token payloads
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Eof,
    Dot,
    Comma,
    LeftParen,
    RightParen,
    Op(OpKind),
    Integer(i64),
    Real(f64),
    String(String),
    Func(FuncKind),
    /// Identifier that is not a keyword; holds the uppercased name
    Field(String),
}

/// A token plus the character offset where it starts in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Keyword table: uppercased identifier text to its token payload.
/// Built once at process start, never mutated afterward.
pub static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("AND", TokenKind::Op(OpKind::And));
    map.insert("OR", TokenKind::Op(OpKind::Or));
    map.insert("NOT", TokenKind::Op(OpKind::Not));
    map.insert("IN", TokenKind::Op(OpKind::In));
    map.insert("LIKE", TokenKind::Op(OpKind::Like));
    map.insert("BETWEEN", TokenKind::Op(OpKind::Between));
    map.insert("TO_CHAR", TokenKind::Func(FuncKind::ToChar));
    map.insert("TO_NUMBER", TokenKind::Func(FuncKind::ToNumber));
    map.insert("TO_DATE", TokenKind::Func(FuncKind::ToDate));
    map
});

/// Look up an identifier in the keyword table, case-insensitively
pub fn keyword_lookup(identifier: &str) -> Option<TokenKind> {
    KEYWORDS.get(identifier.to_uppercase().as_str()).cloned()
}
