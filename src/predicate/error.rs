//! Compilation error type.

use thiserror::Error;

/// Error raised when a predicate fails to lex, parse, or type-check.
///
/// Carries the character offset of the offending input and a human-readable
/// expectation. No partial tree is ever returned alongside one of these.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("syntax error at offset {offset}: {expected}")]
pub struct SyntaxError {
    pub offset: usize,
    pub expected: String,
}

impl SyntaxError {
    pub fn new(offset: usize, expected: impl Into<String>) -> Self {
        Self {
            offset,
            expected: expected.into(),
        }
    }
}

/// Result type for compilation
pub type CompileResult<T> = Result<T, SyntaxError>;
