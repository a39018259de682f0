// Predicate module - lexing, parsing, and compilation of filter expressions

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{CompileResult, SyntaxError};
pub use lexer::Lexer;
pub use parser::compile;
pub use token::{FuncKind, OpKind, Token, TokenKind};
