// Predicate lexer - turns source text into offset-carrying tokens

use super::error::{CompileResult, SyntaxError};
use super::token::{keyword_lookup, OpKind, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> CompileResult<Token> {
        self.skip_whitespace();

        let offset = self.position;
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, offset)),
        };

        let kind = match ch {
            '.' => {
                self.advance();
                TokenKind::Dot
            }
            ',' => {
                self.advance();
                TokenKind::Comma
            }
            '(' => {
                self.advance();
                TokenKind::LeftParen
            }
            ')' => {
                self.advance();
                TokenKind::RightParen
            }
            '+' => {
                self.advance();
                TokenKind::Op(OpKind::Plus)
            }
            '-' => {
                self.advance();
                TokenKind::Op(OpKind::Minus)
            }
            '*' => {
                self.advance();
                TokenKind::Op(OpKind::Star)
            }
            '/' => {
                self.advance();
                TokenKind::Op(OpKind::Slash)
            }
            '%' => {
                self.advance();
                TokenKind::Op(OpKind::Percent)
            }
            '=' => {
                self.advance();
                TokenKind::Op(OpKind::Equal)
            }
            '<' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::Op(OpKind::LessEqual)
                } else if self.current_char() == Some('>') {
                    self.advance();
                    TokenKind::Op(OpKind::NotEqual)
                } else {
                    TokenKind::Op(OpKind::Less)
                }
            }
            '>' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::Op(OpKind::GreaterEqual)
                } else {
                    TokenKind::Op(OpKind::Greater)
                }
            }
            '|' => {
                self.advance();
                if self.current_char() == Some('|') {
                    self.advance();
                    TokenKind::Op(OpKind::Concat)
                } else {
                    return Err(SyntaxError::new(offset, "expected '||'"));
                }
            }
            '\'' => self.read_string(offset)?,
            c if c.is_ascii_digit() => self.read_number(offset)?,
            c if c.is_alphabetic() || c == '_' => self.read_identifier(),
            c => {
                return Err(SyntaxError::new(
                    offset,
                    format!("unrecognized character '{}'", c),
                ))
            }
        };

        Ok(Token::new(kind, offset))
    }

    /// Tokenize the entire input, ending with an end-of-input token
    pub fn tokenize(&mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a string literal; `''` escapes a quote. Malformed literals are
    /// reported at the opening quote.
    fn read_string(&mut self, start: usize) -> CompileResult<TokenKind> {
        self.advance(); // Skip opening quote
        let mut string = String::new();

        loop {
            match self.current_char() {
                None => return Err(SyntaxError::new(start, "unterminated string literal")),
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        string.push('\'');
                        self.advance();
                        self.advance();
                    } else {
                        self.advance(); // Skip closing quote
                        break;
                    }
                }
                Some(ch) => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Ok(TokenKind::String(string))
    }

    /// Read a numeric literal, tagging it integer or real
    fn read_number(&mut self, start: usize) -> CompileResult<TokenKind> {
        let mut number = String::new();
        let mut has_dot = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !has_dot && self.peek().is_some_and(|c| c.is_ascii_digit()) {
                has_dot = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if has_dot {
            match number.parse::<f64>() {
                Ok(value) => Ok(TokenKind::Real(value)),
                Err(_) => Err(SyntaxError::new(start, format!("malformed number '{}'", number))),
            }
        } else {
            match number.parse::<i64>() {
                Ok(value) => Ok(TokenKind::Integer(value)),
                // Too wide for i64: fall back to real magnitude
                Err(_) => match number.parse::<f64>() {
                    Ok(value) => Ok(TokenKind::Real(value)),
                    Err(_) => Err(SyntaxError::new(
                        start,
                        format!("malformed number '{}'", number),
                    )),
                },
            }
        }
    }

    /// Read an identifier; keyword-table hits become operator/function
    /// tokens, misses become fields holding the uppercased name
    fn read_identifier(&mut self) -> TokenKind {
        let mut identifier = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        keyword_lookup(&identifier).unwrap_or_else(|| TokenKind::Field(identifier.to_uppercase()))
    }
}
