// Predicate parser - recursive descent over tokens, with parse-time type
// checking against the schema

use super::error::{CompileResult, SyntaxError};
use super::lexer::Lexer;
use super::token::{FuncKind, OpKind, Token, TokenKind};
use crate::expression::{ArithOp, CompareOp, Expr, FilterTree, LogicalOp};
use crate::rows::{DataType, Schema, Value};

/// Compile a predicate against a schema.
///
/// Returns the typed, immutable filter tree, or the first syntax error
/// encountered; no partial tree is ever produced.
pub fn compile(text: &str, schema: &Schema) -> CompileResult<FilterTree> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser {
        tokens,
        position: 0,
        schema,
    };
    let root = parser.parse_or()?;

    // The whole input must be consumed; trailing tokens are an error
    let trailing = parser.current_token();
    if trailing.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            trailing.offset,
            "unexpected input after expression",
        ));
    }

    log::debug!("compiled predicate {:?} over {} columns", text, schema.len());
    Ok(FilterTree::new(root))
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    schema: &'a Schema,
}

impl<'a> Parser<'a> {
    // Precedence ladder, loosest binding first:
    // OR > AND > NOT > COMPARE > CONCAT > ADD/SUB > MUL/DIV/MOD > UNARY > TERM

    fn parse_or(&mut self) -> CompileResult<Expr> {
        let first = self.parse_and()?;

        if !self.match_op(OpKind::Or) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.match_op(OpKind::Or) {
            let offset = self.current_token().offset;
            self.advance();
            self.require_boolean(operands.last().unwrap(), offset, "OR")?;
            let right = self.parse_and()?;
            self.require_boolean(&right, offset, "OR")?;
            operands.push(right);
        }

        Ok(Expr::Logical {
            op: LogicalOp::Or,
            operands,
        })
    }

    fn parse_and(&mut self) -> CompileResult<Expr> {
        let first = self.parse_not()?;

        if !self.match_op(OpKind::And) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while self.match_op(OpKind::And) {
            let offset = self.current_token().offset;
            self.advance();
            self.require_boolean(operands.last().unwrap(), offset, "AND")?;
            let right = self.parse_not()?;
            self.require_boolean(&right, offset, "AND")?;
            operands.push(right);
        }

        Ok(Expr::Logical {
            op: LogicalOp::And,
            operands,
        })
    }

    fn parse_not(&mut self) -> CompileResult<Expr> {
        if self.match_op(OpKind::Not) {
            let offset = self.current_token().offset;
            self.advance();
            let operand = self.parse_comparison()?;
            self.require_boolean(&operand, offset, "NOT")?;
            Ok(Expr::Logical {
                op: LogicalOp::Not,
                operands: vec![operand],
            })
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> CompileResult<Expr> {
        let left = self.parse_concat()?;

        if self.match_op(OpKind::Like) {
            let offset = self.current_token().offset;
            self.advance();
            let right = self.parse_concat()?;
            self.require_type(&left, DataType::String, offset, "LIKE")?;
            self.require_type(&right, DataType::String, offset, "LIKE")?;
            return Ok(Expr::Compare {
                op: CompareOp::Like,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        if self.match_op(OpKind::Between) {
            return self.parse_between(left);
        }

        if self.match_op(OpKind::In) {
            return self.parse_in(left);
        }

        let op = match self.current_token().kind {
            TokenKind::Op(OpKind::Equal) => Some(CompareOp::Eq),
            TokenKind::Op(OpKind::NotEqual) => Some(CompareOp::Ne),
            TokenKind::Op(OpKind::Less) => Some(CompareOp::Lt),
            TokenKind::Op(OpKind::LessEqual) => Some(CompareOp::Le),
            TokenKind::Op(OpKind::Greater) => Some(CompareOp::Gt),
            TokenKind::Op(OpKind::GreaterEqual) => Some(CompareOp::Ge),
            _ => None,
        };

        if let Some(op) = op {
            let offset = self.current_token().offset;
            self.advance();
            let right = self.parse_concat()?;
            self.require_same_type(&left, &right, offset, op.as_str())?;
            Ok(Expr::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            })
        } else {
            Ok(left)
        }
    }

    /// `left BETWEEN low AND high` rewrites to `(left>=low) AND (left<=high)`
    fn parse_between(&mut self, left: Expr) -> CompileResult<Expr> {
        let offset = self.current_token().offset;
        self.advance();

        let low = self.parse_concat()?;
        if !self.match_op(OpKind::And) {
            return Err(SyntaxError::new(
                self.current_token().offset,
                "expected AND in BETWEEN",
            ));
        }
        self.advance();
        let high = self.parse_concat()?;

        self.require_same_type(&left, &low, offset, "BETWEEN")?;
        self.require_same_type(&left, &high, offset, "BETWEEN")?;

        let lower = Expr::Compare {
            op: CompareOp::Ge,
            left: Box::new(left.clone()),
            right: Box::new(low),
        };
        let upper = Expr::Compare {
            op: CompareOp::Le,
            left: Box::new(left),
            right: Box::new(high),
        };
        Ok(Expr::Logical {
            op: LogicalOp::And,
            operands: vec![lower, upper],
        })
    }

    /// `left IN (v1, ..., vn)` rewrites to `(left=v1) OR ... OR (left=vn)`
    fn parse_in(&mut self, left: Expr) -> CompileResult<Expr> {
        let offset = self.current_token().offset;
        self.advance();

        if self.current_token().kind != TokenKind::LeftParen {
            return Err(SyntaxError::new(
                self.current_token().offset,
                "expected '(' after IN",
            ));
        }
        self.advance();

        let mut operands = Vec::new();
        loop {
            let value = self.parse_concat()?;
            self.require_same_type(&left, &value, offset, "IN")?;
            operands.push(Expr::Compare {
                op: CompareOp::Eq,
                left: Box::new(left.clone()),
                right: Box::new(value),
            });
            if self.current_token().kind != TokenKind::Comma {
                break;
            }
            self.advance();
        }

        if self.current_token().kind != TokenKind::RightParen {
            return Err(SyntaxError::new(
                self.current_token().offset,
                "expected ')' closing IN list",
            ));
        }
        self.advance();

        Ok(Expr::Logical {
            op: LogicalOp::Or,
            operands,
        })
    }

    fn parse_concat(&mut self) -> CompileResult<Expr> {
        let first = self.parse_addition()?;

        if !self.match_op(OpKind::Concat) {
            return Ok(first);
        }

        // Any type that stringifies may join the chain
        let mut operands = vec![first];
        while self.match_op(OpKind::Concat) {
            self.advance();
            operands.push(self.parse_addition()?);
        }

        Ok(Expr::Concat(operands))
    }

    fn parse_addition(&mut self) -> CompileResult<Expr> {
        let first = self.parse_multiplication()?;

        let mut ops = Vec::new();
        let mut operands = vec![first];
        loop {
            let op = match self.current_token().kind {
                TokenKind::Op(OpKind::Plus) => ArithOp::Add,
                TokenKind::Op(OpKind::Minus) => ArithOp::Sub,
                _ => break,
            };
            let offset = self.current_token().offset;
            self.advance();
            self.require_type(operands.last().unwrap(), DataType::Number, offset, op.as_str())?;
            let right = self.parse_multiplication()?;
            self.require_type(&right, DataType::Number, offset, op.as_str())?;
            ops.push(op);
            operands.push(right);
        }

        if ops.is_empty() {
            Ok(operands.pop().unwrap())
        } else {
            Ok(Expr::Arithmetic { ops, operands })
        }
    }

    fn parse_multiplication(&mut self) -> CompileResult<Expr> {
        let first = self.parse_unary()?;

        let mut ops = Vec::new();
        let mut operands = vec![first];
        loop {
            let op = match self.current_token().kind {
                TokenKind::Op(OpKind::Star) => ArithOp::Mul,
                TokenKind::Op(OpKind::Slash) => ArithOp::Div,
                TokenKind::Op(OpKind::Percent) => ArithOp::Mod,
                _ => break,
            };
            let offset = self.current_token().offset;
            self.advance();
            self.require_type(operands.last().unwrap(), DataType::Number, offset, op.as_str())?;
            let right = self.parse_unary()?;
            self.require_type(&right, DataType::Number, offset, op.as_str())?;
            ops.push(op);
            operands.push(right);
        }

        if ops.is_empty() {
            Ok(operands.pop().unwrap())
        } else {
            Ok(Expr::Arithmetic { ops, operands })
        }
    }

    fn parse_unary(&mut self) -> CompileResult<Expr> {
        match self.current_token().kind {
            TokenKind::Op(OpKind::Plus) => {
                let offset = self.current_token().offset;
                self.advance();
                let operand = self.parse_unary()?;
                self.require_type(&operand, DataType::Number, offset, "unary +")?;
                Ok(operand)
            }
            TokenKind::Op(OpKind::Minus) => {
                let offset = self.current_token().offset;
                self.advance();
                let operand = self.parse_unary()?;
                self.require_type(&operand, DataType::Number, offset, "unary -")?;
                Ok(Expr::Negate(Box::new(operand)))
            }
            _ => self.parse_term(),
        }
    }

    fn parse_term(&mut self) -> CompileResult<Expr> {
        let token = self.current_token().clone();
        match token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Const(Value::Integer(n)))
            }
            TokenKind::Real(f) => {
                self.advance();
                Ok(Expr::Const(Value::Real(f)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Const(Value::String(s)))
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_or()?;
                if self.current_token().kind != TokenKind::RightParen {
                    return Err(SyntaxError::new(
                        self.current_token().offset,
                        "expected ')'",
                    ));
                }
                self.advance();
                Ok(expr)
            }
            TokenKind::Field(name) => {
                self.advance();
                match self.schema.resolve(&name) {
                    Some((index, data_type)) => Ok(Expr::Field { index, data_type }),
                    None => Err(SyntaxError::new(
                        token.offset,
                        format!("operand required ('{}' is not a column)", name),
                    )),
                }
            }
            TokenKind::Func(kind) => {
                self.advance();
                self.parse_conversion(kind)
            }
            _ => Err(SyntaxError::new(token.offset, "operand required")),
        }
    }

    /// Conversion function call; the opening parenthesis is mandatory
    fn parse_conversion(&mut self, kind: FuncKind) -> CompileResult<Expr> {
        let (name, target) = match kind {
            FuncKind::ToChar => ("TO_CHAR", DataType::String),
            FuncKind::ToNumber => ("TO_NUMBER", DataType::Number),
            FuncKind::ToDate => ("TO_DATE", DataType::Date),
        };

        if self.current_token().kind != TokenKind::LeftParen {
            return Err(SyntaxError::new(
                self.current_token().offset,
                format!("expected '(' after {}", name),
            ));
        }
        self.advance();

        let child = self.parse_or()?;

        if self.current_token().kind != TokenKind::RightParen {
            return Err(SyntaxError::new(
                self.current_token().offset,
                format!("expected ')' closing {}", name),
            ));
        }
        self.advance();

        Ok(Expr::Convert {
            target,
            child: Box::new(child),
        })
    }

    // Helper methods

    fn current_token(&self) -> &Token {
        // tokenize() always appends Eof, so position stays in bounds
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn match_op(&self, op: OpKind) -> bool {
        self.current_token().kind == TokenKind::Op(op)
    }

    fn require_boolean(&self, expr: &Expr, offset: usize, context: &str) -> CompileResult<()> {
        self.require_type(expr, DataType::Boolean, offset, context)
    }

    fn require_type(
        &self,
        expr: &Expr,
        expected: DataType,
        offset: usize,
        context: &str,
    ) -> CompileResult<()> {
        let actual = expr.result_type();
        if actual == expected {
            Ok(())
        } else {
            Err(SyntaxError::new(
                offset,
                format!("{} requires a {} operand, got {}", context, expected, actual),
            ))
        }
    }

    fn require_same_type(
        &self,
        left: &Expr,
        right: &Expr,
        offset: usize,
        context: &str,
    ) -> CompileResult<()> {
        let left_type = left.result_type();
        let right_type = right.result_type();
        if left_type == right_type {
            Ok(())
        } else {
            Err(SyntaxError::new(
                offset,
                format!(
                    "{} operands must share a type, got {} and {}",
                    context, left_type, right_type
                ),
            ))
        }
    }
}
