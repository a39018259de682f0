//! Tree-walking expression evaluation.

use crate::convert;
use crate::expression::expr::Expr;
use crate::expression::operator::{ArithOp, CompareOp, LogicalOp};
use crate::like::like_match;
use crate::rows::{DataType, Row, Value};
use std::cmp::Ordering;
use thiserror::Error;

/// Errors that can occur while evaluating a compiled tree against a row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Integer division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// TO_CHAR / TO_NUMBER / TO_DATE could not coerce the value
    #[error("cannot convert '{value}' to {target}")]
    ConversionFailed { value: String, target: DataType },

    /// An operator/value combination the parser's type checks should have
    /// made unreachable; signals a defect, not bad input
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluate an expression against one row.
///
/// Total and side-effect-free for any tree compiled against a schema that
/// matches the row's shape.
pub fn evaluate(expr: &Expr, row: &Row) -> EvalResult<Value> {
    match expr {
        Expr::Const(value) => Ok(value.clone()),

        Expr::Field { index, .. } => row.get(*index).cloned().ok_or_else(|| {
            EvalError::Internal(format!(
                "field position {} outside row of {} values",
                index,
                row.len()
            ))
        }),

        Expr::Negate(child) => match evaluate(child, row)? {
            Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
            Value::Real(f) => Ok(Value::Real(-f)),
            other => Err(EvalError::Internal(format!(
                "negation of non-numeric value {:?}",
                other
            ))),
        },

        Expr::Arithmetic { ops, operands } => eval_arithmetic(ops, operands, row),

        Expr::Concat(operands) => {
            let mut out = String::new();
            for operand in operands {
                out.push_str(&convert::stringify(&evaluate(operand, row)?));
            }
            Ok(Value::String(out))
        }

        Expr::Compare { op, left, right } => {
            let left_val = evaluate(left, row)?;
            let right_val = evaluate(right, row)?;
            eval_compare(*op, left_val, right_val)
        }

        Expr::Logical { op, operands } => eval_logical(*op, operands, row),

        Expr::Convert { target, child } => {
            let value = evaluate(child, row)?;
            convert::coerce(*target, value)
        }
    }
}

/// Running accumulator for an arithmetic chain: starts as i64 when the first
/// operand is integral, promotes permanently to f64 on the first real.
enum Acc {
    Int(i64),
    Real(f64),
}

impl Acc {
    fn from_value(value: Value) -> EvalResult<Acc> {
        match value {
            Value::Integer(n) => Ok(Acc::Int(n)),
            Value::Real(f) => Ok(Acc::Real(f)),
            other => Err(EvalError::Internal(format!(
                "arithmetic over non-numeric value {:?}",
                other
            ))),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Acc::Int(n) => Value::Integer(n),
            Acc::Real(f) => Value::Real(f),
        }
    }
}

fn eval_arithmetic(ops: &[ArithOp], operands: &[Expr], row: &Row) -> EvalResult<Value> {
    let mut iter = operands.iter();
    let first = iter.next().ok_or_else(|| {
        EvalError::Internal("arithmetic chain with no operands".to_string())
    })?;
    let mut acc = Acc::from_value(evaluate(first, row)?)?;

    for (op, operand) in ops.iter().zip(iter) {
        let rhs = Acc::from_value(evaluate(operand, row)?)?;
        acc = apply_arith(*op, acc, rhs)?;
    }

    Ok(acc.into_value())
}

fn apply_arith(op: ArithOp, left: Acc, right: Acc) -> EvalResult<Acc> {
    match (left, right) {
        (Acc::Int(a), Acc::Int(b)) => {
            let result = match op {
                ArithOp::Add => a.wrapping_add(b),
                ArithOp::Sub => a.wrapping_sub(b),
                ArithOp::Mul => a.wrapping_mul(b),
                ArithOp::Div => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.wrapping_div(b)
                }
                ArithOp::Mod => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    a.wrapping_rem(b)
                }
            };
            Ok(Acc::Int(result))
        }
        // A real anywhere in the chain promotes the rest of it
        (left, right) => {
            let a = match left {
                Acc::Int(n) => n as f64,
                Acc::Real(f) => f,
            };
            let b = match right {
                Acc::Int(n) => n as f64,
                Acc::Real(f) => f,
            };
            let result = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
                ArithOp::Mod => a % b,
            };
            Ok(Acc::Real(result))
        }
    }
}

fn eval_compare(op: CompareOp, left: Value, right: Value) -> EvalResult<Value> {
    if op == CompareOp::Like {
        let subject = convert::stringify(&left);
        let pattern = convert::stringify(&right);
        return Ok(Value::Boolean(like_match(&subject, &pattern)));
    }

    let ordering = left.compare(&right).ok_or_else(|| {
        EvalError::Internal(format!(
            "comparison {} over incomparable values {:?} and {:?}",
            op.as_str(),
            left,
            right
        ))
    })?;

    let result = match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Like => unreachable!("handled above"),
    };
    Ok(Value::Boolean(result))
}

fn eval_logical(op: LogicalOp, operands: &[Expr], row: &Row) -> EvalResult<Value> {
    match op {
        // Short-circuit: later operands are never evaluated once the
        // result is decided
        LogicalOp::And => {
            for operand in operands {
                match evaluate(operand, row)? {
                    Value::Boolean(false) => return Ok(Value::Boolean(false)),
                    Value::Boolean(true) => {}
                    other => {
                        return Err(EvalError::Internal(format!(
                            "AND over non-boolean value {:?}",
                            other
                        )))
                    }
                }
            }
            Ok(Value::Boolean(true))
        }
        LogicalOp::Or => {
            for operand in operands {
                match evaluate(operand, row)? {
                    Value::Boolean(true) => return Ok(Value::Boolean(true)),
                    Value::Boolean(false) => {}
                    other => {
                        return Err(EvalError::Internal(format!(
                            "OR over non-boolean value {:?}",
                            other
                        )))
                    }
                }
            }
            Ok(Value::Boolean(false))
        }
        LogicalOp::Not => {
            let operand = operands.first().ok_or_else(|| {
                EvalError::Internal("NOT with no operand".to_string())
            })?;
            match evaluate(operand, row)? {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(EvalError::Internal(format!(
                    "NOT over non-boolean value {:?}",
                    other
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_row() -> Row {
        Row::new(vec![])
    }

    fn int(n: i64) -> Expr {
        Expr::Const(Value::Integer(n))
    }

    fn real(f: f64) -> Expr {
        Expr::Const(Value::Real(f))
    }

    fn chain(ops: Vec<ArithOp>, operands: Vec<Expr>) -> Expr {
        Expr::Arithmetic { ops, operands }
    }

    #[test]
    fn test_integer_arithmetic() {
        let expr = chain(vec![ArithOp::Add], vec![int(1), int(2)]);
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Integer(3));

        let expr = chain(vec![ArithOp::Div], vec![int(5), int(2)]);
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Integer(2));

        let expr = chain(vec![ArithOp::Mod], vec![int(7), int(3)]);
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_promotion_to_real() {
        let expr = chain(vec![ArithOp::Add], vec![int(1), real(2.0)]);
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Real(3.0));

        let expr = chain(vec![ArithOp::Div], vec![real(5.0), int(2)]);
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Real(2.5));

        // Promotion is permanent for the remainder of the chain
        let expr = chain(
            vec![ArithOp::Add, ArithOp::Div],
            vec![int(1), real(0.5), int(3)],
        );
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Real(0.5));
    }

    #[test]
    fn test_division_by_zero() {
        let expr = chain(vec![ArithOp::Div], vec![int(5), int(0)]);
        assert_eq!(
            evaluate(&expr, &empty_row()),
            Err(EvalError::DivisionByZero)
        );

        let expr = chain(vec![ArithOp::Mod], vec![int(5), int(0)]);
        assert_eq!(
            evaluate(&expr, &empty_row()),
            Err(EvalError::DivisionByZero)
        );

        // IEEE semantics for reals: no fault
        let expr = chain(vec![ArithOp::Div], vec![real(5.0), int(0)]);
        assert_eq!(
            evaluate(&expr, &empty_row()).unwrap(),
            Value::Real(f64::INFINITY)
        );
    }

    #[test]
    fn test_negate() {
        let expr = Expr::Negate(Box::new(int(42)));
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Integer(-42));

        let expr = Expr::Negate(Box::new(real(1.5)));
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Real(-1.5));
    }

    #[test]
    fn test_field_lookup() {
        let row = Row::new(vec![Value::Integer(7), Value::String("x".to_string())]);
        let expr = Expr::Field {
            index: 1,
            data_type: DataType::String,
        };
        assert_eq!(
            evaluate(&expr, &row).unwrap(),
            Value::String("x".to_string())
        );

        let expr = Expr::Field {
            index: 5,
            data_type: DataType::Number,
        };
        assert!(matches!(
            evaluate(&expr, &row),
            Err(EvalError::Internal(_))
        ));
    }

    #[test]
    fn test_concat_stringifies_operands() {
        let expr = Expr::Concat(vec![
            Expr::Const(Value::String("n=".to_string())),
            int(3),
            Expr::Const(Value::String("!".to_string())),
        ]);
        assert_eq!(
            evaluate(&expr, &empty_row()).unwrap(),
            Value::String("n=3!".to_string())
        );
    }

    #[test]
    fn test_comparisons() {
        let cmp = |op, l, r| {
            evaluate(
                &Expr::Compare {
                    op,
                    left: Box::new(l),
                    right: Box::new(r),
                },
                &empty_row(),
            )
            .unwrap()
        };

        assert_eq!(cmp(CompareOp::Lt, int(1), int(2)), Value::Boolean(true));
        assert_eq!(cmp(CompareOp::Ge, int(2), int(2)), Value::Boolean(true));
        assert_eq!(cmp(CompareOp::Ne, int(2), int(2)), Value::Boolean(false));
        assert_eq!(cmp(CompareOp::Eq, int(2), real(2.0)), Value::Boolean(true));
        assert_eq!(
            cmp(
                CompareOp::Like,
                Expr::Const(Value::String("abc".to_string())),
                Expr::Const(Value::String("a%c".to_string())),
            ),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_and_short_circuits() {
        // Right operand faults if evaluated
        let fault = Expr::Compare {
            op: CompareOp::Eq,
            left: Box::new(chain(vec![ArithOp::Div], vec![int(1), int(0)])),
            right: Box::new(int(1)),
        };
        let expr = Expr::Logical {
            op: LogicalOp::And,
            operands: vec![Expr::Const(Value::Boolean(false)), fault],
        };
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_or_short_circuits() {
        let fault = Expr::Compare {
            op: CompareOp::Eq,
            left: Box::new(chain(vec![ArithOp::Div], vec![int(1), int(0)])),
            right: Box::new(int(1)),
        };
        let expr = Expr::Logical {
            op: LogicalOp::Or,
            operands: vec![Expr::Const(Value::Boolean(true)), fault],
        };
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_not() {
        let expr = Expr::Logical {
            op: LogicalOp::Not,
            operands: vec![Expr::Const(Value::Boolean(true))],
        };
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_convert_node() {
        let expr = Expr::Convert {
            target: DataType::Number,
            child: Box::new(Expr::Const(Value::String("41".to_string()))),
        };
        assert_eq!(evaluate(&expr, &empty_row()).unwrap(), Value::Integer(41));

        let expr = Expr::Convert {
            target: DataType::String,
            child: Box::new(real(2.5)),
        };
        assert_eq!(
            evaluate(&expr, &empty_row()).unwrap(),
            Value::String("2.5".to_string())
        );
    }
}
