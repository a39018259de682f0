//! Expression tree definitions.
//!
//! A compiled predicate is a closed set of eight node shapes. Nodes are
//! immutable once built and carry their static result type, so one tree may
//! be evaluated concurrently against independent rows.

use crate::expression::eval::{evaluate, EvalResult};
use crate::expression::operator::{ArithOp, CompareOp, LogicalOp};
use crate::rows::{DataType, Row, Value};

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal constant value
    Const(Value),

    /// Reference to a column, resolved to its position at parse time
    Field { index: usize, data_type: DataType },

    /// Arithmetic negation of a Number operand
    Negate(Box<Expr>),

    /// Left-to-right arithmetic chain; `ops` is one shorter than `operands`
    Arithmetic { ops: Vec<ArithOp>, operands: Vec<Expr> },

    /// String concatenation chain
    Concat(Vec<Expr>),

    /// Binary comparison (relational operators and LIKE)
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical connective; AND/OR are n-ary, NOT holds one operand
    Logical { op: LogicalOp, operands: Vec<Expr> },

    /// Type conversion produced by TO_CHAR / TO_NUMBER / TO_DATE
    Convert { target: DataType, child: Box<Expr> },
}

impl Expr {
    /// The static result type of this node.
    ///
    /// The parser only builds constants from literals, which always carry a
    /// type; the Null arm is unreachable for parser-built trees.
    pub fn result_type(&self) -> DataType {
        match self {
            Expr::Const(value) => value.data_type().unwrap_or(DataType::String),
            Expr::Field { data_type, .. } => *data_type,
            Expr::Negate(_) => DataType::Number,
            Expr::Arithmetic { .. } => DataType::Number,
            Expr::Concat(_) => DataType::String,
            Expr::Compare { .. } => DataType::Boolean,
            Expr::Logical { .. } => DataType::Boolean,
            Expr::Convert { target, .. } => *target,
        }
    }

    /// Check if this expression references no columns
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Const(_) => true,
            Expr::Field { .. } => false,
            Expr::Negate(child) => child.is_constant(),
            Expr::Arithmetic { operands, .. } => operands.iter().all(|e| e.is_constant()),
            Expr::Concat(operands) => operands.iter().all(|e| e.is_constant()),
            Expr::Compare { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::Logical { operands, .. } => operands.iter().all(|e| e.is_constant()),
            Expr::Convert { child, .. } => child.is_constant(),
        }
    }
}

/// A compiled, immutable filter predicate.
///
/// Created once per successful `compile` call; evaluated zero or more times.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterTree {
    root: Expr,
}

impl FilterTree {
    pub(crate) fn new(root: Expr) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// The static type the predicate evaluates to
    pub fn result_type(&self) -> DataType {
        self.root.result_type()
    }

    /// Evaluate the predicate against one row
    pub fn evaluate(&self, row: &Row) -> EvalResult<Value> {
        evaluate(&self.root, row)
    }
}
