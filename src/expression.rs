//! Typed expression trees and their evaluation.
//!
//! This module provides:
//! - The closed set of expression tree node shapes
//! - Operator kinds with display strings
//! - Tree-walking evaluation against row snapshots

pub mod eval;
pub mod expr;
pub mod operator;

pub use eval::{evaluate, EvalError, EvalResult};
pub use expr::{Expr, FilterTree};
pub use operator::{ArithOp, CompareOp, LogicalOp};
