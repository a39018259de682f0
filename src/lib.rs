pub mod convert;
pub mod expression;
pub mod filter;
pub mod like;
pub mod predicate;
pub mod rows;

pub use expression::{EvalError, FilterTree};
pub use filter::filter;
pub use predicate::{compile, SyntaxError};
pub use rows::{Column, DataType, Row, RowSet, RowSource, Schema, Value, VecRowSource};
