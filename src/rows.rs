//! Row data model: typed values, schemas, row snapshots, and row cursors.

pub mod row;
pub mod schema;
pub mod value;

pub use row::{Row, RowSet, RowSource, VecRowSource};
pub use schema::{Column, Schema};
pub use value::{DataType, Value};
