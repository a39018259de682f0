//! Row snapshots, row collections, and the forward-only row cursor.

use crate::rows::schema::Schema;
use crate::rows::value::Value;
use anyhow::{bail, Result};

/// One row's values, aligned 1:1 with a schema. A row is a snapshot: once
/// produced it does not change.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Random-access, order-preserving collection of rows sharing one schema
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    schema: Schema,
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Forward-only, single-pass cursor over a row sequence.
///
/// The filter driver opens the source before its pass and drains it exactly
/// once; release of any underlying resource happens on drop, so it runs on
/// error paths too.
pub trait RowSource {
    /// Acquire the cursor. Must be called before `next()`.
    fn open(&mut self) -> Result<()>;

    /// Produce the next row, or None once the sequence is exhausted.
    fn next(&mut self) -> Result<Option<Row>>;

    /// The schema the produced rows are aligned to.
    fn schema(&self) -> &Schema;
}

/// Row source backed by an in-memory vector of rows
pub struct VecRowSource {
    schema: Schema,
    rows: Vec<Row>,
    position: usize,
    opened: bool,
}

impl VecRowSource {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows,
            position: 0,
            opened: false,
        }
    }

    /// Re-filter an existing row set
    pub fn from_row_set(set: &RowSet) -> Self {
        Self::new(set.schema().clone(), set.rows().to_vec())
    }
}

impl RowSource for VecRowSource {
    fn open(&mut self) -> Result<()> {
        self.opened = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Row>> {
        if !self.opened {
            bail!("Row source not opened. Call open() first.");
        }
        if self.position >= self.rows.len() {
            return Ok(None);
        }
        let row = self.rows[self.position].clone();
        self.position += 1;
        Ok(Some(row))
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
