//! Schema metadata for filtered row collections.

use crate::rows::value::DataType;

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of columns, addressable by name (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolve a column name to its position and declared type
    pub fn resolve(&self, name: &str) -> Option<(usize, DataType)> {
        self.columns
            .iter()
            .position(|col| col.name.eq_ignore_ascii_case(name))
            .map(|index| (index, self.columns[index].data_type))
    }
}
