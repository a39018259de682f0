//! Filter driver.
//!
//! Drives a single forward pass over a row source, retaining the rows whose
//! predicate evaluates true. Order is preserved and the output is a new
//! random-access collection sharing the source's schema.

use crate::expression::FilterTree;
use crate::rows::{DataType, RowSet, RowSource, Value};
use anyhow::{bail, Result};
use log::{debug, trace};

/// Filter a row source through a compiled predicate.
///
/// The predicate is checked to be Boolean-typed before any row is read, so a
/// malformed or mistyped expression can never yield partial output. The
/// source is consumed exactly once, forward only; whatever resource backs it
/// is released when it drops, on success and on error alike.
pub fn filter<S: RowSource>(tree: &FilterTree, source: &mut S) -> Result<RowSet> {
    if tree.result_type() != DataType::Boolean {
        bail!(
            "filter predicate must be BOOLEAN, got {}",
            tree.result_type()
        );
    }

    source.open()?;

    let mut kept = Vec::new();
    let mut seen = 0usize;
    while let Some(row) = source.next()? {
        seen += 1;
        match tree.evaluate(&row)? {
            Value::Boolean(true) => {
                trace!("row {} matched", seen);
                kept.push(row);
            }
            Value::Boolean(false) => {}
            other => bail!("filter predicate evaluated to non-boolean {:?}", other),
        }
    }

    debug!("filter pass kept {} of {} rows", kept.len(), seen);
    Ok(RowSet::new(source.schema().clone(), kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::compile;
    use crate::rows::{Column, Row, Schema, VecRowSource};

    fn people() -> (Schema, Vec<Row>) {
        let schema = Schema::new(vec![
            Column::new("ID", DataType::Number),
            Column::new("NAME", DataType::String),
        ]);
        let rows = vec![
            Row::new(vec![Value::Integer(1), Value::String("Al".to_string())]),
            Row::new(vec![Value::Integer(2), Value::String("Bob".to_string())]),
            Row::new(vec![Value::Integer(3), Value::String("Cid".to_string())]),
        ];
        (schema, rows)
    }

    #[test]
    fn test_filter_basic() {
        let (schema, rows) = people();
        let tree = compile("ID > 1 AND NAME LIKE 'B%'", &schema).unwrap();
        let mut source = VecRowSource::new(schema, rows);

        let result = filter(&tree, &mut source).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(0).unwrap().values(),
            &[Value::Integer(2), Value::String("Bob".to_string())]
        );
    }

    #[test]
    fn test_filter_preserves_order() {
        let (schema, rows) = people();
        let tree = compile("ID <> 2", &schema).unwrap();
        let mut source = VecRowSource::new(schema, rows);

        let result = filter(&tree, &mut source).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(0).unwrap().get(0), Some(&Value::Integer(1)));
        assert_eq!(result.get(1).unwrap().get(0), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_filter_none_match() {
        let (schema, rows) = people();
        let tree = compile("ID > 100", &schema).unwrap();
        let mut source = VecRowSource::new(schema, rows);

        let result = filter(&tree, &mut source).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_rejects_non_boolean_predicate() {
        let (schema, rows) = people();
        let tree = compile("ID + 1", &schema).unwrap();
        let mut source = VecRowSource::new(schema, rows);

        let result = filter(&tree, &mut source);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("BOOLEAN"));
    }

    #[test]
    fn test_filter_is_deterministic() {
        let (schema, rows) = people();
        let tree = compile("ID >= 2", &schema).unwrap();

        let mut first = VecRowSource::new(schema.clone(), rows.clone());
        let mut second = VecRowSource::new(schema, rows);
        let a = filter(&tree, &mut first).unwrap();
        let b = filter(&tree, &mut second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_refilters_row_set() {
        let (schema, rows) = people();
        let tree = compile("ID > 1", &schema).unwrap();
        let mut source = VecRowSource::new(schema.clone(), rows);
        let intermediate = filter(&tree, &mut source).unwrap();

        let narrower = compile("NAME LIKE 'C%'", &schema).unwrap();
        let mut again = VecRowSource::from_row_set(&intermediate);
        let result = filter(&narrower, &mut again).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(0).unwrap().get(1),
            Some(&Value::String("Cid".to_string()))
        );
    }

    #[test]
    fn test_runtime_fault_aborts_pass() {
        let schema = Schema::new(vec![Column::new("N", DataType::Number)]);
        let rows = vec![
            Row::new(vec![Value::Integer(1)]),
            Row::new(vec![Value::Integer(0)]),
        ];
        let tree = compile("10 / N = 10", &schema).unwrap();
        let mut source = VecRowSource::new(schema, rows);

        assert!(filter(&tree, &mut source).is_err());
    }
}
