//! rowfilter CLI - filter delimited text rows with a WHERE-like predicate

use anyhow::{bail, Context, Result};
use clap::Parser;
use rowfilter::{
    compile, convert, filter, Column, DataType, Row, Schema, Value, VecRowSource,
};
use std::path::PathBuf;

/// Filter rows from a '|'-delimited file against a boolean predicate
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema declaration, e.g. "ID:NUMBER,NAME:STRING"
    #[arg(short, long)]
    schema: String,

    /// Predicate expression, e.g. "ID > 1 AND NAME LIKE 'B%'"
    #[arg(short, long)]
    expr: String,

    /// Input file of '|'-delimited rows, one per line
    input: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let schema = parse_schema(&args.schema)?;
    let tree = compile(&args.expr, &schema)
        .with_context(|| format!("failed to compile predicate {:?}", args.expr))?;

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let rows = parse_rows(&text, &schema)?;

    let mut source = VecRowSource::new(schema, rows);
    let result = filter(&tree, &mut source)?;

    for row in result.rows() {
        let line: Vec<String> = row.values().iter().map(convert::stringify).collect();
        println!("{}", line.join("|"));
    }

    Ok(())
}

/// Parse "NAME:TYPE,NAME:TYPE" into a schema
fn parse_schema(spec: &str) -> Result<Schema> {
    let mut columns = Vec::new();
    for part in spec.split(',') {
        let (name, type_name) = part
            .split_once(':')
            .with_context(|| format!("column {:?} must be NAME:TYPE", part))?;
        let data_type = match type_name.trim().to_uppercase().as_str() {
            "NUMBER" => DataType::Number,
            "STRING" => DataType::String,
            "DATE" => DataType::Date,
            "BOOLEAN" => DataType::Boolean,
            other => bail!("unknown column type {:?}", other),
        };
        columns.push(Column::new(name.trim().to_uppercase(), data_type));
    }
    Ok(Schema::new(columns))
}

fn parse_rows(text: &str, schema: &Schema) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('|').collect();
        if cells.len() != schema.len() {
            bail!(
                "line {}: expected {} cells, got {}",
                line_no + 1,
                schema.len(),
                cells.len()
            );
        }
        let values = cells
            .iter()
            .zip(schema.columns())
            .map(|(cell, column)| parse_cell(cell, column.data_type))
            .collect::<Result<Vec<Value>>>()
            .with_context(|| format!("line {}", line_no + 1))?;
        rows.push(Row::new(values));
    }
    Ok(rows)
}

fn parse_cell(text: &str, data_type: DataType) -> Result<Value> {
    let text = text.trim();
    match data_type {
        DataType::String => Ok(Value::String(text.to_string())),
        DataType::Number | DataType::Date => {
            convert::coerce(data_type, Value::String(text.to_string()))
                .with_context(|| format!("bad {} cell {:?}", data_type, text))
        }
        DataType::Boolean => match text.to_lowercase().as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            other => bail!("bad BOOLEAN cell {:?}", other),
        },
    }
}
