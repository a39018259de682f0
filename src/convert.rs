//! Value conversion service backing TO_CHAR, TO_NUMBER, and TO_DATE, plus
//! the stringification used by `||` and `LIKE`.

use crate::expression::eval::{EvalError, EvalResult};
use crate::rows::{DataType, Value};
use chrono::{NaiveDate, NaiveDateTime};

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render any value as its character form. Null renders empty.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(n) => n.to_string(),
        Value::Real(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Date(d) => d.format(DATE_TIME_FORMAT).to_string(),
    }
}

/// Coerce a value to the requested target kind
pub fn coerce(target: DataType, value: Value) -> EvalResult<Value> {
    match target {
        DataType::String => Ok(Value::String(stringify(&value))),
        DataType::Number => to_number(value),
        DataType::Date => to_date(value),
        DataType::Boolean => Err(EvalError::Internal(
            "no conversion function targets BOOLEAN".to_string(),
        )),
    }
}

fn to_number(value: Value) -> EvalResult<Value> {
    match value {
        Value::Integer(_) | Value::Real(_) => Ok(value),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i64>() {
                Ok(Value::Integer(n))
            } else if let Ok(f) = text.parse::<f64>() {
                Ok(Value::Real(f))
            } else {
                Err(EvalError::ConversionFailed {
                    value: s,
                    target: DataType::Number,
                })
            }
        }
        other => Err(EvalError::ConversionFailed {
            value: stringify(&other),
            target: DataType::Number,
        }),
    }
}

fn to_date(value: Value) -> EvalResult<Value> {
    match value {
        Value::Date(_) => Ok(value),
        Value::String(s) => parse_date(s.trim())
            .map(Value::Date)
            .ok_or(EvalError::ConversionFailed {
                value: s,
                target: DataType::Date,
            }),
        other => Err(EvalError::ConversionFailed {
            value: stringify(&other),
            target: DataType::Date,
        }),
    }
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
