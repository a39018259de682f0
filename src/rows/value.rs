use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// Declared value types a column or expression can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Number,
    String,
    Date,
    Boolean,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Number => write!(f, "NUMBER"),
            DataType::String => write!(f, "STRING"),
            DataType::Date => write!(f, "DATE"),
            DataType::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

/// Values that can appear in a row or literal
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDateTime),
}

impl Value {
    /// Get the declared type of this value (NULL has none)
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Integer(_) | Value::Real(_) => Some(DataType::Number),
            Value::String(_) => Some(DataType::String),
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Date(_) => Some(DataType::Date),
        }
    }

    /// Check if this value is compatible with the given declared type
    pub fn is_compatible_with(&self, data_type: DataType) -> bool {
        match self.data_type() {
            None => true, // NULL is compatible with any type
            Some(t) => t == data_type,
        }
    }

    /// Natural ordering for values of the same declared type.
    ///
    /// Numbers compare by magnitude (promoting to f64 when either side is
    /// real), strings lexicographically, dates by millisecond epoch.
    /// Returns None for NULL operands or mismatched kinds.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).partial_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(
                a.and_utc()
                    .timestamp_millis()
                    .cmp(&b.and_utc().timestamp_millis()),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_data_types() {
        assert_eq!(Value::Integer(1).data_type(), Some(DataType::Number));
        assert_eq!(Value::Real(1.5).data_type(), Some(DataType::Number));
        assert_eq!(
            Value::String("x".to_string()).data_type(),
            Some(DataType::String)
        );
        assert_eq!(Value::Boolean(true).data_type(), Some(DataType::Boolean));
        assert_eq!(Value::Date(date(2024, 1, 1)).data_type(), Some(DataType::Date));
        assert_eq!(Value::Null.data_type(), None);
    }

    #[test]
    fn test_compatibility() {
        assert!(Value::Integer(1).is_compatible_with(DataType::Number));
        assert!(Value::Real(1.0).is_compatible_with(DataType::Number));
        assert!(!Value::Integer(1).is_compatible_with(DataType::String));
        assert!(Value::Null.is_compatible_with(DataType::Date));
    }

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(
            Value::Integer(1).compare(&Value::Integer(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Integer(2).compare(&Value::Real(2.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::Real(2.5).compare(&Value::Integer(2)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_string_and_date_comparison() {
        assert_eq!(
            Value::String("abc".to_string()).compare(&Value::String("abd".to_string())),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Date(date(2024, 1, 1)).compare(&Value::Date(date(2024, 6, 1))),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Date(date(2024, 1, 1)).compare(&Value::Date(date(2024, 1, 1))),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_mismatched_comparison() {
        assert_eq!(
            Value::Integer(1).compare(&Value::String("1".to_string())),
            None
        );
        assert_eq!(Value::Null.compare(&Value::Integer(1)), None);
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Number.to_string(), "NUMBER");
        assert_eq!(DataType::String.to_string(), "STRING");
        assert_eq!(DataType::Date.to_string(), "DATE");
        assert_eq!(DataType::Boolean.to_string(), "BOOLEAN");
    }
}
