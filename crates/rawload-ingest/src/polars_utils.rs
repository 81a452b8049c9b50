//! Polars `AnyValue` helpers used when rendering cells back to text.

use polars::prelude::{AnyValue, Column};

/// Renders a cell as text, `None` for null.
pub fn any_to_string(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(v.to_string()),
        AnyValue::Int16(v) => Some(v.to_string()),
        AnyValue::Int32(v) => Some(v.to_string()),
        AnyValue::Int64(v) => Some(v.to_string()),
        AnyValue::UInt8(v) => Some(v.to_string()),
        AnyValue::UInt16(v) => Some(v.to_string()),
        AnyValue::UInt32(v) => Some(v.to_string()),
        AnyValue::UInt64(v) => Some(v.to_string()),
        AnyValue::Float32(v) => Some(format_float(f64::from(v))),
        AnyValue::Float64(v) => Some(format_float(v)),
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Boolean(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Renders the cell at `idx`, `None` for null or out-of-range.
pub fn cell_string(column: &Column, idx: usize) -> Option<String> {
    column.get(idx).ok().and_then(any_to_string)
}

/// Formats a float so whole values keep a decimal point (`2.0`, not `2`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_their_kind_when_rendered() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(-0.25), "-0.25");
    }

    #[test]
    fn null_renders_as_none() {
        assert_eq!(any_to_string(AnyValue::Null), None);
        assert_eq!(any_to_string(AnyValue::Int64(7)), Some("7".to_string()));
        assert_eq!(
            any_to_string(AnyValue::String("x")),
            Some("x".to_string())
        );
    }
}
