//! Field-map serialization for persisted entities.
//!
//! Entities are stored as flat rows of named columns. [`Record`] converts an
//! entity to and from such a row and applies partial patches to it.

use serde_json::Value;

use crate::error::ValidationError;

/// A flat row of named column values.
pub type Fields = serde_json::Map<String, Value>;

/// Capability of an entity that can be persisted as a [`Fields`] row.
pub trait Record: Sized {
    /// Name of the column holding the store-assigned id.
    const ID_FIELD: &'static str = "id";

    /// Every column of the entity, including its id.
    fn to_fields(&self) -> Fields;

    /// Rebuilds an entity from a full row.
    fn from_fields(fields: &Fields) -> Result<Self, ValidationError>;

    /// Overwrites the columns present in `patch` and keeps the rest.
    ///
    /// The id column is never patched. On error the entity is left unchanged.
    fn apply_patch(&mut self, patch: &Fields) -> Result<(), ValidationError>;
}

pub(crate) fn expect_str<'a>(
    field: &'static str,
    value: &'a Value,
) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "a string",
    })
}

pub(crate) fn expect_u64(field: &'static str, value: &Value) -> Result<u64, ValidationError> {
    value.as_u64().ok_or(ValidationError::WrongType {
        field,
        expected: "a non-negative integer",
    })
}

pub(crate) fn expect_f64(field: &'static str, value: &Value) -> Result<f64, ValidationError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::WrongType {
            field,
            expected: "a number",
        })
}

/// Accepts `true`/`false` as well as the integer flags `0`/`1`.
pub(crate) fn expect_flag(field: &'static str, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ValidationError::OutOfRange {
                field,
                reason: format!("flag must be 0 or 1, got {n}"),
            }),
        },
        _ => Err(ValidationError::WrongType {
            field,
            expected: "a boolean or 0/1",
        }),
    }
}

/// Reads an optional foreign key: `null` or `-1` mean none.
pub(crate) fn expect_link(
    field: &'static str,
    value: &Value,
) -> Result<Option<i64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_i64() {
            Some(-1) => Ok(None),
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(ValidationError::OutOfRange {
                field,
                reason: format!("expected a positive id or -1, got {n}"),
            }),
        },
        _ => Err(ValidationError::WrongType {
            field,
            expected: "an integer id or -1",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flags_accept_bool_and_int() {
        assert_eq!(expect_flag("f", &json!(true)), Ok(true));
        assert_eq!(expect_flag("f", &json!(0)), Ok(false));
        assert_eq!(expect_flag("f", &json!(1)), Ok(true));
        assert!(matches!(
            expect_flag("f", &json!(2)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            expect_flag("f", &json!("yes")),
            Err(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn links_use_minus_one_sentinel() {
        assert_eq!(expect_link("l", &json!(-1)), Ok(None));
        assert_eq!(expect_link("l", &Value::Null), Ok(None));
        assert_eq!(expect_link("l", &json!(7)), Ok(Some(7)));
        assert!(expect_link("l", &json!(0)).is_err());
        assert!(expect_link("l", &json!(-5)).is_err());
        assert!(expect_link("l", &json!("7")).is_err());
    }

    #[test]
    fn numbers_must_be_finite() {
        assert_eq!(expect_f64("n", &json!(1.5)), Ok(1.5));
        assert_eq!(expect_f64("n", &json!(3)), Ok(3.0));
        assert!(expect_f64("n", &json!("1.5")).is_err());
        assert!(expect_u64("n", &json!(-1)).is_err());
    }
}
