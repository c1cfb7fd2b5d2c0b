//! Column metadata and lookup values
//!
//! Field lookups accept a column name and a loosely typed value. The name is
//! checked against the entity's declared columns, and the value is coerced
//! to the column's kind before it is bound as a query parameter.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::InfraResultId;
use domain_infra::{InfraCombination, InfraStatus};

use crate::error::DatabaseError;

/// SQL type family of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Text,
    Timestamp,
    Integer,
    Boolean,
}

/// A queryable column of an entity table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// A value to write to, or match against, a column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Integer(i64),
    Boolean(bool),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Converts the value to the representation `column` expects
    ///
    /// Text is parsed into a UUID or an RFC 3339 timestamp when the column
    /// needs one. `Null` is accepted for every column.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidFieldValue` if the value cannot be
    /// represented in the column's type
    pub fn coerce(self, column: &Column) -> Result<FieldValue, DatabaseError> {
        match (column.kind, self) {
            (_, FieldValue::Null) => Ok(FieldValue::Null),
            (ColumnKind::Uuid, value @ FieldValue::Uuid(_)) => Ok(value),
            (ColumnKind::Uuid, FieldValue::Text(text)) => Uuid::parse_str(text.trim())
                .map(FieldValue::Uuid)
                .map_err(|e| DatabaseError::invalid_field_value(column.name, e.to_string())),
            (ColumnKind::Text, value @ FieldValue::Text(_)) => Ok(value),
            (ColumnKind::Timestamp, value @ FieldValue::Timestamp(_)) => Ok(value),
            (ColumnKind::Timestamp, FieldValue::Text(text)) => {
                DateTime::parse_from_rfc3339(text.trim())
                    .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc)))
                    .map_err(|e| DatabaseError::invalid_field_value(column.name, e.to_string()))
            }
            (ColumnKind::Integer, value @ FieldValue::Integer(_)) => Ok(value),
            (ColumnKind::Boolean, value @ FieldValue::Boolean(_)) => Ok(value),
            (kind, value) => Err(DatabaseError::invalid_field_value(
                column.name,
                format!("cannot compare {} with a {:?} column", value.type_name(), kind),
            )),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Uuid(_) => "uuid",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Integer(_) => "integer",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Null => "null",
        }
    }

    /// Appends the value to the query as a bound parameter
    pub(crate) fn push_bind(self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            FieldValue::Text(v) => builder.push_bind(v),
            FieldValue::Uuid(v) => builder.push_bind(v),
            FieldValue::Timestamp(v) => builder.push_bind(v),
            FieldValue::Integer(v) => builder.push_bind(v),
            FieldValue::Boolean(v) => builder.push_bind(v),
            FieldValue::Null => builder.push("NULL"),
        };
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<InfraResultId> for FieldValue {
    fn from(value: InfraResultId) -> Self {
        FieldValue::Uuid(value.into())
    }
}

impl From<InfraStatus> for FieldValue {
    fn from(value: InfraStatus) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

impl From<&InfraCombination> for FieldValue {
    fn from(value: &InfraCombination) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

impl From<InfraCombination> for FieldValue {
    fn from(value: InfraCombination) -> Self {
        FieldValue::Text(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ID: Column = Column::new("id", ColumnKind::Uuid);
    const STATUS: Column = Column::new("status", ColumnKind::Text);
    const CREATED: Column = Column::new("created_timestamp", ColumnKind::Timestamp);

    #[test]
    fn test_text_coerces_to_uuid() {
        let uuid = Uuid::new_v4();
        let value = FieldValue::from(uuid.to_string()).coerce(&ID).unwrap();
        assert_eq!(value, FieldValue::Uuid(uuid));
    }

    #[test]
    fn test_bad_uuid_text_is_rejected() {
        let error = FieldValue::from("IR-42").coerce(&ID).unwrap_err();
        assert!(matches!(error, DatabaseError::InvalidFieldValue { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_text_coerces_to_timestamp() {
        let value = FieldValue::from("2017-10-20T10:15:00+05:30").coerce(&CREATED).unwrap();
        let expected = Utc.with_ymd_and_hms(2017, 10, 20, 4, 45, 0).unwrap();
        assert_eq!(value, FieldValue::Timestamp(expected));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let error = FieldValue::from(true).coerce(&STATUS).unwrap_err();
        assert!(error.to_string().contains("cannot compare boolean"));
    }

    #[test]
    fn test_null_is_accepted_everywhere() {
        for column in [ID, STATUS, CREATED] {
            assert!(FieldValue::Null.coerce(&column).unwrap().is_null());
        }
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<String>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(7i64)), FieldValue::Integer(7));
    }

    #[test]
    fn test_status_uses_stored_form() {
        assert_eq!(
            FieldValue::from(InfraStatus::InfrastructureSuccess),
            FieldValue::Text("INFRASTRUCTURE_SUCCESS".to_string())
        );
    }
}
