//! Infrastructure result repository implementation
//!
//! This module maps the `infra_result` table to [`InfraResult`] and provides
//! the repository used to store the outcome of provisioning each
//! infrastructure combination.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{AuditTimestamps, InfraResultId};
use domain_infra::{InfraCombination, InfraResult, InfraStatus};

use crate::error::DatabaseError;
use crate::field::{Column, ColumnKind, FieldValue};
use crate::repository::{Entity, Repository};

/// Database row for an infrastructure result
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfraResultRow {
    pub id: Uuid,
    pub status: String,
    pub infra_combination: String,
    pub created_timestamp: DateTime<Utc>,
    pub modified_timestamp: DateTime<Utc>,
}

impl TryFrom<InfraResultRow> for InfraResult {
    type Error = DatabaseError;

    fn try_from(row: InfraResultRow) -> Result<Self, Self::Error> {
        let status: InfraStatus = row
            .status
            .parse()
            .map_err(|e| DatabaseError::SerializationError(format!("infra_result {}: {}", row.id, e)))?;
        let combination = InfraCombination::new(&row.infra_combination)
            .map_err(|e| DatabaseError::SerializationError(format!("infra_result {}: {}", row.id, e)))?;

        Ok(InfraResult::restore(
            InfraResultId::from(row.id),
            status,
            combination,
            AuditTimestamps::new(row.created_timestamp, row.modified_timestamp),
        ))
    }
}

impl Entity for InfraResult {
    type Id = InfraResultId;
    type Row = InfraResultRow;

    const NAME: &'static str = "InfraResult";
    const TABLE: &'static str = InfraResult::TABLE;
    const PRIMARY_KEY: &'static str = InfraResult::ID_COLUMN;
    const DEFAULT_ORDER: &'static str = "created_timestamp, id";
    const COLUMNS: &'static [Column] = &[
        Column::new(InfraResult::ID_COLUMN, ColumnKind::Uuid),
        Column::new(InfraResult::STATUS_COLUMN, ColumnKind::Text),
        Column::new(InfraResult::INFRA_COMBINATION_COLUMN, ColumnKind::Text),
        Column::new(InfraResult::CREATED_TIMESTAMP_COLUMN, ColumnKind::Timestamp),
        Column::new(InfraResult::MODIFIED_TIMESTAMP_COLUMN, ColumnKind::Timestamp),
    ];

    fn id(&self) -> InfraResultId {
        InfraResult::id(self)
    }

    fn writable_values(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            (InfraResult::ID_COLUMN, self.id().into()),
            (InfraResult::STATUS_COLUMN, self.status().into()),
            (InfraResult::INFRA_COMBINATION_COLUMN, self.infra_combination().into()),
        ]
    }

    fn from_row(row: InfraResultRow) -> Result<Self, DatabaseError> {
        row.try_into()
    }

    /// Status text is matched in any case and must name a known status
    fn lookup_value(column: &'static Column, value: FieldValue) -> Result<FieldValue, DatabaseError> {
        match value.coerce(column)? {
            FieldValue::Text(text) if column.name == InfraResult::STATUS_COLUMN => text
                .parse::<InfraStatus>()
                .map(FieldValue::from)
                .map_err(|e| DatabaseError::invalid_field_value(column.name, e.to_string())),
            value => Ok(value),
        }
    }
}

/// Repository for the `infra_result` table
///
/// Every operation delegates to the generic [`Repository`], bound to
/// [`InfraResult`].
#[derive(Debug, Clone)]
pub struct InfraResultRepository {
    inner: Repository<InfraResult>,
}

impl InfraResultRepository {
    /// Creates a new InfraResultRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Repository::new(pool),
        }
    }

    /// Persists an infrastructure result, inserting it or merging it onto
    /// the stored row with the same id
    ///
    /// # Returns
    ///
    /// The stored result, with its database-assigned timestamps
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the row cannot be written
    pub async fn persist(&self, entity: &InfraResult) -> Result<InfraResult, DatabaseError> {
        self.inner.persist(entity).await
    }

    /// Removes an infrastructure result from the database
    pub async fn delete(&self, entity: &InfraResult) -> Result<(), DatabaseError> {
        self.inner.delete(entity).await
    }

    /// Finds the infrastructure result with the given primary key
    pub async fn find_by_primary_key(
        &self,
        id: InfraResultId,
    ) -> Result<Option<InfraResult>, DatabaseError> {
        self.inner.find_by_primary_key(id).await
    }

    /// Finds infrastructure results by a column name and value
    ///
    /// # Arguments
    ///
    /// * `field` - Column to match, e.g. [`InfraResult::STATUS_COLUMN`]
    /// * `value` - Value the column must equal. Status text is accepted in
    ///   any case, e.g. `"infrastructure_success"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidField` for an unknown column and
    /// `DatabaseError::InvalidFieldValue` for a value the column cannot hold,
    /// including status text that names no known status
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let failed = repo
    ///     .find_by_field(InfraResult::STATUS_COLUMN, InfraStatus::InfrastructurePreparationError)
    ///     .await?;
    /// ```
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<InfraResult>, DatabaseError> {
        self.inner.find_by_field(field, value).await
    }

    /// Finds infrastructure results matching all given column/value pairs
    pub async fn find_by_fields(
        &self,
        criteria: Vec<(&str, FieldValue)>,
    ) -> Result<Vec<InfraResult>, DatabaseError> {
        self.inner.find_by_fields(criteria).await
    }

    /// Returns all entries of the `infra_result` table
    pub async fn find_all(&self) -> Result<Vec<InfraResult>, DatabaseError> {
        self.inner.find_all().await
    }

    pub async fn find_by_status(&self, status: InfraStatus) -> Result<Vec<InfraResult>, DatabaseError> {
        self.inner.find_by_field(InfraResult::STATUS_COLUMN, status).await
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        self.inner.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(status: &str, combination: &str) -> InfraResultRow {
        let ts = Utc.with_ymd_and_hms(2017, 10, 20, 12, 0, 0).unwrap();
        InfraResultRow {
            id: Uuid::new_v4(),
            status: status.to_string(),
            infra_combination: combination.to_string(),
            created_timestamp: ts,
            modified_timestamp: ts,
        }
    }

    #[test]
    fn test_row_to_entity() {
        let row = row("INFRASTRUCTURE_SUCCESS", "Ubuntu-16.04_MySQL-5.7");
        let id = row.id;

        let result = InfraResult::from_row(row).unwrap();

        assert_eq!(*result.id().as_uuid(), id);
        assert_eq!(result.status(), InfraStatus::InfrastructureSuccess);
        assert_eq!(result.infra_combination().as_str(), "Ubuntu-16.04_MySQL-5.7");
        assert!(result.is_persisted());
    }

    #[test]
    fn test_unknown_stored_status() {
        let error = InfraResult::from_row(row("PENDING", "Ubuntu-16.04")).unwrap_err();
        assert!(matches!(error, DatabaseError::SerializationError(ref msg) if msg.contains("PENDING")));
    }

    #[test]
    fn test_blank_stored_combination() {
        let error = InfraResult::from_row(row("INFRASTRUCTURE_SUCCESS", " ")).unwrap_err();
        assert!(matches!(error, DatabaseError::SerializationError(_)));
    }

    #[test]
    fn test_writable_values_skip_timestamps() {
        let result = InfraResult::new(
            InfraStatus::InfrastructureDestroyError,
            InfraCombination::new("Windows-2016_MSSQL-2017").unwrap(),
        );

        let values = result.writable_values();
        let names: Vec<&str> = values.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, vec!["id", "status", "infra_combination"]);
        assert_eq!(values[1].1, FieldValue::Text("INFRASTRUCTURE_DESTROY_ERROR".to_string()));
    }

    #[test]
    fn test_every_writable_column_is_declared() {
        let result = InfraResult::new(
            InfraStatus::InfrastructureSuccess,
            InfraCombination::new("Ubuntu-18.04").unwrap(),
        );
        for (name, _) in result.writable_values() {
            assert!(<InfraResult as Entity>::column(name).is_ok(), "{} not declared", name);
        }
    }

    #[test]
    fn test_status_lookup_ignores_case() {
        let column = <InfraResult as Entity>::column(InfraResult::STATUS_COLUMN).unwrap();
        let value = InfraResult::lookup_value(column, " infrastructure_success ".into()).unwrap();
        assert_eq!(value, FieldValue::Text("INFRASTRUCTURE_SUCCESS".to_string()));
    }

    #[test]
    fn test_unknown_status_lookup_is_rejected() {
        let column = <InfraResult as Entity>::column(InfraResult::STATUS_COLUMN).unwrap();
        let error = InfraResult::lookup_value(column, "PENDING".into()).unwrap_err();
        assert!(matches!(error, DatabaseError::InvalidFieldValue { ref field, .. } if field == "status"));
    }

    #[test]
    fn test_combination_lookup_is_left_as_is() {
        let column = <InfraResult as Entity>::column(InfraResult::INFRA_COMBINATION_COLUMN).unwrap();
        let value = InfraResult::lookup_value(column, "ubuntu-18.04".into()).unwrap();
        assert_eq!(value, FieldValue::Text("ubuntu-18.04".to_string()));
    }

    #[test]
    fn test_unknown_lookup_field() {
        let error = <InfraResult as Entity>::column("infraCombination").unwrap_err();
        assert_eq!(error.to_string(), "Invalid field 'infraCombination' for InfraResult");
    }
}
