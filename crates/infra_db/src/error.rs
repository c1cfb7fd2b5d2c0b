//! Database error types
//!
//! Every repository operation reports failures through [`DatabaseError`],
//! so callers handle one error type regardless of which entity they work with.

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A lookup named a field the entity does not have
    #[error("Invalid field '{field}' for {entity}")]
    InvalidField { entity: String, field: String },

    /// A lookup value cannot be compared with the field's column type
    #[error("Invalid value for field '{field}': {message}")]
    InvalidFieldValue { field: String, message: String },

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored row could not be turned back into an entity
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("InfraResult", "IR-123");
    /// assert!(error.to_string().contains("InfraResult"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a duplicate entry error
    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!(
            "{} with {} '{}' already exists",
            entity, field, value
        ))
    }

    pub fn invalid_field(entity: &str, field: &str) -> Self {
        DatabaseError::InvalidField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_field_value(field: &str, message: impl Into<String>) -> Self {
        DatabaseError::InvalidFieldValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }

    /// Checks if the caller passed a bad field name or value
    pub fn is_invalid_lookup(&self) -> bool {
        matches!(
            self,
            DatabaseError::InvalidField { .. } | DatabaseError::InvalidFieldValue { .. }
        )
    }
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Database errors are classified by their PostgreSQL SQLSTATE code.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => {
                DatabaseError::NotFound("Record not found".to_string())
            }
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23503") => {
                        DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                    }
                    Some("23514") => {
                        DatabaseError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

impl From<config::ConfigError> for DatabaseError {
    fn from(error: config::ConfigError) -> Self {
        DatabaseError::Configuration(error.to_string())
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = DatabaseError::from(&sqlx::Error::RowNotFound);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, DatabaseError::PoolExhausted));
        assert!(error.is_connection_error());
    }

    #[test]
    fn test_question_mark_classifies_sqlx_errors() {
        fn fetch() -> Result<(), DatabaseError> {
            Err::<(), _>(sqlx::Error::RowNotFound)?;
            Ok(())
        }

        assert!(fetch().unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_field_message() {
        let error = DatabaseError::invalid_field("InfraResult", "colour");
        assert_eq!(error.to_string(), "Invalid field 'colour' for InfraResult");
        assert!(error.is_invalid_lookup());
        assert!(!error.is_constraint_violation());
    }

    #[test]
    fn test_duplicate_is_constraint_violation() {
        let error = DatabaseError::duplicate("InfraResult", "id", "IR-1");
        assert!(error.is_constraint_violation());
        assert!(error.to_string().contains("already exists"));
    }
}
