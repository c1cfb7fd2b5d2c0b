//! Generic entity repository
//!
//! [`Repository`] implements the CRUD operations every TestGrid entity shares:
//! merge-style persist, delete, lookup by primary key, lookup by one or more
//! field/value pairs, and full table scans. A type opts in by implementing
//! [`Entity`], which describes its table and how rows map back to it.
//! Entity-specific repositories wrap a `Repository<E>` and delegate to it.
//!
//! # SQL
//!
//! Table and column names come only from the `Entity` implementation. Field
//! names supplied at runtime are matched against [`Entity::COLUMNS`] and
//! rejected if unknown; every value is sent as a bound parameter.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, instrument};

use crate::error::DatabaseError;
use crate::field::{Column, FieldValue};

/// A type persisted in its own table
pub trait Entity: Sized + Send + Sync + Unpin + 'static {
    /// Primary key type
    type Id: Copy + Into<FieldValue> + fmt::Display + Send + Sync;

    /// Raw row as selected from the table
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    /// Entity name used in errors and logs
    const NAME: &'static str;
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    /// `ORDER BY` expression for multi-row reads
    const DEFAULT_ORDER: &'static str;
    /// Every column that may be used in a field lookup, including
    /// database-managed ones
    const COLUMNS: &'static [Column];

    fn id(&self) -> Self::Id;

    /// Column/value pairs the application writes, primary key included.
    /// Database-managed columns (defaults, trigger-maintained) are omitted.
    fn writable_values(&self) -> Vec<(&'static str, FieldValue)>;

    fn from_row(row: Self::Row) -> Result<Self, DatabaseError>;

    /// Looks up a declared column by name
    fn column(name: &str) -> Result<&'static Column, DatabaseError> {
        Self::COLUMNS
            .iter()
            .find(|column| column.name == name)
            .ok_or_else(|| DatabaseError::invalid_field(Self::NAME, name))
    }

    /// Converts a lookup value to the form stored in `column`
    ///
    /// Entities override this to canonicalize columns with a closed set of
    /// stored values.
    fn lookup_value(column: &'static Column, value: FieldValue) -> Result<FieldValue, DatabaseError> {
        value.coerce(column)
    }
}

/// Generic CRUD repository over a PostgreSQL pool
pub struct Repository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for Repository<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &E::NAME)
            .field("table", &E::TABLE)
            .finish()
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Saves the entity, inserting it or merging it onto the existing row
    ///
    /// # Returns
    ///
    /// The entity as stored, including database-assigned columns
    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()))]
    pub async fn persist(&self, entity: &E) -> Result<E, DatabaseError> {
        let mut query = upsert_query(entity);
        let row = query
            .build_query_as::<E::Row>()
            .fetch_one(&self.pool)
            .await?;

        debug!("Entity persisted");
        E::from_row(row)
    }

    /// Deletes the entity's row
    ///
    /// Deleting an entity that is not stored is a no-op.
    #[instrument(skip(self, entity), fields(table = E::TABLE, id = %entity.id()))]
    pub async fn delete(&self, entity: &E) -> Result<(), DatabaseError> {
        let mut query = delete_query::<E>(entity.id());
        let result = query
            .build()
            .execute(&self.pool)
            .await?;

        debug!(rows_affected = result.rows_affected(), "Entity deleted");
        Ok(())
    }

    /// Finds the entity with the given primary key
    ///
    /// # Returns
    ///
    /// `None` if no row has that key
    #[instrument(skip(self, id), fields(table = E::TABLE, id = %id))]
    pub async fn find_by_primary_key(&self, id: E::Id) -> Result<Option<E>, DatabaseError> {
        let column = E::column(E::PRIMARY_KEY)?;
        let value = id.into().coerce(column)?;

        let mut query = select_query::<E>(vec![(column, value)]);
        let row = query
            .build_query_as::<E::Row>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(E::from_row).transpose()
    }

    /// Finds every entity whose `field` equals `value`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidField` if `field` is not a column of
    /// the entity, or `DatabaseError::InvalidFieldValue` if `value` cannot be
    /// compared with it
    #[instrument(skip(self, value), fields(table = E::TABLE))]
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<E>, DatabaseError> {
        self.find_by_fields(vec![(field, value.into())]).await
    }

    /// Finds every entity matching all of the given field/value pairs
    ///
    /// An empty criteria list matches every row.
    #[instrument(skip(self, criteria), fields(table = E::TABLE, criteria = criteria.len()))]
    pub async fn find_by_fields(
        &self,
        criteria: Vec<(&str, FieldValue)>,
    ) -> Result<Vec<E>, DatabaseError> {
        let criteria = resolve_criteria::<E>(criteria)?;
        self.fetch_all(select_query::<E>(criteria)).await
    }

    /// Returns every row of the entity's table
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn find_all(&self) -> Result<Vec<E>, DatabaseError> {
        self.fetch_all(select_query::<E>(Vec::new())).await
    }

    /// Counts the rows of the entity's table
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", E::TABLE));
        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn fetch_all(
        &self,
        mut query: QueryBuilder<'static, Postgres>,
    ) -> Result<Vec<E>, DatabaseError> {
        let rows = query
            .build_query_as::<E::Row>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Rows fetched");
        rows.into_iter().map(E::from_row).collect()
    }
}

/// Validates field names and coerces their values
fn resolve_criteria<E: Entity>(
    criteria: Vec<(&str, FieldValue)>,
) -> Result<Vec<(&'static Column, FieldValue)>, DatabaseError> {
    criteria
        .into_iter()
        .map(|(field, value)| -> Result<_, DatabaseError> {
            let column = E::column(field)?;
            Ok((column, E::lookup_value(column, value)?))
        })
        .collect()
}

/// `INSERT ... ON CONFLICT (pk) DO UPDATE ... RETURNING *`
fn upsert_query<E: Entity>(entity: &E) -> QueryBuilder<'static, Postgres> {
    let values = entity.writable_values();
    let names: Vec<&str> = values.iter().map(|(name, _)| *name).collect();

    let mut query = QueryBuilder::new(format!("INSERT INTO {} ({}) VALUES (", E::TABLE, names.join(", ")));
    for (i, (_, value)) in values.into_iter().enumerate() {
        if i > 0 {
            query.push(", ");
        }
        value.push_bind(&mut query);
    }

    let updates: Vec<String> = names
        .iter()
        .filter(|name| **name != E::PRIMARY_KEY)
        .map(|name| format!("{name} = EXCLUDED.{name}"))
        .collect();
    // With nothing else to update the key is reassigned so RETURNING still yields the row
    let updates = if updates.is_empty() {
        format!("{pk} = EXCLUDED.{pk}", pk = E::PRIMARY_KEY)
    } else {
        updates.join(", ")
    };

    query.push(format!(
        ") ON CONFLICT ({}) DO UPDATE SET {} RETURNING *",
        E::PRIMARY_KEY,
        updates
    ));
    query
}

fn delete_query<E: Entity>(id: E::Id) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("DELETE FROM {} WHERE {} = ", E::TABLE, E::PRIMARY_KEY));
    id.into().push_bind(&mut query);
    query
}

/// `SELECT * ... WHERE a = $1 AND b IS NULL ... ORDER BY`
fn select_query<E: Entity>(
    criteria: Vec<(&'static Column, FieldValue)>,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT * FROM {}", E::TABLE));

    for (i, (column, value)) in criteria.into_iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        query.push(column.name);
        if value.is_null() {
            query.push(" IS NULL");
        } else {
            query.push(" = ");
            value.push_bind(&mut query);
        }
    }

    query.push(format!(" ORDER BY {}", E::DEFAULT_ORDER));
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ColumnKind;
    use uuid::Uuid;

    /// Minimal entity used to check the generated SQL
    #[derive(Debug)]
    struct Widget {
        id: Uuid,
        label: String,
    }

    #[derive(sqlx::FromRow)]
    struct WidgetRow {
        id: Uuid,
        label: String,
    }

    impl Entity for Widget {
        type Id = Uuid;
        type Row = WidgetRow;

        const NAME: &'static str = "Widget";
        const TABLE: &'static str = "widget";
        const PRIMARY_KEY: &'static str = "id";
        const DEFAULT_ORDER: &'static str = "label";
        const COLUMNS: &'static [Column] = &[
            Column::new("id", ColumnKind::Uuid),
            Column::new("label", ColumnKind::Text),
            Column::new("retired_at", ColumnKind::Timestamp),
        ];

        fn id(&self) -> Uuid {
            self.id
        }

        fn writable_values(&self) -> Vec<(&'static str, FieldValue)> {
            vec![("id", self.id.into()), ("label", self.label.clone().into())]
        }

        fn from_row(row: WidgetRow) -> Result<Self, DatabaseError> {
            Ok(Widget { id: row.id, label: row.label })
        }
    }

    #[test]
    fn test_upsert_sql() {
        let widget = Widget { id: Uuid::new_v4(), label: "cog".to_string() };
        let query = upsert_query(&widget);
        assert_eq!(
            query.sql(),
            "INSERT INTO widget (id, label) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET label = EXCLUDED.label RETURNING *"
        );
    }

    #[test]
    fn test_select_without_criteria() {
        let query = select_query::<Widget>(Vec::new());
        assert_eq!(query.sql(), "SELECT * FROM widget ORDER BY label");
    }

    #[test]
    fn test_select_with_value_and_null() {
        let criteria = resolve_criteria::<Widget>(vec![
            ("label", FieldValue::from("cog")),
            ("retired_at", FieldValue::Null),
        ])
        .unwrap();

        let query = select_query::<Widget>(criteria);
        assert_eq!(
            query.sql(),
            "SELECT * FROM widget WHERE label = $1 AND retired_at IS NULL ORDER BY label"
        );
    }

    #[test]
    fn test_delete_sql() {
        let query = delete_query::<Widget>(Uuid::new_v4());
        assert_eq!(query.sql(), "DELETE FROM widget WHERE id = $1");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let error = resolve_criteria::<Widget>(vec![("label; DROP TABLE widget", "x".into())])
            .unwrap_err();
        assert!(matches!(error, DatabaseError::InvalidField { .. }));
    }

    #[test]
    fn test_field_values_are_coerced() {
        let id = Uuid::new_v4();
        let criteria = resolve_criteria::<Widget>(vec![("id", id.to_string().into())]).unwrap();
        assert_eq!(criteria[0].1, FieldValue::Uuid(id));
    }
}
