use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use revlog_core::record::{CastHint, RevisionRecord};
use revlog_core::value::Value;
use revlog_store::error::StoreError;
use revlog_store::store::RevisionStore;

use crate::config::PostgresRevisionConfig;
use crate::migrations;

/// Postgres-backed revision store using `sqlx`.
///
/// Old/new values are stored as tagged JSONB; recency ordering uses the
/// `seq` BIGSERIAL column.
pub struct PostgresRevisionStore {
    pool: PgPool,
    prefix: String,
}

impl PostgresRevisionStore {
    /// Create a new store, connecting to Postgres and running migrations
    /// for every relation named in the configuration.
    pub async fn new(config: &PostgresRevisionConfig) -> Result<Self, StoreError> {
        let pool = PgPool::connect(&config.url)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        for relation in &config.relations {
            migrations::run_migrations(&pool, &config.prefix, relation)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }

        Ok(Self {
            pool,
            prefix: config.prefix.clone(),
        })
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(
        pool: PgPool,
        prefix: &str,
        relations: &[String],
    ) -> Result<Self, StoreError> {
        for relation in relations {
            migrations::run_migrations(&pool, prefix, relation)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }

        Ok(Self {
            pool,
            prefix: prefix.to_owned(),
        })
    }

    fn table(&self, relation: &str) -> String {
        format!("{}{relation}", self.prefix)
    }
}

#[async_trait]
impl RevisionStore for PostgresRevisionStore {
    async fn insert_batch(
        &self,
        relation: &str,
        records: Vec<RevisionRecord>,
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (id, field, old_value, new_value, subject_type, subject_id, \
             actor_id, cast_hint, created_at, updated_at) ",
            self.table(relation)
        ));

        let rows: Vec<InsertRow> = records
            .into_iter()
            .map(InsertRow::try_from)
            .collect::<Result<_, _>>()?;

        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.id)
                .push_bind(row.field)
                .push_bind(row.old_value)
                .push_bind(row.new_value)
                .push_bind(row.subject_type)
                .push_bind(row.subject_id)
                .push_bind(row.actor_id)
                .push_bind(row.cast_hint)
                .push_bind(row.created_at)
                .push_bind(row.updated_at);
        });

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn list_desc(
        &self,
        relation: &str,
        subject_type: &str,
        subject_id: &str,
        skip: usize,
        take: usize,
    ) -> Result<Vec<RevisionRecord>, StoreError> {
        let sql = format!(
            "SELECT id, field, old_value, new_value, subject_type, subject_id, \
             actor_id, cast_hint, created_at, updated_at \
             FROM {} WHERE subject_type = $1 AND subject_id = $2 \
             ORDER BY seq DESC OFFSET $3 LIMIT $4",
            self.table(relation)
        );

        #[allow(clippy::cast_possible_wrap)]
        let offset = skip as i64;
        #[allow(clippy::cast_possible_wrap)]
        let limit = take as i64;

        let rows = sqlx::query_as::<_, SelectRow>(&sql)
            .bind(subject_type)
            .bind(subject_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        rows.into_iter().map(RevisionRecord::try_from).collect()
    }

    async fn delete(&self, relation: &str, record: &RevisionRecord) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table(relation));

        let result = sqlx::query(&sql)
            .bind(&record.id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// A record flattened into bindable column values.
struct InsertRow {
    id: String,
    field: String,
    old_value: serde_json::Value,
    new_value: serde_json::Value,
    subject_type: String,
    subject_id: String,
    actor_id: Option<serde_json::Value>,
    cast_hint: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RevisionRecord> for InsertRow {
    type Error = StoreError;

    fn try_from(record: RevisionRecord) -> Result<Self, StoreError> {
        let old_value = serde_json::to_value(&record.old_value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let new_value = serde_json::to_value(&record.new_value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let actor_id = record
            .actor_id
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Self {
            id: record.id,
            field: record.field,
            old_value,
            new_value,
            subject_type: record.subject_type,
            subject_id: record.subject_id,
            actor_id,
            cast_hint: cast_to_str(record.cast).to_owned(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Row shape returned by the select queries.
#[derive(sqlx::FromRow)]
struct SelectRow {
    id: String,
    field: String,
    old_value: serde_json::Value,
    new_value: serde_json::Value,
    subject_type: String,
    subject_id: String,
    actor_id: Option<serde_json::Value>,
    cast_hint: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SelectRow> for RevisionRecord {
    type Error = StoreError;

    fn try_from(row: SelectRow) -> Result<Self, StoreError> {
        let old_value: Value = serde_json::from_value(row.old_value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let new_value: Value = serde_json::from_value(row.new_value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let actor_id: Option<Value> = row
            .actor_id
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(Self {
            id: row.id,
            field: row.field,
            old_value,
            new_value,
            subject_type: row.subject_type,
            subject_id: row.subject_id,
            actor_id,
            cast: cast_from_str(&row.cast_hint)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn cast_to_str(cast: CastHint) -> &'static str {
    match cast {
        CastHint::None => "none",
        CastHint::Date => "date",
    }
}

fn cast_from_str(s: &str) -> Result<CastHint, StoreError> {
    match s {
        "none" => Ok(CastHint::None),
        "date" => Ok(CastHint::Date),
        other => Err(StoreError::Serialization(format!(
            "unknown cast hint: {other}"
        ))),
    }
}
