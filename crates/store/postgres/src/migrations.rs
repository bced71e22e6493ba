use sqlx::PgPool;

/// Run the revision table migration for one relation, creating the table
/// and indexes if they do not already exist.
///
/// `seq` is the recency order key: records inserted in one batch share a
/// timestamp, so `created_at` alone cannot order them.
pub async fn run_migrations(pool: &PgPool, prefix: &str, relation: &str) -> Result<(), sqlx::Error> {
    let table = format!("{prefix}{relation}");

    let create_table = format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            seq          BIGSERIAL PRIMARY KEY,
            id           TEXT NOT NULL UNIQUE,
            field        TEXT NOT NULL,
            old_value    JSONB NOT NULL,
            new_value    JSONB NOT NULL,
            subject_type TEXT NOT NULL,
            subject_id   TEXT NOT NULL,
            actor_id     JSONB,
            cast_hint    TEXT NOT NULL DEFAULT 'none',
            created_at   TIMESTAMPTZ NOT NULL,
            updated_at   TIMESTAMPTZ NOT NULL
        )
        "
    );

    sqlx::query(&create_table).execute(pool).await?;

    let index = format!(
        "CREATE INDEX IF NOT EXISTS idx_{prefix}{relation}_subject ON {table} (subject_type, subject_id, seq DESC)"
    );
    sqlx::query(&index).execute(pool).await?;

    Ok(())
}
