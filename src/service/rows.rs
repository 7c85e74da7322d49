//! Running built statements: typed reads and INSERT ... RETURNING id.

use crate::error::AppError;
use crate::sql::{PgBindValue, QueryBuf};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

pub(crate) async fn fetch_rows<T>(pool: &PgPool, q: &QueryBuf) -> Result<Vec<T>, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, T>(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from_json(p));
    }
    Ok(query.fetch_all(pool).await?)
}

/// First row or `NotFound("{what}")`.
pub(crate) async fn fetch_one<T>(pool: &PgPool, q: &QueryBuf, what: String) -> Result<T, AppError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    fetch_rows(pool, q)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound(what))
}

/// Run an INSERT that returns the new id; constraint violations become `Conflict` for `entity`.
pub(crate) async fn insert_returning_id(pool: &PgPool, q: &QueryBuf, entity: &str) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
    for p in &q.params {
        query = query.bind(PgBindValue::from_json(p));
    }
    query
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::from(e).for_write(entity))
}
