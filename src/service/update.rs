//! Executes ownership-scoped writes and interprets the affected-row count.

use crate::actor::Actor;
use crate::error::AppError;
use crate::schema::PatchSchema;
use crate::sql::{delete_scoped, plan_update, PgBindValue, QueryBuf};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

/// Store client: run one parameterized write statement and report how many rows it changed.
#[async_trait]
pub trait WriteStore: Send + Sync {
    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError>;
}

#[async_trait]
impl WriteStore for PgPool {
    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let result = query.execute(self).await?;
        Ok(result.rows_affected())
    }
}

/// Partially update one row of `schema`, scoped to the actor's ownership.
///
/// Zero affected rows fails with `NotModified` whether the row is missing or owned by
/// someone else. Constraint violations become `Conflict`; other store errors are returned
/// as-is. Nothing is retried.
pub async fn update_entity<S>(
    store: &S,
    schema: &PatchSchema,
    db_schema: &str,
    payload: &Map<String, Value>,
    target: &Value,
    actor: &Actor,
) -> Result<bool, AppError>
where
    S: WriteStore + ?Sized,
{
    let q = plan_update(schema, payload, target, actor).to_query(db_schema);
    let affected = store.execute(&q).await.map_err(|e| e.for_write(schema.entity))?;
    if affected == 0 {
        tracing::info!(entity = schema.entity, target = %target, actor = actor.id, "update matched no row");
        return Err(AppError::NotModified(format!("no {} updated", schema.entity)));
    }
    Ok(true)
}

/// Delete one row of `schema`; ordinary actors only reach their own rows.
pub async fn delete_entity<S>(
    store: &S,
    schema: &PatchSchema,
    db_schema: &str,
    target: &Value,
    actor: &Actor,
) -> Result<bool, AppError>
where
    S: WriteStore + ?Sized,
{
    let q = delete_scoped(schema, db_schema, target, actor);
    let affected = store.execute(&q).await.map_err(|e| e.for_write(schema.entity))?;
    if affected == 0 {
        tracing::info!(entity = schema.entity, target = %target, actor = actor.id, "delete matched no row");
        return Err(AppError::NotModified(format!("no {} deleted", schema.entity)));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Role;
    use crate::schema::{ANIMAL_SCHEMA, CAT_SCHEMA};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every statement and answers with a scripted affected-row count.
    struct FakeStore {
        affected: Result<u64, ()>,
        executed: Mutex<Vec<QueryBuf>>,
    }

    impl FakeStore {
        fn returning(affected: u64) -> Self {
            FakeStore {
                affected: Ok(affected),
                executed: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            FakeStore {
                affected: Err(()),
                executed: Mutex::new(Vec::new()),
            }
        }

        fn statements(&self) -> Vec<QueryBuf> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WriteStore for FakeStore {
        async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
            self.executed.lock().unwrap().push(q.clone());
            self.affected.map_err(|_| AppError::Db(sqlx::Error::PoolTimedOut))
        }
    }

    fn body() -> Map<String, Value> {
        json!({ "cat_name": "Whiskers", "weight": 4.2 })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn one_affected_row_is_success() {
        let store = FakeStore::returning(1);
        let ok = update_entity(&store, &CAT_SCHEMA, "public", &body(), &json!(42), &Actor::new(7, Role::Ordinary))
            .await
            .unwrap();
        assert!(ok);
        let executed = store.statements();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].sql.ends_with("WHERE \"cat_id\" = $4::int8 AND \"owner\" = $5::int8"));
    }

    #[tokio::test]
    async fn zero_affected_rows_is_not_modified() {
        let store = FakeStore::returning(0);
        let err = update_entity(&store, &CAT_SCHEMA, "public", &body(), &json!(42), &Actor::new(7, Role::Ordinary))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotModified(_)));
    }

    #[tokio::test]
    async fn store_failure_propagates_without_retry() {
        let store = FakeStore::failing();
        let err = update_entity(&store, &CAT_SCHEMA, "public", &body(), &json!(42), &Actor::new(1, Role::Administrator))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Db(sqlx::Error::PoolTimedOut)));
        assert_eq!(store.statements().len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_not_modified_for_foreign_row() {
        let store = FakeStore::returning(0);
        let err = delete_entity(&store, &CAT_SCHEMA, "public", &json!(42), &Actor::new(7, Role::Ordinary))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotModified(m) if m == "no cat deleted"));
        assert_eq!(store.statements()[0].params, vec![json!(42), json!(7)]);
    }

    #[tokio::test]
    async fn unowned_entity_update_is_not_scoped_to_actor() {
        let store = FakeStore::returning(1);
        let body = json!({ "animal_name": "Ada" }).as_object().cloned().unwrap();
        update_entity(&store, &ANIMAL_SCHEMA, "public", &body, &json!(5), &Actor::new(7, Role::Ordinary))
            .await
            .unwrap();
        let executed = store.statements();
        assert!(executed[0].sql.ends_with("WHERE \"animal_id\" = $2::int8"));
        assert_eq!(executed[0].params, vec![json!("Ada"), json!(5)]);
    }
}
