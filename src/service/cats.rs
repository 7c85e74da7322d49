//! Cat operations against PostgreSQL.

use crate::actor::Actor;
use crate::error::AppError;
use crate::models::{BoundingBox, Cat, NewCat};
use crate::schema::CAT_SCHEMA;
use crate::service::rows::{fetch_one, fetch_rows, insert_returning_id};
use crate::service::update::{delete_entity, update_entity};
use crate::sql::{insert_cat, select_cats, CatFilter};
use serde_json::{Map, Value};
use sqlx::PgPool;

pub struct CatService;

impl CatService {
    /// All cats with their owner, ordered by id.
    pub async fn list(pool: &PgPool, db_schema: &str) -> Result<Vec<Cat>, AppError> {
        fetch_rows(pool, &select_cats(db_schema, CatFilter::All)).await
    }

    pub async fn read(pool: &PgPool, db_schema: &str, id: i64) -> Result<Cat, AppError> {
        fetch_one(pool, &select_cats(db_schema, CatFilter::ById(id)), format!("cat {}", id)).await
    }

    pub async fn list_by_owner(pool: &PgPool, db_schema: &str, actor: &Actor) -> Result<Vec<Cat>, AppError> {
        fetch_rows(pool, &select_cats(db_schema, CatFilter::ByOwner(actor.id))).await
    }

    pub async fn list_in_area(pool: &PgPool, db_schema: &str, area: BoundingBox) -> Result<Vec<Cat>, AppError> {
        fetch_rows(pool, &select_cats(db_schema, CatFilter::InBox(area))).await
    }

    /// Insert a cat owned by the actor. Returns the new id.
    pub async fn create(pool: &PgPool, db_schema: &str, cat: &NewCat, actor: &Actor) -> Result<i64, AppError> {
        let id = insert_returning_id(pool, &insert_cat(db_schema, cat, actor.id), CAT_SCHEMA.entity).await?;
        tracing::info!(cat_id = id, owner = actor.id, "cat added");
        Ok(id)
    }

    /// Partial update. Ordinary actors only reach their own cats and cannot change the owner.
    pub async fn update(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        actor: &Actor,
    ) -> Result<bool, AppError> {
        update_entity(pool, &CAT_SCHEMA, db_schema, payload, &Value::from(id), actor).await
    }

    /// Partial update by an administrator; an explicit `owner` reassigns the cat.
    pub async fn update_admin(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        admin: &Actor,
    ) -> Result<bool, AppError> {
        if !admin.is_admin() {
            return Err(AppError::Forbidden("admin only".into()));
        }
        update_entity(pool, &CAT_SCHEMA, db_schema, payload, &Value::from(id), admin).await
    }

    pub async fn delete(pool: &PgPool, db_schema: &str, id: i64, actor: &Actor) -> Result<bool, AppError> {
        delete_entity(pool, &CAT_SCHEMA, db_schema, &Value::from(id), actor).await
    }
}
