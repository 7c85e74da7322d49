//! User operations. The password is hashed on creation and never selected.

use crate::actor::Actor;
use crate::error::AppError;
use crate::external::PasswordHasher;
use crate::models::{NewUser, User};
use crate::schema::USER_SCHEMA;
use crate::service::rows::{fetch_one, fetch_rows, insert_returning_id};
use crate::service::update::{delete_entity, update_entity};
use crate::sql::{insert_user, select_users};
use serde_json::{Map, Value};
use sqlx::PgPool;

pub struct UserService;

impl UserService {
    pub async fn list(pool: &PgPool, db_schema: &str) -> Result<Vec<User>, AppError> {
        fetch_rows(pool, &select_users(db_schema, None)).await
    }

    pub async fn read(pool: &PgPool, db_schema: &str, id: i64) -> Result<User, AppError> {
        fetch_one(pool, &select_users(db_schema, Some(id)), format!("user {}", id)).await
    }

    /// Register a user with role `user`. A taken email is a `Conflict`.
    pub async fn create(
        pool: &PgPool,
        db_schema: &str,
        user: &NewUser,
        hasher: &dyn PasswordHasher,
    ) -> Result<i64, AppError> {
        let hash = hasher.hash(&user.password)?;
        let id = insert_returning_id(pool, &insert_user(db_schema, user, &hash), USER_SCHEMA.entity).await?;
        tracing::info!(user_id = id, "user created");
        Ok(id)
    }

    /// Update the actor's own row.
    pub async fn update_current(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        actor: &Actor,
    ) -> Result<bool, AppError> {
        update_entity(pool, &USER_SCHEMA, db_schema, payload, &Value::from(actor.id), actor).await
    }

    /// Update any user; administrators only.
    pub async fn update(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        admin: &Actor,
    ) -> Result<bool, AppError> {
        if !admin.is_admin() {
            return Err(AppError::Forbidden("admin only".into()));
        }
        update_entity(pool, &USER_SCHEMA, db_schema, payload, &Value::from(id), admin).await
    }

    pub async fn delete_current(pool: &PgPool, db_schema: &str, actor: &Actor) -> Result<bool, AppError> {
        delete_entity(pool, &USER_SCHEMA, db_schema, &Value::from(actor.id), actor).await
    }

    pub async fn delete(pool: &PgPool, db_schema: &str, id: i64, admin: &Actor) -> Result<bool, AppError> {
        if !admin.is_admin() {
            return Err(AppError::Forbidden("admin only".into()));
        }
        delete_entity(pool, &USER_SCHEMA, db_schema, &Value::from(id), admin).await
    }
}
