//! Database bootstrap: create the database if missing, then the application schema and tables.

use crate::error::AppError;
use crate::schema::{ANIMAL_TABLE, CATEGORY_TABLE, CAT_TABLE, SPECIES_TABLE, USER_TABLE};
use crate::sql::{qualified_table, quoted};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// DDL for the application tables in `db_schema`, in dependency order.
pub fn table_ddl(db_schema: &str) -> Vec<String> {
    let user = qualified_table(db_schema, USER_TABLE);
    let cat = qualified_table(db_schema, CAT_TABLE);
    let category = qualified_table(db_schema, CATEGORY_TABLE);
    let species = qualified_table(db_schema, SPECIES_TABLE);
    let animal = qualified_table(db_schema, ANIMAL_TABLE);
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(db_schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                user_id BIGSERIAL PRIMARY KEY,
                user_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
                password TEXT NOT NULL
            )
            "#,
            user
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                cat_id BIGSERIAL PRIMARY KEY,
                cat_name TEXT NOT NULL,
                weight DOUBLE PRECISION NOT NULL,
                filename TEXT NOT NULL,
                birthdate DATE NOT NULL,
                coords POINT NOT NULL,
                owner BIGINT NOT NULL REFERENCES {} (user_id) ON DELETE CASCADE
            )
            "#,
            cat, user
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (owner)",
            quoted(&format!("{}_owner_idx", CAT_TABLE)),
            cat
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                category_id BIGSERIAL PRIMARY KEY,
                category_name TEXT NOT NULL UNIQUE
            )
            "#,
            category
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                species_id BIGSERIAL PRIMARY KEY,
                species_name TEXT NOT NULL UNIQUE,
                category BIGINT NOT NULL REFERENCES {} (category_id) ON DELETE RESTRICT,
                image TEXT NOT NULL,
                location POINT NOT NULL
            )
            "#,
            species, category
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                animal_id BIGSERIAL PRIMARY KEY,
                animal_name TEXT NOT NULL,
                species BIGINT NOT NULL REFERENCES {} (species_id) ON DELETE RESTRICT,
                birthdate DATE NOT NULL,
                gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female'))
            )
            "#,
            animal, species
        ),
    ]
}

/// Create the schema and every application table if they do not exist.
pub async fn ensure_tables(pool: &PgPool, db_schema: &str) -> Result<(), AppError> {
    for ddl in table_ddl(db_schema) {
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema = db_schema, "tables ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "database created");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}
