//! Builds parameterized SELECT and INSERT statements for cats and users.

use crate::models::{BoundingBox, NewCat, NewUser};
use crate::schema::{Cast, CAT_TABLE, USER_TABLE};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from code and validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    pub fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder with cast, e.g. `$3::int8`.
    pub fn push_param(&mut self, v: Value, cast: Cast) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), cast.as_sql())
    }
}

impl Default for QueryBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Which cats a read selects.
#[derive(Clone, Copy, Debug)]
pub enum CatFilter {
    All,
    ById(i64),
    ByOwner(i64),
    InBox(BoundingBox),
}

pub(crate) fn f64_value(n: f64) -> Value {
    serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Cats joined with their owner; coordinates split back into lat/lng.
pub fn select_cats(db_schema: &str, filter: CatFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cat = qualified_table(db_schema, CAT_TABLE);
    let user = qualified_table(db_schema, USER_TABLE);
    let where_clause = match filter {
        CatFilter::All => String::new(),
        CatFilter::ById(id) => {
            let ph = q.push_param(Value::from(id), Cast::Int8);
            format!(" WHERE c.\"cat_id\" = {}", ph)
        }
        CatFilter::ByOwner(owner) => {
            let ph = q.push_param(Value::from(owner), Cast::Int8);
            format!(" WHERE c.\"owner\" = {}", ph)
        }
        CatFilter::InBox(b) => {
            let tr_lat = q.push_param(f64_value(b.top_right.lat), Cast::Float8);
            let tr_lng = q.push_param(f64_value(b.top_right.lng), Cast::Float8);
            let bl_lat = q.push_param(f64_value(b.bottom_left.lat), Cast::Float8);
            let bl_lng = q.push_param(f64_value(b.bottom_left.lng), Cast::Float8);
            format!(
                " WHERE c.\"coords\" <@ box(point({}, {}), point({}, {}))",
                tr_lat, tr_lng, bl_lat, bl_lng
            )
        }
    };
    q.sql = format!(
        "SELECT c.\"cat_id\", c.\"cat_name\", c.\"weight\", c.\"filename\", c.\"birthdate\", \
         (c.\"coords\")[0] AS \"lat\", (c.\"coords\")[1] AS \"lng\", \
         json_build_object('user_id', u.\"user_id\", 'user_name', u.\"user_name\") AS \"owner\" \
         FROM {} c JOIN {} u ON c.\"owner\" = u.\"user_id\"{} ORDER BY c.\"cat_id\"",
        cat, user, where_clause
    );
    q
}

/// INSERT a cat owned by `owner`, returning the new id.
pub fn insert_cat(db_schema: &str, cat: &NewCat, owner: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, CAT_TABLE);
    let name = q.push_param(Value::String(cat.cat_name.clone()), Cast::Text);
    let weight = q.push_param(f64_value(cat.weight), Cast::Float8);
    let owner = q.push_param(Value::from(owner), Cast::Int8);
    let filename = q.push_param(Value::String(cat.filename.clone()), Cast::Text);
    let birthdate = q.push_param(Value::String(cat.birthdate.format("%Y-%m-%d").to_string()), Cast::Date);
    let lat = q.push_param(f64_value(cat.lat), Cast::Float8);
    let lng = q.push_param(f64_value(cat.lng), Cast::Float8);
    q.sql = format!(
        "INSERT INTO {} (\"cat_name\", \"weight\", \"owner\", \"filename\", \"birthdate\", \"coords\") \
         VALUES ({}, {}, {}, {}, {}, point({}, {})) RETURNING \"cat_id\"",
        table, name, weight, owner, filename, birthdate, lat, lng
    );
    q
}

/// INSERT a user with role `user`. `password_hash` is already hashed; the plain password never reaches SQL.
pub fn insert_user(db_schema: &str, user: &NewUser, password_hash: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, USER_TABLE);
    let name = q.push_param(Value::String(user.user_name.clone()), Cast::Text);
    let email = q.push_param(Value::String(user.email.clone()), Cast::Text);
    let password = q.push_param(Value::String(password_hash.to_string()), Cast::Text);
    q.sql = format!(
        "INSERT INTO {} (\"user_name\", \"email\", \"role\", \"password\") VALUES ({}, {}, 'user', {}) RETURNING \"user_id\"",
        table, name, email, password
    );
    q
}

/// Users without the password column; one user when `id` is given.
pub fn select_users(db_schema: &str, id: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, USER_TABLE);
    let where_clause = match id {
        Some(id) => {
            let ph = q.push_param(Value::from(id), Cast::Int8);
            format!(" WHERE \"user_id\" = {}", ph)
        }
        None => String::new(),
    };
    q.sql = format!(
        "SELECT \"user_id\", \"user_name\", \"email\", \"role\" FROM {}{} ORDER BY \"user_id\"",
        table, where_clause
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use serde_json::json;

    #[test]
    fn quoted_escapes_double_quotes() {
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
        assert_eq!(qualified_table("public", "cat"), "\"public\".\"cat\"");
    }

    #[test]
    fn select_by_owner_binds_owner() {
        let q = select_cats("public", CatFilter::ByOwner(7));
        assert!(q.sql.contains("WHERE c.\"owner\" = $1::int8"));
        assert!(q.sql.contains("JOIN \"public\".\"app_user\" u"));
        assert_eq!(q.params, vec![json!(7)]);
    }

    #[test]
    fn select_all_has_no_params() {
        let q = select_cats("public", CatFilter::All);
        assert!(!q.sql.contains("WHERE"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn bounding_box_binds_both_corners() {
        let q = select_cats(
            "public",
            CatFilter::InBox(BoundingBox {
                top_right: Coordinates { lat: 61.0, lng: 25.5 },
                bottom_left: Coordinates { lat: 60.0, lng: 24.5 },
            }),
        );
        assert!(q
            .sql
            .contains("<@ box(point($1::float8, $2::float8), point($3::float8, $4::float8))"));
        assert_eq!(q.params, vec![json!(61.0), json!(25.5), json!(60.0), json!(24.5)]);
    }

    #[test]
    fn insert_cat_uses_actor_as_owner() {
        let cat = NewCat {
            cat_name: "Whiskers".into(),
            weight: 4.2,
            filename: "w.jpg".into(),
            birthdate: chrono::NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            lat: 60.2,
            lng: 24.9,
        };
        let q = insert_cat("public", &cat, 7);
        assert!(q.sql.starts_with("INSERT INTO \"public\".\"cat\""));
        assert!(q.sql.contains("point($6::float8, $7::float8)"));
        assert!(q.sql.ends_with("RETURNING \"cat_id\""));
        assert_eq!(q.params[2], json!(7));
        assert_eq!(q.params[4], json!("2020-05-01"));
    }

    #[test]
    fn insert_user_binds_hash_and_fixes_role() {
        let user = NewUser {
            user_name: "ann".into(),
            email: "ann@example.fi".into(),
            password: "secret1".into(),
        };
        let q = insert_user("public", &user, "sha256$1$00$ff");
        assert!(q.sql.contains("VALUES ($1::text, $2::text, 'user', $3::text) RETURNING \"user_id\""));
        assert_eq!(q.params, vec![json!("ann"), json!("ann@example.fi"), json!("sha256$1$00$ff")]);
    }

    #[test]
    fn select_users_never_reads_password() {
        let q = select_users("public", Some(3));
        assert!(!q.sql.contains("password"));
        assert_eq!(q.params, vec![json!(3)]);
    }
}
