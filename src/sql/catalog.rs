//! SELECT and INSERT statements for categories, species and animals.

use crate::models::{BoundingBox, NewAnimal, NewCategory, NewSpecies};
use crate::schema::{Cast, ANIMAL_TABLE, CATEGORY_TABLE, SPECIES_TABLE};
use crate::sql::builder::{f64_value, qualified_table, QueryBuf};
use serde_json::Value;

/// Which species a read selects.
#[derive(Clone, Copy, Debug)]
pub enum SpeciesFilter {
    All,
    ById(i64),
    InBox(BoundingBox),
}

pub fn select_categories(db_schema: &str, id: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, CATEGORY_TABLE);
    let where_clause = match id {
        Some(id) => format!(" WHERE \"category_id\" = {}", q.push_param(Value::from(id), Cast::Int8)),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT \"category_id\", \"category_name\" FROM {}{} ORDER BY \"category_id\"",
        table, where_clause
    );
    q
}

pub fn insert_category(db_schema: &str, category: &NewCategory) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, CATEGORY_TABLE);
    let name = q.push_param(Value::String(category.category_name.clone()), Cast::Text);
    q.sql = format!(
        "INSERT INTO {} (\"category_name\") VALUES ({}) RETURNING \"category_id\"",
        table, name
    );
    q
}

/// Species joined with their category; location split back into lat/lng.
pub fn select_species(db_schema: &str, filter: SpeciesFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let species = qualified_table(db_schema, SPECIES_TABLE);
    let category = qualified_table(db_schema, CATEGORY_TABLE);
    let where_clause = match filter {
        SpeciesFilter::All => String::new(),
        SpeciesFilter::ById(id) => {
            format!(" WHERE s.\"species_id\" = {}", q.push_param(Value::from(id), Cast::Int8))
        }
        SpeciesFilter::InBox(b) => {
            let tr_lat = q.push_param(f64_value(b.top_right.lat), Cast::Float8);
            let tr_lng = q.push_param(f64_value(b.top_right.lng), Cast::Float8);
            let bl_lat = q.push_param(f64_value(b.bottom_left.lat), Cast::Float8);
            let bl_lng = q.push_param(f64_value(b.bottom_left.lng), Cast::Float8);
            format!(
                " WHERE s.\"location\" <@ box(point({}, {}), point({}, {}))",
                tr_lat, tr_lng, bl_lat, bl_lng
            )
        }
    };
    q.sql = format!(
        "SELECT s.\"species_id\", s.\"species_name\", s.\"image\", \
         (s.\"location\")[0] AS \"lat\", (s.\"location\")[1] AS \"lng\", \
         json_build_object('category_id', c.\"category_id\", 'category_name', c.\"category_name\") AS \"category\" \
         FROM {} s JOIN {} c ON s.\"category\" = c.\"category_id\"{} ORDER BY s.\"species_id\"",
        species, category, where_clause
    );
    q
}

/// INSERT a species whose image has already been resolved.
pub fn insert_species(db_schema: &str, species: &NewSpecies, image: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, SPECIES_TABLE);
    let name = q.push_param(Value::String(species.species_name.clone()), Cast::Text);
    let category = q.push_param(Value::from(species.category), Cast::Int8);
    let image = q.push_param(Value::String(image.to_string()), Cast::Text);
    let lat = q.push_param(f64_value(species.lat), Cast::Float8);
    let lng = q.push_param(f64_value(species.lng), Cast::Float8);
    q.sql = format!(
        "INSERT INTO {} (\"species_name\", \"category\", \"image\", \"location\") \
         VALUES ({}, {}, {}, point({}, {})) RETURNING \"species_id\"",
        table, name, category, image, lat, lng
    );
    q
}

/// Animals joined with their species.
pub fn select_animals(db_schema: &str, id: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let animal = qualified_table(db_schema, ANIMAL_TABLE);
    let species = qualified_table(db_schema, SPECIES_TABLE);
    let where_clause = match id {
        Some(id) => format!(" WHERE a.\"animal_id\" = {}", q.push_param(Value::from(id), Cast::Int8)),
        None => String::new(),
    };
    q.sql = format!(
        "SELECT a.\"animal_id\", a.\"animal_name\", a.\"birthdate\", a.\"gender\", \
         json_build_object('species_id', s.\"species_id\", 'species_name', s.\"species_name\") AS \"species\" \
         FROM {} a JOIN {} s ON a.\"species\" = s.\"species_id\"{} ORDER BY a.\"animal_id\"",
        animal, species, where_clause
    );
    q
}

pub fn insert_animal(db_schema: &str, animal: &NewAnimal) -> QueryBuf {
    let mut q = QueryBuf::new();
    let table = qualified_table(db_schema, ANIMAL_TABLE);
    let name = q.push_param(Value::String(animal.animal_name.clone()), Cast::Text);
    let species = q.push_param(Value::from(animal.species), Cast::Int8);
    let birthdate = q.push_param(Value::String(animal.birthdate.format("%Y-%m-%d").to_string()), Cast::Date);
    let gender = q.push_param(Value::String(animal.gender.clone()), Cast::Text);
    q.sql = format!(
        "INSERT INTO {} (\"animal_name\", \"species\", \"birthdate\", \"gender\") \
         VALUES ({}, {}, {}, {}) RETURNING \"animal_id\"",
        table, name, species, birthdate, gender
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use serde_json::json;

    #[test]
    fn category_by_id() {
        let q = select_categories("zoo", Some(4));
        assert_eq!(
            q.sql,
            "SELECT \"category_id\", \"category_name\" FROM \"zoo\".\"category\" WHERE \"category_id\" = $1::int8 ORDER BY \"category_id\""
        );
        assert_eq!(q.params, vec![json!(4)]);
    }

    #[test]
    fn species_join_their_category() {
        let q = select_species("public", SpeciesFilter::All);
        assert!(q.sql.contains("JOIN \"public\".\"category\" c ON s.\"category\" = c.\"category_id\""));
        assert!(q.sql.contains("(s.\"location\")[0] AS \"lat\""));
        assert!(q.params.is_empty());
    }

    #[test]
    fn species_in_box() {
        let q = select_species(
            "public",
            SpeciesFilter::InBox(BoundingBox {
                top_right: Coordinates { lat: 62.0, lng: 25.0 },
                bottom_left: Coordinates { lat: 60.0, lng: 22.0 },
            }),
        );
        assert!(q
            .sql
            .contains("s.\"location\" <@ box(point($1::float8, $2::float8), point($3::float8, $4::float8))"));
        assert_eq!(q.params, vec![json!(62.0), json!(25.0), json!(60.0), json!(22.0)]);
    }

    #[test]
    fn insert_species_uses_resolved_image() {
        let species = NewSpecies {
            species_name: "Lynx".into(),
            category: 2,
            image: None,
            lat: 61.5,
            lng: 23.8,
        };
        let q = insert_species("public", &species, "https://img/lynx.jpg");
        assert!(q.sql.contains("point($4::float8, $5::float8)) RETURNING \"species_id\""));
        assert_eq!(q.params[2], json!("https://img/lynx.jpg"));
    }

    #[test]
    fn insert_animal_casts_birthdate() {
        let animal = NewAnimal {
            animal_name: "Rex".into(),
            species: 3,
            birthdate: chrono::NaiveDate::from_ymd_opt(2019, 3, 1).unwrap(),
            gender: "Male".into(),
        };
        let q = insert_animal("public", &animal);
        assert!(q.sql.contains("VALUES ($1::text, $2::int8, $3::date, $4::text)"));
        assert_eq!(q.params, vec![json!("Rex"), json!(3), json!("2019-03-01"), json!("Male")]);
    }
}
