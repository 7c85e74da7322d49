//! Animal catalogue: categories, species and animals. These rows have no owning user, so
//! updates are filtered by id only; deletes are reserved for administrators.

use crate::actor::Actor;
use crate::error::AppError;
use crate::external::ImageLookup;
use crate::models::{Animal, BoundingBox, Category, NewAnimal, NewCategory, NewSpecies, Species};
use crate::schema::{PatchSchema, ANIMAL_SCHEMA, CATEGORY_SCHEMA, SPECIES_SCHEMA};
use crate::service::rows::{fetch_one, fetch_rows, insert_returning_id};
use crate::service::update::{delete_entity, update_entity};
use crate::sql::{
    insert_animal, insert_category, insert_species, select_animals, select_categories, select_species,
    SpeciesFilter,
};
use serde_json::{Map, Value};
use sqlx::PgPool;

async fn delete_as_admin(
    pool: &PgPool,
    schema: &PatchSchema,
    db_schema: &str,
    id: i64,
    admin: &Actor,
) -> Result<bool, AppError> {
    if !admin.is_admin() {
        return Err(AppError::Forbidden("admin only".into()));
    }
    delete_entity(pool, schema, db_schema, &Value::from(id), admin).await
}

pub struct CategoryService;

impl CategoryService {
    pub async fn list(pool: &PgPool, db_schema: &str) -> Result<Vec<Category>, AppError> {
        fetch_rows(pool, &select_categories(db_schema, None)).await
    }

    pub async fn read(pool: &PgPool, db_schema: &str, id: i64) -> Result<Category, AppError> {
        fetch_one(pool, &select_categories(db_schema, Some(id)), format!("category {}", id)).await
    }

    /// Category names are unique; a duplicate is a `Conflict`.
    pub async fn create(pool: &PgPool, db_schema: &str, category: &NewCategory) -> Result<i64, AppError> {
        let q = insert_category(db_schema, category);
        let id = insert_returning_id(pool, &q, CATEGORY_SCHEMA.entity).await?;
        tracing::info!(category_id = id, "category added");
        Ok(id)
    }

    pub async fn update(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        actor: &Actor,
    ) -> Result<bool, AppError> {
        update_entity(pool, &CATEGORY_SCHEMA, db_schema, payload, &Value::from(id), actor).await
    }

    /// Fails with `Conflict` while species still reference the category.
    pub async fn delete(pool: &PgPool, db_schema: &str, id: i64, admin: &Actor) -> Result<bool, AppError> {
        delete_as_admin(pool, &CATEGORY_SCHEMA, db_schema, id, admin).await
    }
}

/// Image for a new species: the one in the body, else whatever the lookup finds by name.
pub async fn resolve_image(species: &NewSpecies, images: &dyn ImageLookup) -> Result<String, AppError> {
    if let Some(image) = &species.image {
        return Ok(image.clone());
    }
    images
        .image_for(&species.species_name)
        .await?
        .ok_or_else(|| AppError::Validation(format!("no image found for species '{}'", species.species_name)))
}

pub struct SpeciesService;

impl SpeciesService {
    pub async fn list(pool: &PgPool, db_schema: &str) -> Result<Vec<Species>, AppError> {
        fetch_rows(pool, &select_species(db_schema, SpeciesFilter::All)).await
    }

    pub async fn read(pool: &PgPool, db_schema: &str, id: i64) -> Result<Species, AppError> {
        fetch_one(pool, &select_species(db_schema, SpeciesFilter::ById(id)), format!("species {}", id)).await
    }

    pub async fn list_in_area(pool: &PgPool, db_schema: &str, area: BoundingBox) -> Result<Vec<Species>, AppError> {
        fetch_rows(pool, &select_species(db_schema, SpeciesFilter::InBox(area))).await
    }

    pub async fn create(
        pool: &PgPool,
        db_schema: &str,
        species: &NewSpecies,
        images: &dyn ImageLookup,
    ) -> Result<i64, AppError> {
        let image = resolve_image(species, images).await?;
        let q = insert_species(db_schema, species, &image);
        let id = insert_returning_id(pool, &q, SPECIES_SCHEMA.entity).await?;
        tracing::info!(species_id = id, category = species.category, "species added");
        Ok(id)
    }

    pub async fn update(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        actor: &Actor,
    ) -> Result<bool, AppError> {
        update_entity(pool, &SPECIES_SCHEMA, db_schema, payload, &Value::from(id), actor).await
    }

    pub async fn delete(pool: &PgPool, db_schema: &str, id: i64, admin: &Actor) -> Result<bool, AppError> {
        delete_as_admin(pool, &SPECIES_SCHEMA, db_schema, id, admin).await
    }
}

pub struct AnimalService;

impl AnimalService {
    pub async fn list(pool: &PgPool, db_schema: &str) -> Result<Vec<Animal>, AppError> {
        fetch_rows(pool, &select_animals(db_schema, None)).await
    }

    pub async fn read(pool: &PgPool, db_schema: &str, id: i64) -> Result<Animal, AppError> {
        fetch_one(pool, &select_animals(db_schema, Some(id)), format!("animal {}", id)).await
    }

    pub async fn create(pool: &PgPool, db_schema: &str, animal: &NewAnimal) -> Result<i64, AppError> {
        let id = insert_returning_id(pool, &insert_animal(db_schema, animal), ANIMAL_SCHEMA.entity).await?;
        tracing::info!(animal_id = id, species = animal.species, "animal added");
        Ok(id)
    }

    pub async fn update(
        pool: &PgPool,
        db_schema: &str,
        payload: &Map<String, Value>,
        id: i64,
        actor: &Actor,
    ) -> Result<bool, AppError> {
        update_entity(pool, &ANIMAL_SCHEMA, db_schema, payload, &Value::from(id), actor).await
    }

    pub async fn delete(pool: &PgPool, db_schema: &str, id: i64, admin: &Actor) -> Result<bool, AppError> {
        delete_as_admin(pool, &ANIMAL_SCHEMA, db_schema, id, admin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every lookup with a fixed result and records the names asked for.
    struct FixedImages {
        found: Option<&'static str>,
        asked: Mutex<Vec<String>>,
    }

    impl FixedImages {
        fn new(found: Option<&'static str>) -> Self {
            FixedImages {
                found,
                asked: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ImageLookup for FixedImages {
        async fn image_for(&self, name: &str) -> Result<Option<String>, AppError> {
            self.asked.lock().unwrap().push(name.to_string());
            Ok(self.found.map(String::from))
        }
    }

    fn lynx(image: Option<&str>) -> NewSpecies {
        NewSpecies {
            species_name: "Eurasian lynx".into(),
            category: 1,
            image: image.map(String::from),
            lat: 61.5,
            lng: 23.8,
        }
    }

    #[tokio::test]
    async fn image_in_body_skips_lookup() {
        let images = FixedImages::new(Some("https://img/wiki.jpg"));
        let image = resolve_image(&lynx(Some("https://img/own.jpg")), &images).await.unwrap();
        assert_eq!(image, "https://img/own.jpg");
        assert!(images.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_looked_up_by_name() {
        let images = FixedImages::new(Some("https://img/wiki.jpg"));
        let image = resolve_image(&lynx(None), &images).await.unwrap();
        assert_eq!(image, "https://img/wiki.jpg");
        assert_eq!(*images.asked.lock().unwrap(), vec!["Eurasian lynx".to_string()]);
    }

    #[tokio::test]
    async fn no_image_anywhere_is_a_validation_error() {
        let err = resolve_image(&lynx(None), &FixedImages::new(None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
