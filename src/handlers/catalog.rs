//! Catalogue handlers. Reads are public, creates and updates need an authenticated actor,
//! deletes need an administrator.

use crate::actor::Actor;
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiQuery, RequireAdmin};
use crate::handlers::{body_to_map, decode, parse_id};
use crate::models::{AreaQuery, BoundingBox, NewAnimal, NewCategory, NewSpecies};
use crate::response::{success_many, success_one, success_one_ok, MessageResponse};
use crate::service::{
    AnimalService, CategoryService, RequestValidator, SpeciesService, ANIMAL_RULES, CATEGORY_RULES, SPECIES_RULES,
};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = CategoryService::list(&state.pool, state.db_schema()).await?;
    Ok(success_many(categories))
}

pub async fn read_category(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let category = CategoryService::read(&state.pool, state.db_schema(), id).await?;
    Ok(success_one_ok(category))
}

pub async fn create_category(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, CATEGORY_RULES)?;
    let category: NewCategory = decode(body)?;
    let id = CategoryService::create(&state.pool, state.db_schema(), &category).await?;
    Ok(success_one(MessageResponse::new("category created", Some(id))))
}

pub async fn update_category(
    State(state): State<AppState>,
    actor: Actor,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, CATEGORY_RULES)?;
    CategoryService::update(&state.pool, state.db_schema(), &body, id, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("category updated", Some(id))))
}

pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    CategoryService::delete(&state.pool, state.db_schema(), id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("category deleted", Some(id))))
}

pub async fn list_species(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let species = SpeciesService::list(&state.pool, state.db_schema()).await?;
    Ok(success_many(species))
}

pub async fn read_species(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let species = SpeciesService::read(&state.pool, state.db_schema(), id).await?;
    Ok(success_one_ok(species))
}

pub async fn list_species_in_area(
    State(state): State<AppState>,
    ApiQuery(area): ApiQuery<AreaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let area = BoundingBox::try_from(area)?;
    let species = SpeciesService::list_in_area(&state.pool, state.db_schema(), area).await?;
    Ok(success_many(species))
}

pub async fn create_species(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, SPECIES_RULES)?;
    let species: NewSpecies = decode(body)?;
    let id = SpeciesService::create(&state.pool, state.db_schema(), &species, state.images.as_ref()).await?;
    Ok(success_one(MessageResponse::new("species added", Some(id))))
}

pub async fn update_species(
    State(state): State<AppState>,
    actor: Actor,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, SPECIES_RULES)?;
    SpeciesService::update(&state.pool, state.db_schema(), &body, id, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("species updated", Some(id))))
}

pub async fn delete_species(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    SpeciesService::delete(&state.pool, state.db_schema(), id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("species deleted", Some(id))))
}

pub async fn list_animals(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let animals = AnimalService::list(&state.pool, state.db_schema()).await?;
    Ok(success_many(animals))
}

pub async fn read_animal(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let animal = AnimalService::read(&state.pool, state.db_schema(), id).await?;
    Ok(success_one_ok(animal))
}

pub async fn create_animal(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, ANIMAL_RULES)?;
    let animal: NewAnimal = decode(body)?;
    let id = AnimalService::create(&state.pool, state.db_schema(), &animal).await?;
    Ok(success_one(MessageResponse::new("animal created", Some(id))))
}

pub async fn update_animal(
    State(state): State<AppState>,
    actor: Actor,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, ANIMAL_RULES)?;
    AnimalService::update(&state.pool, state.db_schema(), &body, id, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("animal updated", Some(id))))
}

pub async fn delete_animal(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    AnimalService::delete(&state.pool, state.db_schema(), id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("animal deleted", Some(id))))
}
