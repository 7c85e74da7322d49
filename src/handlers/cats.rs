//! Cat handlers: list, read, create, scoped update/delete, admin update/delete, by owner, by area.

use crate::actor::Actor;
use crate::error::AppError;
use crate::extractors::{ApiJson, ApiQuery, RequireAdmin};
use crate::handlers::{body_to_map, decode, parse_id};
use crate::models::{AreaQuery, BoundingBox, NewCat};
use crate::response::{success_many, success_one, success_one_ok, MessageResponse};
use crate::service::{CatService, RequestValidator, CAT_RULES};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cats = CatService::list(&state.pool, state.db_schema()).await?;
    Ok(success_many(cats))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let cat = CatService::read(&state.pool, state.db_schema(), id).await?;
    Ok(success_one_ok(cat))
}

pub async fn list_by_owner(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    let cats = CatService::list_by_owner(&state.pool, state.db_schema(), &actor).await?;
    Ok(success_many(cats))
}

pub async fn list_in_area(
    State(state): State<AppState>,
    ApiQuery(area): ApiQuery<AreaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let area = BoundingBox::try_from(area)?;
    let cats = CatService::list_in_area(&state.pool, state.db_schema(), area).await?;
    Ok(success_many(cats))
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, CAT_RULES)?;
    let cat: NewCat = decode(body)?;
    let id = CatService::create(&state.pool, state.db_schema(), &cat, &actor).await?;
    Ok(success_one(MessageResponse::new("cat added", Some(id))))
}

pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, CAT_RULES)?;
    CatService::update(&state.pool, state.db_schema(), &body, id, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("cat updated", Some(id))))
}

pub async fn update_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, CAT_RULES)?;
    CatService::update_admin(&state.pool, state.db_schema(), &body, id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("cat updated", Some(id))))
}

pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    CatService::delete(&state.pool, state.db_schema(), id, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("cat deleted", Some(id))))
}

pub async fn delete_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    CatService::delete(&state.pool, state.db_schema(), id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("cat deleted", Some(id))))
}
