//! User handlers: list, read, create, current-user update/delete, admin update/delete, token check.

use crate::actor::Actor;
use crate::error::AppError;
use crate::extractors::{ApiJson, RequireAdmin};
use crate::handlers::{body_to_map, decode, parse_id};
use crate::models::NewUser;
use crate::response::{success_many, success_one, success_one_ok, MessageResponse};
use crate::service::{RequestValidator, UserService, NEW_USER_RULES, USER_RULES};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::Value;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = UserService::list(&state.pool, state.db_schema()).await?;
    Ok(success_many(users))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let user = UserService::read(&state.pool, state.db_schema(), id).await?;
    Ok(success_one_ok(user))
}

/// Open registration; the new user always gets role `user`.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, NEW_USER_RULES)?;
    let user: NewUser = decode(body)?;
    let id = UserService::create(&state.pool, state.db_schema(), &user, state.hasher.as_ref()).await?;
    Ok(success_one(MessageResponse::new("user created", Some(id))))
}

/// Returns the claims the gateway forwarded for this request.
pub async fn check_token(actor: Actor) -> impl IntoResponse {
    success_one_ok(actor)
}

pub async fn update_current(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, USER_RULES)?;
    UserService::update_current(&state.pool, state.db_schema(), &body, &actor).await?;
    Ok(success_one_ok(MessageResponse::new("user modified", Some(actor.id))))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, USER_RULES)?;
    UserService::update(&state.pool, state.db_schema(), &body, id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("user modified", Some(id))))
}

pub async fn delete_current(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<impl IntoResponse, AppError> {
    UserService::delete_current(&state.pool, state.db_schema(), &actor).await?;
    Ok(success_one_ok(MessageResponse::new("user deleted", Some(actor.id))))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    UserService::delete(&state.pool, state.db_schema(), id, &admin).await?;
    Ok(success_one_ok(MessageResponse::new("user deleted", Some(id))))
}
