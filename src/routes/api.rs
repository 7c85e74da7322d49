//! Cat, user and catalogue routes. Static segments (`user`, `area`, `admin`, `token`) take precedence over `:id`.

use crate::handlers::{catalog, cats, users};
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn cat_routes(state: AppState) -> Router {
    Router::new()
        .route("/cats", get(cats::list).post(cats::create))
        .route("/cats/user", get(cats::list_by_owner))
        .route("/cats/area", get(cats::list_in_area))
        .route("/cats/admin/:id", put(cats::update_admin).delete(cats::delete_admin))
        .route("/cats/:id", get(cats::read).put(cats::update).delete(cats::delete))
        .with_state(state)
}

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            get(users::list)
                .post(users::create)
                .put(users::update_current)
                .delete(users::delete_current),
        )
        .route("/users/token", get(users::check_token))
        .route("/users/:id", get(users::read).put(users::update).delete(users::delete))
        .with_state(state)
}

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/:id",
            get(catalog::read_category)
                .put(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route("/species", get(catalog::list_species).post(catalog::create_species))
        .route("/species/area", get(catalog::list_species_in_area))
        .route(
            "/species/:id",
            get(catalog::read_species)
                .put(catalog::update_species)
                .delete(catalog::delete_species),
        )
        .route("/animals", get(catalog::list_animals).post(catalog::create_animal))
        .route(
            "/animals/:id",
            get(catalog::read_animal)
                .put(catalog::update_animal)
                .delete(catalog::delete_animal),
        )
        .with_state(state)
}
