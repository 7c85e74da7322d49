//! Cat registry: REST backend for cats, their owners and an animal catalogue, with
//! ownership-scoped partial updates.

pub mod actor;
pub mod config;
pub mod error;
pub mod external;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use actor::{Actor, Role};
pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use external::{ImageLookup, PasswordHasher, Sha256Hasher, WikipediaImages};
pub use response::{success_many, success_one, success_one_ok, MessageResponse};
pub use routes::{app, catalog_routes, cat_routes, common_routes, user_routes};
pub use schema::{PatchSchema, ANIMAL_SCHEMA, CATEGORY_SCHEMA, CAT_SCHEMA, SPECIES_SCHEMA, USER_SCHEMA};
pub use service::{
    update_entity, AnimalService, CatService, CategoryService, SpeciesService, UserService, WriteStore,
};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
