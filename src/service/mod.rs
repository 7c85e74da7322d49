//! Services: cat, user and catalogue operations, ownership-scoped writes, request validation.

mod catalog;
mod cats;
mod rows;
pub mod update;
mod users;
mod validation;
pub use catalog::{resolve_image, AnimalService, CategoryService, SpeciesService};
pub use cats::CatService;
pub use update::{delete_entity, update_entity, WriteStore};
pub use users::UserService;
pub use validation::{
    RequestValidator, ValidationRule, ANIMAL_RULES, CATEGORY_RULES, CAT_RULES, NEW_USER_RULES, SPECIES_RULES,
    USER_RULES,
};
