//! Row and request types for cats, users and the animal catalogue (categories, species, animals).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Owning user as embedded in cat responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub user_id: i64,
    pub user_name: String,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Cat {
    pub cat_id: i64,
    pub cat_name: String,
    pub weight: f64,
    pub filename: String,
    pub birthdate: chrono::NaiveDate,
    pub lat: f64,
    pub lng: f64,
    pub owner: Json<OwnerSummary>,
}

/// Body of `POST /cats`. The owner always comes from the actor, never from the body.
#[derive(Clone, Debug, Deserialize)]
pub struct NewCat {
    pub cat_name: String,
    pub weight: f64,
    pub filename: String,
    pub birthdate: chrono::NaiveDate,
    pub lat: f64,
    pub lng: f64,
}

/// User as returned by the API; the password column is never selected.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
    pub role: String,
}

/// Body of `POST /users`. The password is hashed before it is stored; the role starts as `user`.
#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCategory {
    pub category_name: String,
}

/// Species with its category inlined and location split into lat/lng.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Species {
    pub species_id: i64,
    pub species_name: String,
    pub category: Json<Category>,
    pub image: String,
    pub lat: f64,
    pub lng: f64,
}

/// Body of `POST /species`. Without `image` one is looked up by species name.
#[derive(Clone, Debug, Deserialize)]
pub struct NewSpecies {
    pub species_name: String,
    pub category: i64,
    #[serde(default)]
    pub image: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub species_id: i64,
    pub species_name: String,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Animal {
    pub animal_id: i64,
    pub animal_name: String,
    pub birthdate: chrono::NaiveDate,
    pub gender: String,
    pub species: Json<SpeciesSummary>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAnimal {
    pub animal_name: String,
    pub species: i64,
    pub birthdate: chrono::NaiveDate,
    pub gender: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl std::str::FromStr for Coordinates {
    type Err = AppError;

    /// Parses `"lat,lng"`, latitude first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::BadRequest(format!("invalid coordinates '{}', expected lat,lng", s));
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Coordinates { lat, lng })
    }
}

/// Rectangle given by two opposite corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub top_right: Coordinates,
    pub bottom_left: Coordinates,
}

/// Query string of `GET /cats/area` and `GET /species/area`.
#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    #[serde(rename = "topRight")]
    pub top_right: String,
    #[serde(rename = "bottomLeft")]
    pub bottom_left: String,
}

impl TryFrom<AreaQuery> for BoundingBox {
    type Error = AppError;

    fn try_from(q: AreaQuery) -> Result<Self, Self::Error> {
        Ok(BoundingBox {
            top_right: q.top_right.parse()?,
            bottom_left: q.bottom_left.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_latitude_first() {
        let c: Coordinates = "60.2, 24.9".parse().unwrap();
        assert_eq!(c, Coordinates { lat: 60.2, lng: 24.9 });
    }

    #[test]
    fn coordinates_reject_garbage_and_out_of_range() {
        assert!("60.2".parse::<Coordinates>().is_err());
        assert!("north,east".parse::<Coordinates>().is_err());
        assert!("91,0".parse::<Coordinates>().is_err());
    }

    #[test]
    fn area_query_builds_box() {
        let b = BoundingBox::try_from(AreaQuery {
            top_right: "61,25".into(),
            bottom_left: "60,24".into(),
        })
        .unwrap();
        assert_eq!(b.bottom_left.lat, 60.0);
        assert_eq!(b.top_right.lng, 25.0);
    }

    #[test]
    fn cat_serializes_owner_inline() {
        let cat = Cat {
            cat_id: 1,
            cat_name: "Whiskers".into(),
            weight: 4.2,
            filename: "w.jpg".into(),
            birthdate: chrono::NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
            lat: 60.2,
            lng: 24.9,
            owner: Json(OwnerSummary {
                user_id: 7,
                user_name: "ann".into(),
            }),
        };
        let v = serde_json::to_value(&cat).unwrap();
        assert_eq!(v["owner"]["user_id"], 7);
        assert_eq!(v["birthdate"], "2020-05-01");
    }

    #[test]
    fn new_user_debug_hides_password() {
        let user = NewUser {
            user_name: "ann".into(),
            email: "ann@example.fi".into(),
            password: "hunter22".into(),
        };
        let shown = format!("{:?}", user);
        assert!(shown.contains("ann@example.fi"));
        assert!(!shown.contains("hunter22"));
    }

    #[test]
    fn new_species_image_is_optional() {
        let s: NewSpecies = serde_json::from_value(serde_json::json!({
            "species_name": "Lynx",
            "category": 1,
            "lat": 61.5,
            "lng": 23.8
        }))
        .unwrap();
        assert!(s.image.is_none());
    }
}
