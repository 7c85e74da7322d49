//! The authenticated identity performing a request.

use crate::error::AppError;
use serde::{Serialize, Serializer};

/// Role claim carried by an authenticated actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Ordinary,
    Administrator,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Ordinary => "user",
            Role::Administrator => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Role::Ordinary),
            "admin" => Ok(Role::Administrator),
            _ => Err(AppError::Unauthorized(format!(
                "invalid role: {} (expected user or admin)",
                s
            ))),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Actor {
    #[serde(rename = "user_id")]
    pub id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(id: i64, role: Role) -> Self {
        Actor { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_claim_strings() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::Ordinary);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Administrator);
        assert!(matches!("root".parse::<Role>(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn serializes_like_token_claims() {
        let v = serde_json::to_value(Actor::new(7, Role::Ordinary)).unwrap();
        assert_eq!(v, serde_json::json!({ "user_id": 7, "role": "user" }));
    }
}
