//! Extract the authenticated actor from gateway-forwarded claim headers.

use crate::actor::{Actor, Role};
use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

/// Header carrying the verified `user_id` claim.
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Header carrying the verified `role` claim.
pub const USER_ROLE_HEADER: &str = "X-User-Role";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Any authenticated actor. Rejects with 401 when claims are missing or malformed.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("token not valid".into()))?
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("invalid user id claim".into()))?;
        let role: Role = header(parts, USER_ROLE_HEADER)
            .ok_or_else(|| AppError::Unauthorized("token not valid".into()))?
            .parse()?;
        Ok(Actor::new(id, role))
    }
}

/// Administrator actor. Ordinary actors are rejected with 403.
#[derive(Clone, Copy, Debug)]
pub struct RequireAdmin(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let actor = Actor::from_request_parts(parts, state).await?;
        if !actor.is_admin() {
            return Err(AppError::Forbidden("admin only".into()));
        }
        Ok(RequireAdmin(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_actor_from_headers() {
        let mut p = parts(&[(USER_ID_HEADER, "7"), (USER_ROLE_HEADER, "user")]);
        let actor = Actor::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(actor, Actor::new(7, Role::Ordinary));
    }

    #[tokio::test]
    async fn missing_claims_are_unauthorized() {
        let mut p = parts(&[(USER_ID_HEADER, "7")]);
        let err = Actor::from_request_parts(&mut p, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let mut p = parts(&[(USER_ID_HEADER, "seven"), (USER_ROLE_HEADER, "user")]);
        let err = Actor::from_request_parts(&mut p, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn require_admin_rejects_ordinary_actor() {
        let mut p = parts(&[(USER_ID_HEADER, "7"), (USER_ROLE_HEADER, "user")]);
        let err = RequireAdmin::from_request_parts(&mut p, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let mut p = parts(&[(USER_ID_HEADER, "1"), (USER_ROLE_HEADER, "admin")]);
        let RequireAdmin(admin) = RequireAdmin::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(admin.id, 1);
    }
}
