//! Json and Query wrappers whose rejections use the `{error:{code,message}}` envelope.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// `Json<T>` with rejections mapped through `AppError`.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `Query<T>` with rejections mapped through `AppError`.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(ApiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, StatusCode};
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: u32,
    }

    #[tokio::test]
    async fn malformed_json_becomes_bad_request() {
        let req = http::Request::builder()
            .header("content-type", "application/json")
            .body(Body::from("{\"cat_name\":"))
            .unwrap();
        let err = ApiJson::<Value>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "bad_request"));
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported_media_type() {
        let req = http::Request::builder().body(Body::from("{}")).unwrap();
        let err = ApiJson::<Value>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_and_code().1, "unsupported_media_type");
    }

    #[tokio::test]
    async fn bad_query_string_is_bad_request() {
        let mut parts = http::Request::builder().uri("/?page=first").body(()).unwrap().into_parts().0;
        let err = ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_and_code(), (StatusCode::BAD_REQUEST, "bad_request"));

        let mut parts = http::Request::builder().uri("/?page=2").body(()).unwrap().into_parts().0;
        let ApiQuery(paging) = ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(paging.page, 2);
    }
}
