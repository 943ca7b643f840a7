//! Request extractors: bearer authentication, JSON bodies, path ids

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use daybook_core::Error as CoreError;
use uuid::Uuid;

use crate::error::Error;
use crate::state::AppState;

/// JSON body whose rejection is a `400 {error}`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Caller resolved from a valid, unexpired bearer token
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(CoreError::Unauthenticated)?;
        let user_id = state
            .run(move |db, auth| auth.validate_token(db, &token))
            .await?;
        Ok(Authenticated { user_id })
    }
}

/// Bearer token if the request carries one, validated or not
#[derive(Debug, Clone)]
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(&parts.headers)))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Malformed ids name nothing, so they are `NotFound` like unknown ones.
pub fn parse_id(raw: &str, entity: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| CoreError::NotFound(entity).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer  abc ")).as_deref(), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bad_id_is_not_found() {
        assert!(matches!(
            parse_id("12", "Goal"),
            Err(Error::Core(CoreError::NotFound("Goal")))
        ));
    }
}
