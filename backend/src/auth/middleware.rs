//! Authentication middleware
//!
//! Provides the Axum layer and extractor that turn a bearer token into an
//! authenticated caller id.
//!
//! [`require_auth`] runs in front of every protected route and stores the
//! resolved [`AuthUser`] in the request extensions. Handlers read it back
//! through the [`AuthUser`] extractor, which falls back to validating the
//! header itself when the layer is absent.

use crate::auth::TokenService;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// Rejects a missing header, any other scheme, an empty token, and
/// anything with more than one segment after the scheme.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthenticated("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("Invalid authorization header".to_string()))?;

    let mut parts = auth_header.split(' ');
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => {
            return Err(ApiError::Unauthenticated(
                "Invalid authorization format".to_string(),
            ))
        }
    };

    if scheme != "Bearer" {
        return Err(ApiError::Unauthenticated(
            "Invalid authorization format".to_string(),
        ));
    }
    if token.is_empty() {
        return Err(ApiError::Unauthenticated("Token is empty".to_string()));
    }

    Ok(token)
}

/// Resolve the caller from request headers
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)?;

    let user_id = tokens.validate(token).map_err(|e| {
        debug!(reason = %e, "Rejected bearer token");
        ApiError::Unauthenticated(format!("Invalid token: {}", e))
    })?;

    Ok(AuthUser { user_id })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, app_state.tokens())
    }
}

/// Guard for a group of routes, applied with `from_fn_with_state`
///
/// On success the caller is attached to the request; on failure the
/// downstream handler is never invoked.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), state.tokens())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("bearer abc")]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[case("Bearer a b")]
    #[case("Token abc")]
    #[case("abc")]
    fn test_malformed_header_rejected(#[case] value: &str) {
        let err = bearer_token(&headers_with(value)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn test_authenticate_resolves_user() {
        let tokens = TokenService::new("test-secret", 3600);
        let token = tokens.issue(5).unwrap();

        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(user, AuthUser { user_id: 5 });
    }

    #[test]
    fn test_authenticate_rejects_foreign_token() {
        let tokens = TokenService::new("test-secret", 3600);
        let foreign = TokenService::new("other-secret", 3600).issue(5).unwrap();

        let err = authenticate(&headers_with(&format!("Bearer {}", foreign)), &tokens).unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }
}
