//! Token guard: bearer-token authentication middleware

use crate::{
    auth::jwt::{Claims, TokenService},
    error::AppError,
    models::user::Role,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Identity of the authenticated caller, attached to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    /// Reject the request unless the caller holds one of `allowed`
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = self.user_id,
                role = %self.role,
                "Role not permitted for route"
            );
            Err(AppError::Forbidden)
        }
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.identity.id,
            username: claims.identity.username,
            role: claims.identity.role,
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}

/// Extract the token from the `Authorization` header.
///
/// Accepts `Bearer <token>` as well as a bare token value.
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::InvalidToken)?
        .trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        return Err(AppError::MissingToken);
    }

    Ok(token.to_string())
}

/// Verify the request's token and attach the caller's identity
pub fn authenticate(token_service: &TokenService, headers: &HeaderMap) -> Result<AuthContext, AppError> {
    let token = extract_token(headers)?;
    let claims = token_service.verify(&token)?;
    Ok(AuthContext::from(claims))
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(token_service): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_context = authenticate(&token_service, req.headers())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Identity;

    fn service() -> TokenService {
        TokenService::new(b"test_secret_key_32_characters_long!", 3600).unwrap()
    }

    #[test]
    fn test_extract_token_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers).unwrap(), "test_token_123");
    }

    #[test]
    fn test_extract_token_bare_value() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "test_token_123".parse().unwrap());

        assert_eq!(extract_token(&headers).unwrap(), "test_token_123");
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(extract_token(&headers), Err(AppError::MissingToken)));
    }

    #[test]
    fn test_extract_token_empty_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert!(matches!(extract_token(&headers), Err(AppError::MissingToken)));
    }

    #[test]
    fn test_authenticate_round_trip() {
        let service = service();
        let identity = Identity {
            id: 42,
            username: "prof".to_string(),
            role: Role::Faculty,
        };
        let token = service.issue(&identity).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {}", token).parse().unwrap());

        let ctx = authenticate(&service, &headers).unwrap();
        assert_eq!(ctx.user_id, 42);
        assert_eq!(ctx.username, "prof");
        assert_eq!(ctx.role, Role::Faculty);
    }

    #[test]
    fn test_require_role() {
        let ctx = AuthContext {
            user_id: 1,
            username: "alice".to_string(),
            role: Role::Student,
        };
        assert!(ctx.require_role(&[Role::Student]).is_ok());
        assert!(matches!(ctx.require_role(&[Role::Admin]), Err(AppError::Forbidden)));
    }
}
