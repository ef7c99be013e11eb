//! Caller authentication.
//!
//! Callers present an HS256 JWT either as `Authorization: Bearer <token>` or
//! in the `dsAuthorization-cookie` cookie. The token subject is the eperson
//! UUID. A request without a token is anonymous; a request with an invalid
//! token is rejected before it reaches any handler.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

use crate::{config::AuthConfig, state::AppState, Error, Result};

const AUTH_COOKIE: &str = "dsAuthorization-cookie";

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub eperson_id: Uuid,
}

impl Principal {
    pub fn new(eperson_id: Uuid) -> Self {
        Self { eperson_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    iat: usize,
    exp: usize,
}

#[derive(Clone)]
pub struct AuthManager {
    config: Arc<AuthConfig>,
    secret: Vec<u8>,
}

impl AuthManager {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        let secret = match &config.jwt_secret {
            Some(s) if !s.is_empty() => s.as_bytes().to_vec(),
            _ => {
                tracing::warn!(
                    "`auth.jwt_secret` is not set; using ephemeral secret (tokens reset on restart)"
                );
                format!("{}{}", Uuid::new_v4(), Uuid::new_v4()).into_bytes()
            }
        };

        Self { config, secret }
    }

    pub fn issue_token(&self, eperson_id: Uuid) -> Result<String> {
        let now = now_epoch_seconds();
        let claims = TokenClaims {
            sub: eperson_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.config.token_ttl_seconds as usize),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| Error::Internal(format!("Failed to sign token: {e}")))
    }

    /// Resolve the caller from request headers. `Ok(None)` means anonymous.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Principal>> {
        let token = bearer_token(headers).or_else(|| extract_cookie_value(headers, AUTH_COOKIE));
        match token {
            Some(token) => self.validate_token(&token).map(Some),
            None => Ok(None),
        }
    }

    fn validate_token(&self, token: &str) -> Result<Principal> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map_err(|e| Error::InvalidSession(e.to_string()))?;

        let eperson_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| Error::InvalidSession("token subject is not an eperson id".to_string()))?;
        Ok(Principal::new(eperson_id))
    }
}

/// Resolves the caller and stores the `Principal` in request extensions.
pub async fn auth_middleware(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match state.auth.authenticate(req.headers()) {
        Ok(Some(principal)) => {
            tracing::debug!(eperson = %principal.eperson_id, "Authenticated request");
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Ok(None) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let authz = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    authz
        .strip_prefix("Bearer ")
        .or_else(|| authz.strip_prefix("bearer "))
        .map(|t| t.trim().to_string())
}

fn now_epoch_seconds() -> usize {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

fn extract_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let Some((k, v)) = part.trim().split_once('=') else {
            continue;
        };
        if k.trim() == name {
            return Some(v.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn manager() -> AuthManager {
        AuthManager::new(Arc::new(AuthConfig {
            jwt_secret: Some("test-secret".to_string()),
            token_ttl_seconds: 60,
        }))
    }

    #[test]
    fn bearer_token_round_trips_to_principal() {
        let auth = manager();
        let user = Uuid::new_v4();
        let token = auth.issue_token(user).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let principal = auth.authenticate(&headers).unwrap().unwrap();
        assert_eq!(principal.eperson_id, user);
    }

    #[test]
    fn cookie_is_accepted_when_no_header() {
        let auth = manager();
        let user = Uuid::new_v4();
        let token = auth.issue_token(user).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; {AUTH_COOKIE}={token}")).unwrap(),
        );

        assert_eq!(auth.authenticate(&headers).unwrap().unwrap().eperson_id, user);
    }

    #[test]
    fn missing_token_is_anonymous() {
        assert!(manager().authenticate(&HeaderMap::new()).unwrap().is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(matches!(
            manager().authenticate(&headers),
            Err(Error::InvalidSession(_))
        ));
    }
}
