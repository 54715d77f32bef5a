//! Bearer-token verification for tokens minted by the external auth service.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    CsOwner,
    Client,
    Member,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::CsOwner => "cs_owner",
            Role::Client => "client",
            Role::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Authenticated principal resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub subject: String,
    pub role: Role,
}

impl Caller {
    /// Bulk import is reserved for administrators and CS owners.
    pub fn can_import(&self) -> bool {
        matches!(self.role, Role::Admin | Role::CsOwner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("role '{0}' may not perform this action")]
    Forbidden(&'static str),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": "Não autorizado" }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Caller, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(Caller {
            subject: data.claims.sub,
            role: data.claims.role,
        })
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.verify(token)
    }

    pub fn authorize_import(&self, headers: &HeaderMap) -> Result<Caller, AuthError> {
        let caller = self.authenticate(headers)?;
        if caller.can_import() {
            Ok(caller)
        } else {
            Err(AuthError::Forbidden(caller.role.label()))
        }
    }
}
