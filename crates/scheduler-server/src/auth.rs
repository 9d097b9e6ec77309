use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::app::AppState;
use crate::error::ApiError;

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_LIFETIME_HOURS: i64 = 8;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication is not configured")]
    Disabled,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token was issued for a different password")]
    StaleToken,
}

/// Token claims. `hash` ties a token to the password it was issued for, so
/// changing the password invalidates every outstanding token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub hash: String,
    pub exp: i64,
}

pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Issues and checks HS256 tokens for the single shared password.
#[derive(Clone)]
pub struct Authenticator {
    password: Option<String>,
    secret: String,
}

impl Authenticator {
    pub fn new(password: Option<String>, secret: impl Into<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
            secret: secret.into(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(None, String::new())
    }

    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }

    pub fn sign_in(&self, password: &str) -> Result<String, AuthError> {
        let expected = self.password.as_deref().ok_or(AuthError::Disabled)?;
        let digest = password_digest(password);
        if digest != password_digest(expected) {
            return Err(AuthError::WrongPassword);
        }

        let claims = Claims {
            hash: digest,
            exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let Some(password) = self.password.as_deref() else {
            return Ok(());
        };
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        if data.claims.hash != password_digest(password) {
            return Err(AuthError::StaleToken);
        }
        Ok(())
    }
}

/// Value of the `token` cookie, if the request carries one.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.auth.is_enabled() {
        return next.run(request).await;
    }

    let verdict = token_from_cookies(request.headers())
        .ok_or(AuthError::MissingToken)
        .and_then(|token| state.auth.verify(token));

    match verdict {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(path = %request.uri().path(), error = %err, "request rejected");
            ApiError::from(err).into_response()
        }
    }
}
