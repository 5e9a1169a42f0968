//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying whatever identity object the client posted
//! to `/jwt`, plus `iat` and `exp`. Guarded handlers take an
//! [`Authenticated`] argument; its extraction runs before the handler body,
//! so a rejected request never reaches the store.

use std::time::Duration;

use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use roster_core::{model::Fields, store::UserStore};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The decoded contents of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
  /// Issued-at, seconds since the epoch.
  pub iat:      i64,
  /// Expiry, seconds since the epoch.
  pub exp:      i64,
  /// The identity payload supplied at issuance.
  #[serde(flatten)]
  pub identity: Fields,
}

// ─── Token service ───────────────────────────────────────────────────────────

/// Signs and verifies tokens with one shared secret.
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenService {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation: Validation::default(),
      ttl,
    }
  }

  /// Sign `identity` with a fresh `iat`/`exp`. Any `iat`/`exp` keys in the
  /// identity are replaced.
  pub fn issue(&self, mut identity: Fields) -> Result<String, ApiError> {
    identity.remove("iat");
    identity.remove("exp");

    let now = Utc::now().timestamp();
    let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
    let claims = Claims { iat: now, exp: now.saturating_add(ttl), identity };
    Ok(jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?)
  }

  /// Check signature and expiry.
  pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        tracing::warn!(error = %e, "rejected bearer token");
        ApiError::Unauthorized
      })
  }
}

/// Verify the `Authorization` header. The credential is the second
/// space-separated word (`Bearer <token>`).
pub fn verify_bearer(headers: &HeaderMap, tokens: &TokenService) -> Result<Claims, ApiError> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .split_whitespace()
    .nth(1)
    .ok_or(ApiError::Unauthorized)?;

  tokens.verify(token)
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler means the request carried a valid token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Claims);

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: UserStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_bearer(&parts.headers, &state.tokens).map(Authenticated)
  }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
  pub token: String,
}

/// `POST /jwt`: body: any identity object; returns `{"token": "..."}`.
pub async fn issue_token<S>(
  State(state): State<AppState<S>>,
  Json(identity): Json<Fields>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let token = state.tokens.issue(identity)?;
  Ok(Json(TokenResponse { token }))
}
