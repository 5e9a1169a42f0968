//! Handlers for the user directory, registration and full-record reads.
//!
//! | Method | Path | Auth | Notes |
//! |--------|------|------|-------|
//! | `GET`  | `/all-users` | no | `[{_id, name, email}]` sorted by name |
//! | `POST` | `/add-user` | no | Body: `{"user": {...}}`; duplicate email is a soft no-op |
//! | `GET`  | `/contacts/{email}` | yes | Full user record or `null` |

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{
  model::{NewUser, Registration, UserRecord, UserSummary},
  repository,
  store::UserStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

/// Message returned when an email is registered twice.
pub const DUPLICATE_USER_MESSAGE: &str = "The user is already exist.";

/// `GET /all-users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<UserSummary>>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let users = repository::list_users(&*state.store)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(users))
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub user: NewUser,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
  #[serde(rename_all = "camelCase")]
  Created { acknowledged: bool, inserted_id: Uuid },
  Duplicate { message: &'static str },
}

impl From<Registration> for RegisterResponse {
  fn from(r: Registration) -> Self {
    match r {
      Registration::Created { inserted_id } => {
        RegisterResponse::Created { acknowledged: true, inserted_id }
      }
      Registration::Duplicate => {
        RegisterResponse::Duplicate { message: DUPLICATE_USER_MESSAGE }
      }
    }
  }
}

/// `POST /add-user`: body: `{"user": {"email": "...", "name": "...", ...}}`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<Json<RegisterResponse>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let outcome = repository::register(&*state.store, body.user)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(outcome.into()))
}

/// `GET /contacts/{email}`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
) -> Result<Json<Option<UserRecord>>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let user = repository::get_user(&*state.store, &email)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(user))
}
