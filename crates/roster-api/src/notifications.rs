//! Handlers for the notification feed.
//!
//! | Method  | Path | Auth | Notes |
//! |---------|------|------|-------|
//! | `GET`   | `/all-notifications/{email}` | no | `{"notifications": [...]}` or `null` |
//! | `PATCH` | `/send-notification/{receiver_email}` | yes | Body: notification payload |
//! | `PATCH` | `/update-notification-status/{email}` | yes | Marks every unread entry read |

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{
  model::{Notification, NotificationFeed},
  notifications,
  store::UserStore,
  update::UpdateResult,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /all-notifications/{email}`: unauthenticated.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
) -> Result<Json<Option<NotificationFeed>>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let feed = notifications::list(&*state.store, &email)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(feed))
}

/// `PATCH /send-notification/{receiver_email}`
pub async fn send<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(receiver_email): Path<String>,
  Json(notification): Json<Notification>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = notifications::send(&*state.store, &receiver_email, notification)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /update-notification-status/{email}`
pub async fn mark_read<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = notifications::mark_read(&*state.store, &email)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}
