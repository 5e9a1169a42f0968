//! Handlers for sharing and for the recipient-side permitted copies. All
//! routes require a bearer token.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `PATCH` | `/share-contacts/{email}` | Body: `{"sharedContacts": [...], "notification"?: {...}}` |
//! | `GET`   | `/get-permitted-contact/{email}/{contact_id}` | Copy or `null` |
//! | `PATCH` | `/update-permitted-contact/{email}` | Body: `{"contact": {...}}`; full replace |
//! | `PATCH` | `/update-permission/{email}` | Body: `{"contact": {"_id", "write"}}`; `write` only |
//! | `PATCH` | `/delete-permitted-contact?email=..&id=..` | Also served at `/delete-parmitted-contact` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use roster_core::{
  model::{Contact, Notification},
  sharing::{self, ShareOutcome},
  store::UserStore,
  update::UpdateResult,
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Authenticated,
  contacts::{ContactBody, ItemParams, PermissionChange},
  error::ApiError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareBody {
  pub shared_contacts: Vec<Contact>,
  /// Pushed to the recipient's feed after the contacts land.
  #[serde(default)]
  pub notification:    Option<Notification>,
}

#[derive(Debug, Deserialize)]
pub struct PermissionBody {
  pub contact: PermissionChange,
}

/// `PATCH /share-contacts/{email}`: `email` is the recipient.
pub async fn share<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(recipient): Path<String>,
  Json(body): Json<ShareBody>,
) -> Result<Json<ShareOutcome>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let outcome = sharing::share_contacts(
    &*state.store,
    &recipient,
    body.shared_contacts,
    body.notification,
  )
  .await
  .map_err(ApiError::store)?;
  Ok(Json(outcome))
}

/// `GET /get-permitted-contact/{email}/{contact_id}`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((email, contact_id)): Path<(String, String)>,
) -> Result<Json<Option<Contact>>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let contact = sharing::get_permitted_contact(&*state.store, &email, &contact_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contact))
}

/// `PATCH /update-permitted-contact/{email}`
pub async fn update<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
  Json(body): Json<ContactBody>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = sharing::update_permitted_contact(&*state.store, &email, body.contact)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /update-permission/{email}`
pub async fn update_permission<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
  Json(body): Json<PermissionBody>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = sharing::update_permission(
    &*state.store,
    &email,
    &body.contact.id,
    body.contact.write,
  )
  .await
  .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /delete-permitted-contact?email=..&id=..`
pub async fn delete<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ItemParams>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = sharing::delete_permitted_contact(&*state.store, &params.email, &params.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}
