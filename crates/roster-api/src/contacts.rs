//! Handlers for owned contacts and their sharing tags. All routes require a
//! bearer token.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/get-contact/{email}/{contact_id}` | Contact or `null` |
//! | `PATCH` | `/add-contact/{email}` | Body: `{"contact": {...}}`; server assigns `_id` |
//! | `PATCH` | `/update-contact/{email}` | Body: `{"contact": {"_id": ..., ...}}`; full replace |
//! | `PATCH` | `/delete-contact?email=..&id=..` | |
//! | `PATCH` | `/set-shared-info/{email}/{contact_id}` | Body: tag `{"_id", "write", ...}` |
//! | `PATCH` | `/update-shared-info/{email}/{contact_id}` | Body: `{"info": {"_id", "write"}}`; also served at `/updating-permissin-shared-info/..` |
//! | `PATCH` | `/delete-shared-info/{email}/{contact_id}` | Body: fields every removed tag must match |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use roster_core::{
  model::{Contact, Fields, NewContact, SharedPermission},
  repository::{self, AddedContact},
  store::UserStore,
  update::UpdateResult,
};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewContactBody {
  pub contact: NewContact,
}

#[derive(Debug, Deserialize)]
pub struct ContactBody {
  pub contact: Contact,
}

/// `?email=..&id=..` for the delete routes. A missing parameter is empty and
/// matches nothing.
#[derive(Debug, Deserialize)]
pub struct ItemParams {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub id:    String,
}

/// The `_id` of a tag or permitted contact and its new `write` flag.
#[derive(Debug, Deserialize)]
pub struct PermissionChange {
  #[serde(rename = "_id")]
  pub id:    String,
  #[serde(default)]
  pub write: bool,
}

#[derive(Debug, Deserialize)]
pub struct TagPermissionBody {
  pub info: PermissionChange,
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// `GET /get-contact/{email}/{contact_id}`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((email, contact_id)): Path<(String, String)>,
) -> Result<Json<Option<Contact>>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let contact = repository::get_contact(&*state.store, &email, &contact_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contact))
}

/// `PATCH /add-contact/{email}`: returns the update report plus the stored
/// contact and its `insertedId`.
pub async fn add<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
  Json(body): Json<NewContactBody>,
) -> Result<Json<AddedContact>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let added = repository::add_contact(&*state.store, &email, body.contact)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(added))
}

/// `PATCH /update-contact/{email}`
pub async fn update<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(email): Path<String>,
  Json(body): Json<ContactBody>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = repository::update_contact(&*state.store, &email, body.contact)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /delete-contact?email=..&id=..`
pub async fn delete<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ItemParams>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = repository::delete_contact(&*state.store, &params.email, &params.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// `PATCH /set-shared-info/{email}/{contact_id}`
pub async fn add_tag<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((email, contact_id)): Path<(String, String)>,
  Json(tag): Json<SharedPermission>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = repository::add_tag(&*state.store, &email, &contact_id, tag)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /update-shared-info/{email}/{contact_id}`
pub async fn update_tag<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((email, contact_id)): Path<(String, String)>,
  Json(body): Json<TagPermissionBody>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = repository::update_tag_permission(
    &*state.store,
    &email,
    &contact_id,
    &body.info.id,
    body.info.write,
  )
  .await
  .map_err(ApiError::store)?;
  Ok(Json(result))
}

/// `PATCH /delete-shared-info/{email}/{contact_id}`: removes every tag whose
/// fields include all of the body's key/value pairs.
pub async fn delete_tag<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((email, contact_id)): Path<(String, String)>,
  Json(pattern): Json<Fields>,
) -> Result<Json<UpdateResult>, ApiError>
where
  S: UserStore + Clone + 'static,
{
  let result = repository::delete_tag(&*state.store, &email, &contact_id, pattern)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(result))
}
