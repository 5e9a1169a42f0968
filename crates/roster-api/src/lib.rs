//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::UserStore`].
//! Listing users, registering and reading the notification feed are open;
//! every other route requires a bearer token from `POST /jwt`. TLS, CORS and
//! process concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roster_api::api_router(AppState { store, tokens });
//! ```

pub mod auth;
pub mod contacts;
pub mod error;
pub mod notifications;
pub mod permitted;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use roster_core::store::UserStore;

pub use error::ApiError;

use auth::TokenService;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers. Built once at startup.
#[derive(Clone)]
pub struct AppState<S: UserStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: UserStore + Clone + 'static,
{
  Router::new()
    .route("/jwt", post(auth::issue_token::<S>))
    // Users
    .route("/all-users", get(users::list::<S>))
    .route("/add-user", post(users::register::<S>))
    .route("/contacts/{email}", get(users::get_one::<S>))
    // Owned contacts
    .route("/get-contact/{email}/{contact_id}", get(contacts::get_one::<S>))
    .route("/add-contact/{email}", patch(contacts::add::<S>))
    .route("/update-contact/{email}", patch(contacts::update::<S>))
    .route("/delete-contact", patch(contacts::delete::<S>))
    .route("/set-shared-info/{email}/{contact_id}", patch(contacts::add_tag::<S>))
    .route("/update-shared-info/{email}/{contact_id}", patch(contacts::update_tag::<S>))
    .route("/updating-permissin-shared-info/{email}/{contact_id}", patch(contacts::update_tag::<S>))
    .route("/delete-shared-info/{email}/{contact_id}", patch(contacts::delete_tag::<S>))
    // Sharing and permitted contacts
    .route("/share-contacts/{email}", patch(permitted::share::<S>))
    .route("/get-permitted-contact/{email}/{contact_id}", get(permitted::get_one::<S>))
    .route("/update-permitted-contact/{email}", patch(permitted::update::<S>))
    .route("/update-permission/{email}", patch(permitted::update_permission::<S>))
    .route("/delete-permitted-contact", patch(permitted::delete::<S>))
    .route("/delete-parmitted-contact", patch(permitted::delete::<S>))
    // Notifications
    .route("/all-notifications/{email}", get(notifications::list::<S>))
    .route("/send-notification/{receiver_email}", patch(notifications::send::<S>))
    .route("/update-notification-status/{email}", patch(notifications::mark_read::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
