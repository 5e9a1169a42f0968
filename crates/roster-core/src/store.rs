//! The `UserStore` trait: the document-store contract.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The repository, sharing and notification operations depend on this
//! abstraction, never on a concrete backend.

use std::future::Future;

use crate::{
  model::{NewUser, Registration, UserRecord, UserSummary},
  update::{UpdateResult, UserUpdate},
};

/// A collection of user documents keyed by email.
///
/// "No such user" is never an error: reads return `None`, updates return
/// [`UpdateResult::NO_MATCH`]. Errors are reserved for backend faults.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every user projected to `{_id, name, email}`, sorted by name ascending.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<UserSummary>, Self::Error>> + Send + '_;

  /// The full document for `email`, if registered.
  fn find_user<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<UserRecord>, Self::Error>> + Send + 'a;

  /// Insert a new user unless the email is already registered.
  fn insert_user(
    &self,
    user: NewUser,
  ) -> impl Future<Output = Result<Registration, Self::Error>> + Send + '_;

  /// Apply one update to the document for `email`, atomically.
  fn update_user<'a>(
    &'a self,
    email: &'a str,
    update: UserUpdate,
  ) -> impl Future<Output = Result<UpdateResult, Self::Error>> + Send + 'a;
}
