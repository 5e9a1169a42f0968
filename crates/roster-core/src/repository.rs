//! Contact repository: CRUD over a user's own `contacts` and their tags.
//!
//! Every operation takes the store explicitly. Absent users and contacts are
//! reported as `None` or zero-count results, never as errors.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
  model::{
    Contact, Fields, NewContact, NewUser, Registration, SharedPermission,
    UserRecord, UserSummary, generate_contact_id,
  },
  store::UserStore,
  update::{UpdateResult, UserUpdate},
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// The user directory, sorted by name.
pub async fn list_users<S: UserStore>(store: &S) -> Result<Vec<UserSummary>, S::Error> {
  store.list_users().await
}

/// Register `user`. A duplicate email is a soft no-op.
pub async fn register<S: UserStore>(store: &S, user: NewUser) -> Result<Registration, S::Error> {
  let email = user.email.clone();
  let outcome = store.insert_user(user).await?;
  match outcome {
    Registration::Created { inserted_id } => info!(%email, %inserted_id, "registered user"),
    Registration::Duplicate => info!(%email, "registration skipped: email already exists"),
  }
  Ok(outcome)
}

/// The full user document.
pub async fn get_user<S: UserStore>(store: &S, email: &str) -> Result<Option<UserRecord>, S::Error> {
  store.find_user(email).await
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Result of [`add_contact`]: the update report plus the stored contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedContact {
  #[serde(flatten)]
  pub result:      UpdateResult,
  pub inserted_id: String,
  pub contact:     Contact,
}

pub async fn get_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
) -> Result<Option<Contact>, S::Error> {
  let user = store.find_user(email).await?;
  Ok(user.and_then(|u| u.contact(contact_id).cloned()))
}

/// Append `contact` under a freshly generated id. Repeated calls append
/// duplicates.
pub async fn add_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact: NewContact,
) -> Result<AddedContact, S::Error> {
  let contact = contact.into_contact(generate_contact_id());
  let result = store
    .update_user(email, UserUpdate::PushContact(contact.clone()))
    .await?;
  debug!(%email, contact_id = %contact.id, ?result, "added contact");
  Ok(AddedContact { result, inserted_id: contact.id.clone(), contact })
}

/// Replace the contact with the same `_id`, in place.
pub async fn update_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact: Contact,
) -> Result<UpdateResult, S::Error> {
  let contact_id = contact.id.clone();
  let result = store
    .update_user(email, UserUpdate::ReplaceContact(contact))
    .await?;
  debug!(%email, %contact_id, ?result, "updated contact");
  Ok(result)
}

pub async fn delete_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::PullContact { contact_id: contact_id.to_owned() };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, ?result, "deleted contact");
  Ok(result)
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// Attach a sharing grant to an owned contact.
pub async fn add_tag<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
  tag: SharedPermission,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::PushTag { contact_id: contact_id.to_owned(), tag };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, ?result, "added tag");
  Ok(result)
}

/// Change only the `write` flag of the tag `tag_id` on an owned contact.
pub async fn update_tag_permission<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
  tag_id: &str,
  write: bool,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::SetTagWrite {
    contact_id: contact_id.to_owned(),
    tag_id: tag_id.to_owned(),
    write,
  };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, %tag_id, write, ?result, "updated tag permission");
  Ok(result)
}

/// Remove every tag on the contact whose fields include all of `pattern`.
///
/// Unlike [`update_tag_permission`], which keys on the tag `_id`, this matches
/// whatever fields the caller sends.
pub async fn delete_tag<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
  pattern: Fields,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::PullTags { contact_id: contact_id.to_owned(), pattern };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, ?result, "deleted tag");
  Ok(result)
}
