//! Sharing coordinator: copies contacts into another user's
//! `permittedContacts` and manages those copies afterwards.
//!
//! Shared contacts are snapshots. Nothing links a copy back to its source, so
//! later edits on either side stay local.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
  model::{Contact, Notification},
  store::UserStore,
  update::{UpdateResult, UserUpdate},
};

/// Result of [`share_contacts`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareOutcome {
  #[serde(flatten)]
  pub result:       UpdateResult,
  /// Report for the accompanying notification, when one was sent.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notification: Option<UpdateResult>,
}

/// Append `contacts` verbatim to the recipient's permitted contacts, then
/// push `notification` to the recipient if given.
///
/// The two writes are independent; the sharer's ownership of the contacts is
/// not checked.
pub async fn share_contacts<S: UserStore>(
  store: &S,
  recipient: &str,
  contacts: Vec<Contact>,
  notification: Option<Notification>,
) -> Result<ShareOutcome, S::Error> {
  let count = contacts.len();
  let result = store
    .update_user(recipient, UserUpdate::PushPermittedContacts(contacts))
    .await?;
  info!(%recipient, count, ?result, "shared contacts");

  let notification = match notification {
    Some(n) => Some(store.update_user(recipient, UserUpdate::PushNotification(n)).await?),
    None => None,
  };

  Ok(ShareOutcome { result, notification })
}

pub async fn get_permitted_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
) -> Result<Option<Contact>, S::Error> {
  let user = store.find_user(email).await?;
  Ok(user.and_then(|u| u.permitted_contact(contact_id).cloned()))
}

/// Replace the whole permitted copy with the same `_id`.
pub async fn update_permitted_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact: Contact,
) -> Result<UpdateResult, S::Error> {
  let contact_id = contact.id.clone();
  let result = store
    .update_user(email, UserUpdate::ReplacePermittedContact(contact))
    .await?;
  debug!(%email, %contact_id, ?result, "updated permitted contact");
  Ok(result)
}

/// Change only the `write` flag on a permitted copy.
pub async fn update_permission<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
  write: bool,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::SetPermittedWrite { contact_id: contact_id.to_owned(), write };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, write, ?result, "updated permission");
  Ok(result)
}

pub async fn delete_permitted_contact<S: UserStore>(
  store: &S,
  email: &str,
  contact_id: &str,
) -> Result<UpdateResult, S::Error> {
  let update = UserUpdate::PullPermittedContact { contact_id: contact_id.to_owned() };
  let result = store.update_user(email, update).await?;
  debug!(%email, %contact_id, ?result, "deleted permitted contact");
  Ok(result)
}
