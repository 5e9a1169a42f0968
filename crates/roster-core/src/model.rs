//! Document types: the user record and everything nested inside it.
//!
//! A user record is a single document: the account fields, the contacts the
//! user owns, the contacts other users have shared with them, and their
//! notification feed. Profile fields the service does not interpret are kept
//! verbatim in flattened JSON maps so they survive every round-trip.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Free-form JSON fields carried alongside the typed ones.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Length of a contact `_id`.
pub const CONTACT_ID_LEN: usize = 12;

/// Generate a fresh contact id: the first [`CONTACT_ID_LEN`] characters of a
/// hyphenated v4 UUID. Collisions are not checked for.
pub fn generate_contact_id() -> String {
  let mut id = Uuid::new_v4().hyphenated().to_string();
  id.truncate(CONTACT_ID_LEN);
  id
}

// ─── Sharing ─────────────────────────────────────────────────────────────────

/// A grant attached to an owned contact: who may see it, and whether they may
/// edit their copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedPermission {
  /// Correlates the grant with a recipient.
  #[serde(rename = "_id")]
  pub id:     String,
  /// Stored only when the client sent it or a permission update set it.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub write:  Option<bool>,
  /// Recipient details and anything else the client attaches.
  #[serde(flatten)]
  pub fields: Fields,
}

impl SharedPermission {
  /// `true` if every key/value pair in `pattern` is present on this tag.
  ///
  /// Keys are compared against the serialised form, so `_id` and `write`
  /// participate like any other field.
  pub fn matches_pattern(&self, pattern: &Fields) -> bool {
    let Ok(serde_json::Value::Object(own)) = serde_json::to_value(self) else {
      return false;
    };
    pattern.iter().all(|(k, v)| own.get(k) == Some(v))
  }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// A contact, either owned (in `contacts`) or a shared copy (in
/// `permittedContacts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
  #[serde(rename = "_id")]
  pub id:     String,
  /// Grants on an owned contact.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags:   Option<Vec<SharedPermission>>,
  /// Recipient-side edit right on a permitted copy.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub write:  Option<bool>,
  #[serde(flatten)]
  pub fields: Fields,
}

/// A contact as submitted for creation, before the server assigns its id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContact {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tags:   Option<Vec<SharedPermission>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub write:  Option<bool>,
  #[serde(flatten)]
  pub fields: Fields,
}

impl NewContact {
  /// Attach `id`. A client-supplied `_id` is discarded.
  pub fn into_contact(mut self, id: String) -> Contact {
    self.fields.remove("_id");
    Contact { id, tags: self.tags, write: self.write, fields: self.fields }
  }
}

// ─── Notifications ───────────────────────────────────────────────────────────

/// An entry in a user's notification feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  /// `false` until the owner marks the feed read; never flips back.
  #[serde(default)]
  pub read:    bool,
  #[serde(flatten)]
  pub payload: Fields,
}

impl Notification {
  pub fn unread(payload: Fields) -> Self { Self { read: false, payload } }
}

/// The notifications field of a user record, as returned by the feed listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationFeed {
  pub notifications: Vec<Notification>,
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// One registered identity and everything it owns. Keyed by `email`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
  #[serde(rename = "_id")]
  pub id:                 Uuid,
  pub email:              String,
  #[serde(default)]
  pub name:               String,
  #[serde(default)]
  pub contacts:           Vec<Contact>,
  #[serde(default)]
  pub permitted_contacts: Vec<Contact>,
  #[serde(default)]
  pub notifications:      Vec<Notification>,
  /// Registration fields the service does not interpret (photo URL, etc.).
  #[serde(flatten)]
  pub profile:            Fields,
}

impl UserRecord {
  pub fn contact(&self, contact_id: &str) -> Option<&Contact> {
    self.contacts.iter().find(|c| c.id == contact_id)
  }

  pub fn permitted_contact(&self, contact_id: &str) -> Option<&Contact> {
    self.permitted_contacts.iter().find(|c| c.id == contact_id)
  }

  pub fn summary(&self) -> UserSummary {
    UserSummary {
      id:    self.id,
      name:  self.name.clone(),
      email: self.email.clone(),
    }
  }

  /// Serialise the whole record for storage as a single document.
  pub fn to_document(&self) -> Result<String> {
    Ok(serde_json::to_string(self)?)
  }

  pub fn from_document(document: &str) -> Result<Self> {
    Ok(serde_json::from_str(document)?)
  }
}

/// Registration payload. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub email:              String,
  #[serde(default)]
  pub name:               String,
  #[serde(default)]
  pub contacts:           Vec<Contact>,
  #[serde(default)]
  pub permitted_contacts: Vec<Contact>,
  #[serde(default)]
  pub notifications:      Vec<Notification>,
  #[serde(flatten)]
  pub profile:            Fields,
}

impl NewUser {
  /// Convenience constructor with empty sequences and no extra profile.
  pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      email:              email.into(),
      name:               name.into(),
      contacts:           Vec::new(),
      permitted_contacts: Vec::new(),
      notifications:      Vec::new(),
      profile:            Fields::new(),
    }
  }

  /// Attach `id`. A client-supplied `_id` is discarded.
  pub fn into_record(mut self, id: Uuid) -> UserRecord {
    self.profile.remove("_id");
    UserRecord {
      id,
      email: self.email,
      name: self.name,
      contacts: self.contacts,
      permitted_contacts: self.permitted_contacts,
      notifications: self.notifications,
      profile: self.profile,
    }
  }
}

/// Minimal projection used by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  #[serde(rename = "_id")]
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
  Created { inserted_id: Uuid },
  /// The email was already registered; nothing was written.
  Duplicate,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn contact_ids_are_twelve_chars_and_distinct() {
    let ids: Vec<_> = (0..64).map(|_| generate_contact_id()).collect();
    assert!(ids.iter().all(|id| id.len() == CONTACT_ID_LEN));
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
  }

  #[test]
  fn contact_keeps_opaque_fields() {
    let raw = json!({ "_id": "abc", "name": "Bob", "phone": "555" });
    let contact: Contact = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(contact.id, "abc");
    assert!(contact.tags.is_none());
    assert_eq!(serde_json::to_value(&contact).unwrap(), raw);
  }

  #[test]
  fn new_contact_discards_client_id() {
    let new: NewContact =
      serde_json::from_value(json!({ "_id": "forged", "name": "Bob" })).unwrap();
    let contact = new.into_contact("0123456789ab".into());
    let value = serde_json::to_value(&contact).unwrap();
    assert_eq!(value, json!({ "_id": "0123456789ab", "name": "Bob" }));
  }

  #[test]
  fn notification_read_defaults_to_false() {
    let n: Notification =
      serde_json::from_value(json!({ "message": "shared" })).unwrap();
    assert!(!n.read);
    assert_eq!(n.payload["message"], "shared");
  }

  #[test]
  fn tag_pattern_matches_on_any_fields() {
    let tag: SharedPermission = serde_json::from_value(
      json!({ "_id": "t1", "write": false, "email": "bob@x.com" }),
    )
    .unwrap();

    let by_email = json!({ "email": "bob@x.com" });
    let by_both = json!({ "_id": "t1", "write": false });
    let wrong = json!({ "_id": "t1", "write": true });

    assert!(tag.matches_pattern(by_email.as_object().unwrap()));
    assert!(tag.matches_pattern(by_both.as_object().unwrap()));
    assert!(!tag.matches_pattern(wrong.as_object().unwrap()));
  }

  #[test]
  fn tag_without_write_keeps_it_absent() {
    let tag: SharedPermission =
      serde_json::from_value(json!({ "_id": "t", "email": "b@x.com" })).unwrap();
    assert_eq!(tag.write, None);
    assert_eq!(
      serde_json::to_value(&tag).unwrap(),
      json!({ "_id": "t", "email": "b@x.com" })
    );

    let unset = json!({ "write": false });
    assert!(!tag.matches_pattern(unset.as_object().unwrap()));
  }

  #[test]
  fn user_document_roundtrip() {
    let mut user = NewUser::new("alice@x.com", "Alice");
    user.profile.insert("photo".into(), json!("a.png"));
    let record = user.into_record(Uuid::new_v4());

    let doc = record.to_document().unwrap();
    assert_eq!(UserRecord::from_document(&doc).unwrap(), record);
  }
}
