//! Single-document updates.
//!
//! Every write the service performs is one [`UserUpdate`] applied to one user
//! record. An update first checks its element filter against the record
//! ([`UserUpdate::matches`]); if that passes, it mutates the nested sequences
//! in place. Backends persist the resulting document as a whole, so each
//! update is atomic at the document level.

use serde::{Deserialize, Serialize};

use crate::model::{Contact, Fields, Notification, SharedPermission, UserRecord};

// ─── Result ──────────────────────────────────────────────────────────────────

/// What an update did. A missing user or an unmatched element filter is not
/// an error; both report zero counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
  pub acknowledged:   bool,
  pub matched_count:  u64,
  pub modified_count: u64,
}

impl UpdateResult {
  /// No document satisfied the filter.
  pub const NO_MATCH: Self = Self {
    acknowledged:   true,
    matched_count:  0,
    modified_count: 0,
  };

  pub fn matched(modified: bool) -> Self {
    Self {
      acknowledged:   true,
      matched_count:  1,
      modified_count: u64::from(modified),
    }
  }

  pub fn is_modified(&self) -> bool { self.modified_count > 0 }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// A mutation of one user record.
#[derive(Debug, Clone, PartialEq)]
pub enum UserUpdate {
  // ── Owned contacts ────────────────────────────────────────────────────
  /// Append to `contacts`.
  PushContact(Contact),
  /// Replace the first contact with the same `_id`, keeping its position.
  ReplaceContact(Contact),
  /// Remove every contact with this `_id`.
  PullContact { contact_id: String },

  // ── Tags on owned contacts ────────────────────────────────────────────
  /// Append a tag to the first contact with `contact_id`.
  PushTag {
    contact_id: String,
    tag:        SharedPermission,
  },
  /// Set `write` on every tag with `tag_id` inside the first contact with
  /// `contact_id` that carries such a tag.
  SetTagWrite {
    contact_id: String,
    tag_id:     String,
    write:      bool,
  },
  /// Remove every tag matching all fields of `pattern` from the first
  /// contact with `contact_id`.
  PullTags {
    contact_id: String,
    pattern:    Fields,
  },

  // ── Permitted contacts ────────────────────────────────────────────────
  /// Append each contact to `permittedContacts`, in order.
  PushPermittedContacts(Vec<Contact>),
  /// Replace the first permitted contact with the same `_id`.
  ReplacePermittedContact(Contact),
  /// Set only `write` on the first permitted contact with `contact_id`.
  SetPermittedWrite { contact_id: String, write: bool },
  /// Remove every permitted contact with this `_id`.
  PullPermittedContact { contact_id: String },

  // ── Notifications ─────────────────────────────────────────────────────
  PushNotification(Notification),
  /// Flip every unread notification to read.
  MarkNotificationsRead,
}

impl UserUpdate {
  /// Whether `user` satisfies this update's element filter. Updates without
  /// one match any existing record.
  pub fn matches(&self, user: &UserRecord) -> bool {
    match self {
      Self::ReplaceContact(c) => user.contact(&c.id).is_some(),
      Self::PushTag { contact_id, .. } | Self::PullTags { contact_id, .. } => {
        user.contact(contact_id).is_some()
      }
      Self::SetTagWrite { contact_id, tag_id, .. } => {
        tagged_contact(&user.contacts, contact_id, tag_id).is_some()
      }
      Self::ReplacePermittedContact(c) => user.permitted_contact(&c.id).is_some(),
      Self::SetPermittedWrite { contact_id, .. } => {
        user.permitted_contact(contact_id).is_some()
      }
      Self::PushContact(_)
      | Self::PullContact { .. }
      | Self::PushPermittedContacts(_)
      | Self::PullPermittedContact { .. }
      | Self::PushNotification(_)
      | Self::MarkNotificationsRead => true,
    }
  }

  /// Mutate `user` in place. Callers check [`Self::matches`] first.
  fn mutate(self, user: &mut UserRecord) {
    match self {
      Self::PushContact(contact) => user.contacts.push(contact),
      Self::ReplaceContact(contact) => {
        if let Some(slot) = first_mut(&mut user.contacts, &contact.id) {
          *slot = contact;
        }
      }
      Self::PullContact { contact_id } => {
        user.contacts.retain(|c| c.id != contact_id);
      }
      Self::PushTag { contact_id, tag } => {
        if let Some(contact) = first_mut(&mut user.contacts, &contact_id) {
          contact.tags.get_or_insert_with(Vec::new).push(tag);
        }
      }
      Self::SetTagWrite { contact_id, tag_id, write } => {
        if let Some(i) = tagged_contact(&user.contacts, &contact_id, &tag_id) {
          let tags = user.contacts[i].tags.iter_mut().flatten();
          tags.filter(|t| t.id == tag_id).for_each(|t| t.write = Some(write));
        }
      }
      Self::PullTags { contact_id, pattern } => {
        if let Some(tags) =
          first_mut(&mut user.contacts, &contact_id).and_then(|c| c.tags.as_mut())
        {
          tags.retain(|t| !t.matches_pattern(&pattern));
        }
      }
      Self::PushPermittedContacts(contacts) => {
        user.permitted_contacts.extend(contacts);
      }
      Self::ReplacePermittedContact(contact) => {
        if let Some(slot) = first_mut(&mut user.permitted_contacts, &contact.id) {
          *slot = contact;
        }
      }
      Self::SetPermittedWrite { contact_id, write } => {
        if let Some(contact) = first_mut(&mut user.permitted_contacts, &contact_id) {
          contact.write = Some(write);
        }
      }
      Self::PullPermittedContact { contact_id } => {
        user.permitted_contacts.retain(|c| c.id != contact_id);
      }
      Self::PushNotification(notification) => user.notifications.push(notification),
      Self::MarkNotificationsRead => {
        user
          .notifications
          .iter_mut()
          .filter(|n| !n.read)
          .for_each(|n| n.read = true);
      }
    }
  }
}

impl UserRecord {
  /// Apply `update` and report the effect the way the document store does:
  /// matched when the filter holds, modified only when the record changed.
  pub fn apply(&mut self, update: UserUpdate) -> UpdateResult {
    if !update.matches(self) {
      return UpdateResult::NO_MATCH;
    }
    let before = self.clone();
    update.mutate(self);
    UpdateResult::matched(*self != before)
  }
}

fn first_mut<'a>(contacts: &'a mut [Contact], id: &str) -> Option<&'a mut Contact> {
  contacts.iter_mut().find(|c| c.id == id)
}

/// Index of the first contact with `contact_id` that carries a tag `tag_id`.
fn tagged_contact(contacts: &[Contact], contact_id: &str, tag_id: &str) -> Option<usize> {
  contacts.iter().position(|c| {
    c.id == contact_id && c.tags.iter().flatten().any(|t| t.id == tag_id)
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use uuid::Uuid;

  use super::*;
  use crate::model::NewUser;

  fn contact(id: &str, name: &str) -> Contact {
    serde_json::from_value(json!({ "_id": id, "name": name })).unwrap()
  }

  fn tag(id: &str, write: bool) -> SharedPermission {
    serde_json::from_value(json!({ "_id": id, "write": write })).unwrap()
  }

  fn user_with(contacts: &[(&str, &str)]) -> UserRecord {
    let mut user = NewUser::new("alice@x.com", "Alice");
    user.contacts = contacts.iter().map(|(id, n)| contact(id, n)).collect();
    user.into_record(Uuid::new_v4())
  }

  fn ids(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|c| c.id.as_str()).collect()
  }

  // ─── Owned contacts ──────────────────────────────────────────────────────

  #[test]
  fn replace_contact_keeps_position() {
    let mut user = user_with(&[("a", "Ann"), ("b", "Ben"), ("c", "Cat")]);
    let result = user.apply(UserUpdate::ReplaceContact(contact("b", "Benjamin")));

    assert_eq!(result, UpdateResult::matched(true));
    assert_eq!(ids(&user.contacts), ["a", "b", "c"]);
    assert_eq!(user.contacts[1].fields["name"], "Benjamin");
  }

  #[test]
  fn replace_unknown_contact_is_a_no_op() {
    let mut user = user_with(&[("a", "Ann")]);
    let before = user.clone();
    let result = user.apply(UserUpdate::ReplaceContact(contact("zz", "Nobody")));

    assert_eq!(result, UpdateResult::NO_MATCH);
    assert_eq!(user, before);
  }

  #[test]
  fn replacing_with_identical_contact_is_not_a_modification() {
    let mut user = user_with(&[("a", "Ann")]);
    let result = user.apply(UserUpdate::ReplaceContact(contact("a", "Ann")));
    assert_eq!(result, UpdateResult::matched(false));
  }

  #[test]
  fn pull_contact_removes_only_the_match() {
    let mut user = user_with(&[("a", "Ann"), ("b", "Ben"), ("c", "Cat")]);
    let result = user.apply(UserUpdate::PullContact { contact_id: "b".into() });

    assert!(result.is_modified());
    assert_eq!(ids(&user.contacts), ["a", "c"]);
  }

  #[test]
  fn pull_missing_contact_matches_but_does_not_modify() {
    let mut user = user_with(&[("a", "Ann")]);
    let result = user.apply(UserUpdate::PullContact { contact_id: "x".into() });
    assert_eq!(result, UpdateResult::matched(false));
  }

  // ─── Tags ────────────────────────────────────────────────────────────────

  #[test]
  fn push_tag_creates_tag_list() {
    let mut user = user_with(&[("a", "Ann")]);
    let result = user.apply(UserUpdate::PushTag {
      contact_id: "a".into(),
      tag:        tag("t1", false),
    });

    assert!(result.is_modified());
    assert_eq!(user.contacts[0].tags.as_deref(), Some(&[tag("t1", false)][..]));
  }

  #[test]
  fn set_tag_write_touches_only_the_named_tag() {
    let mut user = user_with(&[("a", "Ann")]);
    user.contacts[0].tags = Some(vec![tag("t1", false), tag("t2", false)]);

    let result = user.apply(UserUpdate::SetTagWrite {
      contact_id: "a".into(),
      tag_id:     "t2".into(),
      write:      true,
    });

    assert!(result.is_modified());
    let tags = user.contacts[0].tags.as_ref().unwrap();
    assert_eq!(tags[0].write, Some(false));
    assert_eq!(tags[1].write, Some(true));
  }

  #[test]
  fn set_tag_write_without_matching_tag_is_unmatched() {
    let mut user = user_with(&[("a", "Ann")]);
    user.contacts[0].tags = Some(vec![tag("t1", false)]);

    let result = user.apply(UserUpdate::SetTagWrite {
      contact_id: "a".into(),
      tag_id:     "nope".into(),
      write:      true,
    });
    assert_eq!(result, UpdateResult::NO_MATCH);
  }

  #[test]
  fn pull_tags_by_field_pattern() {
    let mut user = user_with(&[("a", "Ann")]);
    let shared_with_bob: SharedPermission = serde_json::from_value(
      json!({ "_id": "t1", "write": true, "email": "bob@x.com" }),
    )
    .unwrap();
    user.contacts[0].tags = Some(vec![shared_with_bob, tag("t2", false)]);

    let pattern = json!({ "email": "bob@x.com" });
    let result = user.apply(UserUpdate::PullTags {
      contact_id: "a".into(),
      pattern:    pattern.as_object().unwrap().clone(),
    });

    assert!(result.is_modified());
    assert_eq!(user.contacts[0].tags.as_deref(), Some(&[tag("t2", false)][..]));
  }

  #[test]
  fn pull_tags_ignores_tags_missing_the_pattern_field() {
    let mut user = user_with(&[("a", "Ann")]);
    let bare: SharedPermission =
      serde_json::from_value(json!({ "_id": "t", "email": "b@x.com" })).unwrap();
    user.contacts[0].tags = Some(vec![bare.clone()]);

    let pattern = json!({ "write": false });
    let result = user.apply(UserUpdate::PullTags {
      contact_id: "a".into(),
      pattern:    pattern.as_object().unwrap().clone(),
    });

    assert_eq!(result, UpdateResult::matched(false));
    assert_eq!(user.contacts[0].tags.as_deref(), Some(&[bare][..]));
  }

  // ─── Permitted contacts ──────────────────────────────────────────────────

  #[test]
  fn set_permitted_write_changes_only_write() {
    let mut user = user_with(&[]);
    user.permitted_contacts = vec![contact("p", "Pat")];

    let result = user.apply(UserUpdate::SetPermittedWrite {
      contact_id: "p".into(),
      write:      true,
    });

    assert!(result.is_modified());
    assert_eq!(user.permitted_contacts[0].write, Some(true));
    assert_eq!(user.permitted_contacts[0].fields["name"], "Pat");
  }

  #[test]
  fn owned_and_permitted_ids_are_separate_namespaces() {
    let mut user = user_with(&[("same", "Owned")]);
    user.permitted_contacts = vec![contact("same", "Shared")];

    user.apply(UserUpdate::PullPermittedContact { contact_id: "same".into() });

    assert!(user.permitted_contacts.is_empty());
    assert_eq!(ids(&user.contacts), ["same"]);
  }

  // ─── Notifications ───────────────────────────────────────────────────────

  #[test]
  fn mark_read_is_idempotent() {
    let mut user = user_with(&[]);
    let mut seen = Notification::unread(Fields::new());
    seen.read = true;
    user.notifications = vec![Notification::unread(Fields::new()), seen];

    let first = user.apply(UserUpdate::MarkNotificationsRead);
    let second = user.apply(UserUpdate::MarkNotificationsRead);

    assert_eq!(first, UpdateResult::matched(true));
    assert_eq!(second, UpdateResult::matched(false));
    assert!(user.notifications.iter().all(|n| n.read));
  }
}
