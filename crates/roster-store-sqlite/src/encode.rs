//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use roster_core::model::UserSummary;
use uuid::Uuid;

use crate::Result;

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

/// Wrap a document (de)serialisation failure so it can leave a
/// `tokio_rusqlite` closure.
pub fn call_error(e: roster_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Raw strings read from the directory columns of a `users` row.
pub struct RawSummary {
  pub user_id: String,
  pub name:    String,
  pub email:   String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<UserSummary> {
    Ok(UserSummary {
      id:    decode_uuid(&self.user_id)?,
      name:  self.name,
      email: self.email,
    })
  }
}
