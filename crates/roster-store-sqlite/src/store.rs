//! [`SqliteStore`]: the SQLite implementation of [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use roster_core::{
  model::{NewUser, Registration, UserRecord, UserSummary},
  store::UserStore,
  update::{UpdateResult, UserUpdate},
};

use crate::{
  Result,
  encode::{RawSummary, call_error, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster user store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. Open it once
/// at startup and share it.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = crate::Error;

  async fn list_users(&self) -> Result<Vec<UserSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT user_id, name, email FROM users ORDER BY name ASC")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSummary {
              user_id: row.get(0)?,
              name:    row.get(1)?,
              email:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn find_user<'a>(&'a self, email: &'a str) -> Result<Option<UserRecord>> {
    let email = email.to_owned();

    let document: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT document FROM users WHERE email = ?1",
            rusqlite::params![email],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(document.as_deref().map(UserRecord::from_document).transpose()?)
  }

  async fn insert_user(&self, user: NewUser) -> Result<Registration> {
    let record   = user.into_record(Uuid::new_v4());
    let id_str   = encode_uuid(record.id);
    let email    = record.email.clone();
    let name     = record.name.clone();
    let at_str   = encode_dt(Utc::now());
    let document = record.to_document()?;

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if exists {
          return Ok(false);
        }

        tx.execute(
          "INSERT INTO users (user_id, email, name, created_at, document)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, name, at_str, document],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(if inserted {
      Registration::Created { inserted_id: record.id }
    } else {
      Registration::Duplicate
    })
  }

  async fn update_user<'a>(
    &'a self,
    email:  &'a str,
    update: UserUpdate,
  ) -> Result<UpdateResult> {
    let email = email.to_owned();

    // Read, mutate and write back inside one immediate transaction so the
    // whole document is replaced atomically.
    let result = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let document: Option<String> = tx
          .query_row(
            "SELECT document FROM users WHERE email = ?1",
            rusqlite::params![email],
            |row| row.get(0),
          )
          .optional()?;

        let Some(document) = document else {
          return Ok(UpdateResult::NO_MATCH);
        };

        let mut user = UserRecord::from_document(&document).map_err(call_error)?;
        let result = user.apply(update);

        if result.is_modified() {
          let document = user.to_document().map_err(call_error)?;
          tx.execute(
            "UPDATE users SET document = ?1 WHERE email = ?2",
            rusqlite::params![document, email],
          )?;
          tx.commit()?;
        }

        Ok(result)
      })
      .await?;

    Ok(result)
  }
}
