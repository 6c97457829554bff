//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision, so lexical order equals chronological order. Rows read back are
//! re-validated through the domain constructors.

use chrono::{DateTime, SecondsFormat, Utc};
use folio_core::{
  content::{Content, ContentFields, ContentId},
  user::{User, UserFields, UserId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawContent::from_row`].
pub const CONTENT_COLUMNS: &str =
  "id, title, body, content_type, author, created_at, updated_at";

/// Raw values read directly from a `contents` row.
pub struct RawContent {
  pub id:           i64,
  pub title:        String,
  pub body:         String,
  pub content_type: String,
  pub author:       String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawContent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      title:        row.get(1)?,
      body:         row.get(2)?,
      content_type: row.get(3)?,
      author:       row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_content(self) -> Result<Content> {
    let corrupt = |reason| Error::Corrupt { table: "contents", id: self.id, reason };
    let id = ContentId::new(self.id).map_err(corrupt)?;
    let fields =
      ContentFields::new(&self.title, &self.body, &self.content_type, &self.author)
        .map_err(corrupt)?;

    Ok(Content::new(
      id,
      fields,
      decode_dt(&self.created_at)?,
      decode_dt(&self.updated_at)?,
    ))
  }
}

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      created_at: row.get(3)?,
      updated_at: row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    let corrupt = |reason| Error::Corrupt { table: "users", id: self.id, reason };
    let id = UserId::new(self.id).map_err(corrupt)?;
    let fields = UserFields::new(&self.name, &self.email).map_err(corrupt)?;

    Ok(User::new(
      id,
      fields,
      decode_dt(&self.created_at)?,
      decode_dt(&self.updated_at)?,
    ))
  }
}

/// Ids returned by `last_insert_rowid` are always positive for
/// `AUTOINCREMENT` tables.
pub fn inserted_content_id(raw: i64) -> Result<ContentId> {
  ContentId::new(raw).map_err(|reason| Error::Corrupt { table: "contents", id: raw, reason })
}

pub fn inserted_user_id(raw: i64) -> Result<UserId> {
  UserId::new(raw).map_err(|reason| Error::Corrupt { table: "users", id: raw, reason })
}
