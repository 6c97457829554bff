//! [`SqliteStore`] — the SQLite implementation of [`Repository`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use folio_core::{
  content::{Content, ContentFields, ContentId},
  filter::{ContentFilter, Page, Pagination},
  store::{self, Repository},
  user::{User, UserFields, UserId},
};

use crate::{
  Result,
  encode::{
    CONTENT_COLUMNS, RawContent, RawUser, USER_COLUMNS, encode_dt, inserted_content_id,
    inserted_user_id,
  },
  schema::SCHEMA,
};

/// `?1` is the content type, `?2` the author; either may be NULL.
const CONTENT_FILTER: &str = "WHERE deleted_at IS NULL
   AND (?1 IS NULL OR content_type = ?1)
   AND (?2 IS NULL OR author = ?2)";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
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

fn offset_param(page: &Pagination) -> i64 { i64::try_from(page.offset).unwrap_or(i64::MAX) }

fn count(total: i64) -> u64 { u64::try_from(total).unwrap_or_default() }

/// The `updated_at` for the next write to an active row, derived from the
/// stored value rather than the caller's snapshot. `None` if the row is not
/// active. `table` is one of the fixed table names.
fn next_stamp(
  conn: &rusqlite::Connection,
  table: &str,
  id: i64,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
  let stored: Option<String> = conn
    .query_row(
      &format!("SELECT updated_at FROM {table} WHERE id = ?1 AND deleted_at IS NULL"),
      rusqlite::params![id],
      |r| r.get(0),
    )
    .optional()?;

  stored
    .map(|raw| -> rusqlite::Result<DateTime<Utc>> {
      let previous = DateTime::parse_from_rfc3339(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
      })?;
      Ok(store::next_update_time(previous.with_timezone(&Utc)))
    })
    .transpose()
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteStore {
  type Error = crate::Error;

  // ── Contents ──────────────────────────────────────────────────────────────

  async fn create_content(&self, fields: ContentFields) -> Result<Content> {
    let now = store::now();
    let at_str = encode_dt(now);

    let (raw_id, fields) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contents (title, body, content_type, author, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![
            fields.title(),
            fields.body(),
            fields.content_type().as_str(),
            fields.author(),
            at_str,
          ],
        )?;
        Ok((conn.last_insert_rowid(), fields))
      })
      .await?;

    Ok(Content::new(inserted_content_id(raw_id)?, fields, now, now))
  }

  async fn get_content(&self, id: ContentId) -> Result<Option<Content>> {
    let raw: Option<RawContent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {CONTENT_COLUMNS} FROM contents WHERE id = ?1 AND deleted_at IS NULL"
            ),
            rusqlite::params![id.get()],
            RawContent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContent::into_content).transpose()
  }

  async fn list_contents<'a>(&'a self, filter: &'a ContentFilter) -> Result<Page<Content>> {
    let kind = filter.content_type.map(|k| k.as_str());
    let author = filter.author.clone();
    let limit = i64::from(filter.page.limit);
    let offset = offset_param(&filter.page);

    let (total, raws): (i64, Vec<RawContent>) = self
      .conn
      .call(move |conn| {
        let total = conn.query_row(
          &format!("SELECT COUNT(*) FROM contents {CONTENT_FILTER}"),
          rusqlite::params![kind, author],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {CONTENT_COLUMNS} FROM contents {CONTENT_FILTER}
           ORDER BY created_at DESC, id DESC
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![kind, author, limit, offset],
            RawContent::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    Ok(Page {
      items: raws
        .into_iter()
        .map(RawContent::into_content)
        .collect::<Result<_>>()?,
      total: count(total),
    })
  }

  async fn update_content<'a>(&'a self, content: &'a Content) -> Result<Option<Content>> {
    let fields = content.fields().clone();
    let id = content.id;

    let (updated_at, fields) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(updated_at) = next_stamp(&tx, "contents", id.get())? else {
          return Ok((None, fields));
        };
        tx.execute(
          "UPDATE contents
           SET title = ?1, body = ?2, content_type = ?3, author = ?4, updated_at = ?5
           WHERE id = ?6 AND deleted_at IS NULL",
          rusqlite::params![
            fields.title(),
            fields.body(),
            fields.content_type().as_str(),
            fields.author(),
            encode_dt(updated_at),
            id.get(),
          ],
        )?;
        tx.commit()?;
        Ok((Some(updated_at), fields))
      })
      .await?;

    Ok(updated_at.map(|at| Content::new(id, fields, content.created_at, at)))
  }

  async fn delete_content(&self, id: ContentId) -> Result<bool> {
    let at_str = encode_dt(store::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE contents SET deleted_at = ?1, updated_at = ?1
           WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![at_str, id.get()],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, fields: UserFields) -> Result<User> {
    let now = store::now();
    let at_str = encode_dt(now);

    let (raw_id, fields) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (name, email, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![fields.name(), fields.email(), at_str],
        )?;
        Ok((conn.last_insert_rowid(), fields))
      })
      .await?;

    Ok(User::new(inserted_user_id(raw_id)?, fields, now, now))
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1 AND deleted_at IS NULL"),
            rusqlite::params![id.get()],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users<'a>(&'a self, page: &'a Pagination) -> Result<Page<User>> {
    let limit = i64::from(page.limit);
    let offset = offset_param(page);

    let (total, raws): (i64, Vec<RawUser>) = self
      .conn
      .call(move |conn| {
        let total = conn.query_row(
          "SELECT COUNT(*) FROM users WHERE deleted_at IS NULL",
          [],
          |r| r.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL
           ORDER BY created_at DESC, id DESC
           LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    Ok(Page {
      items: raws.into_iter().map(RawUser::into_user).collect::<Result<_>>()?,
      total: count(total),
    })
  }

  async fn update_user<'a>(&'a self, user: &'a User) -> Result<Option<User>> {
    let fields = user.fields().clone();
    let id = user.id;

    let (updated_at, fields) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(updated_at) = next_stamp(&tx, "users", id.get())? else {
          return Ok((None, fields));
        };
        tx.execute(
          "UPDATE users SET name = ?1, email = ?2, updated_at = ?3
           WHERE id = ?4 AND deleted_at IS NULL",
          rusqlite::params![fields.name(), fields.email(), encode_dt(updated_at), id.get()],
        )?;
        tx.commit()?;
        Ok((Some(updated_at), fields))
      })
      .await?;

    Ok(updated_at.map(|at| User::new(id, fields, user.created_at, at)))
  }

  async fn delete_user(&self, id: UserId) -> Result<bool> {
    let at_str = encode_dt(store::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET deleted_at = ?1, updated_at = ?1
           WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![at_str, id.get()],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn email_taken<'a>(
    &'a self,
    email: &'a str,
    excluding: Option<UserId>,
  ) -> Result<bool> {
    let email = email.to_owned();
    let excluding = excluding.map(UserId::get);

    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (
             SELECT 1 FROM users
             WHERE email = ?1 AND deleted_at IS NULL
               AND (?2 IS NULL OR id != ?2)
           )",
          rusqlite::params![email, excluding],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(taken)
  }

  // ── Health ────────────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
