//! Integration tests for `SqliteStore` against an in-memory database.

use folio_core::{
  content::{ContentFields, ContentId, ContentPatch, ContentType},
  filter::{ContentFilter, ContentQuery, PageLimits, Pagination},
  store::{BackendError as _, Repository},
  user::{UserFields, UserId, UserPatch},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn content(title: &str, kind: &str, author: &str) -> ContentFields {
  ContentFields::new(title, "Body text", kind, author).unwrap()
}

fn user(name: &str, email: &str) -> UserFields { UserFields::new(name, email).unwrap() }

fn filter(query: ContentQuery) -> ContentFilter {
  ContentFilter::build(&query, &PageLimits::default()).unwrap()
}

// ─── Contents ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_id_and_equal_timestamps() {
  let s = store().await;

  let c = s.create_content(content("T", "article", "A")).await.unwrap();
  assert!(c.id.get() > 0);
  assert_eq!(c.created_at, c.updated_at);
  assert_eq!(c.title(), "T");
  assert_eq!(c.content_type(), ContentType::Article);

  let second = s.create_content(content("U", "blog", "A")).await.unwrap();
  assert!(second.id > c.id);
}

#[tokio::test]
async fn create_and_get_roundtrip() {
  let s = store().await;
  let created = s.create_content(content("Hello", "news", "Ann")).await.unwrap();

  let fetched = s.get_content(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let result = s.get_content(ContentId::new(999).unwrap()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_persists_fields_and_advances_updated_at() {
  let s = store().await;
  let mut c = s.create_content(content("Old", "page", "A")).await.unwrap();

  c.apply(&ContentPatch { title: Some("New".into()), ..ContentPatch::default() })
    .unwrap();
  let stored = s.update_content(&c).await.unwrap().unwrap();

  assert_eq!(stored.title(), "New");
  assert_eq!(stored.created_at, c.created_at);
  assert!(stored.updated_at > c.updated_at);

  let fetched = s.get_content(c.id).await.unwrap().unwrap();
  assert_eq!(fetched, stored);
}

#[tokio::test]
async fn unchanged_update_still_advances_updated_at() {
  let s = store().await;
  let c = s.create_content(content("Same", "page", "A")).await.unwrap();

  let once = s.update_content(&c).await.unwrap().unwrap();
  let twice = s.update_content(&once).await.unwrap().unwrap();

  assert_eq!(once.fields(), c.fields());
  assert!(once.updated_at > c.updated_at);
  assert!(twice.updated_at > once.updated_at);
}

#[tokio::test]
async fn update_from_stale_snapshot_never_moves_updated_at_back() {
  let s = store().await;
  let stale = s.create_content(content("T", "blog", "A")).await.unwrap();

  // Another writer got there first and stamped a much later time.
  let later = "2999-01-01T00:00:00.000000Z";
  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE contents SET updated_at = ?1 WHERE id = ?2",
        rusqlite::params![later, stale.id.get()],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let stored = s.update_content(&stale).await.unwrap().unwrap();
  assert!(stored.updated_at > crate::encode::decode_dt(later).unwrap());

  let fetched = s.get_content(stale.id).await.unwrap().unwrap();
  assert_eq!(fetched.updated_at, stored.updated_at);
}

#[tokio::test]
async fn stale_user_update_is_stamped_after_stored_time() {
  let s = store().await;
  let stale = s.create_user(user("Taro", "taro@example.com")).await.unwrap();
  let fresh = s.update_user(&stale).await.unwrap().unwrap();

  let again = s.update_user(&stale).await.unwrap().unwrap();
  assert!(again.updated_at > fresh.updated_at);
}

#[tokio::test]
async fn soft_delete_hides_content() {
  let s = store().await;
  let keep = s.create_content(content("Keep", "blog", "A")).await.unwrap();
  let gone = s.create_content(content("Gone", "blog", "A")).await.unwrap();

  assert!(s.delete_content(gone.id).await.unwrap());
  assert!(s.get_content(gone.id).await.unwrap().is_none());

  let page = s.list_contents(&filter(ContentQuery::default())).await.unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].id, keep.id);

  // A deleted record can be neither deleted nor updated again.
  assert!(!s.delete_content(gone.id).await.unwrap());
  assert!(s.update_content(&gone).await.unwrap().is_none());
}

#[tokio::test]
async fn list_filters_by_type_and_author() {
  let s = store().await;
  s.create_content(content("1", "article", "Alice")).await.unwrap();
  s.create_content(content("2", "blog", "Alice")).await.unwrap();
  s.create_content(content("3", "article", "Bob")).await.unwrap();

  let articles = s
    .list_contents(&filter(ContentQuery {
      content_type: Some("article".into()),
      ..ContentQuery::default()
    }))
    .await
    .unwrap();
  assert_eq!(articles.total, 2);
  assert!(articles.items.iter().all(|c| c.content_type() == ContentType::Article));

  let alice_articles = s
    .list_contents(&filter(ContentQuery {
      content_type: Some("article".into()),
      author: Some("Alice".into()),
      ..ContentQuery::default()
    }))
    .await
    .unwrap();
  assert_eq!(alice_articles.total, 1);
  assert_eq!(alice_articles.items[0].title(), "1");
}

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  for title in ["first", "second", "third"] {
    s.create_content(content(title, "news", "A")).await.unwrap();
  }

  let page = s.list_contents(&filter(ContentQuery::default())).await.unwrap();
  let titles: Vec<_> = page.items.iter().map(|c| c.title()).collect();
  assert_eq!(titles, ["third", "second", "first"]);
}

#[tokio::test]
async fn pagination_counts() {
  let s = store().await;
  let n = 7;
  for i in 0..n {
    s.create_content(content(&format!("c{i}"), "page", "A")).await.unwrap();
  }

  for (limit, offset) in [(3, 0), (3, 6), (10, 0), (2, 7), (5, 20)] {
    let page = s
      .list_contents(&filter(ContentQuery {
        limit: Some(limit),
        offset: Some(offset),
        ..ContentQuery::default()
      }))
      .await
      .unwrap();

    let expected = limit.min((n - offset).max(0));
    assert_eq!(page.items.len() as i64, expected, "limit={limit} offset={offset}");
    assert_eq!(page.total, n as u64);
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_active_email_is_a_unique_violation() {
  let s = store().await;
  s.create_user(user("Taro", "taro@example.com")).await.unwrap();

  let err = s
    .create_user(user("Other", "taro@example.com"))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation(), "unexpected error: {err}");
}

#[tokio::test]
async fn email_can_be_reused_after_soft_delete() {
  let s = store().await;
  let first = s.create_user(user("Taro", "taro@example.com")).await.unwrap();
  assert!(s.delete_user(first.id).await.unwrap());

  assert!(!s.email_taken("taro@example.com", None).await.unwrap());
  let second = s.create_user(user("Taro", "taro@example.com")).await.unwrap();
  assert_ne!(second.id, first.id);
  assert!(s.get_user(first.id).await.unwrap().is_none());
}

#[tokio::test]
async fn email_taken_excludes_given_user() {
  let s = store().await;
  let taro = s.create_user(user("Taro", "taro@example.com")).await.unwrap();

  assert!(s.email_taken("taro@example.com", None).await.unwrap());
  assert!(!s.email_taken("taro@example.com", Some(taro.id)).await.unwrap());
  assert!(
    s.email_taken("taro@example.com", Some(UserId::new(taro.id.get() + 1).unwrap()))
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn update_user_into_taken_email_is_a_unique_violation() {
  let s = store().await;
  s.create_user(user("A", "a@example.com")).await.unwrap();
  let mut b = s.create_user(user("B", "b@example.com")).await.unwrap();

  b.apply(&UserPatch { email: Some("a@example.com".into()), name: None })
    .unwrap();
  let err = s.update_user(&b).await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn list_users_excludes_deleted() {
  let s = store().await;
  let a = s.create_user(user("A", "a@example.com")).await.unwrap();
  s.create_user(user("B", "b@example.com")).await.unwrap();
  s.create_user(user("C", "c@example.com")).await.unwrap();
  s.delete_user(a.id).await.unwrap();

  let page = s
    .list_users(&Pagination { limit: 1, offset: 0 })
    .await
    .unwrap();
  assert_eq!(page.total, 2);
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].name(), "C");
}

#[tokio::test]
async fn ping_succeeds() {
  let s = store().await;
  s.ping().await.unwrap();
}
