//! Filter Builder — turns optional query parameters into the bounded,
//! defaulted filters that list operations hand to the store verbatim.

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{
  content::{AUTHOR_MAX_CHARS, ContentType},
  error::ValidationError,
  text::{normalize, within},
};

// ─── Limits ──────────────────────────────────────────────────────────────────

/// Page-size policy, fixed at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageLimits {
  /// Used when `limit` is absent or not positive.
  pub default_limit: u32,
  /// Larger requested limits are clamped down to this value.
  pub max_limit:     u32,
}

impl Default for PageLimits {
  fn default() -> Self { Self { default_limit: 20, max_limit: 100 } }
}

impl PageLimits {
  /// `true` if the policy can produce a usable page size.
  pub fn is_consistent(&self) -> bool {
    self.default_limit >= 1 && self.default_limit <= self.max_limit
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Effective limit and offset of a list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
  pub limit:  u32,
  pub offset: u64,
}

impl Pagination {
  /// Apply defaults and the upper bound. Never fails: out-of-range values
  /// are replaced, not rejected.
  pub fn resolve(limit: Option<i64>, offset: Option<i64>, limits: &PageLimits) -> Self {
    let limit = match limit {
      Some(l) if l > 0 => u32::try_from(l)
        .unwrap_or(u32::MAX)
        .min(limits.max_limit),
      _ => limits.default_limit,
    };
    let offset = offset
      .and_then(|o| u64::try_from(o).ok())
      .unwrap_or(0);
    Self { limit, offset }
  }
}

// ─── Content filter ──────────────────────────────────────────────────────────

/// Raw list parameters for contents, as they arrive from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
  pub content_type: Option<String>,
  pub author:       Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub limit:        Option<i64>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub offset:       Option<i64>,
}

/// Validated list filter for contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
  pub content_type: Option<ContentType>,
  /// Exact match on the stored (trimmed) author.
  pub author:       Option<String>,
  pub page:         Pagination,
}

impl ContentFilter {
  /// Validate `query` and apply pagination defaults. Blank `content_type` or
  /// `author` values count as absent.
  pub fn build(query: &ContentQuery, limits: &PageLimits) -> Result<Self, ValidationError> {
    let content_type = non_blank(query.content_type.as_deref())
      .map(|raw| ContentType::parse(&raw))
      .transpose()?;

    let author = non_blank(query.author.as_deref());
    if let Some(a) = &author
      && !within(a, 1, AUTHOR_MAX_CHARS)
    {
      return Err(ValidationError::InvalidAuthor);
    }

    Ok(Self {
      content_type,
      author,
      page: Pagination::resolve(query.limit, query.offset, limits),
    })
  }
}

// ─── User filter ─────────────────────────────────────────────────────────────

/// Raw list parameters for users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
  #[serde(default, deserialize_with = "blank_as_none")]
  pub limit:  Option<i64>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub offset: Option<i64>,
}

impl UserQuery {
  pub fn pagination(&self, limits: &PageLimits) -> Pagination {
    Pagination::resolve(self.limit, self.offset, limits)
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One page of a list query as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// Matching active rows, ignoring limit and offset.
  pub total: u64,
}

/// A page together with the pagination that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing<T> {
  pub items:  Vec<T>,
  pub total:  u64,
  pub limit:  u32,
  pub offset: u64,
}

impl<T> Listing<T> {
  pub fn new(page: Page<T>, pagination: Pagination) -> Self {
    Self {
      items:  page.items,
      total:  page.total,
      limit:  pagination.limit,
      offset: pagination.offset,
    }
  }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
  raw.map(normalize).filter(|s| !s.is_empty())
}

/// Query-string integer where an empty value (`?limit=`) counts as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(raw) => raw
      .parse()
      .map(Some)
      .map_err(|_| de::Error::custom(format!("expected an integer, got {raw:?}"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const LIMITS: PageLimits = PageLimits { default_limit: 20, max_limit: 100 };

  #[test]
  fn pagination_defaults() {
    assert_eq!(
      Pagination::resolve(None, None, &LIMITS),
      Pagination { limit: 20, offset: 0 }
    );
    assert_eq!(Pagination::resolve(Some(0), Some(-5), &LIMITS).limit, 20);
    assert_eq!(Pagination::resolve(Some(-1), Some(-5), &LIMITS).offset, 0);
  }

  #[test]
  fn pagination_clamps_to_max() {
    assert_eq!(Pagination::resolve(Some(150), None, &LIMITS).limit, 100);
    assert_eq!(Pagination::resolve(Some(100), None, &LIMITS).limit, 100);
    assert_eq!(Pagination::resolve(Some(i64::MAX), None, &LIMITS).limit, 100);
    assert_eq!(Pagination::resolve(Some(1), Some(7), &LIMITS), Pagination {
      limit:  1,
      offset: 7,
    });
  }

  #[test]
  fn content_filter_parses_type_and_author() {
    let q = ContentQuery {
      content_type: Some(" news ".into()),
      author: Some(" Alice ".into()),
      limit: Some(5),
      offset: Some(10),
    };
    let f = ContentFilter::build(&q, &LIMITS).unwrap();
    assert_eq!(f.content_type, Some(ContentType::News));
    assert_eq!(f.author.as_deref(), Some("Alice"));
    assert_eq!(f.page, Pagination { limit: 5, offset: 10 });
  }

  #[test]
  fn content_filter_treats_blank_as_absent() {
    let q = ContentQuery {
      content_type: Some("  ".into()),
      author: Some(String::new()),
      ..ContentQuery::default()
    };
    let f = ContentFilter::build(&q, &LIMITS).unwrap();
    assert_eq!(f.content_type, None);
    assert_eq!(f.author, None);
  }

  #[test]
  fn content_filter_rejects_unknown_type() {
    let q = ContentQuery { content_type: Some("Video".into()), ..ContentQuery::default() };
    assert_eq!(
      ContentFilter::build(&q, &LIMITS).unwrap_err(),
      ValidationError::InvalidContentType
    );
  }

  #[test]
  fn content_filter_rejects_long_author() {
    let q = ContentQuery {
      author: Some("x".repeat(AUTHOR_MAX_CHARS + 1)),
      ..ContentQuery::default()
    };
    assert_eq!(
      ContentFilter::build(&q, &LIMITS).unwrap_err(),
      ValidationError::InvalidAuthor
    );
  }

  #[test]
  fn listing_carries_effective_pagination() {
    let page = Page { items: vec![1, 2], total: 9 };
    let listing = Listing::new(page, Pagination { limit: 2, offset: 4 });
    assert_eq!(listing.items, vec![1, 2]);
    assert_eq!((listing.total, listing.limit, listing.offset), (9, 2, 4));
  }

  #[test]
  fn blank_pagination_params_are_absent() {
    let q: UserQuery =
      serde_json::from_value(serde_json::json!({ "limit": "", "offset": " " })).unwrap();
    assert_eq!((q.limit, q.offset), (None, None));
    assert_eq!(q.pagination(&LIMITS), Pagination { limit: 20, offset: 0 });

    let q: ContentQuery =
      serde_json::from_value(serde_json::json!({ "limit": "5", "offset": "-1" })).unwrap();
    assert_eq!((q.limit, q.offset), (Some(5), Some(-1)));

    let bad = serde_json::from_value::<UserQuery>(serde_json::json!({ "limit": "ten" }));
    assert!(bad.is_err());
  }

  #[test]
  fn limits_consistency() {
    assert!(PageLimits::default().is_consistent());
    assert!(!PageLimits { default_limit: 0, max_limit: 10 }.is_consistent());
    assert!(!PageLimits { default_limit: 50, max_limit: 10 }.is_consistent());
  }
}
