// backoffice/src/listing.rs

//! Paginated, searchable listing of one record kind.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::DataResult;
use crate::record::Record;
use crate::store::RecordStore;

/// Matches returned for a non-empty search. Search results are one page.
pub const SEARCH_LIMIT: i64 = 100;

/// The `q` / `offset` URL parameters of a listing view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingParams {
  #[serde(default)]
  pub q: Option<String>,
  #[serde(default)]
  pub offset: Option<String>,
}

impl ListingParams {
  pub fn new(search: impl Into<String>, offset: i64) -> Self {
    Self {
      q: Some(search.into()),
      offset: Some(offset.to_string()),
    }
  }

  pub fn search(&self) -> &str {
    self.q.as_deref().unwrap_or("")
  }

  /// Absent, unparsable and negative offsets all mean the first page.
  pub fn offset(&self) -> i64 {
    self
      .offset
      .as_deref()
      .and_then(|raw| raw.trim().parse::<i64>().ok())
      .unwrap_or(0)
      .max(0)
  }

  /// Canonical query string: `q` dropped when empty, `offset` dropped when 0.
  /// Empty when both are dropped.
  pub fn query_string(&self) -> String {
    let query = CanonicalQuery {
      q: Some(self.search()).filter(|q| !q.is_empty()),
      offset: Some(self.offset()).filter(|offset| *offset > 0),
    };
    // Only strings and integers are serialized, which cannot fail.
    serde_urlencoded::to_string(&query).unwrap_or_default()
  }

  /// `path` followed by the canonical query string, if any.
  pub fn href(&self, path: &str) -> String {
    let query = self.query_string();
    if query.is_empty() {
      path.to_string()
    } else {
      format!("{}?{}", path, query)
    }
  }

  /// Same search, different offset.
  pub fn at_offset(&self, offset: i64) -> Self {
    Self {
      q: self.q.clone(),
      offset: Some(offset.to_string()),
    }
  }
}

/// Computed result of a listing query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage<R> {
  pub rows: Vec<R>,
  /// Offset of the following page; `None` on the last page and for searches.
  pub next_offset: Option<i64>,
  /// Unfiltered row count; only computed when paginating without a search.
  pub total: Option<i64>,
  pub offset: i64,
  pub page_size: i64,
  pub search: String,
}

impl<R> ListingPage<R> {
  pub fn is_search(&self) -> bool {
    !self.search.is_empty()
  }

  /// Offset of the preceding page, `None` on the first page.
  pub fn previous_offset(&self) -> Option<i64> {
    if self.is_search() || self.offset == 0 {
      None
    } else {
      Some((self.offset - self.page_size).max(0))
    }
  }

  /// 1-based inclusive range of the rows shown, `None` when the page is empty.
  pub fn shown_range(&self) -> Option<(i64, i64)> {
    if self.rows.is_empty() {
      None
    } else {
      Some((self.offset + 1, self.offset + self.rows.len() as i64))
    }
  }
}

/// Runs the listing query for `params`.
///
/// With a keyword, returns up to [`SEARCH_LIMIT`] case-insensitive name matches
/// as a single page. Without one, returns the page at `offset` ordered by id,
/// the next offset when the page came back full, and the unfiltered total.
#[instrument(name = "listing::fetch", skip(store, params), fields(kind = %R::KIND, search = %params.search(), offset = params.offset()))]
pub async fn fetch_listing<R, S>(store: &S, params: &ListingParams) -> DataResult<ListingPage<R>>
where
  R: Record,
  S: RecordStore<R> + ?Sized,
{
  let search = params.search();
  let page_size = R::KIND.page_size();

  if !search.is_empty() {
    let rows = store.search(search, SEARCH_LIMIT).await?;
    info!(matched = rows.len(), "Search listing fetched.");
    return Ok(ListingPage {
      rows,
      next_offset: None,
      total: None,
      offset: 0,
      page_size,
      search: search.to_string(),
    });
  }

  let offset = params.offset();
  let (rows, total) = store.page_with_total(page_size, offset).await?;
  let next_offset = if rows.len() as i64 >= page_size {
    Some(offset + page_size)
  } else {
    None
  };
  info!(rows = rows.len(), total, ?next_offset, "Listing page fetched.");

  Ok(ListingPage {
    rows,
    next_offset,
    total: Some(total),
    offset,
    page_size,
    search: String::new(),
  })
}

#[derive(Serialize)]
struct CanonicalQuery<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  q: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  offset: Option<i64>,
}
