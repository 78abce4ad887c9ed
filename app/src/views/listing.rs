// backoffice_server/src/views/listing.rs

use askama::Template;
use backoffice::{ListingPage, ListingParams, Record};

use super::columns::{Cell, RecordColumns};
use super::layout::Chrome;

#[derive(Debug, Clone)]
pub struct RowView {
  pub id: i32,
  pub cells: Vec<Cell>,
  pub edit_href: String,
  pub delete_href: String,
}

/// Previous/next links and the "showing X-Y of N" label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagerView {
  pub previous_href: Option<String>,
  pub next_href: Option<String>,
  pub summary: Option<String>,
}

impl PagerView {
  pub fn new<R: Record>(page: &ListingPage<R>) -> Self {
    let path = R::KIND.listing_path();
    let plural = R::KIND.title().to_lowercase();
    let first_page = ListingParams::default();

    let summary = match (page.shown_range(), page.total) {
      (Some((from, to)), Some(total)) => Some(format!("Showing {}-{} of {} {}", from, to, total, plural)),
      (None, Some(total)) => Some(format!("Showing 0 of {} {}", total, plural)),
      _ if page.is_search() => Some(format!("{} matching {}", page.rows.len(), plural)),
      _ => None,
    };

    Self {
      previous_href: page.previous_offset().map(|offset| first_page.at_offset(offset).href(path)),
      next_href: page.next_offset.map(|offset| first_page.at_offset(offset).href(path)),
      summary,
    }
  }
}

/// The table fragment. Served on its own at `{path}/table` and embedded in
/// the listing page.
#[derive(Template)]
#[template(path = "partials/table.html")]
pub struct TableView {
  pub headers: &'static [&'static str],
  pub rows: Vec<RowView>,
  pub pager: PagerView,
  pub empty_message: String,
}

impl TableView {
  pub fn new<R: RecordColumns>(page: &ListingPage<R>) -> Self {
    let path = R::KIND.listing_path();
    Self {
      headers: R::HEADERS,
      rows: page
        .rows
        .iter()
        .map(|row| RowView {
          id: row.id(),
          cells: row.cells(),
          edit_href: format!("{}/{}/edit", path, row.id()),
          delete_href: format!("{}/{}/delete", path, row.id()),
        })
        .collect(),
      pager: PagerView::new(page),
      empty_message: format!("No {} found.", R::KIND.title().to_lowercase()),
    }
  }
}

#[derive(Template)]
#[template(path = "listing.html")]
pub struct ListingView {
  pub chrome: Chrome,
  pub title: &'static str,
  pub path: &'static str,
  pub table_path: String,
  pub search: String,
  pub search_placeholder: String,
  pub create_href: String,
  pub create_label: String,
  /// Pre-rendered [`TableView`], possibly from the listing cache.
  pub table_html: String,
}

impl ListingView {
  pub fn new<R: Record>(chrome: Chrome, params: &ListingParams, table_html: String) -> Self {
    let path = R::KIND.listing_path();
    Self {
      chrome,
      title: R::KIND.title(),
      path,
      table_path: format!("{}/table", path),
      search: params.search().to_string(),
      search_placeholder: format!("Search {}...", R::KIND.title().to_lowercase()),
      create_href: format!("{}/create", path),
      create_label: format!("Add {}", R::KIND.noun()),
      table_html,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use backoffice::Customer;

  fn customers(ids: std::ops::RangeInclusive<i32>) -> Vec<Customer> {
    ids
      .map(|id| Customer {
        id,
        name: format!("Customer {}", id),
        username: format!("c{}", id),
        email: format!("c{}@example.com", id),
      })
      .collect()
  }

  fn page(rows: Vec<Customer>, offset: i64, next_offset: Option<i64>, total: Option<i64>, search: &str) -> ListingPage<Customer> {
    ListingPage {
      rows,
      next_offset,
      total,
      offset,
      page_size: 5,
      search: search.to_string(),
    }
  }

  #[test]
  fn middle_page_links_both_ways() {
    let pager = PagerView::new(&page(customers(6..=10), 5, Some(10), Some(12), ""));
    assert_eq!(pager.previous_href.as_deref(), Some("/dashboard/customers"));
    assert_eq!(pager.next_href.as_deref(), Some("/dashboard/customers?offset=10"));
    assert_eq!(pager.summary.as_deref(), Some("Showing 6-10 of 12 customers"));
  }

  #[test]
  fn first_and_last_pages_disable_one_side() {
    let first = PagerView::new(&page(customers(1..=5), 0, Some(5), Some(7), ""));
    assert_eq!(first.previous_href, None);

    let last = PagerView::new(&page(customers(6..=7), 5, None, Some(7), ""));
    assert_eq!(last.next_href, None);
    assert_eq!(last.summary.as_deref(), Some("Showing 6-7 of 7 customers"));
  }

  #[test]
  fn search_results_have_no_pager_links() {
    let pager = PagerView::new(&page(customers(1..=2), 0, None, None, "cust"));
    assert_eq!(pager.previous_href, None);
    assert_eq!(pager.next_href, None);
    assert_eq!(pager.summary.as_deref(), Some("2 matching customers"));
  }

  #[test]
  fn table_renders_rows_and_escapes_text() {
    let mut rows = customers(1..=1);
    rows[0].name = "<b>Ada</b>".to_string();
    let html = TableView::new(&page(rows, 0, None, Some(1), "")).render().unwrap();

    assert!(html.contains("/dashboard/customers/1/edit"));
    assert!(html.contains("/dashboard/customers/1/delete"));
    assert!(html.contains("&lt;b&gt;Ada&lt;/b&gt;"));
    assert!(!html.contains("<b>Ada</b>"));
  }

  #[test]
  fn empty_table_says_so() {
    let html = TableView::new(&page(Vec::new(), 0, None, Some(0), "")).render().unwrap();
    assert!(html.contains("No customers found."));
  }
}
