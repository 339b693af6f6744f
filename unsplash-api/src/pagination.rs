//! Cursor-based pagination derived from the `Link` response header.

use std::fmt;

use reqwest::header::{HeaderMap, LINK};
use url::Url;

const PER_PAGE_HEADER: &str = "x-per-page";
const TOTAL_HEADER: &str = "x-total";

/// Page relation inside a `Link` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    First,
    Last,
    Next,
    Prev,
}

impl Direction {
    /// Human name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::First => "first",
            Direction::Last => "last",
            Direction::Next => "next",
            Direction::Prev => "previous",
        }
    }

    fn from_rel(rel: &str) -> Option<Self> {
        match rel {
            "first" => Some(Direction::First),
            "last" => Some(Direction::Last),
            "next" => Some(Direction::Next),
            "prev" => Some(Direction::Prev),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recognized entry of a `Link` header.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLink {
    pub direction: Direction,
    pub url: Url,
}

/// Snapshot of the page links carried by the last paginated response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationCursor {
    pub first: Option<Url>,
    pub last: Option<Url>,
    pub next: Option<Url>,
    pub prev: Option<Url>,
    pub per_page: u32,
    pub total: u32,
}

impl PaginationCursor {
    pub fn url(&self, direction: Direction) -> Option<&Url> {
        match direction {
            Direction::First => self.first.as_ref(),
            Direction::Last => self.last.as_ref(),
            Direction::Next => self.next.as_ref(),
            Direction::Prev => self.prev.as_ref(),
        }
    }

    /// Build a cursor from a `Link` header value alone.
    pub fn from_link_header(value: &str) -> Self {
        let mut cursor = PaginationCursor::default();
        for link in parse_link_header(value) {
            let slot = match link.direction {
                Direction::First => &mut cursor.first,
                Direction::Last => &mut cursor.last,
                Direction::Next => &mut cursor.next,
                Direction::Prev => &mut cursor.prev,
            };
            *slot = Some(link.url);
        }
        cursor
    }

    /// Build a cursor from response headers.
    ///
    /// Returns `None` when there is no readable `Link` header, in which case the
    /// previous cursor must be kept. Repeated `Link` headers are read as one list.
    /// `per_page` and `total` default to 0.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let values = headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }
        let mut cursor = Self::from_link_header(&values.join(", "));
        cursor.per_page = header_u32(headers, PER_PAGE_HEADER).unwrap_or(0);
        cursor.total = header_u32(headers, TOTAL_HEADER).unwrap_or(0);
        Some(cursor)
    }
}

/// A decoded response together with the cursor that very response produced.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub value: T,
    pub cursor: Option<PaginationCursor>,
}

pub(crate) fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Parse a `Link` header into its recognized entries.
///
/// Entries look like `<https://api.unsplash.com/photos?page=1>; rel="first"`.
/// Unknown relations and entries whose URL does not parse are skipped.
pub fn parse_link_header(value: &str) -> Vec<PageLink> {
    split_entries(value)
        .into_iter()
        .filter_map(|entry| {
            let (target, params) = entry.split_once(';')?;
            let target = target.trim().trim_start_matches('<').trim_end_matches('>');

            let direction = params.split(';').find_map(|param| {
                let (name, value) = param.split_once('=')?;
                if !name.trim().eq_ignore_ascii_case("rel") {
                    return None;
                }
                Direction::from_rel(value.trim().trim_matches('"'))
            })?;

            let url = Url::parse(target.trim()).ok()?;
            Some(PageLink { direction, url })
        })
        .collect()
}

// Commas inside `<...>` belong to the URL.
fn split_entries(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in value.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&value[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    entries.push(&value[start..]);

    entries
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect()
}
