//! Per-endpoint page cursors.
//!
//! # Design
//! A cursor remembers the last `(page, pages)` pair the server reported for
//! an endpoint key. Calling a paged endpoint again without an explicit page
//! continues from that cursor; once the last page has been seen, further
//! implicit calls resolve to `Exhausted` and issue no request.
//!
//! The state is a plain field of `DocsClient`, so two clients never share
//! cursors.

use std::collections::HashMap;

use tracing::debug;

/// Last `(page, pages)` pair observed for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub page: Option<u32>,
    pub pages: Option<u32>,
}

/// What the next call on an endpoint should request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Omit the `page` parameter and let the server pick its default.
    First,
    /// Send `page=n`.
    Page(u32),
    /// Every page has been seen; do not issue a request.
    Exhausted,
}

impl PageRequest {
    /// The `page` query value to send, if any.
    pub fn page_param(self) -> Option<u32> {
        match self {
            PageRequest::Page(n) => Some(n),
            PageRequest::First | PageRequest::Exhausted => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    cursors: HashMap<String, Cursor>,
}

impl PaginationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide which page to request next for `key`.
    ///
    /// An explicit `requested` page always wins and skips the cursor lookup.
    pub fn resolve_next_page(&self, key: &str, requested: Option<u32>) -> PageRequest {
        if let Some(page) = requested {
            return PageRequest::Page(page);
        }
        let Some(cursor) = self.cursors.get(key) else {
            return PageRequest::First;
        };
        let next = match (cursor.page, cursor.pages) {
            (Some(curr), Some(total)) if curr < total => PageRequest::Page(curr + 1),
            (Some(curr), Some(total)) if curr == total => PageRequest::Exhausted,
            _ => PageRequest::First,
        };
        debug!(key, ?cursor, ?next, "resolved next page");
        next
    }

    /// Overwrite the cursor for `key` with freshly observed values.
    pub fn record_page(&mut self, key: &str, page: Option<u32>, pages: Option<u32>) {
        self.cursors.insert(key.to_string(), Cursor { page, pages });
    }

    /// Clear one cursor, or all of them when `key` is `None`.
    ///
    /// Returns `false` only when a single key was named and had no cursor.
    pub fn reset(&mut self, key: Option<&str>) -> bool {
        match key {
            Some(key) => self.cursors.remove(key).is_some(),
            None => {
                self.cursors.clear();
                true
            }
        }
    }

    pub fn cursor(&self, key: &str) -> Option<Cursor> {
        self.cursors.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
