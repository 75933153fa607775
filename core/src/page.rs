//! One page of a paginated listing.

use std::ops::Index;

use serde_json::Value;

use crate::deserialize::{normalize_keys, parse_list};
use crate::error::{DocsError, Result};
use crate::types::Schema;

/// A page as reported by the server.
///
/// `items` holds only this page's records; `count` is the total across all
/// pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub page: Option<u32>,
    pub pages: Option<u32>,
    pub count: Option<u64>,
    pub items: Vec<T>,
}

impl<T: Schema> Page<T> {
    /// Build a page from the object found under a paged envelope key.
    ///
    /// A missing or `null` `items` array is read as an empty page.
    pub fn from_envelope(envelope: Value) -> Result<Self> {
        let Value::Object(mut map) = normalize_keys(envelope) else {
            return Err(DocsError::Deserialization(
                "page envelope is not an object".to_string(),
            ));
        };
        let page = scalar(map.get("page"), "page")?;
        let pages = scalar(map.get("pages"), "pages")?;
        let count = scalar(map.get("count"), "count")?;
        let items = match map.remove("items") {
            None | Some(Value::Null) => Vec::new(),
            Some(items) => parse_list(items)?,
        };
        Ok(Self {
            page: page.map(|n| page_number(n, "page")).transpose()?,
            pages: pages.map(|n| page_number(n, "pages")).transpose()?,
            count,
            items,
        })
    }
}

fn page_number(n: u64, name: &str) -> Result<u32> {
    u32::try_from(n)
        .map_err(|_| DocsError::Deserialization(format!("page field `{name}` out of range: {n}")))
}

fn scalar(value: Option<&Value>, name: &str) -> Result<Option<u64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| DocsError::Deserialization(format!("page field `{name}` is not a count: {v}"))),
    }
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Whether the server reported pages after this one.
    pub fn has_next(&self) -> bool {
        matches!((self.page, self.pages), (Some(page), Some(pages)) if page < pages)
    }
}

impl<T> Index<usize> for Page<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
