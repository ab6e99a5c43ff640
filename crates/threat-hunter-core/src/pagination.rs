//! Fixed-size paging over result collections
//!
//! Same navigation rules as a no-wrap selectable list, one page at a time
//! instead of one row at a time.

use crate::constants::PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// Number of pages needed for `len` items, 0 for an empty collection
///
/// A `page_size` of 0 is treated as 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// A collection with a current-page cursor
///
/// # Examples
///
/// ```
/// use threat_hunter_core::pagination::PagedList;
///
/// let mut list = PagedList::with_page_size((0..7).collect::<Vec<_>>(), 3);
///
/// assert_eq!(list.page_count(), 3);
/// assert_eq!(list.current_page(), &[0, 1, 2]);
/// list.next_page();
/// list.next_page();
/// list.next_page(); // clamped
/// assert_eq!(list.current_page(), &[6]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedList<T> {
    items: Vec<T>,
    page_index: usize,
    page_size: usize,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> PagedList<T> {
    /// Wrap `items` with the standard page size, starting at page 0
    pub fn new(items: Vec<T>) -> Self {
        Self::with_page_size(items, PAGE_SIZE)
    }

    pub fn with_page_size(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based index of the current page
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        page_count(self.items.len(), self.page_size)
    }

    /// Absolute index of the first item on the current page
    pub fn page_start(&self) -> usize {
        (self.page_index * self.page_size).min(self.items.len())
    }

    /// Items on the current page
    pub fn current_page(&self) -> &[T] {
        let start = self.page_start();
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Current page items with their absolute index in the collection
    pub fn iter_current_page(&self) -> impl Iterator<Item = (usize, &T)> {
        let start = self.page_start();
        self.current_page()
            .iter()
            .enumerate()
            .map(move |(i, item)| (start + i, item))
    }

    /// Items on page `index`, empty when out of range
    pub fn page(&self, index: usize) -> &[T] {
        let start = (index * self.page_size).min(self.items.len());
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    pub fn has_prev(&self) -> bool {
        self.page_index > 0
    }

    /// Advance one page; no-op on the last page
    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page; no-op on the first page
    pub fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    /// Replace the collection and go back to page 0
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page_index = 0;
    }
}

impl<T> From<Vec<T>> for PagedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> FromIterator<T> for PagedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a PagedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
