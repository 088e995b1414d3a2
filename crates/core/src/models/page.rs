//! Backend pagination envelope.

use serde::{Deserialize, Serialize};

/// One page of a backend-paginated collection.
///
/// The front end never paginates on its own; it only walks the pages the
/// backend hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    #[serde(default = "first_page", alias = "currentPage", alias = "page")]
    pub current_page: u32,
    #[serde(default = "first_page", alias = "lastPage", alias = "total_pages")]
    pub last_page: u32,
    #[serde(default)]
    pub total: u64,
}

const fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Wrap a complete list as a single page.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            current_page: 1,
            last_page: 1,
            total,
        }
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next() {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn prev_page(&self) -> Option<u32> {
        if self.has_prev() {
            Some(self.current_page - 1)
        } else {
            None
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::single(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_laravel_style_envelope() {
        let json = r#"{"data": [1, 2], "current_page": 2, "last_page": 3, "total": 6}"#;
        let page: Page<u8> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.prev_page(), Some(1));
        assert_eq!(page.next_page(), Some(3));
    }

    #[test]
    fn test_minimal_envelope_is_single_page() {
        let page: Page<u8> = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(!page.has_next());
        assert!(!page.has_prev());
        assert_eq!(page.next_page(), None);
    }
}
