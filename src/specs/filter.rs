// src/specs/filter.rs
//
// Which `<optgroup>`s and `<option>`s are in scope. Total functions: a
// rejected group or item is normal page furniture (headers, placeholders,
// pickup-only bundles), never an error.

use crate::config::consts::{DEFAULT_CATEGORIES, DEFAULT_ITEM_REJECTS, DEFAULT_LABEL_NOISE};
use crate::core::sanitize::{strip_all, to_lower};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Lower-case substrings; a group label must contain one.
    pub categories: Vec<String>,
    /// Removed from accepted labels.
    pub label_noise: Vec<String>,
    /// Any of these in an item's raw text drops the item.
    pub item_rejects: Vec<String>,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        let own = |v: &[&str]| v.iter().map(|s| s!(*s)).collect::<Vec<_>>();
        Self {
            categories: own(DEFAULT_CATEGORIES),
            label_noise: own(DEFAULT_LABEL_NOISE),
            item_rejects: own(DEFAULT_ITEM_REJECTS),
        }
    }
}

impl CategoryFilter {
    /// Sanitized category name for an in-scope group label, else `None`.
    pub fn accept_group(&self, label: &str) -> Option<String> {
        let lc = to_lower(label);
        if !self.categories.iter().any(|c| lc.contains(c.as_str())) {
            return None;
        }
        let clean = strip_all(&lc, self.label_noise.as_slice());
        if clean.is_empty() { None } else { Some(clean) }
    }

    pub fn accept_item(&self, item: &str) -> bool {
        !self.item_rejects.iter().any(|m| item.contains(m.as_str()))
    }
}
