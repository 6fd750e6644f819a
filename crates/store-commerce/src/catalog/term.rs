//! Category terms.

use crate::ids::TermId;
use serde::{Deserialize, Serialize};

/// A product category term as stored by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Parent term id; `TermId(0)` marks a root.
    pub parent: TermId,
    /// Number of products assigned to the term.
    pub count: u64,
}

impl Term {
    pub fn new(id: u64, parent: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = name.to_lowercase().replace(' ', "-");
        Self {
            id: TermId(id),
            name,
            slug,
            description: String::new(),
            parent: TermId(parent),
            count: 0,
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent == TermId(0)
    }
}
