//! A named key table.

use crate::KeySpec;
use serde::{Deserialize, Serialize};

/// Ordered keys shown together. Order is rendering order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub id: String,
    pub keys: Vec<KeySpec>,
}

impl Layout {
    pub fn new(id: impl Into<String>, keys: Vec<KeySpec>) -> Self {
        Self {
            id: id.into(),
            keys,
        }
    }

    /// Look up a key by id.
    pub fn key(&self, id: &str) -> Option<&KeySpec> {
        self.keys.iter().find(|k| k.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.key(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key labels in rendering order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.label.as_str())
    }
}
