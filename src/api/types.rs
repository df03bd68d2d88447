//! Shared envelopes for JSON responses.

use serde::Serialize;

/// Collection response carrying the item count alongside the items.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}
