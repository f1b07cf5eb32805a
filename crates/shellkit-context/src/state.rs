//! Slice state types for the shared context store.
//!
//! Each slice is an independently mutable partition of the shared state.
//! The structural rules live here (upsert keying, selection set semantics);
//! the store wraps them with change notification and bus publication.

use serde::{Deserialize, Serialize};
use shellkit_core::{Breadcrumb, Filter};

/// Identifies which slice of the shared context changed.
///
/// `identity` has no variant: it is injected once at mount and read-only
/// thereafter, so it never produces a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceKind {
    /// Free-text query and structured filters.
    Search,
    /// Breadcrumb trail.
    Navigation,
    /// Selected item ids.
    Selection,
}

impl std::fmt::Display for SliceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceKind::Search => write!(f, "search"),
            SliceKind::Navigation => write!(f, "navigation"),
            SliceKind::Selection => write!(f, "selection"),
        }
    }
}

/// Free-text query plus structured filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    /// The free-text query as entered.
    pub query: String,
    /// Active structured filters, in application order.
    pub filters: Vec<Filter>,
}

impl SearchState {
    /// Insert the filter, or replace the entry sharing its `id` in place.
    ///
    /// Order-preserving: a replacement keeps the original position.
    pub fn upsert_filter(&mut self, filter: Filter) {
        match self.filters.iter_mut().find(|f| f.id == filter.id) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Remove the filter with the given id, returning it when present.
    pub fn remove_filter(&mut self, id: &str) -> Option<Filter> {
        let position = self.filters.iter().position(|f| f.id == id)?;
        Some(self.filters.remove(position))
    }
}

/// Breadcrumb trail of the current location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    /// The trail from root to the current location.
    pub current_path: Vec<Breadcrumb>,
}

/// Selected item ids.
///
/// Set semantics over a sequence: every mutator keeps the ids unique while
/// preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// The currently selected ids, in selection order.
    pub selected_ids: Vec<String>,
}

impl SelectionState {
    /// Whether the id is currently selected.
    pub fn contains(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: String) {
        match self.selected_ids.iter().position(|s| *s == id) {
            Some(position) => {
                self.selected_ids.remove(position);
            }
            None => self.selected_ids.push(id),
        }
    }

    /// Replace the selection, dropping duplicate ids order-preservingly.
    pub fn replace(&mut self, ids: Vec<String>) {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.selected_ids = unique;
    }
}
