//! Event type definitions for the event bus.
//!
//! The event vocabulary is closed at build time: every event a module can
//! publish or subscribe to is a variant here, so an unknown event name is a
//! compile error rather than a runtime condition. Events are cloneable and
//! serializable for logging and replay.

use serde::{Deserialize, Serialize};

use crate::data::{Breadcrumb, Filter};

/// Root event enum for all cross-module events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShellEvent {
    /// Free-text search events
    Search(SearchEvent),
    /// Structured filter events
    Filter(FilterEvent),
    /// Navigation trail events
    Navigation(NavigationEvent),
    /// Row/item selection events
    Selection(SelectionEvent),
}

impl ShellEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            ShellEvent::Search(_) => EventCategory::Search,
            ShellEvent::Filter(_) => EventCategory::Filter,
            ShellEvent::Navigation(_) => EventCategory::Navigation,
            ShellEvent::Selection(_) => EventCategory::Selection,
        }
    }

    /// Get the catalog entry this event belongs to
    pub fn kind(&self) -> EventKind {
        match self {
            ShellEvent::Search(SearchEvent::Submitted { .. }) => EventKind::SearchSubmitted,
            ShellEvent::Search(SearchEvent::Cleared) => EventKind::SearchCleared,
            ShellEvent::Filter(FilterEvent::Changed { .. }) => EventKind::FilterChanged,
            ShellEvent::Filter(FilterEvent::Applied { .. }) => EventKind::FilterApplied,
            ShellEvent::Filter(FilterEvent::Removed { .. }) => EventKind::FilterRemoved,
            ShellEvent::Filter(FilterEvent::ClearedAll) => EventKind::FilterClearedAll,
            ShellEvent::Navigation(NavigationEvent::BreadcrumbClicked { .. }) => {
                EventKind::BreadcrumbClicked
            }
            ShellEvent::Selection(SelectionEvent::Changed { .. }) => EventKind::SelectionChanged,
            ShellEvent::Selection(SelectionEvent::Cleared) => EventKind::SelectionCleared,
        }
    }

    /// Get the dotted diagnostic name of this event
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            ShellEvent::Search(e) => e.description(),
            ShellEvent::Filter(e) => e.description(),
            ShellEvent::Navigation(e) => e.description(),
            ShellEvent::Selection(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Free-text search events.
    Search,
    /// Structured filter events.
    Filter,
    /// Navigation trail events.
    Navigation,
    /// Row/item selection events.
    Selection,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Search => write!(f, "Search"),
            EventCategory::Filter => write!(f, "Filter"),
            EventCategory::Navigation => write!(f, "Navigation"),
            EventCategory::Selection => write!(f, "Selection"),
        }
    }
}

/// One entry in the closed event catalog.
///
/// The dotted names are diagnostic labels for logs and telemetry; the
/// catalog itself is closed by this enum, not by string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A non-empty search query was submitted.
    SearchSubmitted,
    /// The search query was cleared.
    SearchCleared,
    /// The filter list was replaced wholesale.
    FilterChanged,
    /// A single filter was applied (inserted or replaced).
    FilterApplied,
    /// A single filter was removed.
    FilterRemoved,
    /// Every filter was cleared at once.
    FilterClearedAll,
    /// A breadcrumb in the navigation trail was activated.
    BreadcrumbClicked,
    /// The selected-item set changed.
    SelectionChanged,
    /// The selection was emptied.
    SelectionCleared,
}

impl EventKind {
    /// Dotted diagnostic name of this catalog entry.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::SearchSubmitted => "search.submitted",
            EventKind::SearchCleared => "search.cleared",
            EventKind::FilterChanged => "filter.changed",
            EventKind::FilterApplied => "filter.applied",
            EventKind::FilterRemoved => "filter.removed",
            EventKind::FilterClearedAll => "filter.cleared_all",
            EventKind::BreadcrumbClicked => "navigation.breadcrumb_clicked",
            EventKind::SelectionChanged => "selection.changed",
            EventKind::SelectionCleared => "selection.cleared",
        }
    }

    /// Category this catalog entry belongs to.
    pub fn category(self) -> EventCategory {
        match self {
            EventKind::SearchSubmitted | EventKind::SearchCleared => EventCategory::Search,
            EventKind::FilterChanged
            | EventKind::FilterApplied
            | EventKind::FilterRemoved
            | EventKind::FilterClearedAll => EventCategory::Filter,
            EventKind::BreadcrumbClicked => EventCategory::Navigation,
            EventKind::SelectionChanged | EventKind::SelectionCleared => EventCategory::Selection,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Free-text search events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    /// A non-empty query was submitted.
    Submitted {
        /// The query text as entered.
        query: String,
    },
    /// The query was cleared.
    Cleared,
}

impl SearchEvent {
    fn description(&self) -> String {
        match self {
            SearchEvent::Submitted { query } => format!("Search submitted: {}", query),
            SearchEvent::Cleared => "Search cleared".to_string(),
        }
    }
}

/// Structured filter events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterEvent {
    /// The filter list was replaced wholesale.
    Changed {
        /// The complete new filter list.
        filters: Vec<Filter>,
    },
    /// A single filter was applied (inserted or replaced).
    Applied {
        /// Kind of the applied filter.
        filter_type: String,
        /// Value of the applied filter.
        value: serde_json::Value,
    },
    /// A single filter was removed.
    Removed {
        /// Kind of the removed filter.
        filter_type: String,
    },
    /// Every filter was cleared at once.
    ClearedAll,
}

impl FilterEvent {
    fn description(&self) -> String {
        match self {
            FilterEvent::Changed { filters } => {
                format!("Filters replaced: {} active", filters.len())
            }
            FilterEvent::Applied { filter_type, value } => {
                format!("Filter applied: {} = {}", filter_type, value)
            }
            FilterEvent::Removed { filter_type } => format!("Filter removed: {}", filter_type),
            FilterEvent::ClearedAll => "All filters cleared".to_string(),
        }
    }
}

/// Navigation trail events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// A breadcrumb was activated.
    BreadcrumbClicked {
        /// Identifier of the activated crumb.
        item_id: String,
        /// The trail at the moment of activation.
        path: Vec<Breadcrumb>,
    },
}

impl NavigationEvent {
    fn description(&self) -> String {
        match self {
            NavigationEvent::BreadcrumbClicked { item_id, path } => {
                format!("Breadcrumb clicked: {} (trail depth {})", item_id, path.len())
            }
        }
    }
}

/// Row/item selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selected-item set changed.
    ///
    /// Carries the full resulting set, not a diff: consumers are typically
    /// summaries or bulk-action toolbars that need the complete current set
    /// regardless of what triggered the change.
    Changed {
        /// The complete current selection.
        selected_ids: Vec<String>,
    },
    /// The selection was emptied.
    Cleared,
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { selected_ids } => {
                format!("Selection changed: {} items", selected_ids.len())
            }
            SelectionEvent::Cleared => "Selection cleared".to_string(),
        }
    }
}
