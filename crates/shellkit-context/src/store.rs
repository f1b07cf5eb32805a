//! Shared context store.
//!
//! Canonical holder of the cross-module UI state slices (search,
//! navigation, selection, identity). Every mutating operation performs a
//! dual effect: it updates the slice state, notifies registered change
//! observers (the UI-binding layer wires these to its own re-render
//! scheduling), and then publishes the corresponding event on the bus for
//! subscribers that only need to react to the occurrence. State is always
//! updated before the bus event fires, so a bus subscriber that also reads
//! the store observes consistent, already-updated values.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use shellkit_core::{
    Breadcrumb, EventBus, Filter, FilterEvent, Identity, NavigationEvent, SearchEvent,
    SelectionEvent, ShellEvent,
};

use crate::error::{ContextError, ContextResult};
use crate::state::{NavigationState, SearchState, SelectionState, SliceKind};

/// Identifier for a registered change observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(Uuid);

impl ObserverId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Obs({})", &self.0.to_string()[..8])
    }
}

type ChangeObserver = Box<dyn Fn(SliceKind)>;

struct ObserverEntry {
    id: ObserverId,
    observer: Rc<ChangeObserver>,
}

type ObserverRegistry = RefCell<Vec<ObserverEntry>>;

/// Single source of truth for the cross-module UI state slices.
///
/// Exactly one live store exists per composed application; the root
/// composition constructs it at mount (see `ContextProvider`) and it is
/// reconstructed fresh, never reused, on remount. Modules mutate it only
/// through the per-slice surfaces returned by [`ContextStore::search`],
/// [`ContextStore::navigation`] and [`ContextStore::selection`].
pub struct ContextStore {
    bus: EventBus,
    identity: Identity,
    search: RefCell<SearchState>,
    navigation: RefCell<NavigationState>,
    selection: RefCell<SelectionState>,
    observers: Rc<ObserverRegistry>,
}

impl ContextStore {
    /// Create a store for the given identity with empty slices.
    pub fn new(identity: Identity) -> Self {
        Self {
            bus: EventBus::new(),
            identity,
            search: RefCell::new(SearchState::default()),
            navigation: RefCell::new(NavigationState::default()),
            selection: RefCell::new(SelectionState::default()),
            observers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Start building a store with optional initial search state.
    pub fn builder() -> ContextStoreBuilder {
        ContextStoreBuilder::default()
    }

    /// The event bus owned by this store.
    ///
    /// The bus shares the store's lifetime; its handler registry is torn
    /// down through subscription disposers, not implicitly on unmount.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The authenticated identity injected at construction.
    ///
    /// Read-only for the store's whole lifetime; no change notification
    /// exists for it because it cannot change within a session.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Mutator surface for the search slice.
    pub fn search(&self) -> SearchSlice<'_> {
        SearchSlice { store: self }
    }

    /// Mutator surface for the navigation slice.
    pub fn navigation(&self) -> NavigationSlice<'_> {
        NavigationSlice { store: self }
    }

    /// Mutator surface for the selection slice.
    pub fn selection(&self) -> SelectionSlice<'_> {
        SelectionSlice { store: self }
    }

    /// Register a change observer.
    ///
    /// The observer is called synchronously after a slice mutation, with
    /// the kind of slice that changed, and before the corresponding bus
    /// event is published. The UI-binding layer wires this to its own
    /// re-render scheduling; the store itself performs no rendering.
    pub fn on_change<F>(&self, observer: F) -> ObserverHandle
    where
        F: Fn(SliceKind) + 'static,
    {
        let id = ObserverId::new();
        self.observers.borrow_mut().push(ObserverEntry {
            id,
            observer: Rc::new(Box::new(observer)),
        });
        tracing::debug!("Observer {} added", id);
        ObserverHandle {
            registry: Rc::downgrade(&self.observers),
            id,
            disposed: Cell::new(false),
        }
    }

    /// Number of registered change observers.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    fn notify(&self, slice: SliceKind) {
        // Snapshot so observers may register or dispose observers freely.
        let snapshot: Vec<Rc<ChangeObserver>> = self
            .observers
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.observer))
            .collect();
        for observer in snapshot {
            observer(slice);
        }
    }
}

impl fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStore")
            .field("identity", &self.identity.id)
            .field("search", &self.search.borrow())
            .field("navigation", &self.navigation.borrow())
            .field("selection", &self.selection.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Builder for [`ContextStore`].
///
/// The identity is required; building without one fails with
/// [`ContextError::MissingIdentity`] because downstream modules assume it
/// is always present.
#[derive(Default)]
pub struct ContextStoreBuilder {
    identity: Option<Identity>,
    initial_query: Option<String>,
    initial_filters: Option<Vec<Filter>>,
    bus: Option<EventBus>,
}

impl ContextStoreBuilder {
    /// Set the authenticated identity (required).
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Seed the search slice with an initial query.
    pub fn initial_query(mut self, query: impl Into<String>) -> Self {
        self.initial_query = Some(query.into());
        self
    }

    /// Seed the search slice with initial filters.
    pub fn initial_filters(mut self, filters: Vec<Filter>) -> Self {
        self.initial_filters = Some(filters);
        self
    }

    /// Use a pre-configured event bus (custom telemetry sink or history).
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the store.
    pub fn build(self) -> ContextResult<ContextStore> {
        let identity = self.identity.ok_or(ContextError::MissingIdentity)?;
        let search = SearchState {
            query: self.initial_query.unwrap_or_default(),
            filters: self.initial_filters.unwrap_or_default(),
        };
        Ok(ContextStore {
            bus: self.bus.unwrap_or_default(),
            identity,
            search: RefCell::new(search),
            navigation: RefCell::new(NavigationState::default()),
            selection: RefCell::new(SelectionState::default()),
            observers: Rc::new(RefCell::new(Vec::new())),
        })
    }
}

/// Disposer for a registered change observer.
///
/// Like bus subscriptions, observer teardown is explicit: the owning module
/// disposes on its own unmount, and disposing twice is a safe no-op.
#[derive(Debug)]
pub struct ObserverHandle {
    registry: Weak<ObserverRegistry>,
    id: ObserverId,
    disposed: Cell<bool>,
}

impl ObserverHandle {
    /// Identifier of this observer registration.
    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Remove this observer from the store.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().retain(|entry| entry.id != self.id);
            tracing::debug!("Observer {} removed", self.id);
        }
    }

    /// Whether this observer has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Mutator surface for the `search` slice.
pub struct SearchSlice<'a> {
    store: &'a ContextStore,
}

impl SearchSlice<'_> {
    /// The current free-text query.
    pub fn query(&self) -> String {
        self.store.search.borrow().query.clone()
    }

    /// The active filters, in application order.
    pub fn filters(&self) -> Vec<Filter> {
        self.store.search.borrow().filters.clone()
    }

    /// Set the free-text query.
    ///
    /// Publishes `search.submitted` for a non-empty query, `search.cleared`
    /// for an empty one.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.store.search.borrow_mut().query = query.clone();
        self.store.notify(SliceKind::Search);

        let event = if query.is_empty() {
            ShellEvent::Search(SearchEvent::Cleared)
        } else {
            ShellEvent::Search(SearchEvent::Submitted { query })
        };
        self.store.bus.publish(event);
    }

    /// Replace the filter list wholesale.
    pub fn set_filters(&self, filters: Vec<Filter>) {
        self.store.search.borrow_mut().filters = filters.clone();
        self.store.notify(SliceKind::Search);
        self.store
            .bus
            .publish(ShellEvent::Filter(FilterEvent::Changed { filters }));
    }

    /// Apply a filter, inserting it or replacing the entry sharing its id.
    pub fn add_filter(&self, filter: Filter) {
        let filter_type = filter.filter_type.clone();
        let value = filter.value.clone();
        self.store.search.borrow_mut().upsert_filter(filter);
        self.store.notify(SliceKind::Search);
        self.store
            .bus
            .publish(ShellEvent::Filter(FilterEvent::Applied {
                filter_type,
                value,
            }));
    }

    /// Remove the filter with the given id.
    ///
    /// A miss leaves the slice untouched and publishes nothing.
    pub fn remove_filter(&self, id: &str) {
        let removed = self.store.search.borrow_mut().remove_filter(id);
        if let Some(removed) = removed {
            self.store.notify(SliceKind::Search);
            self.store
                .bus
                .publish(ShellEvent::Filter(FilterEvent::Removed {
                    filter_type: removed.filter_type,
                }));
        }
    }

    /// Reset both the query and the filters.
    ///
    /// This is the only operation that resets both axes at once; clearing
    /// filters alone never touches the query, and vice versa. Publishes
    /// `filter.cleared_all` followed by `search.cleared`.
    pub fn clear_all(&self) {
        {
            let mut search = self.store.search.borrow_mut();
            search.query.clear();
            search.filters.clear();
        }
        self.store.notify(SliceKind::Search);
        self.store
            .bus
            .publish(ShellEvent::Filter(FilterEvent::ClearedAll));
        self.store
            .bus
            .publish(ShellEvent::Search(SearchEvent::Cleared));
    }
}

/// Mutator surface for the `navigation` slice.
pub struct NavigationSlice<'a> {
    store: &'a ContextStore,
}

impl NavigationSlice<'_> {
    /// The current breadcrumb trail.
    pub fn current_path(&self) -> Vec<Breadcrumb> {
        self.store.navigation.borrow().current_path.clone()
    }

    /// Replace the breadcrumb trail.
    ///
    /// Path changes are consumed reactively through store observers only;
    /// no bus event is published for them.
    pub fn set_path(&self, path: Vec<Breadcrumb>) {
        self.store.navigation.borrow_mut().current_path = path;
        self.store.notify(SliceKind::Navigation);
    }

    /// Activate a breadcrumb.
    ///
    /// Invokes the crumb's own callback when present and publishes
    /// `navigation.breadcrumb_clicked` with the current trail. The trail
    /// itself is not modified; the activated module updates it through
    /// [`NavigationSlice::set_path`] if it navigates.
    pub fn navigate_to(&self, breadcrumb: &Breadcrumb) {
        if let Some(callback) = &breadcrumb.on_navigate {
            callback();
        }
        let path = self.store.navigation.borrow().current_path.clone();
        self.store
            .bus
            .publish(ShellEvent::Navigation(NavigationEvent::BreadcrumbClicked {
                item_id: breadcrumb.id.clone(),
                path,
            }));
    }
}

/// Mutator surface for the `selection` slice.
pub struct SelectionSlice<'a> {
    store: &'a ContextStore,
}

impl SelectionSlice<'_> {
    /// The currently selected ids, in selection order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.store.selection.borrow().selected_ids.clone()
    }

    /// Whether the id is currently selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.store.selection.borrow().contains(id)
    }

    /// Replace the selection with the given ids.
    pub fn set_selection(&self, ids: Vec<String>) {
        self.replace(ids);
    }

    /// Select exactly the given ids (e.g. a header select-all checkbox).
    pub fn select_all(&self, ids: Vec<String>) {
        self.replace(ids);
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Publishes `selection.changed` with the full resulting set, not a
    /// diff.
    pub fn toggle_selection(&self, id: impl Into<String>) {
        let selected_ids = {
            let mut selection = self.store.selection.borrow_mut();
            selection.toggle(id.into());
            selection.selected_ids.clone()
        };
        self.store.notify(SliceKind::Selection);
        self.store
            .bus
            .publish(ShellEvent::Selection(SelectionEvent::Changed {
                selected_ids,
            }));
    }

    /// Empty the selection.
    pub fn clear_selection(&self) {
        self.store.selection.borrow_mut().selected_ids.clear();
        self.store.notify(SliceKind::Selection);
        self.store
            .bus
            .publish(ShellEvent::Selection(SelectionEvent::Cleared));
    }

    fn replace(&self, ids: Vec<String>) {
        let selected_ids = {
            let mut selection = self.store.selection.borrow_mut();
            selection.replace(ids);
            selection.selected_ids.clone()
        };
        self.store.notify(SliceKind::Selection);
        self.store
            .bus
            .publish(ShellEvent::Selection(SelectionEvent::Changed {
                selected_ids,
            }));
    }
}
