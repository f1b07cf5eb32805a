//! Event Bus implementation.
//!
//! Synchronous publish/subscribe for application-wide event distribution
//! between independently built modules. Delivery runs on the UI thread:
//! handlers fire in registration order, a failing handler never aborts
//! delivery to the handlers after it, and a handler registered while a
//! publish is in flight only sees subsequent publishes.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{EventCategory, EventKind, ShellEvent};
use crate::telemetry::{TelemetrySink, TracingSink};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific events
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive only these catalog entries.
    Kinds(Vec<EventKind>),
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Filter for a single catalog entry.
    pub fn kind(kind: EventKind) -> Self {
        EventFilter::Kinds(vec![kind])
    }

    /// Check if an event matches this filter
    pub fn matches(&self, event: &ShellEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kinds(kinds) => kinds.contains(&event.kind()),
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// An event together with the timestamp stamped by the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// The published event.
    pub event: ShellEvent,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    fn new(event: ShellEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }

    /// Dotted diagnostic name of the wrapped event.
    pub fn name(&self) -> &'static str {
        self.event.name()
    }
}

/// Type alias for boxed event handler functions
pub type EventHandler = Box<dyn Fn(&EventEnvelope)>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep recent events for diagnostics.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 1000,
        }
    }
}

struct HandlerEntry {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Rc<EventHandler>,
}

struct BusInner {
    /// Registered handlers in registration order.
    handlers: RefCell<Vec<HandlerEntry>>,
    /// Recent events for diagnostics (optional).
    history: RefCell<VecDeque<EventEnvelope>>,
    /// Total events published.
    events_published: Cell<u64>,
    /// Diagnostics receiver.
    sink: Rc<dyn TelemetrySink>,
    /// Configuration.
    config: EventBusConfig,
}

/// Central event bus for application-wide event distribution.
///
/// Cheap to clone; clones share the same handler registry. The lifetime of
/// the bus matches the shared context store that owns it: created at root
/// mount, dropped at root unmount. Handlers are torn down via their
/// [`Subscription`] disposers, never implicitly.
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<BusInner>,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        Self::with_telemetry(config, Rc::new(TracingSink))
    }

    /// Create a new event bus reporting diagnostics to a custom sink
    pub fn with_telemetry(config: EventBusConfig, sink: Rc<dyn TelemetrySink>) -> Self {
        Self {
            inner: Rc::new(BusInner {
                handlers: RefCell::new(Vec::new()),
                history: RefCell::new(VecDeque::new()),
                events_published: Cell::new(0),
                sink,
                config,
            }),
        }
    }

    /// Publish an event to all matching handlers.
    ///
    /// Delivery is synchronous and runs in registration order against the
    /// set of handlers registered when dispatch begins: a handler added
    /// during delivery receives only subsequent publishes, and a handler
    /// unsubscribed during delivery still receives this one. A handler
    /// failure is isolated and reported to the telemetry sink; delivery
    /// continues and the publisher never observes it.
    ///
    /// Returns the number of handlers the event was dispatched to. Zero
    /// handlers is a silent no-op, not an error.
    pub fn publish(&self, event: ShellEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.inner
            .events_published
            .set(self.inner.events_published.get() + 1);

        if self.inner.config.enable_history {
            self.add_to_history(&envelope);
        }

        self.inner.sink.event_published(&envelope);

        // Snapshot before dispatch; no borrow is held while handlers run,
        // so handlers may freely subscribe, unsubscribe, or publish.
        let snapshot: Vec<(SubscriptionId, Rc<EventHandler>)> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .filter(|entry| entry.filter.matches(&envelope.event))
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect();

        for (id, handler) in &snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler(&envelope)));
            if let Err(payload) = outcome {
                self.inner
                    .sink
                    .handler_failed(envelope.name(), *id, &panic_message(payload.as_ref()));
            }
        }

        snapshot.len()
    }

    /// Subscribe to events matching a filter.
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly to avoid blocking event dispatch. The same handler may be
    /// registered more than once; each registration is delivered to
    /// independently.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> Subscription
    where
        F: Fn(&EventEnvelope) + 'static,
    {
        self.register(filter, Box::new(handler))
    }

    /// Subscribe a batch of handlers in one call.
    ///
    /// The returned [`SubscriptionSet`] disposes every entry in the batch,
    /// and only that batch, independent of other subscriptions on the same
    /// events.
    pub fn subscribe_many(&self, entries: Vec<(EventFilter, EventHandler)>) -> SubscriptionSet {
        let subscriptions = entries
            .into_iter()
            .map(|(filter, handler)| self.register(filter, handler))
            .collect();
        SubscriptionSet { subscriptions }
    }

    fn register(&self, filter: EventFilter, handler: EventHandler) -> Subscription {
        let id = SubscriptionId::new();
        self.inner.handlers.borrow_mut().push(HandlerEntry {
            id,
            filter,
            handler: Rc::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
            disposed: Cell::new(false),
        }
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed. Unknown or
    /// already-removed ids are a no-op, never an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_handler(&self.inner, id)
    }

    /// Forcibly remove every handler for every event.
    ///
    /// Reserved for full application teardown (the root composition or a
    /// test-suite reset). Ordinary module unmount must dispose its own
    /// subscriptions instead.
    pub fn clear_all(&self) {
        let removed = self.inner.handlers.borrow_mut().drain(..).count();
        tracing::debug!("Cleared all {} subscriptions", removed);
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    /// Get the total number of events published
    pub fn events_published(&self) -> u64 {
        self.inner.events_published.get()
    }

    /// Get recent event history (if enabled)
    ///
    /// Returns events published at or after the given instant, or all
    /// retained history if None.
    pub fn history(&self, since: Option<DateTime<Utc>>) -> Vec<EventEnvelope> {
        if !self.inner.config.enable_history {
            return Vec::new();
        }

        let history = self.inner.history.borrow();
        match since {
            Some(since) => history
                .iter()
                .filter(|e| e.timestamp >= since)
                .cloned()
                .collect(),
            None => history.iter().cloned().collect(),
        }
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.inner.history.borrow_mut().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.inner.config
    }

    /// Add an event to history, maintaining the size limit
    fn add_to_history(&self, envelope: &EventEnvelope) {
        let mut history = self.inner.history.borrow_mut();
        history.push_back(envelope.clone());
        while history.len() > self.inner.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("events_published", &self.events_published())
            .field("config", &self.config())
            .finish()
    }
}

fn remove_handler(inner: &BusInner, id: SubscriptionId) -> bool {
    let mut handlers = inner.handlers.borrow_mut();
    let before = handlers.len();
    handlers.retain(|entry| entry.id != id);
    let removed = handlers.len() != before;
    if removed {
        tracing::debug!("Subscription {} removed", id);
    }
    removed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked with a non-string payload".to_string()
    }
}

/// Disposer for a single subscription.
///
/// The owning module invokes [`Subscription::dispose`] on its own unmount;
/// disposing twice is a safe no-op. Dropping the handle without disposing
/// leaves the handler registered — the bus cannot know when a module is
/// done, so teardown is always explicit.
#[derive(Debug)]
pub struct Subscription {
    bus: Weak<BusInner>,
    id: SubscriptionId,
    disposed: Cell<bool>,
}

impl Subscription {
    /// Identifier of this subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove this subscription from the bus.
    ///
    /// Idempotent: second and later calls do nothing, as does disposing
    /// after the bus itself was torn down.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(inner) = self.bus.upgrade() {
            remove_handler(&inner, self.id);
        }
    }

    /// Whether this subscription has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Disposer for a batch of subscriptions registered together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    /// Dispose every subscription in this batch.
    ///
    /// Idempotent, and independent of any other subscription on the same
    /// events.
    pub fn dispose_all(&self) {
        for subscription in &self.subscriptions {
            subscription.dispose();
        }
    }

    /// Number of subscriptions in this batch.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::events::{FilterEvent, SearchEvent, SelectionEvent, ShellEvent};
    use std::cell::RefCell;

    fn search_cleared() -> ShellEvent {
        ShellEvent::Search(SearchEvent::Cleared)
    }

    fn selection_cleared() -> ShellEvent {
        ShellEvent::Selection(SelectionEvent::Cleared)
    }

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.events_published(), 0);
    }

    #[test]
    fn test_publish_no_subscribers_is_noop() {
        let bus = EventBus::new();
        let delivered = bus.publish(search_cleared());
        assert_eq!(delivered, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[test]
    fn test_event_delivery() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));

        let counter_clone = counter.clone();
        let _sub = bus.subscribe(EventFilter::All, move |_| {
            counter_clone.set(counter_clone.get() + 1);
        });

        let delivered = bus.publish(search_cleared());
        assert_eq!(delivered, 1);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_handler_receives_payload() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = bus.subscribe(EventFilter::All, move |envelope| {
            if let ShellEvent::Search(SearchEvent::Submitted { query }) = &envelope.event {
                seen_clone.borrow_mut().push(query.clone());
            }
        });

        bus.publish(ShellEvent::Search(SearchEvent::Submitted {
            query: "open invoices".to_string(),
        }));

        assert_eq!(seen.borrow().as_slice(), ["open invoices"]);
    }

    #[test]
    fn test_event_filtering() {
        let bus = EventBus::new();
        let search_count = Rc::new(Cell::new(0));
        let selection_count = Rc::new(Cell::new(0));

        let sc = search_count.clone();
        let _s1 = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Search]),
            move |_| sc.set(sc.get() + 1),
        );

        let mc = selection_count.clone();
        let _s2 = bus.subscribe(EventFilter::kind(EventKind::SelectionCleared), move |_| {
            mc.set(mc.get() + 1)
        });

        bus.publish(search_cleared());
        bus.publish(selection_cleared());
        bus.publish(ShellEvent::Selection(SelectionEvent::Changed {
            selected_ids: vec!["a".to_string()],
        }));

        assert_eq!(search_count.get(), 1);
        assert_eq!(selection_count.get(), 1);
    }

    #[test]
    fn test_registration_order_preserved() {
        let bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order_clone = order.clone();
            let _ = bus.subscribe(EventFilter::All, move |_| {
                order_clone.borrow_mut().push(label);
            });
        }

        bus.publish(search_cleared());
        assert_eq!(order.borrow().as_slice(), ["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_registration_fires_twice() {
        let bus = EventBus::new();
        let counter = Rc::new(Cell::new(0));

        let c1 = counter.clone();
        let c2 = counter.clone();
        let _s1 = bus.subscribe(EventFilter::All, move |_| c1.set(c1.get() + 1));
        let _s2 = bus.subscribe(EventFilter::All, move |_| c2.set(c2.get() + 1));

        bus.publish(search_cleared());
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_handler_panic_does_not_abort_delivery() {
        let bus = EventBus::new();
        let reached = Rc::new(Cell::new(false));

        let _s1 = bus.subscribe(EventFilter::All, |_| panic!("first handler exploded"));
        let reached_clone = reached.clone();
        let _s2 = bus.subscribe(EventFilter::All, move |_| reached_clone.set(true));

        bus.publish(search_cleared());
        assert!(reached.get());
    }

    #[test]
    fn test_subscribe_during_dispatch_misses_inflight_event() {
        let bus = EventBus::new();
        let late_count = Rc::new(Cell::new(0));

        let bus_clone = bus.clone();
        let late_clone = late_count.clone();
        let _s1 = bus.subscribe(EventFilter::All, move |_| {
            let inner_count = late_clone.clone();
            // Leak the late subscription on purpose; only delivery counts matter here.
            let _ = bus_clone.subscribe(EventFilter::All, move |_| {
                inner_count.set(inner_count.get() + 1);
            });
        });

        bus.publish(search_cleared());
        assert_eq!(late_count.get(), 0);

        bus.publish(search_cleared());
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_still_delivers_inflight() {
        let bus = EventBus::new();
        let delivered = Rc::new(Cell::new(0));

        let target_id: Rc<RefCell<Option<SubscriptionId>>> = Rc::new(RefCell::new(None));

        let bus_clone = bus.clone();
        let id_clone = target_id.clone();
        let _s1 = bus.subscribe(EventFilter::All, move |_| {
            if let Some(id) = *id_clone.borrow() {
                bus_clone.unsubscribe(id);
            }
        });

        let delivered_clone = delivered.clone();
        let s2 = bus.subscribe(EventFilter::All, move |_| {
            delivered_clone.set(delivered_clone.get() + 1);
        });
        *target_id.borrow_mut() = Some(s2.id());

        // First publish: s1 removes s2 mid-dispatch, but s2 was registered
        // when dispatch began and still receives the in-flight event.
        bus.publish(search_cleared());
        assert_eq!(delivered.get(), 1);

        bus.publish(search_cleared());
        assert_eq!(delivered.get(), 1);
    }

    #[test]
    fn test_reentrant_publish_from_handler() {
        let bus = EventBus::new();
        let cleared_seen = Rc::new(Cell::new(0));

        let bus_clone = bus.clone();
        let _s1 = bus.subscribe(EventFilter::kind(EventKind::FilterClearedAll), move |_| {
            bus_clone.publish(ShellEvent::Search(SearchEvent::Cleared));
        });

        let seen_clone = cleared_seen.clone();
        let _s2 = bus.subscribe(EventFilter::kind(EventKind::SearchCleared), move |_| {
            seen_clone.set(seen_clone.get() + 1);
        });

        bus.publish(ShellEvent::Filter(FilterEvent::ClearedAll));
        assert_eq!(cleared_seen.get(), 1);
        assert_eq!(bus.events_published(), 2);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let bus = EventBus::new();
        let sub = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        sub.dispose();
        assert!(sub.is_disposed());
        assert_eq!(bus.subscriber_count(), 0);

        sub.dispose();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dispose_after_bus_dropped_is_noop() {
        let bus = EventBus::new();
        let sub = bus.subscribe(EventFilter::All, |_| {});
        drop(bus);
        sub.dispose();
        assert!(sub.is_disposed());
    }

    #[test]
    fn test_unsubscribe_unknown_id_returns_false() {
        let bus = EventBus::new();
        let sub = bus.subscribe(EventFilter::All, |_| {});
        assert!(bus.unsubscribe(sub.id()));
        assert!(!bus.unsubscribe(sub.id()));
    }

    #[test]
    fn test_dispose_does_not_affect_other_subscribers() {
        let bus = EventBus::new();
        let survivor_count = Rc::new(Cell::new(0));

        let sub = bus.subscribe(EventFilter::All, |_| {});
        let sc = survivor_count.clone();
        let _survivor = bus.subscribe(EventFilter::All, move |_| sc.set(sc.get() + 1));

        bus.publish(search_cleared());
        sub.dispose();
        bus.publish(search_cleared());

        assert_eq!(survivor_count.get(), 2);
    }

    #[test]
    fn test_subscribe_many_batch_dispose() {
        let bus = EventBus::new();
        let batch_count = Rc::new(Cell::new(0));
        let outside_count = Rc::new(Cell::new(0));

        let b1 = batch_count.clone();
        let b2 = batch_count.clone();
        let set = bus.subscribe_many(vec![
            (
                EventFilter::kind(EventKind::SearchCleared),
                Box::new(move |_: &EventEnvelope| b1.set(b1.get() + 1)) as EventHandler,
            ),
            (
                EventFilter::kind(EventKind::SelectionCleared),
                Box::new(move |_: &EventEnvelope| b2.set(b2.get() + 1)) as EventHandler,
            ),
        ]);
        assert_eq!(set.len(), 2);

        let oc = outside_count.clone();
        let _outside = bus.subscribe(EventFilter::All, move |_| oc.set(oc.get() + 1));

        bus.publish(search_cleared());
        bus.publish(selection_cleared());
        assert_eq!(batch_count.get(), 2);
        assert_eq!(outside_count.get(), 2);

        set.dispose_all();
        set.dispose_all();

        bus.publish(search_cleared());
        bus.publish(selection_cleared());
        assert_eq!(batch_count.get(), 2);
        assert_eq!(outside_count.get(), 4);
    }

    #[test]
    fn test_clear_all() {
        let bus = EventBus::new();
        let _s1 = bus.subscribe(EventFilter::All, |_| {});
        let _s2 = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 2);

        bus.clear_all();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(search_cleared()), 0);
    }

    #[test]
    fn test_history_disabled_by_default() {
        let bus = EventBus::new();
        bus.publish(search_cleared());
        assert!(bus.history(None).is_empty());
    }

    #[test]
    fn test_history_retains_and_caps() {
        let config = EventBusConfig {
            enable_history: true,
            max_history_size: 5,
        };
        let bus = EventBus::with_config(config);

        for _ in 0..8 {
            bus.publish(search_cleared());
        }

        let history = bus.history(None);
        assert_eq!(history.len(), 5);
        assert!(history.iter().all(|e| e.name() == "search.cleared"));

        bus.clear_history();
        assert!(bus.history(None).is_empty());
    }

    #[test]
    fn test_history_since_filter() {
        let config = EventBusConfig {
            enable_history: true,
            ..Default::default()
        };
        let bus = EventBus::with_config(config);

        bus.publish(search_cleared());
        let cutoff = bus.history(None).last().expect("history entry").timestamp;
        bus.publish(selection_cleared());

        let recent = bus.history(Some(cutoff));
        assert!(recent.iter().any(|e| e.name() == "selection.cleared"));
    }

    #[test]
    fn test_filter_matches() {
        let event = search_cleared();
        assert!(EventFilter::All.matches(&event));
        assert!(EventFilter::kind(EventKind::SearchCleared).matches(&event));
        assert!(!EventFilter::kind(EventKind::SearchSubmitted).matches(&event));
        assert!(EventFilter::Categories(vec![EventCategory::Search]).matches(&event));
        assert!(!EventFilter::Categories(vec![EventCategory::Selection]).matches(&event));
    }
}
