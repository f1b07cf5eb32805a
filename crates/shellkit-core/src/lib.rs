//! # Shellkit Core
//!
//! Event bus, event catalog, and shared data model for the composed
//! workbench shell. Provides the primitives independently built UI modules
//! use to notify one another of domain events without holding direct
//! references to each other.

pub mod data;
pub mod event_bus;
pub mod telemetry;

pub use data::{Breadcrumb, Filter, Identity, NavigateCallback};

// Re-export event bus for convenience
pub use event_bus::{
    EventBus, EventBusConfig, EventCategory, EventEnvelope, EventFilter, EventHandler, EventKind,
    FilterEvent, NavigationEvent, SearchEvent, SelectionEvent, ShellEvent, Subscription,
    SubscriptionId, SubscriptionSet,
};

pub use telemetry::{TelemetrySink, TracingSink};
