//! # Event Bus Module
//!
//! Typed publish/subscribe for decoupled communication between modules of
//! the composed workbench.
//!
//! ## Overview
//!
//! - Publishers emit catalog events without knowing subscribers
//! - Subscribers filter and receive events of interest, in registration order
//! - A failing handler is isolated and reported; delivery continues
//! - Subscriptions are torn down explicitly via their disposers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shellkit_core::event_bus::{EventBus, EventFilter, EventKind, SelectionEvent, ShellEvent};
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to selection changes
//! let subscription = bus.subscribe(
//!     EventFilter::kind(EventKind::SelectionChanged),
//!     |envelope| {
//!         if let ShellEvent::Selection(SelectionEvent::Changed { selected_ids }) = &envelope.event {
//!             println!("{} items selected", selected_ids.len());
//!         }
//!     },
//! );
//!
//! // Publish an event
//! bus.publish(ShellEvent::Selection(SelectionEvent::Changed {
//!     selected_ids: vec!["row-1".to_string()],
//! }));
//!
//! // Dispose on module unmount
//! subscription.dispose();
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
