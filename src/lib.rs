//! # Shellkit
//!
//! Cross-module coordination layer for composed workbench applications:
//! the mechanism by which independently built, independently deployed UI
//! modules share transient application state and notify one another of
//! domain events without holding direct references to each other.
//!
//! ## Architecture
//!
//! Shellkit is organized as a workspace with two crates, strictly layered:
//!
//! 1. **shellkit-core** - Event bus, closed event catalog, shared data model
//! 2. **shellkit-context** - Shared context store (search, navigation,
//!    selection, identity slices), change observers, provider/accessor
//!
//! The root composition constructs one [`ContextStore`] at startup and
//! mounts it on a [`ContextProvider`]; modules receive a [`ContextHandle`],
//! read slices to render, call mutators on user interaction, and subscribe
//! to bus events they care about. Every mutator updates state first and
//! then publishes the matching [`ShellEvent`], so reactive consumers and
//! bus-only consumers (telemetry, cache invalidation) stay consistent.
//!
//! ```rust,ignore
//! use shellkit::{ContextProvider, ContextStore, Identity};
//!
//! shellkit::init_logging()?;
//!
//! let provider = ContextProvider::new();
//! let store = provider.mount(
//!     ContextStore::builder()
//!         .identity(Identity::new("u1", "Alice"))
//!         .build()?,
//! )?;
//!
//! // Hand `provider.handle()` to each loaded module.
//! store.search().set_query("open invoices");
//! ```

pub use shellkit_core::{
    Breadcrumb, EventBus, EventBusConfig, EventCategory, EventEnvelope, EventFilter, EventHandler,
    EventKind, Filter, FilterEvent, Identity, NavigateCallback, NavigationEvent, SearchEvent,
    SelectionEvent, ShellEvent, Subscription, SubscriptionId, SubscriptionSet, TelemetrySink,
    TracingSink,
};

pub use shellkit_context::{
    ContextError, ContextHandle, ContextProvider, ContextResult, ContextStore,
    ContextStoreBuilder, NavigationSlice, NavigationState, ObserverHandle, ObserverId,
    SearchSlice, SearchState, SelectionSlice, SelectionState, SliceKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
