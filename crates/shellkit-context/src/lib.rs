//! # Shellkit Context
//!
//! Shared context store for the composed workbench shell: a scoped,
//! single-instance state container exposing typed slices (search,
//! navigation, selection, identity) to every module in the composed tree.
//! Every mutating operation updates local state and publishes a
//! corresponding event on the `shellkit-core` event bus, so modules can
//! consume the state reactively, react to occurrences only, or both.

pub mod error;
pub mod provider;
pub mod state;
pub mod store;

pub use error::{ContextError, ContextResult};
pub use provider::{ContextHandle, ContextProvider};
pub use state::{NavigationState, SearchState, SelectionState, SliceKind};
pub use store::{
    ContextStore, ContextStoreBuilder, NavigationSlice, ObserverHandle, ObserverId, SearchSlice,
    SelectionSlice,
};
