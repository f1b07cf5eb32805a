//! Provider and accessor for the shared context store.
//!
//! The root composition owns a [`ContextProvider`]: it mounts exactly one
//! [`ContextStore`] at startup and unmounts it at shutdown. Modules loaded
//! anywhere in the composed tree receive a cloneable [`ContextHandle`] and
//! read the live store through it; requesting the store outside its mounted
//! lifetime fails loudly rather than returning a stub, because a silently
//! missing store would corrupt UI state invisibly across module boundaries.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{ContextError, ContextResult};
use crate::store::ContextStore;

type StoreSlot = RefCell<Option<Rc<ContextStore>>>;

/// Host-owned mount point for the shared context store.
pub struct ContextProvider {
    slot: Rc<StoreSlot>,
}

impl ContextProvider {
    /// Create an empty provider (nothing mounted).
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Mount a freshly constructed store.
    ///
    /// Fails with [`ContextError::AlreadyMounted`] while a store is live:
    /// exactly one instance exists per composed application. Returns the
    /// mounted store for the host's own use.
    pub fn mount(&self, store: ContextStore) -> ContextResult<Rc<ContextStore>> {
        let mut slot = self.slot.borrow_mut();
        if slot.is_some() {
            return Err(ContextError::AlreadyMounted);
        }
        let store = Rc::new(store);
        *slot = Some(Rc::clone(&store));
        tracing::debug!(identity = %store.identity().id, "Shared context mounted");
        Ok(store)
    }

    /// Unmount the current store, if any.
    ///
    /// Bus subscriptions are not torn down here; modules dispose their own
    /// subscriptions on unmount, and the host may call `clear_all` on the
    /// bus as part of full teardown. A later [`ContextProvider::mount`]
    /// starts from a fresh store, never a reused one.
    pub fn unmount(&self) {
        if self.slot.borrow_mut().take().is_some() {
            tracing::debug!("Shared context unmounted");
        }
    }

    /// Whether a store is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Create an accessor to hand to modules in the composed tree.
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            slot: Rc::downgrade(&self.slot),
        }
    }
}

impl Default for ContextProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable accessor to the currently mounted store.
#[derive(Clone)]
pub struct ContextHandle {
    slot: Weak<StoreSlot>,
}

impl ContextHandle {
    /// The currently mounted store.
    ///
    /// Fails with [`ContextError::NotMounted`] before the root composition
    /// has mounted a store, after unmount, or after the provider itself was
    /// dropped.
    pub fn try_current(&self) -> ContextResult<Rc<ContextStore>> {
        let slot = self.slot.upgrade().ok_or(ContextError::NotMounted)?;
        let current = slot.borrow().clone();
        current.ok_or(ContextError::NotMounted)
    }

    /// The currently mounted store.
    ///
    /// # Panics
    ///
    /// Panics when no store is mounted. Requesting the shared context
    /// outside its lifetime is a wiring defect in the composition, not a
    /// recoverable condition.
    pub fn current(&self) -> Rc<ContextStore> {
        match self.try_current() {
            Ok(store) => store,
            Err(_) => panic!(
                "shared context accessed outside its mounted lifetime; \
                 the root composition must mount a ContextStore first"
            ),
        }
    }
}
