//! Error types for the shared context crate.
//!
//! The context layer has exactly two caller-visible failure modes: a
//! configuration error at construction and a usage error when the store is
//! accessed outside its mounted lifetime. Everything else in this layer is
//! defined as a safe no-op.

use thiserror::Error;

/// Errors that can occur while wiring the shared context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The store was configured without the authenticated identity.
    #[error("Shared context requires an identity; downstream modules assume it is present")]
    MissingIdentity,

    /// The store was requested outside its mounted lifetime.
    #[error("Shared context accessed outside its mounted lifetime")]
    NotMounted,

    /// A second mount was attempted while a store is already live.
    #[error("Shared context is already mounted for this composition")]
    AlreadyMounted,
}

/// Result type alias for context operations.
pub type ContextResult<T> = Result<T, ContextError>;
