//! Data models shared across the composed workbench
//!
//! This module provides:
//! - Authenticated identity injected once at root mount
//! - Structured search filters keyed for insert-or-replace
//! - Breadcrumb entries for the navigation trail

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Callback attached to a breadcrumb, invoked when the crumb is activated.
///
/// Owned by the module that produced the breadcrumb; the store only calls it.
pub type NavigateCallback = Rc<dyn Fn()>;

/// Authenticated identity of the current session.
///
/// Injected into the shared context when the root composition mounts and
/// read-only thereafter; it cannot change within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier of the authenticated user.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address, when the identity provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Permission names granted to this session.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Identity {
    /// Create an identity with no email and no permissions.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            permissions: Vec::new(),
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach the granted permission names.
    pub fn with_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Whether the session holds the named permission.
    ///
    /// Data accessor only; enforcement is the caller's concern.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A structured search filter.
///
/// `id` is the insert-or-replace key: applying a filter whose `id` is
/// already present replaces that entry in place, preserving order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Upsert key within the filter list.
    pub id: String,
    /// Filter kind, e.g. `"status"` or `"owner"`.
    #[serde(rename = "type")]
    pub filter_type: String,
    /// Human-readable label shown by filter chips.
    pub label: String,
    /// Opaque filter value; its shape is owned by the module that applied it.
    pub value: serde_json::Value,
}

impl Filter {
    /// Create a filter.
    pub fn new(
        id: impl Into<String>,
        filter_type: impl Into<String>,
        label: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            filter_type: filter_type.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.filter_type, self.value)
    }
}

/// One entry in the navigation breadcrumb trail.
///
/// The optional callback belongs to the module that produced the crumb; it
/// is skipped during serialization and ignored by equality.
#[derive(Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Identifier of the navigation target.
    pub id: String,
    /// Label rendered in the trail.
    pub label: String,
    /// Invoked by the store when the crumb is activated.
    #[serde(skip)]
    pub on_navigate: Option<NavigateCallback>,
}

impl Breadcrumb {
    /// Create a breadcrumb without a callback.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            on_navigate: None,
        }
    }

    /// Attach an activation callback.
    pub fn with_callback(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_navigate = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breadcrumb")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("on_navigate", &self.on_navigate.as_ref().map(|_| "Fn"))
            .finish()
    }
}

impl PartialEq for Breadcrumb {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_identity_permissions() {
        let identity = Identity::new("u1", "Alice")
            .with_permissions(vec!["reports.read".to_string(), "reports.export".to_string()]);

        assert!(identity.has_permission("reports.read"));
        assert!(!identity.has_permission("reports.delete"));
    }

    #[test]
    fn test_identity_display() {
        let identity = Identity::new("u1", "Alice").with_email("alice@example.com");
        assert_eq!(identity.to_string(), "Alice (u1)");
        assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_filter_serde_rename() {
        let filter = Filter::new("status", "status", "Status", "open");
        let json = serde_json::to_value(&filter).expect("Should serialize");

        assert_eq!(json["type"], "status");
        assert!(json.get("filter_type").is_none());

        let parsed: Filter = serde_json::from_value(json).expect("Should deserialize");
        assert_eq!(parsed, filter);
    }

    #[test]
    fn test_breadcrumb_equality_ignores_callback() {
        let plain = Breadcrumb::new("reports", "Reports");
        let with_callback = Breadcrumb::new("reports", "Reports").with_callback(|| {});

        assert_eq!(plain, with_callback);
        assert_ne!(plain, Breadcrumb::new("reports", "All Reports"));
    }

    #[test]
    fn test_breadcrumb_callback_invoked() {
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        let crumb = Breadcrumb::new("home", "Home").with_callback(move || {
            fired_clone.set(true);
        });

        if let Some(callback) = &crumb.on_navigate {
            callback();
        }
        assert!(fired.get());
    }

    #[test]
    fn test_breadcrumb_serde_skips_callback() {
        let crumb = Breadcrumb::new("home", "Home").with_callback(|| {});
        let json = serde_json::to_string(&crumb).expect("Should serialize");
        let parsed: Breadcrumb = serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(parsed, crumb);
        assert!(parsed.on_navigate.is_none());
    }
}
