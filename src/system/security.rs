// src/system/security.rs

use crate::constants::ROLES_DATA_KEY;
use crate::core::item::MenuItem;
use serde_json::Value;
use std::collections::HashSet;

/// Decides whether an item may be shown and activated.
///
/// Called on every query without caching, so implementations must be cheap and
/// free of side effects.
pub trait Authorizer: Send + Sync {
    /// Whether `item` may be shown and activated.
    fn is_allowed(&self, item: &MenuItem) -> bool;
}

/// Allows everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptimisticAuthorizer;

impl Authorizer for OptimisticAuthorizer {
    fn is_allowed(&self, _item: &MenuItem) -> bool {
        true
    }
}

/// Allows items whose `roles` data entry shares at least one role with the user.
///
/// Items without a `roles` entry are public. The entry may be a single string or
/// a list of strings; any other shape denies access.
#[derive(Debug, Default, Clone)]
pub struct RoleAuthorizer {
    roles: HashSet<String>,
}

impl RoleAuthorizer {
    /// An authorizer for a user holding `roles`.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    fn has_role(&self, role: &Value) -> bool {
        role.as_str().is_some_and(|role| self.roles.contains(role))
    }
}

impl Authorizer for RoleAuthorizer {
    fn is_allowed(&self, item: &MenuItem) -> bool {
        match item.get_data(ROLES_DATA_KEY) {
            None => true,
            Some(Value::Array(required)) => required.iter().any(|role| self.has_role(role)),
            Some(role @ Value::String(_)) => self.has_role(role),
            Some(other) => {
                log::warn!(
                    "Item '{}' has an unsupported '{}' entry ({}). Denying access.",
                    item.name(),
                    ROLES_DATA_KEY,
                    other
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::container::MenuItems;

    #[test]
    fn test_role_authorizer() {
        let mut items = MenuItems::new();
        items.add_item("public", "Public");
        items
            .add_item("admin", "Admin")
            .add_data(ROLES_DATA_KEY, "admin");
        items
            .add_item("staff", "Staff")
            .add_data(ROLES_DATA_KEY, serde_json::json!(["editor", "admin"]));
        items.add_item("broken", "Broken").add_data(ROLES_DATA_KEY, 5);

        let editor = RoleAuthorizer::new(["editor"]);
        let allowed = |name: &str| editor.is_allowed(items.get_item(name).unwrap());

        assert!(allowed("public"));
        assert!(!allowed("admin"));
        assert!(allowed("staff"));
        assert!(!allowed("broken"));
        assert!(OptimisticAuthorizer.is_allowed(items.get_item("admin").unwrap()));
    }
}
