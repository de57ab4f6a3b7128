//! Role definitions for choreographic protocols

use std::fmt;

/// A role (participant) in the choreography
///
/// Roles are opaque names. Two roles are the same participant exactly when
/// their names are equal, and a protocol declares each role once.
///
/// # Examples
///
/// ```
/// use rumpsteak_epp_choreography::Role;
///
/// let buyer = Role::new("buyer1");
/// assert_eq!(buyer.name(), "buyer1");
/// assert_eq!(buyer, Role::from("buyer1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct Role {
    name: String,
}

impl Role {
    /// Create a new role with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Role { name: name.into() }
    }

    /// The role's name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Role::new(name)
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Role::new(name)
    }
}

impl From<&Role> for Role {
    fn from(role: &Role) -> Self {
        role.clone()
    }
}
