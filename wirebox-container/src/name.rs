//! Provider identification.
//!
//! [`ProviderName`] uniquely identifies a provider within a
//! [`Registry`](crate::registry::Registry). It is a cheaply cloneable,
//! reference-counted string.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Uniquely identifies a provider in the registry.
///
/// # Examples
/// ```
/// use wirebox_container::name::ProviderName;
///
/// let name = ProviderName::new("primaryDb");
/// assert_eq!(name.as_str(), "primaryDb");
/// assert_eq!(name, "primaryDb");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderName(Arc<str>);

impl ProviderName {
    /// Creates a name from anything string-like.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the name is empty or only whitespace.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Deref for ProviderName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<ProviderName, _>` be queried with a plain `&str`.
impl Borrow<str> for ProviderName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProviderName {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for ProviderName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for ProviderName {
    fn from(name: &String) -> Self {
        Self(Arc::from(name.as_str()))
    }
}

impl From<&ProviderName> for ProviderName {
    fn from(name: &ProviderName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for ProviderName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ProviderName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_equality() {
        assert_eq!(ProviderName::new("db"), ProviderName::from("db"));
        assert_ne!(ProviderName::new("db"), ProviderName::new("Db"));
    }

    #[test]
    fn name_compares_with_str() {
        let name = ProviderName::from(String::from("port"));
        assert_eq!(name, "port");
        assert!(name == *"port");
    }

    #[test]
    fn blank_names() {
        assert!(ProviderName::new("").is_blank());
        assert!(ProviderName::new("  \t").is_blank());
        assert!(!ProviderName::new("x").is_blank());
    }

    #[test]
    fn name_in_hashmap_lookup_by_str() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ProviderName::new("db"), 1);
        map.insert(ProviderName::new("port"), 2);
        assert_eq!(map.get("port"), Some(&2));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn display_and_debug() {
        let name = ProviderName::new("greeting");
        assert_eq!(format!("{name}"), "greeting");
        assert_eq!(format!("{name:?}"), "\"greeting\"");
    }
}
