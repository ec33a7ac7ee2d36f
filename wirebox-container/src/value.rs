//! Type-erased resolved values.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

/// A resolved dependency, shared by reference counting.
///
/// Cloning a `Value` never clones the underlying data, so the instance a
/// cacheable provider produced is the very same one every consumer sees.
///
/// # Examples
/// ```
/// use wirebox_container::value::Value;
///
/// let port = Value::new(8080u16);
/// assert_eq!(port.downcast_ref::<u16>(), Some(&8080));
/// assert!(port.downcast::<String>().is_none());
///
/// let copy = port.clone();
/// assert!(copy.ptr_eq(&port));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wraps a value of type `T`.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without re-allocating it.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// Returns the type name of the wrapped value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the wrapped value is a `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the wrapped value as a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns a shared handle to the wrapped value as a `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Returns `true` if both values point to the same instance.
    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Database {
        url: String,
    }

    #[test]
    fn downcast_to_registered_type() {
        let value = Value::new(Database { url: "postgres://localhost".into() });
        let db: Arc<Database> = value.downcast().unwrap();
        assert_eq!(db.url, "postgres://localhost");
        assert!(value.is::<Database>());
        assert!(value.type_name().contains("Database"));
    }

    #[test]
    fn downcast_to_wrong_type() {
        let value = Value::new(42i32);
        assert!(value.downcast::<i64>().is_none());
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn clones_share_instance() {
        let value = Value::new(String::from("shared"));
        let a = value.downcast::<String>().unwrap();
        let b = value.clone().downcast::<String>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn from_arc_keeps_allocation() {
        let shared = Arc::new(7u8);
        let value = Value::from_arc(Arc::clone(&shared));
        assert!(Arc::ptr_eq(&shared, &value.downcast::<u8>().unwrap()));
    }

    #[test]
    fn distinct_values_are_not_ptr_eq() {
        assert!(!Value::new(1u8).ptr_eq(&Value::new(1u8)));
    }
}
