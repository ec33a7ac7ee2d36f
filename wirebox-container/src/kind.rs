//! Provider kinds.
//!
//! The kind determines the construction rule the injector applies:
//! - [`ProviderKind::Constant`] — the registered value itself
//! - [`ProviderKind::Constructor`] — a new instance built by [`Construct`](crate::factory::Construct)
//! - [`ProviderKind::Function`] — whatever the factory function returns
use std::fmt;

/// Tag describing how a provider produces its value.
///
/// # Examples
/// ```
/// use wirebox_container::kind::ProviderKind;
///
/// assert!(!ProviderKind::Constant.is_invocable());
/// assert!(ProviderKind::Function.is_invocable());
/// assert_eq!(ProviderKind::Constructor.to_string(), "Constructor");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// A pre-built value, returned as-is on every build.
    ///
    /// Constants never have dependencies.
    Constant,

    /// A type implementing [`Construct`](crate::factory::Construct),
    /// instantiated with the resolved dependencies.
    Constructor,

    /// A factory function invoked with the resolved dependencies.
    Function,
}

impl ProviderKind {
    /// Returns `true` if building this kind invokes a factory.
    #[inline]
    pub fn is_invocable(&self) -> bool {
        matches!(self, ProviderKind::Constructor | ProviderKind::Function)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Constant => write!(f, "Constant"),
            ProviderKind::Constructor => write!(f, "Constructor"),
            ProviderKind::Function => write!(f, "Function"),
        }
    }
}
