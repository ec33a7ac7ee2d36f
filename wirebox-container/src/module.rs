//! Modules — groups of related provider registrations.
//!
//! # Examples
//! ```rust
//! use wirebox_container::prelude::*;
//!
//! struct HttpModule;
//!
//! impl Module for HttpModule {
//!     fn register(&self, registry: Registry) -> Result<Registry> {
//!         registry
//!             .constant("port", 8080u16, RegisterOptions::new())?
//!             .constant("host", String::from("0.0.0.0"), RegisterOptions::new())
//!     }
//! }
//!
//! let registry = Registry::new().install(&HttpModule).unwrap();
//! assert!(registry.contains("port"));
//! ```

use crate::error::Result;
use crate::registry::Registry;

/// A set of related registrations applied to a [`Registry`] in one go.
///
/// Split registrations by concern instead of one giant block:
///
/// ```rust,ignore
/// let registry = Registry::new()
///     .install(&DatabaseModule)?
///     .install(&AuthModule)?
///     .install(&EmailModule)?;
/// ```
pub trait Module: Send + Sync {
    /// Registers this module's providers, returning the extended registry.
    fn register(&self, registry: Registry) -> Result<Registry>;

    /// Optional: human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireboxError;
    use crate::registry::RegisterOptions;

    struct TestModule;

    impl Module for TestModule {
        fn register(&self, registry: Registry) -> Result<Registry> {
            registry
                .constant("greeting", String::from("hello"), RegisterOptions::new())?
                .constant("answer", 42i32, RegisterOptions::new())
        }
    }

    #[test]
    fn module_registers_providers() {
        let registry = Registry::new().install(&TestModule).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("greeting"));
        assert!(registry.contains("answer"));
    }

    #[test]
    fn module_has_name() {
        assert!(TestModule.name().contains("TestModule"));
    }

    #[test]
    fn installing_twice_conflicts() {
        let registry = Registry::new().install(&TestModule).unwrap();
        let err = registry.install(&TestModule).unwrap_err();
        assert!(matches!(err, WireboxError::RegistrationConflict(_)));
        // The receiver is untouched by the failed install.
        assert_eq!(registry.len(), 2);
    }
}
