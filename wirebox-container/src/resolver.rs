//! Dependency-name extraction.
//!
//! The registry never guesses dependency names from a function's source.
//! It asks a [`DependencyNameResolver`], which reads the metadata a
//! [`Factory`] carries.

use crate::factory::Factory;
use crate::name::ProviderName;

/// Returns the ordered dependency names of a factory.
///
/// Implementations must return an empty list for a factory without
/// parameters, and must prefer an explicit dependency list over the
/// factory's declared parameter names.
pub trait DependencyNameResolver: Send + Sync {
    fn extract(&self, factory: &Factory) -> Vec<ProviderName>;
}

/// The default resolver: explicit dependencies, else declared parameters.
///
/// # Examples
/// ```
/// use wirebox_container::factory::{Arguments, Factory};
/// use wirebox_container::name::ProviderName;
/// use wirebox_container::resolver::{DeclaredNames, DependencyNameResolver};
///
/// let factory = Factory::from_fn(|_: Arguments| Ok(1u8))
///     .with_parameters(["db"])
///     .with_dependencies(["primaryDb"]);
///
/// assert_eq!(DeclaredNames.extract(&factory), vec![ProviderName::new("primaryDb")]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclaredNames;

impl DependencyNameResolver for DeclaredNames {
    fn extract(&self, factory: &Factory) -> Vec<ProviderName> {
        factory
            .explicit_dependencies()
            .or_else(|| factory.parameters())
            .map(<[ProviderName]>::to_vec)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Arguments;

    fn noop() -> Factory {
        Factory::from_fn(|_: Arguments| Ok(()))
    }

    #[test]
    fn no_metadata_means_no_dependencies() {
        assert!(DeclaredNames.extract(&noop()).is_empty());
    }

    #[test]
    fn declared_parameters_are_used() {
        let factory = noop().with_parameters(["config", "logger"]);
        assert_eq!(DeclaredNames.extract(&factory), vec![ProviderName::new("config"), ProviderName::new("logger")]);
    }

    #[test]
    fn explicit_list_wins() {
        let factory = noop()
            .with_parameters(["config"])
            .with_dependencies(["appConfig"]);
        assert_eq!(DeclaredNames.extract(&factory), vec![ProviderName::new("appConfig")]);
    }

    #[test]
    fn explicit_empty_list_wins() {
        let factory = noop()
            .with_parameters(["config"])
            .with_dependencies(Vec::<&str>::new());
        assert!(DeclaredNames.extract(&factory).is_empty());
    }
}
