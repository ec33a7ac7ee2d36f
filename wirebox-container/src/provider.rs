//! Provider records.
//!
//! A [`Provider`] describes one named dependency source: what it is
//! called, how it is built ([`Recipe`]), what it depends on and whether
//! its value is cached. Providers are sealed once created; the registry
//! shares them between forks by reference counting.

use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::Result;
use crate::factory::{Arguments, Factory};
use crate::kind::ProviderKind;
use crate::name::ProviderName;
use crate::value::Value;

/// How a provider produces its value. One construction rule per variant.
#[derive(Debug, Clone)]
pub enum Recipe {
    /// Returned as-is.
    Constant(Value),
    /// Instantiated through [`Construct`](crate::factory::Construct).
    Constructor(Factory),
    /// Invoked, and its return value used.
    Function(Factory),
}

impl Recipe {
    /// The kind tag of this recipe.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Recipe::Constant(_) => ProviderKind::Constant,
            Recipe::Constructor(_) => ProviderKind::Constructor,
            Recipe::Function(_) => ProviderKind::Function,
        }
    }

    /// The factory behind an invocable recipe.
    pub fn factory(&self) -> Option<&Factory> {
        match self {
            Recipe::Constant(_) => None,
            Recipe::Constructor(factory) | Recipe::Function(factory) => Some(factory),
        }
    }
}

/// One named, buildable unit.
#[derive(Clone)]
pub struct Provider {
    name: ProviderName,
    recipe: Recipe,
    dependencies: Arc<[ProviderName]>,
    cacheable: bool,
}

impl Provider {
    /// A constant provider. Constants have no dependencies and are never
    /// cached (the stored value is already shared).
    pub(crate) fn constant(name: ProviderName, value: Value) -> Self {
        Self {
            name,
            recipe: Recipe::Constant(value),
            dependencies: Arc::from(Vec::new()),
            cacheable: false,
        }
    }

    /// A constructor or function provider.
    pub(crate) fn invocable(
        name: ProviderName,
        recipe: Recipe,
        dependencies: Vec<ProviderName>,
        cacheable: bool,
    ) -> Self {
        debug_assert!(recipe.kind().is_invocable());
        Self {
            name,
            recipe,
            dependencies: dependencies.into(),
            cacheable,
        }
    }

    pub fn name(&self) -> &ProviderName {
        &self.name
    }

    pub fn kind(&self) -> ProviderKind {
        self.recipe.kind()
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Dependency names in positional order, after `using` rewrites.
    pub fn dependencies(&self) -> &[ProviderName] {
        &self.dependencies
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    /// Applies the construction rule to the resolved dependencies.
    pub(crate) fn construct(&self, values: Vec<Value>) -> BoxFuture<'static, Result<Value>> {
        match &self.recipe {
            Recipe::Constant(value) => futures::future::ready(Ok(value.clone())).boxed(),
            Recipe::Constructor(factory) | Recipe::Function(factory) => {
                let args = Arguments::new(self.name.clone(), Arc::clone(&self.dependencies), values);
                factory.invoke(args)
            }
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("dependencies", &self.dependencies)
            .field("cacheable", &self.cacheable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::BoxError;

    #[tokio::test]
    async fn constant_returns_same_instance() {
        let value = Value::new(8080u16);
        let provider = Provider::constant("port".into(), value.clone());

        assert_eq!(provider.kind(), ProviderKind::Constant);
        assert!(provider.dependencies().is_empty());
        assert!(!provider.is_cacheable());

        let built = provider.construct(Vec::new()).await.unwrap();
        assert!(built.ptr_eq(&value));
    }

    #[tokio::test]
    async fn function_receives_positional_arguments() {
        let factory = Factory::from_fn(|args: Arguments| {
            let host: String = args.get(0)?;
            let port: u16 = args.get(1)?;
            Ok::<_, BoxError>(format!("{host}:{port}"))
        });
        let provider = Provider::invocable(
            "address".into(),
            Recipe::Function(factory),
            vec!["host".into(), "port".into()],
            true,
        );

        assert_eq!(provider.dependencies(), &["host", "port"]);
        assert!(provider.is_cacheable());

        let built = provider
            .construct(vec![Value::new(String::from("localhost")), Value::new(80u16)])
            .await
            .unwrap();
        assert_eq!(built.downcast_ref::<String>().unwrap(), "localhost:80");
    }

    #[test]
    fn recipe_kinds() {
        let factory = Factory::from_fn(|_: Arguments| Ok(()));
        assert_eq!(Recipe::Constructor(factory.clone()).kind(), ProviderKind::Constructor);
        assert!(Recipe::Function(factory).factory().is_some());
        assert!(Recipe::Constant(Value::new(1u8)).factory().is_none());
    }

    #[test]
    fn debug_output() {
        let provider = Provider::constant("port".into(), Value::new(1u16));
        let debug = format!("{provider:?}");
        assert!(debug.contains("port"));
        assert!(debug.contains("Constant"));
    }
}
