//! Provider registry — an immutable, forkable collection of providers.
//!
//! Every registration returns a **new** [`Registry`]; the receiver is
//! never touched. Forks share provider records by reference counting and
//! only copy the name table when they diverge, so keeping one registry per
//! environment is cheap.
//!
//! ```text
//!             base ──constant("db", …)──> prod
//!               │
//!               └────constant("db", …)──> test
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::{RegistrationConflictError, Result, WireboxError};
use crate::factory::{Construct, Factory};
use crate::graph::GraphWalker;
use crate::injector::Injector;
use crate::module::Module;
use crate::name::ProviderName;
use crate::provider::{Provider, Recipe};
use crate::resolver::{DeclaredNames, DependencyNameResolver};
use crate::value::Value;

/// Provider table shared between registry forks and injectors.
pub(crate) type ProviderMap = HashMap<ProviderName, Arc<Provider>>;

/// Per-registration options.
///
/// # Examples
/// ```
/// use wirebox_container::registry::RegisterOptions;
///
/// let options = RegisterOptions::new()
///     .cacheable(true)
///     .using("db", "primaryDb");
/// assert!(options.is_cacheable());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    override_existing: bool,
    using: HashMap<ProviderName, ProviderName>,
    cacheable: bool,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit replacing a provider that is already registered.
    pub fn override_existing(mut self, allow: bool) -> Self {
        self.override_existing = allow;
        self
    }

    /// Resolve the dependency the factory calls `local` from the provider
    /// registered as `actual`.
    pub fn using(mut self, local: impl Into<ProviderName>, actual: impl Into<ProviderName>) -> Self {
        self.using.insert(local.into(), actual.into());
        self
    }

    /// Memoize the built value for the lifetime of the injector.
    pub fn cacheable(mut self, cacheable: bool) -> Self {
        self.cacheable = cacheable;
        self
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }

    pub fn overrides_existing(&self) -> bool {
        self.override_existing
    }
}

/// Immutable collection of providers.
///
/// # Examples
/// ```
/// use wirebox_container::prelude::*;
///
/// let base = Registry::new()
///     .constant("port", 8080u16, RegisterOptions::new())
///     .unwrap();
///
/// let with_host = base
///     .constant("host", String::from("localhost"), RegisterOptions::new())
///     .unwrap();
///
/// assert!(!base.contains("host"));
/// assert!(with_host.contains("host"));
/// ```
#[derive(Clone)]
pub struct Registry {
    providers: Arc<ProviderMap>,
    allow_override: bool,
    names: Arc<dyn DependencyNameResolver>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Arc::new(HashMap::new()),
            allow_override: false,
            names: Arc::new(DeclaredNames),
        }
    }

    /// Returns a registry where every registration may replace an
    /// existing provider, as if `override_existing(true)` were passed.
    pub fn allow_override(&self, allow: bool) -> Self {
        Self {
            allow_override: allow,
            ..self.clone()
        }
    }

    /// Returns a registry that extracts dependency names with `resolver`.
    pub fn with_name_resolver(&self, resolver: impl DependencyNameResolver + 'static) -> Self {
        Self {
            names: Arc::new(resolver),
            ..self.clone()
        }
    }

    // ── Constructor ──

    /// Registers `T` as a constructor provider.
    ///
    /// Dependency names come from [`Construct::DEPENDENCIES`], or from
    /// [`Construct::PARAMETERS`] when no explicit list is given.
    pub fn ctor<T: Construct>(&self, name: impl Into<ProviderName>, options: RegisterOptions) -> Result<Self> {
        self.ctor_with(name, Factory::constructor::<T>(), options)
    }

    /// Registers a constructor provider from a prepared factory.
    pub fn ctor_with(
        &self,
        name: impl Into<ProviderName>,
        factory: Factory,
        options: RegisterOptions,
    ) -> Result<Self> {
        self.register_invocable(name.into(), factory, options, Recipe::Constructor)
    }

    // ── Function ──

    /// Registers a function provider.
    ///
    /// ```
    /// use wirebox_container::prelude::*;
    ///
    /// let registry = Registry::new()
    ///     .constant("port", 8080u16, RegisterOptions::new())?
    ///     .function(
    ///         "greeting",
    ///         Factory::from_fn(|args: Arguments| {
    ///             let port: u16 = args.get(0)?;
    ///             Ok(format!("listening on {port}"))
    ///         })
    ///         .with_dependencies(["port"]),
    ///         RegisterOptions::new().cacheable(true),
    ///     )?;
    ///
    /// assert_eq!(registry.get("greeting").unwrap().dependencies(), &["port"]);
    /// # Ok::<(), WireboxError>(())
    /// ```
    pub fn function(
        &self,
        name: impl Into<ProviderName>,
        factory: Factory,
        options: RegisterOptions,
    ) -> Result<Self> {
        self.register_invocable(name.into(), factory, options, Recipe::Function)
    }

    // ── Constant ──

    /// Registers a constant provider.
    ///
    /// Every build returns this exact instance. `cacheable` has no effect.
    pub fn constant<T: Send + Sync + 'static>(
        &self,
        name: impl Into<ProviderName>,
        value: T,
        options: RegisterOptions,
    ) -> Result<Self> {
        self.constant_value(name, Value::new(value), options)
    }

    /// Registers an already type-erased constant.
    pub fn constant_value(
        &self,
        name: impl Into<ProviderName>,
        value: Value,
        options: RegisterOptions,
    ) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        if !options.using.is_empty() {
            warn!(provider = %name, "`using` has no effect on a constant");
        }
        self.insert(Provider::constant(name, value), options.override_existing)
    }

    // ── Modules ──

    /// Applies a [`Module`]'s registrations.
    pub fn install(&self, module: &dyn Module) -> Result<Self> {
        debug!(module = module.name(), "Installing module");
        module.register(self.clone())
    }

    // ── Lookup ──

    /// Looks up a provider by name.
    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name).map(Arc::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Returns the number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<ProviderName> {
        let mut names: Vec<_> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    // ── Finalize ──

    /// Checks ahead of time that every dependency is registered and that
    /// the graph has no cycles.
    ///
    /// # Errors
    /// - [`WireboxError::ProviderNotFound`] — missing dependency
    /// - [`WireboxError::CycleDetected`] — cycle
    #[instrument(skip(self), name = "registry_validation")]
    pub fn validate(&self) -> Result<()> {
        GraphWalker::strict(&self.providers).validate_all()
    }

    /// Creates an injector bound to this snapshot.
    ///
    /// No validation is performed; missing providers and cycles surface
    /// from [`Injector::build`].
    pub fn finalize(&self) -> Injector {
        debug!(registered = self.len(), "Finalizing registry");
        Injector::new(Arc::clone(&self.providers))
    }

    /// Validates the graph, then creates an injector.
    pub fn finalize_checked(&self) -> Result<Injector> {
        self.validate()?;
        Ok(self.finalize())
    }

    // ── Internal ──

    fn register_invocable(
        &self,
        name: ProviderName,
        factory: Factory,
        options: RegisterOptions,
        recipe: fn(Factory) -> Recipe,
    ) -> Result<Self> {
        check_name(&name)?;

        if let (Some(explicit), Some(declared)) = (factory.explicit_dependencies(), factory.parameters()) {
            if explicit.len() != declared.len() {
                return Err(WireboxError::invalid(
                    &name,
                    format!(
                        "{} explicit dependencies given for a factory declaring {} parameters",
                        explicit.len(),
                        declared.len()
                    ),
                ));
            }
        }

        let raw = self.names.extract(&factory);
        let dependencies = apply_using(&name, raw, &options.using)?;

        let provider = Provider::invocable(name, recipe(factory), dependencies, options.cacheable);
        self.insert(provider, options.override_existing)
    }

    fn insert(&self, provider: Provider, override_existing: bool) -> Result<Self> {
        let name = provider.name().clone();

        if self.providers.contains_key(&name) && !(override_existing || self.allow_override) {
            return Err(WireboxError::RegistrationConflict(RegistrationConflictError { name }));
        }

        debug!(
            provider = %name,
            kind = %provider.kind(),
            dependencies = ?provider.dependencies(),
            cacheable = provider.is_cacheable(),
            "Registered provider"
        );

        let mut next = self.clone();
        Arc::make_mut(&mut next.providers).insert(name, Arc::new(provider));
        Ok(next)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("providers", &self.names())
            .field("allow_override", &self.allow_override)
            .finish()
    }
}

fn check_name(name: &ProviderName) -> Result<()> {
    if name.is_blank() {
        return Err(WireboxError::invalid(name, "provider name must not be empty"));
    }
    Ok(())
}

/// Rewrites raw dependency names through the `using` map.
fn apply_using(
    provider: &ProviderName,
    raw: Vec<ProviderName>,
    using: &HashMap<ProviderName, ProviderName>,
) -> Result<Vec<ProviderName>> {
    for (local, actual) in using {
        if actual.is_blank() {
            return Err(WireboxError::invalid(
                provider,
                format!("`using` maps {local:?} to an empty name"),
            ));
        }
        if !raw.contains(local) {
            warn!(provider = %provider, local = %local, "`using` entry matches no dependency");
        }
    }

    raw.into_iter()
        .map(|dependency| {
            if dependency.is_blank() {
                return Err(WireboxError::invalid(provider, "dependency names must not be empty"));
            }
            Ok(using.get(&dependency).cloned().unwrap_or(dependency))
        })
        .collect()
}
