//! # The Injector — heart of Wirebox
//!
//! Resolves providers by name: builds every dependency first (all of a
//! provider's dependencies concurrently), feeds the results to the
//! provider's construction rule in declared order, and memoizes cacheable
//! values for the injector's lifetime.
//!
//! # Architecture
//! ```text
//! Registry ──finalize()──> Injector ──build(name)──> Session
//!                             │                        │
//!                        result cache           in-flight builds
//!                    (cacheable providers,      (one per provider,
//!                     lives with injector)       lives with call)
//! ```
//!
//! # Examples
//! ```rust
//! use wirebox_container::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let injector = Registry::new()
//!     .constant("port", 8080u16, RegisterOptions::new())?
//!     .function(
//!         "greeting",
//!         Factory::from_fn(|args: Arguments| {
//!             let port: u16 = args.get(0)?;
//!             Ok(format!("listening on {port}"))
//!         })
//!         .with_dependencies(["port"]),
//!         RegisterOptions::new().cacheable(true),
//!     )?
//!     .finalize();
//!
//! let greeting: std::sync::Arc<String> = injector.resolve("greeting").await?;
//! assert_eq!(*greeting, "listening on 8080");
//! # Ok(())
//! # }
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared, try_join_all};
use parking_lot::Mutex;
use tracing::{debug, instrument, trace};
use wirebox_support::rendering::suggest_similar;

use crate::error::{Result, TypeMismatchError, WireboxError};
use crate::graph::GraphWalker;
use crate::name::ProviderName;
use crate::provider::Provider;
use crate::registry::ProviderMap;
use crate::value::Value;

/// A build that any number of consumers can await.
type SharedBuild = Shared<BoxFuture<'static, Result<Value>>>;

enum Cached {
    Ready(Value),
    Pending(SharedBuild),
}

struct InjectorState {
    providers: Arc<ProviderMap>,
    cache: Mutex<HashMap<ProviderName, Cached>>,
}

/// Resolves providers from one registry snapshot.
///
/// Created by [`Registry::finalize`](crate::registry::Registry::finalize).
/// Clones are handles to the same injector and share its cache.
#[derive(Clone)]
pub struct Injector {
    state: Arc<InjectorState>,
}

impl Injector {
    pub(crate) fn new(providers: Arc<ProviderMap>) -> Self {
        Self {
            state: Arc::new(InjectorState {
                providers,
                cache: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Builds the provider registered as `name`.
    ///
    /// # Errors
    /// - [`WireboxError::ProviderNotFound`] — `name`, or something it
    ///   depends on, is not registered; the chain leads back to `name`
    /// - [`WireboxError::CycleDetected`] — `name` transitively depends on
    ///   a provider that depends on itself
    /// - whatever a factory failed with, unchanged
    #[instrument(skip(self), name = "injector_build")]
    pub async fn build(&self, name: &str) -> Result<Value> {
        let name = ProviderName::from(name);

        if let Some(value) = self.cached(&name) {
            trace!(provider = %name, "Cache hit");
            return Ok(value);
        }

        self.check_cycles(&name)?;

        let session = Arc::new(Session {
            state: Arc::clone(&self.state),
            in_flight: Mutex::new(Some(HashMap::new())),
        });
        let _release = SessionGuard(Arc::clone(&session));

        let value = session.resolve(name).await?;
        debug!(value_type = value.type_name(), "Built");
        Ok(value)
    }

    /// Builds `name` and downcasts the result.
    ///
    /// # Errors
    /// Everything [`Injector::build`] returns, plus
    /// [`WireboxError::TypeMismatch`] if the value is not a `T`.
    pub async fn resolve<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let value = self.build(name).await?;
        value.downcast::<T>().ok_or_else(|| {
            WireboxError::TypeMismatch(TypeMismatchError {
                provider: ProviderName::from(name),
                expected: type_name::<T>(),
                found: value.type_name(),
            })
        })
    }

    /// Returns `true` if a value for `name` is held in the cache.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cached(name).is_some()
    }

    /// Returns `true` if the bound snapshot has a provider called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.state.providers.contains_key(name)
    }

    /// Returns the number of providers in the bound snapshot.
    pub fn len(&self) -> usize {
        self.state.providers.len()
    }

    /// Returns true if the bound snapshot has no providers.
    pub fn is_empty(&self) -> bool {
        self.state.providers.is_empty()
    }

    fn cached(&self, name: &str) -> Option<Value> {
        match self.state.cache.lock().get(name) {
            Some(Cached::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn check_cycles(&self, root: &ProviderName) -> Result<()> {
        let settled: Vec<ProviderName> = self
            .state
            .cache
            .lock()
            .iter()
            .filter(|(_, cached)| matches!(cached, Cached::Ready(_)))
            .map(|(name, _)| name.clone())
            .collect();

        GraphWalker::lenient(&self.state.providers)
            .settled(settled)
            .check_from(root)
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("registered", &self.state.providers.len())
            .field("cached", &self.state.cache.lock().len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Session — one top-level build() call
// ═══════════════════════════════════════════

/// State of a single `build()` call.
///
/// Every provider reached during the call is built at most once: the
/// first requester starts the build, later ones join its shared future.
///
/// A call that joins a cacheable build started by another call receives
/// whatever that build resolved in its own session. A non-cacheable
/// dependency reached both through the joined build and directly is
/// therefore built once by each call, not once overall.
struct Session {
    state: Arc<InjectorState>,
    /// `None` once the originating call has returned.
    in_flight: Mutex<Option<HashMap<ProviderName, SharedBuild>>>,
}

impl Session {
    fn resolve(self: &Arc<Self>, name: ProviderName) -> SharedBuild {
        let mut guard = self.in_flight.lock();
        let Some(in_flight) = guard.as_mut() else {
            // A cached build outlived its call and is driven by another caller.
            return Arc::clone(self).produce(name).boxed().shared();
        };

        if let Some(build) = in_flight.get(&name) {
            trace!(provider = %name, "Joining in-flight build");
            return build.clone();
        }

        let build = Arc::clone(self).produce(name.clone()).boxed().shared();
        in_flight.insert(name, build.clone());
        build
    }

    async fn produce(self: Arc<Self>, name: ProviderName) -> Result<Value> {
        let Some(provider) = self.state.providers.get(&name).cloned() else {
            return Err(self.not_found(name));
        };

        if !provider.is_cacheable() {
            return self.instantiate(provider).await;
        }

        let build = {
            let mut cache = self.state.cache.lock();
            match cache.get(&name) {
                Some(Cached::Ready(value)) => {
                    trace!(provider = %name, "Cache hit");
                    return Ok(value.clone());
                }
                Some(Cached::Pending(build)) => {
                    trace!(provider = %name, "Joining cached in-flight build");
                    build.clone()
                }
                None => {
                    let build = Arc::clone(&self).instantiate_cached(provider).boxed().shared();
                    cache.insert(name, Cached::Pending(build.clone()));
                    build
                }
            }
        };

        build.await
    }

    /// Builds a cacheable provider and settles its cache entry.
    async fn instantiate_cached(self: Arc<Self>, provider: Arc<Provider>) -> Result<Value> {
        let name = provider.name().clone();
        let outcome = Arc::clone(&self).instantiate(provider).await;

        let mut cache = self.state.cache.lock();
        match &outcome {
            Ok(value) => {
                cache.insert(name, Cached::Ready(value.clone()));
            }
            Err(_) => {
                cache.remove(&name);
            }
        }
        outcome
    }

    async fn instantiate(self: Arc<Self>, provider: Arc<Provider>) -> Result<Value> {
        // Fan out: every dependency starts before any is awaited.
        let dependencies: Vec<SharedBuild> = provider
            .dependencies()
            .iter()
            .map(|dependency| self.resolve(dependency.clone()))
            .collect();

        let values = try_join_all(dependencies)
            .await
            .map_err(|err| err.required_by(provider.name()))?;

        trace!(provider = %provider.name(), kind = %provider.kind(), "Constructing");
        provider.construct(values).await
    }

    fn not_found(&self, name: ProviderName) -> WireboxError {
        let registered: Vec<&str> = self.state.providers.keys().map(ProviderName::as_str).collect();
        let suggestions = suggest_similar(&name, &registered, 3);
        WireboxError::not_found(name, suggestions)
    }
}

/// Releases a session's in-flight builds when its `build()` call ends.
///
/// In-flight futures hold the session alive; dropping them here breaks
/// that reference cycle even when the call fails early or is cancelled.
struct SessionGuard(Arc<Session>);

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let released = self.0.in_flight.lock().take();
        drop(released);
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
