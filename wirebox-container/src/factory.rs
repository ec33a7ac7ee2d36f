//! Factories — the invocable half of a provider.
//!
//! A [`Factory`] receives the resolved dependency values as positional
//! [`Arguments`] and produces a [`Value`], possibly asynchronously.
//!
//! Factories carry two optional name lists:
//! - **declared parameters**: the factory's own parameter names, recorded
//!   by `#[injectable]` or [`Factory::with_parameters`]
//! - **explicit dependencies**: names attached with
//!   [`Factory::with_dependencies`], which take precedence
//!
//! # Examples
//! ```
//! use wirebox_container::factory::{Arguments, Factory};
//!
//! let greeting = Factory::from_fn(|args: Arguments| {
//!     let port: u16 = args.get(0)?;
//!     Ok(format!("listening on {port}"))
//! })
//! .with_dependencies(["port"]);
//!
//! assert_eq!(greeting.explicit_dependencies().unwrap(), &["port"]);
//! ```

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::error::{Result, TypeMismatchError, WireboxError};
use crate::name::ProviderName;
use crate::value::Value;

/// Error type user factories may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type InvokeFn = dyn Fn(Arguments) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// An invocable recipe for a value.
///
/// Cloning a factory is cheap: the closure is shared.
#[derive(Clone)]
pub struct Factory {
    invoke: Arc<InvokeFn>,
    output: &'static str,
    parameters: Option<Arc<[ProviderName]>>,
    dependencies: Option<Arc<[ProviderName]>>,
}

impl Factory {
    /// Creates a factory from a synchronous function.
    pub fn from_fn<F, R>(f: F) -> Self
    where
        F: Fn(Arguments) -> std::result::Result<R, BoxError> + Send + Sync + 'static,
        R: Send + Sync + 'static,
    {
        Self::with_invoke::<R>(Arc::new(move |args: Arguments| {
            let outcome = f(args)
                .map(Value::new)
                .map_err(WireboxError::from_factory);
            futures::future::ready(outcome).boxed()
        }))
    }

    /// Creates a factory from a function returning a future.
    ///
    /// ```
    /// use wirebox_container::factory::{Arguments, BoxError, Factory};
    ///
    /// let pool = Factory::from_async(|args: Arguments| async move {
    ///     let url: String = args.get(0)?;
    ///     Ok::<_, BoxError>(vec![url])
    /// })
    /// .with_dependencies(["databaseUrl"]);
    /// # let _ = pool;
    /// ```
    pub fn from_async<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, BoxError>> + Send + 'static,
        R: Send + Sync + 'static,
    {
        Self::with_invoke::<R>(Arc::new(move |args: Arguments| {
            f(args)
                .map(|outcome| outcome.map(Value::new).map_err(WireboxError::from_factory))
                .boxed()
        }))
    }

    /// Creates a factory that instantiates `T` through [`Construct`].
    ///
    /// The declared parameters and explicit dependencies come from
    /// [`Construct::PARAMETERS`] and [`Construct::DEPENDENCIES`].
    pub fn constructor<T: Construct>() -> Self {
        let factory = Self::with_invoke::<T>(Arc::new(|args: Arguments| {
            T::construct(args)
                .map(|outcome| outcome.map(Value::new).map_err(WireboxError::from_factory))
                .boxed()
        }))
        .with_parameters(T::PARAMETERS.iter().copied());

        match T::DEPENDENCIES {
            Some(names) => factory.with_dependencies(names.iter().copied()),
            None => factory,
        }
    }

    fn with_invoke<R>(invoke: Arc<InvokeFn>) -> Self {
        Self {
            invoke,
            output: type_name::<R>(),
            parameters: None,
            dependencies: None,
        }
    }

    /// Attaches an explicit, ordered dependency-name list.
    pub fn with_dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderName>,
    {
        self.dependencies = Some(names.into_iter().map(Into::<ProviderName>::into).collect());
        self
    }

    /// Records the factory's declared parameter names.
    pub fn with_parameters<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderName>,
    {
        self.parameters = Some(names.into_iter().map(Into::<ProviderName>::into).collect());
        self
    }

    /// The explicit dependency list, if one was attached.
    pub fn explicit_dependencies(&self) -> Option<&[ProviderName]> {
        self.dependencies.as_deref()
    }

    /// The declared parameter names, if known.
    pub fn parameters(&self) -> Option<&[ProviderName]> {
        self.parameters.as_deref()
    }

    /// Type name of the value this factory produces.
    pub fn output_type(&self) -> &'static str {
        self.output
    }

    /// Invokes the factory. The returned future owns everything it needs.
    pub(crate) fn invoke(&self, args: Arguments) -> BoxFuture<'static, Result<Value>> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("output", &self.output)
            .field("parameters", &self.parameters)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

/// A type that can be built by the injector from its dependencies.
///
/// This is the `Constructor` provider kind: the injector resolves the
/// dependencies and hands them to [`Construct::construct`] in order.
///
/// Usually generated by `#[injectable]` on an `impl` block, but easy to
/// write by hand:
///
/// ```
/// use wirebox_container::factory::{Arguments, BoxError, Construct};
///
/// struct Repository {
///     url: String,
/// }
///
/// #[async_trait::async_trait]
/// impl Construct for Repository {
///     const PARAMETERS: &'static [&'static str] = &["url"];
///
///     async fn construct(args: Arguments) -> Result<Self, BoxError> {
///         Ok(Repository { url: args.get(0)? })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Construct: Sized + Send + Sync + 'static {
    /// Declared parameter names of the constructor, in order.
    const PARAMETERS: &'static [&'static str] = &[];

    /// Explicit dependency names; preferred over [`Construct::PARAMETERS`].
    const DEPENDENCIES: Option<&'static [&'static str]> = None;

    /// Builds an instance from the resolved dependencies.
    async fn construct(args: Arguments) -> std::result::Result<Self, BoxError>;
}

/// Resolved dependency values, in declaration order.
#[derive(Clone)]
pub struct Arguments {
    provider: ProviderName,
    names: Arc<[ProviderName]>,
    values: Vec<Value>,
}

impl Arguments {
    /// Creates the argument list for `provider`.
    ///
    /// `names` and `values` are parallel: `values[i]` was resolved for
    /// `names[i]`.
    pub fn new(provider: ProviderName, names: Arc<[ProviderName]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { provider, names, values }
    }

    /// Creates an empty argument list.
    pub fn empty(provider: ProviderName) -> Self {
        Self::new(provider, Arc::from(Vec::new()), Vec::new())
    }

    /// The provider these arguments were resolved for.
    pub fn provider(&self) -> &ProviderName {
        &self.provider
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All argument values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The argument at `index`.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| WireboxError::MissingArgument {
            provider: self.provider.clone(),
            index,
            received: self.values.len(),
        })
    }

    /// A shared handle to the argument at `index`.
    pub fn arc<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.value(index)?;
        value
            .downcast::<T>()
            .ok_or_else(|| self.mismatch::<T>(index, value))
    }

    /// An `Arc<T>` for the argument at `index`, whether its provider
    /// produced a `T` (shared without copying) or an `Arc<T>`.
    pub fn shared<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.value(index)?;
        value
            .downcast::<T>()
            .or_else(|| value.downcast_ref::<Arc<T>>().cloned())
            .ok_or_else(|| self.mismatch::<Arc<T>>(index, value))
    }

    /// A clone of the argument at `index`.
    ///
    /// Register `Arc<T>` values when clones should share one instance.
    pub fn get<T: Clone + Send + Sync + 'static>(&self, index: usize) -> Result<T> {
        let value = self.value(index)?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| self.mismatch::<T>(index, value))
    }

    fn mismatch<T>(&self, index: usize, value: &Value) -> WireboxError {
        let provider = self
            .names
            .get(index)
            .cloned()
            .unwrap_or_else(|| self.provider.clone());

        WireboxError::TypeMismatch(TypeMismatchError {
            provider,
            expected: type_name::<T>(),
            found: value.type_name(),
        })
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("provider", &self.provider)
            .field("names", &self.names)
            .field("values", &self.values)
            .finish()
    }
}
