//! Core container implementation for Wirebox DI.
//!
//! Providers are registered by name on an immutable [`Registry`]; every
//! registration returns a new registry and leaves the receiver untouched.
//! [`Registry::finalize`] binds a snapshot to an [`Injector`], which builds
//! values on demand.

pub mod error;
pub mod factory;
pub(crate) mod graph;
pub mod injector;
pub mod kind;
pub mod module;
pub mod name;
pub mod provider;
pub mod registry;
pub mod resolver;
#[cfg(feature = "timeout")]
mod timeout;
pub mod value;

pub use error::{Result, WireboxError};
pub use factory::{Arguments, BoxError, Construct, Factory};
pub use injector::Injector;
pub use kind::ProviderKind;
pub use module::Module;
pub use name::ProviderName;
pub use provider::{Provider, Recipe};
pub use registry::{RegisterOptions, Registry};
pub use resolver::{DeclaredNames, DependencyNameResolver};
pub use value::Value;

pub mod prelude {
    pub use crate::error::{Result, WireboxError};
    pub use crate::factory::{Arguments, BoxError, Construct, Factory};
    pub use crate::injector::Injector;
    pub use crate::kind::ProviderKind;
    pub use crate::module::Module;
    pub use crate::name::ProviderName;
    pub use crate::registry::{RegisterOptions, Registry};
    pub use crate::value::Value;
}
