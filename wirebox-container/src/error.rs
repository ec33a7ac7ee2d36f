//! Error types for Wirebox registry and injector operations.
//!
//! Every error carries enough context to act on it: the provider name,
//! the chain of dependents that led to a missing provider, the cyclic
//! path, and a hint.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use wirebox_support::rendering::{render_chain, render_required_by, shorten_type_name};

use crate::name::ProviderName;

/// Main error type for all Wirebox operations.
///
/// The type is cheap to clone so one failure can be delivered to every
/// consumer waiting on the same in-flight build.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WireboxError {
    /// The provider definition is malformed.
    #[error("{}", .0)]
    InvalidProvider(InvalidProviderError),

    /// The name is already registered and overriding was not requested.
    #[error("{}", .0)]
    RegistrationConflict(RegistrationConflictError),

    /// A requested or required provider was never registered.
    #[error("{}", .0)]
    ProviderNotFound(ProviderNotFoundError),

    /// Building the requested provider would require building itself.
    #[error("{}", .0)]
    CycleDetected(CycleDetectedError),

    /// A resolved value does not have the type its consumer asked for.
    #[error("{}", .0)]
    TypeMismatch(TypeMismatchError),

    /// A factory read an argument past the end of its dependency list.
    #[error(
        "Provider {provider} asked for argument #{index} but only {received} were supplied\n  Hint: Check that the dependency list matches the factory's parameters"
    )]
    MissingArgument {
        provider: ProviderName,
        index: usize,
        received: usize,
    },

    /// The build did not finish within the caller's deadline.
    #[error("Building {name} timed out after {limit:?}")]
    TimedOut { name: ProviderName, limit: Duration },

    /// The factory itself failed. Passed through unchanged.
    #[error(transparent)]
    Construction(Arc<dyn std::error::Error + Send + Sync>),
}

impl WireboxError {
    /// Wraps an error raised by a user-supplied factory.
    ///
    /// A factory that fails with a [`WireboxError`] (for example by using
    /// `?` on [`Arguments::get`](crate::factory::Arguments::get)) keeps
    /// that error instead of having it wrapped a second time. Not-found and
    /// cycle errors are the exception: they describe some other graph, so
    /// they are wrapped as [`WireboxError::Construction`] and never pick up
    /// this injector's dependency chain.
    pub fn from_factory(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match error.downcast::<WireboxError>() {
            Ok(own) => match *own {
                foreign @ (WireboxError::ProviderNotFound(_) | WireboxError::CycleDetected(_)) => {
                    WireboxError::Construction(Arc::new(foreign))
                }
                own => own,
            },
            Err(other) => WireboxError::Construction(Arc::from(other)),
        }
    }

    /// Returns the dependency chain of a [`WireboxError::ProviderNotFound`].
    pub fn chain(&self) -> Option<&[ProviderName]> {
        match self {
            WireboxError::ProviderNotFound(e) => Some(&e.chain),
            _ => None,
        }
    }

    /// Returns the cyclic path of a [`WireboxError::CycleDetected`].
    pub fn cycle(&self) -> Option<&[ProviderName]> {
        match self {
            WireboxError::CycleDetected(e) => Some(&e.cycle),
            _ => None,
        }
    }

    /// Returns the factory's own error for a [`WireboxError::Construction`].
    pub fn construction_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            WireboxError::Construction(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn not_found(requested: ProviderName, suggestions: Vec<String>) -> Self {
        WireboxError::ProviderNotFound(ProviderNotFoundError {
            chain: vec![requested],
            suggestions,
        })
    }

    pub(crate) fn invalid(name: &ProviderName, reason: impl Into<String>) -> Self {
        WireboxError::InvalidProvider(InvalidProviderError {
            name: name.clone(),
            reason: reason.into(),
        })
    }

    /// Records that `dependent` required the missing provider.
    ///
    /// Only [`WireboxError::ProviderNotFound`] is annotated; every other
    /// error is returned untouched.
    pub(crate) fn required_by(mut self, dependent: &ProviderName) -> Self {
        if let WireboxError::ProviderNotFound(ref mut e) = self {
            e.chain.push(dependent.clone());
        }
        self
    }
}

/// Error when a provider definition cannot be registered.
#[derive(Debug, Clone)]
pub struct InvalidProviderError {
    pub name: ProviderName,
    pub reason: String,
}

impl fmt::Display for InvalidProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid provider {:?}: {}", self.name.as_str(), self.reason)
    }
}

/// Error when registering a name that already exists.
#[derive(Debug, Clone)]
pub struct RegistrationConflictError {
    pub name: ProviderName,
}

impl fmt::Display for RegistrationConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider already registered: {}", self.name)?;
        write!(
            f,
            "\n  Hint: Pass RegisterOptions::new().override_existing(true) to replace it, or enable allow_override on the registry"
        )
    }
}

/// Error when a provider was not registered.
///
/// The chain starts at the missing provider and walks back up through
/// every dependent to the name originally passed to `build()`.
#[derive(Debug, Clone)]
pub struct ProviderNotFoundError {
    /// Failure point first, root request last.
    pub chain: Vec<ProviderName>,
    /// Registered names close to the missing one.
    pub suggestions: Vec<String>,
}

impl ProviderNotFoundError {
    /// The provider that is missing.
    pub fn missing(&self) -> Option<&ProviderName> {
        self.chain.first()
    }
}

impl fmt::Display for ProviderNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider not registered: {}", render_required_by(&self.chain))?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        if let Some(missing) = self.missing() {
            write!(
                f,
                "\n  Hint: Did you forget to register {missing:?}, or to map it with `using`?"
            )?;
        }
        Ok(())
    }
}

/// Error when a circular dependency is detected.
#[derive(Debug, Clone)]
pub struct CycleDetectedError {
    /// The cyclic path, starting and ending at the same provider.
    /// Example: `["a", "b", "a"]`
    pub cycle: Vec<ProviderName>,
}

impl fmt::Display for CycleDetectedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Circular dependency detected:\n  {}", render_chain(&self.cycle))?;
        write!(
            f,
            "\n  Hint: Break the cycle by restructuring the providers or injecting a factory instead of a value"
        )
    }
}

/// Error when a resolved value is not of the expected type.
#[derive(Debug, Clone)]
pub struct TypeMismatchError {
    /// The provider whose value (or argument) was read.
    pub provider: ProviderName,
    pub expected: &'static str,
    pub found: &'static str,
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type mismatch for {}: expected {}, found {}",
            self.provider,
            shorten_type_name(self.expected),
            shorten_type_name(self.found),
        )
    }
}

/// Convenient Result type for Wirebox operations.
pub type Result<T> = std::result::Result<T, WireboxError>;
