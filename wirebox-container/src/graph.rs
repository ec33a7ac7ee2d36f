//! Dependency graph walking.
//!
//! The walker performs a depth-first search over provider dependencies,
//! in declared order, and is used in two modes:
//! - **lenient**: at the start of every `build()` call, to detect cycles
//!   reachable from the requested provider before anything is built.
//!   Unknown names are skipped; the injector reports them with their
//!   full dependency chain.
//! - **strict**: by [`Registry::validate`](crate::registry::Registry::validate),
//!   which also fails on the first missing dependency.

use std::collections::HashSet;

use tracing::{debug, warn};
use wirebox_support::rendering::suggest_similar;

use crate::error::{CycleDetectedError, Result, WireboxError};
use crate::name::ProviderName;
use crate::registry::ProviderMap;

/// Depth-first walker over a provider table.
///
/// Maintains the set of providers currently in progress ("visiting");
/// reaching one of them again means the graph loops.
pub(crate) struct GraphWalker<'a> {
    providers: &'a ProviderMap,
    /// Fail on missing providers instead of skipping them.
    strict: bool,
    /// Currently being visited (for cycle detection)
    visiting: HashSet<ProviderName>,
    /// Already checked, or known to be settled
    visited: HashSet<ProviderName>,
    /// Current DFS path (for error reporting)
    path: Vec<ProviderName>,
}

impl<'a> GraphWalker<'a> {
    /// A walker that only looks for cycles.
    pub fn lenient(providers: &'a ProviderMap) -> Self {
        Self::new(providers, false)
    }

    /// A walker that reports missing providers as well as cycles.
    pub fn strict(providers: &'a ProviderMap) -> Self {
        Self::new(providers, true)
    }

    fn new(providers: &'a ProviderMap, strict: bool) -> Self {
        Self {
            providers,
            strict,
            visiting: HashSet::new(),
            visited: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Marks providers whose subgraph does not need to be walked again
    /// (for example, values already in the injector cache).
    pub fn settled(mut self, names: impl IntoIterator<Item = ProviderName>) -> Self {
        self.visited.extend(names);
        self
    }

    /// Checks the subgraph reachable from `root`.
    pub fn check_from(&mut self, root: &ProviderName) -> Result<()> {
        self.visit(root)
    }

    /// Checks every registered provider, in name order.
    pub fn validate_all(&mut self) -> Result<()> {
        let mut names: Vec<ProviderName> = self.providers.keys().cloned().collect();
        names.sort();

        debug!(provider_count = names.len(), "Starting dependency graph validation");

        for name in &names {
            self.visit(name)?;
        }

        debug!("Dependency graph validation passed ✓");
        Ok(())
    }

    fn visit(&mut self, name: &ProviderName) -> Result<()> {
        if self.visited.contains(name) {
            return Ok(());
        }

        // In progress — CYCLE DETECTED!
        if self.visiting.contains(name) {
            let cycle_start = self.path.iter().position(|n| n == name).unwrap_or(0);

            let mut cycle: Vec<ProviderName> = self.path[cycle_start..].to_vec();
            cycle.push(name.clone());

            warn!(cycle = ?cycle, "Circular dependency detected");

            return Err(WireboxError::CycleDetected(CycleDetectedError { cycle }));
        }

        let providers = self.providers;
        let Some(provider) = providers.get(name) else {
            if !self.strict {
                return Ok(());
            }

            let registered: Vec<&str> = providers.keys().map(ProviderName::as_str).collect();
            let mut err = WireboxError::not_found(name.clone(), suggest_similar(name, &registered, 3));
            for dependent in self.path.iter().rev() {
                err = err.required_by(dependent);
            }
            return Err(err);
        };

        self.visiting.insert(name.clone());
        self.path.push(name.clone());

        for dependency in provider.dependencies() {
            self.visit(dependency)?;
        }

        self.path.pop();
        self.visiting.remove(name);
        self.visited.insert(name.clone());

        Ok(())
    }
}
