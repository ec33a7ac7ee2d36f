//! Arguments accepted by `#[injectable(...)]`.

use darling::FromMeta;
use darling::ast::NestedMeta;
use syn::{Lit, LitStr};

/// `#[injectable(dependencies("a", "b"), constructor = "create")]`
#[derive(Debug, Default, FromMeta)]
pub(crate) struct InjectableArgs {
    /// Explicit dependency names, in parameter order.
    #[darling(default)]
    pub dependencies: Option<NameList>,
    /// Associated function used to build the type (impl blocks only).
    #[darling(default)]
    pub constructor: Option<String>,
}

/// A parenthesized list of string literals.
#[derive(Debug, Default)]
pub(crate) struct NameList(pub Vec<LitStr>);

impl FromMeta for NameList {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let mut names = Vec::with_capacity(items.len());

        for item in items {
            match item {
                NestedMeta::Lit(Lit::Str(name)) if name.value().trim().is_empty() => {
                    errors.push(darling::Error::custom("dependency names cannot be blank").with_span(name));
                }
                NestedMeta::Lit(Lit::Str(name)) => names.push(name.clone()),
                other => {
                    errors.push(darling::Error::custom("expected a string literal").with_span(other));
                }
            }
        }

        errors.finish_with(NameList(names))
    }
}
