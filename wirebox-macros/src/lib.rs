//! Procedural macros for Wirebox.
//!
//! Use through the `wirebox` crate, which re-exports [`macro@injectable`]
//! and the paths the generated code refers to.

use darling::FromMeta;
use darling::ast::NestedMeta;
use proc_macro::TokenStream;
use syn::{Item, parse_macro_input};

mod args;
mod expand;

/// Captures constructor or factory parameter names at compile time.
///
/// On a free function, keeps the function and adds `<name>_factory()`
/// returning a `wirebox::Factory` whose declared parameters are the
/// function's parameter names:
///
/// ```rust,ignore
/// #[injectable]
/// fn greeting(port: u16) -> String {
///     format!("listening on {port}")
/// }
///
/// registry.function("greeting", greeting_factory(), RegisterOptions::new())?;
/// ```
///
/// On an inherent impl block, implements `wirebox::Construct` for the type
/// using its `new` function (or the one named by `constructor = "..."`):
///
/// ```rust,ignore
/// #[injectable(dependencies("primaryDb"))]
/// impl UserRepository {
///     pub async fn new(db: Arc<Database>) -> Result<Self, sqlx::Error> { ... }
/// }
///
/// registry.ctor::<UserRepository>("userRepository", RegisterOptions::new())?;
/// ```
///
/// An `Arc<T>` parameter accepts a provider producing either `T` or
/// `Arc<T>`; any other parameter type must be `Clone` and is cloned out
/// of the resolved value. `async` targets are awaited, and a return type
/// named `Result` is treated as fallible.
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    let meta = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(meta) => meta,
        Err(e) => return TokenStream::from(darling::Error::from(e).write_errors()),
    };
    let args = match args::InjectableArgs::from_list(&meta) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let expanded = match parse_macro_input!(item as Item) {
        Item::Fn(func) => expand::function(args, func),
        Item::Impl(block) => expand::constructor(args, block),
        other => Err(syn::Error::new_spanned(
            other,
            "#[injectable] applies to functions and inherent impl blocks",
        )),
    };

    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}
