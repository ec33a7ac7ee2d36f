//! Code generation for `#[injectable]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, ItemFn, ItemImpl, LitStr, Pat, PathArguments, ReturnType,
    Signature, Type,
};

use crate::args::InjectableArgs;

/// One constructor or function parameter.
struct Parameter {
    /// Local binding used in generated code.
    binding: Ident,
    /// Declared name, recorded as the dependency name.
    name: LitStr,
    ty: Type,
}

/// `#[injectable]` on a free function: keeps it and adds `<fn>_factory()`.
pub(crate) fn function(args: InjectableArgs, func: ItemFn) -> syn::Result<TokenStream> {
    if args.constructor.is_some() {
        return Err(syn::Error::new_spanned(
            &func.sig.ident,
            "`constructor` only applies to #[injectable] impl blocks",
        ));
    }

    let parameters = parameters(&func.sig)?;
    let dependencies = dependency_list(&args, &parameters, &func.sig)?;

    let vis = &func.vis;
    let target = &func.sig.ident;
    let factory = format_ident!("{}_factory", target.unraw());
    let doc = format!("Provider factory for [`{}`].", target.unraw());

    let extract = extract_arguments(&parameters);
    let bindings = parameters.iter().map(|p| &p.binding);
    let names = parameters.iter().map(|p| &p.name);
    let call = quote!(#target(#(#bindings),*));
    let finish = finish(call, &func.sig);

    let constructor = if func.sig.asyncness.is_some() {
        quote! {
            ::wirebox::Factory::from_async(|_args: ::wirebox::Arguments| async move {
                #extract
                #finish
            })
        }
    } else {
        quote! {
            ::wirebox::Factory::from_fn(|_args: ::wirebox::Arguments| {
                #extract
                #finish
            })
        }
    };

    let count = parameters.len();
    let dependencies = dependencies.map(|names| {
        quote!(.with_dependencies::<[&'static str; #count], &'static str>([#(#names),*]))
    });

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #factory() -> ::wirebox::Factory {
            #constructor
                .with_parameters::<[&'static str; #count], &'static str>([#(#names),*])
                #dependencies
        }
    })
}

/// `#[injectable]` on an inherent impl block: implements `Construct` for
/// the self type through its constructor.
pub(crate) fn constructor(args: InjectableArgs, block: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &block.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[injectable] applies to inherent impl blocks, not trait impls",
        ));
    }
    if !block.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &block.generics,
            "#[injectable] does not support generic types",
        ));
    }

    let wanted = args.constructor.as_deref().unwrap_or("new");
    let method = find_constructor(&block, wanted)?;

    let parameters = parameters(&method.sig)?;
    let dependencies = dependency_list(&args, &parameters, &method.sig)?;

    let self_ty = &block.self_ty;
    let target = &method.sig.ident;
    let extract = extract_arguments(&parameters);
    let bindings = parameters.iter().map(|p| &p.binding);
    let names = parameters.iter().map(|p| &p.name);
    let call = quote!(<#self_ty>::#target(#(#bindings),*));
    let finish = finish(call, &method.sig);

    let dependencies = dependencies.map(|names| {
        quote! {
            const DEPENDENCIES: ::core::option::Option<&'static [&'static str]> =
                ::core::option::Option::Some(&[#(#names),*]);
        }
    });

    Ok(quote! {
        #block

        #[::wirebox::__private::async_trait]
        impl ::wirebox::Construct for #self_ty {
            const PARAMETERS: &'static [&'static str] = &[#(#names),*];
            #dependencies

            async fn construct(
                _args: ::wirebox::Arguments,
            ) -> ::core::result::Result<Self, ::wirebox::BoxError> {
                #extract
                #finish
            }
        }
    })
}

fn find_constructor<'a>(block: &'a ItemImpl, wanted: &str) -> syn::Result<&'a ImplItemFn> {
    block
        .items
        .iter()
        .find_map(|item| match item {
            ImplItem::Fn(method) if method.sig.ident.unraw() == wanted => Some(method),
            _ => None,
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &block.self_ty,
                format!("no associated function `{wanted}` found in this impl block"),
            )
        })
}

fn parameters(sig: &Signature) -> syn::Result<Vec<Parameter>> {
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[injectable] does not support generic parameters",
        ));
    }

    sig.inputs
        .iter()
        .enumerate()
        .map(|(index, input)| match input {
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "an injectable constructor cannot take `self`",
            )),
            FnArg::Typed(typed) => {
                let Pat::Ident(pat) = &*typed.pat else {
                    return Err(syn::Error::new_spanned(
                        &typed.pat,
                        "injectable parameters must be plain identifiers",
                    ));
                };
                let ident = pat.ident.unraw();
                Ok(Parameter {
                    binding: format_ident!("__wirebox_arg{}", index),
                    name: LitStr::new(&ident.to_string(), ident.span()),
                    ty: (*typed.ty).clone(),
                })
            }
        })
        .collect()
}

fn dependency_list(
    args: &InjectableArgs,
    parameters: &[Parameter],
    sig: &Signature,
) -> syn::Result<Option<Vec<LitStr>>> {
    let Some(list) = &args.dependencies else {
        return Ok(None);
    };

    if list.0.len() != parameters.len() {
        return Err(syn::Error::new_spanned(
            &sig.ident,
            format!(
                "dependencies(...) names {} provider(s) but `{}` takes {} parameter(s)",
                list.0.len(),
                sig.ident,
                parameters.len(),
            ),
        ));
    }

    Ok(Some(list.0.clone()))
}

fn extract_arguments(parameters: &[Parameter]) -> TokenStream {
    let lets = parameters.iter().enumerate().map(|(index, p)| {
        let Parameter { binding, ty, .. } = p;
        match arc_inner(ty) {
            Some(inner) => quote!(let #binding: #ty = _args.shared::<#inner>(#index)?;),
            None => quote!(let #binding: #ty = _args.get::<#ty>(#index)?;),
        }
    });
    quote!(#(#lets)*)
}

/// `T` for a parameter typed `Arc<T>`, unless `T` is a trait object
/// (those are registered as `Arc<dyn Trait>` values and cloned as-is).
fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(generic) = &segment.arguments else {
        return None;
    };
    match generic.args.first()? {
        GenericArgument::Type(Type::TraitObject(_)) => None,
        GenericArgument::Type(inner) if generic.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Calls the target and converts its output into the factory's result.
fn finish(call: TokenStream, sig: &Signature) -> TokenStream {
    let call = if sig.asyncness.is_some() {
        quote!(#call.await)
    } else {
        call
    };

    if returns_result(&sig.output) {
        quote! {
            let output = #call;
            output.map_err(::core::convert::Into::<::wirebox::BoxError>::into)
        }
    } else {
        quote! {
            let output = #call;
            ::core::result::Result::Ok::<_, ::wirebox::BoxError>(output)
        }
    }
}

/// A return type whose last path segment is `Result` is treated as fallible.
fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    match &**ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Result"),
        _ => false,
    }
}
