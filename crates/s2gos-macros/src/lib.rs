//! # S2GOS Macros
//!
//! Procedural macros for defining processes.
//!
//! ## Available Macros
//!
//! - `#[process]` - Turn a function into a registrable process definition

use darling::{FromMeta, ast::NestedMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    Expr, FnArg, GenericArgument, ItemFn, Lit, Meta, Pat, PathArguments, ReturnType, Type,
    parse_macro_input,
};

/// Process attribute arguments.
#[derive(Debug, Default, FromMeta)]
struct ProcessArgs {
    #[darling(default)]
    id: Option<String>,
    #[darling(default)]
    version: Option<String>,
    #[darling(default)]
    title: Option<String>,
    #[darling(default)]
    description: Option<String>,
    #[darling(default, multiple, rename = "keyword")]
    keywords: Vec<String>,
}

/// An input parameter of the annotated function.
struct InputParam {
    ident: syn::Ident,
    ty: Type,
    default: Option<Expr>,
}

/// Define a process.
///
/// Generates a unit struct named after the function in PascalCase with a
/// `Process` suffix, implementing `s2gos_core::IntoProcess`. Input schemas
/// are inferred from the parameter types, the output schema from the return
/// type. A leading `&JobContext` parameter receives the job context.
///
/// Parameters must be owned types that implement both `TypeAnnotation` and
/// `serde::Deserialize`. A `#[default(expr)]` attribute gives a parameter a
/// default value. The function may return a plain value or a `Result` whose
/// error converts into `ProcessError`.
///
/// # Example
///
/// ```ignore
/// use s2gos_core::JobContext;
/// use s2gos_macros::process;
/// use s2gos_protocols::ProcessError;
///
/// /// Sleeps for `duration` seconds.
/// #[process(id = "sleep_a_while", title = "Sleep Processor")]
/// fn sleep_a_while(ctx: &JobContext, #[default(10.0)] duration: f64) -> Result<f64, ProcessError> {
///     ctx.report_progress(Some(0), None)?;
///     Ok(duration)
/// }
///
/// registry.register_definition(SleepAWhileProcess)?;
/// ```
#[proc_macro_attribute]
pub fn process(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.to_compile_error()),
    };

    let args = match ProcessArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let mut input = parse_macro_input!(item as ItemFn);
    match expand_process(args, &mut input) {
        Ok(definition) => TokenStream::from(quote! {
            #input
            #definition
        }),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn expand_process(args: ProcessArgs, input: &mut ItemFn) -> syn::Result<TokenStream2> {
    if !input.sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.sig.generics.span(),
            "#[process] functions must not be generic",
        ));
    }
    if input.sig.asyncness.is_some() {
        return Err(syn::Error::new(
            input.sig.asyncness.span(),
            "#[process] functions must not be async",
        ));
    }

    let fn_name = input.sig.ident.clone();
    let vis = input.vis.clone();
    let (takes_context, params) = collect_params(input)?;

    let struct_name = format_ident!("{}Process", to_pascal_case(&fn_name.to_string()));
    let struct_doc = format!("Process definition generated for [`{}`].", fn_name);

    let doc = doc_text(&input.attrs);
    let doc_call = doc.map(|doc| quote! { .doc(#doc) });

    let param_calls = params.iter().map(|p| {
        let name = p.ident.to_string();
        let ty = &p.ty;
        let default = match &p.default {
            Some(expr) => quote! { ::s2gos_core::__private::serde_json::to_value(#expr).ok() },
            None => quote! { ::core::option::Option::None },
        };
        quote! {
            .param_annotated(
                #name,
                <#ty as ::s2gos_core::TypeAnnotation>::annotation(),
                #default,
            )
        }
    });

    let takes = params.iter().map(|p| {
        let ident = &p.ident;
        let name = ident.to_string();
        let ty = &p.ty;
        quote! { let #ident: #ty = args.take(#name)?; }
    });

    let arg_idents: Vec<&syn::Ident> = params.iter().map(|p| &p.ident).collect();
    let call = if takes_context {
        quote! { #fn_name(ctx, #(#arg_idents),*) }
    } else {
        quote! { #fn_name(#(#arg_idents),*) }
    };

    let (output_ty, returns_result) = output_type(&input.sig.output);
    let result = if returns_result {
        quote! {
            #call.map_err(|e| -> ::s2gos_core::__private::ProcessError { e.into() })
        }
    } else {
        quote! { ::core::result::Result::Ok(#call) }
    };
    let ctx_pat = if takes_context {
        quote! { ctx }
    } else {
        quote! { _ctx }
    };
    let args_pat = if params.is_empty() {
        quote! { _args }
    } else {
        quote! { mut args }
    };

    let id = args.id.map(|v| quote! { options = options.with_id(#v); });
    let version = args.version.map(|v| quote! { options = options.with_version(#v); });
    let title = args.title.map(|v| quote! { options = options.with_title(#v); });
    let description = args
        .description
        .map(|v| quote! { options = options.with_description(#v); });
    let keywords = if args.keywords.is_empty() {
        None
    } else {
        let keywords = &args.keywords;
        Some(quote! { options = options.with_keywords([#(#keywords),*]); })
    };

    Ok(quote! {
        #[doc = #struct_doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #struct_name;

        impl ::s2gos_core::IntoProcess for #struct_name {
            fn into_process(self) -> (::s2gos_core::ProcessFunction, ::s2gos_core::RegisterOptions) {
                let function = ::s2gos_core::ProcessFunction::builder(
                    concat!(module_path!(), "::", stringify!(#fn_name)),
                )
                #doc_call
                #(#param_calls)*
                .returns_annotated(<#output_ty as ::s2gos_core::TypeAnnotation>::annotation())
                .body(|#ctx_pat: &::s2gos_core::JobContext, #args_pat: ::s2gos_core::Arguments| {
                    #(#takes)*
                    #result
                });

                #[allow(unused_mut)]
                let mut options = ::s2gos_core::RegisterOptions::new();
                #id
                #version
                #title
                #description
                #keywords
                (function, options)
            }
        }
    })
}

/// Split the signature into the optional context parameter and the inputs,
/// stripping `#[default]` attributes from the emitted function.
fn collect_params(input: &mut ItemFn) -> syn::Result<(bool, Vec<InputParam>)> {
    let mut takes_context = false;
    let mut params = Vec::new();

    for (index, arg) in input.sig.inputs.iter_mut().enumerate() {
        let pat_type = match arg {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new(
                    receiver.span(),
                    "#[process] cannot be applied to methods",
                ));
            }
        };

        if index == 0 && is_job_context(&pat_type.ty) {
            takes_context = true;
            continue;
        }

        let ident = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => pat_ident.ident.clone(),
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "#[process] parameters must be plain identifiers",
                ));
            }
        };

        let mut default = None;
        let mut kept = Vec::with_capacity(pat_type.attrs.len());
        for attr in pat_type.attrs.drain(..) {
            if attr.path().is_ident("default") {
                default = Some(attr.parse_args::<Expr>()?);
            } else {
                kept.push(attr);
            }
        }
        pat_type.attrs = kept;

        params.push(InputParam {
            ident,
            ty: (*pat_type.ty).clone(),
            default,
        });
    }

    Ok((takes_context, params))
}

fn is_job_context(ty: &Type) -> bool {
    let Type::Reference(reference) = ty else {
        return false;
    };
    match reference.elem.as_ref() {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "JobContext"),
        _ => false,
    }
}

/// The annotated output type and whether the function returns a `Result`.
fn output_type(output: &ReturnType) -> (TokenStream2, bool) {
    let ty = match output {
        ReturnType::Default => return (quote! { () }, false),
        ReturnType::Type(_, ty) => ty,
    };
    if let Type::Path(path) = ty.as_ref() {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Result" {
                if let PathArguments::AngleBracketed(generics) = &segment.arguments {
                    if let Some(GenericArgument::Type(ok)) = generics.args.first() {
                        return (quote! { #ok }, true);
                    }
                }
            }
        }
    }
    (quote! { #ty }, false)
}

/// Concatenated `///` doc lines.
fn doc_text(attrs: &[syn::Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .map(|line| match line.strip_prefix(' ') {
            Some(rest) => rest.to_string(),
            None => line,
        })
        .collect();

    let text = lines.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .map(|s| {
            let mut c = s.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().chain(c).collect(),
            }
        })
        .collect()
}
