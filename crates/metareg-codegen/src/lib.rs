// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token};

/// Well-known annotation keys accepted inside `meta(...)` without quotes.
const META_KEYS: &[(&str, &str)] = &[
    ("description", "Description"),
    ("hidden", "Hidden"),
    ("type", "Type"),
    ("color", "Color"),
    ("icon", "Icon"),
    ("tooltip", "Tooltip"),
];

/// `#[derive(Reflect)]` macro: generates `TypeTag` + `Reflect` impls
///
/// Each named field becomes a `FieldDecl` whose accessors are plain
/// functions reading `record.field`, with its offset taken from
/// `core::mem::offset_of!`. Field types must implement `TypeTag`.
///
/// Attributes (record or field level unless noted):
/// - `#[reflect(title = "...")]`
/// - `#[reflect(meta(description = "...", tooltip = "..."))]`
/// - `#[reflect(meta("free key" = "..."))]`
/// - `#[reflect(skip)]` (field only)
///
/// Tuple structs, unit structs, enums, unions and generic structs are
/// rejected at compile time.
///
/// The record name (and its type identifier) is the bare struct name, so two
/// derived structs with the same name in different modules collide: the
/// registry rejects the second one with `RegistryError::DuplicateTypeName`.
///
/// Example:
/// ```ignore
/// use metareg::Reflect;
///
/// #[derive(Reflect)]
/// #[reflect(meta(description = "Describes object in 2D space."))]
/// struct Transform2D {
///     width: i32,
///     #[reflect(title = "Pos", meta(tooltip = "x, y, z"))]
///     position: Vec<f64>,
///     #[reflect(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Options collected from the `#[reflect(...)]` attributes of one item.
#[derive(Default)]
struct ReflectAttrs {
    title: Option<LitStr>,
    meta: Vec<MetaEntry>,
    skip: bool,
}

enum MetaKeyToken {
    /// Variant name of `metareg::MetaKey`.
    Known(Ident),
    Free(LitStr),
}

struct MetaEntry {
    key: MetaKeyToken,
    value: LitStr,
}

impl Parse for MetaEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key = if input.peek(LitStr) {
            MetaKeyToken::Free(input.parse()?)
        } else {
            // `type` is a keyword, hence parse_any
            let ident = Ident::parse_any(input)?;
            let name = ident.to_string();
            let Some((_, variant)) = META_KEYS.iter().find(|(k, _)| *k == name) else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!(
                        "unknown meta key `{name}`; expected one of description, hidden, type, color, icon, tooltip, or a string literal"
                    ),
                ));
            };
            MetaKeyToken::Known(Ident::new(variant, ident.span()))
        };
        input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(MetaEntry { key, value })
    }
}

impl MetaEntry {
    fn annotate(&self) -> proc_macro2::TokenStream {
        let value = &self.value;
        match &self.key {
            MetaKeyToken::Known(variant) => quote! { .annotate(::metareg::MetaKey::#variant, #value) },
            MetaKeyToken::Free(key) => quote! { .annotate(#key, #value) },
        }
    }
}

fn parse_attrs(attrs: &[Attribute], allow_skip: bool) -> syn::Result<ReflectAttrs> {
    let mut parsed = ReflectAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("reflect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("title") {
                parsed.title = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("meta") {
                let content;
                syn::parenthesized!(content in meta.input);
                let entries = content.parse_terminated(MetaEntry::parse, Token![,])?;
                parsed.meta.extend(entries);
                Ok(())
            } else if meta.path.is_ident("skip") {
                if !allow_skip {
                    return Err(meta.error("`skip` is only allowed on fields"));
                }
                parsed.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported reflect attribute; expected `title`, `meta` or `skip`"))
            }
        })?;
    }
    Ok(parsed)
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let type_ident = compute_fnv1a_hash(&type_name);

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Reflect cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Only structs with named fields are supported",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(input, "Only structs are supported")),
    };

    let record_attrs = parse_attrs(&input.attrs, false)?;
    let record_title = record_attrs.title.as_ref().map(|t| quote! { .title(#t) });
    let record_meta = record_attrs.meta.iter().map(MetaEntry::annotate);

    let mut field_decls = Vec::new();
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let attrs = parse_attrs(&field.attrs, true)?;
        if attrs.skip {
            continue;
        }

        let ty = &field.ty;
        let name_str = field_name.unraw().to_string();
        let title = attrs.title.as_ref().map(|t| quote! { .title(#t) });
        let meta = attrs.meta.iter().map(MetaEntry::annotate);

        field_decls.push(quote! {
            .field({
                fn get(record: &#name) -> &#ty {
                    &record.#field_name
                }
                fn get_mut(record: &mut #name) -> &mut #ty {
                    &mut record.#field_name
                }
                ::metareg::FieldDecl::<#name>::new::<#ty>(
                    #name_str,
                    ::core::mem::offset_of!(#name, #field_name),
                    get,
                    get_mut,
                )
                #title
                #(#meta)*
            })
        });
    }

    Ok(quote! {
        impl ::metareg::TypeTag for #name {
            const TYPE_NAME: &'static str = #type_name;
            const TYPE_IDENT: ::metareg::TypeIdent = ::metareg::TypeIdent::from_raw(#type_ident);
        }

        impl ::metareg::Reflect for #name {
            fn describe() -> ::metareg::RecordDecl<Self> {
                ::metareg::RecordDecl::<Self>::new(#type_name)
                    #record_title
                    #(#record_meta)*
                    #(#field_decls)*
            }
        }
    })
}

/// Compute FNV-1a hash (32-bit) of a type name
fn compute_fnv1a_hash(s: &str) -> u32 {
    let mut hash = 2_166_136_261_u32;
    for byte in s.bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(16_777_619);
    }
    hash
}
