//! Derive macro implementation for `Synthesize` on record types
//!
//! Every field of the struct receives an equal share of the size budget and is
//! produced through `Synthesizer::field`, so nested records get memoized adhoc
//! generators like tuples do.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericParam, Lit, Meta, Result, parse_macro_input,
    parse_quote,
};

/// Main entry point for the Synthesize derive macro
pub fn derive_synthesize_impl(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_synthesize_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_synthesize_impl(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data_struct) => &data_struct.fields,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Synthesize can only be derived for structs; register a generator for enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Synthesize derive is not supported for unions",
            ));
        }
    };

    let mut generics = input.generics.clone();
    add_trait_bounds(&mut generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = generate_struct_body(name, fields)?;
    let checks = generate_support_checks(fields)?;

    Ok(quote! {
        impl #impl_generics ::probity::Synthesize for #name #ty_generics #where_clause {
            const SHAPE: ::probity::Shape = ::probity::Shape::Record;

            #[allow(unused_variables)]
            fn synthesize(
                synthesizer: &mut ::probity::Synthesizer<'_>,
                size: usize,
            ) -> ::core::result::Result<Self, ::probity::Unsupported> {
                #body
            }

            #[allow(unused_variables)]
            fn check_support(
                support: &mut ::probity::Support<'_>,
            ) -> ::core::result::Result<(), ::probity::Unsupported> {
                #(#checks)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// Add the `Synthesize` bound to every type parameter
fn add_trait_bounds(generics: &mut syn::Generics) {
    for param in &mut generics.params {
        if let GenericParam::Type(ref mut type_param) = *param {
            type_param.bounds.push(parse_quote!(::probity::Synthesize));
        }
    }
}

/// Generate the body building the struct from its fields
fn generate_struct_body(name: &syn::Ident, fields: &Fields) -> Result<TokenStream> {
    let count = fields.len();
    let share = quote! {
        let share = ::probity::Synthesizer::field_share(size, #count);
    };

    match fields {
        Fields::Named(fields_named) => {
            let values = fields_named
                .named
                .iter()
                .map(|field| {
                    let field_name = &field.ident;
                    let value = field_value(field)?;
                    Ok(quote! { #field_name: #value })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(quote! {
                #share
                ::core::result::Result::Ok(#name {
                    #(#values,)*
                })
            })
        }
        Fields::Unnamed(fields_unnamed) => {
            let values = fields_unnamed
                .unnamed
                .iter()
                .map(field_value)
                .collect::<Result<Vec<_>>>()?;

            Ok(quote! {
                #share
                ::core::result::Result::Ok(#name(
                    #(#values,)*
                ))
            })
        }
        Fields::Unit => Ok(quote! { ::core::result::Result::Ok(#name) }),
    }
}

/// Visit the type of every synthesized field
fn generate_support_checks(fields: &Fields) -> Result<Vec<TokenStream>> {
    let mut checks = Vec::new();
    for field in fields {
        if parse_field_attributes(field)? == FieldSource::Synthesized {
            let field_type = &field.ty;
            checks.push(quote! {
                support.visit::<#field_type>()?;
            });
        }
    }
    Ok(checks)
}

/// How a single field is produced
#[derive(Debug, PartialEq)]
enum FieldSource {
    /// Synthesized through the session with the field's share of the budget
    Synthesized,
    /// `Default::default()`
    Default,
    /// A function taking the RNG
    With(syn::Path),
}

fn field_value(field: &Field) -> Result<TokenStream> {
    let field_type = &field.ty;

    Ok(match parse_field_attributes(field)? {
        FieldSource::Synthesized => quote! {
            synthesizer.field::<#field_type>(share)?
        },
        FieldSource::Default => quote! {
            <#field_type as ::core::default::Default>::default()
        },
        FieldSource::With(path) => quote! {
            #path(synthesizer.rng())
        },
    })
}

/// Parse `#[synthesize(...)]` on a field
fn parse_field_attributes(field: &Field) -> Result<FieldSource> {
    let mut source = FieldSource::Synthesized;

    for attr in &field.attrs {
        if !attr.path().is_ident("synthesize") {
            continue;
        }

        let Meta::List(list) = &attr.meta else {
            return Err(Error::new_spanned(
                attr,
                "expected `#[synthesize(default)]` or `#[synthesize(with = \"path\")]`",
            ));
        };

        let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
        for meta in parser.parse2(list.tokens.clone())? {
            source = match meta {
                Meta::Path(path) if path.is_ident("default") => FieldSource::Default,
                Meta::NameValue(name_value) if name_value.path.is_ident("with") => {
                    FieldSource::With(parse_with_path(&name_value.value)?)
                }
                other => {
                    return Err(Error::new_spanned(other, "unsupported synthesize attribute"));
                }
            };
        }
    }

    Ok(source)
}

/// Parse `with = "path::to::function"`
fn parse_with_path(value: &syn::Expr) -> Result<syn::Path> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: Lit::Str(lit_str),
        ..
    }) = value
    {
        return lit_str.parse::<syn::Path>();
    }

    Err(Error::new_spanned(
        value,
        "`with` must be a string literal naming a function",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;
    use syn::parse_quote;

    #[test]
    fn test_add_trait_bounds() {
        let mut generics: syn::Generics = parse_quote! { <'a, T, U: Clone> };
        add_trait_bounds(&mut generics);

        if let GenericParam::Type(type_param) = &generics.params[1] {
            assert_eq!(type_param.bounds.len(), 1);
        }
        if let GenericParam::Type(type_param) = &generics.params[2] {
            assert_eq!(type_param.bounds.len(), 2);
        }
    }

    #[test]
    fn test_generate_struct_body_unit() {
        let name: syn::Ident = parse_quote! { UnitStruct };

        let result = generate_struct_body(&name, &Fields::Unit).unwrap();
        let expected = quote! { ::core::result::Result::Ok(UnitStruct) };

        assert_eq!(result.to_string(), expected.to_string());
    }

    #[test]
    fn test_field_attributes() {
        let plain: Field = parse_quote! { id: u32 };
        let default: Field = parse_quote! { #[synthesize(default)] cache: Vec<u8> };
        let with: Field = parse_quote! { #[synthesize(with = "fixtures::email")] email: String };

        assert_eq!(parse_field_attributes(&plain).unwrap(), FieldSource::Synthesized);
        assert_eq!(parse_field_attributes(&default).unwrap(), FieldSource::Default);
        assert_eq!(
            parse_field_attributes(&with).unwrap(),
            FieldSource::With(parse_quote!(fixtures::email))
        );
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let field: Field = parse_quote! { #[synthesize(range = "1..3")] id: u32 };
        assert!(parse_field_attributes(&field).is_err());
    }

    #[test]
    fn test_enums_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Status { Active, Inactive }
        };
        let err = generate_synthesize_impl(&input).unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn test_named_struct_expansion_shares_budget() {
        let input: DeriveInput = parse_quote! {
            struct Person { name: String, age: u8 }
        };
        let tokens = generate_synthesize_impl(&input).unwrap().to_string();

        assert!(tokens.contains("field_share"));
        assert!(tokens.contains("2usize"));
        assert!(tokens.contains("Shape :: Record"));
        assert!(tokens.contains("check_support"));
    }

    #[test]
    fn test_support_checks_skip_attributed_fields() {
        let fields: syn::FieldsNamed = parse_quote! {
            {
                id: u32,
                #[synthesize(default)]
                cache: Vec<u8>,
                #[synthesize(with = "fixtures::handler")]
                handler: fn() -> u8,
            }
        };
        let checks = generate_support_checks(&Fields::Named(fields)).unwrap();

        assert_eq!(checks.len(), 1);
        assert!(checks[0].to_string().contains("u32"));
    }
}
