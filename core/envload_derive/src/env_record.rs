/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Generics, Ident, Type};

/// Container-level attributes for `#[env(...)]`
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(env), supports(struct_named))]
struct EnvRecordOpts {
    ident: Ident,
    generics: Generics,
    data: darling::ast::Data<(), FieldOpts>,

    /// The record implements `ParseEnv`.
    #[darling(default)]
    custom_parser: bool,
}

/// Field-level attributes for `#[env(...)]`
#[derive(Debug, FromField)]
#[darling(attributes(env))]
struct FieldOpts {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    name: Option<String>,

    #[darling(default)]
    default: Option<String>,

    #[darling(default)]
    required: bool,

    #[darling(default)]
    secret: bool,

    #[darling(default)]
    leaf: bool,

    #[darling(default)]
    skip: bool,
}

enum FieldKind {
    Leaf,
    Record,
    Unsupported,
}

pub fn generate_impl(input: &DeriveInput) -> TokenStream2 {
    match EnvRecordOpts::from_derive_input(input) {
        Ok(opts) => generate_from_opts(opts),
        Err(e) => e.write_errors(),
    }
}

fn generate_from_opts(opts: EnvRecordOpts) -> TokenStream2 {
    let record_name = &opts.ident;
    if !opts.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &opts.generics,
            "EnvRecord cannot be derived for generic types",
        )
        .to_compile_error();
    }

    let fields = match opts.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        darling::ast::Data::Enum(_) => {
            return syn::Error::new_spanned(record_name, "EnvRecord requires a struct")
                .to_compile_error();
        }
    };

    let mut descriptors = Vec::new();
    let mut steps = Vec::new();
    let mut constants = Vec::new();
    let mut errors = Vec::new();

    for field in fields.iter().filter(|f| !f.skip) {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let index = descriptors.len();
        let field_name = field_ident.unraw().to_string();
        let ty = &field.ty;
        let kind = if field.leaf {
            FieldKind::Leaf
        } else {
            classify(ty)
        };

        let env = option_tokens(field.name.as_deref());
        let default = option_tokens(field.default.as_deref());
        let required = field.required;
        let secret = field.secret;
        let nested = match kind {
            FieldKind::Record => quote! {
                ::core::option::Option::Some(
                    <#ty as ::envload::EnvRecord>::descriptors
                        as fn() -> &'static [::envload::FieldDescriptor]
                )
            },
            _ => quote! { ::core::option::Option::None },
        };

        descriptors.push(quote! {
            ::envload::FieldDescriptor {
                field: #field_name,
                env: #env,
                default: #default,
                required: #required,
                secret: #secret,
                nested: #nested,
            }
        });

        match (kind, &field.name) {
            (FieldKind::Record, _) => steps.push(quote! {
                resolver.descend(&mut self.#field_ident, &fields[#index])?;
            }),
            (FieldKind::Leaf, Some(env_name)) => {
                let const_name = format_ident!("ENV_VAR_{}", field_name.to_uppercase());
                constants.push(quote! {
                    pub const #const_name: &'static str = #env_name;
                });
                steps.push(quote! {
                    resolver.assign(&mut self.#field_ident, &fields[#index])?;
                });
            }
            (FieldKind::Unsupported, Some(_)) => {
                errors.push(
                    syn::Error::new_spanned(
                        ty,
                        format!(
                            "unsupported type `{}` for field `{}`",
                            quote!(#ty).to_string().replace(' ', ""),
                            field_name
                        ),
                    )
                    .to_compile_error(),
                );
            }
            (_, None) => {}
        }
    }

    if !errors.is_empty() {
        return quote! { #(#errors)* };
    }

    let descriptor_count = descriptors.len();
    let resolver_param = if steps.is_empty() {
        format_ident!("_resolver")
    } else {
        format_ident!("resolver")
    };
    let populate_body = if steps.is_empty() {
        quote! {
            ::core::result::Result::Ok(())
        }
    } else {
        quote! {
            let fields = <Self as ::envload::EnvRecord>::descriptors();
            #(#steps)*
            ::core::result::Result::Ok(())
        }
    };

    let custom_parser = opts.custom_parser.then(|| {
        quote! {
            fn custom_parser(&mut self) -> ::core::option::Option<&mut dyn ::envload::ParseEnv> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let constants_impl = (!constants.is_empty()).then(|| {
        quote! {
            impl #record_name {
                #(#constants)*
            }
        }
    });

    quote! {
        #constants_impl

        impl ::envload::EnvRecord for #record_name {
            fn descriptors() -> &'static [::envload::FieldDescriptor] {
                static FIELDS: [::envload::FieldDescriptor; #descriptor_count] = [
                    #(#descriptors),*
                ];
                &FIELDS
            }

            fn populate(
                &mut self,
                #resolver_param: &::envload::Resolver<'_>,
            ) -> ::core::result::Result<(), ::envload::EnvError> {
                #populate_body
            }

            #custom_parser
        }
    }
}

fn option_tokens(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(value) => quote! { ::core::option::Option::Some(#value) },
        None => quote! { ::core::option::Option::None },
    }
}

/// Classifies a field type by its last path segment.
fn classify(ty: &Type) -> FieldKind {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(segment) = type_path.path.segments.last() else {
                return FieldKind::Unsupported;
            };
            match segment.ident.to_string().as_str() {
                "String" | "bool" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8"
                | "u16" | "u32" | "u64" | "u128" | "usize" | "Duration" | "Vec" | "HashMap" => {
                    FieldKind::Leaf
                }
                "f32" | "f64" | "char" | "str" | "Option" => FieldKind::Unsupported,
                _ => FieldKind::Record,
            }
        }
        Type::Group(group) => classify(&group.elem),
        Type::Paren(paren) => classify(&paren.elem),
        _ => FieldKind::Unsupported,
    }
}
