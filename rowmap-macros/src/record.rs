use proc_macro2::TokenStream;
use quote::quote;

use crate::entity::{EntityStruct, RelationShape};

/// Generates the `Record` impl: type-erased field access over the entity,
/// dispatching on field names the same way the metadata table spells them.
pub fn record_impl(es: &EntityStruct) -> TokenStream {
    let struct_ident = &es.struct_ident;

    let bound = || {
        es.fields
            .iter()
            .filter(|f| f.relation.is_none() && !f.tag.is_empty())
    };

    let get_arms: Vec<TokenStream> = bound()
        .map(|f| {
            let name = f.ident.to_string();
            let ident = &f.ident;
            quote! {
                #name => ::core::option::Option::Some(::rowmap::IntoValue::into_value(&self.#ident)),
            }
        })
        .collect();

    let set_arms: Vec<TokenStream> = bound()
        .map(|f| {
            let name = f.ident.to_string();
            let ident = &f.ident;
            quote! {
                #name => {
                    if let ::core::option::Option::Some(converted) =
                        ::rowmap::FromValue::from_value(value)
                    {
                        self.#ident = converted;
                    }
                }
            }
        })
        .collect();

    let relation_arms: Vec<TokenStream> = es
        .fields
        .iter()
        .filter_map(|f| {
            let shape = f.relation.as_ref()?;
            let name = f.ident.to_string();
            let target = shape.target();
            Some(quote! {
                #name => ::core::option::Option::Some(::std::boxed::Box::new(
                    <#target as ::core::default::Default>::default(),
                )),
            })
        })
        .collect();

    let attach_arms: Vec<TokenStream> = es
        .fields
        .iter()
        .filter_map(|f| {
            let shape = f.relation.as_ref()?;
            let name = f.ident.to_string();
            let ident = &f.ident;
            let target = shape.target();
            Some(match shape {
                RelationShape::One(_) => quote! {
                    #name => {
                        self.#ident = children
                            .into_iter()
                            .next()
                            .and_then(|child| child.into_any().downcast::<#target>().ok())
                            .map(|child| *child);
                    }
                },
                RelationShape::Many(_) => quote! {
                    #name => {
                        self.#ident = children
                            .into_iter()
                            .filter_map(|child| {
                                child.into_any().downcast::<#target>().ok().map(|child| *child)
                            })
                            .collect();
                    }
                },
            })
        })
        .collect();

    quote! {
        #[automatically_derived]
        impl ::rowmap::Record for #struct_ident {
            fn meta(&self) -> &'static ::rowmap::EntityMeta {
                <Self as ::rowmap::Entity>::meta()
            }

            fn get(&self, field: &str) -> ::core::option::Option<::rowmap::Value> {
                match field {
                    #(#get_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn set(&mut self, field: &str, value: ::rowmap::Value) {
                match field {
                    #(#set_arms)*
                    _ => {
                        let _ = value;
                    }
                }
            }

            fn new_record(&self) -> ::std::boxed::Box<dyn ::rowmap::Record> {
                ::std::boxed::Box::new(<Self as ::core::default::Default>::default())
            }

            fn clone_record(&self) -> ::std::boxed::Box<dyn ::rowmap::Record> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn relation_record(
                &self,
                field: &str,
            ) -> ::core::option::Option<::std::boxed::Box<dyn ::rowmap::Record>> {
                match field {
                    #(#relation_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn attach(
                &mut self,
                field: &str,
                children: ::std::vec::Vec<::std::boxed::Box<dyn ::rowmap::Record>>,
            ) {
                match field {
                    #(#attach_arms)*
                    _ => {}
                }
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }
    }
}
