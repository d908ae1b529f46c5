use proc_macro2::TokenStream;
use quote::quote;

use crate::entity::{EntityStruct, RelationShape};

/// Generates the `Entity` impl: the static metadata table the mapper
/// walks at runtime.
pub fn entity_impl(es: &EntityStruct) -> TokenStream {
    let struct_ident = &es.struct_ident;
    let type_name = struct_ident.to_string();
    let table = &es.table_name;
    let pk: Vec<&String> = es.pk_fields.iter().collect();

    let field_metas: Vec<TokenStream> = es
        .fields
        .iter()
        .map(|f| {
            let name = f.ident.to_string();
            let column = &f.column;
            let tag = &f.tag;
            let fk = &f.fk;
            let relation = match &f.relation {
                None => quote!(::core::option::Option::None),
                Some(RelationShape::One(_)) => {
                    quote!(::core::option::Option::Some(::rowmap::RelationKind::One))
                }
                Some(RelationShape::Many(_)) => {
                    quote!(::core::option::Option::Some(::rowmap::RelationKind::Many))
                }
            };
            quote! {
                ::rowmap::FieldMeta {
                    name: #name,
                    column: #column,
                    tag: #tag,
                    fk: #fk,
                    relation: #relation,
                }
            }
        })
        .collect();

    quote! {
        #[automatically_derived]
        impl ::rowmap::Entity for #struct_ident {
            fn meta() -> &'static ::rowmap::EntityMeta {
                const FIELDS: &[::rowmap::FieldMeta] = &[#(#field_metas),*];
                const PK: &[&str] = &[#(#pk),*];
                static META: ::rowmap::EntityMeta = ::rowmap::EntityMeta {
                    type_name: #type_name,
                    table: #table,
                    pk: PK,
                    fields: FIELDS,
                };
                &META
            }
        }
    }
}
