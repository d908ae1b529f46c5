use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Field, Fields, Ident, LitStr, Result, Type,
    parse::{Parse, ParseStream},
};

use crate::{attrs, meta, record};

/// Represents a single field in an entity struct during macro processing.
#[derive(Debug, Clone)]
pub struct EntityField {
    /// The Rust identifier name (e.g., `id`, `order_date`)
    pub ident: Ident,
    /// SQL column name; `-` for fields without a column.
    pub column: String,
    /// Logical type tag; empty when the field is never bound.
    pub tag: String,
    /// Raw foreign-key descriptor; empty for non-relation fields.
    pub fk: String,
    /// Relation shape and element type, for `fk` fields only.
    pub relation: Option<RelationShape>,
}

/// Shape of a relation field, carrying the related element type.
#[derive(Debug, Clone)]
pub enum RelationShape {
    /// `Option<Child>`
    One(Type),
    /// `Vec<Child>`
    Many(Type),
}

impl RelationShape {
    pub fn target(&self) -> &Type {
        match self {
            RelationShape::One(ty) | RelationShape::Many(ty) => ty,
        }
    }
}

/// Complete representation of an entity struct during macro processing.
#[derive(Debug)]
pub struct EntityStruct {
    /// The name of the Rust struct
    pub struct_ident: Ident,
    /// The database table name (from `#[orm(table = "...")]`, defaulting
    /// to the lowercased struct name)
    pub table_name: String,
    /// Primary-key field names in annotation order
    pub pk_fields: Vec<String>,
    /// All fields in declaration order
    pub fields: Vec<EntityField>,
}

impl Parse for EntityStruct {
    fn parse(input: ParseStream) -> Result<Self> {
        let derive_input: DeriveInput = input.parse()?;
        let struct_ident = derive_input.ident.clone();
        let mut table_name = struct_ident.to_string().to_lowercase();
        let mut pk_fields: Vec<String> = Vec::new();

        for attr in &derive_input.attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            attr.parse_nested_meta(|nested| {
                if nested.path.is_ident("table") {
                    let lit: LitStr = nested.value()?.parse()?;
                    table_name = lit.value();
                } else if nested.path.is_ident("pk") {
                    let lit: LitStr = nested.value()?.parse()?;
                    pk_fields = lit
                        .value()
                        .split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect();
                } else {
                    return Err(nested.error("unrecognized orm modifier"));
                }
                Ok(())
            })?;
        }

        let fields: Vec<EntityField> = match derive_input.data {
            Data::Struct(data) => match data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(|f: &Field| attrs::parse_entity_field(f))
                    .collect::<Result<Vec<_>>>()?,
                _ => {
                    return Err(syn::Error::new_spanned(
                        struct_ident,
                        "Entity must have named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_ident,
                    "Entity can only be derived for structs",
                ));
            }
        };

        if pk_fields.is_empty() {
            return Err(syn::Error::new_spanned(
                &struct_ident,
                "Entity must declare a primary key: #[orm(pk = \"field\")]",
            ));
        }
        for pk in &pk_fields {
            if !fields.iter().any(|f| f.ident == pk) {
                return Err(syn::Error::new_spanned(
                    &struct_ident,
                    format!("unknown primary key field `{pk}`"),
                ));
            }
        }

        Ok(Self {
            struct_ident,
            table_name,
            pk_fields,
            fields,
        })
    }
}

pub fn handle(es: EntityStruct) -> TokenStream {
    let meta = meta::entity_impl(&es);
    let record = record::record_impl(&es);
    quote!(
        #meta

        #record
    )
}
