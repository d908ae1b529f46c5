//! Attribute parsing for Entity macro fields.
//!
//! This module handles parsing of `#[orm(...)]` attributes on struct
//! fields, converting them into the `EntityField` metadata the code
//! generators consume.

use syn::{Field, GenericArgument, LitStr, PathArguments, Result, Type};

use crate::entity::{EntityField, RelationShape};

/// Parses a single struct field into an `EntityField`.
///
/// # Supported Attributes
///
/// ## `#[orm(...)]`
/// - `column = "name"` - SQL column backing the field (defaults to the
///   field name, `-` removes the field from projection and binding)
/// - `tag = "logical_type"` - registry tag controlling bind/equality
///   semantics; a field without a tag is never bound from a row
/// - `fk = "fk_field1:a+b,fk_field2:c+d"` - marks a relation field; the
///   field type must be `Vec<Child>` or `Option<Child>`
pub fn parse_entity_field(field: &Field) -> Result<EntityField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Entity fields must be named"))?;

    let mut column: Option<String> = None;
    let mut tag = String::new();
    let mut fk = String::new();

    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let name = meta
                .path
                .get_ident()
                .map(|i| i.to_string())
                .ok_or_else(|| meta.error("expected identifier"))?;

            match name.as_str() {
                "column" => {
                    let lit: LitStr = meta.value()?.parse()?;
                    column = Some(lit.value());
                }
                "tag" => {
                    let lit: LitStr = meta.value()?.parse()?;
                    tag = lit.value();
                }
                "fk" => {
                    let lit: LitStr = meta.value()?.parse()?;
                    fk = lit.value();
                }
                _ => return Err(meta.error("unrecognized orm modifier")),
            }
            Ok(())
        })?;
    }

    let relation = if fk.is_empty() {
        None
    } else {
        let Some(shape) = relation_shape(&field.ty) else {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "relation fields must be `Vec<Child>` or `Option<Child>`",
            ));
        };
        Some(shape)
    };

    let column = match (&relation, column) {
        // Relation fields are never backed by a column.
        (Some(_), _) => "-".to_string(),
        (None, Some(column)) => column,
        (None, None) => ident.to_string(),
    };

    Ok(EntityField {
        ident,
        column,
        tag,
        fk,
        relation,
    })
}

/// Extracts the relation shape and element type out of `Vec<Child>` or
/// `Option<Child>`.
fn relation_shape(ty: &Type) -> Option<RelationShape> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let GenericArgument::Type(inner) = args.args.first()? else {
        return None;
    };
    match segment.ident.to_string().as_str() {
        "Vec" => Some(RelationShape::Many(inner.clone())),
        "Option" => Some(RelationShape::One(inner.clone())),
        _ => None,
    }
}
