use std::any::Any;

use crate::Value;

/// Shape of a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// `Option<Child>` — at most one related record is attached.
    One,
    /// `Vec<Child>` — every matching record is attached in insertion order.
    Many,
}

/// Static metadata for a single entity field, produced by the derive.
#[derive(Debug)]
pub struct FieldMeta {
    /// Rust field name.
    pub name: &'static str,
    /// SQL column name, or `-` for fields not backed by a column.
    pub column: &'static str,
    /// Logical type tag resolved through the registry; empty means the
    /// field is never bound from a row.
    pub tag: &'static str,
    /// Raw foreign-key descriptor, empty for non-relation fields.
    pub fk: &'static str,
    /// Present only on relation fields.
    pub relation: Option<RelationKind>,
}

impl FieldMeta {
    /// True for fields the selector projects and the fill step binds.
    pub fn is_column(&self) -> bool {
        self.relation.is_none() && !self.column.is_empty() && self.column != crate::COLUMN_SKIP
    }

    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

/// Static metadata for an entity type.
#[derive(Debug)]
pub struct EntityMeta {
    pub type_name: &'static str,
    pub table: &'static str,
    /// Primary-key field names in annotation order.
    pub pk: &'static [&'static str],
    /// All fields in declaration order.
    pub fields: &'static [FieldMeta],
}

impl EntityMeta {
    pub fn field(&self, name: &str) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation_fields(&self) -> impl Iterator<Item = &'static FieldMeta> {
        self.fields.iter().filter(|f| f.is_relation())
    }
}

/// Compile-time entity capability: access to the metadata table generated
/// by `#[derive(Entity)]`.
pub trait Entity: Default + Clone + Send + 'static {
    fn meta() -> &'static EntityMeta;
}

/// Type-erased record access used by the mapper at runtime.
///
/// Implemented by the derive for every entity; the mapper holds entire
/// collections as `Box<dyn Record>` and only downcasts the root collection
/// back to its concrete type when the result is read.
pub trait Record: Send + Sync {
    fn meta(&self) -> &'static EntityMeta;

    /// Current value of a registry-bound field; `None` for unknown or
    /// relation fields.
    fn get(&self, field: &str) -> Option<Value>;

    /// Writes a canonical value into a registry-bound field. Unknown
    /// fields and inconvertible values are ignored.
    fn set(&mut self, field: &str, value: Value);

    /// Fresh default instance of the same entity type.
    fn new_record(&self) -> Box<dyn Record>;

    fn clone_record(&self) -> Box<dyn Record>;

    /// Fresh default instance of the element type behind a relation field.
    fn relation_record(&self, field: &str) -> Option<Box<dyn Record>>;

    /// Replaces a relation field's content with the given children:
    /// singular relations take the first element, plural relations take
    /// all of them (an empty vector resets the field).
    fn attach(&mut self, field: &str, children: Vec<Box<dyn Record>>);

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
