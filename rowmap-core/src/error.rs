/// Errors surfaced by [`map_rows`](crate::map_rows) and its variants.
///
/// Nothing is retried internally; the first failure aborts the current
/// mapping call and any partially built result is discarded.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A primary-key list, override, or foreign-key descriptor referenced a
    /// field the entity does not declare.
    #[error("field `{0}` not found on entity")]
    FieldNotFound(String),

    /// A field participating in key canonicalization carries no logical
    /// type tag.
    #[error("tag value not found for field `{0}`")]
    TagValueNotFound(String),

    /// A foreign-key descriptor is missing its parent or child side.
    #[error("not identify fk field on tag")]
    MissingFkField,

    /// A logical type tag has no registered codec.
    #[error("registry not found for type tag `{0}`")]
    RegistryNotFound(String),

    /// Propagated from the row source.
    #[error("row iterator failure: {0}")]
    Iterator(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// A driver adapter could not decode a column into a [`Value`](crate::Value).
    #[error("column decode failure: {0}")]
    Decode(String),

    /// The caller's cancellation token fired while rows were being mapped.
    #[error("mapping cancelled")]
    Cancelled,

    /// A fill or bind task panicked; the payload is preserved as text.
    #[error("panic during row mapping: {0}")]
    TaskPanic(String),
}
