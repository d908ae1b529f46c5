use crate::Entity;

/// Policy for primary keys whose numeric canonical form is zero.
///
/// By default a zero key counts as "row absent", which is safe for LEFT
/// JOIN result sets but suppresses legitimate zero-keyed rows;
/// [`MapperOption::allow_zero_pk`] opts out per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroPkPolicy {
    #[default]
    TreatAsAbsent,
    Allow,
}

/// Primary-key override for one entity type, matched by type name.
#[derive(Debug, Clone)]
pub struct PkOverride {
    pub type_name: &'static str,
    pub fields: Vec<String>,
}

/// Per-call mapper configuration, built in the same fluent style the rest
/// of the crate uses.
#[derive(Debug, Clone)]
pub struct MapperOption {
    pub(crate) auto_binding: bool,
    pub(crate) pk_overrides: Vec<PkOverride>,
    pub(crate) zero_pk: ZeroPkPolicy,
}

impl Default for MapperOption {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperOption {
    pub fn new() -> Self {
        MapperOption {
            auto_binding: true,
            pk_overrides: Vec::new(),
            zero_pk: ZeroPkPolicy::default(),
        }
    }

    /// Materializes only the root entity; no child states are created and
    /// relation fields stay at their defaults.
    pub fn disable_binding(mut self) -> Self {
        self.auto_binding = false;
        self
    }

    /// Replaces the annotated primary-key field list for entity type `E`.
    pub fn override_pk<E: Entity>(mut self, fields: &[&str]) -> Self {
        self.pk_overrides.push(PkOverride {
            type_name: E::meta().type_name,
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        });
        self
    }

    /// Keeps rows whose numeric primary key canonicalizes to zero.
    pub fn allow_zero_pk(mut self) -> Self {
        self.zero_pk = ZeroPkPolicy::Allow;
        self
    }

    pub(crate) fn pk_fields_for(&self, type_name: &str) -> Option<Vec<String>> {
        self.pk_overrides
            .iter()
            .find(|o| o.type_name == type_name)
            .map(|o| o.fields.clone())
    }
}
