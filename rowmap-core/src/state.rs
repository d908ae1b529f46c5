use hashbrown::HashMap;

use crate::consts::PK_SEPARATOR;
use crate::entity::{EntityMeta, Record};
use crate::fk::ForeignKey;
use crate::option::{MapperOption, ZeroPkPolicy};
use crate::registry::TypeRegistry;
use crate::rows::ColumnInfo;
use crate::{Error, Value};

/// Runtime state for one entity participating in a mapping call.
///
/// The root state owns the result collection; child and grandchild states
/// accumulate related records that the bind phase wires into their
/// parents. Each state is owned by exactly one fill task per row, so the
/// dedup index needs no locking.
pub(crate) struct ModelState {
    /// Relation field name in the parent entity; empty for the root.
    pub field_name: String,
    pub type_name: &'static str,
    pub prototype: Box<dyn Record>,
    pub collection: Vec<Box<dyn Record>>,
    /// Canonical PK -> position in `collection`.
    pub pk_index: HashMap<String, usize>,
    pub pk_fields: Vec<String>,
    /// Child-side foreign-key fields; they extend the dedup key so the
    /// same physical child row is kept once per parent.
    pub join_fields: Vec<String>,
    /// Relation field names bound on this state's elements during the
    /// bind phase.
    pub bind_fields: Vec<String>,
    /// Indices of the states this one binds from.
    pub sub_states: Vec<usize>,
    pub is_root: bool,
}

impl ModelState {
    fn new(
        field_name: String,
        prototype: Box<dyn Record>,
        pk_fields: Vec<String>,
        join_fields: Vec<String>,
        is_root: bool,
    ) -> Self {
        ModelState {
            field_name,
            type_name: prototype.meta().type_name,
            prototype,
            collection: Vec::new(),
            pk_index: HashMap::new(),
            pk_fields,
            join_fields,
            bind_fields: Vec::new(),
            sub_states: Vec::new(),
            is_root,
        }
    }

    /// Builds a fresh record from the current row, then inserts it into
    /// the collection unless its canonical key is absent or already seen.
    pub fn absorb_row(
        &mut self,
        columns: &[ColumnInfo],
        values: &[Value],
        registry: &TypeRegistry,
        zero_pk: ZeroPkPolicy,
    ) -> Result<(), Error> {
        let mut record = self.prototype.new_record();
        let meta = record.meta();
        let prefix = format!("{}.", meta.table);

        for (index, column) in columns.iter().enumerate() {
            let name = column.name.strip_prefix(&prefix).unwrap_or(&column.name);
            let Some(field) = meta.fields.iter().find(|f| f.is_column() && f.column == name)
            else {
                continue;
            };
            if field.tag.is_empty() {
                continue;
            }
            let codec = registry
                .lookup(field.tag)
                .ok_or_else(|| Error::RegistryNotFound(field.tag.to_string()))?;
            if let Some(value) = values.get(index).and_then(|raw| codec.bind(raw)) {
                record.set(field.name, value);
            }
        }

        let mut key_fields: Vec<&str> = self.pk_fields.iter().map(String::as_str).collect();
        if !self.is_root {
            key_fields.extend(self.join_fields.iter().map(String::as_str));
        }
        let Some(pk) = canonical_pk(record.as_ref(), &key_fields, registry, zero_pk)? else {
            return Ok(());
        };
        if self.pk_index.contains_key(&pk) {
            return Ok(());
        }
        self.collection.push(record);
        self.pk_index.insert(pk, self.collection.len() - 1);
        Ok(())
    }
}

/// Canonical string form of a record's key over the given fields, `None`
/// when any component is absent.
pub(crate) fn canonical_pk(
    record: &dyn Record,
    fields: &[&str],
    registry: &TypeRegistry,
    zero_pk: ZeroPkPolicy,
) -> Result<Option<String>, Error> {
    let meta = record.meta();
    let mut ids = Vec::with_capacity(fields.len());
    for name in fields {
        let Some(field) = meta.field(name) else {
            log::warn!("field {name} not found on {}", meta.type_name);
            return Err(Error::FieldNotFound((*name).to_string()));
        };
        if field.tag.is_empty() {
            return Err(Error::TagValueNotFound(field.name.to_string()));
        }
        let codec = registry
            .lookup(field.tag)
            .ok_or_else(|| Error::RegistryNotFound(field.tag.to_string()))?;
        let value = record
            .get(field.name)
            .ok_or_else(|| Error::FieldNotFound(field.name.to_string()))?;
        let id = codec.pk_id(&value, zero_pk);
        if id.is_empty() {
            return Ok(None);
        }
        ids.push(id);
    }
    Ok(Some(ids.join(PK_SEPARATOR)))
}

/// The state graph for one mapping call: the root state at index 0,
/// children and grandchildren behind it, linked through `sub_states`.
pub(crate) struct Plan {
    pub states: Vec<ModelState>,
}

impl Plan {
    /// Builds the two-level state graph from the root entity's metadata
    /// and the mapper options.
    pub fn build(root: Box<dyn Record>, options: &MapperOption) -> Result<Plan, Error> {
        let root_meta = root.meta();
        let mut root_state = ModelState::new(
            String::new(),
            root,
            resolve_pk_fields(root_meta, options),
            Vec::new(),
            true,
        );
        root_state.bind_fields = relation_field_names(root_meta);

        let mut states = vec![root_state];
        if !options.auto_binding {
            return Ok(Plan { states });
        }

        for field in root_meta.relation_fields() {
            let index = new_child_state(&mut states, 0, field.name, field.fk, options)?;
            states[0].sub_states.push(index);
        }

        // One more level: children with their own relations get grandchild
        // states; deeper nesting is not supported.
        let child_indices = states[0].sub_states.clone();
        for child_index in child_indices {
            let child_meta = states[child_index].prototype.meta();
            let child_type = states[child_index].type_name;
            let relations: Vec<(&'static str, &'static str)> = child_meta
                .relation_fields()
                .map(|f| (f.name, f.fk))
                .collect();
            if relations.is_empty() {
                continue;
            }
            let mut sub_indices = Vec::new();
            for (name, fk) in &relations {
                let index = new_child_state(&mut states, child_index, name, fk, options)?;
                // A relation back onto the child's own type never has rows
                // of its own in the stream; leave it unmaterialized.
                if states[index].type_name == child_type {
                    states.truncate(index);
                    continue;
                }
                sub_indices.push(index);
            }
            if !sub_indices.is_empty() {
                states[child_index].bind_fields =
                    relations.iter().map(|(name, _)| (*name).to_string()).collect();
                states[child_index].sub_states = sub_indices;
            }
        }

        Ok(Plan { states })
    }
}

fn new_child_state(
    states: &mut Vec<ModelState>,
    parent_index: usize,
    field_name: &str,
    fk_tag: &str,
    options: &MapperOption,
) -> Result<usize, Error> {
    let prototype = states[parent_index]
        .prototype
        .relation_record(field_name)
        .ok_or_else(|| Error::FieldNotFound(field_name.to_string()))?;
    let fk = ForeignKey::parse(fk_tag);
    fk.validate()?;
    let pk_fields = resolve_pk_fields(prototype.meta(), options);
    let state = ModelState::new(
        field_name.to_string(),
        prototype,
        pk_fields,
        fk.child_fields,
        false,
    );
    states.push(state);
    Ok(states.len() - 1)
}

fn resolve_pk_fields(meta: &EntityMeta, options: &MapperOption) -> Vec<String> {
    options
        .pk_fields_for(meta.type_name)
        .unwrap_or_else(|| meta.pk.iter().map(|f| (*f).to_string()).collect())
}

fn relation_field_names(meta: &EntityMeta) -> Vec<String> {
    meta.relation_fields().map(|f| f.name.to_string()).collect()
}
