use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::consts::PAGINATE_COLUMN;
use crate::entity::{Entity, Record, RelationKind};
use crate::fk::ForeignKey;
use crate::option::MapperOption;
use crate::registry::{TypeRegistry, default_registry};
use crate::rows::{ColumnInfo, RowSource};
use crate::state::{ModelState, Plan};
use crate::{Error, Value};

/// Result of a mapping call: the deduplicated root collection plus the
/// stream counters.
#[derive(Debug)]
pub struct Mapper<T> {
    data: Vec<T>,
    row_count: usize,
    paginate_total: i64,
}

impl<T> Mapper<T> {
    /// The materialized root entities in first-occurrence order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the mapper, handing the root collection to the caller.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Number of rows pulled from the source.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Last observed value of the reserved `total_row` column, zero when
    /// the column is absent.
    pub fn paginate_total(&self) -> i64 {
        self.paginate_total
    }
}

/// Maps a row stream into a deduplicated `T` collection with related
/// entities attached, using the default registry.
pub async fn map_rows<T, R>(rows: R, options: MapperOption) -> Result<Mapper<T>, Error>
where
    T: Entity + Record,
    R: RowSource,
{
    map_rows_in(default_registry(), rows, options, CancellationToken::new()).await
}

/// Cancellable variant of [`map_rows`]: the token aborts the stream and
/// bind phases between suspension points.
pub async fn map_rows_with_cancel<T, R>(
    rows: R,
    options: MapperOption,
    cancel: CancellationToken,
) -> Result<Mapper<T>, Error>
where
    T: Entity + Record,
    R: RowSource,
{
    map_rows_in(default_registry(), rows, options, cancel).await
}

/// Full-control variant taking an injected codec registry.
pub async fn map_rows_in<T, R>(
    registry: Arc<TypeRegistry>,
    mut rows: R,
    options: MapperOption,
    cancel: CancellationToken,
) -> Result<Mapper<T>, Error>
where
    T: Entity + Record,
    R: RowSource,
{
    let plan = Plan::build(Box::new(T::default()), &options)?;
    let mut states = plan.states;
    let child_indices: Vec<usize> = states[0].sub_states.clone();

    let columns: Arc<Vec<ColumnInfo>> = Arc::new(rows.columns().to_vec());
    let paginate_index = columns
        .iter()
        .position(|c| c.name.eq_ignore_ascii_case(PAGINATE_COLUMN));

    let mut row_count = 0usize;
    let mut paginate_total = 0i64;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let row = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            row = rows.next_row() => row?,
        };
        let Some(values) = row else {
            break;
        };
        row_count += 1;
        if let Some(index) = paginate_index {
            paginate_total = values.get(index).and_then(Value::to_i64).unwrap_or(0);
        }

        states = fill_states(states, &columns, values, &registry, &options, &cancel).await?;
    }

    if options.auto_binding && states.len() > 1 {
        // Grandchildren first, so root binding clones children that
        // already carry their own relations.
        for &child_index in &child_indices {
            if states[child_index].sub_states.is_empty()
                || states[child_index].collection.is_empty()
            {
                continue;
            }
            bind_state(&mut states, child_index, &registry, &cancel).await?;
        }
        bind_state(&mut states, 0, &registry, &cancel).await?;
    }

    let root = states.remove(0);
    let mut data = Vec::with_capacity(root.collection.len());
    for record in root.collection {
        match record.into_any().downcast::<T>() {
            Ok(entity) => data.push(*entity),
            Err(_) => return Err(Error::TaskPanic("root collection held a foreign record type".into())),
        }
    }

    Ok(Mapper {
        data,
        row_count,
        paginate_total,
    })
}

/// Runs one fill task per state for the current row and joins them before
/// the next row is pulled. The first error or panic aborts the call.
async fn fill_states(
    states: Vec<ModelState>,
    columns: &Arc<Vec<ColumnInfo>>,
    values: Vec<Value>,
    registry: &Arc<TypeRegistry>,
    options: &MapperOption,
    cancel: &CancellationToken,
) -> Result<Vec<ModelState>, Error> {
    let expected = states.len();
    let values: Arc<Vec<Value>> = Arc::new(values);
    let zero_pk = options.zero_pk;

    let mut tasks: JoinSet<(usize, ModelState, Result<(), Error>)> = JoinSet::new();
    for (index, mut state) in states.into_iter().enumerate() {
        let columns = Arc::clone(columns);
        let values = Arc::clone(&values);
        let registry = Arc::clone(registry);
        tasks.spawn(async move {
            let result = state.absorb_row(&columns, &values, &registry, zero_pk);
            (index, state, result)
        });
    }

    collect_states(tasks, expected, cancel).await
}

/// Joins a task group that returns indexed states, restoring their
/// original order and converting panics into errors.
async fn collect_states(
    mut tasks: JoinSet<(usize, ModelState, Result<(), Error>)>,
    expected: usize,
    cancel: &CancellationToken,
) -> Result<Vec<ModelState>, Error> {
    let mut finished: Vec<(usize, ModelState)> = Vec::with_capacity(expected);
    let mut failure: Option<Error> = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, state, Ok(()))) => finished.push((index, state)),
            Ok((index, state, Err(error))) => {
                finished.push((index, state));
                if failure.is_none() {
                    failure = Some(error);
                    tasks.abort_all();
                }
            }
            Err(join_error) => {
                if failure.is_none() {
                    failure = Some(join_error_to_error(join_error));
                    tasks.abort_all();
                }
            }
        }
    }

    if let Some(error) = failure {
        return Err(error);
    }
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    if finished.len() != expected {
        return Err(Error::TaskPanic("a mapping task vanished before joining".into()));
    }
    finished.sort_by_key(|(index, _)| *index);
    Ok(finished.into_iter().map(|(_, state)| state).collect())
}

fn join_error_to_error(join_error: tokio::task::JoinError) -> Error {
    if join_error.is_panic() {
        let payload = join_error.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "opaque panic payload".to_string());
        Error::TaskPanic(message)
    } else {
        Error::Cancelled
    }
}

/// Binds every element of `states[parent_index]` against that state's sub
/// collections, in parallel over elements.
async fn bind_state(
    states: &mut Vec<ModelState>,
    parent_index: usize,
    registry: &Arc<TypeRegistry>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    let bind_fields = states[parent_index].bind_fields.clone();
    if bind_fields.is_empty() || states[parent_index].collection.is_empty() {
        return Ok(());
    }

    let sub_indices = states[parent_index].sub_states.clone();
    let mut lookup: Vec<(String, Arc<Vec<Box<dyn Record>>>)> = Vec::with_capacity(sub_indices.len());
    for sub_index in sub_indices {
        let collection = std::mem::take(&mut states[sub_index].collection);
        lookup.push((states[sub_index].field_name.clone(), Arc::new(collection)));
    }
    let lookup = Arc::new(lookup);
    let bind_fields = Arc::new(bind_fields);

    let parent_collection = std::mem::take(&mut states[parent_index].collection);
    let expected = parent_collection.len();

    let mut tasks: JoinSet<(usize, Box<dyn Record>, Result<(), Error>)> = JoinSet::new();
    for (index, mut element) in parent_collection.into_iter().enumerate() {
        let lookup = Arc::clone(&lookup);
        let bind_fields = Arc::clone(&bind_fields);
        let registry = Arc::clone(registry);
        tasks.spawn(async move {
            let result = bind_element(element.as_mut(), &bind_fields, &lookup, &registry);
            (index, element, result)
        });
    }

    let mut finished: Vec<(usize, Box<dyn Record>)> = Vec::with_capacity(expected);
    let mut failure: Option<Error> = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, element, Ok(()))) => finished.push((index, element)),
            Ok((index, element, Err(error))) => {
                finished.push((index, element));
                if failure.is_none() {
                    failure = Some(error);
                    tasks.abort_all();
                }
            }
            Err(join_error) => {
                if failure.is_none() {
                    failure = Some(join_error_to_error(join_error));
                    tasks.abort_all();
                }
            }
        }
    }

    if let Some(error) = failure {
        return Err(error);
    }
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    if finished.len() != expected {
        return Err(Error::TaskPanic("a bind task vanished before joining".into()));
    }
    finished.sort_by_key(|(index, _)| *index);
    states[parent_index].collection = finished.into_iter().map(|(_, element)| element).collect();
    Ok(())
}

/// Wires one parent element's relation fields from the candidate
/// collections: singular relations take the first foreign-key match,
/// plural relations take every match in insertion order.
fn bind_element(
    parent: &mut dyn Record,
    bind_fields: &[String],
    lookup: &[(String, Arc<Vec<Box<dyn Record>>>)],
    registry: &TypeRegistry,
) -> Result<(), Error> {
    let meta = parent.meta();
    for field_name in bind_fields {
        let Some(field) = meta.field(field_name) else {
            log::warn!("field {field_name} not found on {}", meta.type_name);
            return Err(Error::FieldNotFound(field_name.clone()));
        };
        if field.fk.is_empty() {
            continue;
        }
        let fk = ForeignKey::parse(field.fk);
        fk.validate()?;

        let candidates = lookup
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field_name))
            .map(|(_, collection)| collection);

        let mut matches: Vec<Box<dyn Record>> = Vec::new();
        if let Some(candidates) = candidates {
            for candidate in candidates.iter() {
                if is_join(parent, candidate.as_ref(), &fk, registry)? {
                    matches.push(candidate.clone_record());
                    if field.relation == Some(RelationKind::One) {
                        break;
                    }
                }
            }
        }
        parent.attach(field.name, matches);
    }
    Ok(())
}

/// N-ary equijoin test between a parent and a candidate child, using the
/// registry codec of each parent-side field.
fn is_join(
    parent: &dyn Record,
    candidate: &dyn Record,
    fk: &ForeignKey,
    registry: &TypeRegistry,
) -> Result<bool, Error> {
    let meta = parent.meta();
    for (parent_field, child_field) in fk.pairs() {
        let field = meta
            .field(parent_field)
            .ok_or_else(|| Error::FieldNotFound(parent_field.to_string()))?;
        if field.tag.is_empty() {
            return Err(Error::TagValueNotFound(parent_field.to_string()));
        }
        let codec = registry
            .lookup(field.tag)
            .ok_or_else(|| Error::RegistryNotFound(field.tag.to_string()))?;
        let x = parent
            .get(parent_field)
            .ok_or_else(|| Error::FieldNotFound(parent_field.to_string()))?;
        let y = candidate
            .get(child_field)
            .ok_or_else(|| Error::FieldNotFound(child_field.to_string()))?;
        if x.is_null() || y.is_null() {
            return Ok(false);
        }
        if !codec.equal(&x, &y) {
            return Ok(false);
        }
    }
    Ok(true)
}
