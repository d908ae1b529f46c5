use async_trait::async_trait;

use crate::{Error, Value};

/// Column metadata reported once per result set.
///
/// Names carry a `table.` prefix when the query projected through
/// [`build_selector`](crate::build_selector); bare names are matched
/// against every entity in the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Self {
        ColumnInfo { name: name.into() }
    }
}

/// Source of positional rows consumed by the mapper.
///
/// The mapper owns the source for the duration of a call and pulls rows
/// strictly in order; `next_row` is its only suspension point.
#[async_trait]
pub trait RowSource: Send {
    /// Column metadata, available before the first row is pulled.
    fn columns(&self) -> &[ColumnInfo];

    /// Next row as positional values, `None` at end of stream.
    async fn next_row(&mut self) -> Result<Option<Vec<Value>>, Error>;
}

/// In-memory [`RowSource`] used by tests and examples.
pub struct MemoryRows {
    columns: Vec<ColumnInfo>,
    rows: std::vec::IntoIter<Vec<Value>>,
    fail_after: Option<(usize, String)>,
    delivered: usize,
}

impl MemoryRows {
    pub fn new<C: Into<String>>(columns: Vec<C>, rows: Vec<Vec<Value>>) -> Self {
        MemoryRows {
            columns: columns.into_iter().map(|c| ColumnInfo::new(c)).collect(),
            rows: rows.into_iter(),
            fail_after: None,
            delivered: 0,
        }
    }

    /// Makes the source fail with an iterator error after `n` delivered
    /// rows, for exercising mid-stream failures.
    pub fn fail_after(mut self, n: usize, message: impl Into<String>) -> Self {
        self.fail_after = Some((n, message.into()));
        self
    }
}

#[async_trait]
impl RowSource for MemoryRows {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Vec<Value>>, Error> {
        if let Some((n, message)) = &self.fail_after {
            if self.delivered >= *n {
                return Err(Error::Iterator(message.clone().into()));
            }
        }
        match self.rows.next() {
            Some(row) => {
                self.delivered += 1;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }
}
