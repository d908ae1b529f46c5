use async_trait::async_trait;
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};

use crate::driver::Row;
use crate::rows::{ColumnInfo, RowSource};
use crate::{Error, Value};

/// [`RowSource`] over rows already fetched through the active sqlx driver.
///
/// Column values are decoded into [`Value`]s by database type name, so the
/// registry sees the same dynamic shapes regardless of driver.
///
/// ```no_run
/// # async fn run(pool: &rowmap_core::driver::Pool) -> Result<(), Box<dyn std::error::Error>> {
/// use rowmap_core::DriverRows;
///
/// let rows = rowmap_core::sqlx::query("SELECT orders.id \"orders.id\" FROM orders")
///     .fetch_all(pool)
///     .await?;
/// let source = DriverRows::new(rows);
/// # Ok(())
/// # }
/// ```
pub struct DriverRows {
    columns: Vec<ColumnInfo>,
    rows: std::vec::IntoIter<Row>,
}

impl DriverRows {
    pub fn new(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|c| ColumnInfo::new(c.name()))
                    .collect()
            })
            .unwrap_or_default();
        DriverRows {
            columns,
            rows: rows.into_iter(),
        }
    }
}

#[async_trait]
impl RowSource for DriverRows {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<Vec<Value>>, Error> {
        let Some(row) = self.rows.next() else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(row.columns().len());
        for index in 0..row.columns().len() {
            values.push(decode_column(&row, index)?);
        }
        Ok(Some(values))
    }
}

fn get<'r, T>(row: &'r Row, index: usize) -> Result<T, Error>
where
    T: sqlx::Decode<'r, crate::driver::Driver> + sqlx::Type<crate::driver::Driver>,
{
    row.try_get::<T, _>(index)
        .map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(feature = "postgres")]
fn decode_column(row: &Row, index: usize) -> Result<Value, Error> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| Error::Decode(e.to_string()))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();
    Ok(match type_name.as_str() {
        "BOOL" => Value::Bool(get::<bool>(row, index)?),
        "INT2" => Value::Int(i64::from(get::<i16>(row, index)?)),
        "INT4" => Value::Int(i64::from(get::<i32>(row, index)?)),
        "INT8" => Value::Int(get::<i64>(row, index)?),
        "FLOAT4" => Value::Float(f64::from(get::<f32>(row, index)?)),
        "FLOAT8" => Value::Float(get::<f64>(row, index)?),
        "UUID" => Value::Uuid(get::<uuid::Uuid>(row, index)?),
        "TIMESTAMPTZ" => Value::Timestamp(get::<chrono::DateTime<chrono::Utc>>(row, index)?),
        "TIMESTAMP" => {
            let naive = get::<chrono::NaiveDateTime>(row, index)?;
            Value::Timestamp(naive.and_utc())
        }
        "DATE" => Value::Date(get::<chrono::NaiveDate>(row, index)?),
        "BYTEA" => Value::Bytes(get::<Vec<u8>>(row, index)?),
        "TEXT" | "VARCHAR" | "CHAR" | "BPCHAR" | "NAME" => Value::Text(get::<String>(row, index)?),
        other => {
            // Anything else is carried as text and left to the registry's
            // permissive coercions.
            row.try_get::<String, _>(index)
                .map(Value::Text)
                .map_err(|_| Error::Decode(format!("unsupported column type {other}")))?
        }
    })
}

#[cfg(feature = "sqlite")]
fn decode_column(row: &Row, index: usize) -> Result<Value, Error> {
    let raw = row
        .try_get_raw(index)
        .map_err(|e| Error::Decode(e.to_string()))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();
    Ok(match type_name.as_str() {
        "BOOLEAN" => Value::Bool(get::<bool>(row, index)?),
        "INTEGER" | "INT" => Value::Int(get::<i64>(row, index)?),
        "REAL" => Value::Float(get::<f64>(row, index)?),
        "BLOB" => Value::Bytes(get::<Vec<u8>>(row, index)?),
        // SQLite stores instants and dates as text; the registry parses
        // them per field tag.
        _ => Value::Text(get::<String>(row, index)?),
    })
}
