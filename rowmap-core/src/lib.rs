mod consts;
mod entity;
mod error;
mod fk;
mod mapper;
mod option;
mod registry;
mod rows;
mod selector;
mod state;
mod value;

pub use consts::{COLUMN_SKIP, FIELD_SEPARATOR, PAGINATE_COLUMN, PK_SEPARATOR};
pub use entity::{Entity, EntityMeta, FieldMeta, Record, RelationKind};
pub use error::Error;
pub use fk::ForeignKey;
pub use mapper::{Mapper, map_rows, map_rows_in, map_rows_with_cancel};
pub use option::{MapperOption, PkOverride, ZeroPkPolicy};
pub use registry::{TypeCodec, TypeRegistry, default_registry};
pub use rows::{ColumnInfo, MemoryRows, RowSource};
pub use selector::build_selector;
pub use value::{FromValue, IntoValue, Value};

pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
mod sqlx_rows;
#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub use sqlx_rows::DriverRows;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
pub mod driver {
    #[cfg(all(feature = "postgres", feature = "sqlite"))]
    compile_error!(
        "only one database driver can be set – please enable either 'postgres' or 'sqlite' feature, not both"
    );

    #[cfg(feature = "postgres")]
    /// Rowmap Database Driver
    pub type Driver = sqlx::Postgres;

    #[cfg(feature = "postgres")]
    /// Rowmap Database Pool
    pub type Pool = sqlx::PgPool;

    #[cfg(feature = "postgres")]
    /// Rowmap Database Row
    pub type Row = sqlx::postgres::PgRow;

    #[cfg(feature = "sqlite")]
    /// Rowmap Database Driver
    pub type Driver = sqlx::Sqlite;

    #[cfg(feature = "sqlite")]
    /// Rowmap Database Pool
    pub type Pool = sqlx::SqlitePool;

    #[cfg(feature = "sqlite")]
    /// Rowmap Database Row
    pub type Row = sqlx::sqlite::SqliteRow;
}

#[cfg(any(feature = "postgres", feature = "sqlite"))]
#[doc(hidden)]
pub use sqlx;
