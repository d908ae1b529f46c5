//! # `Rowmap`
//!
//! **A row-to-object mapper that folds joined SQL rows into entity graphs.**
//!
//! ## Overview
//!
//! Rowmap consumes the flat row stream a LEFT JOIN query produces and
//! materializes a deduplicated list of root entities, with related child
//! entities attached according to declarative foreign-key metadata on the
//! entity definitions.
//!
//! ## Main features:
//! - **Declarative**: entities are plain structs; `#[derive(Entity)]` with
//!   `#[orm(...)]` attributes generates all metadata at compile time.
//! - **Join binding**: parent/child graphs are rebuilt in memory from the
//!   denormalized row set, deduplicating parents by primary key while
//!   aggregating children.
//! - **Pluggable value semantics**: per-tag codecs control binding, key
//!   canonicalization and join equality, and can be extended through an
//!   injected registry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowmap::{Entity, MapperOption, MemoryRows, map_rows};
//!
//! let rows = MemoryRows::new(vec!["orders.id", "orders.name"], vec![]);
//! let mapper = map_rows::<Order, _>(rows, MapperOption::new()).await?;
//! let orders: Vec<Order> = mapper.into_data();
//! ```
//!
//! The optional `postgres` / `sqlite` features (mutually exclusive) enable
//! a `DriverRows` adapter over fetched sqlx rows.

pub use rowmap_core::*;
pub use rowmap_macros::Entity;

pub mod prelude {
    pub use async_trait::async_trait;
    pub use rowmap_core::*;
    pub use rowmap_macros::Entity;
    pub use tokio_util::sync::CancellationToken;
}
