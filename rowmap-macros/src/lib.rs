use proc_macro::TokenStream;
use syn::parse_macro_input;

use crate::entity::EntityStruct;

mod attrs;
mod entity;
mod meta;
mod record;

/// Derives the entity metadata and type-erased record access the mapper
/// needs to fold joined rows into this struct.
///
/// # Basic Usage
///
/// ```rust,ignore
/// use rowmap::Entity;
/// use uuid::Uuid;
///
/// #[derive(Debug, Clone, Default, Entity)]
/// #[orm(table = "orders", pk = "id")]
/// pub struct Order {
///     #[orm(column = "id", tag = "uuid")]
///     pub id: Option<Uuid>,
///     #[orm(column = "name", tag = "string")]
///     pub name: String,
///
///     #[orm(fk = "fk_field1:id,fk_field2:order_id")]
///     pub toppings: Vec<Topping>,
/// }
/// ```
///
/// # Struct Attributes
///
/// - **`table = "orders"`** - database table name (defaults to the
///   lowercased struct name); the mapper strips this prefix off column
///   names when it binds joined rows
/// - **`pk = "id"`** - comma-separated primary-key field names (required);
///   the canonical key over these fields drives deduplication
///
/// # Field Attributes
///
/// - **`column = "name"`** - SQL column backing the field, defaulting to
///   the field name; `-` removes the field from projection and binding
/// - **`tag = "uuid"`** - logical type tag resolved through the codec
///   registry; recognized tags are `uuid`, `zerouuid`, `string`, `int32`,
///   `int64`, `float32`, `float64`, `bool`, `timestamp`, `date`,
///   `zerostring`, `zeroint`, `zerofloat`, `zerobool`. A field without a
///   tag is never bound from a row.
/// - **`fk = "fk_field1:<parent>[+...],fk_field2:<child>[+...]"`** - marks
///   a relation field joined in memory: each parent-side field must
///   compare equal (per its tag's codec) to the paired child-side field.
///   The field type must be `Vec<Child>` for plural relations or
///   `Option<Child>` for singular ones, and `Child` must itself derive
///   `Entity`.
///
/// The struct must implement `Default` and `Clone`; relation targets are
/// instantiated through `Default` when the mapper builds its state graph.
#[proc_macro_derive(Entity, attributes(orm))]
pub fn entity(input: TokenStream) -> TokenStream {
    let es = parse_macro_input!(input as EntityStruct);
    entity::handle(es).into()
}
