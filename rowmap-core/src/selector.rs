use crate::entity::Entity;

/// Builds the projection fragment for `T`: every column-backed field as
/// `table.col "table.col"`, comma-joined in declaration order.
///
/// The quoted alias keeps column names unambiguous across joined tables;
/// the mapper strips the `table.` prefix again when it locates the
/// destination field.
pub fn build_selector<T: Entity>() -> String {
    let meta = T::meta();
    let mut selectors = Vec::new();
    for field in meta.fields {
        if !field.is_column() {
            continue;
        }
        selectors.push(format!(
            r#"{table}.{column} "{table}.{column}""#,
            table = meta.table,
            column = field.column
        ));
    }
    selectors.join(",")
}
