/// Reserved column carrying the pagination total for the whole result set.
pub const PAGINATE_COLUMN: &str = "total_row";

/// Column annotation marking a field as not backed by any column.
pub const COLUMN_SKIP: &str = "-";

/// Separator between components of a canonical primary-key string.
pub const PK_SEPARATOR: &str = "+";

/// Separator between field names inside annotation lists.
pub const FIELD_SEPARATOR: &str = ",";
