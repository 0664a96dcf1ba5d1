//! Database ID type definition.

/// Alias for the integer type the data service uses for record IDs.
pub type DatabaseId = i64;
