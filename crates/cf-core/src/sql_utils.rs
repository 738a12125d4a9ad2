//! SQL identifier quoting utilities
//!
//! Table and column names come from the static catalog and the dataset name
//! from configuration; both are quoted before they reach a SQL string.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use cf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("videos_static"), r#""videos_static""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a table name inside a dataset (schema).
///
/// Each part is quoted on its own, so a dot inside either part stays literal.
///
/// # Examples
/// ```
/// use cf_core::sql_utils::quote_table;
/// assert_eq!(
///     quote_table("channel_analytics", "videos_snapshot"),
///     r#""channel_analytics"."videos_snapshot""#
/// );
/// ```
pub fn quote_table(dataset: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(dataset), quote_ident(table))
}
