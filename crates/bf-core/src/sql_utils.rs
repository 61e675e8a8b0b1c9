//! SQL quoting utilities
//!
//! Table and column names reach generated SQL from the source database's
//! catalog and from artifact headers, so every name and value is quoted.

/// Quote a SQL identifier.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use bf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("sets_dim"), r#""sets_dim""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape a SQL string literal value by doubling single quotes.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a nullable cell as a SQL literal
///
/// # Examples
/// ```
/// use bf_core::sql_utils::sql_literal;
/// assert_eq!(sql_literal(None), "NULL");
/// assert_eq!(sql_literal(Some("O'Brien")), "'O''Brien'");
/// ```
pub fn sql_literal(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("'{}'", escape_sql_string(v)),
        None => "NULL".to_string(),
    }
}
