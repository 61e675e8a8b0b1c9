//! SQL generation shared by the backends

use crate::error::{DbError, DbResult};
use bf_core::sql_utils::{escape_sql_string, quote_ident, sql_literal};
use bf_core::Table;

/// Rows per generated INSERT statement
pub(crate) const INSERT_BATCH_ROWS: usize = 500;

/// Base-table discovery query; works against PostgreSQL and DuckDB
pub(crate) const LIST_BASE_TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_type = 'BASE TABLE' \
     AND table_schema = current_schema() \
     ORDER BY table_name";

/// Count of relations named `name` in the current schema
pub(crate) fn relation_exists_sql(name: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_name = '{}'",
        escape_sql_string(name)
    )
}

/// Column names and data types of `name` in the current schema, in order
pub(crate) fn table_columns_sql(name: &str) -> String {
    format!(
        "SELECT column_name, data_type FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = '{}' \
         ORDER BY ordinal_position",
        escape_sql_string(name)
    )
}

/// SELECT reading every column of `name` as text
///
/// Booleans render as `True`/`False` whichever backend stores them.
pub(crate) fn select_as_text_sql(name: &str, columns: &[(String, String)]) -> String {
    let select_list = columns
        .iter()
        .map(|(column, data_type)| {
            let quoted = quote_ident(column);
            if data_type.eq_ignore_ascii_case("boolean") {
                format!(
                    "CASE WHEN {0} THEN 'True' WHEN NOT {0} THEN 'False' END AS {0}",
                    quoted
                )
            } else {
                format!("CAST({0} AS VARCHAR) AS {0}", quoted)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {}", select_list, quote_ident(name))
}

/// Statements that drop `name` and recreate it holding `table`
///
/// Column types are inferred from the data; the statements are meant to run
/// inside one transaction.
pub(crate) fn replace_table_statements(name: &str, table: &Table) -> DbResult<Vec<String>> {
    if table.columns().is_empty() {
        return Err(DbError::InvalidTable {
            table: name.to_string(),
            reason: "no columns".to_string(),
        });
    }

    let quoted_name = quote_ident(name);
    let types = table.infer_column_types();
    let column_defs = table
        .columns()
        .iter()
        .zip(&types)
        .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sql_name()))
        .collect::<Vec<_>>()
        .join(", ");
    let column_list = table
        .columns()
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut statements = vec![
        format!("DROP TABLE IF EXISTS {}", quoted_name),
        format!("CREATE TABLE {} ({})", quoted_name, column_defs),
    ];

    for chunk in table.rows().chunks(INSERT_BATCH_ROWS) {
        let values = chunk
            .iter()
            .map(|row| {
                let cells = row
                    .iter()
                    .map(|cell| sql_literal(cell.as_deref()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({})", cells)
            })
            .collect::<Vec<_>>()
            .join(", ");
        statements.push(format!(
            "INSERT INTO {} ({}) VALUES {}",
            quoted_name, column_list, values
        ));
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_statements_shape() {
        let mut table = Table::new(["colorId", "colorName"]);
        table.push_row(vec![Some("1".into()), Some("Blue".into())]);
        table.push_row(vec![Some("2".into()), None]);

        let statements = replace_table_statements("colors_dim", &table).unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], r#"DROP TABLE IF EXISTS "colors_dim""#);
        assert_eq!(
            statements[1],
            r#"CREATE TABLE "colors_dim" ("colorId" BIGINT, "colorName" TEXT)"#
        );
        assert_eq!(
            statements[2],
            r#"INSERT INTO "colors_dim" ("colorId", "colorName") VALUES ('1', 'Blue'), ('2', NULL)"#
        );
    }

    #[test]
    fn test_empty_table_has_no_insert() {
        let table = Table::new(["a"]);
        let statements = replace_table_statements("t", &table).unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_inserts_are_batched() {
        let mut table = Table::new(["n"]);
        for i in 0..(INSERT_BATCH_ROWS + 1) {
            table.push_row(vec![Some(i.to_string())]);
        }
        let statements = replace_table_statements("t", &table).unwrap();
        assert_eq!(statements.len(), 4);
    }

    #[test]
    fn test_select_as_text_renders_booleans() {
        let columns = vec![
            ("id".to_string(), "integer".to_string()),
            ("is_trans".to_string(), "boolean".to_string()),
        ];
        assert_eq!(
            select_as_text_sql("colors", &columns),
            r#"SELECT CAST("id" AS VARCHAR) AS "id", CASE WHEN "is_trans" THEN 'True' WHEN NOT "is_trans" THEN 'False' END AS "is_trans" FROM "colors""#
        );
    }

    #[test]
    fn test_catalog_queries_are_schema_scoped() {
        assert!(LIST_BASE_TABLES_SQL.contains("table_schema = current_schema()"));
        let sql = table_columns_sql("it's");
        assert!(sql.contains("table_schema = current_schema()"));
        assert!(sql.contains("table_name = 'it''s'"));
        assert!(relation_exists_sql("colors").contains("table_schema = current_schema()"));
    }

    #[test]
    fn test_table_without_columns_rejected() {
        let err = replace_table_statements("t", &Table::default()).unwrap_err();
        assert!(matches!(err, DbError::InvalidTable { .. }));
    }
}
