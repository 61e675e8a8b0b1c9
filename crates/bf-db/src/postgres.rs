//! PostgreSQL database backend implementation
//!
//! Uses the simple query protocol so every value arrives in its text form,
//! whatever the column type.

use crate::error::{DbError, DbResult};
use crate::sql::{
    relation_exists_sql, replace_table_statements, select_as_text_sql, table_columns_sql,
    LIST_BASE_TABLES_SQL,
};
use crate::traits::Database;
use async_trait::async_trait;
use bf_core::{DatabaseConfig, Table};
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// PostgreSQL database backend
///
/// Dropping the backend drops the client, which closes the connection task.
pub struct PostgresBackend {
    client: Client,
}

impl PostgresBackend {
    /// Connect using the five connection options of a `DatabaseConfig`
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let mut pg = tokio_postgres::Config::new();
        if let Some(user) = &config.user {
            pg.user(user);
        }
        if let Some(password) = &config.password {
            pg.password(password);
        }
        if let Some(host) = &config.host {
            pg.host(host);
        }
        if let Some(port) = config.port {
            pg.port(port);
        }
        if let Some(name) = &config.name {
            pg.dbname(name);
        }

        let (client, connection) = pg
            .connect(NoTls)
            .await
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", config.redacted(), e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("Database connection error: {}", e);
            }
        });

        log::info!("Connected to {}", config.redacted());
        Ok(Self { client })
    }

    /// Run a simple query and collect its result set as text
    async fn simple_table(&self, sql: &str) -> DbResult<Table> {
        let messages = self.client.simple_query(sql).await?;
        let mut table: Option<Table> = None;

        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    table.get_or_insert_with(|| Table::new(columns.iter().map(|c| c.name())));
                }
                SimpleQueryMessage::Row(row) => {
                    let table = table
                        .get_or_insert_with(|| Table::new(row.columns().iter().map(|c| c.name())));
                    let cells = (0..row.len())
                        .map(|i| row.get(i).map(str::to_string))
                        .collect();
                    table.push_row(cells);
                }
                _ => {}
            }
        }

        Ok(table.unwrap_or_default())
    }
}

#[async_trait]
impl Database for PostgresBackend {
    async fn list_base_tables(&self) -> DbResult<Vec<String>> {
        let table = self.simple_table(LIST_BASE_TABLES_SQL).await?;
        Ok(table
            .column_values(0)
            .flatten()
            .map(str::to_string)
            .collect())
    }

    async fn read_table(&self, name: &str) -> DbResult<Table> {
        let catalog = self.simple_table(&table_columns_sql(name)).await?;
        let columns: Vec<(String, String)> = catalog
            .rows()
            .iter()
            .filter_map(|row| match (row.first(), row.get(1)) {
                (Some(Some(column)), Some(Some(data_type))) => {
                    Some((column.clone(), data_type.clone()))
                }
                _ => None,
            })
            .collect();
        if columns.is_empty() {
            return Err(DbError::TableNotFound(name.to_string()));
        }

        let table = self
            .simple_table(&select_as_text_sql(name, &columns))
            .await?;
        if table.columns().is_empty() {
            // no rows and no row description: keep the catalog's header
            return Ok(Table::new(columns.into_iter().map(|(column, _)| column)));
        }
        Ok(table)
    }

    async fn replace_table(&self, name: &str, table: &Table) -> DbResult<()> {
        let statements = replace_table_statements(name, table)?;
        self.client.batch_execute("BEGIN").await?;
        for statement in &statements {
            if let Err(e) = self.client.batch_execute(statement).await {
                let _ = self.client.batch_execute("ROLLBACK").await;
                return Err(e.into());
            }
        }
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let table = self.simple_table(&relation_exists_sql(name)).await?;
        let count = table
            .column_values(0)
            .next()
            .flatten()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        Ok(count > 0)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "postgres"
    }
}
