//! Relational backend adapter.
//!
//! One adapter type serves both relational stores; the variants differ only
//! in dialect, default table, and how the generic condition slots map onto
//! columns.

use std::sync::Arc;

use async_trait::async_trait;

use fedquery_core::{AdapterError, Backend, BackendAdapter, Intent, Operation, Record};

use crate::driver::{SqlDriver, SqlRow};
use crate::sql::{SlotColumns, SqlDialect, build_select};

/// Adapter for SQL stores.
pub struct RelationalAdapter {
    backend: Backend,
    dialect: SqlDialect,
    table: &'static str,
    slots: SlotColumns,
    driver: Arc<dyn SqlDriver>,
}

impl RelationalAdapter {
    /// Primary relational store: the users table.
    ///
    /// `subject` filters by username; `object` filters by role unless it
    /// merely names the table; an explicit `role` slot also filters by role.
    pub fn postgres(driver: Arc<dyn SqlDriver>) -> Self {
        Self {
            backend: Backend::Postgres,
            dialect: SqlDialect::Postgres,
            table: "users",
            slots: SlotColumns {
                subject: Some("username"),
                object: Some("role"),
                role: Some("role"),
                object_skip_value: Some("users"),
            },
            driver,
        }
    }

    /// Secondary relational store: the journals table.
    pub fn mysql(driver: Arc<dyn SqlDriver>) -> Self {
        Self {
            backend: Backend::Mysql,
            dialect: SqlDialect::Mysql,
            table: "journals",
            slots: SlotColumns { subject: Some("author"), object: Some("category"), role: None, object_skip_value: None },
            driver,
        }
    }

    fn normalize(rows: Vec<SqlRow>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(column, value)| (column, serde_json::Value::from(&value)))
                    .collect()
            })
            .collect()
    }
}

#[async_trait]
impl BackendAdapter for RelationalAdapter {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn resource(&self, intent: &Intent) -> String {
        intent.resource.clone().unwrap_or_else(|| self.table.to_string())
    }

    async fn execute(&self, intent: &Intent) -> Result<Vec<Record>, AdapterError> {
        if intent.operation != Operation::Select {
            return Err(AdapterError::UnsupportedOperation(intent.operation));
        }

        let table = self.resource(intent);
        let query = build_select(intent, self.dialect, &table, &self.slots)?;
        tracing::debug!(backend = %self.backend, sql = %query.sql, params = query.params.len(), "built SQL query");

        let rows = self
            .driver
            .run(&query.sql, &query.params)
            .await
            .map_err(|e| AdapterError::Driver(e.to_string()))?;

        Ok(Self::normalize(rows))
    }
}
