//! A [DataClient] backed by a local SQLite database.
//!
//! The schema mirrors the hosted service so the console behaves the same against
//! either backend. This is what local development and the tests run against.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, params_from_iter, types::Value as SqlValue, types::ValueRef};
use serde_json::{Number, Value};

use crate::{
    Error,
    data_client::{Collection, DataClient, Row, SelectQuery},
    database_id::DatabaseId,
};

/// Columns stored as integers that the hosted service reports as booleans.
const BOOLEAN_COLUMNS: &[&str] = &["Approved"];

/// Talks to a SQLite database through a shared connection.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteClient {
    /// Wrap `connection`, creating the tables if they do not exist.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the schema could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::new(Connection::open(path)?)
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

/// Create the tables for budgets, categories and category listings.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS amount_badget (
            id INTEGER PRIMARY KEY,
            pwp_code TEXT NOT NULL,
            amountbadget REAL NOT NULL,
            createduser TEXT NOT NULL,
            createdate TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            remainingbalance REAL NOT NULL,
            \"Approved\" INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS category_listing (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            category_code TEXT NOT NULL REFERENCES category(code),
            parentname TEXT
        );",
    )
}

impl DataClient for SqliteClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, Error> {
        let connection = self.lock()?;
        select_rows(&connection, query).map_err(data_service_error)
    }

    async fn insert(&self, collection: Collection, record: Row) -> Result<(), Error> {
        let connection = self.lock()?;
        let columns = quoted_columns(&record)?;
        let placeholders = (1..=columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            collection.table_name(),
            columns.join(", ")
        );

        connection
            .execute(&sql, params_from_iter(record.values().map(to_sql_value)))
            .map_err(data_service_error)?;

        Ok(())
    }

    async fn update(&self, collection: Collection, id: DatabaseId, record: Row) -> Result<(), Error> {
        let connection = self.lock()?;
        let assignments = quoted_columns(&record)?
            .into_iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            collection.table_name(),
            record.len() + 1
        );
        let params = record
            .values()
            .map(to_sql_value)
            .chain(std::iter::once(SqlValue::Integer(id)));

        let rows_affected = connection
            .execute(&sql, params_from_iter(params))
            .map_err(data_service_error)?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingRecord);
        }

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: DatabaseId) -> Result<(), Error> {
        let connection = self.lock()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", collection.table_name());

        let rows_affected = connection
            .execute(&sql, [id])
            .map_err(data_service_error)?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingRecord);
        }

        Ok(())
    }
}

fn select_rows(connection: &Connection, query: &SelectQuery) -> Result<Vec<Row>, rusqlite::Error> {
    let columns = if query.columns.is_empty() {
        "*".to_owned()
    } else {
        query
            .columns
            .iter()
            .map(|column| quote(column))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut sql = format!("SELECT {columns} FROM {}", query.collection.table_name());
    let mut params = Vec::new();

    if let Some(filter) = &query.filter {
        sql.push_str(&format!(" WHERE {} = ?1", quote(filter.column)));
        params.push(to_sql_value(&filter.value));
    }

    if let Some(order) = query.order {
        let direction = if order.ascending { "ASC" } else { "DESC" };
        // Rows created in the same millisecond would otherwise come back in storage order.
        sql.push_str(&format!(
            " ORDER BY {} {direction}, id {direction}",
            quote(order.column)
        ));
    }

    let mut statement = connection.prepare(&sql)?;
    let column_names: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(str::to_owned)
        .collect();

    statement
        .query_map(params_from_iter(params), |row| {
            let mut record = Row::new();

            for (index, name) in column_names.iter().enumerate() {
                record.insert(name.clone(), to_json_value(name, row.get_ref(index)?));
            }

            Ok(record)
        })?
        .collect()
}

fn quote(column: &str) -> String {
    format!("\"{column}\"")
}

fn quoted_columns(record: &Row) -> Result<Vec<String>, Error> {
    record
        .keys()
        .map(|column| {
            if column.contains('"') {
                Err(Error::InvalidRecord(format!("invalid column name {column}")))
            } else {
                Ok(quote(column))
            }
        })
        .collect()
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(flag) => SqlValue::Integer(i64::from(*flag)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => SqlValue::Integer(integer),
            None => SqlValue::Real(number.as_f64().unwrap_or_default()),
        },
        Value::String(text) => SqlValue::Text(text.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn to_json_value(column: &str, value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(integer) if BOOLEAN_COLUMNS.contains(&column) => Value::Bool(integer != 0),
        ValueRef::Integer(integer) => Value::from(integer),
        ValueRef::Real(real) => Number::from_f64(real).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

/// SQLite stands in for the hosted service, so its failures are reported the same way.
fn data_service_error(error: rusqlite::Error) -> Error {
    tracing::error!("SQLite query failed: {error}");
    Error::DataService(error.to_string())
}
