//! The client for the data service that stores budgets, categories and category listings.
//!
//! Records travel between the console and the data service as JSON objects keyed by
//! column name ([Row]). Typed records are decoded with [decode_rows] and encoded with
//! [encode_record], so the [DataClient] implementations never need to know about the
//! domain types.

mod rest;
mod sqlite;

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{Error, database_id::DatabaseId};

pub use rest::RestClient;
pub use sqlite::SqliteClient;

/// A single record as returned by the data service.
pub type Row = Map<String, Value>;

/// The collections (tables) the console reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Promotional budgets ("badgets").
    Budgets,
    /// The read-only categories that listings belong to.
    Categories,
    /// The listings filed under a category.
    CategoryListings,
}

impl Collection {
    /// The name of the table backing the collection.
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::Budgets => "amount_badget",
            Collection::Categories => "category",
            Collection::CategoryListings => "category_listing",
        }
    }
}

/// An equality filter on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

/// The sort key for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// A read query against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub collection: Collection,
    /// The columns to fetch. An empty slice fetches every column.
    pub columns: &'static [&'static str],
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    /// Select every column of every row in `collection`.
    pub fn all(collection: Collection) -> Self {
        Self {
            collection,
            columns: &[],
            filter: None,
            order: None,
        }
    }

    /// Only fetch `columns`.
    pub fn columns(self, columns: &'static [&'static str]) -> Self {
        Self { columns, ..self }
    }

    /// Only fetch rows where `column` equals `value`.
    pub fn eq(self, column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            filter: Some(Filter {
                column,
                value: value.into(),
            }),
            ..self
        }
    }

    /// Sort the rows by `column`.
    pub fn order_by(self, column: &'static str, ascending: bool) -> Self {
        Self {
            order: Some(Order { column, ascending }),
            ..self
        }
    }
}

/// The operations the console needs from the data service.
///
/// Updates are full-record updates: `record` holds every mutable column.
/// An update or delete that matches no row fails with
/// [Error::UpdateMissingRecord] or [Error::DeleteMissingRecord].
pub trait DataClient: Send + Sync {
    /// Fetch the rows matching `query`.
    fn select(&self, query: &SelectQuery) -> impl Future<Output = Result<Vec<Row>, Error>> + Send;

    /// Insert `record` into `collection`. The service assigns the ID and creation time.
    fn insert(
        &self,
        collection: Collection,
        record: Row,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Overwrite the columns in `record` for the row with `id`.
    fn update(
        &self,
        collection: Collection,
        id: DatabaseId,
        record: Row,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Delete the row with `id`.
    fn delete(
        &self,
        collection: Collection,
        id: DatabaseId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// The data client selected at start-up.
#[derive(Debug, Clone)]
pub enum Backend {
    /// A hosted PostgREST service.
    Rest(RestClient),
    /// A local SQLite database.
    Sqlite(SqliteClient),
}

impl DataClient for Backend {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, Error> {
        match self {
            Backend::Rest(client) => client.select(query).await,
            Backend::Sqlite(client) => client.select(query).await,
        }
    }

    async fn insert(&self, collection: Collection, record: Row) -> Result<(), Error> {
        match self {
            Backend::Rest(client) => client.insert(collection, record).await,
            Backend::Sqlite(client) => client.insert(collection, record).await,
        }
    }

    async fn update(&self, collection: Collection, id: DatabaseId, record: Row) -> Result<(), Error> {
        match self {
            Backend::Rest(client) => client.update(collection, id, record).await,
            Backend::Sqlite(client) => client.update(collection, id, record).await,
        }
    }

    async fn delete(&self, collection: Collection, id: DatabaseId) -> Result<(), Error> {
        match self {
            Backend::Rest(client) => client.delete(collection, id).await,
            Backend::Sqlite(client) => client.delete(collection, id).await,
        }
    }
}

/// Decode rows from the data service into typed records.
///
/// # Errors
/// Returns [Error::InvalidRecord] if a row is missing a column or has a column of the
/// wrong type.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, Error> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row))
                .map_err(|error| Error::InvalidRecord(error.to_string()))
        })
        .collect()
}

/// Encode a typed payload as a row for an insert or update.
pub fn encode_record<T: Serialize>(record: &T) -> Result<Row, Error> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(Error::JSONSerializationError(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(error) => Err(Error::JSONSerializationError(error.to_string())),
    }
}
