#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use crate::{
    AppState, Error,
    data_client::{Backend, Collection, DataClient, Row, SelectQuery, SqliteClient},
    database_id::DatabaseId,
    pagination::PaginationConfig,
};

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_alert, assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::assert_hx_redirect;

/// A data client backed by a fresh in-memory database.
pub(crate) fn test_client() -> Backend {
    Backend::Sqlite(SqliteClient::open_in_memory().expect("Could not open in-memory database"))
}

/// App state backed by a fresh in-memory database.
pub(crate) fn test_state() -> AppState {
    AppState::new(test_client(), PaginationConfig::default())
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        other => panic!("want a JSON object, got {other}"),
    }
}

/// Insert an unapproved badget of 1000.00 with 500.00 remaining.
pub(crate) async fn insert_budget(client: &Backend, code: &str, creator: &str, created_at: &str) {
    client
        .insert(
            Collection::Budgets,
            row(json!({
                "pwp_code": code,
                "amountbadget": 1000.0,
                "createduser": creator,
                "createdate": created_at,
                "remainingbalance": 500.0,
                "Approved": false,
            })),
        )
        .await
        .expect("Could not insert badget");
}

pub(crate) async fn insert_category(client: &Backend, name: &str, code: &str) {
    client
        .insert(
            Collection::Categories,
            row(json!({ "name": name, "code": code })),
        )
        .await
        .expect("Could not insert category");
}

/// Insert a listing without a description under the category `category_code`.
pub(crate) async fn insert_listing(client: &Backend, name: &str, category_code: &str) {
    client
        .insert(
            Collection::CategoryListings,
            row(json!({
                "name": name,
                "description": null,
                "category_code": category_code,
            })),
        )
        .await
        .expect("Could not insert listing");
}

/// Drop `table` so that queries against it fail.
pub(crate) fn drop_table(client: &Backend, table: &str) {
    let Backend::Sqlite(client) = client else {
        panic!("want a SQLite client");
    };

    client
        .lock()
        .expect("Could not lock database")
        .execute(&format!("DROP TABLE \"{table}\""), ())
        .expect("Could not drop table");
}

/// Form fields as posted by the browser.
pub(crate) fn form_fields(fields: &[(&str, &str)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// A data client that counts the writes it passes on.
pub(crate) struct RecordingClient {
    inner: Backend,
    mutations: AtomicUsize,
}

impl RecordingClient {
    pub(crate) fn new(inner: Backend) -> Self {
        Self {
            inner,
            mutations: AtomicUsize::new(0),
        }
    }

    /// The number of inserts, updates and deletes sent so far.
    pub(crate) fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

impl DataClient for RecordingClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, Error> {
        self.inner.select(query).await
    }

    async fn insert(&self, collection: Collection, record: Row) -> Result<(), Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(collection, record).await
    }

    async fn update(&self, collection: Collection, id: DatabaseId, record: Row) -> Result<(), Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.update(collection, id, record).await
    }

    async fn delete(&self, collection: Collection, id: DatabaseId) -> Result<(), Error> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(collection, id).await
    }
}
