//! A [DataClient] for a hosted PostgREST service, e.g. a Supabase project.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error,
    data_client::{Collection, DataClient, Row, SelectQuery},
    database_id::DatabaseId,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Talks to the REST API of a hosted PostgREST service.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Create a client for the service at `base_url` (e.g. `https://xyz.supabase.co`)
    /// that authenticates with `api_key`.
    ///
    /// # Errors
    /// Returns [Error::DataService] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| Error::DataService(format!("could not build HTTP client: {error}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table_name())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl DataClient for RestClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, Error> {
        let url = format!(
            "{}?{}",
            self.table_url(query.collection),
            select_query_string(query)?
        );

        send(self.request(Method::GET, url))
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(|error| Error::InvalidRecord(error.to_string()))
    }

    async fn insert(&self, collection: Collection, record: Row) -> Result<(), Error> {
        let request = self
            .request(Method::POST, self.table_url(collection))
            .header("Prefer", "return=representation")
            .json(&record);

        send(request).await?;

        Ok(())
    }

    async fn update(&self, collection: Collection, id: DatabaseId, record: Row) -> Result<(), Error> {
        let url = format!("{}?id=eq.{id}", self.table_url(collection));
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&record);

        let updated = send(request)
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(|error| Error::InvalidRecord(error.to_string()))?;

        if updated.is_empty() {
            return Err(Error::UpdateMissingRecord);
        }

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: DatabaseId) -> Result<(), Error> {
        let url = format!("{}?id=eq.{id}", self.table_url(collection));
        let request = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");

        let deleted = send(request)
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(|error| Error::InvalidRecord(error.to_string()))?;

        if deleted.is_empty() {
            return Err(Error::DeleteMissingRecord);
        }

        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, Error> {
    let response = request.send().await.map_err(|error| {
        tracing::error!("could not reach the data service: {error}");
        Error::DataService(error.to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!("the data service responded with {status}: {body}");

    Err(Error::DataService(error_message(status, &body)))
}

/// Build the PostgREST query string for `query`.
fn select_query_string(query: &SelectQuery) -> Result<String, Error> {
    let columns = if query.columns.is_empty() {
        "*".to_owned()
    } else {
        query.columns.join(",")
    };

    let mut params = vec![("select", columns)];

    if let Some(filter) = &query.filter {
        let value = match &filter.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        params.push((filter.column, format!("eq.{value}")));
    }

    if let Some(order) = query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order", format!("{}.{direction}", order.column)));
    }

    serde_urlencoded::to_string(&params).map_err(|error| Error::DataService(error.to_string()))
}

/// Pull the human readable message out of an error response.
///
/// PostgREST errors look like `{"code": "...", "message": "...", "details": ...}`.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| format!("the data service responded with {status}"))
}
