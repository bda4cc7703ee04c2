/// Record transport: one HTTP request against one table resource
///
/// Builds the target address from the configured base plus table path,
/// attaches the static bearer credential, exchanges one JSON envelope, and
/// classifies every outcome into the [`StoreError`] taxonomy. No retries, no
/// caching; recovery is the caller's decision.
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::records::{RawRecord, RecordPage};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::{json, Value};
use tracing::debug;

/// Table-level operations the resolver and aggregation layers are written
/// against
///
/// Implementations exchange raw (JSON-valued) records; typed decoding happens
/// one layer up. The production implementation is [`RestTransport`];
/// integration tests substitute an in-memory fake.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    /// List rows of a table, optionally narrowed by a filter formula
    async fn list(&self, table: &str, filter: Option<&Filter>) -> StoreResult<Vec<RawRecord>>;

    /// Fetch a single row by id
    async fn fetch(&self, table: &str, id: &str) -> StoreResult<RawRecord>;

    /// Create one row from a field map
    async fn create(&self, table: &str, fields: Value) -> StoreResult<RawRecord>;

    /// Partially update one row
    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<RawRecord>;

    /// Delete one row
    async fn delete(&self, table: &str, id: &str) -> StoreResult<()>;
}

/// HTTP implementation of [`RecordTransport`]
pub struct RestTransport {
    http_client: Client,
    base_url: String,
    api_token: String,
}

impl RestTransport {
    /// Create a transport from validated configuration
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        // Normalize once so path segments can be appended blindly
        let base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    /// Build the address for a table resource, an optional row id, and an
    /// optional encoded filter parameter
    fn table_url(&self, table: &str, id: Option<&str>, filter: Option<&Filter>) -> StoreResult<Url> {
        let mut address = format!("{}/{}", self.base_url, table);
        if let Some(id) = id {
            address.push('/');
            address.push_str(id);
        }
        if let Some(filter) = filter {
            address.push_str("?filterByFormula=");
            address.push_str(&filter.encoded());
        }

        Url::parse(&address).map_err(|e| StoreError::InvalidAddress(format!("{}: {}", address, e)))
    }

    /// Issue one request and classify the outcome by status code
    async fn execute(
        &self,
        method: Method,
        url: Url,
        fields: Option<Value>,
    ) -> StoreResult<reqwest::Response> {
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method, url)
            .bearer_auth(&self.api_token);
        if let Some(fields) = fields {
            request = request.json(&json!({ "fields": fields }));
        }

        let response = request.send().await.map_err(classify_transport_fault)?;

        match classify_status(response.status().as_u16()) {
            None => Ok(response),
            Some(err) => Err(err),
        }
    }
}

#[async_trait]
impl RecordTransport for RestTransport {
    async fn list(&self, table: &str, filter: Option<&Filter>) -> StoreResult<Vec<RawRecord>> {
        let url = self.table_url(table, None, filter)?;
        let response = self.execute(Method::GET, url, None).await?;
        let page: RecordPage<Value> = response.json().await.map_err(decoding_fault)?;
        Ok(page.records)
    }

    async fn fetch(&self, table: &str, id: &str) -> StoreResult<RawRecord> {
        let url = self.table_url(table, Some(id), None)?;
        let response = self.execute(Method::GET, url, None).await?;
        response.json().await.map_err(decoding_fault)
    }

    async fn create(&self, table: &str, fields: Value) -> StoreResult<RawRecord> {
        let url = self.table_url(table, None, None)?;
        let response = self.execute(Method::POST, url, Some(fields)).await?;
        response.json().await.map_err(decoding_fault)
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> StoreResult<RawRecord> {
        let url = self.table_url(table, Some(id), None)?;
        let response = self.execute(Method::PATCH, url, Some(fields)).await?;
        response.json().await.map_err(decoding_fault)
    }

    async fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let url = self.table_url(table, Some(id), None)?;
        self.execute(Method::DELETE, url, None).await?;
        Ok(())
    }
}

/// Classify a status code; `None` means success
///
/// Total over the status range: 2xx succeeds, 401 and 5xx get dedicated
/// variants, everything else keeps its code.
fn classify_status(code: u16) -> Option<StoreError> {
    match code {
        200..=299 => None,
        401 => Some(StoreError::Unauthorized),
        500..=599 => Some(StoreError::ServerUnavailable),
        other => Some(StoreError::RequestFailed(other)),
    }
}

/// Classify a client-side fault that prevented a response
fn classify_transport_fault(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::NetworkUnavailable(err.to_string())
    } else if err.is_builder() {
        StoreError::InvalidAddress(err.to_string())
    } else {
        StoreError::Unknown(err.to_string())
    }
}

/// A 2xx response whose body did not match the expected envelope shape
fn decoding_fault(err: reqwest::Error) -> StoreError {
    StoreError::DecodingError(err.to_string())
}
