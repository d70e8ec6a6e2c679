// API client module: the table-client contract (`TableStore`) and its
// blocking HTTP implementation against the Coda REST API.
//
// Every operation is a single round trip. Nothing retries; a failure is
// returned to the caller as a `CodaError` and the command decides what to
// print.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CodaConfig;
use crate::error::{CodaError, Result};
use crate::model::{ApiError, Column, Identity, Page, Row, TableSummary, WriteAck};
use crate::query::QueryOptions;
use crate::row::{RowBatch, RowDeletion, RowUpdate};

/// Read and write operations on the tables of one doc.
///
/// `table`, `column` and `row_id` accept either the store's opaque id or the
/// display name.
pub trait TableStore {
    fn list_tables(&self) -> Result<Page<TableSummary>>;

    fn get_table(&self, table: &str, options: &QueryOptions) -> Result<TableSummary>;

    fn list_rows(&self, table: &str, options: &QueryOptions) -> Result<Page<Row>>;

    fn get_row(&self, table: &str, row_id: &str) -> Result<Row>;

    fn list_columns(&self, table: &str, options: &QueryOptions) -> Result<Page<Column>>;

    fn get_column(&self, table: &str, column: &str, options: &QueryOptions) -> Result<Column>;

    /// Insert rows. Each row must already carry its `_Hash` cell.
    fn add_rows(&self, table: &str, rows: &RowBatch) -> Result<WriteAck>;

    fn update_row(&self, table: &str, row_id: &str, patch: &RowUpdate) -> Result<WriteAck>;

    fn delete_rows(&self, table: &str, row_ids: &[String]) -> Result<WriteAck>;

    /// The user the configured token belongs to.
    fn whoami(&self) -> Result<Identity>;
}

/// Fetch every row of `table`, following page tokens until the store stops
/// returning one.
pub fn list_all_rows<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    options: &QueryOptions,
) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    let mut page = store.list_rows(table, options)?;
    loop {
        rows.extend(page.items);
        match page.next_page_token {
            Some(token) => {
                debug!(table, %token, "fetching next page");
                page = store.list_rows(table, &options.clone().page_token(&token))?;
            }
            None => break,
        }
    }
    Ok(rows)
}

/// Blocking HTTP client bound to a single doc.
#[derive(Clone)]
pub struct CodaClient {
    client: Client,
    api_root: Url,
    doc_url: Url,
}

impl CodaClient {
    pub fn new(config: &CodaConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(auth_headers(config.api_key.as_deref())?)
            .build()?;
        let api_root = Url::parse(config.api_root.trim_end_matches('/')).map_err(|e| {
            CodaError::Config {
                message: format!("invalid api root {:?}: {}", config.api_root, e),
            }
        })?;
        let mut doc_url = api_root.clone();
        push_segments(&mut doc_url, &["docs", config.doc_id.as_str()])?;
        Ok(CodaClient {
            client,
            api_root,
            doc_url,
        })
    }

    /// Build from `CODA_*` environment variables. See `CodaConfig::from_env`.
    pub fn from_env() -> Result<Self> {
        Self::new(&CodaConfig::from_env())
    }

    /// URL of a resource under the doc, with the read options appended
    /// when `options` is given. Values are form-encoded; page tokens may
    /// contain `+`, `/`, `=` or `&`.
    fn doc_endpoint(&self, segments: &[&str], options: Option<&QueryOptions>) -> Result<Url> {
        let mut url = self.doc_url.clone();
        push_segments(&mut url, segments)?;
        if let Some(options) = options {
            url.query_pairs_mut().extend_pairs(options.query_pairs());
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "sending request");
        self.client.request(method, url)
    }

    /// Send a request and decode the body as `T`, or as the store's error
    /// payload on a non-success status.
    fn send<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T> {
        let res = req.send()?;
        let status = res.status();
        let body = res.text()?;
        debug!(what, status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(CodaError::Remote {
                status: status.as_u16(),
                error: decode_error_body(status, &body),
            });
        }
        serde_json::from_str(&body).map_err(|source| CodaError::Decode {
            what: what.to_string(),
            source,
        })
    }
}

impl TableStore for CodaClient {
    fn list_tables(&self) -> Result<Page<TableSummary>> {
        let url = self.doc_endpoint(&["tables"], None)?;
        self.send("table list", self.request(Method::GET, url))
    }

    fn get_table(&self, table: &str, options: &QueryOptions) -> Result<TableSummary> {
        let url = self.doc_endpoint(&["tables", table], Some(options))?;
        self.send("table", self.request(Method::GET, url))
    }

    fn list_rows(&self, table: &str, options: &QueryOptions) -> Result<Page<Row>> {
        let url = self.doc_endpoint(&["tables", table, "rows"], Some(options))?;
        self.send("row list", self.request(Method::GET, url))
    }

    fn get_row(&self, table: &str, row_id: &str) -> Result<Row> {
        let url = self.doc_endpoint(&["tables", table, "rows", row_id], None)?;
        self.send("row", self.request(Method::GET, url))
    }

    fn list_columns(&self, table: &str, options: &QueryOptions) -> Result<Page<Column>> {
        let url = self.doc_endpoint(&["tables", table, "columns"], Some(options))?;
        self.send("column list", self.request(Method::GET, url))
    }

    fn get_column(&self, table: &str, column: &str, options: &QueryOptions) -> Result<Column> {
        let url = self.doc_endpoint(&["tables", table, "columns", column], Some(options))?;
        self.send("column", self.request(Method::GET, url))
    }

    fn add_rows(&self, table: &str, rows: &RowBatch) -> Result<WriteAck> {
        let url = self.doc_endpoint(&["tables", table, "rows"], None)?;
        self.send("insert acknowledgement", self.request(Method::POST, url).json(rows))
    }

    fn update_row(&self, table: &str, row_id: &str, patch: &RowUpdate) -> Result<WriteAck> {
        let url = self.doc_endpoint(&["tables", table, "rows", row_id], None)?;
        self.send("update acknowledgement", self.request(Method::PUT, url).json(patch))
    }

    fn delete_rows(&self, table: &str, row_ids: &[String]) -> Result<WriteAck> {
        let url = self.doc_endpoint(&["tables", table, "rows"], None)?;
        let body = RowDeletion {
            row_ids: row_ids.to_vec(),
        };
        self.send("delete acknowledgement", self.request(Method::DELETE, url).json(&body))
    }

    fn whoami(&self) -> Result<Identity> {
        let mut url = self.api_root.clone();
        push_segments(&mut url, &["whoami"])?;
        self.send("identity", self.request(Method::GET, url))
    }
}

/// Authorization header for the token, if there is one.
fn auth_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(t) = token {
        let mut value =
            HeaderValue::from_str(&format!("Bearer {}", t)).map_err(|e| CodaError::Config {
                message: format!("access key is not a valid header value: {}", e),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Append percent-encoded path segments; names like `Sign Types` contain
/// spaces.
fn push_segments(url: &mut Url, segments: &[&str]) -> Result<()> {
    url.path_segments_mut()
        .map_err(|_| CodaError::Config {
            message: "api root cannot be used as a base url".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

/// The store sends `{statusCode, statusMessage, message}`; anything else
/// (a proxy page, an empty body) is wrapped with the HTTP status instead.
fn decode_error_body(status: StatusCode, body: &str) -> ApiError {
    serde_json::from_str(body).unwrap_or_else(|_| ApiError {
        status_code: status.as_u16(),
        status_message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message: body.trim().to_string(),
    })
}
