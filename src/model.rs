// Response shapes returned by the store. Every payload is decoded into one of
// these at the boundary; field names follow the store's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One page of a list endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_link: Option<String>,
}

impl<T> Page<T> {
    pub fn single(items: Vec<T>) -> Self {
        Page {
            items,
            next_page_token: None,
            next_page_link: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub row_count: Option<u64>,
}

/// A row as the store returns it. With `useColumnNames=true`, `values` is
/// keyed by column name rather than column id.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub index: Option<u64>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl Row {
    /// Text of a cell, if present. Non-string values are rendered as JSON.
    pub fn value_text(&self, column: &str) -> Option<String> {
        self.values.get(column).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display: Option<bool>,
    #[serde(default)]
    pub calculated: Option<bool>,
    #[serde(default)]
    pub format: Option<Value>,
    #[serde(default)]
    pub href: Option<String>,
}

/// The user behind the access token.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub login_id: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub scoped: Option<bool>,
    #[serde(default)]
    pub href: Option<String>,
}

/// Acknowledgement of a mutation. The store queues writes and only echoes
/// the ids it touched; which id field is set depends on the endpoint.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WriteAck {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_row_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_ids: Vec<String>,
}

/// Structured error body sent by the store on 4xx/5xx.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status_code: u16,
    pub status_message: String,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} {}", self.status_code, self.status_message)
        } else {
            write!(
                f,
                "{} {}: {}",
                self.status_code, self.status_message, self.message
            )
        }
    }
}
