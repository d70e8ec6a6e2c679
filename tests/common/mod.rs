//! Shared fixtures: an in-memory `TableStore` and a scripted `Chooser`.

#![allow(dead_code)]

use std::cell::{Cell as StdCell, RefCell};
use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use coda_cli::api::TableStore;
use coda_cli::error::{CodaError, Result};
use coda_cli::model::{ApiError, Column, Identity, Page, Row, TableSummary, WriteAck};
use coda_cli::query::QueryOptions;
use coda_cli::resolver::Chooser;
use coda_cli::row::{RowBatch, RowUpdate};

/// A write the store received, in call order.
#[derive(Debug, Clone)]
pub enum Write {
    Add { table: String, rows: RowBatch },
    Update { table: String, row_id: String, patch: RowUpdate },
    Delete { table: String, row_ids: Vec<String> },
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RefCell<BTreeMap<String, Vec<Row>>>,
    /// Rows per page for `list_rows`; everything in one page when `None`.
    page_size: Option<usize>,
    pub writes: RefCell<Vec<Write>>,
    pub list_calls: RefCell<Vec<(String, QueryOptions)>>,
    next_id: StdCell<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        MemoryStore {
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with_table(self, table: &str, rows: Vec<Row>) -> Self {
        self.tables.borrow_mut().insert(table.to_string(), rows);
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.borrow().get(table).cloned().unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.borrow().clone()
    }

    fn request_id(&self) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("req-{}", id)
    }

    fn not_found(what: &str) -> CodaError {
        CodaError::Remote {
            status: 404,
            error: ApiError {
                status_code: 404,
                status_message: "Not Found".into(),
                message: format!("Could not find {}", what),
            },
        }
    }
}

/// A row with the given id, display name and values.
pub fn row(id: &str, name: &str, values: Value) -> Row {
    let values: Map<String, Value> = match values {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Row {
        id: id.to_string(),
        name: name.to_string(),
        index: None,
        href: None,
        values,
    }
}

/// A `Buildings` row whose display name and `Entity` are both `name`.
pub fn building(id: &str, name: &str) -> Row {
    row(id, name, json!({ "Entity": name, "_Hash": format!("h-{}", id) }))
}

impl TableStore for MemoryStore {
    fn list_tables(&self) -> Result<Page<TableSummary>> {
        let items = self
            .tables
            .borrow()
            .iter()
            .map(|(name, rows)| TableSummary {
                id: format!("grid-{}", name.to_lowercase()),
                name: name.clone(),
                table_type: Some("table".into()),
                href: None,
                row_count: Some(rows.len() as u64),
            })
            .collect();
        Ok(Page::single(items))
    }

    fn get_table(&self, table: &str, _options: &QueryOptions) -> Result<TableSummary> {
        self.list_tables()?
            .items
            .into_iter()
            .find(|t| t.name == table)
            .ok_or_else(|| Self::not_found("table"))
    }

    fn list_rows(&self, table: &str, options: &QueryOptions) -> Result<Page<Row>> {
        self.list_calls
            .borrow_mut()
            .push((table.to_string(), options.clone()));
        let rows = self
            .tables
            .borrow()
            .get(table)
            .cloned()
            .ok_or_else(|| Self::not_found("table"))?;

        let start: usize = options
            .get("pageToken")
            .and_then(|t| t.parse().ok())
            .unwrap_or(0);
        let mut size = self.page_size.unwrap_or(rows.len());
        if let Some(limit) = options.get("limit").and_then(|l| l.parse().ok()) {
            size = size.min(limit);
        }
        let end = (start + size).min(rows.len());
        let next_page_token = if end < rows.len() && options.get("limit").is_none() {
            Some(end.to_string())
        } else {
            None
        };
        Ok(Page {
            items: rows[start..end].to_vec(),
            next_page_token,
            next_page_link: None,
        })
    }

    fn get_row(&self, table: &str, row_id: &str) -> Result<Row> {
        self.rows(table)
            .into_iter()
            .find(|r| r.id == row_id || r.name == row_id)
            .ok_or_else(|| Self::not_found("row"))
    }

    fn list_columns(&self, table: &str, _options: &QueryOptions) -> Result<Page<Column>> {
        let rows = self.rows(table);
        let names: Vec<String> = rows
            .first()
            .map(|r| r.values.keys().cloned().collect())
            .unwrap_or_default();
        Ok(Page::single(
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| column(&format!("c-{}", i), &name))
                .collect(),
        ))
    }

    fn get_column(&self, table: &str, column_name: &str, options: &QueryOptions) -> Result<Column> {
        self.list_columns(table, options)?
            .items
            .into_iter()
            .find(|c| c.name == column_name)
            .ok_or_else(|| Self::not_found("column"))
    }

    fn add_rows(&self, table: &str, rows: &RowBatch) -> Result<WriteAck> {
        self.writes.borrow_mut().push(Write::Add {
            table: table.to_string(),
            rows: rows.clone(),
        });
        let mut tables = self.tables.borrow_mut();
        let existing = tables.entry(table.to_string()).or_default();
        let mut added = Vec::new();
        for new_row in &rows.rows {
            let id = format!("i-{}-{}", table, existing.len() + 1);
            let values: Map<String, Value> = new_row
                .cells
                .iter()
                .map(|c| (c.column.clone(), c.value.clone()))
                .collect();
            let name = new_row
                .cells
                .first()
                .and_then(|c| c.value.as_str())
                .unwrap_or_default()
                .to_string();
            existing.push(row(&id, &name, Value::Object(values)));
            added.push(id);
        }
        Ok(WriteAck {
            request_id: self.request_id(),
            added_row_ids: added,
            id: None,
            row_ids: Vec::new(),
        })
    }

    fn update_row(&self, table: &str, row_id: &str, patch: &RowUpdate) -> Result<WriteAck> {
        self.writes.borrow_mut().push(Write::Update {
            table: table.to_string(),
            row_id: row_id.to_string(),
            patch: patch.clone(),
        });
        let mut tables = self.tables.borrow_mut();
        let target = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| r.id == row_id))
            .ok_or_else(|| Self::not_found("row"))?;
        for cell in &patch.row.cells {
            target.values.insert(cell.column.clone(), cell.value.clone());
        }
        Ok(WriteAck {
            request_id: self.request_id(),
            added_row_ids: Vec::new(),
            id: Some(row_id.to_string()),
            row_ids: Vec::new(),
        })
    }

    fn delete_rows(&self, table: &str, row_ids: &[String]) -> Result<WriteAck> {
        self.writes.borrow_mut().push(Write::Delete {
            table: table.to_string(),
            row_ids: row_ids.to_vec(),
        });
        if let Some(rows) = self.tables.borrow_mut().get_mut(table) {
            rows.retain(|r| !row_ids.contains(&r.id));
        }
        Ok(WriteAck {
            request_id: self.request_id(),
            added_row_ids: Vec::new(),
            id: None,
            row_ids: row_ids.to_vec(),
        })
    }

    fn whoami(&self) -> Result<Identity> {
        Ok(Identity {
            name: "Test User".into(),
            login_id: "test@example.com".into(),
            token_name: Some("cli".into()),
            scoped: Some(false),
            href: None,
        })
    }
}

pub fn column(id: &str, name: &str) -> Column {
    Column {
        id: id.to_string(),
        name: name.to_string(),
        display: None,
        calculated: None,
        format: None,
        href: None,
    }
}

/// Answers prompts from a fixed list of indices and records what it was shown.
#[derive(Default)]
pub struct ScriptedChooser {
    answers: Vec<usize>,
    pub prompts: Vec<(String, Vec<String>)>,
}

impl ScriptedChooser {
    pub fn answering(answers: &[usize]) -> Self {
        ScriptedChooser {
            answers: answers.to_vec(),
            prompts: Vec::new(),
        }
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize> {
        self.prompts.push((prompt.to_string(), options.to_vec()));
        if self.answers.is_empty() {
            panic!("unexpected prompt: {}", prompt);
        }
        Ok(self.answers.remove(0))
    }
}
