// Request bodies for row writes.
//
// Every row built here carries exactly one `_Hash` cell holding a fresh
// UUID v4. The hash is the stable key other tools use to find a row again,
// independent of the store's own row id.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Column holding the client-generated row identifier.
pub const HASH_COLUMN: &str = "_Hash";

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Cell {
    pub column: String,
    pub value: Value,
}

impl Cell {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Cell {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewRow {
    pub cells: Vec<Cell>,
}

impl NewRow {
    /// Build a row from `cells` and append a generated `_Hash`. A `_Hash`
    /// cell supplied by the caller is dropped in favour of the new one.
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut cells: Vec<Cell> = cells
            .into_iter()
            .filter(|c| c.column != HASH_COLUMN)
            .collect();
        cells.push(Cell::new(HASH_COLUMN, new_hash()));
        NewRow { cells }
    }

    pub fn hash(&self) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.column == HASH_COLUMN)
            .and_then(|c| c.value.as_str())
    }
}

/// Body of `POST /tables/{table}/rows`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RowBatch {
    pub rows: Vec<NewRow>,
}

impl RowBatch {
    pub fn new(rows: Vec<NewRow>) -> Self {
        RowBatch { rows }
    }

    pub fn single(row: NewRow) -> Self {
        RowBatch { rows: vec![row] }
    }
}

/// Body of `PUT /tables/{table}/rows/{row}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RowUpdate {
    pub row: NewRow,
}

impl RowUpdate {
    pub fn new(cells: Vec<Cell>) -> Self {
        RowUpdate {
            row: NewRow::new(cells),
        }
    }

    /// An update that only assigns a fresh `_Hash`.
    pub fn fresh_hash() -> Self {
        RowUpdate::new(Vec::new())
    }
}

/// Body of `DELETE /tables/{table}/rows`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowDeletion {
    pub row_ids: Vec<String>,
}

pub fn new_hash() -> String {
    Uuid::new_v4().to_string()
}

/// Uppercase the first character of a table or column name, so `projects`
/// addresses the `Projects` table.
pub fn normalize_table_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
