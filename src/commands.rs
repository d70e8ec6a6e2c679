// Composite operations behind the CLI verbs.
//
// Each function is generic over `TableStore` so it runs unchanged against
// the HTTP client or an in-memory store. Output formatting is left to the
// binary; these return what was fetched or written.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{list_all_rows, TableStore};
use crate::error::{CodaError, Result};
use crate::model::{Column, Identity, Page, WriteAck};
use crate::query::QueryOptions;
use crate::resolver::{Chooser, Prompts, Resolver};
use crate::row::{normalize_table_name, Cell, NewRow, RowBatch, RowUpdate, HASH_COLUMN};

pub const ENTITIES_TABLE: &str = "Entities";
pub const BUILDINGS_TABLE: &str = "Buildings";
pub const PROJECTS_TABLE: &str = "Projects";

/// Tables swept by `fill-hashes` when none are given.
pub const DEFAULT_HASH_TABLES: [&str; 6] = [
    "Buildings",
    "Projects",
    "Jobs",
    "Signs",
    "Sign Types",
    "Layers",
];

/// Display names of the rows in `table`.
pub fn list_row_names<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    limit: Option<u32>,
) -> Result<Vec<String>> {
    let options = QueryOptions::new().with_limit(limit);
    let page = store.list_rows(&normalize_table_name(table), &options)?;
    Ok(page.items.into_iter().map(|row| row.name).collect())
}

pub fn list_table_names<S: TableStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let page = store.list_tables()?;
    Ok(page.items.into_iter().map(|table| table.name).collect())
}

pub fn list_columns<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    limit: Option<u32>,
) -> Result<Page<Column>> {
    let options = QueryOptions::new().with_limit(limit);
    store.list_columns(&normalize_table_name(table), &options)
}

/// `Name` of every entity. Entities without a name print as blank lines.
pub fn list_entity_names<S: TableStore + ?Sized>(
    store: &S,
    limit: Option<u32>,
) -> Result<Vec<String>> {
    let options = QueryOptions::new().with_limit(limit);
    let page = store.list_rows(ENTITIES_TABLE, &options)?;
    Ok(page
        .items
        .iter()
        .map(|row| row.value_text("Name").unwrap_or_default())
        .collect())
}

pub fn create_entity<S: TableStore + ?Sized>(
    store: &S,
    name: &str,
    kind: Option<&str>,
) -> Result<WriteAck> {
    let mut cells = vec![Cell::new("Name", name)];
    if let Some(kind) = kind {
        cells.push(Cell::new("Type", kind));
    }
    store.add_rows(ENTITIES_TABLE, &RowBatch::single(NewRow::new(cells)))
}

#[derive(Serialize, Debug, Clone)]
pub struct BuildingCreated {
    pub entity: WriteAck,
    pub building: WriteAck,
}

/// Add the building's entity row, then the building row pointing at it.
/// The two writes are not atomic: if the second fails the entity stays.
pub fn create_building<S: TableStore + ?Sized>(store: &S, name: &str) -> Result<BuildingCreated> {
    let entity = store.add_rows(
        ENTITIES_TABLE,
        &RowBatch::single(NewRow::new(vec![
            Cell::new("Name", name),
            Cell::new("Type", "Building"),
        ])),
    )?;
    debug!(name, request_id = %entity.request_id, "entity queued");
    let building = store.add_rows(
        BUILDINGS_TABLE,
        &RowBatch::single(NewRow::new(vec![Cell::new("Entity", name)])),
    )?;
    Ok(BuildingCreated { entity, building })
}

#[derive(Serialize, Debug, Clone)]
pub struct ProjectCreated {
    pub building: String,
    pub ack: WriteAck,
}

/// Add a project under the building `building` resolves to. A missing,
/// unmatched or ambiguous building name is settled through `chooser`.
pub fn create_project<S, C>(
    store: &S,
    title: &str,
    building: Option<&str>,
    chooser: &mut C,
) -> Result<ProjectCreated>
where
    S: TableStore + ?Sized,
    C: Chooser + ?Sized,
{
    let buildings = list_all_rows(store, BUILDINGS_TABLE, &QueryOptions::new())?;
    let resolver = Resolver::new(BUILDINGS_TABLE, "Entity", Prompts::buildings());
    let building = resolver.resolve(&buildings, building, chooser)?;
    info!(title, building = %building, "creating project");
    let ack = store.add_rows(
        PROJECTS_TABLE,
        &RowBatch::single(NewRow::new(vec![
            Cell::new("Title", title),
            Cell::new("Building", building.as_str()),
        ])),
    )?;
    Ok(ProjectCreated { building, ack })
}

pub fn get_column<S: TableStore + ?Sized>(store: &S, table: &str, column: &str) -> Result<Column> {
    store.get_column(
        &normalize_table_name(table),
        &normalize_table_name(column),
        &QueryOptions::new(),
    )
}

/// Outcome of sweeping one table. `updated` counts the rows written before
/// `error`, if the sweep stopped early.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BackfillReport {
    pub table: String,
    pub updated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Give every row whose `_Hash` is an empty string a new hash, one table and
/// one row at a time. With no `tables`, the default list is swept.
///
/// A failing table does not stop the sweep: its report carries the partial
/// count and the error, and the remaining tables are still visited. Rows that
/// have no `_Hash` cell at all are left untouched.
pub fn fill_hashes<S: TableStore + ?Sized>(store: &S, tables: &[String]) -> Vec<BackfillReport> {
    let tables: Vec<String> = if tables.is_empty() {
        DEFAULT_HASH_TABLES.iter().map(|t| t.to_string()).collect()
    } else {
        tables.iter().map(|t| normalize_table_name(t)).collect()
    };

    tables
        .into_iter()
        .map(|table| {
            let mut updated = 0;
            let error = fill_table_hashes(store, &table, &mut updated)
                .err()
                .map(|e| {
                    warn!(table = %table, updated, error = %e, "backfill stopped");
                    e.to_string()
                });
            info!(table = %table, updated, "backfill finished");
            BackfillReport {
                table,
                updated,
                error,
            }
        })
        .collect()
}

fn fill_table_hashes<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    updated: &mut usize,
) -> Result<()> {
    for row in list_all_rows(store, table, &QueryOptions::new())? {
        match row.values.get(HASH_COLUMN) {
            Some(Value::String(hash)) if hash.is_empty() => {
                store.update_row(table, &row.id, &RowUpdate::fresh_hash())?;
                *updated += 1;
            }
            Some(_) => {}
            None => debug!(table, row = %row.id, "row has no _Hash cell, skipping"),
        }
    }
    Ok(())
}

/// The identity behind the token. A transport failure is logged and yields
/// `None`; an error answered by the store is returned.
pub fn whoami<S: TableStore + ?Sized>(store: &S) -> Result<Option<Identity>> {
    match store.whoami() {
        Ok(identity) => Ok(Some(identity)),
        Err(CodaError::Http(e)) => {
            warn!(error = %e, "whoami request failed");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
