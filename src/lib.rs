// Library root
// -----------
// This crate exposes the pieces the `coda` binary is built from, so they can
// be tested without a terminal or a network connection.
//
// Module responsibilities:
// - `api`: the `TableStore` contract and its HTTP implementation.
// - `commands`: the composite operations behind each CLI verb.
// - `config`: access key and doc location, read from the environment.
// - `error`: the `CodaError` type shared by every module.
// - `model`: typed response payloads.
// - `query`: the read qualifier (`?useColumnNames=true&...`).
// - `resolver`: name matching and operator disambiguation.
// - `row`: write bodies and `_Hash` generation.
// - `ui`: terminal prompt and spinner.
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod resolver;
pub mod row;
pub mod ui;
