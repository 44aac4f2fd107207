// Library root
// -----------
// The binary (`main.rs`) is a thin shell around these modules; they live in
// a library so the integration tests can reach the same code.
//
// Module responsibilities:
// - `cli`: flag parsing and the merge of flags with the stored config.
// - `config`: the `~/.outcomes-import.conf` file (load, save, key retention).
// - `domain`: turns a short school name into a full base URL.
// - `api`: blocking HTTP client for the outcomes import endpoints.
// - `json`: serde helpers shared by config and API types.
// - `ui`: console rendering of API responses and the request spinner.
// - `app`: runs the single requested operation and returns the config to
//   persist.
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
mod json;
pub mod logging;
pub mod ui;
