// Runs one invocation: load config, merge flags, call the API once, print
// the result and write the updated config back.

use anyhow::{Context, Result};
use std::io::Write;

use crate::api::ApiClient;
use crate::cli::{Action, Cli, Invocation};
use crate::config::{ConfigStore, Configuration};
use crate::{domain, ui};

/// Execute the invocation described by `cli`, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::from_home()?,
    };
    let stored = store.load()?;

    let inv = Invocation::merge(cli, stored.as_ref());
    inv.verify()?;
    let base_url = domain::normalize(&inv.domain);
    let action = inv.action()?;
    tracing::debug!(%base_url, ?action, "resolved invocation");

    let api = ApiClient::new(&base_url, &inv.apikey)?;
    let updated = dispatch(&api, &action, stored.as_ref(), out)?;
    store.save(updated)
}

/// Run `action` against `api` and return the configuration to persist.
pub fn dispatch<W: Write>(
    api: &ApiClient,
    action: &Action,
    stored: Option<&Configuration>,
    out: &mut W,
) -> Result<Configuration> {
    let migration_id = match action {
        Action::ListAvailable => {
            let spinner = ui::spinner("Fetching available GUIDs...");
            let guids = api.list_available();
            spinner.finish_and_clear();
            ui::print_importable_guids(out, &guids?).context("Failed to write output")?;
            stored.map(|cf| cf.migration_id).unwrap_or(0)
        }
        Action::Import(guid_or_title) => {
            let spinner = ui::spinner("Requesting import...");
            let import = api.start_import(guid_or_title);
            spinner.finish_and_clear();
            let import = import?;
            ui::print_import_results(out, &import).context("Failed to write output")?;
            import.migration_id
        }
        Action::Status(migration_id) => {
            let spinner = ui::spinner("Retrieving migration status...");
            let status = api.migration_status(*migration_id);
            spinner.finish_and_clear();
            ui::print_migration_status(out, &status?).context("Failed to write output")?;
            *migration_id
        }
    };

    Ok(Configuration {
        apikey: api.token().to_string(),
        migration_id,
        domain: api.base_url().to_string(),
    })
}
