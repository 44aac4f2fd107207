// UI layer: turns decoded API responses into console text. Renderers take
// any `Write` so tests can capture the output.

use crate::api::{ImportableGuid, MigrationStatus, NewImport};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Spinner on stderr while a request is in flight. Hidden when stderr is
/// not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn print_importable_guids<W: Write>(out: &mut W, guids: &[ImportableGuid]) -> io::Result<()> {
    write!(out, "GUIDs available to import:\n\n")?;
    for guid in guids {
        writeln!(out, "{} - {}", guid.guid, guid.title)?;
    }
    Ok(())
}

pub fn print_import_results<W: Write>(out: &mut W, import: &NewImport) -> io::Result<()> {
    writeln!(out, "\nMigration ID is {}", import.migration_id)
}

/// Print a migration's state and every issue in the order received. A
/// status with id 0 means the server did not recognize the migration.
pub fn print_migration_status<W: Write>(out: &mut W, status: &MigrationStatus) -> io::Result<()> {
    if status.is_not_found() {
        writeln!(
            out,
            "\nThe server returned an error.  Are you sure that migration ID exists?"
        )?;
        return Ok(());
    }

    writeln!(out, "\nMigration status for migration '{}':", status.id)?;
    writeln!(out, " - Workflow state: {}", status.workflow_state)?;
    writeln!(out, " - Migration issues count: {}", status.migration_issues_count)?;
    writeln!(out, " - Migration issues:")?;
    for issue in &status.migration_issues {
        writeln!(out, "   - ID: {}", issue.id)?;
        writeln!(out, "   - Link: {}", issue.error_report_url)?;
        writeln!(out, "   - Issue type: {}", issue.issue_type)?;
        writeln!(out, "   - Error message: {}", issue.error_message)?;
        writeln!(out, "   - Description: {}", issue.description)?;
    }
    Ok(())
}
