//! Records command handler.

use anyhow::Result;
use comfy_table::Table;
use muster_core::api::{ApiClient, ApiError};
use muster_core::config::Config;
use muster_core::credentials::CredentialStore;
use muster_core::table::{DisplayRow, HEADERS, apply_filter, project_rows};

/// Fetches the current attendance record set and prints it as a table.
pub async fn run(config: &Config, store: &CredentialStore, filter: Option<&str>) -> Result<()> {
    // Session guard: no stored credential, no request.
    let session = match store.require_login() {
        Ok(session) => session,
        Err(err) => anyhow::bail!("{err}"),
    };

    let client = ApiClient::from_config(config)?;
    let records = match client.fetch_records(&session.token).await {
        Ok(records) => records,
        Err(ApiError::Unauthorized) => {
            // A rejected token is "not logged in": clear it so the next
            // command starts from the entry point.
            store.clear()?;
            anyhow::bail!("{}", ApiError::Unauthorized);
        }
        Err(err) => anyhow::bail!("{err}"),
    };
    tracing::debug!(count = records.len(), "fetched attendance records");

    let mut rows = project_rows(&records);
    if let Some(query) = filter {
        apply_filter(&mut rows, query);
    }

    println!("{}", render_table(&rows));

    if let Some(query) = filter {
        let shown = rows.iter().filter(|r| r.visible && !r.placeholder).count();
        let total = rows.iter().filter(|r| !r.placeholder).count();
        println!("{shown} of {total} record(s) match \"{query}\"");
    }

    Ok(())
}

/// Renders projected rows with comfy-table. Hidden rows are skipped; the
/// placeholder row becomes a single muted line.
fn render_table(rows: &[DisplayRow]) -> Table {
    let mut table = Table::new();
    table.set_header(HEADERS.to_vec());

    for row in rows.iter().filter(|r| r.visible) {
        if row.placeholder {
            table.add_row(vec![String::new(), row.subject.clone()]);
        } else {
            table.add_row(vec![
                row.index.to_string(),
                row.subject.clone(),
                row.subject_id.clone(),
                row.time.clone(),
                row.status.clone(),
            ]);
        }
    }

    table
}
