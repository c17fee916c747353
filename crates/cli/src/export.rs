//! `shelfmatch export`: write decisions as JSON or CSV.
//!
//! JSON is the same mapping that is persisted and accepted by `import`.
//! CSV carries one `<primary>_id,<candidate>_id` row per decision.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{open_session, CliError, ExportFormat};

pub fn cmd_export(
    config_path: &Path,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let (_, session) = open_session(config_path)?;

    let body = match format {
        ExportFormat::Json => session.export_json(),
        ExportFormat::Csv => session.export_csv(),
    }
    .map_err(CliError::recon)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &body)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {} decision(s) to {}", session.state().len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut w = stdout.lock();
            writeln!(w, "{body}").map_err(|e| CliError::io(e.to_string()))?;
        }
    }
    Ok(())
}
