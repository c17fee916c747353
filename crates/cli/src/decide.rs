//! Mutating commands: `match`, `no-match`, `reset`, `import`.

use std::path::Path;

use shelfmatch_recon::{Action, RecordId};

use crate::{open_session, CliError};

pub fn cmd_match(config_path: &Path, primary: RecordId, candidate: RecordId) -> Result<(), CliError> {
    let (_, mut session) = open_session(config_path)?;
    session
        .apply(Action::SelectMatch { primary, candidate })
        .map_err(CliError::recon)?;

    match session.candidate().get(candidate) {
        Some(c) => eprintln!("matched {primary} -> {candidate} ({})", c.description),
        None => eprintln!("matched {primary} -> {candidate} (not in {} catalog)", session.candidate().label()),
    }
    Ok(())
}

pub fn cmd_no_match(config_path: &Path, primary: RecordId) -> Result<(), CliError> {
    let (_, mut session) = open_session(config_path)?;
    session
        .apply(Action::MarkNoMatch { primary })
        .map_err(CliError::recon)?;
    eprintln!("marked {primary} as no match");
    Ok(())
}

pub fn cmd_reset(config_path: &Path, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::args("reset clears every saved decision")
            .with_hint("re-run with --yes to confirm, or `export` first to keep a copy"));
    }
    let (_, mut session) = open_session(config_path)?;
    let cleared = session.state().len();
    session.apply(Action::ClearAll).map_err(CliError::recon)?;
    eprintln!("cleared {cleared} decision(s)");
    Ok(())
}

pub fn cmd_import(config_path: &Path, file: &Path) -> Result<(), CliError> {
    let payload = std::fs::read(file)
        .map_err(|e| CliError::args(format!("cannot read {}: {e}", file.display())))?;
    let (_, mut session) = open_session(config_path)?;
    session.import_json(&payload).map_err(CliError::recon)?;

    let c = session.counts();
    eprintln!(
        "imported {} decision(s): {} matched, {} no match, {} pending",
        session.state().len(),
        c.matched,
        c.no_match,
        c.pending,
    );
    Ok(())
}
