//! Read-only commands: `validate`, `status`, `list`, `suggest`.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use shelfmatch_recon::{ReconError, StatusFilter};

use crate::util;
use crate::{open_session, CliError};

pub fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let (config, session) = open_session(config_path)?;
    let counts = session.counts();
    eprintln!(
        "valid: '{}': {} {} record(s), {} {} record(s), {} saved decision(s) in {}",
        config.name,
        session.primary().len(),
        session.primary().label(),
        session.candidate().len(),
        session.candidate().label(),
        counts.matched + counts.no_match,
        config.state_dir().display(),
    );
    let orphans = session.orphan_count();
    if orphans > 0 {
        log::warn!("{orphans} saved decision(s) refer to ids missing from the primary catalog");
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusOutput {
    name: String,
    total: usize,
    matched: usize,
    no_match: usize,
    pending: usize,
    orphaned: usize,
}

pub fn cmd_status(config_path: &Path, json: bool) -> Result<(), CliError> {
    let (config, session) = open_session(config_path)?;
    let c = session.counts();
    let out = StatusOutput {
        name: config.name.clone(),
        total: c.total,
        matched: c.matched,
        no_match: c.no_match,
        pending: c.pending,
        orphaned: session.orphan_count(),
    };

    let stdout = io::stdout();
    let mut w = stdout.lock();
    if json {
        let s = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::recon(ReconError::Serialize(e.to_string())))?;
        writeln!(w, "{s}").map_err(|e| CliError::io(e.to_string()))?;
        return Ok(());
    }

    let write = |w: &mut dyn Write| -> io::Result<()> {
        writeln!(w, "{}", out.name)?;
        writeln!(w, "  total     {}", out.total)?;
        writeln!(w, "  matched   {}", out.matched)?;
        writeln!(w, "  no match  {}", out.no_match)?;
        writeln!(w, "  pending   {}", out.pending)?;
        if out.orphaned > 0 {
            writeln!(w, "  orphaned  {} (decisions for unknown ids)", out.orphaned)?;
        }
        Ok(())
    };
    write(&mut w).map_err(|e| CliError::io(e.to_string()))
}

pub fn cmd_list(config_path: &Path, filter: StatusFilter, max_rows: usize) -> Result<(), CliError> {
    let (_, session) = open_session(config_path)?;
    let rows = session.rows_with(filter);
    let limit = if max_rows == 0 { rows.len() } else { max_rows.min(rows.len()) };

    let id_width = rows
        .iter()
        .map(|r| r.record.id.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2);
    let desc_width = rows
        .iter()
        .map(|r| util::display_width(&r.record.description))
        .max()
        .unwrap_or(0)
        .clamp(11, 40);

    let stdout = io::stdout();
    let mut w = stdout.lock();
    let io_err = |e: io::Error| CliError::io(e.to_string());

    writeln!(w, "{:>id_width$}  {}  status", "id", util::fit("description", desc_width))
        .map_err(io_err)?;
    for row in &rows[..limit] {
        writeln!(
            w,
            "{:>id_width$}  {}  {}",
            row.record.id,
            util::fit(&row.record.description, desc_width),
            util::describe_view(&row.view),
        )
        .map_err(io_err)?;
    }
    if limit < rows.len() {
        writeln!(w, "... ({} more rows)", rows.len() - limit).map_err(io_err)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct SuggestionOutput<'a> {
    candidate_id: i64,
    description: &'a str,
    score: u32,
}

pub fn cmd_suggest(
    config_path: &Path,
    primary_id: i64,
    limit: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let (_, session) = open_session(config_path)?;
    let record = session
        .primary()
        .get(primary_id)
        .ok_or_else(|| CliError::recon(ReconError::UnknownPrimary(primary_id)))?;

    let limit = limit.unwrap_or_else(|| session.suggest_limit());
    let shortlist = session.shortlist(&record.description, limit);

    let stdout = io::stdout();
    let mut w = stdout.lock();
    let io_err = |e: io::Error| CliError::io(e.to_string());

    if json {
        let out: Vec<SuggestionOutput> = shortlist
            .iter()
            .map(|s| SuggestionOutput {
                candidate_id: s.record.id,
                description: &s.record.description,
                score: s.score,
            })
            .collect();
        let s = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::recon(ReconError::Serialize(e.to_string())))?;
        writeln!(w, "{s}").map_err(io_err)?;
        return Ok(());
    }

    writeln!(w, "#{} {}  [{}]", record.id, record.description, session.decision(primary_id))
        .map_err(io_err)?;
    if shortlist.is_empty() {
        writeln!(w, "  (no suggestions)").map_err(io_err)?;
    }
    for (i, s) in shortlist.iter().enumerate() {
        writeln!(w, "  {}. #{} {}  (score {})", i + 1, s.record.id, s.record.description, s.score)
            .map_err(io_err)?;
    }
    Ok(())
}
