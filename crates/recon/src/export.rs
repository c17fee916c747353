//! JSON / CSV export and JSON import of review state.

use crate::error::ReconError;
use crate::model::Decision;
use crate::review::ReviewState;

/// Pretty-printed JSON mapping, the same shape that is persisted.
pub fn to_json(state: &ReviewState) -> Result<String, ReconError> {
    serde_json::to_string_pretty(state).map_err(|e| ReconError::Serialize(e.to_string()))
}

/// Two-column CSV, one row per stored decision in primary id order.
///
/// The header is `<primary_label>_id,<candidate_label>_id`. A no-match row
/// carries the literal `null`. There is no newline after the last row.
pub fn to_csv(
    state: &ReviewState,
    primary_label: &str,
    candidate_label: &str,
) -> Result<String, ReconError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| ReconError::Serialize(e.to_string());

    wtr.write_record([
        format!("{primary_label}_id"),
        format!("{candidate_label}_id"),
    ])
    .map_err(csv_err)?;

    for (primary, decision) in state.iter() {
        let second = match decision {
            Decision::MatchedTo(candidate) => candidate.to_string(),
            Decision::NoMatch => "null".to_string(),
            Decision::Pending => continue,
        };
        wtr.write_record([primary.to_string(), second])
            .map_err(csv_err)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ReconError::Serialize(e.to_string()))?;
    let mut out = String::from_utf8(bytes).map_err(|e| ReconError::Serialize(e.to_string()))?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Parse an import payload. The whole payload is rejected on any bad entry.
pub fn from_json(input: &[u8]) -> Result<ReviewState, ReconError> {
    serde_json::from_slice(input).map_err(|e| ReconError::Import(e.to_string()))
}
