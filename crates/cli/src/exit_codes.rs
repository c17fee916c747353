//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args, missing file) |
//! | 3-9     | review     | Config, catalog, state and import codes  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `review_exit_code`

use shelfmatch_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing confirmation, unreadable input file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Review (3-9)
// =============================================================================

/// Config file missing, unparsable, or invalid.
pub const EXIT_CONFIG: u8 = 3;

/// A catalog could not be read or a line failed to parse.
pub const EXIT_CATALOG: u8 = 4;

/// The state store could not be written.
pub const EXIT_STATE: u8 = 5;

/// Import payload rejected; saved decisions unchanged.
pub const EXIT_IMPORT: u8 = 6;

/// The primary id is not in the primary catalog.
pub const EXIT_UNKNOWN_ID: u8 = 7;

/// Map an engine error to its exit code.
pub fn review_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Config(_) => EXIT_CONFIG,
        ReconError::Catalog(_) => EXIT_CATALOG,
        ReconError::Store(_) => EXIT_STATE,
        ReconError::Import(_) => EXIT_IMPORT,
        ReconError::UnknownPrimary(_) => EXIT_UNKNOWN_ID,
        ReconError::Serialize(_) => EXIT_ERROR,
    }
}
