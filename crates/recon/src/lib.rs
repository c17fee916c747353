//! `shelfmatch-recon`: catalog matching and review-state engine.
//!
//! Pure engine crate: loads NDJSON catalogs, ranks candidate matches, and
//! tracks per-record review decisions behind a pluggable byte store.
//! No terminal or argument-parsing dependencies.

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod matcher;
pub mod model;
pub mod review;
pub mod session;
pub mod store;

pub use catalog::Catalog;
pub use config::ReviewConfig;
pub use error::{CatalogError, ConfigError, ReconError, StoreError};
pub use matcher::{score, suggest, Suggestion};
pub use model::{CatalogRecord, Decision, RecordId};
pub use review::{ReviewCounts, ReviewState, StatusFilter};
pub use session::{Action, ReviewSession, Row, RowView, SessionOptions};
pub use store::{FileStore, MemoryStore, StateStore};
