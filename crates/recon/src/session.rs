//! The review controller: sole owner of catalogs, decisions, filter and store.
//!
//! Lifecycle: `open` hydrates decisions from the store, `apply` mutates and
//! persists, dropping the session discards the in-memory copy only.

use crate::catalog::Catalog;
use crate::config::ReviewConfig;
use crate::error::ReconError;
use crate::export;
use crate::matcher::{suggest, Suggestion, DEFAULT_SUGGEST_LIMIT};
use crate::model::{CatalogRecord, Decision, RecordId};
use crate::review::{ReviewCounts, ReviewState, StatusFilter};
use crate::store::{FileStore, StateStore, DEFAULT_STATE_KEY};

/// A user intent dispatched by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectMatch { primary: RecordId, candidate: RecordId },
    MarkNoMatch { primary: RecordId },
    SetFilter(StatusFilter),
    ClearAll,
    Import(ReviewState),
}

/// What a view shows on the right-hand side of a primary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView<'a> {
    Pending { shortlist: Vec<Suggestion<'a>> },
    NoMatch,
    /// `candidate` is `None` when the stored id no longer resolves.
    Matched {
        candidate_id: RecordId,
        candidate: Option<&'a CatalogRecord>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    pub record: &'a CatalogRecord,
    pub view: RowView<'a>,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub state_key: String,
    pub suggest_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
        }
    }
}

pub struct ReviewSession<S: StateStore> {
    primary: Catalog,
    candidate: Catalog,
    state: ReviewState,
    filter: StatusFilter,
    store: S,
    options: SessionOptions,
}

impl ReviewSession<FileStore> {
    /// Load both catalogs named by `config`, then hydrate from its state dir.
    /// Either catalog failing aborts before any state is read.
    pub fn from_config(config: &ReviewConfig) -> Result<Self, ReconError> {
        let primary = Catalog::load(config.primary_label(), &config.primary_path())?;
        let candidate = Catalog::load(config.candidate_label(), &config.candidate_path())?;
        let store = FileStore::new(config.state_dir());
        let options = SessionOptions {
            state_key: config.state.key.clone(),
            suggest_limit: config.suggest.limit,
        };
        Ok(Self::open(primary, candidate, store, options))
    }
}

impl<S: StateStore> ReviewSession<S> {
    /// Hydrate from `store`. A missing, unreadable or corrupt value yields an
    /// empty state.
    pub fn open(primary: Catalog, candidate: Catalog, store: S, options: SessionOptions) -> Self {
        let state = match store.get(&options.state_key) {
            Ok(Some(bytes)) => match export::from_json(&bytes) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("ignoring corrupt saved state '{}': {e}", options.state_key);
                    ReviewState::new()
                }
            },
            Ok(None) => ReviewState::new(),
            Err(e) => {
                log::warn!("cannot read saved state: {e}");
                ReviewState::new()
            }
        };
        log::debug!(
            "session opened: {} primary, {} candidate, {} saved decision(s)",
            primary.len(),
            candidate.len(),
            state.len()
        );
        Self {
            primary,
            candidate,
            state,
            filter: StatusFilter::All,
            store,
            options,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Apply `action` and persist the result. The in-memory state only
    /// changes once the store has accepted the write.
    pub fn apply(&mut self, action: Action) -> Result<(), ReconError> {
        match action {
            Action::SelectMatch { primary, candidate } => {
                self.require_primary(primary)?;
                if !self.candidate.contains(candidate) {
                    log::warn!(
                        "{} {primary} matched to unknown {} id {candidate}",
                        self.primary.label(),
                        self.candidate.label()
                    );
                }
                let mut next = self.state.clone();
                next.set_match(primary, candidate);
                self.commit(next)
            }
            Action::MarkNoMatch { primary } => {
                self.require_primary(primary)?;
                let mut next = self.state.clone();
                next.set_no_match(primary);
                self.commit(next)
            }
            Action::SetFilter(filter) => {
                self.filter = filter;
                Ok(())
            }
            Action::ClearAll => {
                self.store.remove(&self.options.state_key)?;
                self.state.clear_all();
                Ok(())
            }
            Action::Import(state) => {
                let orphans: Vec<RecordId> = state.orphans(&self.primary).collect();
                if !orphans.is_empty() {
                    log::warn!(
                        "import carries {} decision(s) for unknown {} ids: {:?}",
                        orphans.len(),
                        self.primary.label(),
                        orphans
                    );
                }
                let mut next = self.state.clone();
                next.import_all(state);
                self.commit(next)
            }
        }
    }

    /// Parse and apply an import payload; a bad payload changes nothing.
    pub fn import_json(&mut self, payload: &[u8]) -> Result<(), ReconError> {
        let state = export::from_json(payload)?;
        self.apply(Action::Import(state))
    }

    fn require_primary(&self, id: RecordId) -> Result<(), ReconError> {
        if self.primary.contains(id) {
            Ok(())
        } else {
            Err(ReconError::UnknownPrimary(id))
        }
    }

    /// Write `next` to the store, then adopt it.
    fn commit(&mut self, next: ReviewState) -> Result<(), ReconError> {
        let json = export::to_json(&next)?;
        self.store.put(&self.options.state_key, json.as_bytes())?;
        self.state = next;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn primary(&self) -> &Catalog {
        &self.primary
    }

    pub fn candidate(&self) -> &Catalog {
        &self.candidate
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn suggest_limit(&self) -> usize {
        self.options.suggest_limit
    }

    pub fn counts(&self) -> ReviewCounts {
        self.state.counts(&self.primary)
    }

    pub fn orphan_count(&self) -> usize {
        self.state.orphans(&self.primary).count()
    }

    pub fn decision(&self, primary: RecordId) -> Decision {
        self.state.decision(primary)
    }

    /// Shortlist for any text against the candidate catalog.
    pub fn shortlist(&self, query: &str, limit: usize) -> Vec<Suggestion<'_>> {
        suggest(query, self.candidate.records(), limit)
    }

    pub fn row(&self, primary: RecordId) -> Option<Row<'_>> {
        self.primary.get(primary).map(|record| self.build_row(record))
    }

    /// Rows accepted by the current filter, in primary catalog order.
    pub fn rows(&self) -> Vec<Row<'_>> {
        self.rows_with(self.filter)
    }

    pub fn rows_with(&self, filter: StatusFilter) -> Vec<Row<'_>> {
        self.primary
            .records()
            .iter()
            .filter(|r| filter.accepts(self.state.decision(r.id)))
            .map(|r| self.build_row(r))
            .collect()
    }

    fn build_row<'a>(&'a self, record: &'a CatalogRecord) -> Row<'a> {
        let view = match self.state.decision(record.id) {
            Decision::Pending => RowView::Pending {
                shortlist: self.shortlist(&record.description, self.options.suggest_limit),
            },
            Decision::NoMatch => RowView::NoMatch,
            Decision::MatchedTo(candidate_id) => RowView::Matched {
                candidate_id,
                candidate: self.candidate.get(candidate_id),
            },
        };
        Row { record, view }
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    pub fn export_json(&self) -> Result<String, ReconError> {
        export::to_json(&self.state)
    }

    pub fn export_csv(&self) -> Result<String, ReconError> {
        export::to_csv(&self.state, self.primary.label(), self.candidate.label())
    }

    /// Give back the store, dropping the in-memory state.
    pub fn into_store(self) -> S {
        self.store
    }
}
