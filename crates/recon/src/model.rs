use serde::Deserialize;

/// External record identifier, unique within one catalog.
pub type RecordId = i64;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// One line of a catalog file. Unknown fields on the line are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogRecord {
    pub id: RecordId,
    pub description: String,
}

impl CatalogRecord {
    pub fn new(id: RecordId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Review outcome for one primary record.
///
/// `Pending` is never stored; it is what a lookup yields for an id with no
/// recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Pending,
    NoMatch,
    MatchedTo(RecordId),
}

impl Decision {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn candidate_id(&self) -> Option<RecordId> {
        match self {
            Self::MatchedTo(id) => Some(*id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::NoMatch => write!(f, "no match"),
            Self::MatchedTo(id) => write!(f, "matched to {id}"),
        }
    }
}
