//! Review state: one decision per primary record.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::Catalog;
use crate::model::{Decision, RecordId};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Decided records keyed by primary id. Absent ids are pending.
///
/// Serialized as a JSON object whose keys are the ids as text and whose
/// values are `null` (no match) or the matched candidate id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewState {
    decisions: BTreeMap<RecordId, Decision>,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decision(&self, primary: RecordId) -> Decision {
        self.decisions
            .get(&primary)
            .copied()
            .unwrap_or(Decision::Pending)
    }

    /// Record a match. The candidate id is not checked.
    pub fn set_match(&mut self, primary: RecordId, candidate: RecordId) {
        self.decisions.insert(primary, Decision::MatchedTo(candidate));
    }

    pub fn set_no_match(&mut self, primary: RecordId) {
        self.decisions.insert(primary, Decision::NoMatch);
    }

    pub fn clear_all(&mut self) {
        self.decisions.clear();
    }

    /// Replace every decision with `other`'s.
    pub fn import_all(&mut self, other: ReviewState) {
        *self = other;
    }

    /// Stored decisions in ascending primary id order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, Decision)> + '_ {
        self.decisions.iter().map(|(&id, &d)| (id, d))
    }

    /// Number of stored (non-pending) decisions, orphans included.
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Decided ids that do not name a record in `primary`.
    pub fn orphans<'a>(&'a self, primary: &'a Catalog) -> impl Iterator<Item = RecordId> + 'a {
        self.decisions
            .keys()
            .copied()
            .filter(move |id| !primary.contains(*id))
    }

    /// Aggregate counts over the primary catalog.
    pub fn counts(&self, primary: &Catalog) -> ReviewCounts {
        let mut matched = 0;
        let mut no_match = 0;
        for record in primary.records() {
            match self.decision(record.id) {
                Decision::MatchedTo(_) => matched += 1,
                Decision::NoMatch => no_match += 1,
                Decision::Pending => {}
            }
        }
        let total = primary.len();
        ReviewCounts {
            total,
            matched,
            no_match,
            pending: total - matched - no_match,
        }
    }
}

impl Serialize for ReviewState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.decisions.len()))?;
        for (id, decision) in &self.decisions {
            map.serialize_entry(&id.to_string(), &decision.candidate_id())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReviewState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, Option<RecordId>> = BTreeMap::deserialize(deserializer)?;
        let mut decisions = BTreeMap::new();
        for (key, value) in raw {
            let id: RecordId = key
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("key '{key}' is not an integer id")))?;
            let decision = match value {
                Some(candidate) => Decision::MatchedTo(candidate),
                None => Decision::NoMatch,
            };
            if decisions.insert(id, decision).is_some() {
                return Err(D::Error::custom(format!("id {id} appears more than once")));
            }
        }
        Ok(Self { decisions })
    }
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewCounts {
    pub total: usize,
    pub matched: usize,
    pub no_match: usize,
    pub pending: usize,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Which primary rows a view shows. Never affects counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Matched,
    Pending,
    NoMatch,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Matched,
        StatusFilter::Pending,
        StatusFilter::NoMatch,
    ];

    pub fn accepts(&self, decision: Decision) -> bool {
        match self {
            Self::All => true,
            Self::Matched => matches!(decision, Decision::MatchedTo(_)),
            Self::Pending => decision.is_pending(),
            Self::NoMatch => matches!(decision, Decision::NoMatch),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Matched => "matched",
            Self::Pending => "pending",
            Self::NoMatch => "nomatch",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "matched" => Ok(Self::Matched),
            "pending" => Ok(Self::Pending),
            "nomatch" | "no-match" | "no_match" => Ok(Self::NoMatch),
            other => Err(format!(
                "unknown filter '{other}' (expected all, matched, pending or nomatch)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogRecord;

    fn primary(n: i64) -> Catalog {
        let records = (1..=n).map(|i| CatalogRecord::new(i, format!("item {i}"))).collect();
        Catalog::from_records("primary", records).unwrap()
    }

    #[test]
    fn starts_pending() {
        let state = ReviewState::new();
        assert_eq!(state.decision(1), Decision::Pending);
        let c = state.counts(&primary(3));
        assert_eq!(c, ReviewCounts { total: 3, matched: 0, no_match: 0, pending: 3 });
    }

    #[test]
    fn last_write_wins() {
        let mut state = ReviewState::new();
        state.set_match(1, 10);
        state.set_no_match(1);
        assert_eq!(state.decision(1), Decision::NoMatch);
        state.set_match(1, 12);
        assert_eq!(state.decision(1), Decision::MatchedTo(12));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn counts_partition_total() {
        let mut state = ReviewState::new();
        state.set_match(1, 10);
        state.set_no_match(2);
        let c = state.counts(&primary(4));
        assert_eq!(c.matched, 1);
        assert_eq!(c.no_match, 1);
        assert_eq!(c.pending, 2);
        assert_eq!(c.matched + c.no_match + c.pending, c.total);
    }

    #[test]
    fn orphans_excluded_from_counts() {
        let mut state = ReviewState::new();
        state.set_match(1, 10);
        state.set_no_match(99);
        let cat = primary(2);
        let c = state.counts(&cat);
        assert_eq!(c, ReviewCounts { total: 2, matched: 1, no_match: 0, pending: 1 });
        assert_eq!(state.orphans(&cat).collect::<Vec<_>>(), vec![99]);
    }

    #[test]
    fn clear_all_resets_to_pending() {
        let mut state = ReviewState::new();
        state.set_match(1, 10);
        state.set_no_match(2);
        state.clear_all();
        assert!(state.is_empty());
        assert_eq!(state.counts(&primary(2)).pending, 2);
    }

    #[test]
    fn serializes_as_nullable_map() {
        let mut state = ReviewState::new();
        state.set_match(1, 10);
        state.set_no_match(2);
        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v, serde_json::json!({"1": 10, "2": null}));
    }

    #[test]
    fn serializes_in_numeric_key_order() {
        let mut state = ReviewState::new();
        state.set_no_match(10);
        state.set_no_match(2);
        let s = serde_json::to_string(&state).unwrap();
        assert_eq!(s, r#"{"2":null,"10":null}"#);
    }

    #[test]
    fn deserialize_rejects_bad_shapes() {
        assert!(serde_json::from_str::<ReviewState>(r#"{"abc": 1}"#).is_err());
        assert!(serde_json::from_str::<ReviewState>(r#"{"1": "x"}"#).is_err());
        assert!(serde_json::from_str::<ReviewState>(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn deserialize_rejects_ids_spelled_twice() {
        let err = serde_json::from_str::<ReviewState>(r#"{"1": 10, "01": null}"#).unwrap_err();
        assert!(err.to_string().contains("id 1 appears more than once"), "{err}");
        assert!(serde_json::from_str::<ReviewState>(r#"{" 2": 10, "2": 11}"#).is_err());
    }

    #[test]
    fn deserialize_round_trip() {
        let state: ReviewState = serde_json::from_str(r#"{"3": 30, "4": null}"#).unwrap();
        assert_eq!(state.decision(3), Decision::MatchedTo(30));
        assert_eq!(state.decision(4), Decision::NoMatch);
        assert_eq!(state.decision(5), Decision::Pending);
    }

    #[test]
    fn filter_accepts() {
        use StatusFilter::*;
        let m = Decision::MatchedTo(1);
        assert!(All.accepts(Decision::Pending) && All.accepts(m));
        assert!(Matched.accepts(m) && !Matched.accepts(Decision::NoMatch));
        assert!(Pending.accepts(Decision::Pending) && !Pending.accepts(m));
        assert!(NoMatch.accepts(Decision::NoMatch) && !NoMatch.accepts(Decision::Pending));
    }

    #[test]
    fn filter_from_str() {
        assert_eq!("nomatch".parse::<StatusFilter>().unwrap(), StatusFilter::NoMatch);
        assert_eq!("Matched".parse::<StatusFilter>().unwrap(), StatusFilter::Matched);
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
