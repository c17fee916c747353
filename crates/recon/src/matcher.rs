use crate::model::CatalogRecord;

/// Shortlist size used when the config does not set one.
pub const DEFAULT_SUGGEST_LIMIT: usize = 5;

/// A candidate offered for a query, with its containment score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion<'a> {
    pub record: &'a CatalogRecord,
    pub score: u32,
}

/// Split on runs of whitespace, comma or hyphen. Empty pieces are dropped.
pub fn tokenize(query: &str) -> impl Iterator<Item = &str> {
    query
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|t| !t.is_empty())
}

/// Count query tokens that occur anywhere inside `candidate`, ignoring case.
///
/// Containment is plain substring search, so "tom" matches "tomato". A token
/// repeated in the query is counted once per repetition.
pub fn score(query: &str, candidate: &str) -> u32 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();
    tokenize(&query)
        .filter(|token| candidate.contains(token))
        .count() as u32
}

/// Rank `candidates` against `query` and keep the best `limit`.
///
/// Zero scores are dropped. The sort is stable, so ties keep catalog order.
pub fn suggest<'a>(
    query: &str,
    candidates: &'a [CatalogRecord],
    limit: usize,
) -> Vec<Suggestion<'a>> {
    let mut scored: Vec<Suggestion<'a>> = candidates
        .iter()
        .map(|record| Suggestion {
            record,
            score: score(query, &record.description),
        })
        .filter(|s| s.score > 0)
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, desc: &str) -> CatalogRecord {
        CatalogRecord::new(id, desc)
    }

    #[test]
    fn tokenize_collapses_separator_runs() {
        let tokens: Vec<&str> = tokenize(" Fresh Tomato, -diced ").collect();
        assert_eq!(tokens, vec!["Fresh", "Tomato", "diced"]);
    }

    #[test]
    fn score_counts_contained_tokens() {
        assert_eq!(score("Fresh Tomato, diced", "diced tomato fresh pack"), 3);
        assert_eq!(score("Fresh Tomato, diced", "canned corn"), 0);
    }

    #[test]
    fn score_is_substring_not_word_bounded() {
        assert_eq!(score("tom", "TOMATO"), 1);
        assert_eq!(score("corn", "popcorn"), 1);
    }

    #[test]
    fn score_counts_repeated_tokens() {
        assert_eq!(score("oil oil olive", "olive oil"), 3);
    }

    #[test]
    fn score_separator_only_query_is_zero() {
        assert_eq!(score(" ,- ", "anything"), 0);
        assert_eq!(score("", "anything"), 0);
    }

    #[test]
    fn suggest_drops_zero_scores() {
        let cands = vec![rec(10, "diced tomato fresh pack"), rec(11, "canned corn")];
        let out = suggest("Fresh Tomato, diced", &cands, 5);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].record.id, 10);
        assert_eq!(out[0].score, 3);
    }

    #[test]
    fn suggest_ranks_and_keeps_catalog_order_on_ties() {
        let cands = vec![
            rec(1, "red onion"),
            rec(2, "yellow onion jumbo"),
            rec(3, "onion"),
            rec(4, "garlic"),
        ];
        let out = suggest("yellow onion", &cands, 5);
        let ids: Vec<i64> = out.iter().map(|s| s.record.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn suggest_respects_limit() {
        let cands: Vec<CatalogRecord> = (0..10).map(|i| rec(i, "flour")).collect();
        assert_eq!(suggest("flour", &cands, 5).len(), 5);
        assert!(suggest("flour", &cands, 0).is_empty());
    }

    #[test]
    fn suggest_empty_when_nothing_scores() {
        let cands = vec![rec(1, "butter")];
        assert!(suggest("vinegar", &cands, 5).is_empty());
    }
}
