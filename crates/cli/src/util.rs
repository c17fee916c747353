use shelfmatch_recon::{RecordId, RowView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width, counting CJK and emoji as two columns.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `width` display columns, ending in "…" when cut.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Truncate or right-pad to exactly `width` display columns.
pub(crate) fn fit(s: &str, width: usize) -> String {
    let cut = truncate_display(s, width);
    let pad = width.saturating_sub(display_width(&cut));
    format!("{cut}{}", " ".repeat(pad))
}

/// Placeholder shown for a stored match whose candidate no longer exists.
pub(crate) fn missing_candidate(id: RecordId) -> String {
    format!("(missing candidate #{id})")
}

/// One-line summary of a row's right-hand side for plain output.
pub(crate) fn describe_view(view: &RowView<'_>) -> String {
    match view {
        RowView::Pending { shortlist } if shortlist.is_empty() => "pending: no suggestions".into(),
        RowView::Pending { shortlist } => {
            let picks: Vec<String> = shortlist
                .iter()
                .map(|s| format!("#{} {} ({})", s.record.id, s.record.description, s.score))
                .collect();
            format!("pending: {}", picks.join(" | "))
        }
        RowView::NoMatch => "no match".into(),
        RowView::Matched { candidate: Some(c), .. } => format!("matched: #{} {}", c.id, c.description),
        RowView::Matched { candidate_id, candidate: None } => {
            format!("matched: {}", missing_candidate(*candidate_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmatch_recon::{CatalogRecord, Suggestion};

    #[test]
    fn truncate_fits() {
        assert_eq!(truncate_display("basil", 5), "basil");
        assert_eq!(truncate_display("", 0), "");
    }

    #[test]
    fn truncate_cuts_with_ellipsis() {
        assert_eq!(truncate_display("tomatoes", 5), "toma…");
        assert_eq!(truncate_display("tomatoes", 1), "…");
        assert_eq!(truncate_display("tomatoes", 0), "");
    }

    #[test]
    fn truncate_cjk_boundary() {
        // "世界你好" is 8 display cols; a budget of 5 fits two glyphs plus "…".
        let t = truncate_display("\u{4e16}\u{754c}\u{4f60}\u{597d}", 6);
        assert_eq!(t, "\u{4e16}\u{754c}…");
        assert!(display_width(&t) <= 6);
    }

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit("ab", 5), "ab   ");
        assert_eq!(fit("abcdef", 4), "abc…");
    }

    #[test]
    fn describe_all_states() {
        let rec = CatalogRecord::new(10, "diced tomato");
        let pending = RowView::Pending {
            shortlist: vec![Suggestion { record: &rec, score: 2 }],
        };
        assert_eq!(describe_view(&pending), "pending: #10 diced tomato (2)");
        assert_eq!(
            describe_view(&RowView::Pending { shortlist: vec![] }),
            "pending: no suggestions"
        );
        assert_eq!(describe_view(&RowView::NoMatch), "no match");
        assert_eq!(
            describe_view(&RowView::Matched { candidate_id: 10, candidate: Some(&rec) }),
            "matched: #10 diced tomato"
        );
        assert_eq!(
            describe_view(&RowView::Matched { candidate_id: 9, candidate: None }),
            "matched: (missing candidate #9)"
        );
    }
}
