//! `shelfmatch review`: interactive terminal review.
//!
//! The view renders from `ReviewSession` and turns key presses into
//! `Action` values; all state changes go through `ReviewSession::apply`.

use std::io::stdout;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use shelfmatch_recon::{Action, RecordId, ReviewSession, RowView, StateStore, StatusFilter};

use crate::util;
use crate::{open_session, CliError};

struct ReviewApp<S: StateStore> {
    session: ReviewSession<S>,
    title: String,
    cursor: usize,
    scroll: usize,
    should_quit: bool,
    show_help: bool,
    confirm_reset: bool,
    /// One-shot feedback shown in the status bar.
    message: Option<String>,
}

impl<S: StateStore> ReviewApp<S> {
    fn new(session: ReviewSession<S>, title: String) -> Self {
        Self {
            session,
            title,
            cursor: 0,
            scroll: 0,
            should_quit: false,
            show_help: false,
            confirm_reset: false,
            message: None,
        }
    }

    /// Primary ids accepted by the current filter, in catalog order.
    fn visible_ids(&self) -> Vec<RecordId> {
        let filter = self.session.filter();
        self.session
            .primary()
            .records()
            .iter()
            .filter(|r| filter.accepts(self.session.decision(r.id)))
            .map(|r| r.id)
            .collect()
    }

    fn current_id(&self) -> Option<RecordId> {
        self.visible_ids().get(self.cursor).copied()
    }

    /// Map a key to navigation (handled here) or an `Action` for the session.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.show_help {
            self.show_help = false;
            return None;
        }
        if self.confirm_reset {
            self.confirm_reset = false;
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                return Some(Action::ClearAll);
            }
            self.message = Some("reset cancelled".into());
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-20),
            KeyCode::PageDown => self.move_cursor(20),
            KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.cursor = self.visible_ids().len().saturating_sub(1);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let pick = (c as usize) - ('1' as usize);
                return self.pick_suggestion(pick);
            }
            KeyCode::Char('n') => {
                return self.current_id().map(|primary| Action::MarkNoMatch { primary });
            }
            KeyCode::Char('a') => return Some(Action::SetFilter(StatusFilter::All)),
            KeyCode::Char('m') => return Some(Action::SetFilter(StatusFilter::Matched)),
            KeyCode::Char('p') => return Some(Action::SetFilter(StatusFilter::Pending)),
            KeyCode::Char('x') => return Some(Action::SetFilter(StatusFilter::NoMatch)),
            KeyCode::Tab => return Some(Action::SetFilter(self.next_filter())),
            KeyCode::Char('R') => {
                self.confirm_reset = true;
                self.message = Some("clear ALL decisions? press y to confirm".into());
            }
            _ => {}
        }
        None
    }

    fn pick_suggestion(&mut self, pick: usize) -> Option<Action> {
        let primary = self.current_id()?;
        let row = self.session.row(primary)?;
        match row.view {
            RowView::Pending { shortlist } => match shortlist.get(pick) {
                Some(s) => Some(Action::SelectMatch {
                    primary,
                    candidate: s.record.id,
                }),
                None => {
                    self.message = Some(format!("no suggestion {}", pick + 1));
                    None
                }
            },
            _ => {
                self.message = Some("already decided; press n to mark no match".into());
                None
            }
        }
    }

    fn next_filter(&self) -> StatusFilter {
        let all = StatusFilter::ALL;
        let pos = all.iter().position(|f| *f == self.session.filter()).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    /// Apply an action and describe the outcome in the status bar.
    fn dispatch(&mut self, action: Action) {
        let note = match &action {
            Action::SelectMatch { primary, candidate } => format!("matched {primary} -> {candidate}"),
            Action::MarkNoMatch { primary } => format!("marked {primary} as no match"),
            Action::SetFilter(f) => format!("filter: {f}"),
            Action::ClearAll => "all decisions cleared".to_string(),
            Action::Import(_) => "imported".to_string(),
        };
        let resets_cursor = matches!(action, Action::SetFilter(_) | Action::ClearAll);

        match self.session.apply(action) {
            Ok(()) => self.message = Some(note),
            Err(e) => self.message = Some(format!("error: {e}")),
        }

        if resets_cursor {
            self.cursor = 0;
            self.scroll = 0;
        }
        self.clamp_cursor();
    }

    fn move_cursor(&mut self, delta: i64) {
        let len = self.visible_ids().len();
        if len == 0 {
            return;
        }
        let next = (self.cursor as i64 + delta).clamp(0, len as i64 - 1);
        self.cursor = next as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_ids().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn ensure_visible(&mut self, visible_rows: usize) {
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        if visible_rows > 0 && self.cursor >= self.scroll + visible_rows {
            self.scroll = self.cursor - visible_rows + 1;
        }
    }

    fn detail_height(&self) -> u16 {
        self.session.suggest_limit().min(9) as u16 + 3
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(self.detail_height()),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_list(frame, chunks[1]);
        self.draw_detail(frame, chunks[2]);
        self.draw_status(frame, chunks[3]);

        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let c = self.session.counts();
        let title = format!(
            " shelfmatch: {} | {} total, {} matched, {} no match, {} pending | filter: {} ",
            self.title,
            c.total,
            c.matched,
            c.no_match,
            c.pending,
            self.session.filter(),
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let ids = self.visible_ids();
        if ids.is_empty() {
            let msg = Paragraph::new("(nothing to show for this filter)")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(msg, area);
            return;
        }

        let id_width = ids.iter().map(|id| id.to_string().len()).max().unwrap_or(1);
        let desc_width = (area.width as usize / 2).max(12);
        let status_width = (area.width as usize).saturating_sub(id_width + desc_width + 6);
        let end = (self.scroll + area.height as usize).min(ids.len());

        let mut lines = Vec::with_capacity(end.saturating_sub(self.scroll));
        for (i, &id) in ids.iter().enumerate().take(end).skip(self.scroll) {
            let Some(record) = self.session.primary().get(id) else {
                continue;
            };
            let is_cursor = i == self.cursor;
            let (status, status_style) = self.status_cell(id);

            let base = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            lines.push(Line::from(vec![
                Span::styled(if is_cursor { "> " } else { "  " }, base),
                Span::styled(format!("{:>id_width$} ", id), base),
                Span::styled(format!("{} ", util::fit(&record.description, desc_width)), base),
                Span::styled(
                    util::fit(&status, status_width),
                    if is_cursor { base } else { status_style },
                ),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Short right-hand status for a list row. Pending rows skip scoring here.
    fn status_cell(&self, id: RecordId) -> (String, Style) {
        use shelfmatch_recon::Decision;
        match self.session.decision(id) {
            Decision::Pending => ("pending".into(), Style::default().fg(Color::Yellow)),
            Decision::NoMatch => ("no match".into(), Style::default().fg(Color::Red)),
            Decision::MatchedTo(cid) => {
                let label = match self.session.candidate().get(cid) {
                    Some(c) => format!("-> #{} {}", c.id, c.description),
                    None => format!("-> {}", util::missing_candidate(cid)),
                };
                (label, Style::default().fg(Color::Green))
            }
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(row) = self.current_id().and_then(|id| self.session.row(id)) else {
            let block = Block::default().borders(Borders::ALL).title(" no selection ");
            frame.render_widget(block, area);
            return;
        };

        let inner_width = (area.width as usize).saturating_sub(4);
        let mut lines: Vec<Line> = Vec::new();
        match &row.view {
            RowView::Pending { shortlist } if shortlist.is_empty() => {
                lines.push(Line::from(Span::styled(
                    "no suggestions; press n to mark no match",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            RowView::Pending { shortlist } => {
                for (i, s) in shortlist.iter().take(9).enumerate() {
                    let text = format!("{}. #{} {} (score {})", i + 1, s.record.id, s.record.description, s.score);
                    lines.push(Line::from(Span::styled(
                        util::truncate_display(&text, inner_width),
                        Style::default().fg(Color::White),
                    )));
                }
            }
            RowView::NoMatch => {
                lines.push(Line::from(Span::styled("No match", Style::default().fg(Color::Red))));
            }
            RowView::Matched { candidate_id, candidate } => {
                let text = match candidate {
                    Some(c) => format!("Matched to #{} {}", c.id, c.description),
                    None => format!("Matched to {}", util::missing_candidate(*candidate_id)),
                };
                lines.push(Line::from(Span::styled(
                    util::truncate_display(&text, inner_width),
                    Style::default().fg(Color::Green),
                )));
            }
        }

        let title = util::truncate_display(
            &format!(" #{} {} ", row.record.id, row.record.description),
            inner_width,
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let total = self.visible_ids().len();
        let left = match self.message {
            Some(ref m) => format!(" {m}"),
            None => " 1-9 pick  n no match  a/m/p/x filter  R reset".to_string(),
        };
        let right = if total == 0 {
            "Row 0/0  ?: help ".to_string()
        } else {
            format!("Row {}/{}  ?: help ", self.cursor + 1, total)
        };
        let padding = (area.width as usize)
            .saturating_sub(util::display_width(&left) + util::display_width(&right));
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Navigation",
            "  ----------",
            "  arrows / jk       Move cursor",
            "  PgUp / PgDn       Page up/down",
            "  Home / g          First row",
            "  End  / G          Last row",
            "",
            "  Decisions",
            "  ---------",
            "  1..9              Match to suggestion",
            "  n                 No match",
            "  R                 Reset all (y confirms)",
            "",
            "  Filters",
            "  -------",
            "  a / m / p / x     All/matched/pending/no match",
            "  Tab               Next filter",
            "",
            "  General",
            "  -------",
            "  q / Esc           Quit",
            "  ?                 Toggle this help",
            "",
        ];
        let help_width: u16 = 50;
        let help_height: u16 = help_lines.len() as u16 + 2;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Open the session named by `config_path` and run the review screen.
pub fn cmd_review(config_path: &Path, filter: StatusFilter) -> Result<(), CliError> {
    let (config, mut session) = open_session(config_path)?;
    session
        .apply(Action::SetFilter(filter))
        .map_err(CliError::recon)?;
    let app = ReviewApp::new(session, config.name.clone());
    run_app(app).map_err(CliError::io)
}

fn run_app<S: StateStore>(mut app: ReviewApp<S>) -> Result<(), String> {
    terminal::enable_raw_mode()
        .map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        let height = terminal.size().map(|s| s.height).unwrap_or_default();
        let chrome = 2 + app.detail_height();
        app.ensure_visible(height.saturating_sub(chrome) as usize);

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(250))
            .map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("event read error: {}", e))?
            {
                if key.kind == KeyEventKind::Press {
                    app.message = None;
                    if let Some(action) = app.handle_key(key) {
                        app.dispatch(action);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use shelfmatch_recon::{Catalog, CatalogRecord, Decision, MemoryStore, SessionOptions};

    fn app() -> ReviewApp<MemoryStore> {
        let primary = Catalog::from_records(
            "shamrock",
            vec![
                CatalogRecord::new(1, "Fresh Tomato, diced"),
                CatalogRecord::new(2, "Saffron threads"),
                CatalogRecord::new(3, "Onion, yellow"),
            ],
        )
        .unwrap();
        let candidate = Catalog::from_records(
            "usfoods",
            vec![
                CatalogRecord::new(10, "diced tomato fresh pack"),
                CatalogRecord::new(11, "yellow onion"),
                CatalogRecord::new(12, "red onion"),
            ],
        )
        .unwrap();
        let session = ReviewSession::open(primary, candidate, MemoryStore::new(), SessionOptions::default());
        ReviewApp::new(session, "test".into())
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn press(app: &mut ReviewApp<MemoryStore>, c: char) {
        if let Some(action) = app.handle_key(key(c)) {
            app.dispatch(action);
        }
    }

    #[test]
    fn digit_selects_suggestion() {
        let mut app = app();
        assert_eq!(
            app.handle_key(key('1')),
            Some(Action::SelectMatch { primary: 1, candidate: 10 })
        );
    }

    #[test]
    fn digit_past_shortlist_does_nothing() {
        let mut app = app();
        assert_eq!(app.handle_key(key('5')), None);
        assert!(app.message.as_deref().unwrap_or("").contains("no suggestion 5"));
    }

    #[test]
    fn navigation_and_no_match() {
        let mut app = app();
        press(&mut app, 'j');
        assert_eq!(app.current_id(), Some(2));
        press(&mut app, 'n');
        assert_eq!(app.session.decision(2), Decision::NoMatch);
        press(&mut app, 'G');
        assert_eq!(app.current_id(), Some(3));
        press(&mut app, 'j');
        assert_eq!(app.current_id(), Some(3));
    }

    #[test]
    fn pending_filter_drops_decided_rows() {
        let mut app = app();
        press(&mut app, 'p');
        press(&mut app, '1');
        assert_eq!(app.session.decision(1), Decision::MatchedTo(10));
        // Row 1 left the pending view; the cursor now sits on the next row.
        assert_eq!(app.visible_ids(), vec![2, 3]);
        assert_eq!(app.current_id(), Some(2));
        assert_eq!(app.session.counts().matched, 1);
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut app = app();
        press(&mut app, 'n');
        press(&mut app, 'R');
        press(&mut app, 'q');
        assert!(!app.should_quit);
        assert_eq!(app.session.decision(1), Decision::NoMatch);

        press(&mut app, 'R');
        press(&mut app, 'y');
        assert!(app.session.state().is_empty());
    }

    #[test]
    fn tab_cycles_filters() {
        let mut app = app();
        let order: Vec<StatusFilter> = (0..4)
            .map(|_| {
                if let Some(action) = app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)) {
                    app.dispatch(action);
                }
                app.session.filter()
            })
            .collect();
        assert_eq!(
            order,
            vec![
                StatusFilter::Matched,
                StatusFilter::Pending,
                StatusFilter::NoMatch,
                StatusFilter::All
            ]
        );
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = app();
        press(&mut app, '?');
        assert!(app.show_help);
        press(&mut app, 'q');
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn decided_row_ignores_digits() {
        let mut app = app();
        press(&mut app, 'n');
        assert_eq!(app.handle_key(key('1')), None);
    }
}
