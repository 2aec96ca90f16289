//! Main application state and TUI event loop for the cash-flow report.
//!
//! [`App`] owns the theme, the current view and the transaction scroll
//! position. It renders a finished [`AnalysisOutcome`] until the user quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use cashflow_data::analysis::{AnalysisOutcome, CashFlowReport};

use crate::chart_view;
use crate::components::header::{period_label, Header};
use crate::components::metrics::KpiPanel;
use crate::table_view;
use crate::themes::Theme;

/// Rows moved by PgUp / PgDn.
const PAGE_SIZE: usize = 10;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// KPIs, monthly table and chart.
    Dashboard,
    /// Scrollable list of cleaned transactions.
    Transactions,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the cash-flow TUI.
pub struct App {
    pub theme: Theme,
    /// Currency symbol appended to amounts.
    pub currency: String,
    /// Display name of the statement source.
    pub source: String,
    pub view_mode: ViewMode,
    /// Index of the first transaction shown in the transactions view.
    pub scroll: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, currency: String, source: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            currency,
            source,
            view_mode: ViewMode::Dashboard,
            scroll: 0,
            should_quit: false,
        }
    }

    // ── Public event loop ─────────────────────────────────────────────────────

    /// Show `outcome` until `q`, `Q`, `Esc` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so resizes are
    /// picked up without a key press.
    pub fn run(mut self, outcome: &AnalysisOutcome) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let row_count = match outcome {
            AnalysisOutcome::Report(r) => r.transactions.len(),
            AnalysisOutcome::Empty(_) => 0,
        };

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, outcome)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key, row_count)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press. `row_count` bounds the scroll position.
    pub fn handle_key(&mut self, key: KeyEvent, row_count: usize) {
        let last = row_count.saturating_sub(1);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.view_mode = match self.view_mode {
                    ViewMode::Dashboard => ViewMode::Transactions,
                    ViewMode::Transactions => ViewMode::Dashboard,
                };
                debug!("Switched to {:?} view", self.view_mode);
            }
            KeyCode::Down => self.scroll = (self.scroll + 1).min(last),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = (self.scroll + PAGE_SIZE).min(last),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE_SIZE),
            KeyCode::Home => self.scroll = 0,
            KeyCode::End => self.scroll = last,
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame, outcome: &AnalysisOutcome) {
        let area = frame.area();
        match outcome {
            AnalysisOutcome::Empty(empty) => {
                table_view::render_no_data(frame, area, empty.metadata.stats.lines_read, &self.theme)
            }
            AnalysisOutcome::Report(report) => self.render_report(frame, area, report),
        }
    }

    fn render_report(&self, frame: &mut Frame, area: Rect, report: &CashFlowReport) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let period = period_label(&report.monthly);
        let header = Header::new(&self.source, &period, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        match self.view_mode {
            ViewMode::Dashboard => self.render_dashboard(frame, body_area, report),
            ViewMode::Transactions => table_view::render_transactions_table(
                frame,
                body_area,
                &report.transactions,
                self.scroll,
                &self.currency,
                &self.theme,
            ),
        }

        let help = match self.view_mode {
            ViewMode::Dashboard => "Tab: transactions  q: quit",
            ViewMode::Transactions => "Tab: dashboard  ↑/↓ PgUp/PgDn: scroll  q: quit",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(help, self.theme.dim))),
            footer_area,
        );
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect, report: &CashFlowReport) {
        let table_height = (report.monthly.len() as u16).saturating_add(4);
        let [top_area, chart_area] = Layout::vertical([
            Constraint::Length(table_height.max(10)),
            Constraint::Min(8),
        ])
        .areas(area);
        let [kpi_area, table_area] =
            Layout::horizontal([Constraint::Length(44), Constraint::Min(0)]).areas(top_area);

        let panel = KpiPanel::new(&report.kpis, &self.currency, &self.theme);
        frame.render_widget(
            Paragraph::new(Text::from(panel.to_lines())).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Key Figures "),
            ),
            kpi_area,
        );

        table_view::render_monthly_table(
            frame,
            table_area,
            &report.monthly,
            &self.currency,
            &self.theme,
        );
        chart_view::render_chart_view(
            frame,
            chart_area,
            &report.monthly,
            &self.currency,
            &self.theme,
        );
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
