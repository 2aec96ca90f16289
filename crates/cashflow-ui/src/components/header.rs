use crate::themes::Theme;
use cashflow_core::formatting::NOT_AVAILABLE;
use cashflow_core::models::MonthlySummary;
use ratatui::text::{Line, Span};

/// Application title shown in the first header line.
pub const TITLE: &str = "CASH FLOW REPORT";

/// Dashboard header rendering four lines:
///
/// 1. Application title (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Source and period in `[ source | period ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// File name of the statement, or `"stdin"`.
    pub source: &'a str,
    /// Covered period, e.g. `"January 2024 – March 2024"`.
    pub period: &'a str,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: &'a str, period: &'a str, theme: &'a Theme) -> Self {
        Self {
            source,
            period,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            Line::from(Span::styled(TITLE, self.theme.header)),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.period, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

/// Covered period as `"<first month> – <last month>"`, or a single month.
pub fn period_label(months: &[MonthlySummary]) -> String {
    match (months.first(), months.last()) {
        (Some(first), Some(last)) if first.month != last.month => {
            format!("{} – {}", first.month.label(), last.month.label())
        }
        (Some(only), _) => only.month.label(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
