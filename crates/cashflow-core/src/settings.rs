use clap::Parser;
use std::path::PathBuf;

use crate::models::TextEncoding;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Monthly cash-flow report for semicolon-delimited bank statement exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cashflow-report",
    about = "Monthly cash-flow report for semicolon-delimited bank statement exports",
    version
)]
pub struct Settings {
    /// Statement export to analyse (`-` reads standard input)
    #[arg(value_name = "FILE", env = "CASHFLOW_FILE")]
    pub file: String,

    /// Output mode
    #[arg(long, default_value = "tui", env = "CASHFLOW_OUTPUT", value_parser = ["tui", "text", "json"])]
    pub output: String,

    /// Text encoding of the export
    #[arg(long, default_value = "latin1", env = "CASHFLOW_ENCODING", value_parser = ["latin1", "utf-8"])]
    pub encoding: String,

    /// Currency symbol appended to amounts
    #[arg(long, default_value = "€", env = "CASHFLOW_CURRENCY_SYMBOL")]
    pub currency_symbol: String,

    /// Display theme
    #[arg(long, default_value = "auto", env = "CASHFLOW_THEME", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", env = "CASHFLOW_LOG_LEVEL", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, env = "CASHFLOW_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Leave the timestamp and timings out of the JSON output
    #[arg(long, env = "CASHFLOW_REPRODUCIBLE")]
    pub reproducible: bool,
}

/// Where the finished report is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Interactive terminal dashboard.
    Tui,
    /// Plain text on stdout.
    Text,
    /// JSON document on stdout.
    Json,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`load`](Self::load) but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    pub fn output_mode(&self) -> OutputMode {
        match self.output.as_str() {
            "text" => OutputMode::Text,
            "json" => OutputMode::Json,
            _ => OutputMode::Tui,
        }
    }

    pub fn text_encoding(&self) -> TextEncoding {
        match self.encoding.as_str() {
            "utf-8" => TextEncoding::Utf8,
            _ => TextEncoding::Latin1,
        }
    }

    /// `true` when the statement should be read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.file == "-"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["cashflow-report", "movements.csv"]);

        assert_eq!(settings.file, "movements.csv");
        assert_eq!(settings.output, "tui");
        assert_eq!(settings.encoding, "latin1");
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.reproducible);
    }

    #[test]
    fn test_settings_output_modes() {
        let text = Settings::parse_from(["cashflow-report", "f.csv", "--output", "text"]);
        assert_eq!(text.output_mode(), OutputMode::Text);

        let json = Settings::parse_from(["cashflow-report", "f.csv", "--output", "json"]);
        assert_eq!(json.output_mode(), OutputMode::Json);

        let tui = Settings::parse_from(["cashflow-report", "f.csv"]);
        assert_eq!(tui.output_mode(), OutputMode::Tui);
    }

    #[test]
    fn test_settings_rejects_unknown_output() {
        let result = Settings::try_parse_from(["cashflow-report", "f.csv", "--output", "html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_encoding() {
        let utf8 = Settings::parse_from(["cashflow-report", "f.csv", "--encoding", "utf-8"]);
        assert_eq!(utf8.text_encoding(), TextEncoding::Utf8);

        let default = Settings::parse_from(["cashflow-report", "f.csv"]);
        assert_eq!(default.text_encoding(), TextEncoding::Latin1);
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings = Settings::load_from_args(["cashflow-report", "f.csv", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_settings_log_file() {
        let settings =
            Settings::parse_from(["cashflow-report", "f.csv", "--log-file", "/tmp/cashflow.log"]);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/cashflow.log")));
    }

    #[test]
    fn test_settings_reproducible_flag() {
        let settings = Settings::parse_from([
            "cashflow-report",
            "f.csv",
            "--output",
            "json",
            "--reproducible",
        ]);
        assert!(settings.reproducible);
        assert_eq!(settings.output_mode(), OutputMode::Json);
    }

    #[test]
    fn test_settings_stdin_marker() {
        let settings = Settings::parse_from(["cashflow-report", "-"]);
        assert!(settings.reads_stdin());
    }
}
