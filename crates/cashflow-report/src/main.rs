mod bootstrap;

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use cashflow_core::settings::{OutputMode, Settings};
use cashflow_core::CashFlowError;
use cashflow_data::analysis::{analyze_file, analyze_reader, AnalysisOutcome};
use cashflow_data::reader::ReaderOptions;
use cashflow_ui::app::App;
use cashflow_ui::plain;

fn main() -> ExitCode {
    let settings = Settings::load();

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    let mode = settings.output_mode();

    // The dashboard owns the terminal, so its logs go to a file.
    let log_file = match (&settings.log_file, mode) {
        (Some(path), _) => Some(path.clone()),
        (None, OutputMode::Tui) => {
            bootstrap::ensure_directories()?;
            Some(bootstrap::default_log_path())
        }
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("cashflow-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Output: {}, Encoding: {}, Theme: {}",
        settings.file,
        settings.output,
        settings.encoding,
        settings.theme
    );

    let options = ReaderOptions::with_encoding(settings.text_encoding());
    let outcome = if settings.reads_stdin() {
        analyze_reader(std::io::stdin().lock(), &options)?
    } else {
        analyze_file(Path::new(&settings.file), &options)?
    };

    if let AnalysisOutcome::Empty(empty) = &outcome {
        tracing::warn!(
            "No usable rows in {} lines read",
            empty.metadata.stats.lines_read
        );
    }

    match mode {
        OutputMode::Json => {
            println!("{}", render_json(outcome, settings.reproducible)?);
        }
        OutputMode::Text => {
            print!("{}", plain::render_text(&outcome, &settings.currency_symbol));
        }
        OutputMode::Tui => {
            if !std::io::stdout().is_terminal() {
                return Err(CashFlowError::Terminal(
                    "standard output is not a terminal; use --output text or --output json"
                        .to_string(),
                )
                .into());
            }
            let app = App::new(
                &settings.theme,
                settings.currency_symbol.clone(),
                source_name(settings),
            );
            app.run(&outcome)
                .map_err(|e| CashFlowError::Terminal(e.to_string()))
                .context("terminal session failed")?;
        }
    }

    Ok(())
}

/// Pretty JSON document for `--output json`.
fn render_json(outcome: AnalysisOutcome, reproducible: bool) -> Result<String> {
    let outcome = if reproducible {
        outcome.without_run_details()
    } else {
        outcome
    };
    Ok(serde_json::to_string_pretty(&outcome).map_err(CashFlowError::from)?)
}

/// File name shown in the dashboard header.
fn source_name(settings: &Settings) -> String {
    if settings.reads_stdin() {
        return "stdin".to_string();
    }
    Path::new(&settings.file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| settings.file.clone())
}

/// The one-line message printed on failure.
fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CashFlowError>() {
        Some(e) => e.user_message(),
        None => format!("Error processing the file: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_name_uses_file_name() {
        let settings = Settings::load_from_args(["cashflow-report", "/data/exports/Movimientos.csv"]);
        assert_eq!(source_name(&settings), "Movimientos.csv");
    }

    #[test]
    fn test_source_name_stdin() {
        let settings = Settings::load_from_args(["cashflow-report", "-"]);
        assert_eq!(source_name(&settings), "stdin");
    }

    #[test]
    fn test_render_json_reproducible_matches_across_runs() {
        let input = b"01/01/2024;01/01/2024;001;Nomina;;0001;1000,00;1000,00;R1\n";
        let run = || {
            let outcome = analyze_reader(&input[..], &ReaderOptions::default()).unwrap();
            render_json(outcome, true).unwrap()
        };

        let first = run();
        assert_eq!(first, run());
        assert!(!first.contains("generated_at"));
    }

    #[test]
    fn test_render_json_keeps_run_details_by_default() {
        let input = b"01/01/2024;01/01/2024;001;Nomina;;0001;1000,00;1000,00;R1\n";
        let outcome = analyze_reader(&input[..], &ReaderOptions::default()).unwrap();
        let json = render_json(outcome, false).unwrap();
        assert!(json.contains("generated_at"));
        assert!(json.contains("\"status\": \"report\""));
    }

    #[test]
    fn test_user_message_for_domain_error() {
        let err: anyhow::Error =
            CashFlowError::UnrecoverableInput("the file is empty".to_string()).into();
        assert_eq!(
            user_message(&err),
            "Error processing the file: Unreadable input: the file is empty"
        );
    }

    #[test]
    fn test_user_message_for_other_error() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(user_message(&err), "Error processing the file: disk on fire");
    }
}
