use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use preflight_analysis::enforcement::reporters::console::ConsoleReporter;
use preflight_analysis::enforcement::reporters::{create_reporter, Reporter};
use preflight_analysis::{CheckId, Preflight, RunReport};
use preflight_core::config::{CliOverrides, PreflightConfig};
use preflight_core::errors::{PipelineError, ReportError};
use preflight_core::PreflightErrorCode;

/// Exit status for configuration, load, and report-writing failures.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "preflight", version, about = "Static checks for script projects")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Project root containing the category directories
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file to use instead of <root>/preflight.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report format: console or json
    #[arg(long, global = true, default_value = "console")]
    format: String,

    /// Write the report to a file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// File extension to scan (repeatable, replaces the configured list)
    #[arg(long = "ext", global = true)]
    extensions: Vec<String>,

    /// Disable ANSI colors in console output
    #[arg(long, global = true)]
    no_color: bool,

    /// Hide informational findings in console output
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run every check and print the project structure
    Check,

    /// Verify that every menu binding names a declared function
    Functions {
        /// Declared-but-unbound functions that are not reported as unused
        #[arg(long = "reserved")]
        reserved: Vec<String>,
    },

    /// Check that parentheses and braces are balanced
    Balance {
        /// raw or lexical
        #[arg(long)]
        mode: Option<String>,
    },

    /// Scan the whole tree for merge-conflict markers and forbidden patterns
    Scan,

    /// Report missing input validation and error handling (advisory)
    Heuristics {
        #[arg(long)]
        validation_window: Option<usize>,
        #[arg(long)]
        error_window: Option<usize>,
    },

    /// Per-category file, function, and line counts
    Structure,
}

impl Command {
    fn overrides(&self, global: &GlobalArgs) -> CliOverrides {
        let mut overrides = CliOverrides {
            config_path: global.config.clone(),
            extensions: global.extensions.clone(),
            ..Default::default()
        };
        match self {
            Command::Functions { reserved } => overrides.reserved_entry_points = reserved.clone(),
            Command::Balance { mode } => overrides.balance_mode = mode.clone(),
            Command::Heuristics {
                validation_window,
                error_window,
            } => {
                overrides.validation_window = *validation_window;
                overrides.error_handling_window = *error_window;
            }
            Command::Check | Command::Scan | Command::Structure => {}
        }
        overrides
    }
}

fn main() -> ExitCode {
    preflight_core::tracing::init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<PipelineError>() {
                Some(pipeline) => eprintln!("error: {}", pipeline.tagged()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let global = &cli.global;
    let config = PreflightConfig::load(&global.root, Some(&cli.cmd.overrides(global)))
        .map_err(PipelineError::from)?;
    let reporter = reporter(global).map_err(PipelineError::from)?;
    let preflight = Preflight::from_config(&global.root, &config)?;

    let report = match &cli.cmd {
        Command::Check => {
            let load = preflight.load().map_err(PipelineError::from)?;
            let structure = preflight.structure(&load);
            preflight.run_all(&load).with_structure(structure)
        }
        Command::Functions { .. } => checks(&preflight, &[CheckId::Symbols])?,
        Command::Balance { .. } => checks(&preflight, &[CheckId::Balance])?,
        Command::Scan => {
            let load = preflight.load_tree().map_err(PipelineError::from)?;
            preflight.run(&[CheckId::Patterns], &load)
        }
        Command::Heuristics { .. } => checks(&preflight, &[CheckId::Heuristics])?,
        Command::Structure => {
            let load = preflight.load().map_err(PipelineError::from)?;
            let structure = preflight.structure(&load);
            RunReport::new(load.root.clone(), load.documents.len(), load.failures, vec![])
                .with_structure(structure)
        }
    };

    let text = reporter.generate(&report).map_err(PipelineError::from)?;
    emit(&text, global.output.as_deref())?;

    tracing::debug!(status = ?report.status(), "exit");
    Ok(ExitCode::from(report.exit_code() as u8))
}

fn checks(preflight: &Preflight, ids: &[CheckId]) -> Result<RunReport, PipelineError> {
    let load = preflight.load()?;
    Ok(preflight.run(ids, &load))
}

/// Console output is colored only when it goes to a terminal.
fn reporter(global: &GlobalArgs) -> Result<Box<dyn Reporter>, ReportError> {
    if global.format != "console" {
        return create_reporter(&global.format);
    }
    let use_color =
        !global.no_color && global.output.is_none() && std::io::stdout().is_terminal();
    Ok(Box::new(ConsoleReporter {
        use_color,
        show_info: !global.quiet,
    }))
}

fn emit(text: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|source| ReportError::Write {
                    path: path.to_path_buf(),
                    source,
                })
                .map_err(PipelineError::from)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("failed to write report to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "preflight", "balance", "--mode", "lexical", "--root", "proj", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.global.root, PathBuf::from("proj"));
        assert_eq!(cli.global.format, "json");
        let overrides = cli.cmd.overrides(&cli.global);
        assert_eq!(overrides.balance_mode.as_deref(), Some("lexical"));
        assert!(overrides.config_path.is_none());
    }

    #[test]
    fn test_heuristic_window_overrides() {
        let cli = Cli::try_parse_from([
            "preflight",
            "heuristics",
            "--validation-window",
            "8",
            "--error-window",
            "3",
            "--config",
            "ci.toml",
        ])
        .unwrap();
        let overrides = cli.cmd.overrides(&cli.global);
        assert_eq!(overrides.validation_window, Some(8));
        assert_eq!(overrides.error_handling_window, Some(3));
        assert_eq!(overrides.config_path, Some(PathBuf::from("ci.toml")));
    }

    #[test]
    fn test_unknown_format_is_a_report_error() {
        let cli = Cli::try_parse_from(["preflight", "check", "--format", "sarif"]).unwrap();
        assert!(matches!(
            reporter(&cli.global),
            Err(ReportError::UnknownFormat(f)) if f == "sarif"
        ));
    }

    #[test]
    fn test_repeatable_extensions_and_reserved() {
        let cli = Cli::try_parse_from([
            "preflight", "functions", "--reserved", "onOpen", "--reserved", "doGet", "--ext", "gs",
            "--ext", "js",
        ])
        .unwrap();
        let overrides = cli.cmd.overrides(&cli.global);
        assert_eq!(overrides.reserved_entry_points, vec!["onOpen", "doGet"]);
        assert_eq!(overrides.extensions, vec!["gs", "js"]);
    }
}
