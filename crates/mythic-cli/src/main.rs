//! `mythic`: check MythicMobs configuration files from the command line.
//!
//! Every file named on the command line is loaded into one workspace, so
//! references between them resolve:
//!
//!   mythic check Skills/heal.yml Mobs/king.yml
//!   mythic check --format json --data data.json Skills/*.yml

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::WrapErr;
use mythic_analyzer::{Diagnostic, MythicData, SchemaBindings, Workspace};
use serde::Serialize;
use tracing::info;

const EXIT_SUCCESS: u8 = 0;
const EXIT_VALIDATION_ERROR: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "mythic", version, about = "Validate MythicMobs configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate files and report diagnostics
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    /// Files to load into the workspace
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON file overriding the bundled game data
    #[arg(long)]
    data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Human)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Human,
    Json,
}

#[derive(Serialize)]
struct FileReport<'a> {
    uri: &'a str,
    diagnostics: Vec<&'a Diagnostic>,
}

fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check(args) => {
            let workspace = check(&args)?;
            let mut stdout = std::io::stdout().lock();
            match args.format {
                Format::Human => write_human(&workspace, &mut stdout)?,
                Format::Json => {
                    serde_json::to_writer_pretty(&mut stdout, &reports(&workspace))?;
                    writeln!(stdout)?;
                }
            }
            let failed = workspace.documents().any(|d| d.has_errors());
            Ok(ExitCode::from(if failed {
                EXIT_VALIDATION_ERROR
            } else {
                EXIT_SUCCESS
            }))
        }
    }
}

/// Load and process every file of `args`.
fn check(args: &CheckArgs) -> eyre::Result<Workspace> {
    let data = match &args.data {
        Some(path) => MythicData::load(path)?,
        None => MythicData::default(),
    };
    let mut workspace = Workspace::new(SchemaBindings::default(), data);
    for file in &args.files {
        workspace
            .load_file(file)
            .wrap_err_with(|| format!("loading {}", file.display()))?;
    }
    workspace.process_all();
    info!(files = workspace.len(), "checked");
    Ok(workspace)
}

fn reports(workspace: &Workspace) -> Vec<FileReport<'_>> {
    workspace
        .documents()
        .map(|document| FileReport {
            uri: document.uri(),
            diagnostics: document.diagnostics().collect(),
        })
        .collect()
}

fn write_human<W: Write>(workspace: &Workspace, out: &mut W) -> std::io::Result<()> {
    let mut total = 0;
    for document in workspace.documents() {
        let count = document.diagnostics().count();
        if count == 0 {
            continue;
        }
        total += count;
        write!(out, "{}", document.render())?;
    }
    match total {
        0 => writeln!(out, "No problems found."),
        1 => writeln!(out, "Found 1 problem."),
        n => writeln!(out, "Found {n} problems."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(sources: &[(&str, &str)]) -> Workspace {
        let mut workspace = Workspace::default();
        for (uri, source) in sources {
            workspace.load(*uri, *source);
        }
        workspace.process_all();
        workspace
    }

    #[test]
    fn test_parse_check_args() {
        let cli = Cli::try_parse_from(["mythic", "check", "a.yml", "b.yml", "--format", "json"])
            .unwrap();
        let Command::Check(args) = cli.command;
        assert_eq!(args.files, [PathBuf::from("a.yml"), PathBuf::from("b.yml")]);
        assert_eq!(args.format, Format::Json);
        assert!(args.data.is_none());
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Cli::try_parse_from(["mythic", "check"]).is_err());
    }

    #[test]
    fn test_json_report() {
        let workspace = workspace(&[(
            "file:///srv/MythicMobs/Skills/a.yml",
            "heal1:\n  Skills:\n  - damage @Self @World\n",
        )]);
        let json = serde_json::to_value(reports(&workspace)).unwrap();
        let diagnostic = &json[0]["diagnostics"][0];
        assert_eq!(json[0]["uri"], "file:///srv/MythicMobs/Skills/a.yml");
        assert_eq!(diagnostic["code"], "mythic-skill-too-many-targeters");
        assert_eq!(diagnostic["severity"], "error");
        assert_eq!(diagnostic["range"]["start"]["line"], 2);
    }

    #[test]
    fn test_human_summary() {
        let workspace = workspace(&[(
            "file:///srv/MythicMobs/Skills/a.yml",
            "heal1:\n  Skills: []\n",
        )]);
        let mut out = Vec::new();
        write_human(&workspace, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No problems found.\n");
    }
}
