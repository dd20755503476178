//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `rootline_core` linkage with a deterministic text rendering.
//! - Load a family JSON file, or fall back to the built-in demo family.

use clap::{Parser, ValueEnum};
use log::info;
use rootline_core::layout::CardOptions;
use rootline_core::{
    export, load_family, BuildOptions, CollapseState, ExportFormat, FamilyArchive, LayoutEngine,
    Settings, TextRenderer, TreeBuilder,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum OutputFormat {
    /// Indented outline with layout summary.
    #[default]
    Text,
    Json,
    Csv,
    Gedcom,
}

impl OutputFormat {
    fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Text => None,
            Self::Json => Some(ExportFormat::Json),
            Self::Csv => Some(ExportFormat::Csv),
            Self::Gedcom => Some(ExportFormat::Gedcom),
        }
    }
}

/// Render or export a family tree.
#[derive(Debug, Parser)]
#[command(name = "rootline_cli", version)]
struct Cli {
    /// Family JSON file keyed by person id; the demo family when omitted.
    family_path: Option<PathBuf>,

    /// Render only the tree rooted at this person id.
    #[arg(long)]
    root: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Absolute directory for rolling log files; logging stays off without it.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<String, String> {
    if let Some(log_dir) = &cli.log_dir {
        rootline_core::init_logging(rootline_core::default_log_level().as_str(), log_dir)
            .map_err(|err| err.to_string())?;
    }

    let archive = match &cli.family_path {
        Some(path) => {
            let family = load_family(path).map_err(|err| err.to_string())?;
            FamilyArchive::from_snapshot(family)
        }
        None => rootline_core::seed::demo_archive(),
    };
    info!(
        "event=cli_load module=cli status=ok persons={} source={}",
        archive.persons().len(),
        if cli.family_path.is_some() { "file" } else { "demo" }
    );

    if let Some(format) = cli.format.export_format() {
        return export(archive.lookup(), format).map_err(|err| err.to_string());
    }

    let settings = Settings::default();
    let builder = TreeBuilder::new(BuildOptions::from_settings(&settings));
    let forest = match &cli.root {
        Some(root) => builder.build_selected(archive.lookup(), Some(root.as_str())),
        None => builder.build_forest(archive.lookup()),
    };
    let collapse = CollapseState::new();
    let layout = LayoutEngine::from_settings(&settings).layout_forest(&forest, &collapse);
    let outline =
        TextRenderer::new(CardOptions::from_settings(&settings)).render_forest(&forest, &collapse);
    Ok(format!(
        "{outline}\n\nrootline_core ping={} version={} trees={} cards={} size={}x{}",
        rootline_core::ping(),
        rootline_core::core_version(),
        forest.trees.len(),
        layout.cards.len(),
        layout.size.width,
        layout.size.height
    ))
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("rootline_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, OutputFormat};
    use clap::{CommandFactory, Parser};
    use std::path::Path;

    fn parse(raw: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("rootline_cli").chain(raw.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_path_and_flags() {
        let cli = parse(&["family.json", "--root", "3", "--format", "csv"]).unwrap();
        assert_eq!(cli.family_path.as_deref(), Some(Path::new("family.json")));
        assert_eq!(cli.root.as_deref(), Some("3"));
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(parse(&[]).unwrap().format, OutputFormat::Text);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&["--root"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["--format", "xml"]).is_err());
    }

    #[test]
    fn demo_run_renders_outline() {
        let output = run(parse(&[]).unwrap()).unwrap();
        assert!(output.starts_with("Ram Bahadur Shrestha (b. 1880, d. 1940) & Sita Devi"));
        assert!(output.contains("rootline_core ping=pong"));
        assert!(output.contains("trees=3"));
    }

    #[test]
    fn demo_csv_export_and_gedcom_error() {
        let csv = run(parse(&["--format", "csv"]).unwrap()).unwrap();
        assert!(csv.starts_with("ID,Name,Birth Year"));
        let err = run(parse(&["--format", "gedcom"]).unwrap()).unwrap_err();
        assert!(err.contains("not supported"));
    }
}
