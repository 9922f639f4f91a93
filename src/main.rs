// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::time::ChronoLocal;

use expense_recap::export::{CSV_EXTENSION, DOCUMENT_EXTENSION, JSON_EXTENSION, SPREADSHEET_EXTENSION};
use expense_recap::{
    artifact_file_name, format_currency, group_with, project, text_lines, write_atomic, write_csv,
    write_paginated_table, write_spreadsheet, ClassifierConfig, DocumentStyle, ExportRow,
    KeywordClassifier, SheetStyle, Summary, TableView,
};

/// Turn the extracted text of a travel-expense report into grouped recaps
#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
    /// Extracted report text, one paragraph per line ("-" reads stdin)
    input: PathBuf,

    /// Directory the exports are written to
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Output formats (repeatable); defaults to xlsx and pdf
    #[clap(short, long, value_enum)]
    format: Vec<OutputFormat>,

    /// JSON file overriding the title marker, keywords or default title
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Show the grouped table in the terminal after exporting
    #[cfg(feature = "tui")]
    #[clap(short, long)]
    preview: bool,

    /// More logging (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xlsx,
    Pdf,
    Csv,
    Json,
    All,
}

impl OutputFormat {
    fn expand(requested: &[OutputFormat]) -> Vec<OutputFormat> {
        let mut formats = Vec::new();
        let requested = if requested.is_empty() {
            &[OutputFormat::Xlsx, OutputFormat::Pdf][..]
        } else {
            requested
        };

        for format in requested {
            let expanded: &[OutputFormat] = match format {
                OutputFormat::All => &[
                    OutputFormat::Xlsx,
                    OutputFormat::Pdf,
                    OutputFormat::Csv,
                    OutputFormat::Json,
                ],
                single => std::slice::from_ref(single),
            };
            for f in expanded {
                if !formats.contains(f) {
                    formats.push(*f);
                }
            }
        }
        formats
    }

    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => SPREADSHEET_EXTENSION,
            OutputFormat::Pdf => DOCUMENT_EXTENSION,
            OutputFormat::Csv => CSV_EXTENSION,
            OutputFormat::Json => JSON_EXTENSION,
            OutputFormat::All => "",
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("❌ Export failed: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read report text from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("Failed to read report text: {}", input.display()))
    }
}

fn run(args: &Args) -> Result<()> {
    println!("🧾 Expense Recap v{}", expense_recap::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Settings
    let config = match &args.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };
    let classifier = KeywordClassifier::new(config);

    // 2. Read and group
    println!("\n📂 Reading report text...");
    let text = read_input(&args.input)?;
    let lines = text_lines(&text);
    println!("✓ {} non-blank lines", lines.len());

    let doc = group_with(lines, &classifier);
    let rows = project(&doc);
    let summary = Summary::from_rows(&rows);

    println!("\n📊 {}", doc.title);
    println!("✓ Entries: {}", summary.entries);
    println!("✓ People: {}", summary.people);
    println!("✓ Grand total: {}", format_currency(summary.grand_total));
    if rows.is_empty() {
        tracing::warn!("No expense lines were recognised; exports will only hold the total row");
    }

    // 3. Export
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.out_dir.display()))?;

    println!("\n💾 Writing exports...");
    for format in OutputFormat::expand(&args.format) {
        let bytes = render(format, &rows, &doc.title)?;
        let path = args
            .out_dir
            .join(artifact_file_name(&doc.title, format.extension()));
        write_atomic(&path, &bytes)?;
        println!("✓ {}", path.display());
    }

    // 4. Optional terminal preview
    #[cfg(feature = "tui")]
    if args.preview {
        let mut app = ui::App::new(doc.title.clone(), rows);
        ui::run_ui(&mut app)?;
    }

    println!("\n✅ Done");
    Ok(())
}

fn render(format: OutputFormat, rows: &[ExportRow], title: &str) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => write_spreadsheet(rows, title, &SheetStyle::default()),
        OutputFormat::Pdf => write_paginated_table(rows, title, &DocumentStyle::default()),
        OutputFormat::Csv => write_csv(rows),
        OutputFormat::Json => TableView::new(title, rows.to_vec()).to_json(),
        OutputFormat::All => unreachable!("expanded before rendering"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        assert_eq!(
            OutputFormat::expand(&[]),
            vec![OutputFormat::Xlsx, OutputFormat::Pdf]
        );
    }

    #[test]
    fn test_all_expands_without_duplicates() {
        assert_eq!(
            OutputFormat::expand(&[OutputFormat::Pdf, OutputFormat::All]),
            vec![
                OutputFormat::Pdf,
                OutputFormat::Xlsx,
                OutputFormat::Csv,
                OutputFormat::Json
            ]
        );
    }

    #[test]
    fn test_run_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("laporan.txt");
        fs::write(
            &input,
            "Laporan Perjalanan Dinas\n\nAndi\nTiket pesawat 500.000\nPenginapan hotel 750000\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "expense-recap",
            input.to_str().unwrap(),
            "--out-dir",
            dir.path().to_str().unwrap(),
            "--format",
            "all",
        ]);
        run(&args).unwrap();

        for ext in ["xlsx", "pdf", "csv", "json"] {
            assert!(dir.path().join(format!("Laporan Dinas.{}", ext)).exists(), "{}", ext);
        }
    }
}
