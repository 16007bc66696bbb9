//! Shared CLI definitions for airdash.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Default listings file, looked up in the working directory.
pub const DEFAULT_DATA_FILE: &str = "Airbnb_Data.csv";

/// Which of the two dashboards to run.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DashboardVariant {
    /// Metric radio buttons, histogram with mean line, "new visualization" picker
    Metrics,
    /// Chart kind selector with a column picker filtered by column type
    Builder,
}

/// How the selectable columns are derived from the loaded file.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColumnPolicyKind {
    /// Hand-curated list of listing columns (config: dashboard.fixed_columns)
    Fixed,
    /// Every loaded column except the denylist (config: dashboard.denylist)
    Denylist,
}

/// What to do when a fixed-list column is missing from the loaded file.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum MissingColumnPolicy {
    /// Refuse to start and name the missing columns
    Fail,
    /// Drop missing columns from the selectable set
    Skip,
    /// Keep missing columns selectable; charting one is a fatal error
    Keep,
}

impl MissingColumnPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Keep => "keep",
        }
    }
}

/// Compression suffixes polars decompresses transparently when reading CSV.
pub fn is_compressed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "gz" | "zst" | "zstd"))
        .unwrap_or(false)
}

/// Command-line arguments for airdash
#[derive(Clone, Parser, Debug)]
#[command(
    name = "airdash",
    version,
    about = "Airbnb listings dashboard in the terminal"
)]
pub struct Args {
    /// Path to the listings file (CSV, optionally .gz or .zst compressed)
    #[arg(value_name = "PATH", default_value = DEFAULT_DATA_FILE)]
    pub path: PathBuf,

    /// Dashboard to show (overrides config dashboard.variant)
    #[arg(long = "variant", value_enum)]
    pub variant: Option<DashboardVariant>,

    /// Selectable column policy (overrides config dashboard.column_policy)
    #[arg(long = "columns", value_enum)]
    pub column_policy: Option<ColumnPolicyKind>,

    /// Handling of fixed-list columns absent from the file (overrides config dashboard.missing_columns)
    #[arg(long = "missing-columns", value_enum)]
    pub missing_columns: Option<MissingColumnPolicy>,

    /// Specify the delimiter to use when reading the file
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Number of rows used to infer column types (0 = scan the whole file)
    #[arg(long = "infer-schema-length", value_name = "N")]
    pub infer_schema_length: Option<usize>,

    /// Rows per table page (default: 11)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Histogram bin count (default: 0 = automatic)
    #[arg(long = "bins", value_name = "N")]
    pub histogram_bins: Option<usize>,

    /// Directory exported figures are written to (default: current directory)
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Enable debug mode to show operational information and debug logging
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Generate default configuration file at ~/.config/airdash/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    let usage = cmd.render_usage();
    out.push_str(&usage.to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let placeholder: String = arg
            .get_value_names()
            .map(|names| {
                names
                    .iter()
                    .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        let option_str = if arg.is_positional() {
            format!("[{placeholder}]")
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            if arg.get_action().takes_values() && !placeholder.is_empty() {
                format!("{op} {placeholder}")
            } else {
                op
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}
