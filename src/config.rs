use airdash_cli::{ColumnPolicyKind, DashboardVariant, MissingColumnPolicy};
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use supports_color::Stream;

use crate::schema::{ColumnPolicy, DEFAULT_DENYLIST, LISTING_COLUMNS};

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write default configuration to config file
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub file_loading: FileLoadingConfig,
    pub dashboard: DashboardConfig,
    pub display: DisplayConfig,
    pub export: ExportConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileLoadingConfig {
    pub delimiter: Option<u8>,
    /// Rows scanned to infer column types; 0 scans the whole file.
    pub infer_schema_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// "metrics" or "builder"
    pub variant: String,
    /// "fixed" or "denylist"; unset picks fixed for metrics and denylist for builder
    pub column_policy: Option<String>,
    pub fixed_columns: Vec<String>,
    pub denylist: Vec<String>,
    /// "fail", "skip" or "keep"
    pub missing_columns: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub page_size: usize,
    /// 0 picks a bin count from the data
    pub histogram_bins: usize,
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Empty means the current directory
    pub directory: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub error: String,
    pub dimmed: String,
    pub controls_bg: String,
    pub text_primary: String,
    pub table_header: String,
    pub table_border: String,
    pub modal_border: String,
    pub modal_border_active: String,
    pub modal_border_error: String,
    pub chart_bar: String,
    pub chart_line: String,
    pub mean_line: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            file_loading: FileLoadingConfig::default(),
            dashboard: DashboardConfig::default(),
            display: DisplayConfig::default(),
            export: ExportConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: "metrics".to_string(),
            column_policy: None,
            fixed_columns: LISTING_COLUMNS.iter().map(|s| s.to_string()).collect(),
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            missing_columns: "fail".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 11,
            histogram_bins: 0,
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            width: 1024,
            height: 768,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            secondary: "yellow".to_string(),
            error: "red".to_string(),
            dimmed: "dark_gray".to_string(),
            controls_bg: "indexed(236)".to_string(),
            text_primary: "white".to_string(),
            table_header: "white".to_string(),
            table_border: "cyan".to_string(),
            modal_border: "cyan".to_string(),
            modal_border_active: "yellow".to_string(),
            modal_border_error: "red".to_string(),
            chart_bar: "#636efa".to_string(),
            chart_line: "cyan".to_string(),
            mean_line: "red".to_string(),
        }
    }
}

// Configuration loading and merging
impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load from the given config directory. A missing file yields defaults;
    /// an unreadable or malformed one is an error.
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();
        config.merge(Self::load_user_config(manager)?);
        config.validate()?;
        Ok(config)
    }

    fn load_user_config(manager: &ConfigManager) -> Result<AppConfig> {
        let config_path = manager.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.file_loading.merge(other.file_loading);
        self.dashboard.merge(other.dashboard);
        self.display.merge(other.display);
        self.export.merge(other.export);
        self.theme.merge(other.theme);
        self.debug.merge(other.debug);
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        self.dashboard.variant()?;
        self.dashboard.missing_column_policy()?;
        if let Some(policy) = &self.dashboard.column_policy {
            parse_value::<ColumnPolicyKind>("column_policy", policy)?;
        }

        if self.display.page_size == 0 {
            return Err(eyre!("page_size must be greater than 0"));
        }

        if self.display.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }

        if self.export.width == 0 || self.export.height == 0 {
            return Err(eyre!("export width and height must be greater than 0"));
        }

        let parser = ColorParser::true_color();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

fn parse_value<T: ValueEnum>(field: &str, value: &str) -> Result<T> {
    T::from_str(value, true).map_err(|_| {
        let allowed: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        eyre!(
            "Invalid {}: '{}'. Must be one of: {}",
            field,
            value,
            allowed.join(", ")
        )
    })
}

impl DashboardConfig {
    pub fn variant(&self) -> Result<DashboardVariant> {
        parse_value("variant", self.variant.as_str())
    }

    pub fn missing_column_policy(&self) -> Result<MissingColumnPolicy> {
        parse_value("missing_columns", self.missing_columns.as_str())
    }

    /// Column policy for `variant`, with the configured lists.
    pub fn column_policy(&self, variant: DashboardVariant) -> Result<ColumnPolicy> {
        let kind = match &self.column_policy {
            Some(policy) => parse_value("column_policy", policy)?,
            None => match variant {
                DashboardVariant::Metrics => ColumnPolicyKind::Fixed,
                DashboardVariant::Builder => ColumnPolicyKind::Denylist,
            },
        };
        Ok(match kind {
            ColumnPolicyKind::Fixed => ColumnPolicy::Fixed(self.fixed_columns.clone()),
            ColumnPolicyKind::Denylist => ColumnPolicy::Denylist(self.denylist.clone()),
        })
    }

    pub fn merge(&mut self, other: Self) {
        let default = DashboardConfig::default();
        if other.variant != default.variant {
            self.variant = other.variant;
        }
        if other.column_policy.is_some() {
            self.column_policy = other.column_policy;
        }
        if other.fixed_columns != default.fixed_columns {
            self.fixed_columns = other.fixed_columns;
        }
        if other.denylist != default.denylist {
            self.denylist = other.denylist;
        }
        if other.missing_columns != default.missing_columns {
            self.missing_columns = other.missing_columns;
        }
    }
}

impl FileLoadingConfig {
    pub fn merge(&mut self, other: Self) {
        if other.delimiter.is_some() {
            self.delimiter = other.delimiter;
        }
        if other.infer_schema_length != FileLoadingConfig::default().infer_schema_length {
            self.infer_schema_length = other.infer_schema_length;
        }
    }
}

impl DisplayConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DisplayConfig::default();
        if other.page_size != default.page_size {
            self.page_size = other.page_size;
        }
        if other.histogram_bins != default.histogram_bins {
            self.histogram_bins = other.histogram_bins;
        }
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

impl ExportConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ExportConfig::default();
        if other.directory.is_some() {
            self.directory = other.directory;
        }
        if other.width != default.width {
            self.width = other.width;
        }
        if other.height != default.height {
            self.height = other.height;
        }
    }

    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        self.colors.merge(other.colors);
    }
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 14] {
        [
            ("primary", self.primary.as_str()),
            ("secondary", self.secondary.as_str()),
            ("error", self.error.as_str()),
            ("dimmed", self.dimmed.as_str()),
            ("controls_bg", self.controls_bg.as_str()),
            ("text_primary", self.text_primary.as_str()),
            ("table_header", self.table_header.as_str()),
            ("table_border", self.table_border.as_str()),
            ("modal_border", self.modal_border.as_str()),
            ("modal_border_active", self.modal_border_active.as_str()),
            ("modal_border_error", self.modal_border_error.as_str()),
            ("chart_bar", self.chart_bar.as_str()),
            ("chart_line", self.chart_line.as_str()),
            ("mean_line", self.mean_line.as_str()),
        ]
    }

    /// Validate all color strings can be parsed
    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();

        macro_rules! merge_color {
            ($($field:ident),+ $(,)?) => {
                $(
                    if other.$field != default.$field {
                        self.$field = other.$field;
                    }
                )+
            };
        }

        merge_color!(
            primary,
            secondary,
            error,
            dimmed,
            controls_bg,
            text_primary,
            table_header,
            table_border,
            modal_border,
            modal_border_active,
            modal_border_error,
            chart_bar,
            chart_line,
            mean_line,
        );
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        if other.enabled != DebugConfig::default().enabled {
            self.enabled = other.enabled;
        }
    }
}

/// Color parser with terminal capability detection
pub struct ColorParser {
    supports_true_color: bool,
    supports_256: bool,
    no_color: bool,
}

impl ColorParser {
    /// Create a new ColorParser with automatic terminal capability detection
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        let support = supports_color::on(Stream::Stdout);

        Self {
            supports_true_color: support.as_ref().map(|s| s.has_16m).unwrap_or(false),
            supports_256: support.as_ref().map(|s| s.has_256).unwrap_or(false),
            no_color,
        }
    }

    /// Parser that keeps hex colors as RGB regardless of the terminal.
    pub fn true_color() -> Self {
        Self {
            supports_true_color: true,
            supports_256: true,
            no_color: false,
        }
    }

    /// Parse a color string (hex, indexed or named) into a terminal color
    pub fn parse(&self, s: &str) -> Result<Color> {
        if self.no_color {
            return Ok(Color::Reset);
        }

        let trimmed = s.trim();

        if trimmed.starts_with('#') && trimmed.len() == 7 {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(self.convert_rgb_to_terminal_color(r, g, b));
        }

        if trimmed.to_lowercase().starts_with("indexed(") && trimmed.ends_with(')') {
            let num_str = &trimmed[8..trimmed.len() - 1];
            let num = num_str.parse::<u8>().map_err(|_| {
                eyre!(
                    "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                    trimmed
                )
            })?;
            return Ok(Color::Indexed(num));
        }

        let lower = trimmed.to_lowercase();
        match lower.as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),

            "bright_red" | "bright red" => Ok(Color::Indexed(9)),
            "bright_green" | "bright green" => Ok(Color::Indexed(10)),
            "bright_yellow" | "bright yellow" => Ok(Color::Indexed(11)),
            "bright_blue" | "bright blue" => Ok(Color::Indexed(12)),
            "bright_magenta" | "bright magenta" => Ok(Color::Indexed(13)),
            "bright_cyan" | "bright cyan" => Ok(Color::Indexed(14)),
            "bright_white" | "bright white" => Ok(Color::Indexed(15)),

            "gray" | "grey" | "dark_gray" | "dark gray" | "dark_grey" | "dark grey" => {
                Ok(Color::Indexed(8))
            }
            "light_gray" | "light gray" | "light_grey" | "light grey" => Ok(Color::Indexed(7)),

            "reset" => Ok(Color::Reset),

            _ => Err(eyre!(
                "Unknown color name: '{}'. Supported: basic ANSI colors (red, blue, etc.), \
                 bright variants (bright_red, etc.), indexed(n), or hex colors (#ff0000)",
                trimmed
            )),
        }
    }

    fn convert_rgb_to_terminal_color(&self, r: u8, g: u8, b: u8) -> Color {
        if self.supports_true_color {
            Color::Rgb(r, g, b)
        } else if self.supports_256 {
            Color::Indexed(rgb_to_256_color(r, g, b))
        } else {
            rgb_to_basic_ansi(r, g, b)
        }
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse hex color string (#ff0000) to RGB components
fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    if !s.is_ascii() || !s.starts_with('#') || s.len() != 7 {
        return Err(eyre!(
            "Invalid hex color format: '{}'. Expected format: #rrggbb",
            s
        ));
    }

    let component = |range: std::ops::Range<usize>, name: &str| {
        u8::from_str_radix(&s[range], 16)
            .map_err(|_| eyre!("Invalid {} component in hex color: {}", name, s))
    };

    Ok((component(1..3, "red")?, component(3..5, "green")?, component(5..7, "blue")?))
}

/// Convert RGB to nearest 256-color palette index (xterm palette)
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // Grayscale ramp (232-255)
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        if gray < 8 {
            return 16;
        } else if gray > 247 {
            return 231;
        } else {
            return 232 + ((gray - 8) * 24 / 240) as u8;
        }
    }

    // 6x6x6 color cube (16-231)
    let r_idx = (r as u16 * 5 / 255) as u8;
    let g_idx = (g as u16 * 5 / 255) as u8;
    let b_idx = (b as u16 * 5 / 255) as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert RGB to nearest basic ANSI color (8 colors)
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }

    match (r > 128, g > 128, b > 128) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Theme containing parsed colors ready for use
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        Self::with_parser(config, &ColorParser::new())
    }

    pub fn with_parser(config: &ThemeConfig, parser: &ColorParser) -> Result<Self> {
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, returns Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }
}

// Default configuration template
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");
