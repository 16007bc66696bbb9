use airdash::config::{AppConfig, ConfigManager};
use airdash::schema::ColumnPolicy;
use airdash::{DashboardSettings, DashboardVariant, MissingColumnPolicy};
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

fn write_config(manager: &ConfigManager, content: &str) {
    manager.ensure_config_dir().unwrap();
    fs::write(manager.config_path("config.toml"), content).unwrap();
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");
    assert_eq!(config.file_loading.infer_schema_length, 0);
    assert_eq!(config.file_loading.delimiter, None);

    assert_eq!(config.dashboard.variant, "metrics");
    assert_eq!(config.dashboard.column_policy, None);
    assert_eq!(config.dashboard.fixed_columns.len(), 28);
    assert_eq!(config.dashboard.denylist.len(), 5);
    assert_eq!(config.dashboard.missing_columns, "fail");

    assert_eq!(config.display.page_size, 11);
    assert_eq!(config.display.histogram_bins, 0);
    assert_eq!(config.display.event_poll_interval_ms, 25);

    assert_eq!(config.export.directory, None);
    assert_eq!(config.export.width, 1024);
    assert_eq!(config.export.height, 768);

    assert_eq!(config.theme.colors.chart_bar, "#636efa");
    assert_eq!(config.theme.colors.mean_line, "red");
    assert!(!config.debug.enabled);
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    assert!(template.contains("[file_loading]"));
    assert!(template.contains("[dashboard]"));
    assert!(template.contains("[display]"));
    assert!(template.contains("[export]"));
    assert!(template.contains("[theme.colors]"));
    assert!(template.contains("[debug]"));
    assert!(template.contains("version = \"0.1\""));
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");
    assert!(config_path.exists());

    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[dashboard]"));

    // The written template loads back to the defaults
    let loaded = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(loaded.display.page_size, 11);
    assert_eq!(loaded.dashboard.variant, "metrics");
}

#[test]
fn test_write_config_without_force_fails_if_exists() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    config_manager.write_default_config(false).unwrap();
    let result = config_manager.write_default_config(false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("already exists"));
}

#[test]
fn test_write_config_with_force_overwrites() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let path = config_manager.write_default_config(false).unwrap();
    fs::write(&path, "# stale").unwrap();
    config_manager.write_default_config(true).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[display]"));
}

#[test]
fn test_load_config_with_no_file() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.dashboard.variant, "metrics");
    assert_eq!(config.display.page_size, 11);
}

#[test]
fn test_load_and_parse_minimal_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(
        &config_manager,
        r#"
version = "0.1"

[dashboard]
variant = "builder"
denylist = ["amenities"]

[display]
page_size = 25
"#,
    );

    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.dashboard.variant, "builder");
    assert_eq!(config.display.page_size, 25);
    // Untouched sections keep their defaults
    assert_eq!(config.display.event_poll_interval_ms, 25);
    assert_eq!(config.export.width, 1024);

    let settings = DashboardSettings::from_config(&config).unwrap();
    assert_eq!(settings.variant, DashboardVariant::Builder);
    assert_eq!(
        settings.column_policy,
        ColumnPolicy::Denylist(vec!["amenities".to_string()])
    );
    assert_eq!(settings.missing_columns, MissingColumnPolicy::Fail);
}

#[test]
fn test_explicit_column_policy_overrides_variant_default() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(
        &config_manager,
        r#"
[dashboard]
variant = "builder"
column_policy = "fixed"
fixed_columns = ["beds", "instant_bookable"]
missing_columns = "skip"
"#,
    );

    let config = AppConfig::load_from(&config_manager).unwrap();
    let settings = DashboardSettings::from_config(&config).unwrap();
    assert_eq!(
        settings.column_policy,
        ColumnPolicy::Fixed(vec!["beds".to_string(), "instant_bookable".to_string()])
    );
    assert_eq!(settings.missing_columns, MissingColumnPolicy::Skip);
}

#[test]
fn test_malformed_config_is_an_error() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_config(&config_manager, "[display\npage_size = ");
    let err = AppConfig::load_from(&config_manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_merge_does_not_override_with_defaults() {
    let mut base = AppConfig::default();
    base.display.page_size = 30;
    base.export.width = 640;

    base.merge(AppConfig::default());
    assert_eq!(base.display.page_size, 30);
    assert_eq!(base.export.width, 640);
}

#[test]
fn test_merge_option_fields() {
    let mut base = AppConfig::default();
    let mut other = AppConfig::default();
    other.file_loading.delimiter = Some(b';');
    other.export.directory = Some("/tmp/charts".into());

    base.merge(other);
    assert_eq!(base.file_loading.delimiter, Some(b';'));
    assert_eq!(base.export.directory(), std::path::PathBuf::from("/tmp/charts"));
}

#[test]
fn test_color_config_merge() {
    let mut base = AppConfig::default();
    let mut other = AppConfig::default();
    other.theme.colors.mean_line = "#00ff00".to_string();

    base.merge(other);
    assert_eq!(base.theme.colors.mean_line, "#00ff00");
    assert_eq!(base.theme.colors.chart_bar, "#636efa");
}

#[test]
fn test_validate_config_invalid_version() {
    let mut config = AppConfig::default();
    config.version = "2.0".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Unsupported config version"));
}

#[test]
fn test_validate_config_invalid_policies() {
    let mut config = AppConfig::default();
    config.dashboard.missing_columns = "ignore".to_string();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("fail, skip, keep"), "{}", err);

    let mut config = AppConfig::default();
    config.dashboard.column_policy = Some("allow".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_config_zero_sizes() {
    let mut config = AppConfig::default();
    config.display.page_size = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.display.event_poll_interval_ms = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.export.height = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_config_with_invalid_color() {
    let mut config = AppConfig::default();
    config.theme.colors.chart_line = "not_a_color".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("chart_line"));
}

#[test]
fn test_validate_config_with_valid_hex_color() {
    let mut config = AppConfig::default();
    config.theme.colors.primary = "#ff0000".to_string();
    config.theme.colors.dimmed = "indexed(244)".to_string();
    assert!(config.validate().is_ok());
}
