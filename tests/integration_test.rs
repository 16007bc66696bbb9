use airdash::figure::Figure;
use airdash::panel::PanelFocus;
use airdash::ui_state::{ChartKind, ControlId, Metric, SelectionMode};
use airdash::{App, AppConfig, AppEvent, OpenOptions, Theme};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use std::path::Path;

mod common;

fn press(app: &mut App, code: KeyCode) {
    let mut next = app.event(&AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    while let Some(event) = next.take() {
        next = app.event(&event);
    }
}

fn open(app: &mut App, path: &Path) {
    let event = AppEvent::Open(path.to_path_buf(), OpenOptions::default());
    if let Some(next_event) = app.event(&event) {
        assert!(app.loading_state.is_loading());
        assert!(app.event(&next_event).is_none());
    }
}

fn app_with(config: AppConfig) -> App {
    App::new_with_config(Theme::default(), config)
}

fn screen(app: &mut App) -> String {
    let area = Rect::new(0, 0, 160, 40);
    let mut buf = Buffer::empty(area);
    Widget::render(&mut *app, area, &mut buf);
    (0..area.height)
        .map(|y| {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_app_creation() {
    let app = App::new();
    assert!(app.dashboard.is_none());
    assert!(!app.error_modal.active);
}

#[test]
fn test_metrics_radio_flow() {
    let (_dir, path) = common::listings_csv();
    let mut app = App::new();
    open(&mut app, &path);
    assert!(!app.loading_state.is_loading());
    assert_eq!(app.path(), Some(&path));

    let text = screen(&mut app);
    assert!(text.contains("AirBnb Statistics"), "{}", text);
    assert!(text.contains("Histogram of accommodates"), "{}", text);
    assert!(text.contains("Rows: 6"), "{}", text);

    // Right on the focused radio selects the next metric immediately
    press(&mut app, KeyCode::Right);
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(
        dash.state().selection_mode,
        Some(SelectionMode::Metric(Metric::NumberOfReviews))
    );
    assert!(matches!(dash.figure(), Figure::Histogram(h) if h.x == "number_of_reviews"));

    // Last option opens the picker and clears the chart
    for _ in 0..3 {
        press(&mut app, KeyCode::Right);
    }
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(dash.state().selection_mode, Some(SelectionMode::NewViz));
    assert_eq!(dash.figure(), &Figure::Empty);
    assert!(screen(&mut app).contains("Compare Columns"));
}

#[test]
fn test_builder_keyboard_flow() {
    let (_dir, path) = common::listings_csv();
    let mut config = AppConfig::default();
    config.dashboard.variant = "builder".to_string();
    let mut app = app_with(config);
    open(&mut app, &path);

    let panel = app.panel.as_ref().unwrap();
    assert_eq!(panel.focus, PanelFocus::Control(ControlId::ChartKind));

    // None, Histogram, Line Chart, Pie Chart
    for _ in 0..3 {
        press(&mut app, KeyCode::Right);
    }
    assert_eq!(
        app.dashboard.as_ref().unwrap().state().chart_kind,
        Some(ChartKind::Pie)
    );

    press(&mut app, KeyCode::Tab);
    assert_eq!(
        app.panel.as_ref().unwrap().focus,
        PanelFocus::Control(ControlId::DataColumn)
    );
    let dash = app.dashboard.as_ref().unwrap();
    let first = dash
        .option_set(ControlId::DataColumn)
        .get(0)
        .unwrap()
        .value
        .clone();
    press(&mut app, KeyCode::Enter);
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(dash.state().data_column.as_deref(), Some(first.as_str()));
    assert!(matches!(dash.figure(), Figure::Pie(_)));

    press(&mut app, KeyCode::Backspace);
    let dash = app.dashboard.as_ref().unwrap();
    assert_eq!(dash.state().data_column, None);
    assert_eq!(dash.figure(), &Figure::Empty);
}

#[test]
fn test_table_paging() {
    let (_dir, path) = common::listings_csv();
    let mut config = AppConfig::default();
    config.display.page_size = 4;
    let mut app = app_with(config);
    open(&mut app, &path);

    // Metrics has one focusable control while the picker is closed
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.panel.as_ref().unwrap().focus, PanelFocus::Table);

    press(&mut app, KeyCode::Down);
    assert_eq!(app.pager.page, 1);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.pager.page, 1);
    assert!(screen(&mut app).contains("Page 2 of 2"));
    press(&mut app, KeyCode::Home);
    assert_eq!(app.pager.page, 0);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.pager.column_offset, 1);
}

#[test]
fn test_export_without_chart_shows_error() {
    let (dir, path) = common::listings_csv();
    let mut config = AppConfig::default();
    config.dashboard.variant = "builder".to_string();
    config.export.directory = Some(dir.path().join("exports"));
    let mut app = app_with(config);
    open(&mut app, &path);

    press(&mut app, KeyCode::Char('J'));
    assert!(app.error_modal.active);
    assert!(app.error_modal.message.contains("No chart to export"));
    press(&mut app, KeyCode::Esc);
    assert!(!app.error_modal.active);
}

#[test]
fn test_export_json_writes_file() {
    let (dir, path) = common::listings_csv();
    let export_dir = dir.path().join("exports");
    let mut config = AppConfig::default();
    config.export.directory = Some(export_dir.clone());
    let mut app = app_with(config);
    open(&mut app, &path);

    press(&mut app, KeyCode::Char('J'));
    assert!(!app.error_modal.active, "{}", app.error_modal.message);
    let written = export_dir.join("airdash-histogram-accommodates.json");
    assert!(written.exists());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(json["type"], "histogram");
    assert_eq!(json["x"], "accommodates");
    assert!(app.status.as_deref().unwrap().starts_with("Exported"));
}

#[test]
fn test_bad_percentage_crashes() {
    let (_dir, path) = common::write_csv("bad.csv", "id,host_response_rate", &["1,soon"]);
    let mut app = App::new();
    let next = app.event(&AppEvent::Open(path.clone(), OpenOptions::default()));
    let crash = app.event(&next.unwrap());
    match crash {
        Some(AppEvent::Crash(msg)) => {
            assert!(msg.contains("bad.csv"), "{}", msg);
            assert!(msg.contains("not a percentage"), "{}", msg);
        }
        other => panic!("expected a crash, got {:?}", other),
    }
    assert!(app.dashboard.is_none());
}
