use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use tracing::{debug, error, info};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Paragraph, StatefulWidget};

pub mod chart_export;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error_display;
pub mod figure;
pub mod logging;
pub mod options;
pub mod panel;
pub mod resolve;
pub mod schema;
pub mod ui_state;
pub mod widgets;

pub use airdash_cli::{Args, ColumnPolicyKind, DashboardVariant, MissingColumnPolicy};
pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, Theme,
};
pub use dashboard::{Dashboard, DashboardSettings};

use chart_export::{export_figure, ExportFormat, ExportSettings};
use dataset::Dataset;
use panel::{current_position, PanelFocus, PanelState};
use ui_state::{ControlChange, ControlId};
use widgets::controls::Controls;
use widgets::datatable::{DataTable, TablePager};
use widgets::debug::DebugState;
use widgets::figure::FigureView;
use widgets::option_list::{Chosen, OptionList};
use widgets::radio_block::RadioBlock;

/// Application name used for config, log and other app-specific paths
pub const APP_NAME: &str = "airdash";

/// Title row shown above the dashboard.
pub const TITLE: &str = "AirBnb Statistics";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    pub delimiter: Option<u8>,
    /// Rows scanned for type inference; `None` scans the whole file.
    pub infer_schema_length: Option<usize>,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = (rows > 0).then_some(rows);
        self
    }

    /// Create OpenOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Self {
        let mut opts = OpenOptions::new()
            .with_infer_schema_length(
                args.infer_schema_length
                    .unwrap_or(config.file_loading.infer_schema_length),
            );
        opts.delimiter = args.delimiter.or(config.file_loading.delimiter);
        opts
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf, OpenOptions),
    DoLoad(PathBuf, OpenOptions), // Internal event to actually perform loading after UI update
    Control(ControlChange),
    Export(ExportFormat),
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Default)]
pub struct ErrorModal {
    pub active: bool,
    pub message: String,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: String) {
        self.active = true;
        self.message = message;
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.message.clear();
    }
}

#[derive(Clone, Debug, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading { file_path: PathBuf, file_size: u64 },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }
}

pub struct App {
    pub dashboard: Option<Dashboard>,
    pub panel: Option<PanelState>,
    pub pager: TablePager,
    pub error_modal: ErrorModal,
    pub loading_state: LoadingState,
    /// Last export result, shown in the status bar.
    pub status: Option<String>,
    path: Option<PathBuf>,
    config: AppConfig,
    theme: Theme,
    debug: DebugState,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> App {
        let config = AppConfig::default();
        let theme = Theme::from_config(&config.theme).unwrap_or_default();
        Self::new_with_config(theme, config)
    }

    pub fn new_with_config(theme: Theme, app_config: AppConfig) -> App {
        let pager = TablePager::new(app_config.display.page_size);
        let mut app = App {
            dashboard: None,
            panel: None,
            pager,
            error_modal: ErrorModal::new(),
            loading_state: LoadingState::Idle,
            status: None,
            path: None,
            config: app_config,
            theme,
            debug: DebugState::default(),
        };
        if app.config.debug.enabled {
            app.enable_debug();
        }
        app
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    fn load(&mut self, path: &PathBuf, options: &OpenOptions) -> Result<()> {
        let settings = DashboardSettings::from_config(&self.config)?;
        let dataset = Dataset::from_csv(path, options)?;
        let dashboard = Dashboard::new(dataset, &settings)?;
        self.panel = Some(PanelState::new(&dashboard));
        self.pager = TablePager::new(self.config.display.page_size);
        self.dashboard = Some(dashboard);
        self.path = Some(path.clone());
        self.loading_state = LoadingState::Idle;
        Ok(())
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        // Handle error modal first - it has highest priority
        if self.error_modal.active {
            if matches!(event.code, KeyCode::Esc | KeyCode::Enter) {
                self.error_modal.hide();
            }
            return None;
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Char('e') => return Some(AppEvent::Export(ExportFormat::Png)),
            KeyCode::Char('E') => return Some(AppEvent::Export(ExportFormat::Svg)),
            KeyCode::Char('J') => return Some(AppEvent::Export(ExportFormat::Json)),
            _ => {}
        }

        let (Some(dashboard), Some(panel)) = (self.dashboard.as_ref(), self.panel.as_mut()) else {
            return None;
        };
        match event.code {
            KeyCode::Tab => {
                panel.next_focus(dashboard);
                None
            }
            KeyCode::BackTab => {
                panel.prev_focus(dashboard);
                None
            }
            code => match panel.focus {
                PanelFocus::Table => {
                    table_key(&mut self.pager, dashboard, code);
                    None
                }
                PanelFocus::Control(control) => {
                    control_key(panel, dashboard, control, code).map(AppEvent::Control)
                }
            },
        }
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Open(path, options) => {
                // Set loading state first, then trigger a render before actually loading
                let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                self.loading_state = LoadingState::Loading {
                    file_path: path.clone(),
                    file_size,
                };
                Some(AppEvent::DoLoad(path.clone(), options.clone()))
            }
            AppEvent::DoLoad(path, options) => match self.load(path, options) {
                Ok(()) => None,
                Err(e) => {
                    self.loading_state = LoadingState::Idle;
                    error!(path = %path.display(), error = ?e, "load failed");
                    Some(AppEvent::Crash(
                        error_display::user_message_from_report(&e, Some(path.as_path())),
                    ))
                }
            },
            AppEvent::Control(change) => {
                let dashboard = self.dashboard.as_mut()?;
                debug!(?change, "control change");
                match dashboard.apply(change.clone()) {
                    Ok(recompute) => {
                        self.status = None;
                        self.debug
                            .on_recompute(recompute.changed.as_str(), recompute.cleared.len());
                        if let Some(panel) = self.panel.as_mut() {
                            panel.sync(dashboard);
                        }
                        None
                    }
                    Err(e) => {
                        error!(error = ?e, "chart resolution failed");
                        Some(AppEvent::Crash(e.to_string()))
                    }
                }
            }
            AppEvent::Export(format) => {
                let dashboard = self.dashboard.as_ref()?;
                let result = ExportSettings::from_config(&self.config)
                    .and_then(|settings| export_figure(dashboard.figure(), *format, &settings));
                match result {
                    Ok(path) => {
                        self.status = Some(format!("Exported {}", path.display()));
                    }
                    Err(e) => {
                        info!(error = %e, format = format.as_str(), "export failed");
                        self.error_modal
                            .show(error_display::user_message_from_report(&e, None));
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn render_loading(&self, area: Rect, buf: &mut Buffer) {
        let text = match &self.loading_state {
            LoadingState::Loading {
                file_path,
                file_size,
            } => format!("Loading {} ({} bytes)...", file_path.display(), file_size),
            LoadingState::Idle => "No file loaded".to_string(),
        };
        let popup = centered_rect(area, 60, 20);
        Paragraph::new(text)
            .style(Style::default().fg(self.color("dimmed")))
            .centered()
            .block(Block::default().borders(Borders::ALL))
            .render(popup, buf);
    }

    fn render_dashboard(&mut self, area: Rect, buf: &mut Buffer) {
        let (Some(dashboard), Some(panel)) = (self.dashboard.as_ref(), self.panel.as_mut()) else {
            return;
        };
        let theme = &self.theme;
        let border = theme.get("table_border");
        let active = theme.get("modal_border_active");
        let dimmed = theme.get("dimmed");

        // Primary radio row
        let controls = ControlId::for_variant(dashboard.variant());
        let primary = controls[0];
        let options = dashboard.option_set(primary);
        let widest = options
            .items()
            .iter()
            .map(|i| i.label.chars().count() + 4)
            .max()
            .unwrap_or(1);
        let per_row = (area.width.saturating_sub(2) as usize / widest).clamp(1, options.len().max(1));
        let radio_rows = options.len().div_ceil(per_row) as u16;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(radio_rows + 2), Constraint::Fill(1)])
            .split(area);
        RadioBlock::new(control_title(primary), options)
            .selected(current_position(dashboard, primary))
            .focused(panel.is_focused(primary), panel.cursor(primary))
            .columns(per_row)
            .colors(border, active, dimmed)
            .render(rows[0], buf);

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let page = dashboard
            .dataset()
            .page(self.pager.page, self.pager.page_size);
        DataTable::new(&page, self.pager.column_offset)
            .with_title(" Listings ")
            .with_focus(panel.focus == PanelFocus::Table)
            .with_colors(theme.get("table_header"), border, active)
            .render(halves[0], buf);

        // Dependent controls are only shown while they have options
        let dependents: Vec<ControlId> = controls[1..]
            .iter()
            .copied()
            .filter(|c| !dashboard.option_set(*c).is_empty())
            .collect();
        let chart_area = if dependents.is_empty() {
            halves[1]
        } else {
            let tallest = dependents
                .iter()
                .map(|c| dashboard.option_set(*c).len() as u16 + 2)
                .max()
                .unwrap_or(3);
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Fill(1),
                    Constraint::Length(tallest.min(halves[1].height / 2)),
                ])
                .split(halves[1]);
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, dependents.len() as u32); dependents.len()])
                .split(split[1]);
            let state = dashboard.state();
            for (control, list_area) in dependents.iter().zip(columns.iter()) {
                let chosen = match control {
                    ControlId::CompareColumns => Chosen::Many(&state.compare_columns),
                    ControlId::VizType => Chosen::One(state.viz_type.map(|f| f.label())),
                    ControlId::DataColumn => Chosen::One(state.data_column.as_deref()),
                    ControlId::SelectionMode | ControlId::ChartKind => Chosen::One(None),
                };
                let list = OptionList::new(control_title(*control), dashboard.option_set(*control), chosen)
                    .focused(panel.is_focused(*control))
                    .colors(border, active, dimmed);
                StatefulWidget::render(list, *list_area, buf, panel.list_state_mut(*control));
            }
            split[0]
        };

        FigureView::new(dashboard.figure(), theme).render(chart_area, buf);
    }
}

fn control_title(control: ControlId) -> &'static str {
    match control {
        ControlId::SelectionMode => " Metric ",
        ControlId::CompareColumns => " Compare Columns ",
        ControlId::VizType => " Visualization Type ",
        ControlId::ChartKind => " Chart Type ",
        ControlId::DataColumn => " Data Column ",
    }
}

fn table_key(pager: &mut TablePager, dashboard: &Dashboard, code: KeyCode) {
    let rows = dashboard.dataset().height();
    match code {
        KeyCode::Down => pager.next_page(rows),
        KeyCode::Up => pager.prev_page(),
        KeyCode::PageDown => pager.jump_forward(rows),
        KeyCode::PageUp => pager.jump_back(),
        KeyCode::Home => pager.first_page(),
        KeyCode::End => pager.last_page(rows),
        KeyCode::Right => pager.scroll_right(dashboard.dataset().frame().width()),
        KeyCode::Left => pager.scroll_left(),
        _ => {}
    }
}

fn control_key(
    panel: &mut PanelState,
    dashboard: &Dashboard,
    control: ControlId,
    code: KeyCode,
) -> Option<ControlChange> {
    match code {
        KeyCode::Left if control.is_radio() => panel.move_cursor(dashboard, -1),
        KeyCode::Right if control.is_radio() => panel.move_cursor(dashboard, 1),
        KeyCode::Up if !control.is_radio() => panel.move_cursor(dashboard, -1),
        KeyCode::Down if !control.is_radio() => panel.move_cursor(dashboard, 1),
        KeyCode::Char(' ') | KeyCode::Enter => panel.activate(dashboard),
        KeyCode::Backspace | KeyCode::Delete => panel.clear(),
        _ => None,
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![
            Constraint::Length(1), // Title
            Constraint::Fill(1),
            Constraint::Length(1), // Controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Paragraph::new(TITLE)
            .style(
                Style::default()
                    .fg(self.color("primary"))
                    .add_modifier(Modifier::BOLD),
            )
            .centered()
            .render(layout[0], buf);

        if self.dashboard.is_some() {
            self.render_dashboard(layout[1], buf);
        } else {
            self.render_loading(layout[1], buf);
        }

        let notice = self
            .dashboard
            .as_ref()
            .and_then(|d| d.notice().map(str::to_string))
            .or_else(|| self.status.clone());
        let mut controls = Controls::new()
            .with_bg(self.color("controls_bg"))
            .with_colors(self.color("secondary"), self.color("text_primary"))
            .with_dimmed(self.error_modal.active)
            .with_notice(notice);
        if let Some(dashboard) = &self.dashboard {
            let rows = dashboard.dataset().height();
            controls = controls
                .with_row_count(rows)
                .with_page_label(self.pager.position_label(rows));
        }
        (&controls).render(layout[2], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[3], buf);
        }

        // Render error modal (has highest priority, shows on top of everything)
        if self.error_modal.active {
            let popup_area = centered_rect(area, 70, 40);
            Clear.render(popup_area, buf);
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(self.color("modal_border_error")));
            let inner_area = block.inner(popup_area);
            block.render(popup_area, buf);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(inner_area);

            Paragraph::new(self.error_modal.message.as_str())
                .style(Style::default().fg(self.color("error")))
                .wrap(ratatui::widgets::Wrap { trim: true })
                .render(chunks[0], buf);

            let ok_style = Style::default().fg(self.color("modal_border_active"));
            Paragraph::new("[ OK ]")
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(ok_style),
                )
                .render(chunks[1], buf);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
