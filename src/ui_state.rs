//! Dashboard selection state: one field per control.

use airdash_cli::DashboardVariant;
use serde::Serialize;

use crate::dataset::{HOST_RESPONSE_RATE, REVIEW_SCORES_RATING};

/// Metric radio choices of the metrics dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accommodates,
    NumberOfReviews,
    HostResponseRate,
    ReviewScoresRating,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Accommodates,
        Metric::NumberOfReviews,
        Metric::HostResponseRate,
        Metric::ReviewScoresRating,
    ];

    /// Dataset column the metric charts.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Accommodates => "accommodates",
            Metric::NumberOfReviews => "number_of_reviews",
            Metric::HostResponseRate => HOST_RESPONSE_RATE,
            Metric::ReviewScoresRating => REVIEW_SCORES_RATING,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Accommodates => "Accommodation",
            Metric::NumberOfReviews => "Reviews",
            Metric::HostResponseRate => "Host Response Rate",
            Metric::ReviewScoresRating => "Review Scores Rating",
        }
    }
}

/// Value of the `selection-mode` radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    Metric(Metric),
    NewViz,
}

impl SelectionMode {
    pub const ALL: [SelectionMode; 5] = [
        SelectionMode::Metric(Metric::Accommodates),
        SelectionMode::Metric(Metric::NumberOfReviews),
        SelectionMode::Metric(Metric::HostResponseRate),
        SelectionMode::Metric(Metric::ReviewScoresRating),
        SelectionMode::NewViz,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Metric(metric) => metric.label(),
            SelectionMode::NewViz => "Make a New Visualization",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            SelectionMode::Metric(metric) => metric.column(),
            SelectionMode::NewViz => "new_viz",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.value() == value)
    }
}

/// Value of the `chart-kind` radio. `NoSelection` renders nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    NoSelection,
    Histogram,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::NoSelection,
        ChartKind::Histogram,
        ChartKind::Line,
        ChartKind::Pie,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::NoSelection => "None",
            ChartKind::Histogram => "Histogram",
            ChartKind::Line => "Line Chart",
            ChartKind::Pie => "Pie Chart",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            ChartKind::NoSelection => "none",
            ChartKind::Histogram => "histogram",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.value() == value)
    }
}

/// Visualization families offered by the "new visualization" dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VizFamily {
    Bar,
    HeatMap,
    Histogram,
    Pie,
    Scatter,
    Line,
    StackedBar,
}

impl VizFamily {
    pub const ALL: [VizFamily; 7] = [
        VizFamily::Bar,
        VizFamily::HeatMap,
        VizFamily::Histogram,
        VizFamily::Pie,
        VizFamily::Scatter,
        VizFamily::Line,
        VizFamily::StackedBar,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VizFamily::Bar => "Bar chart",
            VizFamily::HeatMap => "Heat map",
            VizFamily::Histogram => "Histogram",
            VizFamily::Pie => "Pie chart",
            VizFamily::Scatter => "Scatter plot",
            VizFamily::Line => "Line chart",
            VizFamily::StackedBar => "Stacked bar chart",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    /// Whether the dashboard can draw this family.
    pub fn is_rendered(self) -> bool {
        matches!(self, VizFamily::Histogram)
    }
}

/// Control identifiers, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlId {
    SelectionMode,
    CompareColumns,
    VizType,
    ChartKind,
    DataColumn,
}

impl ControlId {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlId::SelectionMode => "selection-mode",
            ControlId::CompareColumns => "compare-columns",
            ControlId::VizType => "viz-type",
            ControlId::ChartKind => "chart-kind",
            ControlId::DataColumn => "data-column",
        }
    }

    /// Controls shown by a dashboard variant.
    pub fn for_variant(variant: DashboardVariant) -> &'static [ControlId] {
        match variant {
            DashboardVariant::Metrics => &[
                ControlId::SelectionMode,
                ControlId::CompareColumns,
                ControlId::VizType,
            ],
            DashboardVariant::Builder => &[ControlId::ChartKind, ControlId::DataColumn],
        }
    }
}

/// One user action on one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    SelectionMode(SelectionMode),
    /// Adds the column when absent, removes it when present.
    ToggleCompareColumn(String),
    VizType(Option<VizFamily>),
    ChartKind(Option<ChartKind>),
    DataColumn(Option<String>),
}

impl ControlChange {
    pub fn control(&self) -> ControlId {
        match self {
            ControlChange::SelectionMode(_) => ControlId::SelectionMode,
            ControlChange::ToggleCompareColumn(_) => ControlId::CompareColumns,
            ControlChange::VizType(_) => ControlId::VizType,
            ControlChange::ChartKind(_) => ControlId::ChartKind,
            ControlChange::DataColumn(_) => ControlId::DataColumn,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub selection_mode: Option<SelectionMode>,
    pub compare_columns: Vec<String>,
    pub viz_type: Option<VizFamily>,
    pub chart_kind: Option<ChartKind>,
    pub data_column: Option<String>,
}

impl UiState {
    /// Start-up state: the metrics dashboard opens on Accommodation, the
    /// builder with nothing selected.
    pub fn for_variant(variant: DashboardVariant) -> Self {
        match variant {
            DashboardVariant::Metrics => Self {
                selection_mode: Some(SelectionMode::Metric(Metric::Accommodates)),
                ..Self::default()
            },
            DashboardVariant::Builder => Self::default(),
        }
    }

    /// Set the one field the change targets.
    pub fn apply(&mut self, change: ControlChange) {
        match change {
            ControlChange::SelectionMode(mode) => self.selection_mode = Some(mode),
            ControlChange::ToggleCompareColumn(column) => {
                if let Some(pos) = self.compare_columns.iter().position(|c| *c == column) {
                    self.compare_columns.remove(pos);
                } else {
                    self.compare_columns.push(column);
                }
            }
            ControlChange::VizType(family) => self.viz_type = family,
            ControlChange::ChartKind(kind) => self.chart_kind = kind,
            ControlChange::DataColumn(column) => self.data_column = column,
        }
    }

    /// Display text of a control's current value.
    pub fn describe(&self, control: ControlId) -> String {
        let unset = || "unset".to_string();
        match control {
            ControlId::SelectionMode => self
                .selection_mode
                .map(|m| m.label().to_string())
                .unwrap_or_else(unset),
            ControlId::CompareColumns => {
                if self.compare_columns.is_empty() {
                    unset()
                } else {
                    self.compare_columns.join(", ")
                }
            }
            ControlId::VizType => self
                .viz_type
                .map(|f| f.label().to_string())
                .unwrap_or_else(unset),
            ControlId::ChartKind => self
                .chart_kind
                .map(|k| k.label().to_string())
                .unwrap_or_else(unset),
            ControlId::DataColumn => self.data_column.clone().unwrap_or_else(unset),
        }
    }
}
