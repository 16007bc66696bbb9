//! Option lists for every control, and normalization of stale selections.

use airdash_cli::DashboardVariant;
use std::collections::BTreeMap;

use crate::dataset::ColumnKind;
use crate::schema::SelectableSchema;
use crate::ui_state::{ChartKind, ControlId, SelectionMode, UiState, VizFamily};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
    pub disabled: bool,
}

impl OptionItem {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    fn column(name: &str) -> Self {
        Self::new(name, name)
    }

    fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Ordered options of one control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    items: Vec<OptionItem>,
}

impl OptionSet {
    pub fn new(items: Vec<OptionItem>) -> Self {
        Self { items }
    }

    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[OptionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OptionItem> {
        self.items.get(index)
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }

    /// True when `value` is offered and not disabled.
    pub fn allows(&self, value: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.value == value && !item.disabled)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.value.as_str())
    }
}

pub type ResolvedOptions = BTreeMap<ControlId, OptionSet>;

/// Option set of every control of the variant. Pure: same inputs, same output.
pub fn resolve_options(
    variant: DashboardVariant,
    state: &UiState,
    schema: &SelectableSchema,
) -> ResolvedOptions {
    let mut options = ResolvedOptions::new();
    match variant {
        DashboardVariant::Metrics => {
            options.insert(ControlId::SelectionMode, selection_mode_options());
            let new_viz = state.selection_mode == Some(SelectionMode::NewViz);
            options.insert(
                ControlId::CompareColumns,
                if new_viz {
                    OptionSet::new(schema.names().map(OptionItem::column).collect())
                } else {
                    OptionSet::default()
                },
            );
            options.insert(
                ControlId::VizType,
                if new_viz {
                    viz_type_options()
                } else {
                    OptionSet::default()
                },
            );
        }
        DashboardVariant::Builder => {
            options.insert(ControlId::ChartKind, chart_kind_options());
            options.insert(
                ControlId::DataColumn,
                data_column_options(state.chart_kind, schema),
            );
        }
    }
    options
}

fn selection_mode_options() -> OptionSet {
    OptionSet::new(
        SelectionMode::ALL
            .into_iter()
            .map(|mode| OptionItem::new(mode.label(), mode.value()))
            .collect(),
    )
}

fn chart_kind_options() -> OptionSet {
    OptionSet::new(
        ChartKind::ALL
            .into_iter()
            .map(|kind| OptionItem::new(kind.label(), kind.value()))
            .collect(),
    )
}

fn viz_type_options() -> OptionSet {
    OptionSet::new(
        VizFamily::ALL
            .into_iter()
            .map(|family| {
                OptionItem::new(family.label(), family.label()).disabled(!family.is_rendered())
            })
            .collect(),
    )
}

fn data_column_options(kind: Option<ChartKind>, schema: &SelectableSchema) -> OptionSet {
    let items = match kind {
        Some(ChartKind::Pie) => schema
            .names_of_kind(ColumnKind::Boolean)
            .map(OptionItem::column)
            .collect(),
        Some(ChartKind::Histogram) | Some(ChartKind::Line) => schema
            .names_of_kind(ColumnKind::Numeric)
            .map(OptionItem::column)
            .collect(),
        Some(ChartKind::NoSelection) | None => schema.names().map(OptionItem::column).collect(),
    };
    OptionSet::new(items)
}

/// Clear dependent selections that are no longer offered. Returns the
/// controls that changed.
pub fn normalize_selections(state: &mut UiState, options: &ResolvedOptions) -> Vec<ControlId> {
    let mut cleared = Vec::new();
    let offered = |control: ControlId, value: &str| {
        options
            .get(&control)
            .map(|set| set.allows(value))
            .unwrap_or(false)
    };

    if !state.compare_columns.is_empty() {
        let before = state.compare_columns.len();
        state
            .compare_columns
            .retain(|c| offered(ControlId::CompareColumns, c));
        if state.compare_columns.len() != before {
            cleared.push(ControlId::CompareColumns);
        }
    }

    if let Some(family) = state.viz_type {
        if !offered(ControlId::VizType, family.label()) {
            state.viz_type = None;
            cleared.push(ControlId::VizType);
        }
    }

    if let Some(column) = &state.data_column {
        if !offered(ControlId::DataColumn, column) {
            state.data_column = None;
            cleared.push(ControlId::DataColumn);
        }
    }

    cleared
}
