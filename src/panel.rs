//! Keyboard focus and per-control cursors.
//!
//! Radio controls (selection mode, chart kind) select as the cursor moves.
//! List controls (compare columns, visualization type, data column) move a
//! cursor and choose on Space/Enter.

use std::collections::BTreeMap;

use ratatui::widgets::ListState;

use crate::dashboard::Dashboard;
use crate::options::OptionItem;
use crate::ui_state::{ChartKind, ControlChange, ControlId, SelectionMode, VizFamily};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Control(ControlId),
    Table,
}

impl ControlId {
    /// Radios select on cursor movement; lists wait for Space/Enter.
    pub fn is_radio(self) -> bool {
        matches!(self, ControlId::SelectionMode | ControlId::ChartKind)
    }
}

#[derive(Debug, Clone)]
pub struct PanelState {
    pub focus: PanelFocus,
    cursors: BTreeMap<ControlId, ListState>,
}

impl PanelState {
    /// Focus the first control of the dashboard, cursors on current selections.
    pub fn new(dashboard: &Dashboard) -> Self {
        let focus = ControlId::for_variant(dashboard.variant())
            .first()
            .copied()
            .map(PanelFocus::Control)
            .unwrap_or(PanelFocus::Table);
        let mut panel = Self {
            focus,
            cursors: BTreeMap::new(),
        };
        panel.sync(dashboard);
        panel
    }

    /// Focus targets in Tab order: controls that have options, then the table.
    pub fn focus_order(dashboard: &Dashboard) -> Vec<PanelFocus> {
        let mut order: Vec<PanelFocus> = ControlId::for_variant(dashboard.variant())
            .iter()
            .filter(|c| !dashboard.option_set(**c).is_empty())
            .map(|c| PanelFocus::Control(*c))
            .collect();
        order.push(PanelFocus::Table);
        order
    }

    pub fn next_focus(&mut self, dashboard: &Dashboard) {
        let order = Self::focus_order(dashboard);
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    pub fn prev_focus(&mut self, dashboard: &Dashboard) {
        let order = Self::focus_order(dashboard);
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    pub fn focused_control(&self) -> Option<ControlId> {
        match self.focus {
            PanelFocus::Control(control) => Some(control),
            PanelFocus::Table => None,
        }
    }

    pub fn is_focused(&self, control: ControlId) -> bool {
        self.focus == PanelFocus::Control(control)
    }

    pub fn cursor(&self, control: ControlId) -> usize {
        self.cursors
            .get(&control)
            .and_then(|s| s.selected())
            .unwrap_or(0)
    }

    pub fn list_state_mut(&mut self, control: ControlId) -> &mut ListState {
        self.cursors.entry(control).or_default()
    }

    /// Re-fit focus and cursors after options changed. A control whose
    /// options emptied loses focus to the next target.
    pub fn sync(&mut self, dashboard: &Dashboard) {
        let order = Self::focus_order(dashboard);
        if !order.contains(&self.focus) {
            self.focus = order[0];
        }
        for control in ControlId::for_variant(dashboard.variant()) {
            let options = dashboard.option_set(*control);
            let state = self.cursors.entry(*control).or_default();
            if options.is_empty() {
                state.select(None);
                continue;
            }
            let selected = match state.selected() {
                Some(i) => Some(i.min(options.len() - 1)),
                None => current_position(dashboard, *control).or(Some(0)),
            };
            state.select(selected);
        }
    }

    /// Move the focused control's cursor. Radios return the change the new
    /// position selects.
    pub fn move_cursor(&mut self, dashboard: &Dashboard, delta: isize) -> Option<ControlChange> {
        let control = self.focused_control()?;
        let options = dashboard.option_set(control);
        if options.is_empty() {
            return None;
        }
        let current = self.cursor(control);
        let next = current
            .saturating_add_signed(delta)
            .min(options.len() - 1);
        self.list_state_mut(control).select(Some(next));
        if control.is_radio() && next != current {
            self.activate(dashboard)
        } else {
            None
        }
    }

    /// Change the item under the focused control's cursor would make.
    pub fn activate(&self, dashboard: &Dashboard) -> Option<ControlChange> {
        let control = self.focused_control()?;
        let item = dashboard.option_set(control).get(self.cursor(control))?;
        change_for(control, item)
    }

    /// Unset the focused control, where the control can be unset.
    pub fn clear(&self) -> Option<ControlChange> {
        match self.focused_control()? {
            ControlId::VizType => Some(ControlChange::VizType(None)),
            ControlId::ChartKind => Some(ControlChange::ChartKind(None)),
            ControlId::DataColumn => Some(ControlChange::DataColumn(None)),
            ControlId::SelectionMode | ControlId::CompareColumns => None,
        }
    }
}

fn change_for(control: ControlId, item: &OptionItem) -> Option<ControlChange> {
    match control {
        ControlId::SelectionMode => {
            SelectionMode::from_value(&item.value).map(ControlChange::SelectionMode)
        }
        ControlId::CompareColumns => Some(ControlChange::ToggleCompareColumn(item.value.clone())),
        ControlId::VizType => {
            VizFamily::from_label(&item.value).map(|f| ControlChange::VizType(Some(f)))
        }
        ControlId::ChartKind => {
            ChartKind::from_value(&item.value).map(|k| ControlChange::ChartKind(Some(k)))
        }
        ControlId::DataColumn => Some(ControlChange::DataColumn(Some(item.value.clone()))),
    }
}

/// Option index of a single-valued control's current selection.
pub fn current_position(dashboard: &Dashboard, control: ControlId) -> Option<usize> {
    let state = dashboard.state();
    let options = dashboard.option_set(control);
    match control {
        ControlId::SelectionMode => state
            .selection_mode
            .and_then(|m| options.position(m.value())),
        ControlId::ChartKind => state.chart_kind.and_then(|k| options.position(k.value())),
        ControlId::VizType => state.viz_type.and_then(|f| options.position(f.label())),
        ControlId::DataColumn => state
            .data_column
            .as_deref()
            .and_then(|c| options.position(c)),
        ControlId::CompareColumns => None,
    }
}
