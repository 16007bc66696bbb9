//! The recompute cycle: one control change, then options, then the figure.

use airdash_cli::{DashboardVariant, MissingColumnPolicy};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::dataset::Dataset;
use crate::figure::Figure;
use crate::options::{normalize_selections, resolve_options, OptionSet, ResolvedOptions};
use crate::resolve::{first_numeric, resolve_chart};
use crate::schema::{ColumnPolicy, SelectableSchema};
use crate::ui_state::{ControlChange, ControlId, SelectionMode, UiState, VizFamily};

/// Everything a dashboard needs besides the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub variant: DashboardVariant,
    pub column_policy: ColumnPolicy,
    pub missing_columns: MissingColumnPolicy,
    /// 0 for automatic binning
    pub histogram_bins: usize,
}

impl DashboardSettings {
    /// Built-in defaults for a variant.
    pub fn new(variant: DashboardVariant) -> Self {
        Self {
            variant,
            column_policy: match variant {
                DashboardVariant::Metrics => ColumnPolicy::default_fixed(),
                DashboardVariant::Builder => ColumnPolicy::default_denylist(),
            },
            missing_columns: MissingColumnPolicy::Fail,
            histogram_bins: 0,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let variant = config.dashboard.variant()?;
        Ok(Self {
            variant,
            column_policy: config.dashboard.column_policy(variant)?,
            missing_columns: config.dashboard.missing_column_policy()?,
            histogram_bins: config.display.histogram_bins,
        })
    }

    pub fn with_column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.column_policy = policy;
        self
    }

    pub fn with_missing_columns(mut self, missing: MissingColumnPolicy) -> Self {
        self.missing_columns = missing;
        self
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins;
        self
    }
}

/// Outcome of one [`Dashboard::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recompute {
    pub changed: ControlId,
    /// Dependent selections normalization cleared.
    pub cleared: Vec<ControlId>,
    /// The change was not applied; see [`Dashboard::notice`].
    pub refused: bool,
}

pub struct Dashboard {
    dataset: Dataset,
    variant: DashboardVariant,
    schema: SelectableSchema,
    state: UiState,
    options: ResolvedOptions,
    figure: Figure,
    histogram_bins: usize,
    notice: Option<String>,
}

impl Dashboard {
    /// Derive the selectable schema and run the first recompute.
    pub fn new(dataset: Dataset, settings: &DashboardSettings) -> Result<Self> {
        let schema = SelectableSchema::derive(
            &dataset,
            &settings.column_policy,
            settings.missing_columns,
        )?;
        let mut dashboard = Self {
            dataset,
            variant: settings.variant,
            schema,
            state: UiState::for_variant(settings.variant),
            options: ResolvedOptions::new(),
            figure: Figure::Empty,
            histogram_bins: settings.histogram_bins,
            notice: None,
        };
        dashboard.recompute()?;
        info!(
            variant = ?settings.variant,
            rows = dashboard.dataset.height(),
            figure = dashboard.figure.kind_name(),
            "dashboard ready"
        );
        Ok(dashboard)
    }

    /// Apply one control change. Errors are resolution failures and are fatal.
    pub fn apply(&mut self, change: ControlChange) -> Result<Recompute> {
        let changed = change.control();
        if !ControlId::for_variant(self.variant).contains(&changed) {
            return Err(eyre!(
                "control '{}' does not exist on the {:?} dashboard",
                changed.as_str(),
                self.variant
            ));
        }

        if let ControlChange::VizType(Some(family)) = &change {
            if !family.is_rendered() {
                let notice = format!("{} cannot be drawn yet; choose Histogram", family.label());
                info!(family = family.label(), "refused unrendered visualization");
                self.notice = Some(notice);
                return Ok(Recompute {
                    changed,
                    cleared: Vec::new(),
                    refused: true,
                });
            }
        }

        self.state.apply(change);
        let cleared = self.recompute()?;
        self.notice = self.picker_notice();
        Ok(Recompute {
            changed,
            cleared,
            refused: false,
        })
    }

    fn recompute(&mut self) -> Result<Vec<ControlId>> {
        self.options = resolve_options(self.variant, &self.state, &self.schema);
        let cleared = normalize_selections(&mut self.state, &self.options);
        for control in &cleared {
            debug!(control = control.as_str(), "selection cleared by normalization");
        }
        self.figure = resolve_chart(&self.dataset, self.variant, &self.state, self.histogram_bins)?;
        Ok(cleared)
    }

    /// Histogram picked without a numeric column to bin.
    fn picker_notice(&self) -> Option<String> {
        if self.state.selection_mode != Some(SelectionMode::NewViz)
            || self.state.viz_type != Some(VizFamily::Histogram)
            || first_numeric(&self.dataset, &self.state.compare_columns).is_some()
        {
            return None;
        }
        Some(if self.state.compare_columns.is_empty() {
            "Check a numeric column to draw the histogram".to_string()
        } else {
            format!(
                "Histogram needs a numeric column; {} is not numeric",
                self.state.compare_columns.join(", ")
            )
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn variant(&self) -> DashboardVariant {
        self.variant
    }

    pub fn schema(&self) -> &SelectableSchema {
        &self.schema
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Current options of a control; empty when the variant lacks it.
    pub fn option_set(&self, control: ControlId) -> &OptionSet {
        static EMPTY: OptionSet = OptionSet::empty();
        self.options.get(&control).unwrap_or(&EMPTY)
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
