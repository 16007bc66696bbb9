//! Maps the current selections onto one figure.

use airdash_cli::DashboardVariant;
use color_eyre::Result;
use tracing::debug;

use crate::dataset::{ColumnKind, Dataset, HOST_RESPONSE_RATE, REVIEW_SCORES_RATING};
use crate::figure::{Figure, Histogram, LineChart, PieChart};
use crate::ui_state::{ChartKind, Metric, SelectionMode, UiState, VizFamily};

/// Resolve the figure for `state`. `bins` is the histogram bin count, 0 for
/// automatic binning.
///
/// Errors when a selection names a column the dataset lacks, or binds a
/// non-numeric column to a histogram or line chart.
pub fn resolve_chart(
    dataset: &Dataset,
    variant: DashboardVariant,
    state: &UiState,
    bins: usize,
) -> Result<Figure> {
    let figure = match variant {
        DashboardVariant::Metrics => match state.selection_mode {
            None => Figure::Empty,
            Some(SelectionMode::NewViz) => match state.viz_type {
                Some(VizFamily::Histogram) => match first_numeric(dataset, &state.compare_columns) {
                    Some(column) => {
                        let values = dataset.numeric_values(column)?;
                        let mean = dataset.mean(column)?;
                        Figure::Histogram(Histogram::count(column, &values, bins).with_mean_line(mean))
                    }
                    None => Figure::Empty,
                },
                _ => Figure::Empty,
            },
            Some(SelectionMode::Metric(Metric::ReviewScoresRating)) => {
                Figure::Histogram(Histogram::average(
                    REVIEW_SCORES_RATING,
                    &dataset.numeric_values(REVIEW_SCORES_RATING)?,
                    HOST_RESPONSE_RATE,
                    &dataset.numeric_values(HOST_RESPONSE_RATE)?,
                    bins,
                ))
            }
            Some(SelectionMode::Metric(metric)) => {
                let column = metric.column();
                let values = dataset.numeric_values(column)?;
                let mean = dataset.mean(column)?;
                Figure::Histogram(Histogram::count(column, &values, bins).with_mean_line(mean))
            }
        },
        DashboardVariant::Builder => match (state.chart_kind, state.data_column.as_deref()) {
            (None | Some(ChartKind::NoSelection), _) | (_, None) => Figure::Empty,
            (Some(ChartKind::Histogram), Some(column)) => Figure::Histogram(Histogram::count(
                column,
                &dataset.numeric_values(column)?,
                bins,
            )),
            (Some(ChartKind::Line), Some(column)) => {
                Figure::Line(LineChart::new(column, dataset.numeric_values(column)?))
            }
            (Some(ChartKind::Pie), Some(column)) => {
                Figure::Pie(PieChart::from_labels(column, &dataset.labels(column)?))
            }
        },
    };
    debug!(figure = figure.kind_name(), title = %figure.title(), "chart resolved");
    Ok(figure)
}

/// First checked compare column the picker histogram can bin.
pub fn first_numeric<'a>(dataset: &Dataset, columns: &'a [String]) -> Option<&'a str> {
    columns
        .iter()
        .find(|c| {
            dataset
                .descriptor(c)
                .is_some_and(|d| d.kind == ColumnKind::Numeric)
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn dataset() -> Dataset {
        let df = df!(
            "accommodates" => &[2i64, 4, 6],
            "number_of_reviews" => &[0i64, 10, 20],
            "host_response_rate" => &[Some("50%"), Some("100%"), None],
            "review_scores_rating" => &["90", "100", "bad"],
            "instant_bookable" => &["t", "f", "t"],
            "city" => &["NYC", "SF", "LA"]
        )
        .unwrap();
        Dataset::from_frame(df).unwrap()
    }

    fn metrics(mode: Option<SelectionMode>) -> UiState {
        UiState {
            selection_mode: mode,
            ..UiState::default()
        }
    }

    fn builder(kind: Option<ChartKind>, column: Option<&str>) -> UiState {
        UiState {
            chart_kind: kind,
            data_column: column.map(str::to_string),
            ..UiState::default()
        }
    }

    #[test]
    fn metric_histogram_has_mean_line() {
        let state = metrics(Some(SelectionMode::Metric(Metric::NumberOfReviews)));
        let Figure::Histogram(h) = resolve_chart(&dataset(), DashboardVariant::Metrics, &state, 0).unwrap() else {
            panic!("expected histogram");
        };
        assert_eq!(h.x, "number_of_reviews");
        assert_eq!(h.mean_line.map(|m| m.x), Some(10.0));
        assert!(h.aggregate.is_none());
    }

    #[test]
    fn rating_histogram_averages_response_rate() {
        let state = metrics(Some(SelectionMode::Metric(Metric::ReviewScoresRating)));
        let Figure::Histogram(h) = resolve_chart(&dataset(), DashboardVariant::Metrics, &state, 1).unwrap() else {
            panic!("expected histogram");
        };
        assert_eq!(h.aggregate.as_ref().map(|a| a.y.as_str()), Some("host_response_rate"));
        assert!(h.mean_line.is_none());
        assert_eq!(h.observations, 2);
        assert_eq!(h.bins[0].value, Some(0.75));
    }

    #[test]
    fn new_viz_and_unset_are_empty() {
        let ds = dataset();
        for mode in [None, Some(SelectionMode::NewViz)] {
            let figure = resolve_chart(&ds, DashboardVariant::Metrics, &metrics(mode), 0).unwrap();
            assert!(figure.is_empty());
        }
    }

    #[test]
    fn new_viz_histogram_bins_first_numeric_column() {
        let state = UiState {
            selection_mode: Some(SelectionMode::NewViz),
            compare_columns: vec!["city".to_string(), "accommodates".to_string()],
            viz_type: Some(VizFamily::Histogram),
            ..UiState::default()
        };
        let Figure::Histogram(h) = resolve_chart(&dataset(), DashboardVariant::Metrics, &state, 0).unwrap() else {
            panic!("expected histogram");
        };
        assert_eq!(h.x, "accommodates");
        assert_eq!(h.mean_line.map(|m| m.x), Some(4.0));

        let text_only = UiState {
            compare_columns: vec!["city".to_string()],
            ..state
        };
        assert!(resolve_chart(&dataset(), DashboardVariant::Metrics, &text_only, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn builder_needs_kind_and_column() {
        let ds = dataset();
        let cases = [
            builder(None, Some("accommodates")),
            builder(Some(ChartKind::NoSelection), Some("accommodates")),
            builder(Some(ChartKind::Histogram), None),
        ];
        for state in cases {
            assert_eq!(
                resolve_chart(&ds, DashboardVariant::Builder, &state, 0).unwrap(),
                Figure::Empty
            );
        }
    }

    #[test]
    fn builder_pie_counts_values() {
        let state = builder(Some(ChartKind::Pie), Some("instant_bookable"));
        let Figure::Pie(pie) = resolve_chart(&dataset(), DashboardVariant::Builder, &state, 0).unwrap() else {
            panic!("expected pie");
        };
        assert_eq!(pie.slices.len(), 2);
        assert_eq!(pie.slices[0].count, 2);
    }

    #[test]
    fn absent_or_text_column_is_an_error() {
        let ds = dataset();
        let absent = builder(Some(ChartKind::Line), Some("beds"));
        assert!(resolve_chart(&ds, DashboardVariant::Builder, &absent, 0).is_err());
        let text = builder(Some(ChartKind::Histogram), Some("city"));
        assert!(resolve_chart(&ds, DashboardVariant::Builder, &text, 0).is_err());
    }
}
