use airdash::dataset::{ColumnKind, Dataset};
use airdash::figure::Figure;
use airdash::schema::ColumnPolicy;
use airdash::ui_state::{ChartKind, ControlChange, ControlId, Metric, SelectionMode, VizFamily};
use airdash::{Dashboard, DashboardSettings, DashboardVariant, MissingColumnPolicy, OpenOptions};

mod common;

fn load_listings() -> Dataset {
    let (_dir, path) = common::listings_csv();
    Dataset::from_csv(&path, &OpenOptions::default()).expect("listings should load")
}

fn metrics() -> Dashboard {
    Dashboard::new(load_listings(), &DashboardSettings::new(DashboardVariant::Metrics)).unwrap()
}

fn builder() -> Dashboard {
    Dashboard::new(load_listings(), &DashboardSettings::new(DashboardVariant::Builder)).unwrap()
}

/// The selected data column is offered, or nothing is selected.
fn assert_data_column_offered(dash: &Dashboard) {
    if let Some(column) = &dash.state().data_column {
        assert!(
            dash.option_set(ControlId::DataColumn).allows(column),
            "{} selected but not offered",
            column
        );
    }
}

#[test]
fn test_load_normalizes_percent_and_rating() {
    let (_dir, path) = common::write_csv(
        "small.csv",
        "id,host_response_rate,review_scores_rating",
        &["1,80%,95"],
    );
    let dataset = Dataset::from_csv(&path, &OpenOptions::default()).unwrap();
    assert_eq!(
        dataset.numeric_values("host_response_rate").unwrap(),
        vec![Some(0.8)]
    );
    assert_eq!(
        dataset.numeric_values("review_scores_rating").unwrap(),
        vec![Some(95.0)]
    );
}

#[test]
fn test_listings_file_column_kinds() {
    let dataset = load_listings();
    assert_eq!(dataset.height(), 6);
    assert_eq!(dataset.descriptor("accommodates").unwrap().kind, ColumnKind::Numeric);
    assert_eq!(dataset.descriptor("instant_bookable").unwrap().kind, ColumnKind::Boolean);
    assert_eq!(dataset.descriptor("city").unwrap().kind, ColumnKind::Categorical);

    let rates = dataset.numeric_values("host_response_rate").unwrap();
    assert_eq!(rates[1], None);
    assert_eq!(rates[2], Some(0.8));

    // "n/a" is nulled, never an error
    let ratings = dataset.numeric_values("review_scores_rating").unwrap();
    assert_eq!(ratings[3], None);
    assert_eq!(ratings[4], Some(40.0));
}

#[test]
fn test_bad_percentage_fails_load() {
    let (_dir, path) = common::write_csv(
        "bad.csv",
        "id,host_response_rate",
        &["1,80%", "2,fast"],
    );
    let err = Dataset::from_csv(&path, &OpenOptions::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"), "{}", msg);
    assert!(msg.contains("fast"), "{}", msg);
}

#[test]
fn test_missing_normalized_columns_are_skipped() {
    let (_dir, path) = common::write_csv("plain.csv", "id,beds", &["1,2", "2,3"]);
    let dataset = Dataset::from_csv(&path, &OpenOptions::default()).unwrap();
    assert_eq!(dataset.column_names(), vec!["id", "beds"]);
}

#[test]
fn test_pie_offers_only_boolean_columns() {
    let mut dash = builder();
    dash.apply(ControlChange::ChartKind(Some(ChartKind::Pie)))
        .unwrap();
    let options = dash.option_set(ControlId::DataColumn);
    let values: Vec<&str> = options.values().collect();
    assert!(values.contains(&"instant_bookable"));
    assert!(!values.contains(&"accommodates"));
    assert!(!values.contains(&"city"));
}

#[test]
fn test_line_chart_of_beds() {
    let mut dash = builder();
    dash.apply(ControlChange::ChartKind(Some(ChartKind::Line)))
        .unwrap();
    dash.apply(ControlChange::DataColumn(Some("beds".to_string())))
        .unwrap();
    match dash.figure() {
        Figure::Line(line) => {
            assert_eq!(line.x, vec![0, 1, 2, 3, 4, 5]);
            assert_eq!(
                line.y_values,
                vec![Some(1.0), Some(3.0), Some(3.0), Some(2.0), Some(1.0), Some(1.0)]
            );
        }
        other => panic!("expected a line chart, got {:?}", other),
    }
}

#[test]
fn test_accommodates_histogram_has_mean_line() {
    let dash = metrics();
    assert_eq!(
        dash.state().selection_mode,
        Some(SelectionMode::Metric(Metric::Accommodates))
    );
    match dash.figure() {
        Figure::Histogram(h) => {
            assert_eq!(h.x, "accommodates");
            assert!(h.aggregate.is_none());
            let mean = h.mean_line.expect("mean line").x;
            assert!((mean - 23.0 / 6.0).abs() < 1e-9);
            let total: f64 = h.bins.iter().filter_map(|b| b.value).sum();
            assert_eq!(total, 6.0);
        }
        other => panic!("expected a histogram, got {:?}", other),
    }
}

#[test]
fn test_rating_histogram_averages_by_response_rate() {
    let settings = DashboardSettings::new(DashboardVariant::Metrics).with_histogram_bins(2);
    let mut dash = Dashboard::new(load_listings(), &settings).unwrap();
    dash.apply(ControlChange::SelectionMode(SelectionMode::Metric(
        Metric::ReviewScoresRating,
    )))
    .unwrap();
    match dash.figure() {
        Figure::Histogram(h) => {
            assert_eq!(h.x, "review_scores_rating");
            assert_eq!(h.aggregate.as_ref().unwrap().y, "host_response_rate");
            assert!(h.mean_line.is_none());
            // Ratings span 40..100; the n/a rating and the null rate drop out
            assert_eq!(h.bins.len(), 2);
            assert_eq!(h.bins[0].value, Some(1.0));
            let upper = h.bins[1].value.unwrap();
            assert!((upper - 2.8 / 3.0).abs() < 1e-9, "{}", upper);
        }
        other => panic!("expected a histogram, got {:?}", other),
    }
}

#[test]
fn test_switch_pie_to_histogram_clears_boolean_column() {
    let mut dash = builder();
    dash.apply(ControlChange::ChartKind(Some(ChartKind::Pie)))
        .unwrap();
    dash.apply(ControlChange::DataColumn(Some("instant_bookable".to_string())))
        .unwrap();
    assert!(matches!(dash.figure(), Figure::Pie(_)));

    let recompute = dash
        .apply(ControlChange::ChartKind(Some(ChartKind::Histogram)))
        .unwrap();
    assert_eq!(recompute.cleared, vec![ControlId::DataColumn]);
    assert_eq!(dash.state().data_column, None);
    assert_eq!(dash.figure(), &Figure::Empty);

    dash.apply(ControlChange::DataColumn(Some("beds".to_string())))
        .unwrap();
    assert!(matches!(dash.figure(), Figure::Histogram(_)));
}

#[test]
fn test_data_column_always_offered_or_unset() {
    let mut dash = builder();
    let changes = [
        ControlChange::ChartKind(Some(ChartKind::Histogram)),
        ControlChange::DataColumn(Some("accommodates".to_string())),
        ControlChange::ChartKind(Some(ChartKind::Line)),
        ControlChange::ChartKind(Some(ChartKind::Pie)),
        ControlChange::DataColumn(Some("instant_bookable".to_string())),
        ControlChange::ChartKind(Some(ChartKind::NoSelection)),
        ControlChange::ChartKind(Some(ChartKind::Pie)),
        ControlChange::ChartKind(None),
    ];
    for change in changes {
        dash.apply(change).unwrap();
        assert_data_column_offered(&dash);
    }
}

#[test]
fn test_new_visualization_flow() {
    let mut dash = metrics();
    assert!(dash.option_set(ControlId::CompareColumns).is_empty());

    dash.apply(ControlChange::SelectionMode(SelectionMode::NewViz))
        .unwrap();
    assert_eq!(dash.figure(), &Figure::Empty);
    assert_eq!(dash.option_set(ControlId::CompareColumns).len(), 28);
    assert_eq!(dash.option_set(ControlId::VizType).len(), 7);

    let refused = dash
        .apply(ControlChange::VizType(Some(VizFamily::HeatMap)))
        .unwrap();
    assert!(refused.refused);
    assert!(dash.notice().unwrap().contains("Heat map"));
    assert_eq!(dash.state().viz_type, None);

    dash.apply(ControlChange::ToggleCompareColumn("beds".to_string()))
        .unwrap();
    dash.apply(ControlChange::VizType(Some(VizFamily::Histogram)))
        .unwrap();
    assert_eq!(dash.notice(), None);
    match dash.figure() {
        Figure::Histogram(h) => {
            assert_eq!(h.x, "beds");
            let mean = h.mean_line.expect("mean line").x;
            assert!((mean - 11.0 / 6.0).abs() < 1e-9);
        }
        other => panic!("expected a histogram, got {:?}", other),
    }

    // Leaving the picker clears its selections
    let recompute = dash
        .apply(ControlChange::SelectionMode(SelectionMode::Metric(
            Metric::NumberOfReviews,
        )))
        .unwrap();
    assert_eq!(
        recompute.cleared,
        vec![ControlId::CompareColumns, ControlId::VizType]
    );
    assert!(dash.state().compare_columns.is_empty());
}

#[test]
fn test_picker_histogram_flags_missing_numeric_column() {
    let mut dash = metrics();
    dash.apply(ControlChange::SelectionMode(SelectionMode::NewViz))
        .unwrap();
    dash.apply(ControlChange::VizType(Some(VizFamily::Histogram)))
        .unwrap();
    assert_eq!(dash.figure(), &Figure::Empty);
    assert!(dash.notice().unwrap().contains("numeric column"));

    dash.apply(ControlChange::ToggleCompareColumn("city".to_string()))
        .unwrap();
    assert_eq!(dash.figure(), &Figure::Empty);
    assert!(dash.notice().unwrap().contains("city is not numeric"));

    dash.apply(ControlChange::ToggleCompareColumn("accommodates".to_string()))
        .unwrap();
    assert_eq!(dash.notice(), None);
    assert!(matches!(dash.figure(), Figure::Histogram(h) if h.x == "accommodates"));
}

#[test]
fn test_builder_rejects_metric_controls() {
    let mut dash = builder();
    assert!(dash
        .apply(ControlChange::SelectionMode(SelectionMode::NewViz))
        .is_err());
}

#[test]
fn test_missing_fixed_columns_policies() {
    let (_dir, path) = common::write_csv(
        "partial.csv",
        "id,accommodates,number_of_reviews,host_response_rate,review_scores_rating",
        &["1,2,3,90%,88"],
    );
    let dataset = || Dataset::from_csv(&path, &OpenOptions::default()).unwrap();
    let settings = DashboardSettings::new(DashboardVariant::Metrics);

    let err = Dashboard::new(dataset(), &settings).err().expect("fail policy");
    assert!(err.to_string().contains("log_price"), "{}", err);

    let skip = Dashboard::new(
        dataset(),
        &settings.clone().with_missing_columns(MissingColumnPolicy::Skip),
    )
    .unwrap();
    assert_eq!(skip.schema().len(), 5);

    let keep = Dashboard::new(
        dataset(),
        &settings.with_missing_columns(MissingColumnPolicy::Keep),
    )
    .unwrap();
    assert_eq!(keep.schema().len(), 28);
}

#[test]
fn test_denylist_policy_drops_listed_columns() {
    let dash = Dashboard::new(
        load_listings(),
        &DashboardSettings::new(DashboardVariant::Builder)
            .with_column_policy(ColumnPolicy::Denylist(vec!["amenities".to_string()])),
    )
    .unwrap();
    let names: Vec<&str> = dash.schema().names().collect();
    assert_eq!(names.len(), 27);
    assert!(!names.contains(&"amenities"));
    assert_eq!(names[0], "id");
}
