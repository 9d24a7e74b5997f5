//! Integration tests over the fixture dataset: load, aggregate, and derive
//! every chart's data the way the dashboard does.

use std::path::PathBuf;
use wattscope::charts::{bar, boxplot, dot, heatmap, histogram, line, pairplot, pie, scatter};
use wattscope::data::{filter_year, Metric, RecordStore};
use wattscope::selection::{RegionFilter, SelectionState};
use wattscope::stats;

fn load_fixture() -> RecordStore {
    let path = PathBuf::from("testdata/energy.csv");
    RecordStore::load(path).expect("fixture should load")
}

#[test]
fn test_load_reports_missing_columns() {
    use std::io::Write as _;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Country,Year").unwrap();
    writeln!(file, "Germany,2020").unwrap();

    let err = RecordStore::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("missing required column"));
}

#[test]
fn test_load_fixture() {
    let store = load_fixture();
    // Two rows lack a country/year identity and are dropped.
    assert_eq!(store.all().len(), 19);
    assert_eq!(store.min_year(), 2019);
    assert_eq!(store.max_year(), 2024);

    // Invalid numeric cells survive as None.
    let atlantis = store
        .all()
        .iter()
        .find(|r| r.country == "Atlantis")
        .unwrap();
    assert_eq!(atlantis.region, "Other");
    assert_eq!(atlantis.per_capita_kwh, None);
    assert_eq!(atlantis.fossil_dependency_pct, None);
    assert_eq!(atlantis.total_twh, Some(10.0));
}

#[test]
fn test_region_scoping() {
    let store = load_fixture();
    let europe = store.working_set(Some("Europe"));
    assert!(!europe.is_empty());
    assert!(europe.iter().all(|r| r.region == "Europe"));

    let slice = filter_year(&europe, 2024);
    let countries: Vec<&str> = slice.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(countries, vec!["Germany", "France"]);
}

#[test]
fn test_bar_ranking_latest_year() {
    let store = load_fixture();
    let slice = store.year_slice(2024);
    let data = bar::derive(&slice, Metric::TotalConsumption);

    let names: Vec<&str> = data.iter().map(|d| d.country.as_str()).collect();
    assert_eq!(
        names,
        vec!["China", "United States", "India", "Japan", "Brazil"]
    );
    // The duplicate China row collapses to the larger value.
    assert_eq!(data[0].value, 9500.0);
    let share_sum: f64 = data.iter().map(|d| d.share_pct).sum();
    assert!((share_sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_dot_ranking_and_average() {
    let store = load_fixture();
    let slice = store.year_slice(2024);
    let ranking = dot::derive(&slice).unwrap();

    assert_eq!(ranking.top.len(), 8);
    assert_eq!(ranking.top[0].country, "United States");
    assert_eq!(ranking.top[1].country, "Australia");
    assert!(ranking.global_avg > 0.0);
}

#[test]
fn test_pie_mix_with_comparison() {
    let store = load_fixture();
    let all = store.working_set(None);
    let mix = pie::derive(&all, 2024).unwrap();

    let total: f64 = mix.slices.iter().map(|s| s.value).sum();
    assert!(total >= 100.0 - 1e-9);
    assert!(mix.slices.iter().all(|s| s.value >= 0.0));

    // 2019 data exists, so the five-year comparison is present.
    let cmp = mix.comparison.unwrap();
    assert_eq!(cmp.previous_year, 2019);
    assert!(cmp.renewable_delta.is_finite());
}

#[test]
fn test_line_trend_and_change() {
    let store = load_fixture();
    let all = store.working_set(None);
    let points = line::derive(&all);

    assert_eq!(points.first().map(|p| p.year), Some(2019));
    assert_eq!(points.last().map(|p| p.year), Some(2024));
    for w in points.windows(2) {
        assert!(w[0].year < w[1].year);
    }

    let change = line::five_year_change(&points).unwrap();
    assert_eq!(change.from_year, 2019);
    assert_eq!(change.to_year, 2024);
}

#[test]
fn test_boxplot_rising_trend() {
    let store = load_fixture();
    let all = store.working_set(None);
    let profile = boxplot::derive(&all, "china").unwrap();

    assert_eq!(profile.country, "China");
    assert_eq!(profile.boxes.len(), 6);
    // Yearly medians climb steadily across the fixture.
    assert_eq!(profile.trend, boxplot::Trend::Rising);
    for b in &profile.boxes {
        assert!(b.stats.lower <= b.stats.q1);
        assert!(b.stats.q3 <= b.stats.upper);
    }
}

#[test]
fn test_scatter_labels_largest() {
    let store = load_fixture();
    let slice = store.year_slice(2024);
    let data = scatter::derive(&slice, Metric::TotalConsumption);
    let labels: Vec<&str> = scatter::top_labels(&data)
        .iter()
        .map(|d| d.country.as_str())
        .collect();
    assert_eq!(labels, vec!["China", "United States", "India"]);
}

#[test]
fn test_histogram_covers_valid_values() {
    let store = load_fixture();
    let slice = store.year_slice(2024);
    let dist = histogram::derive(&slice).unwrap();

    let valid = slice
        .iter()
        .filter(|r| r.fossil_dependency_pct.is_some())
        .count();
    let counted: usize = dist.bins.iter().map(|b| b.count).sum();
    assert_eq!(counted, valid);
    assert!(dist.mean > 0.0 && dist.mean < 100.0);
}

#[test]
fn test_heatmap_matrix_properties() {
    let store = load_fixture();
    let cells = heatmap::derive(&store, 2024, &RegionFilter::All);

    assert_eq!(cells.len(), 25);
    for c in &cells {
        assert!(c.value.abs() <= 1.0 + 1e-12);
        if c.x == c.y {
            assert_eq!(c.value, 1.0);
        }
        // Symmetry: the mirrored cell carries the identical value.
        let mirror = cells
            .iter()
            .find(|m| m.x == c.y && m.y == c.x)
            .unwrap();
        assert_eq!(c.value, mirror.value);
    }
}

#[test]
fn test_pairplot_complete_rows_only() {
    let store = load_fixture();
    let rows = pairplot::derive(&store, 2024, &RegionFilter::All).unwrap();
    // Atlantis lacks most fields; every other 2024 row is complete.
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|r| r.country != "Atlantis"));

    // A thin region cannot fill the grid.
    assert!(pairplot::derive(&store, 2024, &RegionFilter::Named("Africa".to_owned())).is_err());
}

#[test]
fn test_selection_drives_scoped_queries() {
    let store = load_fixture();
    let mut selection = SelectionState::new(store.min_year(), store.max_year());
    assert_eq!(selection.year(), 2024);

    selection.set_region(RegionFilter::Named("Asia".to_owned()));
    let working = store.working_set(selection.region().as_option());
    let slice = filter_year(&working, selection.year());
    let data = bar::derive(&slice, Metric::TotalConsumption);

    let names: Vec<&str> = data.iter().map(|d| d.country.as_str()).collect();
    assert_eq!(names, vec!["China", "India", "Japan"]);

    // Play mode wraps at the end of the range.
    selection.step_year();
    assert_eq!(selection.year(), 2019);
}

#[test]
fn test_correlation_consistent_between_views() {
    let store = load_fixture();
    let slice = store.year_slice(2024);
    let cells = stats::correlation_matrix(&slice, &Metric::ALL);
    let heat = heatmap::derive(&store, 2024, &RegionFilter::All);
    assert_eq!(cells.len(), heat.len());
    for (a, b) in cells.iter().zip(&heat) {
        assert_eq!(a.value, b.value);
    }
}
