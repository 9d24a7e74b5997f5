//! Fossil dependency distribution for the selected year, with a mean marker.

use crate::charts::{self, ChartView};
use crate::data::Record;
use crate::data::RecordStore;
use crate::selection::SelectionState;
use crate::stats::{self, HistBin};
use crate::theme;
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot, VLine};

const BIN_HINT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub bins: Vec<HistBin>,
    pub mean: f64,
}

/// Bin the year slice's fossil dependency values; `None` when no record of
/// the slice carries a valid value.
pub fn derive(records: &[&Record]) -> Option<Distribution> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.fossil_dependency_pct)
        .collect();
    let mean = stats::mean(&values)?;
    Some(Distribution {
        bins: stats::histogram_bins(&values, BIN_HINT),
        mean,
    })
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct HistogramView {}

impl ChartView for HistogramView {
    fn title(&self) -> String {
        "Fossil Fuel Dependency Distribution".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        let slice = charts::scoped_year_slice(store, selection);
        let Some(dist) = derive(&slice) else {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        };

        let bars: Vec<Bar> = dist
            .bins
            .iter()
            .map(|b| {
                Bar::new((b.lo + b.hi) / 2.0, b.count as f64)
                    .width((b.hi - b.lo).max(f64::EPSILON) * 0.95)
                    .fill(theme::with_opacity(theme::ACCENT_COLOR, 0.8))
                    .name(format!("{:.0}–{:.0}%: {} countries", b.lo, b.hi, b.count))
            })
            .collect();

        Plot::new("fossil_histogram")
            .height(260.0)
            .x_axis_label("Fossil Fuel Dependency (%)")
            .y_axis_label("Countries")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
                plot_ui.vline(
                    VLine::new(dist.mean)
                        .color(theme::HIGHLIGHT_COLOR)
                        .style(egui_plot::LineStyle::dashed_loose())
                        .name(format!("Mean: {:.1}%", dist.mean)),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, fossil: Option<f64>) -> Record {
        Record {
            country: country.to_owned(),
            year: 2024,
            region: "Other",
            total_twh: None,
            per_capita_kwh: None,
            renewable_share_pct: None,
            fossil_dependency_pct: fossil,
            emissions_mt: None,
        }
    }

    #[test]
    fn test_derive_counts_and_mean() {
        let rows: Vec<Record> = (0..50)
            .map(|i| record(&format!("C{i}"), Some(i as f64 * 2.0)))
            .collect();
        let refs: Vec<&Record> = rows.iter().collect();
        let dist = derive(&refs).unwrap();

        let total: usize = dist.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 50);
        assert!((dist.mean - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_skips_missing_values() {
        let rows = vec![record("A", Some(10.0)), record("B", None)];
        let refs: Vec<&Record> = rows.iter().collect();
        let dist = derive(&refs).unwrap();
        let total: usize = dist.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_derive_empty_returns_none() {
        let rows = vec![record("A", None)];
        let refs: Vec<&Record> = rows.iter().collect();
        assert!(derive(&refs).is_none());
    }
}
