//! Top-5 countries bar chart with a switchable metric.

use crate::charts::{self, ChartView};
use crate::data::{Metric, Record, RecordStore};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use crate::utils::fmt_thousands;
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot};
use serde::{Deserialize, Serialize};

const TOP_COUNT: usize = 5;

/// One bar, keyed by country.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub country: String,
    pub region: &'static str,
    pub value: f64,
    /// Share of the top-N total, in percent.
    pub share_pct: f64,
}

/// Top-5 countries by `metric` for the given year slice: duplicates collapse
/// to the max-value row per country, then a stable descending sort.
pub fn derive(records: &[&Record], metric: Metric) -> Vec<BarDatum> {
    let unique = stats::latest_per_entity(
        records.iter().copied(),
        |r| r.country.clone(),
        |r| metric.value(r),
    );
    let valid: Vec<&Record> = unique
        .into_iter()
        .filter(|r| metric.value(r).is_some())
        .collect();
    let top = stats::top_n(&valid, |r| metric.value(r).unwrap_or(f64::MIN), TOP_COUNT);

    let total: f64 = top.iter().filter_map(|r| metric.value(r)).sum();
    top.into_iter()
        .map(|r| {
            let value = metric.value(r).unwrap_or(0.0);
            BarDatum {
                country: r.country.clone(),
                region: r.region,
                value,
                share_pct: if total > 0.0 { value / total * 100.0 } else { 0.0 },
            }
        })
        .collect()
}

/// Bar under a click at plot coordinates, if any: inside the bar's column and
/// between the baseline and its top. Clicks in the empty band above a bar are
/// background.
fn bar_at(data: &[BarDatum], x: f64, y: f64) -> Option<&BarDatum> {
    let i = x.round();
    if (x - i).abs() > 0.35 || i < 0.0 {
        return None;
    }
    let datum = data.get(i as usize)?;
    (y >= 0.0 && y <= datum.value).then_some(datum)
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct BarView {
    pub metric: Metric,
}

impl Default for BarView {
    fn default() -> Self {
        Self {
            metric: Metric::TotalConsumption,
        }
    }
}

impl ChartView for BarView {
    fn title(&self) -> String {
        format!("Top {TOP_COUNT} Countries — {}", self.metric.label())
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label("Metric:");
            egui::ComboBox::from_id_salt("bar_metric")
                .selected_text(self.metric.short_label())
                .show_ui(ui, |ui| {
                    for metric in [
                        Metric::TotalConsumption,
                        Metric::PerCapita,
                        Metric::RenewableShare,
                    ] {
                        ui.selectable_value(&mut self.metric, metric, metric.label());
                    }
                });
        });

        let slice = charts::scoped_year_slice(store, selection);
        let data = derive(&slice, self.metric);
        if data.is_empty() {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        }

        let bars: Vec<Bar> = data
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let opacity = selection.mark_opacity(&d.country);
                Bar::new(i as f64, d.value)
                    .width(0.7)
                    .fill(theme::with_opacity(theme::region_color(d.region), opacity))
                    .name(format!(
                        "{} — {} {} ({:.1}% of top {TOP_COUNT})",
                        d.country,
                        fmt_thousands(d.value),
                        self.metric.unit(),
                        d.share_pct
                    ))
            })
            .collect();

        let tick_names: Vec<String> = data.iter().map(|d| d.country.clone()).collect();
        let response = Plot::new("bar_chart")
            .height(280.0)
            .x_axis_formatter(move |mark, _range| {
                let i = mark.value.round() as usize;
                if (mark.value - i as f64).abs() < 0.05 {
                    tick_names.get(i).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .y_axis_label(self.metric.label())
            .show_grid(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
                plot_ui.pointer_coordinate()
            });

        if response.response.clicked() {
            // Click on a bar selects the country, background click clears.
            let hit = response.inner.and_then(|p| bar_at(&data, p.x, p.y));
            match hit {
                Some(d) => selection.select_country(d.country.clone()),
                None => selection.clear_country(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, total: Option<f64>) -> Record {
        Record {
            country: country.to_owned(),
            year: 2024,
            region: "Other",
            total_twh: total,
            per_capita_kwh: None,
            renewable_share_pct: None,
            fossil_dependency_pct: None,
            emissions_mt: None,
        }
    }

    #[test]
    fn test_derive_top_five_with_shares() {
        let rows: Vec<Record> = (1..=7)
            .map(|i| record(&format!("C{i}"), Some(i as f64 * 10.0)))
            .collect();
        let refs: Vec<&Record> = rows.iter().collect();
        let data = derive(&refs, Metric::TotalConsumption);

        assert_eq!(data.len(), 5);
        assert_eq!(data[0].country, "C7");
        assert_eq!(data[4].country, "C3");
        let share_sum: f64 = data.iter().map(|d| d.share_pct).sum();
        assert!((share_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_collapses_duplicates() {
        let rows = vec![
            record("Germany", Some(100.0)),
            record("Germany", Some(300.0)),
            record("France", Some(200.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let data = derive(&refs, Metric::TotalConsumption);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].country, "Germany");
        assert_eq!(data[0].value, 300.0);
    }

    #[test]
    fn test_bar_hit_bounded_by_height() {
        let data = vec![
            BarDatum {
                country: "A".to_owned(),
                region: "Other",
                value: 50.0,
                share_pct: 80.0,
            },
            BarDatum {
                country: "B".to_owned(),
                region: "Other",
                value: 10.0,
                share_pct: 20.0,
            },
        ];
        assert_eq!(bar_at(&data, 0.0, 25.0).map(|d| d.country.as_str()), Some("A"));
        assert_eq!(bar_at(&data, 1.2, 10.0).map(|d| d.country.as_str()), Some("B"));
        // A click in the empty band above a short bar is background.
        assert!(bar_at(&data, 1.0, 40.0).is_none());
        // Below the baseline, between columns, or past the last bar: no hit.
        assert!(bar_at(&data, 1.0, -1.0).is_none());
        assert!(bar_at(&data, 0.5, 5.0).is_none());
        assert!(bar_at(&data, 2.0, 5.0).is_none());
    }

    #[test]
    fn test_derive_skips_invalid_values() {
        let rows = vec![record("A", None), record("B", Some(5.0))];
        let refs: Vec<&Record> = rows.iter().collect();
        let data = derive(&refs, Metric::TotalConsumption);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].country, "B");
    }
}
