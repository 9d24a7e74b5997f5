//! Scatter plot: renewable share vs. fossil dependency with a selectable
//! size metric, quadrant guides, and top-3 labels.

use crate::charts::{self, ChartView};
use crate::data::{Metric, Record, RecordStore};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use crate::utils::fmt_thousands;
use eframe::egui;
use egui_plot::{HLine, Plot, PlotPoint, PlotPoints, Points, Text, VLine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterDatum {
    pub country: String,
    pub region: &'static str,
    pub renewable_pct: f64,
    pub fossil_pct: f64,
    pub size_value: f64,
}

/// Year slice with both axes and the size metric valid; duplicates collapse
/// per country; top-3 by size marked for labelling.
pub fn derive(records: &[&Record], size_metric: Metric) -> Vec<ScatterDatum> {
    let unique = stats::latest_per_entity(
        records.iter().copied(),
        |r| r.country.clone(),
        |r| size_metric.value(r),
    );
    unique
        .into_iter()
        .filter_map(|r| {
            Some(ScatterDatum {
                country: r.country.clone(),
                region: r.region,
                renewable_pct: r.renewable_share_pct?,
                fossil_pct: r.fossil_dependency_pct?,
                size_value: size_metric.value(r)?,
            })
        })
        .collect()
}

/// Countries to annotate: the three largest by size metric.
pub fn top_labels(data: &[ScatterDatum]) -> Vec<&ScatterDatum> {
    let refs: Vec<&ScatterDatum> = data.iter().collect();
    stats::top_n(&refs, |d| d.size_value, 3)
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterView {
    pub size_metric: Metric,
}

impl Default for ScatterView {
    fn default() -> Self {
        Self {
            size_metric: Metric::TotalConsumption,
        }
    }
}

impl ChartView for ScatterView {
    fn title(&self) -> String {
        "Renewables vs. Fossil Dependency".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label("Bubble size:");
            egui::ComboBox::from_id_salt("scatter_size_metric")
                .selected_text(self.size_metric.short_label())
                .show_ui(ui, |ui| {
                    for metric in [Metric::TotalConsumption, Metric::CarbonEmissions] {
                        ui.selectable_value(&mut self.size_metric, metric, metric.label());
                    }
                });
        });

        let slice = charts::scoped_year_slice(store, selection);
        let data = derive(&slice, self.size_metric);
        if data.is_empty() {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        }

        let max_size = data.iter().map(|d| d.size_value).fold(0.0, f64::max);
        let labels: Vec<String> = top_labels(&data)
            .iter()
            .map(|d| d.country.clone())
            .collect();

        let response = Plot::new("scatter_plot")
            .height(320.0)
            .x_axis_label("Renewable Energy Share (%)")
            .y_axis_label("Fossil Fuel Dependency (%)")
            .include_x(0.0)
            .include_x(100.0)
            .include_y(0.0)
            .include_y(100.0)
            .show(ui, |plot_ui| {
                // Quadrant guides at the 50% marks.
                plot_ui.vline(VLine::new(50.0).color(egui::Color32::DARK_GRAY));
                plot_ui.hline(HLine::new(50.0).color(egui::Color32::DARK_GRAY));

                for d in &data {
                    let opacity = selection.mark_opacity(&d.country);
                    let radius = if max_size > 0.0 {
                        3.0 + 12.0 * (d.size_value / max_size).sqrt() as f32
                    } else {
                        3.0
                    };
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[d.renewable_pct, d.fossil_pct]]))
                            .radius(radius)
                            .color(theme::with_opacity(theme::region_color(d.region), opacity))
                            .name(format!(
                                "{}\n{}: {} {}",
                                d.country,
                                self.size_metric.short_label(),
                                fmt_thousands(d.size_value),
                                self.size_metric.unit()
                            )),
                    );
                    if labels.contains(&d.country) {
                        plot_ui.text(Text::new(
                            PlotPoint::new(d.renewable_pct, d.fossil_pct + 4.0),
                            egui::RichText::new(d.country.clone()).small(),
                        ));
                    }
                }
                plot_ui.pointer_coordinate()
            });

        if response.response.clicked() {
            let hit = response.inner.and_then(|p| {
                data.iter()
                    .map(|d| {
                        let dx = d.renewable_pct - p.x;
                        let dy = d.fossil_pct - p.y;
                        (d, dx * dx + dy * dy)
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .filter(|(_, dist)| *dist < 16.0)
                    .map(|(d, _)| d.country.clone())
            });
            match hit {
                Some(country) => selection.select_country(country),
                None => selection.clear_country(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, renewable: f64, fossil: f64, total: Option<f64>) -> Record {
        Record {
            country: country.to_owned(),
            year: 2024,
            region: "Other",
            total_twh: total,
            per_capita_kwh: None,
            renewable_share_pct: Some(renewable),
            fossil_dependency_pct: Some(fossil),
            emissions_mt: None,
        }
    }

    #[test]
    fn test_derive_requires_all_fields() {
        let rows = vec![
            record("A", 10.0, 80.0, Some(100.0)),
            record("B", 10.0, 80.0, None),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let data = derive(&refs, Metric::TotalConsumption);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].country, "A");
    }

    #[test]
    fn test_top_labels_by_size() {
        let rows = vec![
            record("A", 1.0, 1.0, Some(10.0)),
            record("B", 1.0, 1.0, Some(40.0)),
            record("C", 1.0, 1.0, Some(30.0)),
            record("D", 1.0, 1.0, Some(20.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let data = derive(&refs, Metric::TotalConsumption);
        let labels: Vec<&str> = top_labels(&data).iter().map(|d| d.country.as_str()).collect();
        assert_eq!(labels, vec!["B", "C", "D"]);
    }
}
