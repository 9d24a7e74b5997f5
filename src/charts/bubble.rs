//! Bubble chart: per-capita use vs. total consumption, bubble area by total
//! consumption, colored by region.

use crate::charts::{self, ChartView};
use crate::data::{Record, RecordStore};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use crate::utils::fmt_thousands;
use eframe::egui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

/// One bubble, keyed by country.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleDatum {
    pub country: String,
    pub region: &'static str,
    pub per_capita_kwh: f64,
    pub total_twh: f64,
}

/// Per-country latest rows of the slice with both axes valid.
pub fn derive(records: &[&Record]) -> Vec<BubbleDatum> {
    let unique = stats::latest_per_entity(
        records.iter().copied(),
        |r| r.country.clone(),
        |r| r.total_twh,
    );
    unique
        .into_iter()
        .filter_map(|r| {
            let per_capita = r.per_capita_kwh?;
            let total = r.total_twh?;
            Some(BubbleDatum {
                country: r.country.clone(),
                region: r.region,
                per_capita_kwh: per_capita,
                total_twh: total,
            })
        })
        .collect()
}

/// Square-root radius scale so bubble *area* tracks the value.
fn radius_for(total: f64, max_total: f64) -> f32 {
    if max_total <= 0.0 {
        return 4.0;
    }
    4.0 + 14.0 * (total / max_total).sqrt() as f32
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct BubbleView {}

impl ChartView for BubbleView {
    fn title(&self) -> String {
        "Energy Consumption by Country".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        let slice = charts::scoped_year_slice(store, selection);
        let data = derive(&slice);
        if data.is_empty() {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        }

        let max_total = data.iter().map(|d| d.total_twh).fold(0.0, f64::max);

        let response = Plot::new("bubble_chart")
            .height(320.0)
            .x_axis_label("Per Capita Energy Use (kWh)")
            .y_axis_label("Total Energy Consumption (TWh)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for d in &data {
                    let opacity = selection.mark_opacity(&d.country);
                    let points =
                        Points::new(PlotPoints::from(vec![[d.per_capita_kwh, d.total_twh]]))
                            .radius(radius_for(d.total_twh, max_total))
                            .color(theme::with_opacity(theme::region_color(d.region), opacity))
                            .name(format!(
                                "{} ({})\n{} TWh",
                                d.country,
                                d.region,
                                fmt_thousands(d.total_twh)
                            ));
                    plot_ui.points(points);
                }
                plot_ui.pointer_coordinate()
            });

        if response.response.clicked() {
            let hit = response.inner.and_then(|p| {
                // Nearest bubble in data space, within a tolerant radius.
                data.iter()
                    .map(|d| {
                        let dx = (d.per_capita_kwh - p.x) / 1.0_f64.max(p.x.abs());
                        let dy = (d.total_twh - p.y) / 1.0_f64.max(p.y.abs());
                        (d, dx * dx + dy * dy)
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .filter(|(_, dist)| *dist < 0.01)
                    .map(|(d, _)| d.country.clone())
            });
            match hit {
                Some(country) => selection.select_country(country),
                None => selection.clear_country(),
            }
        }
    }
}
