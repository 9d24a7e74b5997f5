//! Dot/lollipop chart: top-10 per-capita consumers against the global
//! average, with a country text search.

use crate::charts::{self, ChartView};
use crate::data::{Record, RecordStore};
use crate::selection::{SelectionState, DIM_OPACITY};
use crate::stats;
use crate::theme;
use crate::utils::fmt_thousands;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points, VLine};

const TOP_COUNT: usize = 10;

/// Country plotted at a given y coordinate. Rank 0 draws at the top, so the
/// row index is mirrored against the list order.
fn country_at_row(names: &[String], y: f64, tolerance: f64) -> Option<&str> {
    let row = y.round();
    if (y - row).abs() > tolerance || row < 0.0 {
        return None;
    }
    let row = row as usize;
    (row < names.len()).then(|| names[names.len() - 1 - row].as_str())
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotDatum {
    pub country: String,
    pub region: &'static str,
    pub per_capita_kwh: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotRanking {
    /// Descending by per-capita use.
    pub top: Vec<DotDatum>,
    /// Mean over every unique country of the slice, not just the top rows.
    pub global_avg: f64,
}

pub fn derive(records: &[&Record]) -> Option<DotRanking> {
    let unique = stats::latest_per_entity(
        records.iter().copied(),
        |r| r.country.clone(),
        |r| r.per_capita_kwh,
    );
    let valid: Vec<&Record> = unique
        .into_iter()
        .filter(|r| r.per_capita_kwh.is_some())
        .collect();
    let values: Vec<f64> = valid.iter().filter_map(|r| r.per_capita_kwh).collect();
    let global_avg = stats::mean(&values)?;

    let top = stats::top_n(&valid, |r| r.per_capita_kwh.unwrap_or(f64::MIN), TOP_COUNT)
        .into_iter()
        .map(|r| DotDatum {
            country: r.country.clone(),
            region: r.region,
            per_capita_kwh: r.per_capita_kwh.unwrap_or(0.0),
        })
        .collect();

    Some(DotRanking { top, global_avg })
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DotView {
    #[serde(skip)]
    pub search: String,
}

impl DotView {
    fn opacity(&self, selection: &SelectionState, country: &str) -> f32 {
        let term = self.search.trim().to_lowercase();
        if !term.is_empty() {
            // The search dims non-matching rows, overriding the global hint.
            if country.to_lowercase().contains(&term) {
                1.0
            } else {
                DIM_OPACITY
            }
        } else {
            selection.mark_opacity(country)
        }
    }
}

impl ChartView for DotView {
    fn title(&self) -> String {
        format!("Top {TOP_COUNT} Per Capita Energy Use")
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label(format!("{} Search:", egui_phosphor::regular::MAGNIFYING_GLASS));
            ui.text_edit_singleline(&mut self.search);
        });

        let slice = charts::scoped_year_slice(store, selection);
        let Some(ranking) = derive(&slice) else {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        };

        let names: Vec<String> = ranking.top.iter().map(|d| d.country.clone()).collect();
        let tick_names = names.clone();
        let response = Plot::new("dot_chart")
            .height(300.0)
            .x_axis_label("Per Capita Energy Use (kWh)")
            .y_axis_formatter(move |mark, _range| {
                country_at_row(&tick_names, mark.value, 0.05)
                    .map(str::to_owned)
                    .unwrap_or_default()
            })
            .show_grid(false)
            .show(ui, |plot_ui| {
                for (i, d) in ranking.top.iter().enumerate() {
                    // Rank 0 at the top.
                    let y = (ranking.top.len() - 1 - i) as f64;
                    let opacity = self.opacity(selection, &d.country);
                    let color = theme::with_opacity(theme::region_color(d.region), opacity);
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[0.0, y], [d.per_capita_kwh, y]]))
                            .color(theme::with_opacity(egui::Color32::GRAY, opacity))
                            .width(1.0),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[d.per_capita_kwh, y]]))
                            .radius(5.0)
                            .color(color)
                            .name(format!(
                                "{} — {} kWh",
                                d.country,
                                fmt_thousands(d.per_capita_kwh)
                            )),
                    );
                }
                plot_ui.vline(
                    VLine::new(ranking.global_avg)
                        .color(theme::HIGHLIGHT_COLOR)
                        .name(format!(
                            "Global avg: {} kWh",
                            fmt_thousands(ranking.global_avg)
                        )),
                );
                plot_ui.pointer_coordinate()
            });

        if response.response.clicked() {
            let hit = response
                .inner
                .and_then(|p| country_at_row(&names, p.y, 0.35).map(str::to_owned));
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

    fn record(country: &str, per_capita: Option<f64>) -> Record {
        Record {
            country: country.to_owned(),
            year: 2024,
            region: "Other",
            total_twh: None,
            per_capita_kwh: per_capita,
            renewable_share_pct: None,
            fossil_dependency_pct: None,
            emissions_mt: None,
        }
    }

    #[test]
    fn test_derive_ranking_and_average() {
        let rows: Vec<Record> = (1..=12)
            .map(|i| record(&format!("C{i}"), Some(i as f64 * 100.0)))
            .collect();
        let refs: Vec<&Record> = rows.iter().collect();
        let ranking = derive(&refs).unwrap();

        assert_eq!(ranking.top.len(), 10);
        assert_eq!(ranking.top[0].country, "C12");
        // Average covers all 12 unique countries, not only the top 10.
        assert!((ranking.global_avg - 650.0).abs() < 1e-9);
    }

    #[test]
    fn test_country_at_row_mirrors_rank_order() {
        let names: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        // The top row (highest y) must read the #1-ranked country.
        assert_eq!(country_at_row(&names, 2.0, 0.05), Some("A"));
        assert_eq!(country_at_row(&names, 1.0, 0.05), Some("B"));
        assert_eq!(country_at_row(&names, 0.0, 0.05), Some("C"));
        // Off-grid, negative, and out-of-range rows carry no label.
        assert_eq!(country_at_row(&names, 1.4, 0.05), None);
        assert_eq!(country_at_row(&names, -1.0, 0.05), None);
        assert_eq!(country_at_row(&names, 3.0, 0.05), None);
    }

    #[test]
    fn test_derive_empty_returns_none() {
        let rows = vec![record("A", None)];
        let refs: Vec<&Record> = rows.iter().collect();
        assert!(derive(&refs).is_none());
    }
}
