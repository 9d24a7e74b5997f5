//! Pair plot: pairwise scatter of every metric combination over the full
//! dataset for the selected year, with per-metric histograms on the diagonal.
//!
//! Like the heatmap this reads the original set with its own region filter,
//! so the two correlation views always agree with each other.

use crate::charts::{self, ChartView};
use crate::data::{filter_year, Metric, Record, RecordStore};
use crate::error::{Result, WattscopeError};
use crate::selection::{RegionFilter, SelectionState};
use crate::stats;
use crate::theme;
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};
use serde::{Deserialize, Serialize};

/// Rows below this count render as a placeholder instead of a sparse grid.
const MIN_ROWS: usize = 5;
const DIAGONAL_BINS: usize = 10;

/// One fully-valid observation: every metric present.
#[derive(Debug, Clone, PartialEq)]
pub struct PairRow {
    pub country: String,
    pub region: &'static str,
    pub values: [f64; 5],
}

impl PairRow {
    pub fn value(&self, metric: Metric) -> f64 {
        let i = Metric::ALL.iter().position(|m| *m == metric).unwrap_or(0);
        self.values[i]
    }
}

/// Rows of the year slice where all five metrics are valid; the grid needs a
/// handful of complete observations to say anything.
pub fn derive(store: &RecordStore, year: i32, region: &RegionFilter) -> Result<Vec<PairRow>> {
    let scoped = store.working_set(region.as_option());
    let slice = filter_year(&scoped, year);

    let rows: Vec<PairRow> = slice
        .iter()
        .filter_map(|r| {
            let mut values = [0.0; 5];
            for (i, metric) in Metric::ALL.iter().enumerate() {
                values[i] = metric.value(r)?;
            }
            Some(PairRow {
                country: r.country.clone(),
                region: r.region,
                values,
            })
        })
        .collect();

    if rows.len() < MIN_ROWS {
        return Err(WattscopeError::InsufficientData(format!(
            "{} complete rows for {year}, need {MIN_ROWS}",
            rows.len()
        )));
    }
    Ok(rows)
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct PairPlotView {
    pub region: RegionFilter,
}

impl Default for PairPlotView {
    fn default() -> Self {
        Self {
            region: RegionFilter::All,
        }
    }
}

impl PairPlotView {
    fn cell_scatter(
        &self,
        ui: &mut egui::Ui,
        rows: &[PairRow],
        x: Metric,
        y: Metric,
        selection: &SelectionState,
        size: f32,
    ) {
        Plot::new(format!("pair_{}_{}", x.short_label(), y.short_label()))
            .width(size)
            .height(size)
            .show_axes([false, false])
            .show_grid(false)
            .show(ui, |plot_ui| {
                for row in rows {
                    let opacity = selection.mark_opacity(&row.country);
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[row.value(x), row.value(y)]]))
                            .radius(2.0)
                            .color(theme::with_opacity(theme::region_color(row.region), opacity)),
                    );
                }
            });
    }

    fn cell_histogram(&self, ui: &mut egui::Ui, rows: &[PairRow], metric: Metric, size: f32) {
        let values: Vec<f64> = rows.iter().map(|r| r.value(metric)).collect();
        let bins = stats::histogram_bins(&values, DIAGONAL_BINS);
        let bars: Vec<Bar> = bins
            .iter()
            .map(|b| {
                Bar::new((b.lo + b.hi) / 2.0, b.count as f64)
                    .width((b.hi - b.lo).max(f64::EPSILON) * 0.9)
                    .fill(theme::with_opacity(theme::ACCENT_COLOR, 0.8))
            })
            .collect();
        Plot::new(format!("pair_hist_{}", metric.short_label()))
            .width(size)
            .height(size)
            .show_axes([false, false])
            .show_grid(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });
    }
}

impl ChartView for PairPlotView {
    fn title(&self) -> String {
        "Metric Pair Plot".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label("Region:");
            egui::ComboBox::from_id_salt("pairplot_region")
                .selected_text(self.region.label())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.region, RegionFilter::All, "All regions");
                    for name in crate::data::regions::region_names() {
                        ui.selectable_value(
                            &mut self.region,
                            RegionFilter::Named(name.to_owned()),
                            name,
                        );
                    }
                });
        });

        let rows = match derive(store, selection.year(), &self.region) {
            Ok(rows) => rows,
            Err(err) => {
                charts::render_fallback(ui, &err);
                return;
            }
        };

        let n = Metric::ALL.len();
        let size = (ui.available_width() / n as f32 - 6.0).clamp(48.0, 110.0);

        egui::Grid::new("pair_grid").spacing([4.0, 4.0]).show(ui, |ui| {
            for (row_i, y) in Metric::ALL.iter().enumerate() {
                for (col_i, x) in Metric::ALL.iter().enumerate() {
                    if row_i == col_i {
                        self.cell_histogram(ui, &rows, *x, size);
                    } else if col_i < row_i {
                        self.cell_scatter(ui, &rows, *x, *y, selection, size);
                    } else {
                        // Upper triangle mirrors the lower; leave it blank.
                        ui.allocate_exact_size(egui::Vec2::splat(size), egui::Sense::hover());
                    }
                }
                ui.end_row();
            }
        });

        ui.label(
            egui::RichText::new(format!("{} complete observations", rows.len()))
                .small()
                .weak(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_rows(complete: usize, partial: usize) -> String {
        let mut s = String::from(
            "Country,Year,Total Energy Consumption (TWh),Per Capita Energy Use (kWh),Renewable Energy Share (%),Fossil Fuel Dependency (%),Carbon Emissions (Million Tons)\n",
        );
        for i in 0..complete {
            s.push_str(&format!(
                "C{i},2024,{},{},{},{},{}\n",
                100 + i,
                5000 + i,
                20 + i,
                60 - i,
                400 + i
            ));
        }
        for i in 0..partial {
            s.push_str(&format!("P{i},2024,{},,,,\n", 100 + i));
        }
        s
    }

    #[test]
    fn test_derive_requires_complete_rows() {
        let csv = csv_rows(6, 3);
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        let rows = derive(&store, 2024, &RegionFilter::All).unwrap();
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn test_derive_too_few_rows_fails() {
        let csv = csv_rows(4, 10);
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            derive(&store, 2024, &RegionFilter::All),
            Err(WattscopeError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_pair_row_value_order() {
        let row = PairRow {
            country: "X".to_owned(),
            region: "Other",
            values: [1.0, 2.0, 3.0, 4.0, 5.0],
        };
        assert_eq!(row.value(Metric::PerCapita), 1.0);
        assert_eq!(row.value(Metric::FossilDependency), 5.0);
    }
}
