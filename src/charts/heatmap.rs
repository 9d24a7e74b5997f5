//! Metric correlation heatmap over the full dataset for the selected year,
//! with its own region filter independent of the dashboard-wide one.

use crate::charts::{self, ChartView};
use crate::data::{filter_year, Metric, RecordStore};
use crate::selection::{RegionFilter, SelectionState};
use crate::stats::{self, CorrCell};
use crate::theme;
use eframe::egui;
use egui::{Align2, FontId, Rect, Sense, Vec2};
use serde::{Deserialize, Serialize};

/// Full matrix over every metric pair, in `Metric::ALL` order.
pub fn derive(store: &RecordStore, year: i32, region: &RegionFilter) -> Vec<CorrCell> {
    let scoped = store.working_set(region.as_option());
    let slice = filter_year(&scoped, year);
    stats::correlation_matrix(&slice, &Metric::ALL)
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapView {
    pub region: RegionFilter,
}

impl Default for HeatmapView {
    fn default() -> Self {
        Self {
            region: RegionFilter::All,
        }
    }
}

impl ChartView for HeatmapView {
    fn title(&self) -> String {
        "Metric Correlations".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label("Region:");
            egui::ComboBox::from_id_salt("heatmap_region")
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

        let cells = derive(store, selection.year(), &self.region);
        if cells.iter().all(|c| c.value == 0.0) {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        }

        let n = Metric::ALL.len();
        let label_w = 90.0;
        let cell = 52.0;
        let size = Vec2::new(label_w + cell * n as f32, label_w * 0.4 + cell * n as f32);
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter();
        let origin = rect.min + Vec2::new(label_w, label_w * 0.4);
        let font = FontId::proportional(11.0);

        for (i, metric) in Metric::ALL.iter().enumerate() {
            painter.text(
                egui::pos2(origin.x + cell * (i as f32 + 0.5), rect.min.y + 8.0),
                Align2::CENTER_CENTER,
                metric.short_label(),
                font.clone(),
                ui.visuals().text_color(),
            );
            painter.text(
                egui::pos2(rect.min.x + label_w - 6.0, origin.y + cell * (i as f32 + 0.5)),
                Align2::RIGHT_CENTER,
                metric.short_label(),
                font.clone(),
                ui.visuals().text_color(),
            );
        }

        for c in &cells {
            let col = Metric::ALL.iter().position(|m| m == &c.x).unwrap_or(0);
            let row = Metric::ALL.iter().position(|m| m == &c.y).unwrap_or(0);
            let min = origin + Vec2::new(cell * col as f32, cell * row as f32);
            let cell_rect = Rect::from_min_size(min, Vec2::splat(cell - 2.0));
            painter.rect_filled(cell_rect, 3.0, theme::correlation_color(c.value));
            painter.text(
                cell_rect.center(),
                Align2::CENTER_CENTER,
                format!("{:.2}", c.value),
                font.clone(),
                egui::Color32::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Metric;

    const SAMPLE: &str = "\
Country,Year,Total Energy Consumption (TWh),Per Capita Energy Use (kWh),Renewable Energy Share (%),Fossil Fuel Dependency (%),Carbon Emissions (Million Tons)
Germany,2020,500,6000,40,50,700
France,2020,450,6500,45,40,300
Brazil,2020,600,2900,80,15,450
Japan,2020,900,7100,20,70,1000
";

    #[test]
    fn test_derive_full_matrix() {
        let store = RecordStore::from_reader(SAMPLE.as_bytes()).unwrap();
        let cells = derive(&store, 2020, &RegionFilter::All);
        assert_eq!(cells.len(), Metric::ALL.len() * Metric::ALL.len());
        for c in &cells {
            if c.x == c.y {
                assert_eq!(c.value, 1.0);
            }
            assert!(c.value.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_derive_region_scoped() {
        let store = RecordStore::from_reader(SAMPLE.as_bytes()).unwrap();
        let cells = derive(&store, 2020, &RegionFilter::Named("Oceania".to_owned()));
        // No Oceania rows in the sample: every cell is short of data.
        assert!(cells.iter().all(|c| c.value == 0.0));
    }
}
