//! Chart views: thin consumers of the aggregation engine.
//!
//! Every view follows the same shape — a pure `derive` step turning a record
//! subset plus the current selection snapshot into a derived dataset with a
//! stable per-datum key, and a render step handing that dataset to egui/
//! egui_plot. The derive functions live here so they can be tested without a
//! UI; rendering owns no data beyond per-chart widget state.
//!
//! Engine errors are downgraded at this boundary: a derivation that comes up
//! short for the current filter combination renders a placeholder instead of
//! propagating to other charts.

pub mod bar;
pub mod boxplot;
pub mod bubble;
pub mod dot;
pub mod heatmap;
pub mod histogram;
pub mod line;
pub mod pairplot;
pub mod pie;
pub mod scatter;

use crate::data::{filter_year, Record, RecordStore};
use crate::error::WattscopeError;
use crate::selection::SelectionState;
use eframe::egui;

/// A chart panel of the dashboard.
///
/// Views never mutate the selection except through their documented click
/// handlers (select a country, clear the highlight).
pub trait ChartView {
    fn title(&self) -> String;
    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState);
}

/// Working-set records for the selected year: region pre-filter first, then
/// the year slice. This is the scope used by every chart that does not
/// explicitly opt out of the region filter.
pub fn scoped_year_slice<'a>(store: &'a RecordStore, selection: &SelectionState) -> Vec<&'a Record> {
    let working = store.working_set(selection.region().as_option());
    filter_year(&working, selection.year())
}

/// Placeholder body for a chart without enough data under the current filters.
pub fn empty_state(ui: &mut egui::Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(egui::RichText::new(message).weak());
        ui.add_space(40.0);
    });
}

/// Downgrade a derivation error to a placeholder render.
pub fn render_fallback(ui: &mut egui::Ui, err: &WattscopeError) {
    match err {
        WattscopeError::InsufficientData(_) => {
            empty_state(ui, "Not enough data for the current selection.");
        }
        other => {
            tracing::error!(error = %other, "chart derivation failed");
            empty_state(ui, "Chart unavailable.");
        }
    }
}
