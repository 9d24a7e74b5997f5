//! Detail panel for the current selection: per-country metrics, or the
//! aggregate view when the trend line's "Global" selection is active.

use crate::data::{Metric, Record, RecordStore};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use crate::utils::{fmt_opt, fmt_thousands};
use eframe::egui;
use egui_phosphor::regular as icons;

/// Sentinel country name produced by clicking the trend line.
pub const GLOBAL: &str = "Global";

/// The record shown for a country: the selected year if present, otherwise
/// the most recent earlier year.
pub fn record_for<'a>(store: &'a RecordStore, country: &str, year: i32) -> Option<&'a Record> {
    store
        .all()
        .iter()
        .filter(|r| r.country == country && r.year <= year)
        .max_by_key(|r| r.year)
}

pub fn show(ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
    let Some(country) = selection.country().map(str::to_owned) else {
        ui.label(
            egui::RichText::new("Click a mark in any chart to inspect a country.")
                .small()
                .weak(),
        );
        return;
    };

    ui.horizontal(|ui| {
        ui.heading(&country);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button(format!("{} Reset", icons::X))
                .on_hover_text("Clear the highlight")
                .clicked()
            {
                selection.clear_country();
            }
        });
    });
    ui.separator();

    if country == GLOBAL {
        show_global(ui, store, selection);
        return;
    }

    let Some(record) = record_for(store, &country, selection.year()) else {
        ui.label(egui::RichText::new("No data for this country.").weak());
        return;
    };

    ui.label(
        egui::RichText::new(format!("{} · {}", record.region, record.year))
            .small()
            .color(theme::ACCENT_COLOR),
    );
    ui.add_space(6.0);

    egui::Grid::new("info_metrics")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            for metric in Metric::ALL {
                ui.label(egui::RichText::new(metric.short_label()).strong());
                let text = match metric.value(record) {
                    Some(v) if v.abs() >= 1000.0 => {
                        format!("{} {}", fmt_thousands(v), metric.unit())
                    }
                    other => format!("{} {}", fmt_opt(other, 1), metric.unit()),
                };
                ui.label(text);
                ui.end_row();
            }
        });
}

fn show_global(ui: &mut egui::Ui, store: &RecordStore, selection: &SelectionState) {
    let working = store.working_set(selection.region().as_option());
    let slice: Vec<&Record> = working
        .iter()
        .copied()
        .filter(|r| r.year == selection.year())
        .collect();

    let renewable: Vec<f64> = slice.iter().filter_map(|r| r.renewable_share_pct).collect();
    let fossil: Vec<f64> = slice
        .iter()
        .filter_map(|r| r.fossil_dependency_pct)
        .collect();

    ui.label(
        egui::RichText::new(format!("{} · {}", selection.region().label(), selection.year()))
            .small()
            .color(theme::ACCENT_COLOR),
    );
    ui.add_space(6.0);

    egui::Grid::new("info_global")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Countries").strong());
            ui.label(slice.len().to_string());
            ui.end_row();

            ui.label(egui::RichText::new("Mean Renew. Share").strong());
            ui.label(format!("{} %", fmt_opt(stats::mean(&renewable), 1)));
            ui.end_row();

            ui.label(egui::RichText::new("Mean Fossil Dep.").strong());
            ui.label(format!("{} %", fmt_opt(stats::mean(&fossil), 1)));
            ui.end_row();
        });
}
