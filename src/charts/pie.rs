//! Global energy mix pie: mean renewable and fossil shares with the
//! zero-clamped "other" remainder, plus a five-year comparison.

use crate::charts::{self, ChartView};
use crate::data::Record;
use crate::data::RecordStore;
use crate::error::{Result, WattscopeError};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use eframe::egui;
use egui::{Color32, Pos2, Vec2};

pub const SLICE_KINDS: [&str; 3] = ["Renewable", "Fossil", "Other"];

/// One pie slice, keyed by its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub kind: &'static str,
    pub value: f64,
}

/// Change against the slice five years earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveYearComparison {
    pub previous_year: i32,
    pub renewable_delta: f64,
    pub fossil_delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMix {
    pub year: i32,
    pub slices: [Slice; 3],
    pub comparison: Option<FiveYearComparison>,
}

fn mix_for_year(records: &[&Record], year: i32) -> Option<(f64, f64)> {
    let slice: Vec<&Record> = records.iter().copied().filter(|r| r.year == year).collect();
    let renewable: Vec<f64> = slice.iter().filter_map(|r| r.renewable_share_pct).collect();
    let fossil: Vec<f64> = slice.iter().filter_map(|r| r.fossil_dependency_pct).collect();
    Some((stats::mean(&renewable)?, stats::mean(&fossil)?))
}

/// Mean shares over the year slice. The "other" remainder is a presentation
/// derivation, zero-clamped; the two source shares are independently sourced
/// and need not sum to 100.
pub fn derive(records: &[&Record], year: i32) -> Result<EnergyMix> {
    let (renewable, fossil) = mix_for_year(records, year).ok_or_else(|| {
        WattscopeError::InsufficientData(format!("no share data for {year}"))
    })?;
    let other = (100.0 - renewable - fossil).max(0.0);

    let comparison = mix_for_year(records, year - 5).map(|(prev_r, prev_f)| FiveYearComparison {
        previous_year: year - 5,
        renewable_delta: renewable - prev_r,
        fossil_delta: fossil - prev_f,
    });

    Ok(EnergyMix {
        year,
        slices: [
            Slice { kind: SLICE_KINDS[0], value: renewable },
            Slice { kind: SLICE_KINDS[1], value: fossil },
            Slice { kind: SLICE_KINDS[2], value: other },
        ],
        comparison,
    })
}

fn slice_color(kind: &str) -> Color32 {
    match kind {
        "Renewable" => theme::GREEN_COLOR,
        "Fossil" => theme::HIGHLIGHT_COLOR,
        _ => Color32::from_rgb(158, 158, 158),
    }
}

/// Filled pie drawn as polygon fans; egui_plot has no pie primitive.
fn draw_pie(ui: &mut egui::Ui, mix: &EnergyMix) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(220.0), egui::Sense::hover());
    let center = rect.center();
    let radius = rect.width() * 0.42;
    let total: f64 = mix.slices.iter().map(|s| s.value).sum();
    if total <= 0.0 {
        return;
    }

    let painter = ui.painter();
    let mut start = -std::f64::consts::FRAC_PI_2;
    for slice in &mix.slices {
        let sweep = slice.value / total * std::f64::consts::TAU;
        let steps = (sweep / 0.05).ceil().max(2.0) as usize;
        let mut points = vec![center];
        for i in 0..=steps {
            let angle = start + sweep * i as f64 / steps as f64;
            points.push(Pos2::new(
                center.x + radius * angle.cos() as f32,
                center.y + radius * angle.sin() as f32,
            ));
        }
        painter.add(egui::Shape::convex_polygon(
            points,
            slice_color(slice.kind),
            egui::Stroke::new(1.0, ui.visuals().extreme_bg_color),
        ));
        start += sweep;
    }
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct PieView {}

impl ChartView for PieView {
    fn title(&self) -> String {
        "Global Energy Mix".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        let working = store.working_set(selection.region().as_option());
        match derive(&working, selection.year()) {
            Err(err) => charts::render_fallback(ui, &err),
            Ok(mix) => {
                ui.horizontal(|ui| {
                    draw_pie(ui, &mix);
                    ui.vertical(|ui| {
                        for slice in &mix.slices {
                            ui.horizontal(|ui| {
                                let (swatch, _) = ui.allocate_exact_size(
                                    Vec2::splat(12.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().rect_filled(swatch, 2.0, slice_color(slice.kind));
                                ui.label(format!("{}: {:.1}%", slice.kind, slice.value));
                            });
                        }
                        if let Some(cmp) = &mix.comparison {
                            ui.add_space(8.0);
                            ui.label(
                                egui::RichText::new(format!(
                                    "Change since {}: renewable {:+.1} pp, fossil {:+.1} pp",
                                    cmp.previous_year, cmp.renewable_delta, cmp.fossil_delta
                                ))
                                .small()
                                .weak(),
                            );
                        }
                    });
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, renewable: Option<f64>, fossil: Option<f64>) -> Record {
        Record {
            country: "X".to_owned(),
            year,
            region: "Other",
            total_twh: None,
            per_capita_kwh: None,
            renewable_share_pct: renewable,
            fossil_dependency_pct: fossil,
            emissions_mt: None,
        }
    }

    #[test]
    fn test_derive_means_and_other() {
        let rows = vec![
            record(2024, Some(20.0), Some(60.0)),
            record(2024, Some(40.0), Some(50.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let mix = derive(&refs, 2024).unwrap();
        assert_eq!(mix.slices[0].value, 30.0);
        assert_eq!(mix.slices[1].value, 55.0);
        assert_eq!(mix.slices[2].value, 15.0);
        assert!(mix.comparison.is_none());
    }

    #[test]
    fn test_derive_other_zero_clamped() {
        let rows = vec![record(2024, Some(70.0), Some(60.0))];
        let refs: Vec<&Record> = rows.iter().collect();
        let mix = derive(&refs, 2024).unwrap();
        assert_eq!(mix.slices[2].value, 0.0);
    }

    #[test]
    fn test_derive_five_year_comparison() {
        let rows = vec![
            record(2019, Some(20.0), Some(70.0)),
            record(2024, Some(35.0), Some(55.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let mix = derive(&refs, 2024).unwrap();
        let cmp = mix.comparison.unwrap();
        assert_eq!(cmp.previous_year, 2019);
        assert!((cmp.renewable_delta - 15.0).abs() < 1e-9);
        assert!((cmp.fossil_delta + 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_derive_empty_year_fails() {
        let rows = vec![record(2020, Some(10.0), Some(10.0))];
        let refs: Vec<&Record> = rows.iter().collect();
        assert!(matches!(
            derive(&refs, 2024),
            Err(WattscopeError::InsufficientData(_))
        ));
    }
}
