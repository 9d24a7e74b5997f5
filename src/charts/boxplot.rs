//! Per-year emissions box plots for a searched country, with a trend
//! classification over the yearly medians.

use crate::charts::{self, ChartView};
use crate::data::{Record, RecordStore};
use crate::error::{Result, WattscopeError};
use crate::selection::SelectionState;
use crate::stats::{self, WhiskerStats};
use crate::theme;
use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};
use serde::{Deserialize, Serialize};

const DEFAULT_COUNTRY: &str = "China";

/// Net drift beyond this many Mt classifies the trend as rising/falling.
const DRIFT_THRESHOLD: f64 = 200.0;
/// Gross year-to-year movement beyond this many Mt reads as fluctuating.
const CHURN_THRESHOLD: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Fluctuating,
    Stable,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Fluctuating => "fluctuating",
            Trend::Stable => "stable",
        }
    }
}

/// One year's box, keyed by year. Outliers carry a `year-value` key so a
/// repeated value in a different year stays distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct YearBox {
    pub year: i32,
    pub stats: WhiskerStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmissionsProfile {
    pub country: String,
    pub boxes: Vec<YearBox>,
    pub trend: Trend,
}

/// Trend over consecutive yearly medians: the signed sum of deltas decides
/// rising vs. falling; failing that, the unsigned sum decides fluctuating
/// vs. stable.
pub fn classify_trend(medians: &[f64]) -> Trend {
    let deltas: Vec<f64> = medians.windows(2).map(|w| w[1] - w[0]).collect();
    let net: f64 = deltas.iter().sum();
    if net > DRIFT_THRESHOLD {
        Trend::Rising
    } else if net < -DRIFT_THRESHOLD {
        Trend::Falling
    } else if deltas.iter().map(|d| d.abs()).sum::<f64>() > CHURN_THRESHOLD {
        Trend::Fluctuating
    } else {
        Trend::Stable
    }
}

/// Whisker statistics per year for the matched country, ascending by year.
/// The match is case-insensitive on the full country name.
pub fn derive(records: &[&Record], country: &str) -> Result<EmissionsProfile> {
    let needle = country.trim().to_lowercase();
    let matched: Vec<&Record> = records
        .iter()
        .copied()
        .filter(|r| r.country.to_lowercase() == needle)
        .collect();
    let canonical = matched
        .first()
        .map(|r| r.country.clone())
        .unwrap_or_else(|| country.trim().to_owned());

    let mut groups = stats::group_values(matched.iter().copied(), |r| r.year, |r| r.emissions_mt);
    groups.retain(|(_, values)| !values.is_empty());
    groups.sort_by_key(|(year, _)| *year);

    let mut boxes = Vec::new();
    for (year, values) in groups {
        boxes.push(YearBox {
            year,
            stats: stats::whisker_bounds(&values)?,
        });
    }
    if boxes.is_empty() {
        return Err(WattscopeError::InsufficientData(format!(
            "no emissions data for '{}'",
            country.trim()
        )));
    }

    let medians: Vec<f64> = boxes.iter().map(|b| b.stats.median).collect();
    let trend = classify_trend(&medians);
    Ok(EmissionsProfile {
        country: canonical,
        boxes,
        trend,
    })
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct BoxPlotView {
    pub country_input: String,
}

impl Default for BoxPlotView {
    fn default() -> Self {
        Self {
            country_input: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

impl ChartView for BoxPlotView {
    fn title(&self) -> String {
        "Carbon Emissions by Year".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        ui.horizontal(|ui| {
            ui.label(format!("{} Country:", egui_phosphor::regular::MAGNIFYING_GLASS));
            ui.text_edit_singleline(&mut self.country_input);
        });
        if self.country_input.trim().is_empty() {
            self.country_input = DEFAULT_COUNTRY.to_owned();
        }

        let working = store.working_set(selection.region().as_option());
        let profile = match derive(&working, &self.country_input) {
            Ok(profile) => profile,
            Err(err) => {
                charts::render_fallback(ui, &err);
                return;
            }
        };

        let selected_year = selection.year();
        let boxes: Vec<BoxElem> = profile
            .boxes
            .iter()
            .map(|b| {
                let color = if b.year == selected_year {
                    theme::GREEN_COLOR
                } else {
                    theme::ACCENT_COLOR
                };
                BoxElem::new(
                    b.year as f64,
                    BoxSpread::new(
                        b.stats.lower,
                        b.stats.q1,
                        b.stats.median,
                        b.stats.q3,
                        b.stats.upper,
                    ),
                )
                .box_width(0.6)
                .fill(theme::with_opacity(color, 0.6))
                .stroke(egui::Stroke::new(1.0, color))
                .name(format!("{}", b.year))
            })
            .collect();

        let outliers: Vec<[f64; 2]> = profile
            .boxes
            .iter()
            .flat_map(|b| b.stats.outliers.iter().map(move |&v| [b.year as f64, v]))
            .collect();

        Plot::new("emissions_boxplot")
            .height(300.0)
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .y_axis_label("CO2 Emissions (Mt)")
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(boxes));
                if !outliers.is_empty() {
                    plot_ui.points(
                        Points::new(PlotPoints::from(outliers))
                            .radius(3.0)
                            .color(theme::HIGHLIGHT_COLOR),
                    );
                }
            });

        ui.label(
            egui::RichText::new(format!(
                "{} emissions look {} over the period.",
                profile.country,
                profile.trend.label()
            ))
            .small()
            .weak(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: i32, emissions: Option<f64>) -> Record {
        Record {
            country: country.to_owned(),
            year,
            region: "Other",
            total_twh: None,
            per_capita_kwh: None,
            renewable_share_pct: None,
            fossil_dependency_pct: None,
            emissions_mt: emissions,
        }
    }

    #[test]
    fn test_derive_case_insensitive_match() {
        let rows = vec![
            record("China", 2020, Some(100.0)),
            record("China", 2021, Some(120.0)),
            record("India", 2020, Some(50.0)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let profile = derive(&refs, " china ").unwrap();
        assert_eq!(profile.country, "China");
        assert_eq!(profile.boxes.len(), 2);
        assert_eq!(profile.boxes[0].year, 2020);
    }

    #[test]
    fn test_derive_unknown_country_fails() {
        let rows = vec![record("China", 2020, Some(100.0))];
        let refs: Vec<&Record> = rows.iter().collect();
        assert!(matches!(
            derive(&refs, "Atlantis"),
            Err(WattscopeError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_classify_trend_thresholds() {
        assert_eq!(classify_trend(&[100.0, 400.0]), Trend::Rising);
        assert_eq!(classify_trend(&[400.0, 100.0]), Trend::Falling);
        // Net drift cancels while gross movement is large.
        assert_eq!(
            classify_trend(&[0.0, 2000.0, 0.0]),
            Trend::Fluctuating
        );
        assert_eq!(classify_trend(&[100.0, 150.0, 120.0]), Trend::Stable);
        assert_eq!(classify_trend(&[100.0]), Trend::Stable);
    }
}
