//! Renewable share trend line: mean share per year over the working set.

use crate::charts::{self, ChartView};
use crate::data::{Record, RecordStore};
use crate::selection::SelectionState;
use crate::stats;
use crate::theme;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};

/// One point of the trend, keyed by year.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub mean_renewable_pct: f64,
}

/// Change over the trailing five years of the trend, when both endpoints
/// exist.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChange {
    pub from_year: i32,
    pub to_year: i32,
    pub delta_pp: f64,
}

/// Mean renewable share per year, ascending by year. Years without a single
/// valid share are skipped entirely rather than rendered as zero.
pub fn derive(records: &[&Record]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> =
        stats::group_mean(records.iter().copied(), |r| r.year, |r| {
            r.renewable_share_pct
        })
        .into_iter()
        .map(|(year, mean)| TrendPoint {
            year,
            mean_renewable_pct: mean,
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points
}

/// Delta between the last point and the point five years earlier.
pub fn five_year_change(points: &[TrendPoint]) -> Option<TrendChange> {
    let last = points.last()?;
    let earlier = points.iter().find(|p| p.year == last.year - 5)?;
    Some(TrendChange {
        from_year: earlier.year,
        to_year: last.year,
        delta_pp: last.mean_renewable_pct - earlier.mean_renewable_pct,
    })
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct LineView {}

impl ChartView for LineView {
    fn title(&self) -> String {
        "Renewable Energy Share Over Time".to_owned()
    }

    fn show(&mut self, ui: &mut egui::Ui, store: &RecordStore, selection: &mut SelectionState) {
        let working = store.working_set(selection.region().as_option());
        let points = derive(&working);
        if points.is_empty() {
            charts::empty_state(ui, "Not enough data for the current selection.");
            return;
        }

        let series: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p.year as f64, p.mean_renewable_pct])
            .collect();
        let selected = points.iter().find(|p| p.year == selection.year());

        let response = Plot::new("trend_line")
            .height(260.0)
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .y_axis_label("Mean Renewable Share (%)")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(series.clone()))
                        .color(theme::GREEN_COLOR)
                        .width(2.0),
                );
                if let Some(p) = selected {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[
                            p.year as f64,
                            p.mean_renewable_pct,
                        ]]))
                        .radius(6.0)
                        .color(theme::HIGHLIGHT_COLOR)
                        .name(format!("{}: {:.1}%", p.year, p.mean_renewable_pct)),
                    );
                }
                plot_ui.pointer_coordinate()
            });

        // Clicking the trend surfaces the aggregate view in the info panel.
        if response.response.clicked() && response.inner.is_some() {
            selection.select_country("Global".to_owned());
        }

        match five_year_change(&points) {
            Some(change) => {
                ui.label(
                    egui::RichText::new(format!(
                        "{:+.1} pp since {}",
                        change.delta_pp, change.from_year
                    ))
                    .small()
                    .weak(),
                );
            }
            None => {
                ui.label(egui::RichText::new("No data from five years earlier.").small().weak());
            }
        }
    }
}
