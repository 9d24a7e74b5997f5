//! Timeline controls: year slider, play mode, region filter.

use crate::data::regions;
use crate::selection::{RegionFilter, SelectionState};
use eframe::egui;
use egui_phosphor::regular as icons;
use std::time::{Duration, Instant};

/// Interval between automatic year steps while playing.
pub const TICK: Duration = Duration::from_millis(1500);

/// Play-mode state. In immediate mode the "timer" is a timestamp checked
/// every frame plus a scheduled repaint; pausing simply drops the timestamp,
/// so a pending step can never fire afterwards.
#[derive(Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelinePlayer {
    #[serde(skip)]
    playing: bool,
    #[serde(skip)]
    last_tick: Option<Instant>,
}

impl TimelinePlayer {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.playing = true;
            self.last_tick = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    /// Advance the year when a tick interval has elapsed. Returns whether the
    /// selection changed this frame.
    pub fn tick(&mut self, selection: &mut SelectionState) -> bool {
        if !self.playing {
            return false;
        }
        let now = Instant::now();
        let due = self
            .last_tick
            .map_or(true, |last| now.duration_since(last) >= TICK);
        if due {
            self.last_tick = Some(now);
            selection.step_year();
        }
        due
    }
}

/// Year slider, play/pause toggle and the dashboard-wide region filter.
pub fn timeline_controls(
    ui: &mut egui::Ui,
    selection: &mut SelectionState,
    player: &mut TimelinePlayer,
) {
    ui.horizontal(|ui| {
        let icon = if player.is_playing() {
            icons::PAUSE
        } else {
            icons::PLAY
        };
        if ui
            .button(icon)
            .on_hover_text("Step through the years automatically")
            .clicked()
        {
            player.toggle();
        }

        let mut year = selection.year();
        let slider = egui::Slider::new(&mut year, selection.min_year()..=selection.max_year())
            .integer()
            .text("Year");
        if ui.add(slider).changed() {
            // Manual scrubbing takes over from the player.
            player.stop();
            selection.set_year(year);
        }

        ui.separator();
        ui.label("Region:");
        let mut region = selection.region().clone();
        let changed = egui::ComboBox::from_id_salt("global_region_filter")
            .selected_text(region.label().to_owned())
            .show_ui(ui, |ui| {
                let mut changed = ui
                    .selectable_value(&mut region, RegionFilter::All, "All Regions")
                    .changed();
                for name in regions::region_names() {
                    changed |= ui
                        .selectable_value(&mut region, RegionFilter::Named(name.to_owned()), name)
                        .changed();
                }
                changed
            })
            .inner
            .unwrap_or(false);
        if changed {
            selection.set_region(region);
        }
    });
}
