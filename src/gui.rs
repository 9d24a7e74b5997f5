//! Dashboard shell: dataset loading, the shared selection state and the
//! chart card grid.

pub mod info_panel;
pub mod timeline;

use crate::charts::{
    bar::BarView, boxplot::BoxPlotView, bubble::BubbleView, dot::DotView, heatmap::HeatmapView,
    histogram::HistogramView, line::LineView, pairplot::PairPlotView, pie::PieView,
    scatter::ScatterView, ChartView,
};
use crate::data::RecordStore;
use crate::error::Result;
use crate::selection::SelectionState;
use crate::theme;
use eframe::egui;
use egui_phosphor::regular as icons;
use rfd::FileDialog;
use std::path::PathBuf;
use timeline::TimelinePlayer;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WattscopeApp {
    /// Last loaded dataset, reloaded automatically on the next start.
    dataset_path: Option<PathBuf>,

    timeline: TimelinePlayer,
    bar: BarView,
    bubble: BubbleView,
    pie: PieView,
    line: LineView,
    boxplot: BoxPlotView,
    dot: DotView,
    scatter: ScatterView,
    histogram: HistogramView,
    heatmap: HeatmapView,
    pairplot: PairPlotView,

    #[serde(skip)]
    store: Option<RecordStore>,
    #[serde(skip)]
    selection: Option<SelectionState>,
    #[serde(skip)]
    is_loading: bool,
    #[serde(skip)]
    load_rx: Option<crossbeam_channel::Receiver<Result<RecordStore>>>,
    #[serde(skip)]
    load_error: Option<String>,
    #[serde(skip)]
    toasts: egui_notify::Toasts,
}

impl Default for WattscopeApp {
    fn default() -> Self {
        Self {
            dataset_path: None,
            timeline: TimelinePlayer::default(),
            bar: BarView::default(),
            bubble: BubbleView::default(),
            pie: PieView::default(),
            line: LineView::default(),
            boxplot: BoxPlotView::default(),
            dot: DotView::default(),
            scatter: ScatterView::default(),
            histogram: HistogramView::default(),
            heatmap: HeatmapView::default(),
            pairplot: PairPlotView::default(),
            store: None,
            selection: None,
            is_loading: false,
            load_rx: None,
            load_error: None,
            toasts: egui_notify::Toasts::default(),
        }
    }
}

impl WattscopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::apply_wattscope_theme(&cc.egui_ctx);

        let mut app = cc
            .storage
            .and_then(|storage| eframe::get_value::<Self>(storage, eframe::APP_KEY))
            .unwrap_or_default();

        if let Some(path) = app.dataset_path.clone() {
            if path.exists() {
                app.start_load(cc.egui_ctx.clone(), path);
            } else {
                app.dataset_path = None;
            }
        }
        app
    }

    /// New app with an already-parsed dataset (`--data <file>` startup path).
    pub fn with_store(cc: &eframe::CreationContext<'_>, store: RecordStore, path: PathBuf) -> Self {
        let mut app = Self::new(cc);
        app.load_rx = None;
        app.is_loading = false;
        app.install_store(store);
        app.dataset_path = Some(path);
        app
    }

    fn start_load(&mut self, ctx: egui::Context, path: PathBuf) {
        self.is_loading = true;
        self.load_error = None;
        self.dataset_path = Some(path.clone());

        let (tx, rx) = crossbeam_channel::unbounded();
        self.load_rx = Some(rx);
        std::thread::spawn(move || {
            let result = RecordStore::load(&path);
            if tx.send(result).is_err() {
                tracing::error!("load result receiver dropped");
            }
            ctx.request_repaint();
        });
    }

    fn install_store(&mut self, store: RecordStore) {
        self.selection = Some(SelectionState::new(store.min_year(), store.max_year()));
        self.timeline.stop();
        self.store = Some(store);
    }

    fn handle_receivers(&mut self) {
        let result = self.load_rx.as_ref().and_then(|rx| rx.try_recv().ok());
        if let Some(result) = result {
            self.is_loading = false;
            self.load_rx = None;
            match result {
                Ok(store) => {
                    self.toasts
                        .success(format!("Loaded {} records", store.all().len()));
                    self.install_store(store);
                }
                Err(err) => {
                    tracing::error!(error = %err, "dataset load failed");
                    self.load_error = Some(err.to_string());
                    self.store = None;
                    self.selection = None;
                }
            }
        }
    }

    fn open_dataset_dialog(&mut self, ctx: &egui::Context) {
        let picked = FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file();
        if let Some(path) = picked {
            self.start_load(ctx.clone(), path);
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(theme::top_bar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        egui::RichText::new(format!("{} Wattscope", icons::LIGHTNING))
                            .color(theme::ACCENT_COLOR),
                    );
                    ui.separator();

                    if self.is_loading {
                        ui.spinner();
                        ui.label("Loading dataset...");
                    } else if ui
                        .button(format!("{} Open CSV", icons::FOLDER_OPEN))
                        .clicked()
                    {
                        self.open_dataset_dialog(ctx);
                    }

                    if let (Some(store), Some(selection)) =
                        (self.store.as_ref(), self.selection.as_mut())
                    {
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!("{} records", store.all().len()))
                                .small()
                                .weak(),
                        );
                        ui.separator();
                        timeline::timeline_controls(ui, selection, &mut self.timeline);
                    }
                });
            });
    }

    fn render_charts(&mut self, ui: &mut egui::Ui) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let Some(selection) = self.selection.as_mut() else {
            return;
        };

        let mut views: Vec<&mut dyn ChartView> = vec![
            &mut self.bubble,
            &mut self.bar,
            &mut self.line,
            &mut self.pie,
            &mut self.boxplot,
            &mut self.dot,
            &mut self.scatter,
            &mut self.histogram,
            &mut self.heatmap,
            &mut self.pairplot,
        ];

        let columns = if ui.available_width() > 1100.0 { 2 } else { 1 };
        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in views.chunks_mut(columns) {
                ui.columns(columns, |cols| {
                    for (col, view) in cols.iter_mut().zip(row.iter_mut()) {
                        theme::card_frame(col).show(col, |ui| {
                            ui.set_width(ui.available_width());
                            ui.heading(view.title());
                            ui.add_space(4.0);
                            view.show(ui, store, selection);
                        });
                        col.add_space(8.0);
                    }
                });
            }
        });
    }

    fn render_empty_state(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 4.0);
            ui.heading(format!("{} Wattscope", icons::LIGHTNING));
            ui.label("Explore global energy consumption, renewables and emissions.");
            ui.add_space(12.0);

            if let Some(err) = &self.load_error {
                ui.colored_label(theme::HIGHLIGHT_COLOR, format!("{} {err}", icons::WARNING));
                ui.add_space(12.0);
            }

            if self.is_loading {
                ui.spinner();
            } else if ui
                .button(egui::RichText::new(format!("{} Open CSV dataset", icons::FOLDER_OPEN)).heading())
                .clicked()
            {
                self.open_dataset_dialog(ctx);
            }
        });
    }
}

impl eframe::App for WattscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_receivers();

        if let Some(selection) = self.selection.as_mut() {
            self.timeline.tick(selection);
            if self.timeline.is_playing() {
                ctx.request_repaint_after(timeline::TICK);
            }
        }

        self.render_top_bar(ctx);

        if self.store.is_some() {
            egui::SidePanel::right("info_panel")
                .resizable(true)
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.add_space(8.0);
                    if let (Some(store), Some(selection)) =
                        (self.store.as_ref(), self.selection.as_mut())
                    {
                        info_panel::show(ui, store, selection);
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.store.is_some() {
                self.render_charts(ui);
            } else {
                self.render_empty_state(ui, ctx);
            }
        });

        self.toasts.show(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
