//! Entry point: CLI mode when a subcommand is given, the dashboard otherwise.

#![warn(clippy::all, rust_2018_idioms)]
#![allow(clippy::print_stdout)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cli;

use clap::Parser as _;
use wattscope::data::RecordStore;
use wattscope::gui::WattscopeApp;
use wattscope::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init()?;

    let cli = cli::Cli::parse();

    if let Some(command) = cli.command {
        cli::run_command(command)?;
        return Ok(());
    }

    // Load a dataset given on the command line before the window opens, so
    // startup errors still reach the terminal.
    let preloaded = match cli.data {
        Some(path) => Some((RecordStore::load(&path)?, path)),
        None => None,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Wattscope"),
        ..Default::default()
    };

    eframe::run_native(
        "wattscope",
        options,
        Box::new(move |cc| {
            let app = match preloaded {
                Some((store, path)) => WattscopeApp::with_store(cc, store, path),
                None => WattscopeApp::new(cc),
            };
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}
