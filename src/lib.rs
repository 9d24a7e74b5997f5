//! # Wattscope - Global Energy Consumption Dashboard
//!
//! Wattscope loads a country/year energy dataset from CSV and renders an
//! interactive dashboard of linked charts: consumption, per-capita use,
//! renewables, fossil dependency and emissions, all driven by one shared
//! selection (year, highlighted country, region filter).
//!
//! ## Quick Start
//!
//! ```no_run
//! use wattscope::data::RecordStore;
//! use wattscope::stats;
//!
//! # fn example() -> wattscope::error::Result<()> {
//! let store = RecordStore::load("energy.csv")?;
//! let slice = store.year_slice(store.max_year());
//!
//! let renewable: Vec<f64> = slice.iter().filter_map(|r| r.renewable_share_pct).collect();
//! println!("mean renewable share: {:?}", stats::mean(&renewable));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`data`]: CSV record store, metric definitions and the region map
//! - [`stats`]: aggregation engine (quantiles, correlation, grouping, binning)
//! - [`selection`]: shared year/country/region selection state
//! - [`charts`]: the chart views and their pure derivation functions
//! - [`gui`]: the eframe dashboard shell
//! - [`error`]: error types and context helpers

#![warn(clippy::all, rust_2018_idioms)]

pub mod charts;
pub mod data;
pub mod error;
pub mod gui;
pub mod logging;
pub mod selection;
pub mod stats;
pub mod theme;
pub mod utils;
