//! Record store: typed, region-tagged records parsed from the energy CSV.
//!
//! The string-keyed boundary (long source column names) is isolated to the
//! parse step: headers are resolved once against [`COLUMNS`], after that every
//! consumer works with the named fields of [`Record`]. Numeric cells that fail
//! to parse become `None` and are excluded from aggregations that require
//! validity, but the record itself is retained.

pub mod regions;

use crate::error::{Result, WattscopeError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Source column names, resolved against the CSV header at load time.
pub mod columns {
    pub const COUNTRY: &str = "Country";
    pub const YEAR: &str = "Year";
    pub const TOTAL_TWH: &str = "Total Energy Consumption (TWh)";
    pub const PER_CAPITA_KWH: &str = "Per Capita Energy Use (kWh)";
    pub const RENEWABLE_PCT: &str = "Renewable Energy Share (%)";
    pub const FOSSIL_PCT: &str = "Fossil Fuel Dependency (%)";
    pub const EMISSIONS_MT: &str = "Carbon Emissions (Million Tons)";

    pub const REQUIRED: &[&str] = &[
        COUNTRY,
        YEAR,
        TOTAL_TWH,
        PER_CAPITA_KWH,
        RENEWABLE_PCT,
        FOSSIL_PCT,
        EMISSIONS_MT,
    ];
}

/// One country-year observation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    /// Derived from the static region map during the load tagging pass.
    pub region: &'static str,
    pub total_twh: Option<f64>,
    pub per_capita_kwh: Option<f64>,
    pub renewable_share_pct: Option<f64>,
    pub fossil_dependency_pct: Option<f64>,
    pub emissions_mt: Option<f64>,
}

impl Record {
    /// Share not covered by renewables or fossil fuels, zero-clamped.
    ///
    /// The two shares are independently sourced and not guaranteed to sum
    /// to 100; this is a presentation derivation, not a stored fact.
    pub fn other_share_pct(&self) -> Option<f64> {
        match (self.renewable_share_pct, self.fossil_dependency_pct) {
            (Some(r), Some(f)) => Some((100.0 - r - f).max(0.0)),
            _ => None,
        }
    }
}

/// The five numeric fields of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    TotalConsumption,
    PerCapita,
    RenewableShare,
    FossilDependency,
    CarbonEmissions,
}

impl Metric {
    pub const ALL: [Self; 5] = [
        Self::PerCapita,
        Self::TotalConsumption,
        Self::CarbonEmissions,
        Self::RenewableShare,
        Self::FossilDependency,
    ];

    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Self::TotalConsumption => record.total_twh,
            Self::PerCapita => record.per_capita_kwh,
            Self::RenewableShare => record.renewable_share_pct,
            Self::FossilDependency => record.fossil_dependency_pct,
            Self::CarbonEmissions => record.emissions_mt,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TotalConsumption => "Total Energy Consumption (TWh)",
            Self::PerCapita => "Per Capita Energy Use (kWh)",
            Self::RenewableShare => "Renewable Energy Share (%)",
            Self::FossilDependency => "Fossil Fuel Dependency (%)",
            Self::CarbonEmissions => "Carbon Emissions (Million Tons)",
        }
    }

    /// Compact label for axis ticks and heatmap headers.
    pub fn short_label(self) -> &'static str {
        match self {
            Self::TotalConsumption => "Total Cons.",
            Self::PerCapita => "Per Capita",
            Self::RenewableShare => "Renew. Share",
            Self::FossilDependency => "Fossil Dep.",
            Self::CarbonEmissions => "CO2 Emission",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::TotalConsumption => "TWh",
            Self::PerCapita => "kWh",
            Self::RenewableShare => "%",
            Self::FossilDependency => "%",
            Self::CarbonEmissions => "Mt",
        }
    }
}

/// Parsed dataset plus observed year bounds.
///
/// Exposes two views of the same records: the immutable original set
/// ([`RecordStore::all`]) used by components that must ignore the region
/// filter (heatmap, pair plot), and the region-scoped working set
/// ([`RecordStore::working_set`]) used by everything else.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    min_year: i32,
    max_year: i32,
}

impl RecordStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            WattscopeError::Load(format!("cannot open {}: {e}", path.display()))
        })?;
        let store = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            records = store.records.len(),
            years = ?(store.min_year, store.max_year),
            "dataset loaded"
        );
        Ok(store)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let col = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| WattscopeError::Load(format!("missing required column '{name}'")))
        };

        let country_idx = col(columns::COUNTRY)?;
        let year_idx = col(columns::YEAR)?;
        let total_idx = col(columns::TOTAL_TWH)?;
        let capita_idx = col(columns::PER_CAPITA_KWH)?;
        let renewable_idx = col(columns::RENEWABLE_PCT)?;
        let fossil_idx = col(columns::FOSSIL_PCT)?;
        let emissions_idx = col(columns::EMISSIONS_MT)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rdr.records() {
            let row = row?;
            let country = row.get(country_idx).unwrap_or("").trim();
            let year = row
                .get(year_idx)
                .and_then(|s| s.trim().parse::<i32>().ok());

            // A record without its identity (country + year) cannot be keyed
            // by any chart; drop it rather than poisoning aggregations.
            let (country, year) = match (country.is_empty(), year) {
                (false, Some(y)) => (country.to_owned(), y),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let region = regions::region_of(&country);
            records.push(Record {
                country,
                year,
                region,
                total_twh: parse_cell(row.get(total_idx)),
                per_capita_kwh: parse_cell(row.get(capita_idx)),
                renewable_share_pct: parse_cell(row.get(renewable_idx)),
                fossil_dependency_pct: parse_cell(row.get(fossil_idx)),
                emissions_mt: parse_cell(row.get(emissions_idx)),
            });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "dropped rows without a country/year identity");
        }

        let min_year = records.iter().map(|r| r.year).min();
        let max_year = records.iter().map(|r| r.year).max();
        match (min_year, max_year) {
            (Some(min_year), Some(max_year)) => Ok(Self {
                records,
                min_year,
                max_year,
            }),
            _ => Err(WattscopeError::Load(
                "dataset contains no usable rows".to_owned(),
            )),
        }
    }

    /// The immutable original set: every record, ignoring any region filter.
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// The working set: records pre-filtered by region, before any
    /// aggregation occurs. `None` means "All Regions".
    pub fn working_set(&self, region: Option<&str>) -> Vec<&Record> {
        match region {
            None => self.records.iter().collect(),
            Some(region) => self
                .records
                .iter()
                .filter(|r| r.region == region)
                .collect(),
        }
    }

    /// Records of the original set for one year.
    pub fn year_slice(&self, year: i32) -> Vec<&Record> {
        self.records.iter().filter(|r| r.year == year).collect()
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }
}

fn parse_cell(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Year filter over an already-borrowed subset.
pub fn filter_year<'a>(records: &[&'a Record], year: i32) -> Vec<&'a Record> {
    records.iter().copied().filter(|r| r.year == year).collect()
}
