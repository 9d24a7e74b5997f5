//! Shared selection state driving cross-chart synchronization.
//!
//! Three independent axes compose by conjunction:
//!
//! - `year` is the single source of truth for every "latest year" query; no
//!   chart keeps its own year.
//! - `country` is a rendering hint only — it never changes what is computed,
//!   it dims non-matching marks. Clicking empty background anywhere clears it
//!   globally.
//! - `region` is a pre-filter applied to the record store's working set
//!   before any aggregation occurs.
//!
//! The state is an explicit object injected into every view; in immediate
//! mode any setter takes effect on the same frame's recompute, so the
//! "synchronous fan-out, no batching" contract holds by construction.

use serde::{Deserialize, Serialize};

/// Opacity of every mark when nothing is highlighted.
pub const BASELINE_OPACITY: f32 = 0.7;
/// Opacity of non-matching marks while a country is highlighted.
pub const DIM_OPACITY: f32 = 0.3;

/// Region pre-filter applied to the working set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionFilter {
    #[default]
    All,
    Named(String),
}

impl RegionFilter {
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(region) => Some(region),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All Regions",
            Self::Named(region) => region,
        }
    }
}

/// Singleton selection state; lifecycle = lifetime of the dashboard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    year: i32,
    min_year: i32,
    max_year: i32,
    country: Option<String>,
    region: RegionFilter,
}

impl SelectionState {
    /// New state bounded to the observed year range, starting at the latest
    /// year with no highlight and no region filter.
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self {
            year: max_year,
            min_year,
            max_year,
            country: None,
            region: RegionFilter::All,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Set the selected year, clamped to the observed bounds.
    pub fn set_year(&mut self, year: i32) {
        self.year = year.clamp(self.min_year, self.max_year);
    }

    /// Advance one year, wrapping from the last back to the first. Drives the
    /// timeline play mode.
    pub fn step_year(&mut self) {
        self.year = if self.year >= self.max_year {
            self.min_year
        } else {
            self.year + 1
        };
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Highlight a country globally. At most one country is highlighted at
    /// any time.
    pub fn select_country(&mut self, country: impl Into<String>) {
        self.country = Some(country.into());
    }

    /// Clear the highlight (background click in any chart).
    pub fn clear_country(&mut self) {
        self.country = None;
    }

    pub fn region(&self) -> &RegionFilter {
        &self.region
    }

    pub fn set_region(&mut self, region: RegionFilter) {
        self.region = region;
    }

    /// Opacity hint for a mark belonging to `country`: full when highlighted,
    /// dimmed when another country is highlighted, baseline otherwise.
    pub fn mark_opacity(&self, country: &str) -> f32 {
        match self.country.as_deref() {
            None => BASELINE_OPACITY,
            Some(selected) if selected == country => 1.0,
            Some(_) => DIM_OPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_clamped_to_bounds() {
        let mut sel = SelectionState::new(2000, 2024);
        assert_eq!(sel.year(), 2024);
        sel.set_year(1990);
        assert_eq!(sel.year(), 2000);
        sel.set_year(2050);
        assert_eq!(sel.year(), 2024);
        sel.set_year(2010);
        assert_eq!(sel.year(), 2010);
    }

    #[test]
    fn test_step_year_wraps() {
        let mut sel = SelectionState::new(2000, 2002);
        sel.set_year(2001);
        sel.step_year();
        assert_eq!(sel.year(), 2002);
        sel.step_year();
        assert_eq!(sel.year(), 2000);
    }

    #[test]
    fn test_highlight_round_trip() {
        let mut sel = SelectionState::new(2000, 2024);
        assert_eq!(sel.mark_opacity("Germany"), BASELINE_OPACITY);

        sel.select_country("Germany");
        assert_eq!(sel.mark_opacity("Germany"), 1.0);
        assert_eq!(sel.mark_opacity("France"), DIM_OPACITY);

        sel.clear_country();
        // Idempotent round trip: every mark back at the baseline.
        assert_eq!(sel.mark_opacity("Germany"), BASELINE_OPACITY);
        assert_eq!(sel.mark_opacity("France"), BASELINE_OPACITY);
    }

    #[test]
    fn test_single_highlight_invariant() {
        let mut sel = SelectionState::new(2000, 2024);
        sel.select_country("Germany");
        sel.select_country("France");
        assert_eq!(sel.country(), Some("France"));
        assert_eq!(sel.mark_opacity("Germany"), DIM_OPACITY);
    }

    #[test]
    fn test_region_filter_labels() {
        let mut sel = SelectionState::new(2000, 2024);
        assert_eq!(sel.region().label(), "All Regions");
        assert_eq!(sel.region().as_option(), None);
        sel.set_region(RegionFilter::Named("Asia".to_owned()));
        assert_eq!(sel.region().as_option(), Some("Asia"));
    }
}
