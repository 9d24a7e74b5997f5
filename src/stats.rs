//! Aggregation engine: pure functions over record subsets.
//!
//! Every operation takes a borrowed subset and returns a derived value; no
//! I/O, no shared-state mutation, deterministic given identical inputs. Chart
//! views call these with the current selection snapshot and hand the result to
//! the renderer.

use crate::data::{Metric, Record};
use crate::error::{Result, WattscopeError};
use std::collections::HashMap;
use std::hash::Hash;

/// Mean over the given values, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median over the given values, `None` when empty.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, 0.5))
}

/// Min and max, `None` when empty.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    let mut min = first;
    let mut max = first;
    for &v in &values[1..] {
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    Some((min, max))
}

/// Quantile by linear interpolation between closest ranks.
///
/// `sorted` must be ascending and non-empty; `q` in `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = (n - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Quantiles at the requested fractions. Fails on empty input.
pub fn quantiles(values: &[f64], qs: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(WattscopeError::InsufficientData(
            "quantiles require at least one value".to_owned(),
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect())
}

/// Tukey box plot statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct WhiskerStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// `max(min(values), q1 - 1.5 * iqr)`
    pub lower: f64,
    /// `min(max(values), q3 + 1.5 * iqr)`
    pub upper: f64,
    /// Values outside `[lower, upper]`, in input order.
    pub outliers: Vec<f64>,
}

/// Conventional Tukey rule: whiskers clamped to the data extent at
/// `1.5 * iqr` beyond the quartiles, everything outside is an outlier.
pub fn whisker_bounds(values: &[f64]) -> Result<WhiskerStats> {
    let (min, max) = extent(values).ok_or_else(|| {
        WattscopeError::InsufficientData("box plot requires at least one value".to_owned())
    })?;
    let qs = quantiles(values, &[0.25, 0.5, 0.75])?;
    let (q1, median, q3) = (qs[0], qs[1], qs[2]);
    let iqr = q3 - q1;
    let lower = min.max(q1 - 1.5 * iqr);
    let upper = max.min(q3 + 1.5 * iqr);
    let outliers = values
        .iter()
        .copied()
        .filter(|&v| v < lower || v > upper)
        .collect();
    Ok(WhiskerStats {
        q1,
        median,
        q3,
        lower,
        upper,
        outliers,
    })
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `0.0` (not NaN) for fewer than two observations or a degenerate
/// (constant) series; unequal lengths are a contract violation.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(WattscopeError::DimensionMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let n = xs.len();
    if n < 2 {
        return Ok(0.0);
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let n = n as f64;
    let denom = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();
    if !denom.is_finite() || denom == 0.0 {
        return Ok(0.0);
    }
    Ok((n * sum_xy - sum_x * sum_y) / denom)
}

/// One record per distinct key, retaining the max-`value_fn` record among
/// duplicates. Key order follows first appearance in the input.
///
/// The source data may contain duplicate country/year rows; this is the
/// canonical de-duplication used before any ranking.
pub fn latest_per_entity<'a, T, K, KF, VF>(
    items: impl IntoIterator<Item = &'a T>,
    key_fn: KF,
    value_fn: VF,
) -> Vec<&'a T>
where
    K: Eq + Hash,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Option<f64>,
{
    let mut out: Vec<&'a T> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();
    for item in items {
        let key = key_fn(item);
        match index.get(&key) {
            None => {
                index.insert(key, out.len());
                out.push(item);
            }
            Some(&i) => {
                let current = value_fn(out[i]);
                let candidate = value_fn(item);
                // A valid value beats a missing one; among valid values the
                // larger wins; a later missing value never replaces.
                let replace = match (current, candidate) {
                    (None, Some(_)) => true,
                    (Some(a), Some(b)) => b > a,
                    _ => false,
                };
                if replace {
                    out[i] = item;
                }
            }
        }
    }
    out
}

/// First `n` items by descending `value_fn`, ties broken by input order.
pub fn top_n<'a, T, VF>(items: &[&'a T], value_fn: VF, n: usize) -> Vec<&'a T>
where
    VF: Fn(&T) -> f64,
{
    let mut sorted: Vec<&'a T> = items.to_vec();
    // Stable sort keeps input order among ties.
    sorted.sort_by(|a, b| value_fn(b).total_cmp(&value_fn(a)));
    sorted.truncate(n);
    sorted
}

/// Per-group mean over valid values only; groups with zero valid values are
/// excluded. Group order follows first appearance in the input.
pub fn group_mean<'a, T: 'a, K, KF, VF>(
    items: impl IntoIterator<Item = &'a T>,
    key_fn: KF,
    value_fn: VF,
) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Option<f64>,
{
    group_values(items, key_fn, value_fn)
        .into_iter()
        .filter_map(|(key, values)| mean(&values).map(|m| (key, m)))
        .collect()
}

/// Per-group median over valid values only; zero-valid groups are excluded.
pub fn group_median<'a, T: 'a, K, KF, VF>(
    items: impl IntoIterator<Item = &'a T>,
    key_fn: KF,
    value_fn: VF,
) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Option<f64>,
{
    group_values(items, key_fn, value_fn)
        .into_iter()
        .filter_map(|(key, values)| median(&values).map(|m| (key, m)))
        .collect()
}

/// Valid values per group; groups with zero valid values come back empty.
pub fn group_values<'a, T: 'a, K, KF, VF>(
    items: impl IntoIterator<Item = &'a T>,
    key_fn: KF,
    value_fn: VF,
) -> Vec<(K, Vec<f64>)>
where
    K: Eq + Hash + Clone,
    KF: Fn(&T) -> K,
    VF: Fn(&T) -> Option<f64>,
{
    let mut groups: Vec<(K, Vec<f64>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();
    for item in items {
        let key = key_fn(item);
        let i = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        if let Some(v) = value_fn(item) {
            groups[i].1.push(v);
        }
    }
    groups
}

/// One histogram bin over `[lo, hi)`; the last bin is inclusive of `hi`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// Uniform bins over `[min, max]` using nice tick thresholds.
///
/// `bin_count` is a hint, not a hard guarantee: edge bins may be added so the
/// thresholds cover the full domain, matching conventional binning libraries.
pub fn histogram_bins(values: &[f64], bin_count: usize) -> Vec<HistBin> {
    let Some((min, max)) = extent(values) else {
        return Vec::new();
    };
    if min == max {
        return vec![HistBin {
            lo: min,
            hi: max,
            count: values.len(),
        }];
    }

    let mut edges = nice_ticks(min, max, bin_count.max(1));
    edges.retain(|&t| t > min && t < max);
    edges.insert(0, min);
    edges.push(max);

    let mut bins: Vec<HistBin> = edges
        .windows(2)
        .map(|w| HistBin {
            lo: w[0],
            hi: w[1],
            count: 0,
        })
        .collect();

    let last = bins.len() - 1;
    for &v in values {
        // partition_point finds the first edge greater than v; the value
        // belongs to the bin just before it.
        let i = edges.partition_point(|&e| e <= v);
        let bin = if i == 0 { 0 } else { (i - 1).min(last) };
        bins[bin].count += 1;
    }
    bins
}

/// Nice round tick values spanning `[start, stop]` (d3-style 1/2/5 steps).
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let step = tick_step(start, stop, count);
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let lo = (start / step).ceil();
    let hi = (stop / step).floor();
    let n = (hi - lo) as i64;
    (0..=n.max(0)).map(|i| (lo + i as f64) * step).collect()
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = stop - start;
    if span <= 0.0 {
        return 0.0;
    }
    let step0 = span / count as f64;
    let step1 = 10f64.powf(step0.log10().floor());
    let err = step0 / step1;
    if err >= 50f64.sqrt() {
        step1 * 10.0
    } else if err >= 10f64.sqrt() {
        step1 * 5.0
    } else if err >= 2f64.sqrt() {
        step1 * 2.0
    } else {
        step1
    }
}

/// One cell of the metric correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrCell {
    pub x: Metric,
    pub y: Metric,
    pub value: f64,
}

/// Correlation of every metric pair over the given records.
///
/// Each cell filters to records where both fields are valid; fewer than two
/// valid pairs yields `0.0` for that cell rather than failing the matrix.
/// Pearson correlation is symmetric, so the lower triangle mirrors the upper
/// and the diagonal is exactly `1.0` for any field with two valid values.
pub fn correlation_matrix(records: &[&Record], metrics: &[Metric]) -> Vec<CorrCell> {
    let mut upper: HashMap<(usize, usize), f64> = HashMap::new();
    for i in 0..metrics.len() {
        for j in i..metrics.len() {
            upper.insert((i, j), pair_correlation(records, metrics[i], metrics[j]));
        }
    }

    let mut cells = Vec::with_capacity(metrics.len() * metrics.len());
    for (i, &x) in metrics.iter().enumerate() {
        for (j, &y) in metrics.iter().enumerate() {
            let key = if i <= j { (i, j) } else { (j, i) };
            cells.push(CorrCell {
                x,
                y,
                value: upper[&key],
            });
        }
    }
    cells
}

fn pair_correlation(records: &[&Record], x: Metric, y: Metric) -> f64 {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for r in records {
        if let (Some(a), Some(b)) = (x.value(r), y.value(r)) {
            xs.push(a);
            ys.push(b);
        }
    }
    if xs.len() < 2 {
        return 0.0;
    }
    if x == y {
        return 1.0;
    }
    // Lengths are equal by construction; a mismatch here is a defect.
    pearson_correlation(&xs, &ys).unwrap_or(0.0)
}
