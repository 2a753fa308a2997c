//! Dispersion core extraction for one club's shots.
//!
//! Two stages: a positional trim of the shortest and longest carries removes
//! duffs and sensor fliers, then an IQR fence on the trimmed carries keeps the
//! dense cluster. The trim runs first so one wild shot cannot inflate the IQR.

use crate::model::Shot;

/// Tuning for the outlier filter. These are product choices, not derived values.
#[derive(Debug, Clone)]
pub struct OutlierConfig {
    /// Below this many shots the input is returned untouched
    pub min_shots: usize,
    /// Fraction of shortest carries dropped before the IQR pass
    pub low_trim: f64,
    /// Fraction of longest carries dropped before the IQR pass
    pub high_trim: f64,
    /// Fence width in IQRs beyond Q1 and Q3
    pub iqr_multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            min_shots: 4,
            low_trim: 0.10,
            high_trim: 0.10,
            iqr_multiplier: 1.5,
        }
    }
}

/// Keep the shots that form the golfer's real carry cluster.
///
/// Never returns fewer than two shots from a larger input: when trimming would
/// leave less than that, the input is returned unfiltered.
pub fn filter_outliers<'a>(shots: &[&'a Shot], config: &OutlierConfig) -> Vec<&'a Shot> {
    if shots.len() < config.min_shots {
        return shots.to_vec();
    }

    let mut sorted = shots.to_vec();
    sorted.sort_by(|a, b| a.carry_distance.total_cmp(&b.carry_distance));

    let n = sorted.len();
    let start = ((n as f64 * config.low_trim).floor() as usize).min(n);
    let end = n.saturating_sub((n as f64 * config.high_trim).floor() as usize).max(start);
    let trimmed = &sorted[start..end];

    if trimmed.len() < 2 {
        return shots.to_vec();
    }

    // trimmed is already in carry order
    let m = trimmed.len();
    let q1 = trimmed[m / 4].carry_distance;
    let q3 = trimmed[m * 3 / 4].carry_distance;
    let iqr = q3 - q1;
    let lower = q1 - config.iqr_multiplier * iqr;
    let upper = q3 + config.iqr_multiplier * iqr;

    let core: Vec<&Shot> = trimmed
        .iter()
        .copied()
        .filter(|s| s.carry_distance >= lower && s.carry_distance <= upper)
        .collect();

    if core.len() < 2 {
        return shots.to_vec();
    }
    core
}
