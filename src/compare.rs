//! Detailed pairwise comparison of two route profiles.
//!
//! Backs a side-by-side detail view: the four similarity figures plus
//! absolute and percentage differences of distance and elevation gain,
//! and both elevation stat blocks verbatim.

use serde::Serialize;

use crate::error::Result;
use crate::scoring::score_profiles;
use crate::{ElevationStats, MatchConfig, RouteProfile, SimilarityScore};

/// Side-by-side comparison of two profiles.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Id of the first profile
    pub id_a: String,
    /// Id of the second profile
    pub id_b: String,
    /// Full similarity breakdown
    pub score: SimilarityScore,
    /// |distance_a - distance_b| in meters
    pub distance_diff: f64,
    /// Distance difference as a percentage of the larger distance
    pub distance_diff_percent: f64,
    /// |gain_a - gain_b| in meters
    pub elevation_gain_diff: f64,
    /// Gain difference as a percentage of the larger gain (0 when both are 0)
    pub elevation_gain_diff_percent: f64,
    /// Elevation stats of the first profile
    pub stats_a: ElevationStats,
    /// Elevation stats of the second profile
    pub stats_b: ElevationStats,
}

/// Percentage of `diff` relative to the larger of the two values.
fn percent_of_larger(diff: f64, a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max > 0.0 {
        diff / max * 100.0
    } else {
        0.0
    }
}

/// Compare two profiles in detail.
///
/// Pure and read-only; independent of any ranked search. Shares the
/// scorer's error conditions (mismatched profile resolutions, invalid
/// config).
///
/// # Example
/// ```
/// use elevation_matcher::{compare_profiles, ElevationSample, MatchConfig, RouteKind, RouteProfile};
///
/// let trace = vec![
///     ElevationSample::new(0.0, 100.0),
///     ElevationSample::new(8000.0, 500.0),
/// ];
/// let a = RouteProfile::new("a", "A", RouteKind::Route, 8000.0, 400.0, trace.clone()).unwrap();
/// let b = RouteProfile::new("b", "B", RouteKind::Activity, 6000.0, 300.0, trace).unwrap();
///
/// let report = compare_profiles(&a, &b, &MatchConfig::default()).unwrap();
/// assert_eq!(report.distance_diff, 2000.0);
/// assert_eq!(report.distance_diff_percent, 25.0);
/// assert_eq!(report.elevation_gain_diff, 100.0);
/// ```
pub fn compare_profiles(
    a: &RouteProfile,
    b: &RouteProfile,
    config: &MatchConfig,
) -> Result<ComparisonReport> {
    let score = score_profiles(a, b, config)?;

    let distance_diff = (a.total_distance - b.total_distance).abs();
    let gain_diff = (a.elevation_gain - b.elevation_gain).abs();

    Ok(ComparisonReport {
        id_a: a.id.clone(),
        id_b: b.id.clone(),
        score,
        distance_diff,
        distance_diff_percent: percent_of_larger(distance_diff, a.total_distance, b.total_distance),
        elevation_gain_diff: gain_diff,
        elevation_gain_diff_percent: percent_of_larger(
            gain_diff,
            a.elevation_gain,
            b.elevation_gain,
        ),
        stats_a: *a.stats(),
        stats_b: *b.stats(),
    })
}
