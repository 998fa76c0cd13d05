//! Similarity scoring between two route profiles.
//!
//! The composite score blends three signals:
//! - **distance**: relative difference of total route distance
//! - **elevation**: relative difference of cumulative elevation gain
//! - **shape**: silhouette similarity of the normalized profiles after
//!   removing the absolute-elevation offset
//!
//! Shape carries the highest default weight; it is the signal that makes
//! a rolling coastal loop and a single sustained climb score differently
//! even when distance and gain happen to agree.

use crate::error::{ElevationMatchError, Result};
use crate::{MatchConfig, ProfilePoint, RouteProfile, SimilarityScore};

/// Relative total-distance similarity, in `[0, 1]`.
///
/// `1 - min(1, |a - b| / max(a, b))`; symmetric, 1.0 for equal distances.
pub fn distance_similarity(a: f64, b: f64) -> f64 {
    let max = a.max(b);
    if max <= 0.0 {
        return 1.0;
    }
    1.0 - ((a - b).abs() / max).min(1.0)
}

/// Relative elevation-gain similarity, in `[0, 1]`.
///
/// Two perfectly flat routes (both gains exactly 0) are identical and
/// score 1.0; otherwise the denominator is floored at `epsilon` meters
/// so near-flat routes don't divide by zero.
pub fn elevation_similarity(a: f64, b: f64, epsilon: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 1.0;
    }
    1.0 - ((a - b).abs() / a.max(b).max(epsilon)).min(1.0)
}

/// Silhouette similarity of two equal-length normalized profiles, in `[0, 1]`.
///
/// Both profiles are centered to zero mean (absolute altitude is
/// irrelevant to shape), then scored as `1 - RMSE / range` where the
/// range is the larger of the two profiles' elevation spans. Two flat
/// profiles have identical silhouettes and score 1.0.
///
/// Callers must pass profiles of the same length; [`score_profiles`]
/// enforces this with a proper error.
pub fn shape_similarity(a: &[ProfilePoint], b: &[ProfilePoint]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mean = |p: &[ProfilePoint]| p.iter().map(|pt| pt.elevation).sum::<f64>() / p.len() as f64;
    let span = |p: &[ProfilePoint]| {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for pt in p {
            min = min.min(pt.elevation);
            max = max.max(pt.elevation);
        }
        max - min
    };

    let range = span(a).max(span(b));
    if range <= 0.0 {
        // Both profiles are flat lines; after centering they coincide.
        return 1.0;
    }

    let mean_a = mean(a);
    let mean_b = mean(b);
    let n = a.len().min(b.len());
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(pa, pb)| {
            let diff = (pa.elevation - mean_a) - (pb.elevation - mean_b);
            diff * diff
        })
        .sum();
    let rmse = (sum_sq / n as f64).sqrt();

    (1.0 - rmse / range).clamp(0.0, 1.0)
}

/// Score the similarity of two route profiles.
///
/// Pure and symmetric: `score_profiles(a, b, c) == score_profiles(b, a, c)`
/// and every component lies in `[0, 1]`.
///
/// Fails with [`ElevationMatchError::IncompatibleProfiles`] when the two
/// cached normalized profiles have different lengths (they were built
/// with different resample counts) and with
/// [`ElevationMatchError::ConfigError`] for invalid weights.
///
/// # Example
/// ```
/// use elevation_matcher::{score_profiles, ElevationSample, MatchConfig, RouteKind, RouteProfile};
///
/// let trace = vec![
///     ElevationSample::new(0.0, 100.0),
///     ElevationSample::new(5000.0, 400.0),
/// ];
/// let a = RouteProfile::new("a", "Climb", RouteKind::Route, 5000.0, 300.0, trace.clone()).unwrap();
/// let b = RouteProfile::new("b", "Climb again", RouteKind::Activity, 5000.0, 300.0, trace).unwrap();
///
/// let score = score_profiles(&a, &b, &MatchConfig::default()).unwrap();
/// assert_eq!(score.overall, 1.0);
/// ```
pub fn score_profiles(
    a: &RouteProfile,
    b: &RouteProfile,
    config: &MatchConfig,
) -> Result<SimilarityScore> {
    config.validate()?;

    let profile_a = a.normalized(config.resample_count)?;
    let profile_b = b.normalized(config.resample_count)?;

    if profile_a.len() != profile_b.len() {
        return Err(ElevationMatchError::IncompatibleProfiles {
            id_a: a.id.clone(),
            id_b: b.id.clone(),
            len_a: profile_a.len(),
            len_b: profile_b.len(),
        });
    }

    let distance = distance_similarity(a.total_distance, b.total_distance);
    let elevation = elevation_similarity(a.elevation_gain, b.elevation_gain, config.gain_epsilon);
    let shape = shape_similarity(profile_a, profile_b);

    let overall = config.distance_weight * distance
        + config.elevation_weight * elevation
        + config.shape_weight * shape;

    Ok(SimilarityScore {
        overall,
        distance,
        elevation,
        shape,
    })
}
