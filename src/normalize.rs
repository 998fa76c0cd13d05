//! Profile normalization.
//!
//! Converts a raw elevation trace into a fixed-resolution profile over
//! the distance-fraction domain `[0, 1]`, so that routes of different
//! lengths and sampling densities become directly comparable point-wise.

use crate::error::{ElevationMatchError, Result};
use crate::{ElevationSample, ProfilePoint};

/// Validate a raw sample sequence, returning its total distance.
///
/// Rules: at least 2 samples, all values finite, distances non-decreasing,
/// total distance strictly positive.
pub(crate) fn validate_samples(samples: &[ElevationSample]) -> Result<f64> {
    let invalid = |message: String| ElevationMatchError::InvalidProfile {
        profile_id: String::new(),
        message,
    };

    if samples.len() < 2 {
        return Err(invalid(format!(
            "{} samples, minimum 2 required",
            samples.len()
        )));
    }
    for (i, s) in samples.iter().enumerate() {
        if !s.is_valid() {
            return Err(invalid(format!(
                "sample {} has non-finite or negative values ({}, {})",
                i, s.distance, s.elevation
            )));
        }
    }
    for (i, w) in samples.windows(2).enumerate() {
        if w[1].distance < w[0].distance {
            return Err(invalid(format!(
                "distance decreases at sample {} ({} -> {})",
                i + 1,
                w[0].distance,
                w[1].distance
            )));
        }
    }

    let total = samples[samples.len() - 1].distance - samples[0].distance;
    if total <= 0.0 {
        return Err(invalid(
            "total distance over samples is zero, fractions are undefined".to_string(),
        ));
    }
    Ok(total)
}

/// Resample a raw elevation trace to exactly `k` evenly spaced points.
///
/// The output covers fractions `{0, 1/(k-1), ..., 1}` exactly; the first
/// and last points carry the first and last sample elevations, and
/// interior points are linearly interpolated between the bracketing raw
/// samples (never extrapolated, so the output stays within the sample
/// min/max).
///
/// Pure function: the same input always yields bit-identical output.
///
/// # Example
/// ```
/// use elevation_matcher::{normalize_profile, ElevationSample};
///
/// let trace = vec![
///     ElevationSample::new(0.0, 100.0),
///     ElevationSample::new(500.0, 300.0),
///     ElevationSample::new(1000.0, 200.0),
/// ];
/// let profile = normalize_profile(&trace, 5).unwrap();
/// assert_eq!(profile.len(), 5);
/// assert_eq!(profile[0].fraction, 0.0);
/// assert_eq!(profile[4].fraction, 1.0);
/// assert_eq!(profile[2].elevation, 300.0); // midpoint hits the peak sample
/// ```
pub fn normalize_profile(samples: &[ElevationSample], k: usize) -> Result<Vec<ProfilePoint>> {
    if k < 2 {
        return Err(ElevationMatchError::ConfigError {
            message: format!("resample count must be at least 2, got {}", k),
        });
    }
    let total = validate_samples(samples)?;
    let base = samples[0].distance;

    let mut profile = Vec::with_capacity(k);
    // Index of the segment [cursor, cursor+1] currently bracketing the
    // target fraction; only ever moves forward.
    let mut cursor = 0usize;

    for i in 0..k {
        let fraction = i as f64 / (k - 1) as f64;

        if i == 0 {
            profile.push(ProfilePoint {
                fraction: 0.0,
                elevation: samples[0].elevation,
            });
            continue;
        }
        if i == k - 1 {
            profile.push(ProfilePoint {
                fraction: 1.0,
                elevation: samples[samples.len() - 1].elevation,
            });
            continue;
        }

        let target = base + fraction * total;
        while cursor + 2 < samples.len() && samples[cursor + 1].distance < target {
            cursor += 1;
        }

        let lo = &samples[cursor];
        let hi = &samples[cursor + 1];
        let span = hi.distance - lo.distance;
        let elevation = if span <= 0.0 {
            // Repeated distance (e.g. a pause in the recording): both
            // endpoints sit at the target, take the earlier reading.
            lo.elevation
        } else {
            let ratio = ((target - lo.distance) / span).clamp(0.0, 1.0);
            lo.elevation + ratio * (hi.elevation - lo.elevation)
        };

        profile.push(ProfilePoint {
            fraction,
            elevation,
        });
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Vec<ElevationSample> {
        // Linear 0..1000m climb from 100m to 200m
        vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(1000.0, 200.0),
        ]
    }

    #[test]
    fn test_output_domain() {
        let profile = normalize_profile(&ramp(), 100).unwrap();
        assert_eq!(profile.len(), 100);
        assert_eq!(profile[0].fraction, 0.0);
        assert_eq!(profile[99].fraction, 1.0);
        assert_eq!(profile[0].elevation, 100.0);
        assert_eq!(profile[99].elevation, 200.0);

        // Fractions form the exact uniform grid
        for (i, p) in profile.iter().enumerate() {
            assert_eq!(p.fraction, i as f64 / 99.0);
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let profile = normalize_profile(&ramp(), 11).unwrap();
        // A linear trace resamples to a linear profile
        for p in &profile {
            assert!((p.elevation - (100.0 + 100.0 * p.fraction)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_determinism() {
        let trace = vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(333.0, 187.5),
            ElevationSample::new(612.0, 94.2),
            ElevationSample::new(1000.0, 151.1),
        ];
        let a = normalize_profile(&trace, 100).unwrap();
        let b = normalize_profile(&trace, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_overshoot() {
        let trace = vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(100.0, 480.0),
            ElevationSample::new(150.0, 95.0),
            ElevationSample::new(1000.0, 210.0),
        ];
        let profile = normalize_profile(&trace, 250).unwrap();
        for p in &profile {
            assert!(p.elevation >= 95.0 && p.elevation <= 480.0);
        }
    }

    #[test]
    fn test_dense_trace_downsamples() {
        let trace: Vec<ElevationSample> = (0..=5000)
            .map(|i| ElevationSample::new(i as f64, 100.0 + (i as f64 / 50.0).sin() * 20.0))
            .collect();
        let profile = normalize_profile(&trace, 100).unwrap();
        assert_eq!(profile.len(), 100);
        assert_eq!(profile[0].elevation, trace[0].elevation);
        assert_eq!(profile[99].elevation, trace[5000].elevation);
    }

    #[test]
    fn test_repeated_distances() {
        // A recording pause leaves duplicate cumulative distances
        let trace = vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(500.0, 150.0),
            ElevationSample::new(500.0, 150.0),
            ElevationSample::new(1000.0, 200.0),
        ];
        let profile = normalize_profile(&trace, 21).unwrap();
        assert_eq!(profile.len(), 21);
        assert!((profile[10].elevation - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        // Too few points
        let result = normalize_profile(&[ElevationSample::new(0.0, 100.0)], 100);
        assert!(matches!(
            result,
            Err(ElevationMatchError::InvalidProfile { .. })
        ));

        // Zero total distance
        let flat = vec![
            ElevationSample::new(10.0, 100.0),
            ElevationSample::new(10.0, 100.0),
        ];
        assert!(normalize_profile(&flat, 100).is_err());

        // Decreasing distance
        let backwards = vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(500.0, 150.0),
            ElevationSample::new(400.0, 140.0),
        ];
        assert!(normalize_profile(&backwards, 100).is_err());

        // Degenerate resample count
        assert!(matches!(
            normalize_profile(&ramp(), 1),
            Err(ElevationMatchError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_nonzero_start_distance() {
        // Traces that don't start at distance 0 still normalize over
        // their own span
        let trace = vec![
            ElevationSample::new(2000.0, 100.0),
            ElevationSample::new(3000.0, 200.0),
        ];
        let profile = normalize_profile(&trace, 3).unwrap();
        assert_eq!(profile[0].elevation, 100.0);
        assert!((profile[1].elevation - 150.0).abs() < 1e-9);
        assert_eq!(profile[2].elevation, 200.0);
    }
}
