//! # Elevation Matcher
//!
//! Elevation profile matching for GPS routes and activities.
//!
//! This library provides:
//! - Normalization of raw elevation traces into fixed-resolution profiles
//! - Multi-factor similarity scoring (distance, elevation gain, shape)
//! - Ranked filtering of a candidate pool against a target route
//! - Detailed two-route comparison for side-by-side views
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel candidate scoring with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use elevation_matcher::{
//!     ElevationSample, MatchConfig, MatchQuery, RouteKind, RouteProfile, find_matches,
//! };
//!
//! fn climb(id: &str, gain: f64) -> RouteProfile {
//!     let samples: Vec<ElevationSample> = (0..=10)
//!         .map(|i| ElevationSample::new(i as f64 * 1000.0, 100.0 + gain * i as f64 / 10.0))
//!         .collect();
//!     RouteProfile::new(id, "Morning climb", RouteKind::Route, 10_000.0, gain, samples).unwrap()
//! }
//!
//! let target = climb("target", 500.0);
//! let pool = vec![climb("a", 480.0), climb("b", 150.0)];
//!
//! let query = MatchQuery::new(&target, &pool, 2_000.0, 0.5).unwrap();
//! let matches = find_matches(&query, &MatchConfig::default()).unwrap();
//! assert_eq!(matches[0].candidate.id, "a");
//! ```

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ElevationMatchError, OptionExt, Result};

// Profile normalization (raw samples -> fixed-resolution profile)
pub mod normalize;
pub use normalize::normalize_profile;

// Similarity scoring between two profiles
pub mod scoring;
pub use scoring::{distance_similarity, elevation_similarity, score_profiles, shape_similarity};

// Ranked matching of a candidate pool against a target
pub mod ranking;
pub use ranking::{find_matches, find_matches_cancellable, CancelToken};

// Detailed pairwise comparison
pub mod compare;
pub use compare::{compare_profiles, ComparisonReport};

// Geographic utilities (start-point proximity filter)
pub mod geo_utils;

// In-memory profile catalog (explicit state, no singleton)
pub mod catalog;
pub use catalog::{CatalogStats, ElevationSource, ProfileCatalog};

// Algorithm toolbox - flat access to all algorithms
pub mod algorithms;

// ============================================================================
// Core Types
// ============================================================================

/// A raw elevation reading along a route.
///
/// `distance` is the cumulative distance from the start in meters,
/// `elevation` the altitude in meters. Sequences of samples must have
/// non-decreasing distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    /// Cumulative distance from the route start in meters
    pub distance: f64,
    /// Elevation in meters
    pub elevation: f64,
}

impl ElevationSample {
    /// Create a new elevation sample.
    pub fn new(distance: f64, elevation: f64) -> Self {
        Self {
            distance,
            elevation,
        }
    }

    /// Check that both values are finite and distance is non-negative.
    pub fn is_valid(&self) -> bool {
        self.distance.is_finite() && self.elevation.is_finite() && self.distance >= 0.0
    }
}

/// One point of a normalized elevation profile.
///
/// `fraction` is the position along the route in `[0, 1]`; `elevation`
/// is the (interpolated) elevation in meters at that position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Position along the route as a fraction of total distance
    pub fraction: f64,
    /// Interpolated elevation in meters
    pub elevation: f64,
}

/// A GPS coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Provenance of a route profile. Does not affect matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    /// Recorded activity (a ride/run that actually happened)
    Activity,
    /// Planned route
    Route,
}

/// Elevation statistics derived from a profile's samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationStats {
    /// Cumulative positive ascent in meters (from route metadata)
    pub gain: f64,
    /// Maximum elevation over the samples
    pub max: f64,
    /// Minimum elevation over the samples
    pub min: f64,
    /// Mean elevation over the samples
    pub avg: f64,
}

impl ElevationStats {
    fn from_samples(gain: f64, samples: &[ElevationSample]) -> Self {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.0;
        for s in samples {
            min = min.min(s.elevation);
            max = max.max(s.elevation);
            sum += s.elevation;
        }
        Self {
            gain,
            max,
            min,
            avg: sum / samples.len() as f64,
        }
    }
}

/// A route or activity with its elevation trace.
///
/// Samples are immutable after construction; the normalized profile is
/// computed once on first access and cached (race-safe, so the same
/// profile can be referenced from concurrent match queries).
///
/// # Example
/// ```
/// use elevation_matcher::{ElevationSample, RouteKind, RouteProfile};
///
/// let samples = vec![
///     ElevationSample::new(0.0, 120.0),
///     ElevationSample::new(2500.0, 340.0),
///     ElevationSample::new(5000.0, 180.0),
/// ];
/// let profile =
///     RouteProfile::new("route-1", "Col loop", RouteKind::Route, 5000.0, 220.0, samples).unwrap();
/// assert_eq!(profile.stats().max, 340.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteProfile {
    /// Opaque stable identifier, unique within its source collection
    pub id: String,
    /// Display label (not used in matching)
    pub name: String,
    /// Provenance (activity vs planned route)
    pub kind: RouteKind,
    /// Total route distance in meters (> 0)
    pub total_distance: f64,
    /// Cumulative positive ascent in meters (>= 0)
    pub elevation_gain: f64,
    /// Starting coordinate, when known (used by the location pre-filter)
    pub start_point: Option<GpsPoint>,
    samples: Vec<ElevationSample>,
    stats: ElevationStats,
    #[serde(skip)]
    normalized: OnceCell<Vec<ProfilePoint>>,
}

impl RouteProfile {
    /// Create a profile from route metadata and an elevation trace.
    ///
    /// Fails with [`ElevationMatchError::InvalidProfile`] when the trace
    /// has fewer than 2 samples, contains non-finite or decreasing
    /// distances, or when `total_distance` is not a positive finite number.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: RouteKind,
        total_distance: f64,
        elevation_gain: f64,
        samples: Vec<ElevationSample>,
    ) -> Result<Self> {
        let id = id.into();

        if !total_distance.is_finite() || total_distance <= 0.0 {
            return Err(ElevationMatchError::InvalidProfile {
                profile_id: id,
                message: format!("total distance must be positive, got {}", total_distance),
            });
        }
        if !elevation_gain.is_finite() || elevation_gain < 0.0 {
            return Err(ElevationMatchError::InvalidProfile {
                profile_id: id,
                message: format!("elevation gain must be >= 0, got {}", elevation_gain),
            });
        }
        normalize::validate_samples(&samples).map_err(|e| e.with_profile_id(&id))?;

        let stats = ElevationStats::from_samples(elevation_gain, &samples);

        Ok(Self {
            id,
            name: name.into(),
            kind,
            total_distance,
            elevation_gain,
            start_point: None,
            samples,
            stats,
            normalized: OnceCell::new(),
        })
    }

    /// Attach a starting coordinate (enables the location pre-filter).
    pub fn with_start_point(mut self, start: GpsPoint) -> Self {
        self.start_point = Some(start);
        self
    }

    /// The raw elevation trace.
    pub fn samples(&self) -> &[ElevationSample] {
        &self.samples
    }

    /// Derived elevation statistics.
    pub fn stats(&self) -> &ElevationStats {
        &self.stats
    }

    /// The normalized profile at resolution `k`, computed once and cached.
    ///
    /// All comparisons in one system must use the same `k`; the scorer
    /// rejects profiles whose cached resolutions differ.
    pub fn normalized(&self, k: usize) -> Result<&[ProfilePoint]> {
        let profile = self
            .normalized
            .get_or_try_init(|| {
                normalize_profile(&self.samples, k).map_err(|e| e.with_profile_id(&self.id))
            })?;
        Ok(profile)
    }
}

/// Similarity between two profiles, all components in `[0, 1]`.
///
/// 1.0 means identical under the respective metric, 0.0 maximal
/// dissimilarity. `overall` is the weighted blend of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    /// Weighted blend of the component similarities
    pub overall: f64,
    /// Relative total-distance similarity
    pub distance: f64,
    /// Relative elevation-gain similarity
    pub elevation: f64,
    /// Silhouette similarity of the normalized profiles
    pub shape: f64,
}

/// A single ranked match produced by [`find_matches`].
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// The matched candidate profile
    pub candidate: RouteProfile,
    /// Similarity of the candidate to the query target
    pub score: SimilarityScore,
}

/// One match request: a target, a candidate pool and filter thresholds.
///
/// Transient; build one per request. The optional knobs (`max_results`,
/// `max_start_distance`) default to disabled.
#[derive(Debug, Clone)]
pub struct MatchQuery<'a> {
    /// The profile to find matches for
    pub target: &'a RouteProfile,
    /// The pool to evaluate (the target itself is skipped by id)
    pub candidates: Vec<&'a RouteProfile>,
    /// Maximum allowed |candidate distance - target distance| in meters
    pub max_distance_delta: f64,
    /// Minimum overall similarity to keep a candidate, in [0, 1]
    pub min_similarity: f64,
    /// Keep only the best N matches (None = unlimited)
    pub max_results: Option<usize>,
    /// Maximum start-point separation in meters (None = no location filter)
    pub max_start_distance: Option<f64>,
}

impl<'a> MatchQuery<'a> {
    /// Build a query over a slice of candidates.
    ///
    /// Fails with [`ElevationMatchError::ConfigError`] when
    /// `min_similarity` lies outside `[0, 1]` or `max_distance_delta`
    /// is negative. Out-of-range thresholds are rejected, not clamped.
    pub fn new(
        target: &'a RouteProfile,
        candidates: &'a [RouteProfile],
        max_distance_delta: f64,
        min_similarity: f64,
    ) -> Result<Self> {
        Self::from_refs(
            target,
            candidates.iter().collect(),
            max_distance_delta,
            min_similarity,
        )
    }

    /// Build a query from already-collected candidate references.
    pub fn from_refs(
        target: &'a RouteProfile,
        candidates: Vec<&'a RouteProfile>,
        max_distance_delta: f64,
        min_similarity: f64,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&min_similarity) {
            return Err(ElevationMatchError::ConfigError {
                message: format!("min_similarity must be in [0, 1], got {}", min_similarity),
            });
        }
        if !max_distance_delta.is_finite() || max_distance_delta < 0.0 {
            return Err(ElevationMatchError::ConfigError {
                message: format!(
                    "max_distance_delta must be >= 0 meters, got {}",
                    max_distance_delta
                ),
            });
        }
        Ok(Self {
            target,
            candidates,
            max_distance_delta,
            min_similarity,
            max_results: None,
            max_start_distance: None,
        })
    }

    /// Cap the result list at the best `n` matches.
    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = Some(n);
        self
    }

    /// Only consider candidates starting within `meters` of the target's
    /// start point. Candidates without a start point are excluded while
    /// this filter is active; a target without one disables it.
    pub fn with_max_start_distance(mut self, meters: f64) -> Result<Self> {
        if !meters.is_finite() || meters < 0.0 {
            return Err(ElevationMatchError::ConfigError {
                message: format!("max_start_distance must be >= 0 meters, got {}", meters),
            });
        }
        self.max_start_distance = Some(meters);
        Ok(self)
    }
}

/// Configuration for profile normalization and similarity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of points every profile is resampled to.
    /// Default: 100
    pub resample_count: usize,

    /// Weight of total-distance similarity in the overall score.
    /// Default: 0.25
    pub distance_weight: f64,

    /// Weight of elevation-gain similarity in the overall score.
    /// Default: 0.25
    pub elevation_weight: f64,

    /// Weight of profile-shape similarity in the overall score.
    /// Shape is the primary signal. Default: 0.5
    pub shape_weight: f64,

    /// Floor for the gain-similarity denominator, in meters.
    /// Prevents division by zero for near-flat routes. Default: 1.0
    pub gain_epsilon: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            resample_count: 100,
            distance_weight: 0.25,
            elevation_weight: 0.25,
            shape_weight: 0.5,
            gain_epsilon: 1.0,
        }
    }
}

impl MatchConfig {
    /// Check the configuration invariants.
    ///
    /// Weights must be non-negative and sum to 1, the resample count must
    /// be at least 2, and `gain_epsilon` must be positive.
    pub fn validate(&self) -> Result<()> {
        if self.resample_count < 2 {
            return Err(ElevationMatchError::ConfigError {
                message: format!(
                    "resample_count must be at least 2, got {}",
                    self.resample_count
                ),
            });
        }
        let weights = [
            self.distance_weight,
            self.elevation_weight,
            self.shape_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ElevationMatchError::ConfigError {
                message: "similarity weights must be finite and non-negative".to_string(),
            });
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ElevationMatchError::ConfigError {
                message: format!("similarity weights must sum to 1, got {}", sum),
            });
        }
        if !self.gain_epsilon.is_finite() || self.gain_epsilon <= 0.0 {
            return Err(ElevationMatchError::ConfigError {
                message: format!("gain_epsilon must be > 0, got {}", self.gain_epsilon),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trace() -> Vec<ElevationSample> {
        vec![
            ElevationSample::new(0.0, 100.0),
            ElevationSample::new(1000.0, 150.0),
            ElevationSample::new(2000.0, 130.0),
            ElevationSample::new(3000.0, 210.0),
            ElevationSample::new(4000.0, 180.0),
        ]
    }

    #[test]
    fn test_sample_validation() {
        assert!(ElevationSample::new(0.0, 120.0).is_valid());
        assert!(!ElevationSample::new(-5.0, 120.0).is_valid());
        assert!(!ElevationSample::new(f64::NAN, 120.0).is_valid());
        assert!(!ElevationSample::new(100.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_gps_point_validation() {
        assert!(GpsPoint::new(51.5074, -0.1278).is_valid());
        assert!(!GpsPoint::new(91.0, 0.0).is_valid());
        assert!(!GpsPoint::new(0.0, 181.0).is_valid());
        assert!(!GpsPoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_create_profile() {
        let profile = RouteProfile::new(
            "test-1",
            "Morning loop",
            RouteKind::Activity,
            4000.0,
            110.0,
            sample_trace(),
        )
        .unwrap();

        assert_eq!(profile.id, "test-1");
        assert_eq!(profile.stats().max, 210.0);
        assert_eq!(profile.stats().min, 100.0);
        assert_eq!(profile.stats().gain, 110.0);
        assert!((profile.stats().avg - 154.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_rejects_bad_metadata() {
        let result = RouteProfile::new(
            "test-1",
            "Zero",
            RouteKind::Route,
            0.0,
            10.0,
            sample_trace(),
        );
        assert!(matches!(
            result,
            Err(ElevationMatchError::InvalidProfile { .. })
        ));

        let result = RouteProfile::new(
            "test-2",
            "Negative gain",
            RouteKind::Route,
            4000.0,
            -1.0,
            sample_trace(),
        );
        assert!(matches!(
            result,
            Err(ElevationMatchError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn test_profile_rejects_degenerate_samples() {
        let result = RouteProfile::new(
            "test-1",
            "Single point",
            RouteKind::Route,
            1000.0,
            0.0,
            vec![ElevationSample::new(0.0, 100.0)],
        );
        assert!(matches!(
            result,
            Err(ElevationMatchError::InvalidProfile { profile_id, .. }) if profile_id == "test-1"
        ));
    }

    #[test]
    fn test_normalized_is_cached() {
        let profile = RouteProfile::new(
            "test-1",
            "Loop",
            RouteKind::Activity,
            4000.0,
            110.0,
            sample_trace(),
        )
        .unwrap();

        let first = profile.normalized(100).unwrap().to_vec();
        let second = profile.normalized(100).unwrap();
        assert_eq!(first.as_slice(), second);
        assert_eq!(second.len(), 100);
    }

    #[test]
    fn test_query_threshold_validation() {
        let target = RouteProfile::new(
            "t",
            "Target",
            RouteKind::Route,
            4000.0,
            110.0,
            sample_trace(),
        )
        .unwrap();
        let pool: Vec<RouteProfile> = vec![];

        // min_similarity above 1.0 is rejected, not clamped
        assert!(matches!(
            MatchQuery::new(&target, &pool, 500.0, 1.01),
            Err(ElevationMatchError::ConfigError { .. })
        ));
        assert!(matches!(
            MatchQuery::new(&target, &pool, -1.0, 0.5),
            Err(ElevationMatchError::ConfigError { .. })
        ));
        assert!(MatchQuery::new(&target, &pool, 500.0, 1.0).is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(MatchConfig::default().validate().is_ok());

        let bad = MatchConfig {
            shape_weight: 0.7,
            ..MatchConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ElevationMatchError::ConfigError { .. })
        ));

        let bad = MatchConfig {
            resample_count: 1,
            ..MatchConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = RouteProfile::new(
            "test-1",
            "Loop",
            RouteKind::Activity,
            4000.0,
            110.0,
            sample_trace(),
        )
        .unwrap()
        .with_start_point(GpsPoint::new(51.5074, -0.1278));

        let json = serde_json::to_string(&profile).unwrap();
        let back: RouteProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, profile.id);
        assert_eq!(back.samples(), profile.samples());
        assert_eq!(back.start_point, profile.start_point);
        // The normalized cache is not serialized; it refills on demand
        assert_eq!(back.normalized(50).unwrap().len(), 50);
    }
}
