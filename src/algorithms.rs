//! # Algorithm Toolbox
//!
//! Flat access to the matching algorithms for integrating individual
//! pieces into other systems without the catalog layer.
//!
//! ## Core Algorithms
//!
//! - **Profile Normalization**: raw traces to fixed-resolution profiles
//! - **Similarity Scoring**: distance/gain/shape component similarities
//! - **Match Ranking**: filtered, deterministically ordered match lists
//! - **Pairwise Comparison**: full diff report for two routes
//!
//! # Example
//!
//! ```rust
//! use elevation_matcher::algorithms::{
//!     distance_similarity, elevation_similarity, normalize_profile, shape_similarity,
//!     ElevationSample,
//! };
//!
//! let trace = vec![
//!     ElevationSample::new(0.0, 120.0),
//!     ElevationSample::new(4000.0, 480.0),
//! ];
//! let profile = normalize_profile(&trace, 100).unwrap();
//! assert_eq!(shape_similarity(&profile, &profile), 1.0);
//! assert_eq!(distance_similarity(10_000.0, 10_000.0), 1.0);
//! assert_eq!(elevation_similarity(0.0, 500.0, 1.0), 0.0);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{
    ElevationSample, ElevationStats, GpsPoint, MatchConfig, MatchQuery, MatchResult,
    ProfilePoint, RouteKind, RouteProfile, SimilarityScore,
};

// =============================================================================
// Profile Normalization
// =============================================================================

/// Resample a raw elevation trace to a fixed-resolution profile over
/// the `[0, 1]` distance-fraction domain.
pub use crate::normalize::normalize_profile;

// =============================================================================
// Similarity Scoring
// =============================================================================

/// Full composite score between two route profiles.
pub use crate::scoring::score_profiles;

/// Relative total-distance similarity component.
pub use crate::scoring::distance_similarity;

/// Relative elevation-gain similarity component.
pub use crate::scoring::elevation_similarity;

/// Mean-centered silhouette similarity component.
pub use crate::scoring::shape_similarity;

// =============================================================================
// Match Ranking
// =============================================================================

/// Rank a candidate pool against a target.
pub use crate::ranking::find_matches;

/// Ranked matching with cooperative cancellation.
pub use crate::ranking::{find_matches_cancellable, CancelToken};

// =============================================================================
// Pairwise Comparison
// =============================================================================

/// Detailed two-route diff report.
pub use crate::compare::{compare_profiles, ComparisonReport};

// =============================================================================
// Geographic Utilities
// =============================================================================

/// Great-circle distance for the start-location pre-filter.
pub use crate::geo_utils::haversine_distance;
