//! Ranked matching of a candidate pool against a target profile.
//!
//! The ranker applies cheap pre-filters (identity, start-location
//! proximity, distance delta) before scoring, then sorts survivors into
//! a deterministic total order: overall similarity descending, candidate
//! id ascending on ties.
//!
//! Candidates are scored independently, so with the `parallel` feature
//! the scoring pass fans out over rayon; the final sort re-establishes
//! the order regardless of worker completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ElevationMatchError, Result};
use crate::geo_utils::haversine_distance;
use crate::scoring::score_profiles;
use crate::{MatchConfig, MatchQuery, MatchResult, RouteProfile};

/// Cooperative cancellation flag for a long ranking pass.
///
/// Clone the token, hand one copy to `find_matches_cancellable` and keep
/// the other; calling [`CancelToken::cancel`] makes the running pass
/// return [`ElevationMatchError::Cancelled`] instead of a partial list.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of any pass holding a clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Cheap pre-filters applied before any scoring work.
fn passes_filters(query: &MatchQuery<'_>, candidate: &RouteProfile) -> bool {
    // Never match a profile against itself
    if candidate.id == query.target.id {
        return false;
    }

    // Start-location proximity (when enabled and the target has a start).
    // Candidates without a start point cannot satisfy an active filter.
    if let (Some(max_start), Some(target_start)) =
        (query.max_start_distance, query.target.start_point)
    {
        match candidate.start_point {
            Some(candidate_start) => {
                if haversine_distance(&target_start, &candidate_start) > max_start {
                    return false;
                }
            }
            None => return false,
        }
    }

    (candidate.total_distance - query.target.total_distance).abs() <= query.max_distance_delta
}

fn score_candidate(
    query: &MatchQuery<'_>,
    candidate: &RouteProfile,
    config: &MatchConfig,
) -> Result<Option<MatchResult>> {
    if !passes_filters(query, candidate) {
        return Ok(None);
    }
    let score = score_profiles(query.target, candidate, config)?;
    if score.overall < query.min_similarity {
        return Ok(None);
    }
    Ok(Some(MatchResult {
        candidate: candidate.clone(),
        score,
    }))
}

/// Sort into the defined total order and apply the result cap.
fn finalize(mut results: Vec<MatchResult>, max_results: Option<usize>) -> Vec<MatchResult> {
    results.sort_by(|a, b| {
        b.score
            .overall
            .total_cmp(&a.score.overall)
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });
    if let Some(cap) = max_results {
        results.truncate(cap);
    }
    results
}

/// Find and rank candidates similar to the query target.
///
/// Returns matches sorted by overall similarity descending (ties broken
/// by ascending candidate id), each satisfying both the distance-delta
/// and minimum-similarity thresholds. An empty pool or fully filtered
/// pool yields an empty vector, not an error.
///
/// # Example
/// ```
/// use elevation_matcher::{
///     find_matches, ElevationSample, MatchConfig, MatchQuery, RouteKind, RouteProfile,
/// };
///
/// let trace = vec![
///     ElevationSample::new(0.0, 100.0),
///     ElevationSample::new(10_000.0, 600.0),
/// ];
/// let target =
///     RouteProfile::new("t", "Target", RouteKind::Route, 10_000.0, 500.0, trace.clone()).unwrap();
/// let pool = vec![
///     RouteProfile::new("near", "Near", RouteKind::Activity, 10_400.0, 500.0, trace.clone())
///         .unwrap(),
///     RouteProfile::new("far", "Far", RouteKind::Activity, 10_600.0, 500.0, trace).unwrap(),
/// ];
///
/// let query = MatchQuery::new(&target, &pool, 500.0, 0.0).unwrap();
/// let matches = find_matches(&query, &MatchConfig::default()).unwrap();
/// // 10_600m is 600m away from the target: excluded by the delta filter
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].candidate.id, "near");
/// ```
pub fn find_matches(query: &MatchQuery<'_>, config: &MatchConfig) -> Result<Vec<MatchResult>> {
    find_matches_cancellable(query, config, &CancelToken::new())
}

/// [`find_matches`] with cooperative cancellation.
///
/// Checks the token between candidates; once cancelled the pass abandons
/// the remaining pool and returns [`ElevationMatchError::Cancelled`].
/// Callers never observe a partially filled, partially sorted list.
pub fn find_matches_cancellable(
    query: &MatchQuery<'_>,
    config: &MatchConfig,
    cancel: &CancelToken,
) -> Result<Vec<MatchResult>> {
    config.validate()?;

    debug!(
        "Ranking {} candidates against '{}' (max_delta={}m, min_similarity={})",
        query.candidates.len(),
        query.target.id,
        query.max_distance_delta,
        query.min_similarity
    );

    let kept = collect_matches(query, config, cancel)?;

    debug!(
        "{} of {} candidates survived filtering for '{}'",
        kept.len(),
        query.candidates.len(),
        query.target.id
    );

    Ok(finalize(kept, query.max_results))
}

#[cfg(not(feature = "parallel"))]
fn collect_matches(
    query: &MatchQuery<'_>,
    config: &MatchConfig,
    cancel: &CancelToken,
) -> Result<Vec<MatchResult>> {
    let mut kept = Vec::new();
    for candidate in &query.candidates {
        if cancel.is_cancelled() {
            return Err(ElevationMatchError::Cancelled);
        }
        if let Some(result) = score_candidate(query, candidate, config)? {
            kept.push(result);
        }
    }
    Ok(kept)
}

#[cfg(feature = "parallel")]
fn collect_matches(
    query: &MatchQuery<'_>,
    config: &MatchConfig,
    cancel: &CancelToken,
) -> Result<Vec<MatchResult>> {
    let scored: Vec<Option<MatchResult>> = query
        .candidates
        .par_iter()
        .map(|candidate| {
            if cancel.is_cancelled() {
                return Err(ElevationMatchError::Cancelled);
            }
            score_candidate(query, candidate, config)
        })
        .collect::<Result<_>>()?;

    Ok(scored.into_iter().flatten().collect())
}
