//! In-memory profile catalog.
//!
//! A convenience layer over the pure matching core for applications that
//! keep a pool of loaded routes/activities around and repeatedly run
//! matches against it. The catalog is an explicit value owned by the
//! caller; there is no process-wide singleton, and the pure functions in
//! [`crate::ranking`] and [`crate::compare`] remain usable without it.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::compare::{compare_profiles, ComparisonReport};
use crate::error::{OptionExt, Result};
use crate::ranking::{find_matches_cancellable, CancelToken};
use crate::{
    ElevationSample, MatchConfig, MatchQuery, MatchResult, RouteKind, RouteProfile,
};

/// External source of elevation traces, keyed by profile id.
///
/// This is the seam to whatever activity/route catalog the surrounding
/// application talks to; the core never performs network or file I/O
/// itself.
pub trait ElevationSource {
    /// Yield the raw elevation trace for the given identifier.
    fn elevation_samples(&self, id: &str) -> Result<Vec<ElevationSample>>;
}

/// Catalog statistics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub profile_count: usize,
    pub activity_count: usize,
    pub route_count: usize,
}

/// An id-keyed pool of route profiles with match helpers.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: HashMap<String, RouteProfile>,
    config: MatchConfig,
}

impl ProfileCatalog {
    /// Create an empty catalog with default matching configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog with custom matching configuration.
    pub fn with_config(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            profiles: HashMap::new(),
            config,
        })
    }

    /// The matching configuration used by the catalog helpers.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Insert a profile, replacing any previous one with the same id.
    pub fn insert(&mut self, profile: RouteProfile) {
        debug!("Catalog: inserting profile '{}'", profile.id);
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Build a profile from an external source and insert it.
    pub fn load<S: ElevationSource>(
        &mut self,
        source: &S,
        id: &str,
        name: &str,
        kind: RouteKind,
        total_distance: f64,
        elevation_gain: f64,
    ) -> Result<()> {
        let samples = source.elevation_samples(id)?;
        let profile =
            RouteProfile::new(id, name, kind, total_distance, elevation_gain, samples)?;
        self.insert(profile);
        Ok(())
    }

    /// Remove a profile, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<RouteProfile> {
        self.profiles.remove(id)
    }

    /// Look up a profile by id.
    pub fn get(&self, id: &str) -> Option<&RouteProfile> {
        self.profiles.get(id)
    }

    /// Whether a profile with this id is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// All loaded profile ids, sorted for deterministic iteration.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.profiles.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of loaded profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Drop all profiles.
    pub fn clear(&mut self) {
        self.profiles.clear();
    }

    /// Rank every other loaded profile against the given target.
    ///
    /// Fails with [`ElevationMatchError::ProfileNotFound`] for an unknown
    /// target id; threshold validation matches [`MatchQuery::new`].
    pub fn find_matches_for(
        &self,
        target_id: &str,
        max_distance_delta: f64,
        min_similarity: f64,
    ) -> Result<Vec<MatchResult>> {
        self.find_matches_for_cancellable(
            target_id,
            max_distance_delta,
            min_similarity,
            &CancelToken::new(),
        )
    }

    /// [`ProfileCatalog::find_matches_for`] with cooperative cancellation.
    pub fn find_matches_for_cancellable(
        &self,
        target_id: &str,
        max_distance_delta: f64,
        min_similarity: f64,
        cancel: &CancelToken,
    ) -> Result<Vec<MatchResult>> {
        let target = self.profiles.get(target_id).ok_or_not_found(target_id)?;
        let candidates: Vec<&RouteProfile> = self
            .profiles
            .values()
            .filter(|p| p.id != target_id)
            .collect();

        let query =
            MatchQuery::from_refs(target, candidates, max_distance_delta, min_similarity)?;
        find_matches_cancellable(&query, &self.config, cancel)
    }

    /// Compare two loaded profiles in detail.
    pub fn compare_ids(&self, id_a: &str, id_b: &str) -> Result<ComparisonReport> {
        let a = self.profiles.get(id_a).ok_or_not_found(id_a)?;
        let b = self.profiles.get(id_b).ok_or_not_found(id_b)?;
        compare_profiles(a, b, &self.config)
    }

    /// Catalog statistics snapshot.
    pub fn stats(&self) -> CatalogStats {
        let activity_count = self
            .profiles
            .values()
            .filter(|p| p.kind == RouteKind::Activity)
            .count();
        CatalogStats {
            profile_count: self.profiles.len(),
            activity_count,
            route_count: self.profiles.len() - activity_count,
        }
    }

    /// Catalog statistics as JSON (for the surrounding presentation layer).
    pub fn stats_json(&self) -> String {
        serde_json::to_string(&self.stats()).unwrap_or_else(|_| "{}".to_string())
    }
}
