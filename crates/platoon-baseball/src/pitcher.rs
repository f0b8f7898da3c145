// Probable pitcher profile resolution (name, throwing hand, season ERA).

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

use crate::lookup::Lookup;
use crate::matchup::parse_era;
use crate::schedule::PitcherRef;
use crate::source::{MatchupSource, PitcherDetail, StatSplit};

pub const UNKNOWN_PITCHER: &str = "Unknown Pitcher";
pub const UNKNOWN_HAND: &str = "?";

/// Split types the feed uses for current-season totals.
const SEASON_STAT_TYPES: [&str; 2] = ["season", "statssingleseason"];

/// What the report needs to know about an opposing pitcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherProfile {
    pub name: String,
    /// Single-letter throwing-hand code, or `"?"` when not known.
    pub throwing_hand: String,
    pub era: Lookup<f64>,
}

impl PitcherProfile {
    /// Placeholder for a team with no announced probable pitcher.
    pub fn unknown() -> Self {
        Self::unavailable(UNKNOWN_PITCHER)
    }

    /// Profile carrying only a display name; hand and ERA not known.
    pub fn unavailable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            throwing_hand: UNKNOWN_HAND.to_string(),
            era: Lookup::Unresolved,
        }
    }
}

fn is_season_split(split: &StatSplit) -> bool {
    let stat_type = split.stat_type.trim().to_ascii_lowercase();
    SEASON_STAT_TYPES.contains(&stat_type.as_str())
}

fn normalize_hand(code: Option<&str>) -> String {
    match code.map(str::trim).and_then(|c| c.chars().next()) {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
        _ => UNKNOWN_HAND.to_string(),
    }
}

/// Build a profile from a detail payload.
///
/// Without a season split the profile has no ERA and an unknown hand.
/// `fallback_name` is used when the payload carries no display name.
pub fn profile_from_detail(detail: &PitcherDetail, fallback_name: &str) -> PitcherProfile {
    let name = match detail.name.trim() {
        "" => fallback_name.trim(),
        n => n,
    };

    let Some(split) = detail.season_splits.iter().find(|s| is_season_split(s)) else {
        return PitcherProfile::unavailable(name);
    };

    PitcherProfile {
        name: name.to_string(),
        throwing_hand: normalize_hand(detail.hand_code.as_deref()),
        era: split
            .era
            .as_deref()
            .map(parse_era)
            .unwrap_or(Lookup::Unresolved),
    }
}

// ---------------------------------------------------------------------------
// Per-run cache
// ---------------------------------------------------------------------------

/// Profiles resolved during one report run, keyed by pitcher id.
#[derive(Debug, Clone, Default)]
pub struct PitcherCache {
    profiles: HashMap<u64, PitcherProfile>,
}

impl PitcherCache {
    pub fn get(&self, pitcher_id: u64) -> Option<&PitcherProfile> {
        self.profiles.get(&pitcher_id)
    }

    pub fn insert(&mut self, pitcher_id: u64, profile: PitcherProfile) {
        self.profiles.insert(pitcher_id, profile);
    }

    pub fn contains(&self, pitcher_id: u64) -> bool {
        self.profiles.contains_key(&pitcher_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves pitcher profiles through a `MatchupSource`, memoizing by id.
///
/// One resolver lives for exactly one report run; dropping it discards the
/// cache. Failed or timed-out fetches degrade to a name-only profile, which
/// is cached like any other so a failing id is fetched once per run.
pub struct PitcherProfileResolver<'a, S: MatchupSource + ?Sized> {
    source: &'a S,
    fetch_timeout: Duration,
    cache: PitcherCache,
}

impl<'a, S: MatchupSource + ?Sized> PitcherProfileResolver<'a, S> {
    pub fn new(source: &'a S, fetch_timeout: Duration) -> Self {
        Self {
            source,
            fetch_timeout,
            cache: PitcherCache::default(),
        }
    }

    pub fn cache(&self) -> &PitcherCache {
        &self.cache
    }

    async fn fetch_profile(&self, pitcher: &PitcherRef) -> PitcherProfile {
        let fetch = self.source.fetch_pitcher_detail(pitcher.id);
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(detail)) => {
                let profile = profile_from_detail(&detail, &pitcher.name);
                debug!(
                    pitcher_id = pitcher.id,
                    name = %profile.name,
                    hand = %profile.throwing_hand,
                    "resolved pitcher profile"
                );
                profile
            }
            Ok(Err(e)) => {
                warn!("pitcher detail for {} ({}) unavailable: {}", pitcher.name, pitcher.id, e);
                PitcherProfile::unavailable(&pitcher.name)
            }
            Err(_) => {
                warn!(
                    "pitcher detail for {} ({}) timed out after {:?}",
                    pitcher.name, pitcher.id, self.fetch_timeout
                );
                PitcherProfile::unavailable(&pitcher.name)
            }
        }
    }

    /// Resolve every distinct, not-yet-cached pitcher concurrently.
    /// Repeated ids in `pitchers` are fetched once.
    pub async fn prefetch(&mut self, pitchers: &[PitcherRef]) {
        let mut seen = HashSet::new();
        let pending: Vec<&PitcherRef> = pitchers
            .iter()
            .filter(|p| !self.cache.contains(p.id) && seen.insert(p.id))
            .collect();
        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(), "prefetching pitcher profiles");
        let profiles = join_all(pending.iter().map(|p| self.fetch_profile(p))).await;
        for (pitcher, profile) in pending.into_iter().zip(profiles) {
            self.cache.insert(pitcher.id, profile);
        }
    }

    /// Profile for an optional probable pitcher reference.
    ///
    /// `Unresolved` yields the "Unknown Pitcher" placeholder without touching
    /// the source.
    pub async fn resolve(&mut self, pitcher: Lookup<&PitcherRef>) -> PitcherProfile {
        let Lookup::Resolved(pitcher) = pitcher else {
            return PitcherProfile::unknown();
        };
        if let Some(profile) = self.cache.get(pitcher.id) {
            return profile.clone();
        }
        let profile = self.fetch_profile(pitcher).await;
        self.cache.insert(pitcher.id, profile.clone());
        profile
    }
}
