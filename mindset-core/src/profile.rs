//! Player profiles and the persistence port they are written through.
//!
//! A [`Profile`] accumulates counters across runs. The session never
//! touches storage itself: the host calls [`record_session`] once, when
//! the run completes, with whichever [`ProfileStore`] it was given.
//!
//! Two stores ship with the crate:
//!
//! | Store                      | Backing                                  |
//! |----------------------------|------------------------------------------|
//! | [`InMemoryProfileStore`]   | `HashMap` behind a `parking_lot::Mutex`  |
//! | [`JsonFileProfileStore`]   | one `<uuid>.json` document per profile   |

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MindsetError, Result};
use crate::scoring::{SessionSummary, StarRating};

/// Unique profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub Uuid);

impl ProfileId {
    /// Generate a new random profile id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProfileId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Cumulative statistics for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile id.
    pub id: ProfileId,
    /// Name shown in greetings and success messages.
    pub display_name: String,
    /// Completed runs.
    pub total_sessions: u32,
    /// Targets found across all runs.
    pub total_targets_found: u32,
    /// Hints requested across all runs.
    pub total_hints_used: u32,
    /// Scenarios solved across all runs.
    pub scenarios_completed: u32,
    /// Best rating ever earned. `None` until the first run completes.
    pub best_star_rating: Option<StarRating>,
    /// Last time the profile was written.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile with zeroed counters.
    #[must_use]
    pub fn new(id: ProfileId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            total_sessions: 0,
            total_targets_found: 0,
            total_hints_used: 0,
            scenarios_completed: 0,
            best_star_rating: None,
            updated_at: Utc::now(),
        }
    }

    /// Fold one finished run into the totals.
    pub fn apply_session(&mut self, summary: &SessionSummary) {
        self.total_sessions += 1;
        self.total_targets_found += summary.stats.targets_found;
        self.total_hints_used += summary.stats.hints_used;
        self.scenarios_completed += summary.stats.scenarios_completed;
        self.best_star_rating = self.best_star_rating.max(Some(summary.stars));
        self.updated_at = summary.completed_at;
    }
}

/// Persistence port for profiles.
pub trait ProfileStore: Send + Sync {
    /// Load a profile. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    /// Returns an error if the backing store fails or holds a corrupt record.
    fn load(&self, id: ProfileId) -> Result<Option<Profile>>;

    /// Insert or overwrite a profile.
    ///
    /// # Errors
    /// Returns an error if the backing store fails.
    fn save(&self, profile: &Profile) -> Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store, mostly for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.lock().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.lock().is_empty()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, id: ProfileId) -> Result<Option<Profile>> {
        Ok(self.profiles.lock().get(&id).cloned())
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        self.profiles.lock().insert(profile.id, profile.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Marker file naming the profile used by the last run.
const CURRENT_FILE: &str = "current";

/// Stores each profile as `<dir>/<uuid>.json`, plus a `current` marker
/// holding the id of the last profile used.
#[derive(Debug, Clone)]
pub struct JsonFileProfileStore {
    dir: PathBuf,
}

impl JsonFileProfileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns [`MindsetError::Io`] if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "Opened profile store");
        Ok(Self { dir })
    }

    /// Directory the store writes to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: ProfileId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn current_path(&self) -> PathBuf {
        self.dir.join(CURRENT_FILE)
    }

    /// Id of the profile used by the last run, if one was remembered.
    ///
    /// # Errors
    /// Returns [`MindsetError::Profile`] if the marker holds something
    /// other than a UUID.
    pub fn current_id(&self) -> Result<Option<ProfileId>> {
        let path = self.current_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = Uuid::parse_str(text.trim())
            .map_err(|e| MindsetError::Profile(format!("{}: {e}", path.display())))?;
        Ok(Some(ProfileId(id)))
    }

    /// Remember `id` as the profile for the next run.
    ///
    /// # Errors
    /// Returns [`MindsetError::Io`] if the marker cannot be written.
    pub fn set_current_id(&self, id: ProfileId) -> Result<()> {
        std::fs::write(self.current_path(), id.to_string())?;
        Ok(())
    }

    /// Pick the profile for this run: `configured` if given, else the one
    /// remembered from the last run, else a fresh id. The choice is
    /// remembered for the next run.
    ///
    /// # Errors
    /// Propagates failures reading or writing the marker.
    pub fn resolve_id(&self, configured: Option<Uuid>) -> Result<ProfileId> {
        let id = match configured {
            Some(id) => ProfileId(id),
            None => self.current_id()?.unwrap_or_default(),
        };
        self.set_current_id(id)?;
        debug!(profile = %id, "Resolved profile for this run");
        Ok(id)
    }
}

impl ProfileStore for JsonFileProfileStore {
    fn load(&self, id: ProfileId) -> Result<Option<Profile>> {
        let path = self.path_for(id);
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let profile: Profile = serde_json::from_slice(&data)
            .map_err(|e| MindsetError::Profile(format!("{}: {e}", path.display())))?;
        debug!(profile = %id, bytes = data.len(), "Loaded profile");
        Ok(Some(profile))
    }

    fn save(&self, profile: &Profile) -> Result<()> {
        let json = serde_json::to_vec_pretty(profile)
            .map_err(|e| MindsetError::Serialization(e.to_string()))?;
        let path = self.path_for(profile.id);
        // Readers only ever see a complete file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &path)?;
        debug!(profile = %profile.id, bytes = json.len(), "Saved profile");
        Ok(())
    }
}

/// Load (or create) the profile `id`, fold `summary` into it and save it.
/// A non-blank `display_name` that differs from the stored one renames
/// the profile.
///
/// # Errors
/// Propagates store failures.
pub fn record_session(
    store: &dyn ProfileStore,
    id: ProfileId,
    display_name: &str,
    summary: &SessionSummary,
) -> Result<Profile> {
    let mut profile = store
        .load(id)?
        .unwrap_or_else(|| Profile::new(id, display_name));
    let name = display_name.trim();
    if !name.is_empty() && profile.display_name != name {
        info!(profile = %id, from = %profile.display_name, to = name, "Renaming profile");
        profile.display_name = name.to_string();
    }
    profile.apply_session(summary);
    store.save(&profile)?;
    info!(
        profile = %id,
        total_sessions = profile.total_sessions,
        stars = summary.stars.stars(),
        "Recorded session in profile"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionStats;

    fn summary(targets_found: u32, hints_used: u32) -> SessionSummary {
        SessionSummary::new(
            SessionStats {
                scenarios_completed: 1,
                targets_found,
                hints_used,
            },
            0,
            1,
        )
    }

    #[test]
    fn apply_session_accumulates_and_keeps_best() {
        let mut profile = Profile::new(ProfileId::new(), "Ada");
        profile.apply_session(&summary(3, 0));
        profile.apply_session(&summary(2, 5));
        assert_eq!(profile.total_sessions, 2);
        assert_eq!(profile.total_targets_found, 5);
        assert_eq!(profile.total_hints_used, 5);
        assert_eq!(profile.scenarios_completed, 2);
        assert_eq!(profile.best_star_rating, Some(StarRating::Three));
    }

    #[test]
    fn record_session_creates_missing_profile() {
        let store = InMemoryProfileStore::new();
        let id = ProfileId::new();
        let profile = record_session(&store, id, "Ada", &summary(1, 1)).expect("record");
        assert_eq!(profile.display_name, "Ada");
        assert_eq!(store.len(), 1);
        let again = record_session(&store, id, "  ", &summary(1, 1)).expect("record");
        assert_eq!(again.display_name, "Ada");
        assert_eq!(again.total_sessions, 2);
    }

    #[test]
    fn record_session_renames_on_new_name() {
        let store = InMemoryProfileStore::new();
        let id = ProfileId::new();
        record_session(&store, id, "Ada", &summary(1, 0)).expect("record");
        let renamed = record_session(&store, id, "Grace", &summary(2, 0)).expect("record");
        assert_eq!(renamed.display_name, "Grace");
        assert_eq!(renamed.total_sessions, 2);
        assert_eq!(renamed.total_targets_found, 3);
        let stored = store.load(id).expect("load").expect("exists");
        assert_eq!(stored.display_name, "Grace");
    }

    #[test]
    fn resolved_id_is_reused_across_runs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProfileStore::open(dir.path()).expect("open");
        assert!(store.current_id().expect("read marker").is_none());

        let first = store.resolve_id(None).expect("first run");
        let reopened = JsonFileProfileStore::open(dir.path()).expect("reopen");
        let second = reopened.resolve_id(None).expect("second run");
        assert_eq!(first, second);

        record_session(&store, first, "Ada", &summary(1, 0)).expect("record");
        record_session(&reopened, second, "Ada", &summary(1, 0)).expect("record");
        let profile = store.load(first).expect("load").expect("exists");
        assert_eq!(profile.total_sessions, 2);
    }

    #[test]
    fn configured_id_wins_and_becomes_current() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProfileStore::open(dir.path()).expect("open");
        store.resolve_id(None).expect("first run");

        let chosen = Uuid::new_v4();
        assert_eq!(store.resolve_id(Some(chosen)).expect("configured"), ProfileId(chosen));
        assert_eq!(store.current_id().expect("read"), Some(ProfileId(chosen)));
    }

    #[test]
    fn garbled_marker_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProfileStore::open(dir.path()).expect("open");
        std::fs::write(dir.path().join("current"), "not-a-uuid").expect("write");
        assert!(matches!(store.resolve_id(None), Err(MindsetError::Profile(_))));
    }

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProfileStore::open(dir.path().join("profiles")).expect("open");
        let id = ProfileId::new();
        assert!(store.load(id).expect("load").is_none());

        record_session(&store, id, "Ada", &summary(4, 2)).expect("record");
        let reopened = JsonFileProfileStore::open(store.dir()).expect("reopen");
        let loaded = reopened.load(id).expect("load").expect("exists");
        assert_eq!(loaded.total_targets_found, 4);
        assert_eq!(loaded.best_star_rating, Some(StarRating::Two));
    }

    #[test]
    fn corrupt_profile_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileProfileStore::open(dir.path()).expect("open");
        let id = ProfileId::new();
        std::fs::write(dir.path().join(format!("{id}.json")), b"{not json").expect("write");
        assert!(matches!(store.load(id), Err(MindsetError::Profile(_))));
    }
}
