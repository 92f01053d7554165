//! Catalog snapshot storage
//!
//! This module persists the last fetched catalog per profile in the system's
//! standard cache directory, so the catalog can be browsed without a fresh
//! download. Snapshots are stored as JSON in the server's wire format.

use crate::catalog::{CatalogStore, Collection, MediaDataPayload, MediaItem, WatchMetadata};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while storing or loading profile snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The platform reports no cache directory for this user
    #[error("No cache directory available to hold catalog snapshots")]
    NoCacheDirectory,

    /// The snapshot directory cannot be created
    #[error("Cannot prepare snapshot directory {path}: {source}")]
    Unwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The profile has a snapshot file that cannot be read
    #[error("Cannot read snapshot of profile '{profile}' at {path}: {source}")]
    Unreadable {
        profile: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The profile's snapshot file exists but is not a valid snapshot
    #[error("Snapshot of profile '{profile}' at {path} is corrupt: {source}")]
    Corrupt {
        profile: String,
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The snapshot could not be written or moved into place
    #[error("Cannot save snapshot of profile '{profile}' to {path}: {source}")]
    SaveFailed {
        profile: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The catalog could not be encoded as a snapshot
    #[error("Cannot encode snapshot of profile '{profile}': {source}")]
    Encoding {
        profile: String,
        source: serde_json::Error,
    },
}

/// Everything the navigator needs to browse offline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(rename = "mediaMetadata", default)]
    pub media_metadata: Vec<WatchMetadata>,
}

impl CatalogSnapshot {
    /// Captures the current contents of a catalog store
    pub fn capture(catalog: &CatalogStore) -> Self {
        let mut media_metadata: Vec<WatchMetadata> =
            catalog.metadata().values().cloned().collect();
        media_metadata.sort_by(|a, b| a.media_id.cmp(&b.media_id));

        Self {
            collections: catalog.collections().to_vec(),
            media: catalog.media().to_vec(),
            media_metadata,
        }
    }

    /// Splits the snapshot into the two payloads the navigator consumes
    pub fn into_parts(self) -> (MediaDataPayload, Vec<WatchMetadata>) {
        (
            MediaDataPayload {
                collections: self.collections,
                media: self.media,
            },
            self.media_metadata,
        )
    }
}

/// Per-profile catalog snapshots on disk
pub struct SnapshotStorage {
    /// The directory where snapshots are stored
    snapshot_dir: PathBuf,
}

impl SnapshotStorage {
    /// Opens the snapshot storage in the platform cache directory
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use catalog_navigator::SnapshotStorage;
    ///
    /// let storage = SnapshotStorage::open().unwrap();
    /// if let Some(snapshot) = storage.load("living-room").unwrap() {
    ///     println!("{} media items cached", snapshot.media.len());
    /// }
    /// ```
    pub fn open() -> Result<Self, SnapshotError> {
        let proj_dirs = directories::ProjectDirs::from("org", "catalog-navigator", "catalog-navigator")
            .ok_or(SnapshotError::NoCacheDirectory)?;
        Self::open_at(proj_dirs.cache_dir().join("snapshots"))
    }

    /// Opens the snapshot storage in an explicit directory, creating it if needed
    pub fn open_at<P>(dir: P) -> Result<Self, SnapshotError>
    where
        P: Into<PathBuf>,
    {
        let snapshot_dir = dir.into();
        fs::create_dir_all(&snapshot_dir).map_err(|source| SnapshotError::Unwritable {
            path: snapshot_dir.clone(),
            source,
        })?;

        Ok(Self { snapshot_dir })
    }

    /// Loads the snapshot of a profile
    ///
    /// # Arguments
    ///
    /// * `profile` - Free-text profile name, mapped to a file name internally
    ///
    /// # Returns
    ///
    /// `None` if no snapshot was stored for the profile yet. An error if a
    /// snapshot exists but cannot be read or is corrupt.
    pub fn load(&self, profile: &str) -> Result<Option<CatalogSnapshot>, SnapshotError> {
        let file_path = self.file_path(profile);

        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path).map_err(|source| SnapshotError::Unreadable {
            profile: profile.to_string(),
            path: file_path.clone(),
            source,
        })?;

        let snapshot = serde_json::from_str(&content).map_err(|source| SnapshotError::Corrupt {
            profile: profile.to_string(),
            path: file_path.clone(),
            source,
        })?;

        debug!(profile, path = %file_path.display(), "Loaded catalog snapshot");
        Ok(Some(snapshot))
    }

    /// Stores the snapshot of a profile, replacing any previous one
    ///
    /// The file is written next to its destination under a unique name and
    /// then renamed, so readers never see a partial snapshot.
    ///
    /// # Arguments
    ///
    /// * `profile` - Free-text profile name
    /// * `snapshot` - The catalog to persist, usually from `CatalogSnapshot::capture`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use catalog_navigator::{CatalogSnapshot, Navigator, SnapshotStorage};
    ///
    /// let navigator = Navigator::new();
    /// let storage = SnapshotStorage::open().unwrap();
    /// storage
    ///     .store("living-room", &CatalogSnapshot::capture(navigator.catalog()))
    ///     .unwrap();
    /// ```
    pub fn store(&self, profile: &str, snapshot: &CatalogSnapshot) -> Result<(), SnapshotError> {
        let file_path = self.file_path(profile);
        let temp_path = self
            .snapshot_dir
            .join(format!(".{}.tmp", ulid::Ulid::new()));

        let content =
            serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Encoding {
                profile: profile.to_string(),
                source,
            })?;

        fs::write(&temp_path, content).map_err(|source| SnapshotError::SaveFailed {
            profile: profile.to_string(),
            path: temp_path.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&temp_path, &file_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(SnapshotError::SaveFailed {
                profile: profile.to_string(),
                path: file_path,
                source,
            });
        }

        debug!(profile, path = %file_path.display(), "Stored catalog snapshot");
        Ok(())
    }

    /// Returns the path to the snapshot directory
    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    fn file_path(&self, profile: &str) -> PathBuf {
        self.snapshot_dir
            .join(format!("{}.json", profile_file_stem(profile)))
    }
}

/// File stem a profile's snapshot is stored under
///
/// Profile names are free text. Runs of characters outside ASCII letters,
/// digits, `-` and `_` collapse into a single `_`, letters are lowercased,
/// and a name with nothing usable left maps to `default`.
fn profile_file_stem(profile: &str) -> String {
    let mut stem = String::with_capacity(profile.len());
    for c in profile.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "default".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CollectionType, Genres, MediaType};

    fn temp_storage() -> SnapshotStorage {
        let dir = std::env::temp_dir().join(format!("catalog-navigator-{}", ulid::Ulid::new()));
        SnapshotStorage::open_at(dir).unwrap()
    }

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot {
            collections: vec![Collection {
                id: "C1".to_string(),
                collection_title: "Dark".to_string(),
                collection_type: CollectionType::Serie,
                genres: Genres::new(["Drama", "Mystery"]),
                ..Collection::default()
            }],
            media: vec![MediaItem {
                id: "E1".to_string(),
                media_type: MediaType::Episode,
                collection_id: Some("C1".to_string()),
                season: 1,
                episode: 1,
                ..MediaItem::default()
            }],
            media_metadata: vec![WatchMetadata {
                media_id: "E1".to_string(),
                percentage_watched: 0.4,
                language_chosen: "de".to_string(),
                subtitles_chosen: String::new(),
            }],
        }
    }

    #[test]
    fn test_profile_file_stem() {
        assert_eq!(profile_file_stem("Living Room"), "living_room");
        assert_eq!(profile_file_stem("kids-tv"), "kids-tv");
        assert_eq!(profile_file_stem("../etc"), "etc");
        assert_eq!(profile_file_stem("Dad's  TV!"), "dad_s_tv");
        assert_eq!(profile_file_stem("  ***  "), "default");
    }

    #[test]
    fn test_load_missing_profile() {
        let storage = temp_storage();
        assert!(storage.load("nobody").unwrap().is_none());
        fs::remove_dir_all(storage.snapshot_dir()).ok();
    }

    #[test]
    fn test_store_then_load() {
        let storage = temp_storage();
        let original = snapshot();

        storage.store("Living Room", &original).unwrap();
        let loaded = storage.load("Living Room").unwrap();

        assert_eq!(loaded, Some(original));
        let leftovers = fs::read_dir(storage.snapshot_dir())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        fs::remove_dir_all(storage.snapshot_dir()).ok();
    }

    #[test]
    fn test_load_corrupt_snapshot() {
        let storage = temp_storage();
        fs::write(storage.snapshot_dir().join("broken.json"), "{not json").unwrap();

        let result = storage.load("broken");
        assert!(matches!(
            result,
            Err(SnapshotError::Corrupt { ref profile, .. }) if profile == "broken"
        ));

        fs::remove_dir_all(storage.snapshot_dir()).ok();
    }

    #[test]
    fn test_capture_sorts_metadata() {
        let mut catalog = CatalogStore::new();
        catalog.merge_metadata(["b", "a"].map(|id| WatchMetadata {
            media_id: id.to_string(),
            ..WatchMetadata::default()
        }));

        let captured = CatalogSnapshot::capture(&catalog);
        let ids: Vec<&str> = captured
            .media_metadata
            .iter()
            .map(|m| m.media_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
