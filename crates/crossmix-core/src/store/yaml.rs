//! File-backed mix store
//!
//! The whole store is one YAML document, loaded on open and rewritten
//! after every mutation. Fine for a personal library of mixes; not meant
//! for concurrent writers.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{MixStore, NewMix, SavedMix, StoreError, StoreResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    mixes: Vec<SavedMix>,
}

/// Mix store persisted to a single YAML file
#[derive(Debug)]
pub struct YamlMixStore {
    path: PathBuf,
    data: StoreFile,
}

impl YamlMixStore {
    /// Open a store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents)?
        } else {
            log::info!("YamlMixStore: {:?} doesn't exist, starting empty", path);
            StoreFile::default()
        };

        log::info!("YamlMixStore: opened {:?} ({} mixes)", path, data.mixes.len());
        Ok(Self { path, data })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored mixes
    pub fn len(&self) -> usize {
        self.data.mixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.mixes.is_empty()
    }

    /// Apply `change` to a copy of the document and keep it only once written
    ///
    /// A failed write leaves both the file and the in-memory document as
    /// they were.
    fn commit<T, F>(&mut self, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut StoreFile) -> StoreResult<T>,
    {
        let mut next = self.data.clone();
        let value = change(&mut next)?;
        write_file(&self.path, &next)?;
        self.data = next;
        Ok(value)
    }

    fn sorted_by<F>(&self, limit: usize, mut compare: F) -> Vec<SavedMix>
    where
        F: FnMut(&SavedMix, &SavedMix) -> std::cmp::Ordering,
    {
        let mut mixes = self.data.mixes.clone();
        mixes.sort_by(|a, b| compare(a, b));
        mixes.truncate(limit);
        mixes
    }
}

fn write_file(path: &Path, data: &StoreFile) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

fn find_mut(data: &mut StoreFile, id: u64) -> StoreResult<&mut SavedMix> {
    data.mixes
        .iter_mut()
        .find(|mix| mix.id == id)
        .ok_or(StoreError::NotFound(id))
}

impl MixStore for YamlMixStore {
    fn create(&mut self, mix: NewMix) -> StoreResult<SavedMix> {
        if mix.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let saved = self.commit(|data| {
            // Ids start at 1 and are never reused
            let id = data.next_id.max(1);
            data.next_id = id + 1;
            let saved = SavedMix::from_new(mix, id, Utc::now());
            data.mixes.push(saved.clone());
            Ok(saved)
        })?;

        log::info!("YamlMixStore: saved mix {} \"{}\"", saved.id, saved.title);
        Ok(saved)
    }

    fn get(&self, id: u64) -> StoreResult<SavedMix> {
        self.data
            .mixes
            .iter()
            .find(|mix| mix.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list_recent(&self, limit: usize) -> StoreResult<Vec<SavedMix>> {
        Ok(self.sorted_by(limit, |a, b| {
            b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
        }))
    }

    fn list_most_liked(&self, limit: usize) -> StoreResult<Vec<SavedMix>> {
        Ok(self.sorted_by(limit, |a, b| {
            b.like_count
                .cmp(&a.like_count)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        }))
    }

    fn delete(&mut self, id: u64) -> StoreResult<()> {
        self.commit(|data| {
            let before = data.mixes.len();
            data.mixes.retain(|mix| mix.id != id);
            if data.mixes.len() == before {
                return Err(StoreError::NotFound(id));
            }
            Ok(())
        })?;
        log::info!("YamlMixStore: deleted mix {}", id);
        Ok(())
    }

    fn increment_views(&mut self, id: u64) -> StoreResult<u64> {
        self.commit(|data| {
            let mix = find_mut(data, id)?;
            mix.view_count += 1;
            Ok(mix.view_count)
        })
    }

    fn increment_likes(&mut self, id: u64) -> StoreResult<u64> {
        self.commit(|data| {
            let mix = find_mut(data, id)?;
            mix.like_count += 1;
            Ok(mix.like_count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SlotRecord;
    use tempfile::TempDir;

    fn new_mix(title: &str) -> NewMix {
        NewMix {
            title: title.to_string(),
            owner: 1,
            slot_a: SlotRecord {
                source_id: "dQw4w9WgXcQ".to_string(),
                title: Some("Never Gonna Give You Up".to_string()),
                channel_title: Some("Rick Astley".to_string()),
            },
            slot_b: SlotRecord {
                source_id: "y6120QOlsfU".to_string(),
                title: None,
                channel_title: None,
            },
            video_fader: 60,
            audio_fader: 40,
            template: "split".to_string(),
        }
    }

    fn open_temp() -> (TempDir, YamlMixStore) {
        let dir = TempDir::new().unwrap();
        let store = YamlMixStore::open(dir.path().join("nested").join("mixes.yaml")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_assigns_ids_and_persists() {
        let (_dir, mut store) = open_temp();
        assert!(store.is_empty());

        let first = store.create(new_mix("First")).unwrap();
        let second = store.create(new_mix("Second")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let reopened = YamlMixStore::open(store.path()).unwrap();
        assert_eq!(reopened.len(), 2);
        let loaded = reopened.get(1).unwrap();
        assert_eq!(loaded.title, "First");
        assert_eq!(loaded.video_fader, 60);
        assert_eq!(loaded.audio_fader, Some(40));
        assert_eq!(loaded.slot_b.title, None);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let (_dir, mut store) = open_temp();
        store.create(new_mix("One")).unwrap();
        let two = store.create(new_mix("Two")).unwrap();
        store.delete(two.id).unwrap();

        let three = store.create(new_mix("Three")).unwrap();
        assert_eq!(three.id, 3);
        assert!(matches!(store.get(2), Err(StoreError::NotFound(2))));
        assert!(matches!(store.delete(2), Err(StoreError::NotFound(2))));
    }

    #[test]
    fn test_counters() {
        let (_dir, mut store) = open_temp();
        let mix = store.create(new_mix("Counted")).unwrap();

        assert_eq!(store.increment_views(mix.id).unwrap(), 1);
        assert_eq!(store.increment_views(mix.id).unwrap(), 2);
        assert_eq!(store.increment_likes(mix.id).unwrap(), 1);
        assert!(matches!(store.increment_likes(99), Err(StoreError::NotFound(99))));

        let reopened = YamlMixStore::open(store.path()).unwrap();
        let loaded = reopened.get(mix.id).unwrap();
        assert_eq!((loaded.view_count, loaded.like_count), (2, 1));
    }

    #[test]
    fn test_listings_ordered_and_limited() {
        let (_dir, mut store) = open_temp();
        let a = store.create(new_mix("A")).unwrap();
        let b = store.create(new_mix("B")).unwrap();
        let c = store.create(new_mix("C")).unwrap();
        store.increment_likes(a.id).unwrap();
        store.increment_likes(a.id).unwrap();
        store.increment_likes(b.id).unwrap();

        let recent: Vec<u64> = store.list_recent(2).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(recent, vec![c.id, b.id]);

        let liked: Vec<u64> = store.list_most_liked(10).unwrap().iter().map(|m| m.id).collect();
        assert_eq!(liked, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_blank_title_rejected() {
        let (_dir, mut store) = open_temp();
        assert!(matches!(store.create(new_mix("  ")), Err(StoreError::EmptyTitle)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let (dir, mut store) = open_temp();
        let kept = store.create(new_mix("Kept")).unwrap();

        // Make the store's directory unusable: replace it with a plain file
        let nested = dir.path().join("nested");
        std::fs::remove_dir_all(&nested).unwrap();
        std::fs::write(&nested, "not a directory").unwrap();

        assert!(matches!(store.create(new_mix("Lost")), Err(StoreError::Io(_))));
        assert_eq!(store.len(), 1);
        assert!(matches!(store.get(kept.id + 1), Err(StoreError::NotFound(_))));

        assert!(store.increment_views(kept.id).is_err());
        assert!(store.increment_likes(kept.id).is_err());
        assert!(store.delete(kept.id).is_err());
        let unchanged = store.get(kept.id).unwrap();
        assert_eq!((unchanged.view_count, unchanged.like_count), (0, 0));

        // The id that failed to save is handed out again
        std::fs::remove_file(&nested).unwrap();
        let next = store.create(new_mix("Retried")).unwrap();
        assert_eq!(next.id, kept.id + 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixes.yaml");
        std::fs::write(&path, "mixes: [not, a, mix").unwrap();
        assert!(matches!(YamlMixStore::open(&path), Err(StoreError::Format(_))));
    }
}
