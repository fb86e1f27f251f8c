//! Key-value persistence with fall-back-to-default reads.
//!
//! Values are stored as JSON strings under flat keys, one value per key.
//! [`PersistentStore`] never surfaces a storage failure to its caller: reads
//! fall back to the supplied default and writes are dropped, and in both cases
//! the failure goes to the injected [`DiagnosticSink`].

use log::error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error, PathBuf),
    /// The backing file exists but is not a JSON object of strings.
    Corrupt(serde_json::Error, PathBuf),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e, path) => write!(f, "I/O error on {}: {e}", path.display()),
            StoreError::Corrupt(e, path) => {
                write!(f, "state file {} is not valid: {e}", path.display())
            }
            StoreError::Encode(e) => write!(f, "could not encode value: {e}"),
            StoreError::Decode(e) => write!(f, "could not decode stored value: {e}"),
            StoreError::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e, _) => Some(e),
            StoreError::Corrupt(e, _) | StoreError::Encode(e) | StoreError::Decode(e) => Some(e),
            StoreError::Backend(_) => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Raw string storage, shaped like a browser's synchronous storage API.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: String) -> StoreResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// All entries in one JSON object file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Load `path`. A missing or blank file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::Io(e, path)),
        };
        let entries = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt(e, path.clone()))?
        };
        Ok(Self { path, entries })
    }

    /// A store that ignores whatever is on disk at `path` and replaces it on
    /// the first write.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), entries: BTreeMap::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e, parent.to_path_buf()))?;
        }
        let payload = serde_json::to_string_pretty(&self.entries).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, payload).map_err(|e| StoreError::Io(e, tmp.clone()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io(e, self.path.clone()))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// Receives storage failures that were recovered from.
pub trait DiagnosticSink {
    fn report(&self, key: &str, error: &StoreError);
}

/// Forwards failures to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, key: &str, error: &StoreError) {
        error!("storage failure for {key}: {error}");
    }
}

/// Keeps every report in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    reports: Arc<Mutex<Vec<(String, String)>>>,
}

impl CollectingSink {
    /// `(key, message)` pairs in the order they were reported.
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, key: &str, error: &StoreError) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((key.to_string(), error.to_string()));
        }
    }
}

// ---------------------------------------------------------------------------
// Typed adapter
// ---------------------------------------------------------------------------

pub struct PersistentStore<S, D = LogSink> {
    backend: S,
    sink: D,
}

impl<S: KeyValueStore, D: DiagnosticSink> PersistentStore<S, D> {
    pub fn new(backend: S, sink: D) -> Self {
        Self { backend, sink }
    }

    /// The decoded value under `key`, or `default` when the key is absent,
    /// blank, unreadable or does not decode as `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                self.sink.report(key, &e);
                default
            }
        }
    }

    /// Encode `value` under `key`. Failures are reported, never returned.
    pub fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.try_write(key, value) {
            self.sink.report(key, &e);
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn try_read<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.backend.get_item(key)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw).map(Some).map_err(StoreError::Decode)
    }

    fn try_write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(StoreError::Encode)?;
        self.backend.set_item(key, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Game, Selection};

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Backend("storage disabled".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: String) -> StoreResult<()> {
            Err(StoreError::Backend("quota exceeded".to_string()))
        }
    }

    fn memory() -> (PersistentStore<MemoryStore, CollectingSink>, CollectingSink) {
        let sink = CollectingSink::default();
        (PersistentStore::new(MemoryStore::new(), sink.clone()), sink)
    }

    #[test]
    fn write_then_read_returns_equal_value() {
        let (mut store, sink) = memory();
        let selections = vec![Selection { game: Game::new(2016, "FIRST Stronghold"), team: 12 }];
        store.write("selections", &selections);
        assert_eq!(store.read::<Vec<Selection>>("selections", vec![]), selections);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn null_round_trips_as_none() {
        let (mut store, _) = memory();
        store.write::<Option<u32>>("selectedTeam", &None);
        assert_eq!(store.read("selectedTeam", Some(3u32)), None);
    }

    #[test]
    fn absent_key_returns_default_silently() {
        let (store, sink) = memory();
        assert_eq!(store.read("totalTeams", 20u32), 20);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn undecodable_value_returns_default_and_reports() {
        let mut backend = MemoryStore::new();
        backend.set_item("totalTeams", "{not json".to_string()).unwrap();
        let sink = CollectingSink::default();
        let store = PersistentStore::new(backend, sink.clone());

        assert_eq!(store.read("totalTeams", 20u32), 20);
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "totalTeams");
    }

    #[test]
    fn blank_value_counts_as_absent() {
        let mut backend = MemoryStore::new();
        backend.set_item("selectedGame", String::new()).unwrap();
        let sink = CollectingSink::default();
        let store = PersistentStore::new(backend, sink.clone());
        assert_eq!(store.read::<Option<Game>>("selectedGame", None), None);
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn backend_failures_are_reported_not_raised() {
        let sink = CollectingSink::default();
        let mut store = PersistentStore::new(ReadOnlyStore, sink.clone());
        store.write("totalTeams", &5u32);
        assert_eq!(store.read("totalTeams", 9u32), 9);

        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].1.contains("quota exceeded"));
        assert!(reports[1].1.contains("storage disabled"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = PersistentStore::new(FileStore::open(&path).unwrap(), LogSink);
        store.write("availableTeams", &vec![1u32, 4, 9]);

        let reopened = PersistentStore::new(FileStore::open(&path).unwrap(), LogSink);
        assert_eq!(reopened.read::<Vec<u32>>("availableTeams", vec![]), vec![1, 4, 9]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("state.json")).unwrap();
        assert_eq!(store.get_item("selections").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_, _)));
    }

    #[test]
    fn empty_file_store_replaces_corrupt_file_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "garbage").unwrap();

        let mut store = FileStore::empty(&path);
        store.set_item("totalTeams", "8".to_string()).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("totalTeams").unwrap().as_deref(), Some("8"));
    }
}
