use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

fn temp_state_dir() -> PathBuf {
    std::env::temp_dir().join(format!("ledger-chat-test-{}", Uuid::new_v4()))
}

/// Store whose every operation fails, like a locked-down profile.
struct BrokenStore {
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl BrokenStore {
    fn new() -> Self {
        Self { reads: AtomicUsize::new(0), writes: AtomicUsize::new(0) }
    }
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Io(std::io::Error::other("denied")))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Io(std::io::Error::other("denied")))
    }
}

// =============================================================
// new_session_id
// =============================================================

#[test]
fn new_session_id_is_prefixed_uuid() {
    let id = new_session_id();
    let raw = id.strip_prefix("session-").unwrap();
    assert!(Uuid::parse_str(raw).is_ok());
    assert_ne!(id, new_session_id());
}

// =============================================================
// SessionIdentity over MemoryStore
// =============================================================

#[test]
fn repeated_calls_return_same_id() {
    let identity = SessionIdentity::new(MemoryStore::new());
    let first = identity.get_or_create_session_id();
    let second = identity.get_or_create_session_id();
    assert_eq!(first, second);
    assert!(first.starts_with("session-"));
}

#[test]
fn id_is_persisted_under_session_key() {
    let store = Arc::new(MemoryStore::new());
    let identity = SessionIdentity::new(Arc::clone(&store));
    let id = identity.get_or_create_session_id();
    assert_eq!(store.get(SESSION_KEY).unwrap(), Some(id));
}

#[test]
fn existing_id_is_reused() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, "session-existing").unwrap();
    let identity = SessionIdentity::new(Arc::clone(&store));
    assert_eq!(identity.get_or_create_session_id(), "session-existing");
}

#[test]
fn blank_stored_value_is_replaced() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, "   ").unwrap();
    let identity = SessionIdentity::new(Arc::clone(&store));
    let id = identity.get_or_create_session_id();
    assert!(id.starts_with("session-"));
    assert_eq!(store.get(SESSION_KEY).unwrap(), Some(id));
}

#[test]
fn second_provider_on_same_store_sees_same_id() {
    let store = Arc::new(MemoryStore::new());
    let first = SessionIdentity::new(Arc::clone(&store)).get_or_create_session_id();
    let second = SessionIdentity::new(Arc::clone(&store)).get_or_create_session_id();
    assert_eq!(first, second);
}

// =============================================================
// Storage failures degrade to memory
// =============================================================

#[test]
fn broken_store_still_yields_stable_id() {
    let store = Arc::new(BrokenStore::new());
    let identity = SessionIdentity::new(Arc::clone(&store));
    let first = identity.get_or_create_session_id();
    let second = identity.get_or_create_session_id();
    assert_eq!(first, second);
    assert!(first.starts_with("session-"));
    // Resolved once, then served from the cache.
    assert_eq!(store.reads.load(Ordering::SeqCst), 1);
    assert_eq!(store.writes.load(Ordering::SeqCst), 1);
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn file_store_missing_file_reads_none() {
    let store = FileStore::new(temp_state_dir());
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn file_store_creates_directory_and_round_trips() {
    let dir = temp_state_dir();
    let store = FileStore::new(&dir);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    assert!(store.path().exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_survives_new_provider() {
    let dir = temp_state_dir();
    let first = SessionIdentity::new(FileStore::new(&dir)).get_or_create_session_id();
    let second = SessionIdentity::new(FileStore::new(&dir)).get_or_create_session_id();
    assert_eq!(first, second);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_corrupt_file_is_an_error() {
    let dir = temp_state_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let store = FileStore::new(&dir);
    std::fs::write(store.path(), "not json").unwrap();
    assert!(matches!(store.get(SESSION_KEY), Err(StorageError::Corrupt(_))));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn file_store_set_replaces_corrupt_file() {
    let dir = temp_state_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let store = FileStore::new(&dir);
    std::fs::write(store.path(), "{ truncated").unwrap();

    store.set(SESSION_KEY, "session-fresh").unwrap();
    assert_eq!(store.get(SESSION_KEY).unwrap().as_deref(), Some("session-fresh"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn corrupt_file_heals_and_id_stays_stable_across_providers() {
    let dir = temp_state_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(STORE_FILE_NAME), "{ truncated").unwrap();

    let first = SessionIdentity::new(FileStore::new(&dir)).get_or_create_session_id();
    let second = SessionIdentity::new(FileStore::new(&dir)).get_or_create_session_id();

    assert!(first.starts_with("session-"));
    assert_eq!(first, second);
    let text = std::fs::read_to_string(dir.join(STORE_FILE_NAME)).unwrap();
    assert!(text.contains(&first));
    let _ = std::fs::remove_dir_all(dir);
}
