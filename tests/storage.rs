use docgen_api::{
    FileTokenStorage, MemoryTokenStorage, TokenStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};

#[test]
fn storage_memory_round_trip() {
    let storage = MemoryTokenStorage::new();
    storage.set(ACCESS_TOKEN_KEY, "a-1");
    storage.set(REFRESH_TOKEN_KEY, "r-1");

    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("a-1"));
    storage.clear(ACCESS_TOKEN_KEY);
    assert_eq!(storage.get(ACCESS_TOKEN_KEY), None);
    assert_eq!(storage.get(REFRESH_TOKEN_KEY).as_deref(), Some("r-1"));
}

#[test]
fn storage_file_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tokens.json");

    {
        let storage = FileTokenStorage::new(&path);
        storage.set(ACCESS_TOKEN_KEY, "a-1");
        storage.set(REFRESH_TOKEN_KEY, "r-1");
    }

    let reopened = FileTokenStorage::new(&path);
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("a-1"));
    assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("r-1"));

    reopened.clear(ACCESS_TOKEN_KEY);
    reopened.clear(REFRESH_TOKEN_KEY);
    let reopened_again = FileTokenStorage::new(&path);
    assert_eq!(reopened_again.get(ACCESS_TOKEN_KEY), None);
}

#[test]
fn storage_file_missing_and_corrupt_files_read_as_empty() {
    let dir = tempfile::tempdir().expect("temp dir");

    let missing = FileTokenStorage::new(dir.path().join("never-written.json"));
    assert_eq!(missing.get(ACCESS_TOKEN_KEY), None);

    let corrupt_path = dir.path().join("corrupt.json");
    std::fs::write(&corrupt_path, "not json at all").expect("write corrupt file");
    let corrupt = FileTokenStorage::new(&corrupt_path);
    assert_eq!(corrupt.get(ACCESS_TOKEN_KEY), None);

    // Writes recover the store.
    corrupt.set(ACCESS_TOKEN_KEY, "a-1");
    assert_eq!(corrupt.get(ACCESS_TOKEN_KEY).as_deref(), Some("a-1"));
}

#[test]
fn storage_file_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("temp dir");
    let nested = dir.path().join("deep/nested/tokens.json");

    let storage = FileTokenStorage::new(&nested);
    storage.set(ACCESS_TOKEN_KEY, "a-1");
    assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("a-1"));
}
