use roster_store::migrate::latest_version;
use roster_store::Store;
use tempfile::TempDir;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version before"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM roster_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, latest_version());
    assert_eq!(store.schema_version().expect("version"), latest_version());
}

#[test]
fn newer_database_is_rejected() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE roster_schema SET version = 99;", [])
        .expect("bump version");

    let err = store.migrate().expect_err("newer schema");
    assert!(err.to_string().contains("newer than available migrations"));
}

#[test]
fn file_database_persists_across_close() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("roster.sqlite3");

    let store = Store::open(&path).expect("open");
    store.migrate().expect("migrate");
    store.close().expect("close");

    let reopened = Store::open(&path).expect("reopen");
    assert_eq!(reopened.schema_version().expect("version"), latest_version());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
