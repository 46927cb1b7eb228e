use crate::error::Result;
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::Path;

const BUSY_TIMEOUT_MS: i64 = 2_000;

// The server and one-off CLI imports may share the file.
const WRITER_PRAGMAS: [(&str, &str); 3] = [
    ("foreign_keys", "ON"),
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
];

pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    make_private(path)?;
    configure_writer(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_writer(&conn)?;
    Ok(conn)
}

/// Opens a database we only read from, leaving its mode and journal alone.
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(path, flags)?;
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
    Ok(conn)
}

fn configure_writer(conn: &Connection) -> Result<()> {
    for (name, value) in WRITER_PRAGMAS {
        conn.pragma_update(None, name, value)?;
    }
    conn.pragma_update(None, "busy_timeout", BUSY_TIMEOUT_MS)?;
    Ok(())
}

/// Participant data is personal; keep the file owner-only.
#[cfg(unix)]
fn make_private(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn make_private(_path: &Path) -> Result<()> {
    Ok(())
}
