use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "roster";
const DB_FILENAME: &str = "roster.sqlite3";

/// `$XDG_DATA_HOME/roster`, falling back to `~/.local/share/roster`.
pub fn data_dir() -> Result<PathBuf> {
    let base = match env::var_os("XDG_DATA_HOME") {
        Some(dir) if dir.is_empty() => {
            return Err(StoreError::InvalidDataPath(PathBuf::from(dir)));
        }
        Some(dir) => PathBuf::from(dir),
        None => dirs::home_dir()
            .ok_or(StoreError::MissingHomeDir)?
            .join(".local")
            .join("share"),
    };
    Ok(base.join(APP_DIR))
}

/// Where the database lives: the explicit path when one was given,
/// otherwise `roster.sqlite3` in the data dir. Missing directories are
/// created owner-only.
pub fn resolve_db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.as_os_str().is_empty() => {
            Err(StoreError::InvalidDataPath(path.to_path_buf()))
        }
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                if !parent.exists() {
                    create_private_dir(parent)?;
                }
            }
            Ok(path.to_path_buf())
        }
        None => {
            let dir = data_dir()?;
            create_private_dir(&dir)?;
            Ok(dir.join(DB_FILENAME))
        }
    }
}

fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
