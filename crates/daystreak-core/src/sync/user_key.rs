// Anonymous per-installation user key.
// Format: "streak-<uuid>" -- an opaque namespace token, not an identity.

use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::storage::data_dir;

const USER_KEY_FILE: &str = "user_key.txt";
const USER_KEY_PREFIX: &str = "streak-";

/// Error type for user key operations
#[derive(Debug, thiserror::Error)]
pub enum UserKeyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid user key format: {0}")]
    InvalidFormat(String),
}

/// Get or create the user key stored under `dir`.
///
/// The key is generated once, persisted to `user_key.txt`, and reused on
/// every later call. A file with an unexpected format is rejected rather
/// than silently regenerated, since the key namespaces the remote record.
pub fn get_or_create_user_key_at(dir: &Path) -> Result<String, UserKeyError> {
    let key_path = dir.join(USER_KEY_FILE);

    if key_path.exists() {
        let key = fs::read_to_string(&key_path)?.trim().to_string();
        if !key.starts_with(USER_KEY_PREFIX) {
            return Err(UserKeyError::InvalidFormat(key));
        }
        return Ok(key);
    }

    fs::create_dir_all(dir)?;
    let key = format!("{}{}", USER_KEY_PREFIX, Uuid::new_v4());
    fs::write(&key_path, format!("{key}\n"))?;
    Ok(key)
}

/// Get or create the user key in the default data directory.
pub fn get_or_create_user_key() -> Result<String, UserKeyError> {
    let dir = data_dir().map_err(|e| {
        UserKeyError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            e.to_string(),
        ))
    })?;
    get_or_create_user_key_at(&dir)
}
