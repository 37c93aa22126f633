//! Scene files on the local disk.

use super::{Storage, StorageError, StorageResult, snapshot};
use crate::shapes::Shape;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One `<key>.json` file per scene in a base directory.
///
/// Keys are escaped into file names reversibly, so distinct keys never share
/// a file and [`list`](Storage::list) returns the keys as they were saved.
/// Keys differing only in letter case still collide on case-insensitive
/// file systems.
///
/// Saves write a uniquely named temporary file and rename it over the old
/// scene, so an interrupted save leaves the previous scene readable.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open `base_path`, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        fs::create_dir_all(&base_path)
            .map_err(|e| io_error("create scene directory", &base_path, e))?;
        Ok(Self { base_path })
    }

    /// The per-user data directory, e.g. `~/.local/share/inkmark/scenes/` on
    /// Linux or `%LOCALAPPDATA%\inkmark\scenes\` on Windows.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("No data or home directory for this user".to_string()))?;
        Self::new(base.join("inkmark").join("scenes"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn scene_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_key(key)))
    }
}

/// Escape character for bytes outside the file-name-safe set.
const ESCAPE: u8 = b'~';

/// Keep `[A-Za-z0-9_-]` and write every other byte as `~XX` (uppercase hex).
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(char::from(byte));
        } else {
            name.push(char::from(ESCAPE));
            name.push_str(&format!("{byte:02X}"));
        }
    }
    name
}

/// Inverse of [`encode_key`]. `None` for names this backend did not write.
fn decode_key(name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(name.len());
    let mut rest = name.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == ESCAPE {
            let (&hi, tail) = tail.split_first()?;
            let (&lo, tail) = tail.split_first()?;
            bytes.push((upper_hex(hi)? << 4) | upper_hex(lo)?);
            rest = tail;
        } else if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            bytes.push(byte);
            rest = tail;
        } else {
            return None;
        }
    }
    String::from_utf8(bytes).ok()
}

fn upper_hex(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn io_error(action: &str, path: &Path, e: io::Error) -> StorageError {
    StorageError::Io(format!("Failed to {action} {}: {e}", path.display()))
}

impl Storage for FileStorage {
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()> {
        let json = snapshot::to_json(shapes)?;
        let path = self.scene_path(key);
        let staging = self
            .base_path
            .join(format!("{}.{}.tmp", encode_key(key), Uuid::new_v4()));

        fs::write(&staging, json).map_err(|e| io_error("write", &staging, e))?;
        fs::rename(&staging, &path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            io_error("replace", &path, e)
        })
    }

    fn load(&self, key: &str) -> StorageResult<Vec<Shape>> {
        let path = self.scene_path(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(e) => return Err(io_error("read", &path, e)),
        };
        snapshot::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("{} is not a scene: {e}", path.display()))
        })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.scene_path(key);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(io_error("delete", &path, e)),
            _ => Ok(()),
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list", &self.base_path, e)),
        };

        Ok(entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).and_then(decode_key))
            .collect())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.scene_path(key).is_file())
    }
}
