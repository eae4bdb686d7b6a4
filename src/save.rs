//! Save/load of the economy.
//!
//! ## Layout
//!
//! The record is written with bincode's fixed-width little-endian encoding:
//!
//! | bytes | field |
//! |---|---|
//! | 8 | `cookies` (f64) |
//! | 8 | number of item counts (u64) |
//! | 4 × n | item counts (i32 each, catalog order) |
//!
//! There is no magic number and no version. Anything that does not decode
//! cleanly is treated the same as having no save at all.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Upper bound for a save file; a real record is a few dozen bytes.
const MAX_SAVE_BYTES: u64 = 64 * 1024;

/// Persisted shape of the economy. No derived fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub cookies: f64,
    pub item_counts: Vec<i32>,
}

#[derive(Debug)]
pub enum SaveError {
    Io(io::Error),
    Encode(bincode::Error),
    /// The browser refused the write (quota, privacy mode, ...).
    Storage(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "save file I/O failed: {e}"),
            SaveError::Encode(e) => write!(f, "could not encode save record: {e}"),
            SaveError::Storage(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Encode(e) => Some(e),
            SaveError::Storage(_) => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bincode::Error> for SaveError {
    fn from(e: bincode::Error) -> Self {
        SaveError::Encode(e)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_SAVE_BYTES)
}

pub fn encode(record: &SaveRecord) -> Result<Vec<u8>, SaveError> {
    Ok(codec().serialize(record)?)
}

/// Decode a record, or `None` if the bytes are not exactly one record.
pub fn decode(bytes: &[u8]) -> Option<SaveRecord> {
    codec().deserialize(bytes).ok()
}

/// Somewhere to keep the encoded record between sessions.
pub trait SaveStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> Result<Option<Vec<u8>>, SaveError>;
    fn write(&self, bytes: &[u8]) -> Result<(), SaveError>;
}

/// A save file at a fixed path.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SaveError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SaveError> {
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// In-process store for headless runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    bytes: RefCell<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: RefCell::new(Some(bytes)),
        }
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SaveError> {
        Ok(self.bytes.borrow().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SaveError> {
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }
}

/// localStorage holds strings, so the record is stored hex-encoded.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| SaveError::Storage("localStorage is not available".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorageStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SaveError> {
        let text = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?;
        // Non-hex text is as good as garbage bytes: it will fail to decode.
        Ok(text.map(|t| from_hex(&t).unwrap_or_default()))
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SaveError> {
        Self::storage()?
            .set_item(&self.key, &to_hex(bytes))
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(any(target_arch = "wasm32", test))]
fn from_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.is_ascii() {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).ok())
        .collect()
}

/// Loads at startup, saves at shutdown.
pub struct Persistence<S> {
    store: S,
}

impl<S: SaveStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write `record`. One attempt; the caller decides what a failure means.
    pub fn save(&self, record: &SaveRecord) -> Result<(), SaveError> {
        let bytes = encode(record)?;
        self.store.write(&bytes)?;
        info!(
            bytes = bytes.len(),
            cookies = record.cookies,
            "game saved"
        );
        Ok(())
    }

    /// The saved record, or `None` for a fresh game.
    pub fn load(&self) -> Option<SaveRecord> {
        let bytes = match self.store.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("no save found, starting fresh");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "could not read save, starting fresh");
                return None;
            }
        };
        match decode(&bytes) {
            Some(record) => {
                info!(cookies = record.cookies, items = ?record.item_counts, "save loaded");
                Some(record)
            }
            None => {
                warn!(bytes = bytes.len(), "save is corrupt, starting fresh");
                None
            }
        }
    }
}
