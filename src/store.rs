//! The measurement record log.
//!
//! An append-only JSON Lines file: one sealed conversion record per line.
//! Loading tolerates unparseable lines (a half-written or corrupted line is
//! skipped with a warning, never an error), so a damaged log degrades to
//! whatever records still parse.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::crypto::{RecordCipher, SealedBox};
use crate::error::Error;

/// One stored conversion: sealed input, sealed output, and when it happened.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredRecord {
    /// Unix timestamp (seconds) of the conversion.
    pub recorded_at: u64,
    /// The sealed raw input string.
    pub input: SealedBox,
    /// The sealed JSON-encoded package totals.
    pub output: SealedBox,
}

/// A record after decryption, as returned by the history API.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecryptedRecord {
    pub input: String,
    pub output: Vec<u64>,
}

impl StoredRecord {
    /// Seals one conversion with `cipher`, timestamped now.
    pub fn seal(cipher: &RecordCipher, input: &str, totals: &[u64]) -> Result<Self, Error> {
        let output_json = serde_json::to_vec(totals)?;
        Ok(StoredRecord {
            recorded_at: unix_now(),
            input: cipher.seal(input.as_bytes())?,
            output: cipher.seal(&output_json)?,
        })
    }

    /// Opens both payloads back into plain form.
    pub fn decrypt(&self, cipher: &RecordCipher) -> Result<DecryptedRecord, Error> {
        let input = String::from_utf8(cipher.open(&self.input)?)
            .map_err(|_| Error::Crypto("decrypted input is not valid UTF-8".to_string()))?;
        let output = serde_json::from_slice(&cipher.open(&self.output)?)?;
        Ok(DecryptedRecord { input, output })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Append-only store of sealed conversion records.
pub struct MeasurementStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MeasurementStore {
    /// Opens a store at `path`. The file is created lazily on first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        MeasurementStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single JSON line.
    pub fn append(&self, record: &StoredRecord) -> Result<(), Error> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        // A poisoned lock only means another append panicked mid-write;
        // the file is still append-safe.
        let guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        drop(guard);
        Ok(())
    }

    /// Reads every stored record, skipping lines that fail to parse.
    pub fn load(&self) -> Result<Vec<StoredRecord>, Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(line = number + 1, %err, "skipping corrupt record line");
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MeasurementStore {
        MeasurementStore::open(dir.path().join("measurements.jsonl"))
    }

    #[test]
    fn empty_store_loads_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load().unwrap(), Vec::new());
    }

    #[test]
    fn append_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let cipher = RecordCipher::generate();

        let first = StoredRecord::seal(&cipher, "abbcc", &[2, 6]).unwrap();
        let second = StoredRecord::seal(&cipher, "a", &[1]).unwrap();
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn corrupt_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let cipher = RecordCipher::generate();

        let record = StoredRecord::seal(&cipher, "dz", &[30]).unwrap();
        store.append(&record).unwrap();
        let mut content = fs::read_to_string(store.path()).unwrap();
        content.push_str("{not json\n");
        content.push('\n');
        fs::write(store.path(), content).unwrap();
        store.append(&record).unwrap();

        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn sealed_record_round_trips_through_the_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let cipher = RecordCipher::generate();

        let record = StoredRecord::seal(&cipher, "za_", &[27]).unwrap();
        store.append(&record).unwrap();

        let loaded = store.load().unwrap();
        let decrypted = loaded[0].decrypt(&cipher).unwrap();
        assert_eq!(
            decrypted,
            DecryptedRecord {
                input: "za_".to_string(),
                output: vec![27],
            }
        );
    }
}
