//! JSON document store
//!
//! The whole account table is one pretty-printed JSON object
//! `{ "<account id>": { ...account... } }`. Decimals are written as strings,
//! so amounts round-trip without float drift.
//!
//! Saves write a sibling temp file, fsync it, then rename it over the
//! document. A failed save leaves the previous document in place.

use crate::error::{PersistenceError, PersistenceResult};
use crate::gateway::{AccountMap, PersistenceGateway};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed gateway
#[derive(Debug, Clone)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    /// # Arguments
    /// * `path` - Document path (e.g., "data/accounts.json")
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "accounts.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn check_keys(&self, accounts: &AccountMap) -> PersistenceResult<()> {
        for (key, account) in accounts {
            if *key != account.id {
                return Err(PersistenceError::invalid_document(
                    &self.path,
                    format!("entry '{}' holds account '{}'", key, account.id),
                ));
            }
        }
        Ok(())
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load_all(&self) -> PersistenceResult<AccountMap> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no store document yet, starting empty");
            return Ok(AccountMap::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let accounts: AccountMap = serde_json::from_reader(reader)?;
        self.check_keys(&accounts)?;

        debug!(path = %self.path.display(), accounts = accounts.len(), "loaded store document");
        Ok(accounts)
    }

    fn save_all(&self, accounts: &AccountMap) -> PersistenceResult<()> {
        self.check_keys(accounts)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        let result = (|| -> PersistenceResult<()> {
            let file = File::create(&temp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, accounts)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&temp, &self.path)?;
            Ok(())
        })();

        if let Err(err) = result {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }

        debug!(path = %self.path.display(), accounts = accounts.len(), "saved store document");
        Ok(())
    }
}
