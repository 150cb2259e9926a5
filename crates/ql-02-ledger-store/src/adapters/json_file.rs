//! # JSON File Persistence
//!
//! One document per ledger kind, `<dir>/my_ledger.json` and
//! `<dir>/witness_ledger.json`, shaped `{ "entries": [..], "type": 0|1 }`.
//! Writes go to a temp file that is then renamed over the target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use shared_types::{Ledger, LedgerType};
use tracing::{debug, info};

use crate::domain::LedgerError;
use crate::ports::LedgerPersistence;

pub struct JsonFileLedgerPersistence {
    dir: PathBuf,
}

impl JsonFileLedgerPersistence {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, kind: LedgerType) -> PathBuf {
        self.dir.join(format!("{}.json", kind.file_stem()))
    }
}

fn io_error(err: std::io::Error) -> LedgerError {
    LedgerError::Persistence {
        message: err.to_string(),
    }
}

impl LedgerPersistence for JsonFileLedgerPersistence {
    fn load(&self, kind: LedgerType) -> Result<Option<Ledger>, LedgerError> {
        let path = self.path_for(kind);
        if !path.exists() {
            info!("[ql-02] No existing ledger file at {}", path.display());
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(io_error)?;
        let ledger: Ledger = serde_json::from_slice(&bytes).map_err(|e| LedgerError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if ledger.kind() != kind {
            return Err(LedgerError::Corrupt {
                path: path.display().to_string(),
                message: format!("expected type {}, found {}", u8::from(kind), u8::from(ledger.kind())),
            });
        }

        info!("[ql-02] Loaded {} entries from {}", ledger.len(), path.display());
        Ok(Some(ledger))
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        let path = self.path_for(ledger.kind());
        let bytes = serde_json::to_vec_pretty(ledger).map_err(|e| LedgerError::Persistence {
            message: e.to_string(),
        })?;

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        fs::rename(&temp_path, &path).map_err(io_error)?;

        debug!("[ql-02] Wrote {} entries to {}", ledger.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, Transaction};

    fn entry(id: &str) -> Transaction {
        Transaction {
            from: Address::genesis(),
            to: Address::genesis(),
            amount: Some(40),
            timestamp: 1,
            witness_one: None,
            witness_two: None,
            partner_one: None,
            partner_two: None,
            id: Some(id.into()),
            signature: None,
            hash: None,
            local: false,
        }
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFileLedgerPersistence::new(dir.path());
        assert_eq!(persistence.load(LedgerType::Owner).unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFileLedgerPersistence::new(dir.path().join("node"));
        let mut ledger = Ledger::new(LedgerType::Witness);
        ledger.append(&entry("a")).unwrap();

        persistence.save(&ledger).unwrap();

        assert_eq!(persistence.load(LedgerType::Witness).unwrap(), Some(ledger));
        assert!(dir.path().join("node").join("witness_ledger.json").exists());
        assert!(!dir.path().join("node").join("witness_ledger.json.tmp").exists());
    }

    #[test]
    fn test_file_shape() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFileLedgerPersistence::new(dir.path());
        let mut ledger = Ledger::new(LedgerType::Owner);
        ledger.append(&entry("a")).unwrap();
        persistence.save(&ledger).unwrap();

        let raw = fs::read_to_string(dir.path().join("my_ledger.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["type"], 0);
        assert_eq!(json["entries"][0]["amount"], 40);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("my_ledger.json"), b"{oops").unwrap();
        let persistence = JsonFileLedgerPersistence::new(dir.path());

        assert!(matches!(
            persistence.load(LedgerType::Owner),
            Err(LedgerError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_mismatched_type_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("my_ledger.json"),
            br#"{"entries":[],"type":1}"#,
        )
        .unwrap();
        let persistence = JsonFileLedgerPersistence::new(dir.path());

        assert!(matches!(
            persistence.load(LedgerType::Owner),
            Err(LedgerError::Corrupt { .. })
        ));
    }
}
