use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{sort_newest_first, upsert, DealStore, SavedDeal};
use crate::error::RealtyCalcError;
use crate::RealtyCalcResult;

/// All deals as one JSON array in a single file.
///
/// A missing file reads as an empty store. Writes go to a sibling temp file
/// and are renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileDealStore {
    path: PathBuf,
}

impl JsonFileDealStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RealtyCalcResult<Vec<SavedDeal>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            RealtyCalcError::Storage(format!(
                "failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_all(&self, deals: &[SavedDeal]) -> RealtyCalcResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            serde_json::to_writer_pretty(&mut writer, deals)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;
        tracing::debug!(count = deals.len(), path = %self.path.display(), "wrote deal store");
        Ok(())
    }
}

impl DealStore for JsonFileDealStore {
    fn save(&mut self, deal: SavedDeal) -> RealtyCalcResult<()> {
        let mut deals = self.read_all()?;
        tracing::info!(id = %deal.id, name = %deal.name, deal_type = %deal.deal_type, "saving deal");
        upsert(&mut deals, deal);
        self.write_all(&deals)
    }

    fn load(&self, id: Uuid) -> RealtyCalcResult<SavedDeal> {
        self.read_all()?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| RealtyCalcError::NotFound(format!("deal {id}")))
    }

    fn list(&self) -> RealtyCalcResult<Vec<SavedDeal>> {
        let mut deals = self.read_all()?;
        sort_newest_first(&mut deals);
        Ok(deals)
    }

    fn delete(&mut self, id: Uuid) -> RealtyCalcResult<()> {
        let mut deals = self.read_all()?;
        let before = deals.len();
        deals.retain(|d| d.id != id);
        if deals.len() == before {
            return Err(RealtyCalcError::NotFound(format!("deal {id}")));
        }
        tracing::info!(%id, "deleted deal");
        self.write_all(&deals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DealType;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileDealStore {
        JsonFileDealStore::new(dir.path().join("deals.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).list().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let deal = SavedDeal::new(
            DealType::Wholesale,
            "Pine Ave flip",
            json!({"arv": "250000"}),
            json!({"preferred_offer": "135000"}),
        );
        let id = deal.id;
        store.save(deal.clone()).unwrap();

        // a second handle sees the same data
        let reopened = store_in(&dir);
        assert_eq!(reopened.load(id).unwrap(), deal);

        let raw = fs::read_to_string(reopened.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_array());
        assert!(!dir.path().join("deals.json.tmp").exists());
    }

    #[test]
    fn test_delete_and_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let deal = SavedDeal::new(DealType::Rental, "x", json!({}), json!({}));
        let id = deal.id;
        store.save(deal).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(store.load(id), Err(RealtyCalcError::NotFound(_))));
        assert!(matches!(store.delete(id), Err(RealtyCalcError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.list(), Err(RealtyCalcError::Storage(_))));
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileDealStore::new(dir.path().join("nested/deals.json"));
        store
            .save(SavedDeal::new(DealType::Tax, "t", json!({}), json!({})))
            .unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
