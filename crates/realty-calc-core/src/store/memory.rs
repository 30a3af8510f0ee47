use uuid::Uuid;

use super::{sort_newest_first, upsert, DealStore, SavedDeal};
use crate::error::RealtyCalcError;
use crate::RealtyCalcResult;

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryDealStore {
    deals: Vec<SavedDeal>,
}

impl DealStore for MemoryDealStore {
    fn save(&mut self, deal: SavedDeal) -> RealtyCalcResult<()> {
        upsert(&mut self.deals, deal);
        Ok(())
    }

    fn load(&self, id: Uuid) -> RealtyCalcResult<SavedDeal> {
        self.deals
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| RealtyCalcError::NotFound(format!("deal {id}")))
    }

    fn list(&self) -> RealtyCalcResult<Vec<SavedDeal>> {
        let mut deals = self.deals.clone();
        sort_newest_first(&mut deals);
        Ok(deals)
    }

    fn delete(&mut self, id: Uuid) -> RealtyCalcResult<()> {
        let before = self.deals.len();
        self.deals.retain(|d| d.id != id);
        if self.deals.len() == before {
            return Err(RealtyCalcError::NotFound(format!("deal {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DealType;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[test]
    fn test_save_load_delete() {
        let mut store = MemoryDealStore::default();
        let deal = SavedDeal::new(DealType::Rental, "Maple", json!({"rent": "1800"}), json!({}));
        let id = deal.id;
        store.save(deal.clone()).unwrap();
        assert_eq!(store.load(id).unwrap(), deal);
        store.delete(id).unwrap();
        assert!(matches!(store.load(id), Err(RealtyCalcError::NotFound(_))));
        assert!(store.delete(id).is_err());
    }

    #[test]
    fn test_save_upserts() {
        let mut store = MemoryDealStore::default();
        let mut deal = SavedDeal::new(DealType::Mortgage, "first", json!({}), json!({}));
        store.save(deal.clone()).unwrap();
        deal.name = "renamed".into();
        store.save(deal.clone()).unwrap();
        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "renamed");
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = MemoryDealStore::default();
        let mut old = SavedDeal::new(DealType::Tax, "old", json!({}), json!({}));
        old.date = Utc::now() - Duration::days(3);
        let new = SavedDeal::new(DealType::Tax, "new", json!({}), json!({}));
        store.save(old).unwrap();
        store.save(new).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["new".to_string(), "old".to_string()]);
    }
}
