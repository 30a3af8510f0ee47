//! Saved-deal persistence.
//!
//! Calculators never touch storage; callers save a deal's inputs and results
//! as opaque JSON through a [`DealStore`].

mod json_file;
mod memory;

pub use json_file::JsonFileDealStore;
pub use memory::MemoryDealStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::RealtyCalcResult;

/// Which calculator produced a saved deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealType {
    Wholesale,
    CreativeFinancing,
    Mortgage,
    Apartment,
    Multifamily,
    Rental,
    Tax,
    Comparison,
}

impl DealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::Wholesale => "wholesale",
            DealType::CreativeFinancing => "creative-financing",
            DealType::Mortgage => "mortgage",
            DealType::Apartment => "apartment",
            DealType::Multifamily => "multifamily",
            DealType::Rental => "rental",
            DealType::Tax => "tax",
            DealType::Comparison => "comparison",
        }
    }
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDeal {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub deal_type: DealType,
    pub name: String,
    pub date: DateTime<Utc>,
    pub inputs: serde_json::Value,
    pub results: serde_json::Value,
}

impl SavedDeal {
    /// New deal with a fresh id, stamped now.
    pub fn new(
        deal_type: DealType,
        name: impl Into<String>,
        inputs: serde_json::Value,
        results: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            deal_type,
            name: name.into(),
            date: Utc::now(),
            inputs,
            results,
        }
    }
}

/// Storage for saved deals.
pub trait DealStore {
    /// Insert, or replace the deal with the same id.
    fn save(&mut self, deal: SavedDeal) -> RealtyCalcResult<()>;
    fn load(&self, id: Uuid) -> RealtyCalcResult<SavedDeal>;
    /// Newest first.
    fn list(&self) -> RealtyCalcResult<Vec<SavedDeal>>;
    fn delete(&mut self, id: Uuid) -> RealtyCalcResult<()>;
}

/// Saved deals of one type, newest first.
pub fn list_by_type(
    store: &dyn DealStore,
    deal_type: DealType,
) -> RealtyCalcResult<Vec<SavedDeal>> {
    Ok(store
        .list()?
        .into_iter()
        .filter(|d| d.deal_type == deal_type)
        .collect())
}

pub(crate) fn sort_newest_first(deals: &mut [SavedDeal]) {
    deals.sort_by(|a, b| b.date.cmp(&a.date));
}

pub(crate) fn upsert(deals: &mut Vec<SavedDeal>, deal: SavedDeal) {
    match deals.iter_mut().find(|d| d.id == deal.id) {
        Some(existing) => *existing = deal,
        None => deals.push(deal),
    }
}
