use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use crate::config::{RehabCondition, RehabTable};
use crate::types::Money;

/// One line of an itemized rehab budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehabItem {
    pub description: String,
    pub cost: Money,
}

/// Where the rehab figure used in an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RehabSource {
    SquareFootage,
    ItemizedList,
    Manual,
}

impl RehabTable {
    /// Flat estimate for a property of `square_footage` in `condition`.
    pub fn estimate(&self, square_footage: Decimal, condition: RehabCondition) -> Money {
        let band = self
            .band_limits
            .iter()
            .position(|limit| square_footage < *limit)
            .unwrap_or(self.band_limits.len());
        let costs = self.costs_for(condition);
        costs
            .get(band)
            .or_else(|| costs.last())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Sum of the itemized rehab lines.
pub fn itemized_total(items: &[RehabItem]) -> Money {
    items.iter().map(|i| i.cost).sum()
}

/// Pick the rehab cost by precedence: a square-footage estimate when a
/// footage is given, else the itemized total when positive, else the
/// manually entered figure.
pub fn resolve_rehab_cost(
    square_footage: Decimal,
    condition: RehabCondition,
    items: &[RehabItem],
    manual: Money,
    table: &RehabTable,
) -> (Money, RehabSource) {
    if square_footage > Decimal::ZERO {
        return (table.estimate(square_footage, condition), RehabSource::SquareFootage);
    }
    let itemized = itemized_total(items);
    if itemized > Decimal::ZERO {
        return (itemized, RehabSource::ItemizedList);
    }
    (manual, RehabSource::Manual)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn items() -> Vec<RehabItem> {
        vec![
            RehabItem {
                description: "Roof".into(),
                cost: dec!(8000),
            },
            RehabItem {
                description: "Kitchen".into(),
                cost: dec!(12500),
            },
        ]
    }

    #[test]
    fn test_estimate_bands() {
        let t = RehabTable::default();
        assert_eq!(t.estimate(dec!(800), RehabCondition::Easy), dec!(10000));
        assert_eq!(t.estimate(dec!(1000), RehabCondition::Easy), dec!(15000));
        assert_eq!(t.estimate(dec!(1499), RehabCondition::Medium), dec!(30000));
        assert_eq!(t.estimate(dec!(1800), RehabCondition::Bad), dec!(70000));
        assert_eq!(t.estimate(dec!(3200), RehabCondition::Bad), dec!(85000));
    }

    #[test]
    fn test_square_footage_takes_precedence() {
        let (cost, src) = resolve_rehab_cost(
            dec!(1200),
            RehabCondition::Medium,
            &items(),
            dec!(5000),
            &RehabTable::default(),
        );
        assert_eq!(cost, dec!(30000));
        assert_eq!(src, RehabSource::SquareFootage);
    }

    #[test]
    fn test_items_beat_manual() {
        let (cost, src) = resolve_rehab_cost(
            Decimal::ZERO,
            RehabCondition::Medium,
            &items(),
            dec!(5000),
            &RehabTable::default(),
        );
        assert_eq!(cost, dec!(20500));
        assert_eq!(src, RehabSource::ItemizedList);
    }

    #[test]
    fn test_manual_fallback() {
        let (cost, src) = resolve_rehab_cost(
            Decimal::ZERO,
            RehabCondition::Bad,
            &[],
            dec!(5000),
            &RehabTable::default(),
        );
        assert_eq!(cost, dec!(5000));
        assert_eq!(src, RehabSource::Manual);
    }

    #[test]
    fn test_zero_item_total_falls_through() {
        let zero = vec![RehabItem {
            description: "Paint".into(),
            cost: Decimal::ZERO,
        }];
        let (_, src) = resolve_rehab_cost(
            Decimal::ZERO,
            RehabCondition::Easy,
            &zero,
            dec!(1),
            &RehabTable::default(),
        );
        assert_eq!(src, RehabSource::Manual);
    }
}
