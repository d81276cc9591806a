use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::money::{round_half_even, Money};
use crate::{EngineError, EngineResult};

pub const MAX_DISCOUNT_PERCENT: u8 = 90;

/// A sellable trip package with an administrator-set discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPackage {
    pub id: Uuid,
    pub name: String,
    pub base_price: Money,
    pub discount_percent: Option<u8>,
}

impl TripPackage {
    /// Base price after the current discount, rounded to the nearest unit.
    pub fn effective_price(&self) -> Money {
        match self.discount_percent {
            Some(percent) => round_half_even(
                self.base_price as f64 * (1.0 - percent as f64 / 100.0),
            ),
            None => self.base_price,
        }
    }
}

/// Administrator-maintained per-package discount table. Discount changes
/// are prospective only: quotes already frozen on booking records are
/// never recomputed from here.
#[derive(Debug, Default)]
pub struct DiscountTable {
    packages: HashMap<Uuid, TripPackage>,
}

impl DiscountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_package(
        &mut self,
        name: impl Into<String>,
        base_price: Money,
    ) -> EngineResult<TripPackage> {
        if base_price <= 0 {
            return Err(EngineError::InvalidBookingInput(format!(
                "package base price must be positive, got {base_price}"
            )));
        }
        let package = TripPackage {
            id: Uuid::new_v4(),
            name: name.into(),
            base_price,
            discount_percent: None,
        };
        self.packages.insert(package.id, package.clone());
        Ok(package)
    }

    /// Set the discount percent for a package. Out-of-range values are
    /// rejected whole; a percent of 0 removes the discount.
    pub fn set_discount(&mut self, package_id: Uuid, percent: u8) -> EngineResult<()> {
        if percent > MAX_DISCOUNT_PERCENT {
            return Err(EngineError::InvalidDiscount(format!(
                "percent must be within 0..={MAX_DISCOUNT_PERCENT}, got {percent}"
            )));
        }
        let package = self
            .packages
            .get_mut(&package_id)
            .ok_or_else(|| EngineError::NotFound(format!("package {package_id}")))?;
        package.discount_percent = if percent == 0 { None } else { Some(percent) };
        info!(
            package_id = %package_id,
            percent,
            "discount rule updated"
        );
        Ok(())
    }

    pub fn get(&self, package_id: Uuid) -> EngineResult<&TripPackage> {
        self.packages
            .get(&package_id)
            .ok_or_else(|| EngineError::NotFound(format!("package {package_id}")))
    }

    /// Effective price of a package under its current discount.
    pub fn effective_price(&self, package_id: Uuid) -> EngineResult<Money> {
        Ok(self.get(package_id)?.effective_price())
    }

    pub fn list(&self) -> Vec<&TripPackage> {
        let mut packages: Vec<&TripPackage> = self.packages.values().collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_changes_effective_price() {
        let mut table = DiscountTable::new();
        let package = table.insert_package("Sea Cliff Explorer", 5_000).unwrap();

        assert_eq!(table.effective_price(package.id).unwrap(), 5_000);

        table.set_discount(package.id, 20).unwrap();
        assert_eq!(table.effective_price(package.id).unwrap(), 4_000);
    }

    #[test]
    fn zero_percent_removes_discount() {
        let mut table = DiscountTable::new();
        let package = table.insert_package("Old Town Walk", 2_000).unwrap();

        table.set_discount(package.id, 15).unwrap();
        assert_eq!(table.get(package.id).unwrap().discount_percent, Some(15));

        table.set_discount(package.id, 0).unwrap();
        assert_eq!(table.get(package.id).unwrap().discount_percent, None);
    }

    #[test]
    fn out_of_range_percent_rejected_whole() {
        let mut table = DiscountTable::new();
        let package = table.insert_package("River Cruise", 9_000).unwrap();
        table.set_discount(package.id, 30).unwrap();

        let result = table.set_discount(package.id, 91);
        assert!(matches!(result, Err(EngineError::InvalidDiscount(_))));
        // rejection applied nothing
        assert_eq!(table.get(package.id).unwrap().discount_percent, Some(30));
    }

    #[test]
    fn unknown_package_is_not_found() {
        let table = DiscountTable::new();
        assert!(matches!(
            table.effective_price(Uuid::new_v4()),
            Err(EngineError::NotFound(_))
        ));
    }
}
