#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use crate::error::{GhgError, Result};
use crate::types::Category;

/// InputGuard: rejects quantities the form would never have accepted.
/// The engine trusts everything that passes here.
pub struct InputGuard;

impl InputGuard {
    pub fn validate_quantity(category: Category, item: &str, quantity: f64) -> Result<()> {
        if !quantity.is_finite() {
            return Err(GhgError::NonFiniteQuantity {
                category,
                item: item.to_string(),
            });
        }
        if quantity < 0.0 {
            return Err(GhgError::NegativeQuantity {
                category,
                item: item.to_string(),
                quantity,
            });
        }
        Ok(())
    }

    pub fn validate_entries(entries: &BTreeMap<Category, BTreeMap<String, f64>>) -> Result<()> {
        for (category, items) in entries {
            for (item, quantity) in items {
                Self::validate_quantity(*category, item, *quantity)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_guard_quantity() {
        assert!(InputGuard::validate_quantity(Category::Fuel, "Gasoline", 0.0).is_ok());
        assert!(InputGuard::validate_quantity(Category::Fuel, "Gasoline", 12.5).is_ok());
        assert!(InputGuard::validate_quantity(Category::Fuel, "Gasoline", -0.1).is_err());
        assert!(InputGuard::validate_quantity(Category::Fuel, "Gasoline", f64::INFINITY).is_err());
        assert!(InputGuard::validate_quantity(Category::Fuel, "Gasoline", f64::NAN).is_err());
    }

    #[test]
    fn test_input_guard_reports_first_bad_item() {
        let mut entries = BTreeMap::new();
        entries.insert(
            Category::Livestock,
            BTreeMap::from([("Pigs".to_string(), 4.0), ("Sheep".to_string(), -2.0)]),
        );
        match InputGuard::validate_entries(&entries) {
            Err(GhgError::NegativeQuantity { category, item, .. }) => {
                assert_eq!(category, Category::Livestock);
                assert_eq!(item, "Sheep");
            }
            other => panic!("expected NegativeQuantity, got {other:?}"),
        }
    }
}
