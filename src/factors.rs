//! Emission factors per activity unit, in kg CO2e.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::{GhgError, Result};
use crate::types::Category;

const LIVESTOCK: &[(&str, f64)] = &[
    ("Beef Cow", 99.0),
    ("Dairy Cow", 102.0),
    ("Buffalo", 107.0),
    ("Chicken", 6.0),
    ("Pigs", 21.0),
    ("Sheep", 15.0),
    ("Goats", 15.0),
    ("Camels", 84.0),
    ("Horses", 56.0),
];

const CROPS: &[(&str, f64)] = &[
    ("Wheat", 0.69),
    ("Barley", 0.54),
    ("Maize", 0.77),
    ("Oats", 0.64),
    ("Rye", 0.68),
    ("Rice", 1.50),
    ("Millet", 0.67),
    ("Sorghum", 0.61),
    ("Pasture", 0.15),
    ("Peas", 0.45),
    ("Beans", 0.62),
    ("Soybeans", 0.62),
    ("Potatoes", 0.43),
    ("Feedbeet", 0.47),
    ("Sugarcane", 0.73),
    ("Peanuts", 0.80),
];

const FERTILIZER: &[(&str, f64)] = &[
    ("Urea", 1.87),
    ("Lime", 0.61),
    ("Gypsum", 0.10),
    ("Animal Manure", 0.20),
    ("Organic Compost", 0.20),
    ("Filter Cake", 0.25),
    ("Vinasse", 0.10),
];

const FUEL: &[(&str, f64)] = &[
    ("Diesel Oil", 2.68),
    ("Gasoline", 2.31),
    ("Biodiesel", 1.83),
    ("Anhydrous Ethanol", 1.50),
    ("Hydrated Ethanol", 1.44),
    ("Natural Gas", 2.75),
];

const ELECTRICITY: &[(&str, f64)] = &[("Solar", 0.05), ("Wind", 0.03), ("Hydropower", 0.02)];

fn standard_rows(category: Category) -> &'static [(&'static str, f64)] {
    match category {
        Category::Livestock => LIVESTOCK,
        Category::Crops => CROPS,
        Category::Fertilizer => FERTILIZER,
        Category::Fuel => FUEL,
        Category::Electricity => ELECTRICITY,
    }
}

/// Category -> item -> factor lookup. Item order is kept as registered so
/// option lists come out the way they were entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmissionFactorTable {
    rows: BTreeMap<Category, Vec<(String, f64)>>,
}

impl EmissionFactorTable {
    /// Shared table with the built-in factors, built on first use.
    pub fn standard() -> &'static EmissionFactorTable {
        static TABLE: OnceLock<EmissionFactorTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            let rows = Category::ALL
                .into_iter()
                .map(|c| {
                    let items = standard_rows(c)
                        .iter()
                        .map(|(name, f)| (name.to_string(), *f))
                        .collect();
                    (c, items)
                })
                .collect();
            EmissionFactorTable { rows }
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Register or replace one factor. Factors must be finite and non-negative.
    pub fn with_factor(mut self, category: Category, item: impl Into<String>, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(GhgError::InvalidConfig("emission factor must be finite and >= 0"));
        }
        let item = item.into();
        let items = self.rows.entry(category).or_default();
        match items.iter_mut().find(|(name, _)| *name == item) {
            Some(slot) => slot.1 = factor,
            None => items.push((item, factor)),
        }
        Ok(self)
    }

    /// Factor for `item` under `category`; 0.0 when the item is not listed.
    pub fn factor_of(&self, category: Category, item: &str) -> f64 {
        self.lookup(category, item).unwrap_or(0.0)
    }

    pub fn contains(&self, category: Category, item: &str) -> bool {
        self.lookup(category, item).is_some()
    }

    /// Known items of a category, in registration order.
    pub fn items(&self, category: Category) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.rows
            .get(&category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(name, f)| (name.as_str(), *f)))
    }

    fn lookup(&self, category: Category, item: &str) -> Option<f64> {
        self.rows
            .get(&category)?
            .iter()
            .find(|(name, _)| name == item)
            .map(|(_, f)| *f)
    }
}
