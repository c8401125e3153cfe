use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GhgError, Result};
use crate::guards::InputGuard;

/// Activity categories of the calculator. Declaration order is the canonical
/// order used for totals, comparison bars and recommendations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Livestock,
    Crops,
    Fertilizer,
    Fuel,
    Electricity,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Livestock,
        Category::Crops,
        Category::Fertilizer,
        Category::Fuel,
        Category::Electricity,
    ];

    /// Key used in quantity files and serialized output.
    pub fn key(self) -> &'static str {
        match self {
            Category::Livestock => "livestock",
            Category::Crops => "crops",
            Category::Fertilizer => "fertilizer",
            Category::Fuel => "fuel",
            Category::Electricity => "electricity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Livestock => "Livestock",
            Category::Crops => "Crops",
            Category::Fertilizer => "Fertilizer",
            Category::Fuel => "Fuel",
            Category::Electricity => "Electricity",
        }
    }

    /// Unit in which quantities of this category are entered.
    pub fn unit(self) -> &'static str {
        match self {
            Category::Livestock => "heads",
            Category::Crops => "ha",
            Category::Fertilizer => "kg",
            Category::Fuel => "liters/m³",
            Category::Electricity => "kWh",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = GhgError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GhgError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = GhgError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.key().to_string()
    }
}

type RawQuantities = BTreeMap<Category, BTreeMap<String, f64>>;

/// Quantities entered for one calculation request, per category and item.
///
/// Every quantity held here has passed [`InputGuard`]: finite and non-negative.
/// Items are not checked against the factor table; unknown ones contribute zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuantities", into = "RawQuantities")]
pub struct QuantityInput {
    entries: RawQuantities,
}

impl QuantityInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity of `item` under `category`, replacing any previous value.
    pub fn insert(&mut self, category: Category, item: impl Into<String>, quantity: f64) -> Result<()> {
        let item = item.into();
        InputGuard::validate_quantity(category, &item, quantity)?;
        self.entries.entry(category).or_default().insert(item, quantity);
        Ok(())
    }

    /// Builder form of [`QuantityInput::insert`].
    pub fn with(mut self, category: Category, item: impl Into<String>, quantity: f64) -> Result<Self> {
        self.insert(category, item, quantity)?;
        Ok(self)
    }

    /// Items and quantities of one category, in item-name order.
    pub fn items(&self, category: Category) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries
            .get(&category)
            .into_iter()
            .flat_map(|items| items.iter().map(|(name, q)| (name.as_str(), *q)))
    }

    /// True when the category appears in the input with at least one item.
    pub fn has_entries(&self, category: Category) -> bool {
        self.entries.get(&category).is_some_and(|items| !items.is_empty())
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a quantities file; `.toml` files are read as TOML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }
}

impl TryFrom<RawQuantities> for QuantityInput {
    type Error = GhgError;

    fn try_from(entries: RawQuantities) -> Result<Self> {
        InputGuard::validate_entries(&entries)?;
        Ok(Self { entries })
    }
}

impl From<QuantityInput> for RawQuantities {
    fn from(input: QuantityInput) -> Self {
        input.entries
    }
}

/// Emission totals per category, always covering every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmissionsResult {
    totals: BTreeMap<Category, f64>,
}

impl EmissionsResult {
    pub(crate) fn from_fn(mut f: impl FnMut(Category) -> f64) -> Self {
        Self {
            totals: Category::ALL.into_iter().map(|c| (c, f(c))).collect(),
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.totals.get(&category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.totals.iter().map(|(c, v)| (*c, *v))
    }
}

/// Traditional and reduced trajectories over the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionSeries {
    /// Label of the first value; presentation only.
    pub start_year: i32,
    pub traditional: Vec<f64>,
    pub reduced: Vec<f64>,
}

impl ProjectionSeries {
    pub fn len(&self) -> usize {
        self.traditional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traditional.is_empty()
    }

    /// Year label of each value. Widened to i64 so labels never overflow.
    pub fn years(&self) -> impl Iterator<Item = i64> + '_ {
        let start = i64::from(self.start_year);
        (0..self.len() as i64).map(move |i| start + i)
    }
}

/// Item-level traditional vs reduced values, aligned by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSeries {
    pub labels: Vec<String>,
    pub traditional: Vec<f64>,
    pub reduced: Vec<f64>,
}

impl ComparisonSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub item: String,
    pub message: String,
}
