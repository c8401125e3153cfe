use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GhgError, Result};
use crate::factors::EmissionFactorTable;
use crate::types::{
    Category, ComparisonSeries, EmissionsResult, ProjectionSeries, QuantityInput, Recommendation,
};

/// Share of traditional emissions kept in the reduced scenario (a flat 20% cut).
pub const REDUCTION_FACTOR: f64 = 0.8;

/// Constant annual growth applied to both projected scenarios.
pub const ANNUAL_GROWTH_RATE: f64 = 0.05;

/// Number of yearly values in a projection.
pub const PROJECTION_YEARS: usize = 10;

/// Year label of the first projected value.
pub const DEFAULT_START_YEAR: i32 = 2024;

/// Longest horizon accepted from configuration.
pub const MAX_PROJECTION_YEARS: usize = 100;

/// Parameters of the decade projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionParams {
    pub years: usize,
    pub growth_rate: f64,
    pub reduction_factor: f64,
    pub start_year: i32,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            years: PROJECTION_YEARS,
            growth_rate: ANNUAL_GROWTH_RATE,
            reduction_factor: REDUCTION_FACTOR,
            start_year: DEFAULT_START_YEAR,
        }
    }
}

impl ProjectionParams {
    pub fn validate(&self) -> Result<()> {
        if self.years == 0 {
            return Err(GhgError::InvalidConfig("projection years must be > 0"));
        }
        if self.years > MAX_PROJECTION_YEARS {
            return Err(GhgError::InvalidConfig("projection years must be <= 100"));
        }
        // The last year label must still fit in i32.
        let last_offset = i32::try_from(self.years - 1)
            .map_err(|_| GhgError::InvalidConfig("projection years out of range"))?;
        if self.start_year.checked_add(last_offset).is_none() {
            return Err(GhgError::InvalidConfig("start_year too large for projection horizon"));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(GhgError::InvalidConfig("growth_rate must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.reduction_factor) {
            return Err(GhgError::InvalidConfig("reduction_factor must be between 0.0 and 1.0"));
        }
        Ok(())
    }
}

/// Multiply-and-sum engine over an emission factor table.
#[derive(Debug, Clone, Copy)]
pub struct EmissionsEngine<'t> {
    table: &'t EmissionFactorTable,
    warn_unknown_items: bool,
}

impl Default for EmissionsEngine<'static> {
    fn default() -> Self {
        Self::new(EmissionFactorTable::standard())
    }
}

impl<'t> EmissionsEngine<'t> {
    pub fn new(table: &'t EmissionFactorTable) -> Self {
        Self {
            table,
            warn_unknown_items: true,
        }
    }

    /// Toggle the warning logged when an item is missing from the table.
    pub fn warn_unknown_items(mut self, enabled: bool) -> Self {
        self.warn_unknown_items = enabled;
        self
    }

    fn factor(&self, category: Category, item: &str) -> f64 {
        if self.warn_unknown_items && !self.table.contains(category, item) {
            warn!(%category, item, "item not in emission factor table, contributing zero");
        }
        self.table.factor_of(category, item)
    }

    /// Sum of quantity x factor over the given items of one category.
    pub fn compute_emissions<I, K>(&self, category: Category, quantities: I) -> f64
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        quantities
            .into_iter()
            .map(|(item, quantity)| quantity * self.factor(category, item.as_ref()))
            .sum()
    }

    /// Per-category totals. Categories missing from the input total 0.
    pub fn compute_totals(&self, input: &QuantityInput) -> EmissionsResult {
        EmissionsResult::from_fn(|category| self.compute_emissions(category, input.items(category)))
    }

    /// Per-item traditional and reduced values, categories in canonical order.
    /// Unknown items are only warned about by [`EmissionsEngine::compute_totals`].
    pub fn derive_comparison_series(&self, input: &QuantityInput) -> ComparisonSeries {
        let mut series = ComparisonSeries::default();
        for category in Category::ALL {
            for (item, quantity) in input.items(category) {
                let annual = quantity * self.table.factor_of(category, item);
                series.labels.push(item.to_string());
                series.traditional.push(annual);
                series.reduced.push(annual * REDUCTION_FACTOR);
            }
        }
        series
    }
}

/// Totals per category using the built-in factor table.
pub fn compute_totals(input: &QuantityInput) -> EmissionsResult {
    EmissionsEngine::default().compute_totals(input)
}

/// Item comparison using the built-in factor table.
pub fn derive_comparison_series(input: &QuantityInput) -> ComparisonSeries {
    EmissionsEngine::default().derive_comparison_series(input)
}

/// Sum of all category totals; the base of the aggregate projection.
pub fn grand_total(totals: &EmissionsResult) -> f64 {
    totals.iter().map(|(_, v)| v).sum()
}

/// Geometric projection of a base total and its reduced counterpart.
///
/// `traditional[0] = base`, `reduced[0] = base * reduction_factor`, and each
/// following value is the previous one times `1 + growth_rate`.
pub fn project_scenario(base_total: f64, params: &ProjectionParams) -> ProjectionSeries {
    let growth = 1.0 + params.growth_rate;
    let trajectory = |start: f64| -> Vec<f64> {
        std::iter::successors(Some(start), |prev| Some(prev * growth))
            .take(params.years)
            .collect()
    };
    ProjectionSeries {
        start_year: params.start_year,
        traditional: trajectory(base_total),
        reduced: trajectory(base_total * params.reduction_factor),
    }
}

/// Same recurrence as [`project_scenario`], run for each category on its own.
pub fn project_by_category(
    totals: &EmissionsResult,
    params: &ProjectionParams,
) -> BTreeMap<Category, ProjectionSeries> {
    totals
        .iter()
        .map(|(category, total)| (category, project_scenario(total, params)))
        .collect()
}

fn recommendation_message(category: Category, item: &str) -> String {
    match category {
        Category::Livestock => format!(
            "Consider improving feed efficiency and manure management for {item}. \
             This can help reduce methane emissions."
        ),
        Category::Crops => format!(
            "Optimize fertilizer use and adopt precision agriculture techniques for {item} \
             to minimize emissions."
        ),
        Category::Fertilizer => "Use fertilizers like Organic Compost or Filter Cake to reduce \
                                 emissions compared to conventional options."
            .to_string(),
        Category::Fuel => "Switch to cleaner fuels like Biodiesel or reduce reliance on Diesel Oil \
                           to lower emissions."
            .to_string(),
        Category::Electricity => "Increase the use of renewable energy sources such as Solar or \
                                  Wind to reduce emissions from electricity consumption."
            .to_string(),
    }
}

/// One recommendation per item with a positive quantity. Repeats are kept:
/// three qualifying fuels give three identical fuel lines.
pub fn generate_recommendations(input: &QuantityInput) -> Vec<Recommendation> {
    Category::ALL
        .into_iter()
        .flat_map(|category| {
            input
                .items(category)
                .filter(|(_, quantity)| *quantity > 0.0)
                .map(move |(item, _)| Recommendation {
                    category,
                    item: item.to_string(),
                    message: recommendation_message(category, item),
                })
        })
        .collect()
}
