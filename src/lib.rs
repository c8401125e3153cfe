#![forbid(unsafe_code)]

//! Greenhouse-gas estimates for farm inputs: per-category totals from a fixed
//! emission factor table, a traditional vs reduced item comparison, a decade
//! projection at constant growth and canned recommendations.

pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod guards;
pub mod report;
pub mod types;

pub use config::EngineConfig;
pub use engine::{
    compute_totals, derive_comparison_series, generate_recommendations, grand_total,
    project_by_category, project_scenario, EmissionsEngine, ProjectionParams,
    ANNUAL_GROWTH_RATE, DEFAULT_START_YEAR, MAX_PROJECTION_YEARS, PROJECTION_YEARS,
    REDUCTION_FACTOR,
};
pub use error::{GhgError, Result};
pub use factors::EmissionFactorTable;
pub use guards::InputGuard;
pub use report::Report;
pub use types::{
    Category, ComparisonSeries, EmissionsResult, ProjectionSeries, QuantityInput, Recommendation,
};
