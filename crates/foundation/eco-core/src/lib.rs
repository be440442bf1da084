//! Eco Agent BD core
//!
//! The emission model behind the calculator and breakdown views, plus the
//! static catalogs (activities, factors, cities) the rest of the workspace
//! shares.
//!
//! ```text
//! ActivityUsage ──┐
//!                 ├──> EmissionEstimator ──> EmissionResult   (calculator)
//! FactorTable ────┘            │
//!                              └──────────> BreakdownTable   (breakdown view)
//! ```

pub mod activity;
pub mod breakdown;
pub mod cities;
pub mod estimator;
pub mod factors;

pub use activity::{Activity, ActivityUsage, InputRange, Period};
pub use breakdown::{BreakdownTable, PieShare, SourceBreakdown};
pub use cities::{default_city, find_city, City, CITIES, MAP_CENTER, MAP_ZOOM};
pub use estimator::{round_to, EmissionEstimator, EmissionResult, Rounding};
pub use factors::EmissionFactorTable;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown activity: {0}")]
    UnknownActivity(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
