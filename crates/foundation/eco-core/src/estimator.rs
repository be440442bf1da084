//! Emission Estimator
//!
//! Pure mapping from an [`ActivityUsage`] and an [`EmissionFactorTable`] to
//! daily, monthly and yearly totals plus a per-activity monthly breakdown.
//!
//! ```text
//! daily   = Σ factor × usage                 (daily activities)
//! monthly = daily × 30 + monthly activities + waste × 4
//! yearly  = daily × 365 + monthly activities × 12 + waste × 52
//! ```
//!
//! Everything is computed in kg and reported in metric tons. The result keeps
//! full precision; rounding is applied on the way out with [`Rounding`].
//! Nothing is validated: negative usage produces negative emissions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::{Activity, ActivityUsage, Period};
use crate::factors::EmissionFactorTable;

const KG_PER_TON: f64 = 1000.0;

/// Round `value` to `places` decimal places
///
/// Rounds the exact stored binary value, so `0.0075` (held as
/// `0.00749999..`) becomes `0.007`. Scaling first would land on `7.5` and
/// round up.
pub fn round_to(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Decimal places applied to each figure when presenting a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rounding {
    pub daily: u32,
    pub monthly: u32,
    pub yearly: u32,
    pub breakdown: u32,
}

impl Rounding {
    /// Calculator page: every figure to 3 places
    pub const CALCULATOR: Rounding = Rounding {
        daily: 3,
        monthly: 3,
        yearly: 3,
        breakdown: 3,
    };

    /// Breakdown page: daily to 4 places, the rest to 3
    pub const BREAKDOWN: Rounding = Rounding {
        daily: 4,
        monthly: 3,
        yearly: 3,
        breakdown: 3,
    };
}

impl Default for Rounding {
    fn default() -> Self {
        Self::CALCULATOR
    }
}

/// Estimated footprint in metric tons CO₂e
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    pub daily_tons: f64,
    pub monthly_tons: f64,
    pub yearly_tons: f64,
    /// Monthly tons attributable to each activity
    pub breakdown: BTreeMap<Activity, f64>,
}

impl EmissionResult {
    /// Copy with every figure rounded per `rounding`
    pub fn rounded(&self, rounding: Rounding) -> Self {
        Self {
            daily_tons: round_to(self.daily_tons, rounding.daily),
            monthly_tons: round_to(self.monthly_tons, rounding.monthly),
            yearly_tons: round_to(self.yearly_tons, rounding.yearly),
            breakdown: self
                .breakdown
                .iter()
                .map(|(a, t)| (*a, round_to(*t, rounding.breakdown)))
                .collect(),
        }
    }

    /// Monthly tons for one activity (0 when absent)
    pub fn monthly_for(&self, activity: Activity) -> f64 {
        self.breakdown.get(&activity).copied().unwrap_or(0.0)
    }

    /// Sum of the breakdown entries
    pub fn breakdown_total(&self) -> f64 {
        self.breakdown.values().sum()
    }

    /// Breakdown entries in calculator display order
    pub fn breakdown_rows(&self) -> Vec<(Activity, f64)> {
        Activity::ALL
            .into_iter()
            .map(|a| (a, self.monthly_for(a)))
            .collect()
    }
}

/// Stateless estimator bound to one factor table
#[derive(Debug, Clone, Default)]
pub struct EmissionEstimator {
    factors: EmissionFactorTable,
}

impl EmissionEstimator {
    pub fn new(factors: EmissionFactorTable) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    /// kg emitted by one activity over its own period
    pub fn activity_kg(&self, usage: &ActivityUsage, activity: Activity) -> f64 {
        self.factors.factor(activity) * usage.get(activity)
    }

    /// Full-precision estimate
    pub fn estimate(&self, usage: &ActivityUsage) -> EmissionResult {
        let kg = |a: Activity| self.activity_kg(usage, a);

        let daily = kg(Activity::Cng)
            + kg(Activity::Bus)
            + kg(Activity::Uber)
            + kg(Activity::Bike)
            + kg(Activity::Motorbike)
            + kg(Activity::Water)
            + kg(Activity::Diet);

        let monthly = daily * 30.0
            + kg(Activity::Electricity)
            + kg(Activity::Lpg)
            + kg(Activity::Air)
            + kg(Activity::Waste) * 4.0;

        let yearly = daily * 365.0
            + kg(Activity::Electricity) * 12.0
            + kg(Activity::Lpg) * 12.0
            + kg(Activity::Air) * 12.0
            + kg(Activity::Waste) * 52.0;

        // recomputed per activity from the period scale; must agree with `monthly`
        let breakdown = Activity::ALL
            .into_iter()
            .map(|a| (a, kg(a) * a.period().monthly_scale() / KG_PER_TON))
            .collect();

        EmissionResult {
            daily_tons: daily / KG_PER_TON,
            monthly_tons: monthly / KG_PER_TON,
            yearly_tons: yearly / KG_PER_TON,
            breakdown,
        }
    }

    /// Estimate rounded per `rounding`
    pub fn estimate_rounded(&self, usage: &ActivityUsage, rounding: Rounding) -> EmissionResult {
        self.estimate(usage).rounded(rounding)
    }

    /// Daily kg for one daily-period activity, 0 for the others
    pub(crate) fn daily_kg(&self, usage: &ActivityUsage, activity: Activity) -> f64 {
        match activity.period() {
            Period::Daily => self.activity_kg(usage, activity),
            Period::Weekly | Period::Monthly => 0.0,
        }
    }
}
