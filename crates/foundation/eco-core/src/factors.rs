//! Emission factor table
//!
//! kg CO₂e per unit of activity. Built once at startup and shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::Activity;

/// Fixed mapping from activity to kg CO₂e per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorTable {
    factors: BTreeMap<Activity, f64>,
}

impl EmissionFactorTable {
    /// Bangladesh defaults
    pub fn bangladesh() -> Self {
        let factors = Activity::ALL
            .into_iter()
            .map(|a| (a, Self::bangladesh_factor(a)))
            .collect();
        Self { factors }
    }

    fn bangladesh_factor(activity: Activity) -> f64 {
        match activity {
            Activity::Cng => 0.055,
            Activity::Bus => 0.028,
            Activity::Uber => 0.14,
            Activity::Bike => 0.005,
            Activity::Motorbike => 0.08,
            Activity::Air => 0.25,
            Activity::Electricity => 0.62,
            Activity::Lpg => 1.5,
            Activity::Water => 0.0003,
            Activity::Diet => 1.15,
            Activity::Waste => 0.09,
        }
    }

    /// Defaults with selected rows replaced. Unlisted activities keep their
    /// Bangladesh factor, so the table always has one row per activity.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (Activity, f64)>,
    {
        let mut table = Self::bangladesh();
        for (activity, factor) in overrides {
            tracing::debug!(%activity, factor, "overriding emission factor");
            table.factors.insert(activity, factor);
        }
        table
    }

    /// Factor for one activity
    pub fn factor(&self, activity: Activity) -> f64 {
        self.factors
            .get(&activity)
            .copied()
            .unwrap_or_else(|| Self::bangladesh_factor(activity))
    }

    /// Rows in activity order
    pub fn iter(&self) -> impl Iterator<Item = (Activity, f64)> + '_ {
        self.factors.iter().map(|(a, f)| (*a, *f))
    }
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        Self::bangladesh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_row_per_activity() {
        let table = EmissionFactorTable::bangladesh();
        assert_eq!(table.iter().count(), Activity::ALL.len());
        assert_eq!(table.factor(Activity::Cng), 0.055);
        assert_eq!(table.factor(Activity::Electricity), 0.62);
        assert_eq!(table.factor(Activity::Water), 0.0003);
    }

    #[test]
    fn test_overrides_keep_other_rows() {
        let table = EmissionFactorTable::with_overrides([(Activity::Electricity, 0.5)]);
        assert_eq!(table.factor(Activity::Electricity), 0.5);
        assert_eq!(table.factor(Activity::Lpg), 1.5);
        assert_eq!(table.iter().count(), Activity::ALL.len());
    }

    #[test]
    fn test_serde_roundtrip_uses_activity_keys() {
        let table = EmissionFactorTable::bangladesh();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"Electricity\":0.62"));
        let back: EmissionFactorTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
