//! Per-source breakdown table
//!
//! The breakdown view works source by source: each daily source gets a daily
//! figure, every source gets a monthly figure, and the yearly figure is the
//! monthly one times twelve. Entries are rounded first and the totals are the
//! sums of the rounded entries.
//!
//! Note the yearly convention differs from [`EmissionEstimator::estimate`],
//! which scales daily sources by 365 rather than 30 × 12. Both are kept.

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityUsage};
use crate::estimator::{round_to, EmissionEstimator, Rounding};

/// One row of the breakdown table, in tons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source: Activity,
    pub daily_tons: f64,
    pub monthly_tons: f64,
    pub yearly_tons: f64,
}

/// Rows plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownTable {
    pub rows: Vec<SourceBreakdown>,
    pub total_daily_tons: f64,
    pub total_monthly_tons: f64,
    pub total_yearly_tons: f64,
}

/// One pie slice: a source's share of the monthly total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieShare {
    pub source: Activity,
    pub tons: f64,
    pub percent: f64,
}

impl PieShare {
    /// Percentage label with one decimal place, e.g. `41.8%`
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

impl BreakdownTable {
    /// Row for one source
    pub fn row(&self, source: Activity) -> Option<&SourceBreakdown> {
        self.rows.iter().find(|r| r.source == source)
    }

    /// Monthly composition. Sources with no positive contribution are left out;
    /// an all-zero table yields no slices.
    pub fn pie_shares(&self) -> Vec<PieShare> {
        let positive: Vec<&SourceBreakdown> =
            self.rows.iter().filter(|r| r.monthly_tons > 0.0).collect();
        let total: f64 = positive.iter().map(|r| r.monthly_tons).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        positive
            .into_iter()
            .map(|r| PieShare {
                source: r.source,
                tons: r.monthly_tons,
                percent: r.monthly_tons / total * 100.0,
            })
            .collect()
    }
}

impl EmissionEstimator {
    /// Per-source table with the breakdown view's rounding
    pub fn breakdown_table(&self, usage: &ActivityUsage) -> BreakdownTable {
        let rounding = Rounding::BREAKDOWN;

        let rows: Vec<SourceBreakdown> = Activity::SOURCE_ORDER
            .into_iter()
            .map(|source| {
                let monthly_kg = self.activity_kg(usage, source) * source.period().monthly_scale();
                SourceBreakdown {
                    source,
                    daily_tons: round_to(self.daily_kg(usage, source) / 1000.0, rounding.daily),
                    monthly_tons: round_to(monthly_kg / 1000.0, rounding.monthly),
                    yearly_tons: round_to(monthly_kg * 12.0 / 1000.0, rounding.yearly),
                }
            })
            .collect();

        let total_daily_tons = round_to(rows.iter().map(|r| r.daily_tons).sum(), rounding.daily);
        let total_monthly_tons =
            round_to(rows.iter().map(|r| r.monthly_tons).sum(), rounding.monthly);
        let total_yearly_tons = round_to(rows.iter().map(|r| r.yearly_tons).sum(), rounding.yearly);

        BreakdownTable {
            rows,
            total_daily_tons,
            total_monthly_tons,
            total_yearly_tons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(usage: &ActivityUsage) -> BreakdownTable {
        EmissionEstimator::default().breakdown_table(usage)
    }

    #[test]
    fn test_rows_follow_source_order() {
        let t = table(&ActivityUsage::dashboard_defaults());
        let sources: Vec<Activity> = t.rows.iter().map(|r| r.source).collect();
        assert_eq!(sources, Activity::SOURCE_ORDER.to_vec());
    }

    #[test]
    fn test_non_daily_sources_have_zero_daily() {
        let t = table(&ActivityUsage::dashboard_defaults());
        for source in [Activity::Air, Activity::Electricity, Activity::Lpg, Activity::Waste] {
            assert_eq!(t.row(source).unwrap().daily_tons, 0.0);
        }
        assert!(t.row(Activity::Diet).unwrap().daily_tons > 0.0);
    }

    #[test]
    fn test_electricity_row() {
        let usage = ActivityUsage::zero().with(Activity::Electricity, 200.0);
        let t = table(&usage);
        let row = t.row(Activity::Electricity).unwrap();
        assert_eq!(row.monthly_tons, 0.124);
        assert_eq!(row.yearly_tons, 1.488);
        assert_eq!(t.total_monthly_tons, 0.124);
        assert_eq!(t.total_yearly_tons, 1.488);
        assert_eq!(t.total_daily_tons, 0.0);
    }

    #[test]
    fn test_yearly_is_monthly_times_twelve_for_daily_sources() {
        // 0.028 × 20 = 0.56 kg/day → 16.8 kg/month → 201.6 kg/year
        let usage = ActivityUsage::zero().with(Activity::Bus, 20.0);
        let t = table(&usage);
        let row = t.row(Activity::Bus).unwrap();
        assert_eq!(row.daily_tons, 0.0006);
        assert_eq!(row.monthly_tons, 0.017);
        assert_eq!(row.yearly_tons, 0.202);
    }

    #[test]
    fn test_totals_are_sums_of_rounded_rows() {
        let t = table(&ActivityUsage::dashboard_defaults());
        let monthly: f64 = t.rows.iter().map(|r| r.monthly_tons).sum();
        let yearly: f64 = t.rows.iter().map(|r| r.yearly_tons).sum();
        assert_eq!(t.total_monthly_tons, round_to(monthly, 3));
        assert_eq!(t.total_yearly_tons, round_to(yearly, 3));
    }

    #[test]
    fn test_lpg_row_rounds_stored_value() {
        let t = table(&ActivityUsage::dashboard_defaults());
        let row = t.row(Activity::Lpg).unwrap();
        assert_eq!(row.monthly_tons, 0.007);
        assert_eq!(row.yearly_tons, 0.09);
    }

    #[test]
    fn test_all_zero_table() {
        let t = table(&ActivityUsage::zero());
        assert_eq!(t.total_daily_tons, 0.0);
        assert_eq!(t.total_monthly_tons, 0.0);
        assert_eq!(t.total_yearly_tons, 0.0);
        assert!(t.pie_shares().is_empty());
    }

    #[test]
    fn test_pie_shares_sum_to_100() {
        let t = table(&ActivityUsage::dashboard_defaults());
        let shares = t.pie_shares();
        assert!(!shares.is_empty());
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_label() {
        let share = PieShare {
            source: Activity::Electricity,
            tons: 0.124,
            percent: 41.84,
        };
        assert_eq!(share.label(), "41.8%");
    }
}
