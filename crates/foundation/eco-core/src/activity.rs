//! Activity catalog
//!
//! The eleven activity categories the estimator understands, the period each
//! one is measured over, and the input ranges the dashboard offers for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Period an activity's usage figure is expressed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Multiplier that converts one period's usage into a 30-day month
    pub fn monthly_scale(self) -> f64 {
        match self {
            Self::Daily => 30.0,
            Self::Weekly => 4.0,
            Self::Monthly => 1.0,
        }
    }

    /// Multiplier that converts one period's usage into a year
    pub fn yearly_scale(self) -> f64 {
        match self {
            Self::Daily => 365.0,
            Self::Weekly => 52.0,
            Self::Monthly => 12.0,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "day"),
            Self::Weekly => write!(f, "week"),
            Self::Monthly => write!(f, "month"),
        }
    }
}

/// Closed range offered to the user for one activity, plus its starting value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl InputRange {
    const fn new(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default }
    }

    /// Clamp a value into the range. NaN collapses to the default.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Activity category contributing to a footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "CNG")]
    Cng,
    Bus,
    Uber,
    Bike,
    Motorbike,
    Air,
    Electricity,
    #[serde(rename = "LPG")]
    Lpg,
    Water,
    Diet,
    Waste,
}

impl Activity {
    /// Every activity, in the order the calculator lists its breakdown
    pub const ALL: [Activity; 11] = [
        Activity::Cng,
        Activity::Bus,
        Activity::Uber,
        Activity::Bike,
        Activity::Motorbike,
        Activity::Electricity,
        Activity::Lpg,
        Activity::Water,
        Activity::Air,
        Activity::Diet,
        Activity::Waste,
    ];

    /// Order used by the breakdown page: daily sources first, then the rest
    pub const SOURCE_ORDER: [Activity; 11] = [
        Activity::Cng,
        Activity::Bus,
        Activity::Uber,
        Activity::Bike,
        Activity::Motorbike,
        Activity::Water,
        Activity::Diet,
        Activity::Air,
        Activity::Electricity,
        Activity::Lpg,
        Activity::Waste,
    ];

    /// Short name used as the breakdown key
    pub fn name(self) -> &'static str {
        match self {
            Self::Cng => "CNG",
            Self::Bus => "Bus",
            Self::Uber => "Uber",
            Self::Bike => "Bike",
            Self::Motorbike => "Motorbike",
            Self::Air => "Air",
            Self::Electricity => "Electricity",
            Self::Lpg => "LPG",
            Self::Water => "Water",
            Self::Diet => "Diet",
            Self::Waste => "Waste",
        }
    }

    /// Form field / query parameter name
    pub fn field(self) -> &'static str {
        match self {
            Self::Cng => "cng",
            Self::Bus => "bus",
            Self::Uber => "uber",
            Self::Bike => "bike",
            Self::Motorbike => "motorbike",
            Self::Air => "air",
            Self::Electricity => "elec",
            Self::Lpg => "lpg",
            Self::Water => "water",
            Self::Diet => "meals",
            Self::Waste => "waste",
        }
    }

    /// Human label for input widgets
    pub fn label(self) -> &'static str {
        match self {
            Self::Cng => "CNG (km/day)",
            Self::Bus => "Bus (km/day)",
            Self::Uber => "Uber (km/day)",
            Self::Bike => "Bike (km/day)",
            Self::Motorbike => "Motorbike (km/day)",
            Self::Air => "Air Travel (km/month)",
            Self::Electricity => "Electricity (kWh/month)",
            Self::Lpg => "LPG (kg/month)",
            Self::Water => "Water (liters/day)",
            Self::Diet => "Meals/day",
            Self::Waste => "Waste (kg/week)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Cng | Self::Bus | Self::Uber | Self::Bike | Self::Motorbike | Self::Air => "km",
            Self::Electricity => "kWh",
            Self::Lpg | Self::Waste => "kg",
            Self::Water => "liters",
            Self::Diet => "meals",
        }
    }

    pub fn period(self) -> Period {
        match self {
            Self::Cng
            | Self::Bus
            | Self::Uber
            | Self::Bike
            | Self::Motorbike
            | Self::Water
            | Self::Diet => Period::Daily,
            Self::Waste => Period::Weekly,
            Self::Air | Self::Electricity | Self::Lpg => Period::Monthly,
        }
    }

    /// Slider range and default shown by the dashboard
    pub fn input_range(self) -> InputRange {
        match self {
            Self::Cng | Self::Bus => InputRange::new(0.0, 100.0, 10.0),
            Self::Uber | Self::Bike | Self::Motorbike => InputRange::new(0.0, 50.0, 5.0),
            Self::Air => InputRange::new(0.0, 3000.0, 0.0),
            Self::Electricity => InputRange::new(0.0, 1000.0, 200.0),
            Self::Lpg | Self::Waste => InputRange::new(0.0, 50.0, 5.0),
            Self::Water => InputRange::new(0.0, 500.0, 100.0),
            Self::Diet => InputRange::new(1.0, 10.0, 3.0),
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s) || a.field().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownActivity(s.to_string()))
    }
}

/// Usage figures for one calculation
///
/// Each field carries its own period in its name. Values are expected to be
/// non-negative and `meals_per_day` to sit in 1..=10, but nothing here
/// enforces it; callers clamp with [`ActivityUsage::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityUsage {
    pub cng_km_per_day: f64,
    pub bus_km_per_day: f64,
    pub uber_km_per_day: f64,
    pub bike_km_per_day: f64,
    pub motorbike_km_per_day: f64,
    pub air_travel_km_per_month: f64,
    pub electricity_kwh_per_month: f64,
    pub lpg_kg_per_month: f64,
    pub water_liters_per_day: f64,
    pub meals_per_day: u32,
    pub waste_kg_per_week: f64,
}

impl ActivityUsage {
    /// All-zero usage
    pub fn zero() -> Self {
        Self::default()
    }

    /// The dashboard's starting values
    pub fn dashboard_defaults() -> Self {
        let mut usage = Self::zero();
        for activity in Activity::ALL {
            usage.set(activity, activity.input_range().default);
        }
        usage
    }

    /// Usage for one activity, in that activity's own unit and period
    pub fn get(&self, activity: Activity) -> f64 {
        match activity {
            Activity::Cng => self.cng_km_per_day,
            Activity::Bus => self.bus_km_per_day,
            Activity::Uber => self.uber_km_per_day,
            Activity::Bike => self.bike_km_per_day,
            Activity::Motorbike => self.motorbike_km_per_day,
            Activity::Air => self.air_travel_km_per_month,
            Activity::Electricity => self.electricity_kwh_per_month,
            Activity::Lpg => self.lpg_kg_per_month,
            Activity::Water => self.water_liters_per_day,
            Activity::Diet => f64::from(self.meals_per_day),
            Activity::Waste => self.waste_kg_per_week,
        }
    }

    /// Set usage for one activity. Meals are rounded to the nearest whole meal.
    pub fn set(&mut self, activity: Activity, value: f64) {
        match activity {
            Activity::Cng => self.cng_km_per_day = value,
            Activity::Bus => self.bus_km_per_day = value,
            Activity::Uber => self.uber_km_per_day = value,
            Activity::Bike => self.bike_km_per_day = value,
            Activity::Motorbike => self.motorbike_km_per_day = value,
            Activity::Air => self.air_travel_km_per_month = value,
            Activity::Electricity => self.electricity_kwh_per_month = value,
            Activity::Lpg => self.lpg_kg_per_month = value,
            Activity::Water => self.water_liters_per_day = value,
            Activity::Diet => self.meals_per_day = value.max(0.0).round() as u32,
            Activity::Waste => self.waste_kg_per_week = value,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, activity: Activity, value: f64) -> Self {
        self.set(activity, value);
        self
    }

    /// Copy with every field clamped into its dashboard input range
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for activity in Activity::ALL {
            out.set(activity, activity.input_range().clamp(self.get(activity)));
        }
        out
    }

    /// Every field multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = *self;
        for activity in Activity::ALL {
            match activity {
                // meals stay integral; scale exactly when the result is whole
                Activity::Diet => {
                    out.meals_per_day = (f64::from(self.meals_per_day) * factor).round() as u32
                }
                _ => out.set(activity, self.get(activity) * factor),
            }
        }
        out
    }
}
