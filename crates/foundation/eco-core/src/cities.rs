//! City catalog
//!
//! Twenty Bangladeshi cities offered by the weather page and plotted on the
//! emission map.

use serde::Serialize;

use crate::{CoreError, Result};

/// A city and its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }
}

/// Initial map view: centre of Bangladesh
pub const MAP_CENTER: (f64, f64) = (23.6850, 90.3563);
pub const MAP_ZOOM: f64 = 6.0;

pub static CITIES: &[City] = &[
    City::new("Dhaka", 23.8103, 90.4125),
    City::new("Chittagong", 22.3569, 91.7832),
    City::new("Khulna", 22.8456, 89.5403),
    City::new("Rajshahi", 24.3745, 88.6042),
    City::new("Sylhet", 24.8949, 91.8687),
    City::new("Barisal", 22.7010, 90.3535),
    City::new("Rangpur", 25.7460, 89.2500),
    City::new("Mymensingh", 24.7471, 90.4203),
    City::new("Comilla", 23.4607, 91.1809),
    City::new("Narayanganj", 23.6238, 90.5000),
    City::new("Gazipur", 23.9999, 90.4203),
    City::new("Jessore", 23.1706, 89.2140),
    City::new("Bogra", 24.8481, 89.3730),
    City::new("Cox's Bazar", 21.4272, 92.0058),
    City::new("Tangail", 24.2513, 89.9167),
    City::new("Narsingdi", 23.9323, 90.7152),
    City::new("Kushtia", 23.9013, 89.1205),
    City::new("Feni", 22.9415, 91.3958),
    City::new("Moulvibazar", 24.4829, 91.7774),
    City::new("Pabna", 24.0064, 89.2372),
];

/// Look up a city by name, ignoring ASCII case
pub fn find_city(name: &str) -> Result<&'static City> {
    let name = name.trim();
    CITIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CoreError::UnknownCity(name.to_string()))
}

/// The city the weather page opens with
pub fn default_city() -> &'static City {
    &CITIES[0]
}
