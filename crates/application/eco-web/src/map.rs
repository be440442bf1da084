//! Simulated emission map
//!
//! Every city gets a random emission score in 20..=100. The score drives the
//! marker colour and radius. Pass a seed to get the same map twice.

use eco_core::{City, CITIES, MAP_CENTER, MAP_ZOOM};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::RangeInclusive;

pub const EMISSION_RANGE: RangeInclusive<u32> = 20..=100;

/// Rendered map size in pixels
const WIDTH: f64 = 256.0;
const HEIGHT: f64 = 320.0;

/// Metres per degree of latitude
const METRES_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub city: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub emission: u32,
}

impl MapPoint {
    /// RGBA marker colour, redder as the score rises
    pub fn color(&self) -> [u8; 4] {
        let red = (self.emission * 2).min(255);
        [red as u8, (255 - red) as u8, 50, 160]
    }

    /// Marker radius in metres
    pub fn radius_m(&self) -> f64 {
        f64::from(self.emission) * 100.0
    }

    pub fn tooltip(&self) -> String {
        format!("{}: {} CO₂ units", self.city, self.emission)
    }
}

/// RNG for one map render
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// One point per catalog city, in catalog order
pub fn simulate<R: Rng + ?Sized>(rng: &mut R) -> Vec<MapPoint> {
    CITIES.iter().map(|city| point(city, rng)).collect()
}

fn point<R: Rng + ?Sized>(city: &City, rng: &mut R) -> MapPoint {
    MapPoint {
        city: city.name,
        lat: city.lat,
        lon: city.lon,
        emission: rng.gen_range(EMISSION_RANGE),
    }
}

/// Degrees covered by one pixel at the map zoom level
fn degrees_per_pixel() -> f64 {
    360.0 / (256.0 * 2f64.powf(MAP_ZOOM))
}

/// Pixel position of a coordinate, centred on the map centre
pub fn project(lat: f64, lon: f64) -> (f64, f64) {
    let dpp = degrees_per_pixel();
    let x = WIDTH / 2.0 + (lon - MAP_CENTER.1) / dpp;
    let y = HEIGHT / 2.0 - (lat - MAP_CENTER.0) / dpp;
    (x, y)
}

/// Scatter map as inline SVG
pub fn render_svg(points: &[MapPoint]) -> String {
    let px_per_metre = 1.0 / (METRES_PER_DEGREE * degrees_per_pixel());

    let markers: String = points
        .iter()
        .map(|p| {
            let (x, y) = project(p.lat, p.lon);
            let [r, g, b, a] = p.color();
            format!(
                "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"rgba({},{},{},{:.3})\"><title>{}</title></circle>",
                x,
                y,
                p.radius_m() * px_per_metre,
                r,
                g,
                b,
                f64::from(a) / 255.0,
                crate::templates::html_escape(&p.tooltip())
            )
        })
        .collect();

    format!(
        "<svg class=\"emission-map\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">
            <rect width=\"{w}\" height=\"{h}\" class=\"map-bg\"/>
            {markers}
        </svg>",
        w = WIDTH,
        h = HEIGHT,
        markers = markers
    )
}
