//! Catalog domain models.
//!
//! Every record is compiled in and borrowed as `&'static` for the lifetime of
//! the process.

use serde::Serialize;

/// The host star of the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    pub name: &'static str,
    pub spectral_type: &'static str,
    pub age: &'static str,
    pub luminosity: &'static str,
    /// Display string, e.g. "0.8 AU - 1.6 AU"
    pub habitable_zone: &'static str,
    /// Inner and outer edge of the habitable zone in AU
    pub habitable_zone_au: (f64, f64),
}

impl Star {
    /// Returns true when `planet` orbits inside this star's habitable zone.
    pub fn in_habitable_zone(&self, planet: &Planet) -> bool {
        let (inner, outer) = self.habitable_zone_au;
        planet.within_band(inner, outer)
    }
}

/// Display color tokens used when rendering a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetColors {
    /// Body color on the system map
    pub body: &'static str,
    /// Accent color for the details card border
    pub accent: &'static str,
}

/// A planet of the system and its public physical attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    /// Unique identifier (e.g. `"cygnus_prime"`)
    pub id: &'static str,
    pub name: &'static str,
    /// Distance from the star in astronomical units
    pub distance_au: f64,
    /// Display string, e.g. "65 Earth Days"
    pub orbital_period: &'static str,
    /// Display string, e.g. "Average 15°C (59°F)"
    pub surface_temp: &'static str,
    /// Diameter relative to Earth
    pub diameter_earths: f64,
    /// Path of the simulated spectrum image. Never opened by the core.
    pub spectra_image: &'static str,
    pub colors: PlanetColors,
    /// Relative body size on the system map
    pub radius_scale: f64,
    /// Relative orbit distance on the system map
    pub orbit_scale: f64,
}

impl Planet {
    /// Returns true when the planet orbits inside the given habitable band.
    pub fn within_band(&self, inner_au: f64, outer_au: f64) -> bool {
        self.distance_au >= inner_au && self.distance_au <= outer_au
    }
}

/// Absorption signature of a known gas, used for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSpectrum {
    pub id: &'static str,
    pub name: &'static str,
    pub image_path: &'static str,
}
