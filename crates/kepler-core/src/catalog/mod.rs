//! Catalog domain module.
//!
//! Immutable registry of the star, its planets and the reference spectra the
//! student compares against. Nothing here is mutated after startup.
//!
//! # Usage
//!
//! ```
//! use kepler_core::catalog::Catalog;
//!
//! let catalog = Catalog::seeded();
//! let aerion = catalog.planet("aerion").expect("seeded planet");
//! assert_eq!(aerion.name, "Aerion");
//! ```

mod data;
mod model;

pub use data::MISSION_BRIEFING_TITLE;
pub use model::{Planet, PlanetColors, ReferenceSpectrum, Star};

use crate::error::{KeplerError, Result};

/// Read-only view over the compiled-in system data.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    star: &'static Star,
    planets: &'static [Planet],
    reference_spectra: &'static [ReferenceSpectrum],
}

impl Catalog {
    /// Returns the Kepler-x187 catalog.
    pub fn seeded() -> Self {
        Self {
            star: &data::STAR,
            planets: &data::PLANETS,
            reference_spectra: &data::REFERENCE_SPECTRA,
        }
    }

    pub fn star(&self) -> &'static Star {
        self.star
    }

    /// All planets in catalog order.
    pub fn planets(&self) -> &'static [Planet] {
        self.planets
    }

    pub fn reference_spectra(&self) -> &'static [ReferenceSpectrum] {
        self.reference_spectra
    }

    /// Looks up a planet by identifier.
    pub fn planet(&self, id: &str) -> Option<&'static Planet> {
        self.planets.iter().find(|planet| planet.id == id)
    }

    /// Like [`Catalog::planet`], but a miss is reported as `NotFound`.
    pub fn require_planet(&self, id: &str) -> Result<&'static Planet> {
        self.planet(id)
            .ok_or_else(|| KeplerError::not_found("planet", id))
    }

    /// Resolves user input to a planet: identifier first, then display name
    /// ignoring case.
    pub fn find_planet(&self, query: &str) -> Option<&'static Planet> {
        let query = query.trim();
        self.planet(query).or_else(|| {
            self.planets
                .iter()
                .find(|planet| planet.name.eq_ignore_ascii_case(query))
        })
    }

    pub fn reference_spectrum(&self, id: &str) -> Option<&'static ReferenceSpectrum> {
        self.reference_spectra.iter().find(|spectrum| spectrum.id == id)
    }

    /// Planets sorted by distance from the star, as drawn on the system map.
    pub fn planets_by_distance(&self) -> Vec<&'static Planet> {
        let mut planets: Vec<&'static Planet> = self.planets.iter().collect();
        planets.sort_by(|a, b| a.distance_au.total_cmp(&b.distance_au));
        planets
    }

    /// Renders the mission briefing shown before the overview becomes
    /// interactive.
    pub fn briefing(&self) -> String {
        let star = self.star;
        format!(
            "Your Mission: Explore the planets of the {name} system and find out which ones could support life!\n\
             \n\
             Your Main Tool: You'll use a special tool to look at the light from each planet. This light pattern, \
             called a spectrum, can tell you what gases are in its atmosphere. You can compare the planet's spectrum \
             to the spectra of known gases like Oxygen (O₂), Water Vapor (H₂O), Carbon Dioxide (CO₂), Sulfur \
             Dioxide (SO₂), and Helium (He).\n\
             \n\
             Target Star: {name}\n  \
             - Type: {spectral_type}\n  \
             - Age: {age}\n  \
             - Luminosity: {luminosity}\n  \
             - Habitable Zone: {zone} (This is the 'Goldilocks' area where planets might have liquid water!)\n\
             \n\
             Your Task, Explorer:\n\
             1. Go to each planet using the Solar System map.\n\
             2. Look carefully at the planet's spectrum display. What patterns or lines do you see?\n\
             3. Use the reference spectra. Do any of the reference gas spectra match parts of the planet's spectrum?\n\
             4. Check out the planet's details: How far is it from the star? What's its temperature and size?\n\
             5. Chat with Mission Command! Ask questions and discuss what you find.\n\
             6. Based on all your evidence, decide: Which planet(s) are the best candidates for life?\n\
             \n\
             Good luck, Explorer. We're counting on you!",
            name = star.name,
            spectral_type = star.spectral_type,
            age = star.age,
            luminosity = star.luminosity,
            zone = star.habitable_zone,
        )
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
