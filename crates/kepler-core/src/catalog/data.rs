//! Seeded records of the Kepler-x187 system.

use super::model::{Planet, PlanetColors, ReferenceSpectrum, Star};

pub(crate) static STAR: Star = Star {
    name: "Kepler-x187",
    spectral_type: "G-type main-sequence star (similar to our Sun)",
    age: "4.8 billion years",
    luminosity: "1.05 times Sol",
    habitable_zone: "0.8 AU - 1.6 AU",
    habitable_zone_au: (0.8, 1.6),
};

pub(crate) static PLANETS: [Planet; 7] = [
    Planet {
        id: "vulcanis",
        name: "Vulcanis",
        distance_au: 0.3,
        orbital_period: "65 Earth Days",
        surface_temp: "450°C (842°F)",
        diameter_earths: 0.8,
        spectra_image: "./spectra_images/planet_spectrum_vulcanis.png",
        colors: PlanetColors {
            body: "red-600",
            accent: "red-500",
        },
        radius_scale: 0.8,
        orbit_scale: 0.3,
    },
    Planet {
        id: "aerion",
        name: "Aerion",
        distance_au: 1.0,
        orbital_period: "365 Earth Days",
        surface_temp: "Average 15°C (59°F)",
        diameter_earths: 1.05,
        spectra_image: "./spectra_images/planet_spectrum_aerion.png",
        colors: PlanetColors {
            body: "blue-400",
            accent: "blue-400",
        },
        radius_scale: 1.05,
        orbit_scale: 1.0,
    },
    Planet {
        id: "cygnus_prime",
        name: "Cygnus Prime",
        distance_au: 1.25,
        orbital_period: "500 Earth Days",
        surface_temp: "Average 8°C (47°F)",
        diameter_earths: 1.15,
        spectra_image: "./spectra_images/planet_spectrum_cygnus_prime.png",
        colors: PlanetColors {
            body: "green-500",
            accent: "green-500",
        },
        radius_scale: 1.15,
        orbit_scale: 1.25,
    },
    Planet {
        id: "veridia",
        name: "Veridia",
        distance_au: 0.85,
        orbital_period: "290 Earth Days",
        surface_temp: "Average 65°C (149°F)",
        diameter_earths: 0.9,
        spectra_image: "./spectra_images/planet_spectrum_veridia.png",
        colors: PlanetColors {
            body: "yellow-500",
            accent: "yellow-500",
        },
        radius_scale: 0.9,
        orbit_scale: 0.85,
    },
    Planet {
        id: "boreas",
        name: "Boreas",
        distance_au: 2.5,
        orbital_period: "4 Earth Years",
        surface_temp: "-120°C (-184°F)",
        diameter_earths: 3.5,
        spectra_image: "./spectra_images/planet_spectrum_boreas.png",
        colors: PlanetColors {
            body: "purple-500",
            accent: "purple-500",
        },
        radius_scale: 1.6,
        orbit_scale: 2.5,
    },
    Planet {
        id: "stygia",
        name: "Stygia",
        distance_au: 5.2,
        orbital_period: "12 Earth Years",
        surface_temp: "-180°C (-292°F)",
        diameter_earths: 8.0,
        spectra_image: "./spectra_images/planet_spectrum_stygia.png",
        colors: PlanetColors {
            body: "indigo-700",
            accent: "indigo-700",
        },
        radius_scale: 2.2,
        orbit_scale: 5.2,
    },
    Planet {
        id: "erebus",
        name: "Erebus",
        distance_au: 10.0,
        orbital_period: "32 Earth Years",
        surface_temp: "-210°C (-346°F)",
        diameter_earths: 3.9,
        spectra_image: "./spectra_images/planet_spectrum_erebus.png",
        colors: PlanetColors {
            body: "gray-600",
            accent: "gray-600",
        },
        radius_scale: 1.7,
        orbit_scale: 10.0,
    },
];

pub(crate) static REFERENCE_SPECTRA: [ReferenceSpectrum; 5] = [
    ReferenceSpectrum {
        id: "o2",
        name: "Oxygen (O₂)",
        image_path: "./spectra_images/spectrum_o2.png",
    },
    ReferenceSpectrum {
        id: "h2o",
        name: "Water Vapor (H₂O)",
        image_path: "./spectra_images/spectrum_h2o.png",
    },
    ReferenceSpectrum {
        id: "co2",
        name: "Carbon Dioxide (CO₂)",
        image_path: "./spectra_images/spectrum_co2.png",
    },
    ReferenceSpectrum {
        id: "so2",
        name: "Sulfur Dioxide (SO₂)",
        image_path: "./spectra_images/spectrum_so2.png",
    },
    ReferenceSpectrum {
        id: "he",
        name: "Helium (He)",
        image_path: "./spectra_images/spectrum_he.png",
    },
];

pub const MISSION_BRIEFING_TITLE: &str = "Mission Briefing: Kepler-x187 System";
