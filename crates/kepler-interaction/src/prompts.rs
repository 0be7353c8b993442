//! Prompt assembly for Mission Command.
//!
//! The persona prompt is an opaque text asset. Everything else here is the
//! fixed wording the state machine and gateway put around it.

use kepler_core::catalog::{Catalog, Planet};

/// Tutoring persona prompt, passed to the service unchanged.
pub const MISSION_COMMAND_SYSTEM_PROMPT: &str = include_str!("../prompts/mission_command.txt");

const PLANET_OVERVIEW_HEADER: &str = "PLANET PHYSICAL DATA OVERVIEW FOR YOUR REFERENCE (guide student to interpret spectra for atmosphere):";

/// One line of public physical data per catalog planet.
pub fn planet_overview(catalog: &Catalog) -> String {
    catalog
        .planets()
        .iter()
        .map(|p| {
            format!(
                "{} ({} AU): Orbital Period: {}, Surface Temp: {}, Diameter: {}x Earth.",
                p.name, p.distance_au, p.orbital_period, p.surface_temp, p.diameter_earths
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Persona prompt followed by the freshly computed planet overview.
pub fn system_instruction(catalog: &Catalog) -> String {
    format!(
        "{MISSION_COMMAND_SYSTEM_PROMPT}\n\n{PLANET_OVERVIEW_HEADER}\n{}",
        planet_overview(catalog)
    )
}

/// Wraps the student's raw text with the focused planet's context.
pub fn envelope(text: &str, planet: &Planet) -> String {
    format!(
        "The student is currently focused on planet {} (Distance: {} AU, Temp: {}). Their message is: \"{}\" Refer to the planet's spectrum display (spectra image) for this planet.",
        planet.name, planet.distance_au, planet.surface_temp, text
    )
}

/// Greeting appended when a planet comes into focus.
pub fn focus_greeting(planet: &Planet) -> String {
    format!(
        "Mission Command: Now focusing on {}. Your spectrum display is active. What are your initial observations regarding its spectra and physical data (distance, temperature, etc.)?",
        planet.name
    )
}

pub const RETURNING_TO_OVERVIEW: &str = "Returning to Solar System Overview.";

pub const CREDENTIALS_NOT_CONFIGURED: &str =
    "Mission Command cannot be reached. Please ensure the API_KEY is correctly configured.";

/// Notice for a failed background session start after the briefing.
pub fn connection_issue(reason: &str) -> String {
    format!("Mission Command connection issue: {reason}. Some features might be affected.")
}

/// Notice for a failed session start when focusing a planet.
pub fn focus_connection_failed(planet: &Planet) -> String {
    format!(
        "Error connecting to Mission Command for {}. Please check your connection.",
        planet.name
    )
}

/// Notice for a failed message exchange.
pub fn technical_difficulties(reason: &str) -> String {
    format!(
        "Mission Command is experiencing technical difficulties. Please try again later. (Error: {reason})"
    )
}
