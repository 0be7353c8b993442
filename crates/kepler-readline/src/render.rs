//! Terminal rendering of mission snapshots.
//!
//! Everything here reads the catalog or a `MissionSnapshot`; nothing mutates
//! the mission.

use colored::{Color, Colorize};
use kepler_core::catalog::{Catalog, MISSION_BRIEFING_TITLE, Planet};
use kepler_core::session::{ChatMessage, MessageRole, MissionSnapshot, ViewState};

/// Maps a palette token such as `"blue-400"` to the nearest terminal color.
pub fn palette_color(token: &str) -> Color {
    let hue = token.split('-').next().unwrap_or(token);
    match hue {
        "red" => Color::Red,
        "blue" | "sky" => Color::Blue,
        "green" | "emerald" => Color::Green,
        "yellow" | "amber" => Color::Yellow,
        "purple" | "violet" | "indigo" => Color::Magenta,
        "cyan" | "teal" => Color::Cyan,
        "gray" | "slate" => Color::BrightBlack,
        _ => Color::White,
    }
}

pub fn briefing(catalog: &Catalog) {
    println!("{}", MISSION_BRIEFING_TITLE.bright_magenta().bold());
    println!();
    for line in catalog.briefing().lines() {
        println!("{line}");
    }
    println!();
    println!("{}", "Type /start to begin the mission.".bright_black());
}

pub fn overview(catalog: &Catalog) {
    let star = catalog.star();
    println!("{}", format!("=== {} System ===", star.name).bright_magenta().bold());
    println!("{} {}", "Star:".bright_black(), star.spectral_type);
    println!("{} {}", "Habitable zone:".bright_black(), star.habitable_zone);
    println!();
    for planet in catalog.planets_by_distance() {
        let marker = if star.in_habitable_zone(planet) { "*" } else { " " };
        println!(
            " {} {} {:>5} AU  {}",
            marker.green(),
            format!("{:<14}", planet.name).color(palette_color(planet.colors.body)),
            planet.distance_au,
            planet.id.bright_black()
        );
    }
    println!();
    println!(
        "{}",
        "* inside the habitable zone. Use /select <planet> to analyse one.".bright_black()
    );
}

pub fn planet_details(planet: &Planet) {
    let accent = palette_color(planet.colors.accent);
    println!("{}", format!("=== {} ===", planet.name).color(accent).bold());
    println!("  {:<16}{} AU", "Distance:", planet.distance_au);
    println!("  {:<16}{}", "Orbital period:", planet.orbital_period);
    println!("  {:<16}{}", "Surface temp:", planet.surface_temp);
    println!("  {:<16}{}x Earth", "Diameter:", planet.diameter_earths);
    println!("  {:<16}{}", "Spectrum:", planet.spectra_image.bright_black());
}

pub fn reference_spectra(catalog: &Catalog) {
    println!("{}", "Reference spectra:".bright_yellow());
    for spectrum in catalog.reference_spectra() {
        println!(
            "  {:<5} {:<22} {}",
            spectrum.id,
            spectrum.name,
            spectrum.image_path.bright_black()
        );
    }
}

/// Panels making up each view, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Briefing,
    Overview,
    PlanetDetails,
    ReferenceSpectra,
    ChatHint,
}

fn sections(view: &ViewState) -> &'static [Section] {
    match view {
        ViewState::Briefing => &[Section::Briefing],
        ViewState::SolarSystemOverview => &[Section::Overview],
        ViewState::PlanetAnalysis { .. } => &[
            Section::PlanetDetails,
            Section::ReferenceSpectra,
            Section::ChatHint,
        ],
    }
}

/// Renders whatever the current view shows.
pub fn view(catalog: &Catalog, snapshot: &MissionSnapshot) {
    for (index, section) in sections(&snapshot.view).iter().enumerate() {
        if index > 0 {
            println!();
        }
        match section {
            Section::Briefing => briefing(catalog),
            Section::Overview => overview(catalog),
            Section::PlanetDetails => {
                if let Some(planet) = snapshot.focused_planet() {
                    planet_details(planet);
                }
            }
            Section::ReferenceSpectra => reference_spectra(catalog),
            Section::ChatHint => println!(
                "{}",
                "Chat with Mission Command by typing. /back returns to the system map."
                    .bright_black()
            ),
        }
    }
}

pub fn message(message: &ChatMessage) {
    match message.role {
        MessageRole::User => println!("{}", format!("> {}", message.text).green()),
        MessageRole::Assistant => {
            println!("{}", "[Mission Command]".bright_magenta());
            for line in message.text.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
        MessageRole::SystemNotice => println!("{}", message.text.yellow()),
    }
}

pub fn status(snapshot: &MissionSnapshot, session_open: bool) {
    let focus = snapshot
        .focused_planet()
        .map(|planet| planet.name)
        .unwrap_or("none");
    println!("{} {}", "View:".bright_black(), snapshot.view.label());
    println!("{} {}", "Focused planet:".bright_black(), focus);
    println!(
        "{} {}",
        "Messages:".bright_black(),
        snapshot.transcript.len()
    );
    println!(
        "{} {}",
        "Awaiting reply:".bright_black(),
        if snapshot.pending_reply { "yes" } else { "no" }
    );
    println!(
        "{} {}",
        "Mission Command link:".bright_black(),
        if session_open { "open" } else { "not established" }
    );
}

pub fn help() {
    println!("{}", "Commands:".bright_yellow());
    let rows = [
        ("/start", "dismiss the briefing and open the system map"),
        ("/select <planet>", "analyse a planet (id or name)"),
        ("/spectra", "list the reference gas spectra"),
        ("/ask <question>", "quick question outside the mission chat"),
        ("/back", "return to the system overview"),
        ("/status", "show the mission state"),
        ("/reset", "reconnect to Mission Command on the next message"),
        ("quit", "leave the explorer"),
    ];
    for (command, description) in rows {
        println!("  {} {}", format!("{command:<18}").bright_cyan(), description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_tokens() {
        assert_eq!(palette_color("blue-400"), Color::Blue);
        assert_eq!(palette_color("indigo-700"), Color::Magenta);
        assert_eq!(palette_color("gray-600"), Color::BrightBlack);
        assert_eq!(palette_color("unknown"), Color::White);
    }

    #[test]
    fn test_analysis_view_shows_reference_spectra() {
        let planet = Catalog::seeded().planet("aerion").unwrap();
        let analysis = sections(&ViewState::PlanetAnalysis { planet });

        assert_eq!(analysis[0], Section::PlanetDetails);
        assert!(analysis.contains(&Section::ReferenceSpectra));
        assert_eq!(sections(&ViewState::SolarSystemOverview), &[Section::Overview]);
    }

    #[test]
    fn test_every_seeded_planet_has_a_color() {
        let catalog = Catalog::seeded();
        for planet in catalog.planets() {
            assert_ne!(palette_color(planet.colors.body), Color::White, "{}", planet.id);
        }
    }
}
