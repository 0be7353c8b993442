//! View state of the mission session.

use super::transcript::Transcript;
use crate::catalog::Planet;
use serde::Serialize;

/// The screen the student is on.
///
/// The focused planet lives inside `PlanetAnalysis`, so a planet is selected
/// exactly when the analysis view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewState {
    /// The briefing overlay gates all interaction.
    Briefing,
    /// The system map is interactive.
    SolarSystemOverview,
    /// One planet is under analysis and the chat is open.
    PlanetAnalysis {
        /// The focused planet.
        planet: &'static Planet,
    },
}

impl ViewState {
    /// Returns the focused planet, if any.
    pub fn focused_planet(&self) -> Option<&'static Planet> {
        match self {
            Self::PlanetAnalysis { planet } => Some(planet),
            _ => None,
        }
    }

    pub fn is_briefing(&self) -> bool {
        matches!(self, Self::Briefing)
    }

    /// Short label for logs and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Briefing => "briefing",
            Self::SolarSystemOverview => "overview",
            Self::PlanetAnalysis { .. } => "analysis",
        }
    }
}

/// Immutable copy of the session handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionSnapshot {
    pub view: ViewState,
    pub transcript: Transcript,
    pub pending_reply: bool,
    pub briefing_dismissed: bool,
}

impl MissionSnapshot {
    pub fn focused_planet(&self) -> Option<&'static Planet> {
        self.view.focused_planet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_focused_planet_only_in_analysis() {
        let planet = Catalog::seeded().planet("aerion").unwrap();

        assert!(ViewState::Briefing.focused_planet().is_none());
        assert!(ViewState::SolarSystemOverview.focused_planet().is_none());
        assert_eq!(
            ViewState::PlanetAnalysis { planet }.focused_planet().map(|p| p.id),
            Some("aerion")
        );
    }

    #[test]
    fn test_view_serializes_with_tag() {
        let planet = Catalog::seeded().planet("erebus").unwrap();
        let json = serde_json::to_value(ViewState::PlanetAnalysis { planet }).unwrap();
        assert_eq!(json["type"], "PlanetAnalysis");
        assert_eq!(json["data"]["planet"]["id"], "erebus");
    }
}
