//! Team livery colors.

/// Color used for any team missing from the table.
pub const DEFAULT_TEAM_COLOR: &str = "#333333";

const TEAM_COLORS: &[(&str, &str)] = &[
    ("Red Bull Racing", "#0600EF"),
    ("Red Bull", "#0600EF"),
    ("Mercedes", "#00D2BE"),
    ("Ferrari", "#DC0000"),
    ("McLaren", "#FF8700"),
    ("Aston Martin", "#006F62"),
    ("Alpine", "#0090FF"),
    ("Alpine F1 Team", "#0090FF"),
    ("Williams", "#005AFF"),
    ("AlphaTauri", "#2B4562"),
    ("RB F1 Team", "#2B4562"),
    ("Alfa Romeo", "#900000"),
    ("Sauber", "#900000"),
    ("Haas F1 Team", "#FFFFFF"),
];

/// Hex color for a team name. Never fails; unknown teams get
/// [`DEFAULT_TEAM_COLOR`].
#[must_use]
pub fn team_color(team_name: &str) -> &'static str {
    TEAM_COLORS
        .iter()
        .find(|(name, _)| *name == team_name)
        .map_or(DEFAULT_TEAM_COLOR, |(_, color)| color)
}
