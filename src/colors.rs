//! Member color palette and text-contrast helpers.

use crate::error::{ChoreError, Result};

/// Color used for chores whose assignee is missing or unknown.
pub const NEUTRAL_COLOR: &str = "#cccccc";

/// Palette handed out to new team members, in order.
pub const DEFAULT_COLORS: [&str; 12] = [
    "#FF6B6B", // red
    "#4ECDC4", // teal
    "#45B7D1", // sky blue
    "#FFA07A", // light salmon
    "#98D8C8", // mint
    "#F7DC6F", // yellow
    "#BB8FCE", // purple
    "#85C1E2", // light blue
    "#F8B739", // orange
    "#52BE80", // green
    "#EC7063", // coral
    "#5DADE2", // dodger blue
];

/// Palette color for the `index`-th member, cycling when the palette runs out.
pub fn default_color(index: usize) -> &'static str {
    DEFAULT_COLORS[index % DEFAULT_COLORS.len()]
}

/// Parses `#rrggbb` (leading `#` optional) into RGB components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Validates and normalizes a user supplied color to `#rrggbb`.
pub fn normalize(color: &str) -> Result<String> {
    match parse_hex(color) {
        Some((r, g, b)) => Ok(format!("#{r:02x}{g:02x}{b:02x}")),
        None => Err(ChoreError::InvalidColor(color.to_string())),
    }
}

/// Black or white, whichever reads better on top of `background`.
///
/// Unparseable colors are treated as light.
pub fn contrast_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex(background) else {
        return "#000000";
    };
    let luminance = (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0;
    if luminance > 0.5 { "#000000" } else { "#FFFFFF" }
}
