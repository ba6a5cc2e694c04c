//! Shared UI theme constants.

use ratatui::style::Color;

pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(90, 90, 100);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const COORDINATOR: Color = Color::Cyan;
pub const ZEBRA: Color = Color::Rgb(28, 28, 34);

pub fn kind_color(kind: &str) -> Color {
    match kind {
        "prime" | "discovery" => Color::Green,
        "error" | "failure" => Color::Red,
        "warning" => Color::Yellow,
        _ => Color::Blue,
    }
}
