#![forbid(unsafe_code)]

//! Line colouring by leading marker character.
//!
//! Console output lines start with a one-character marker and a space
//! (`"! "`, `"- "`, `"@ "`, ...). The marker picks the colour and is hidden
//! when the line is drawn.

/// Opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const LIME: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(100, 100, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const CYAN: Self = Self::new(0, 222, 205);
    pub const MAGENTA: Self = Self::new(255, 0, 255);
    pub const DARK_MAGENTA: Self = Self::new(155, 55, 170);
    pub const DARK_GREEN: Self = Self::new(25, 200, 50);
    pub const DARK_YELLOW: Self = Self::new(255, 228, 0);
    pub const DARK_GRAY: Self = Self::new(128, 128, 128);
    pub const LIGHT_CYAN: Self = Self::new(55, 155, 140);
    pub const LIGHT_YELLOW: Self = Self::new(205, 205, 105);
    pub const DARK_BLUE: Self = Self::new(128, 128, 250);
}

/// Chooses how a log line is drawn.
pub trait LineColorizer: Send {
    /// Colour for `line` and the number of leading chars to hide.
    fn line_color(&self, line: &str) -> (Rgb, usize);
}

/// Colour table keyed on the first character of a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixColorizer;

impl PrefixColorizer {
    /// Colour for a marker character, `None` when it is not a marker.
    #[must_use]
    pub fn marker_color(marker: char) -> Option<Rgb> {
        let color = match marker {
            '!' => Rgb::RED,
            '#' => Rgb::CYAN,
            '$' => Rgb::MAGENTA,
            '%' => Rgb::DARK_MAGENTA,
            '&' => Rgb::YELLOW,
            '*' => Rgb::DARK_GRAY,
            '+' => Rgb::LIGHT_CYAN,
            '-' => Rgb::LIME,
            '/' => Rgb::DARK_BLUE,
            '=' => Rgb::LIGHT_YELLOW,
            '@' => Rgb::BLUE,
            '^' => Rgb::DARK_GREEN,
            '~' => Rgb::DARK_YELLOW,
            _ => return None,
        };
        Some(color)
    }
}

impl LineColorizer for PrefixColorizer {
    fn line_color(&self, line: &str) -> (Rgb, usize) {
        let mut chars = line.chars();
        match chars.next().and_then(Self::marker_color) {
            Some(color) => {
                let hidden = if chars.next().is_some() { 2 } else { 1 };
                (color, hidden)
            }
            None => (Rgb::WHITE, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_pick_colors_and_hide_prefix() {
        let c = PrefixColorizer;
        assert_eq!(c.line_color("! boom"), (Rgb::RED, 2));
        assert_eq!(c.line_color("- fov 4"), (Rgb::LIME, 2));
        assert_eq!(c.line_color("@ help"), (Rgb::BLUE, 2));
        assert_eq!(c.line_color("~"), (Rgb::DARK_YELLOW, 1));
    }

    #[test]
    fn plain_lines_stay_white_and_whole() {
        let c = PrefixColorizer;
        assert_eq!(c.line_color("help  <...> info"), (Rgb::WHITE, 0));
        assert_eq!(c.line_color(""), (Rgb::WHITE, 0));
    }
}
