//! Color gradients for score based node coloring
use std::fmt::Display;
use std::str::FromStr;

use crate::EdamError;

/// Fill color of uncolored nodes
pub const WHITE: &str = "#ffffff";

/// Target colors of a white -> color gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// `#ff0000`
    #[default]
    Red,
    /// `#00ff00`
    Green,
    /// `#0000ff`
    Blue,
    /// `#ffa500`
    Orange,
    /// `#ffff00`
    Yellow,
    /// `#ffc0cb`
    Pink,
    /// `#808080`
    Grey,
}

impl Palette {
    /// RGB values of the target color
    pub fn target(&self) -> (u8, u8, u8) {
        match self {
            Palette::Red => (255, 0, 0),
            Palette::Green => (0, 255, 0),
            Palette::Blue => (0, 0, 255),
            Palette::Orange => (255, 165, 0),
            Palette::Yellow => (255, 255, 0),
            Palette::Pink => (255, 192, 203),
            Palette::Grey => (128, 128, 128),
        }
    }

    /// Returns the color at `fraction` of the way from white to the target color
    ///
    /// `fraction` is clamped to `[0, 1]`.
    pub fn interpolate(&self, fraction: f64) -> String {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let channel = |target: u8| -> u8 { (255.0 - fraction * (255.0 - f64::from(target))) as u8 };
        let (r, g, b) = self.target();
        format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Palette::Red => "red",
            Palette::Green => "green",
            Palette::Blue => "blue",
            Palette::Orange => "orange",
            Palette::Yellow => "yellow",
            Palette::Pink => "pink",
            Palette::Grey => "grey",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Palette {
    type Err = EdamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "red" => Ok(Palette::Red),
            "green" => Ok(Palette::Green),
            "blue" => Ok(Palette::Blue),
            "orange" => Ok(Palette::Orange),
            "yellow" => Ok(Palette::Yellow),
            "pink" => Ok(Palette::Pink),
            "grey" | "gray" => Ok(Palette::Grey),
            _ => Err(EdamError::InvalidInput(format!("unknown color `{s}`"))),
        }
    }
}

/// Returns the hex color of `score` on a gradient from white (0) to `color`
/// (at `max`)
///
/// An unknown color name results in white. If `max` is not positive, every
/// score is white.
///
/// # Examples
///
/// ```
/// use edamannot::graph::score_color;
///
/// assert_eq!(score_color(0.0, 10.0, "red"), "#ffffff");
/// assert_eq!(score_color(10.0, 10.0, "red"), "#ff0000");
/// assert_eq!(score_color(5.0, 10.0, "blue"), "#7f7fff");
/// assert_eq!(score_color(5.0, 10.0, "purple"), "#ffffff");
/// ```
pub fn score_color(score: f64, max: f64, color: &str) -> String {
    let Ok(palette) = color.parse::<Palette>() else {
        return WHITE.to_string();
    };
    let fraction = if max > 0.0 { score / max } else { 0.0 };
    palette.interpolate(fraction)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gradient() {
        assert_eq!(Palette::Red.interpolate(0.0), WHITE);
        assert_eq!(Palette::Orange.interpolate(1.0), "#ffa500");
        assert_eq!(Palette::Grey.interpolate(0.5), "#bfbfbf");
        assert_eq!(Palette::Green.interpolate(2.0), "#00ff00");
        assert_eq!(Palette::Green.interpolate(-1.0), WHITE);
    }

    #[test]
    fn unknown_color() {
        assert_eq!(score_color(1.0, 1.0, "magenta"), WHITE);
        assert!("magenta".parse::<Palette>().is_err());
        assert_eq!("Pink".parse::<Palette>().unwrap(), Palette::Pink);
    }

    #[test]
    fn zero_max() {
        assert_eq!(score_color(0.0, 0.0, "red"), WHITE);
    }
}
