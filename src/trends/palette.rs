use std::fmt;

use serde::Serialize;

const SATURATION: u8 = 70;
const LIGHTNESS: u8 = 50;

/// Chart color in HSL space, rendered as a CSS `hsl()` value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HslColor {
    pub hue: f64,
    pub saturation: u8,
    pub lightness: u8,
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// `n` colors spread evenly around the hue circle, in index order.
///
/// Pure in `n`: index `i` always maps to hue `i * 360 / n`.
pub fn assign_colors(n: usize) -> Vec<HslColor> {
    (0..n)
        .map(|i| HslColor {
            hue: i as f64 * 360.0 / n as f64,
            saturation: SATURATION,
            lightness: LIGHTNESS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_colors_for_zero_entries() {
        assert!(assign_colors(0).is_empty());
    }

    #[test]
    fn single_color_starts_at_red() {
        let colors = assign_colors(1);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].to_string(), "hsl(0, 70%, 50%)");
    }

    #[test]
    fn four_colors_are_ninety_degrees_apart() {
        let hues: Vec<f64> = assign_colors(4).iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(assign_colors(7), assign_colors(7));
    }
}
