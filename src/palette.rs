//! Fixed colors for each chart type.

use plotters::style::RGBColor;

/// Bar fill.
pub const BAR_COLOR: RGBColor = RGBColor(0x4A, 0x90, 0xE2);
/// Line stroke and markers.
pub const LINE_COLOR: RGBColor = RGBColor(0x50, 0xE3, 0xC2);
/// Grid lines, drawn at partial opacity.
pub const GRID_COLOR: RGBColor = RGBColor(0xB0, 0xB0, 0xB0);
pub const GRID_ALPHA: f64 = 0.6;

/// Qualitative palette cycled through pie wedges in group order.
pub const WEDGE_COLORS: [RGBColor; 12] = [
    RGBColor(0x8D, 0xD3, 0xC7),
    RGBColor(0xFF, 0xFF, 0xB3),
    RGBColor(0xBE, 0xBA, 0xDA),
    RGBColor(0xFB, 0x80, 0x72),
    RGBColor(0x80, 0xB1, 0xD3),
    RGBColor(0xFD, 0xB4, 0x62),
    RGBColor(0xB3, 0xDE, 0x69),
    RGBColor(0xFC, 0xCD, 0xE5),
    RGBColor(0xD9, 0xD9, 0xD9),
    RGBColor(0xBC, 0x80, 0xBD),
    RGBColor(0xCC, 0xEB, 0xC5),
    RGBColor(0xFF, 0xED, 0x6F),
];

pub fn wedge_color(index: usize) -> RGBColor {
    WEDGE_COLORS[index % WEDGE_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wedge_colors_cycle() {
        assert_eq!(wedge_color(0), WEDGE_COLORS[0]);
        assert_eq!(wedge_color(11), WEDGE_COLORS[11]);
        assert_eq!(wedge_color(12), WEDGE_COLORS[0]);
        assert_eq!(wedge_color(25), WEDGE_COLORS[1]);
    }
}
