//! Color definitions: categorical palette and the red-blue diverging scale.

use plotters::style::RGBColor;

/// Scatter points and regression lines
pub const PRIMARY_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue

pub const PALETTE: [RGBColor; 10] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
    RGBColor(233, 30, 99),   // Pink
    RGBColor(0, 188, 212),   // Cyan
    RGBColor(255, 87, 34),   // Deep Orange
    RGBColor(121, 85, 72),   // Brown
];

/// ColorBrewer RdBu, dark red through white to dark blue.
const RD_BU: [(u8, u8, u8); 11] = [
    (103, 0, 31),
    (178, 24, 43),
    (214, 96, 77),
    (244, 165, 130),
    (253, 219, 199),
    (247, 247, 247),
    (209, 229, 240),
    (146, 197, 222),
    (67, 147, 195),
    (33, 102, 172),
    (5, 48, 97),
];

/// Color for the `index`-th category.
pub fn palette_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Sample the RdBu scale at `t` in [0, 1]: low values red, high values blue.
pub fn rd_bu(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let pos = t * (RD_BU.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(RD_BU.len() - 1);
    let frac = pos - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = RD_BU[lower];
    let (r1, g1, b1) = RD_BU[upper];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Map `value` within `[min, max]` onto the RdBu scale.
pub fn rd_bu_scaled(value: f64, min: f64, max: f64) -> RGBColor {
    if max > min {
        rd_bu((value - min) / (max - min))
    } else {
        rd_bu(0.5)
    }
}
