//! Chart colors. Pie slices take evenly spaced colors from a trimmed sequential ramp,
//! in breakdown order, so the same input always gets the same colors.

use kopilka_core::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Daily bar colors
pub const INCOME_BAR: Rgb = Rgb(0x21, 0x3a, 0x85);
pub const EXPENSE_BAR: Rgb = Rgb(0xe4, 0x3b, 0x29);

/// Part of the ramp used for slices; the palest and darkest ends are skipped
pub const RAMP_START: f64 = 0.2;
pub const RAMP_END: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Blues,
    Reds,
}

const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

const REDS: [Rgb; 9] = [
    Rgb(0xff, 0xf5, 0xf0),
    Rgb(0xfe, 0xe0, 0xd2),
    Rgb(0xfc, 0xbb, 0xa1),
    Rgb(0xfc, 0x92, 0x72),
    Rgb(0xfb, 0x6a, 0x4a),
    Rgb(0xef, 0x3b, 0x2c),
    Rgb(0xcb, 0x18, 0x1d),
    Rgb(0xa5, 0x0f, 0x15),
    Rgb(0x67, 0x00, 0x0d),
];

impl Ramp {
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Income => Ramp::Blues,
            Direction::Expense => Ramp::Reds,
        }
    }

    fn anchors(&self) -> &'static [Rgb; 9] {
        match self {
            Ramp::Blues => &BLUES,
            Ramp::Reds => &REDS,
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped), piecewise linear between anchors
    pub fn at(&self, t: f64) -> Rgb {
        let anchors = self.anchors();
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (anchors.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(anchors.len() - 2);
        Rgb::lerp(anchors[i], anchors[i + 1], scaled - i as f64)
    }
}

/// `n` colors evenly spaced over the trimmed ramp, lightest first
pub fn slice_colors(ramp: Ramp, n: usize) -> Vec<Rgb> {
    match n {
        0 => Vec::new(),
        1 => vec![ramp.at(RAMP_START)],
        _ => (0..n)
            .map(|i| {
                let t = RAMP_START + (RAMP_END - RAMP_START) * i as f64 / (n - 1) as f64;
                ramp.at(t)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(Ramp::Blues.at(0.0), BLUES[0]);
        assert_eq!(Ramp::Blues.at(1.0), BLUES[8]);
        assert_eq!(Ramp::Reds.at(2.0), REDS[8]);
        assert_eq!(Ramp::Reds.at(0.5), REDS[4]);
    }

    #[test]
    fn test_slice_colors_span_trimmed_range() {
        let colors = slice_colors(Ramp::Blues, 3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], Ramp::Blues.at(RAMP_START));
        assert_eq!(colors[2], Ramp::Blues.at(RAMP_END));
        assert!(slice_colors(Ramp::Reds, 0).is_empty());
        assert_eq!(slice_colors(Ramp::Reds, 1), vec![Ramp::Reds.at(RAMP_START)]);
    }

    #[test]
    fn test_hex() {
        assert_eq!(INCOME_BAR.hex(), "#213a85");
        assert_eq!(EXPENSE_BAR.hex(), "#e43b29");
    }
}
