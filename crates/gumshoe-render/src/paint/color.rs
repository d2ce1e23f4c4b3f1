use std::fmt;

/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

/// Returned by [`Color::from_hex`] for malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color literal {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    /// Fallback for sprites that never had a color assigned.
    pub const MAGENTA: Color = Color::from_premul(1.0, 0.0, 1.0, 1.0);

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components in `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a premultiplied color from straight bytes (`0`–`255`).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        // `from_str_radix` alone would accept a leading `+`.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| err())
        };

        match hex.len() {
            3 => Ok(Self::from_rgba_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            6 => Ok(Self::from_rgba_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// Formats as `#rrggbb` or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_straight_u8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    #[inline]
    pub fn to_straight_u8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        [to_u8(r), to_u8(g), to_u8(b), to_u8(a)]
    }

    /// Premultiplied bytes, the surface storage format.
    #[inline]
    pub fn to_premul_u8(self) -> [u8; 4] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }

    #[inline]
    pub fn from_premul_u8(px: [u8; 4]) -> Self {
        Self::from_premul(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }

    /// Scales every channel by `alpha` (global-alpha application).
    #[inline]
    pub fn faded(self, alpha: f32) -> Self {
        let k = alpha.clamp(0.0, 1.0);
        Self::from_premul(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    /// Source-over composition of `self` on top of `dst`.
    #[inline]
    pub fn over(self, dst: Color) -> Color {
        let k = 1.0 - self.a;
        Color::from_premul(
            self.r + dst.r * k,
            self.g + dst.g * k,
            self.b + dst.b * k,
            self.a + dst.a * k,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex() {
        let c = Color::from_hex("#FF0000").unwrap();
        assert_eq!(c.to_premul_u8(), [255, 0, 0, 255]);
    }

    #[test]
    fn parses_short_and_alpha_forms() {
        assert_eq!(Color::from_hex("#fff").unwrap().to_premul_u8(), [255, 255, 255, 255]);
        assert_eq!(Color::from_hex("00ff0080").unwrap().to_premul_u8(), [0, 128, 0, 128]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
        assert!(Color::from_hex("#+f+f+f").is_err());
        assert!(Color::from_hex("+0ff").is_err());
    }

    #[test]
    fn hex_round_trip_for_opaque() {
        assert_eq!(Color::from_hex("#1a2b3c").unwrap().to_hex(), "#1a2b3c");
    }

    #[test]
    fn over_opaque_source_replaces_destination() {
        let out = Color::from_hex("#ff0000").unwrap().over(Color::WHITE);
        assert_eq!(out.to_premul_u8(), [255, 0, 0, 255]);
    }

    #[test]
    fn faded_half_over_black() {
        let out = Color::WHITE.faded(0.5).over(Color::BLACK);
        assert_eq!(out.to_premul_u8(), [128, 128, 128, 255]);
    }
}
