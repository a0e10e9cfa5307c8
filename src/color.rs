use crate::Scalar;
use bytemuck::{Pod, Zeroable};
use std::{fmt, str::FromStr};

/// sRGB color with straight (not premultiplied) alpha, stored as `[r, g, b, a]` bytes
///
/// Layout is guaranteed, so a slice of pixels can be reinterpreted as RGBA8 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[repr(transparent)]
pub struct RGBA([u8; 4]);

impl RGBA {
    pub const BLACK: RGBA = RGBA::new(0, 0, 0, 255);
    pub const WHITE: RGBA = RGBA::new(255, 255, 255, 255);
    pub const TRANSPARENT: RGBA = RGBA::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn red(self) -> u8 {
        self.0[0]
    }

    pub const fn green(self) -> u8 {
        self.0[1]
    }

    pub const fn blue(self) -> u8 {
        self.0[2]
    }

    pub const fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Convert color to sRGBA list
    pub const fn to_rgba(self) -> [u8; 4] {
        self.0
    }

    /// Convert color to sRGB list (alpha is discarded)
    pub fn to_rgb(self) -> [u8; 3] {
        let [r, g, b, _] = self.0;
        [r, g, b]
    }

    /// Calculate LUMA of the color.
    pub fn luma(self) -> f32 {
        let [r, g, b] = self.to_rgb();
        0.2126 * (r as f32 / 255.0) + 0.7152 * (g as f32 / 255.0) + 0.0722 * (b as f32 / 255.0)
    }

    /// Pick color that produces the best contrast with self
    pub fn best_contrast(self, c0: Self, c1: Self) -> Self {
        let luma = self.luma();
        if (luma - c0.luma()).abs() < (luma - c1.luma()).abs() {
            c1
        } else {
            c0
        }
    }

    /// Multiply alpha component by `alpha` (clamped to `0..1`)
    pub fn with_alpha(self, alpha: Scalar) -> Self {
        let [r, g, b, a] = self.0;
        let alpha = crate::utils::clamp(alpha, 0.0, 1.0);
        Self([r, g, b, (a as Scalar * alpha + 0.5) as u8])
    }

    /// Alpha premultiplied components in `0..1` range
    pub fn to_premultiplied(self) -> [f32; 4] {
        let [r, g, b, a] = self.0;
        let a = a as f32 / 255.0;
        [
            r as f32 / 255.0 * a,
            g as f32 / 255.0 * a,
            b as f32 / 255.0 * a,
            a,
        ]
    }

    /// Build color from alpha premultiplied components in `0..1` range
    pub fn from_premultiplied([r, g, b, a]: [f32; 4]) -> Self {
        if a <= 1e-6 {
            return Self::TRANSPARENT;
        }
        let channel = |c: f32| (crate::utils::clamp(c / a, 0.0, 1.0) * 255.0 + 0.5) as u8;
        let a = (crate::utils::clamp(a, 0.0, 1.0) * 255.0 + 0.5) as u8;
        Self([channel(r), channel(g), channel(b), a])
    }

    /// Blend other color on top of this color
    pub fn blend_over(self, other: Self) -> Self {
        match other.alpha() {
            255 => return other,
            0 => return self,
            _ => {}
        }
        let [dr, dg, db, da] = self.to_premultiplied();
        let [sr, sg, sb, sa] = other.to_premultiplied();
        let rest = 1.0 - sa;
        Self::from_premultiplied([sr + dr * rest, sg + dg * rest, sb + db * rest, sa + da * rest])
    }
}

impl fmt::Debug for RGBA {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [bg_r, bg_g, bg_b] = self.to_rgb();
        let [fg_r, fg_g, fg_b] = self.best_contrast(RGBA::WHITE, RGBA::BLACK).to_rgb();
        write!(
            fmt,
            "\x1b[38;2;{};{};{};48;2;{};{};{}m",
            fg_r, fg_g, fg_b, bg_r, bg_g, bg_b
        )?;
        write!(fmt, "{}", self)?;
        write!(fmt, "\x1b[m")
    }
}

impl fmt::Display for RGBA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if a != 255 {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}

impl FromStr for RGBA {
    type Err = ColorError;

    fn from_str(color: &str) -> Result<Self, Self::Err> {
        let color = color.trim();
        if color.starts_with('#') && (color.len() == 7 || color.len() == 9) {
            // #RRGGBB(AA)
            let bytes: &[u8] = color[1..].as_ref();
            let digit = |byte| match byte {
                b'A'..=b'F' => Ok(byte - b'A' + 10),
                b'a'..=b'f' => Ok(byte - b'a' + 10),
                b'0'..=b'9' => Ok(byte - b'0'),
                _ => Err(ColorError::HexExpected),
            };
            let mut hex = bytes
                .chunks(2)
                .map(|pair| Ok(digit(pair[0])? << 4 | digit(pair[1])?));
            Ok(RGBA::new(
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(0))?,
                hex.next().unwrap_or(Ok(255))?,
            ))
        } else {
            Err(ColorError::HexExpected)
        }
    }
}

impl From<[u8; 4]> for RGBA {
    fn from(rgba: [u8; 4]) -> Self {
        Self(rgba)
    }
}

impl TryFrom<String> for RGBA {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RGBA> for String {
    fn from(color: RGBA) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone)]
pub enum ColorError {
    HexExpected,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::HexExpected => {
                write!(f, "Color expected to be #RRGGBB(AA) in hexidemical format")
            }
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_u8() {
        let c = RGBA::new(1, 2, 3, 4);
        assert_eq!([1, 2, 3, 4], c.to_rgba());
        assert_eq!(1, c.red());
        assert_eq!(2, c.green());
        assert_eq!(3, c.blue());
        assert_eq!(4, c.alpha());
        let pixels = [c, RGBA::WHITE];
        let bytes: &[u8] = bytemuck::cast_slice(&pixels);
        assert_eq!(bytes, &[1, 2, 3, 4, 255, 255, 255, 255]);
    }

    #[test]
    fn test_display_parse() -> Result<(), ColorError> {
        let c: RGBA = "#01020304".parse()?;
        assert_eq!(c, RGBA::new(1, 2, 3, 4));
        assert_eq!(c.to_string(), "#01020304");

        let c: RGBA = "#AABBCC".parse()?;
        assert_eq!(c, RGBA::new(170, 187, 204, 255));
        assert_eq!(c.to_string(), "#aabbcc");

        assert!("#abc".parse::<RGBA>().is_err());
        assert!("#gg0000".parse::<RGBA>().is_err());
        assert!("red".parse::<RGBA>().is_err());
        Ok(())
    }

    #[test]
    fn test_blend_over() {
        let bg = RGBA::new(255, 255, 255, 255);
        assert_eq!(bg.blend_over(RGBA::new(0, 0, 0, 255)), RGBA::BLACK);
        assert_eq!(bg.blend_over(RGBA::TRANSPARENT), bg);
        assert_eq!(bg.blend_over(RGBA::new(0, 0, 0, 128)), RGBA::new(127, 127, 127, 255));
        // transparent destination takes the source color as is
        let red = RGBA::new(255, 0, 0, 100);
        assert_eq!(RGBA::TRANSPARENT.blend_over(red), red);
    }

    #[test]
    fn test_premultiplied() {
        let c = RGBA::new(200, 100, 50, 51);
        assert_eq!(RGBA::from_premultiplied(c.to_premultiplied()), c);
        assert_eq!(RGBA::from_premultiplied([0.5, 0.5, 0.5, 0.0]), RGBA::TRANSPARENT);
        assert_eq!(RGBA::BLACK.with_alpha(0.5), RGBA::new(0, 0, 0, 128));
    }
}
