//! Dimension units
//!
//! Distances are given either as bare numbers, interpreted in a default unit, or as
//! strings with a unit suffix (`"2cm"`, `"5%min"`, `"0.5 * 3x"`). The numeric body of a
//! string distance is an arithmetic expression over `+ - * /` and parentheses.
use crate::{CanvasError, Result, Scalar};
use std::{fmt, str::FromStr};

/// Inches per millimetre
const INCH_PER_MM: Scalar = 0.0393700787;
/// Inches per centimetre
const INCH_PER_CM: Scalar = 0.393700787;
/// Type points per inch
const POINTS_PER_INCH: Scalar = 72.0;
/// Maximum nesting of parentheses inside of the distance expression
const MAX_EXPR_DEPTH: usize = 64;

/// Unit of a distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Unit {
    /// Pixels
    Px,
    /// Type points, 1/72 of an inch
    Pt,
    /// Inches
    In,
    /// Millimetres
    Mm,
    /// Centimetres
    Cm,
    /// Percent of the canvas width
    PercentWidth,
    /// Percent of the canvas height
    PercentHeight,
    /// Percent of the shorter canvas side
    PercentMin,
    /// Percent of the longer canvas side
    PercentMax,
    /// Coordinate space x units
    X,
    /// Coordinate space y units
    Y,
}

impl Unit {
    /// All units ordered by decreasing suffix length
    pub const ALL: [Unit; 11] = [
        Unit::PercentMin,
        Unit::PercentMax,
        Unit::PercentWidth,
        Unit::PercentHeight,
        Unit::Px,
        Unit::Pt,
        Unit::In,
        Unit::Mm,
        Unit::Cm,
        Unit::X,
        Unit::Y,
    ];

    pub fn suffix(self) -> &'static str {
        use Unit::*;
        match self {
            Px => "px",
            Pt => "pt",
            In => "in",
            Mm => "mm",
            Cm => "cm",
            PercentWidth => "%w",
            PercentHeight => "%h",
            PercentMin => "%min",
            PercentMax => "%max",
            X => "x",
            Y => "y",
        }
    }

    /// Whether pixel value depends on pixels per inch
    pub fn is_physical(self) -> bool {
        matches!(self, Unit::Pt | Unit::In | Unit::Mm | Unit::Cm)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Unit {
    type Err = CanvasError;

    fn from_str(suffix: &str) -> Result<Self> {
        let suffix = suffix.trim();
        Unit::ALL
            .into_iter()
            .find(|unit| unit.suffix() == suffix)
            .ok_or_else(|| CanvasError::UnrecognizedUnit(suffix.to_owned()))
    }
}

impl TryFrom<String> for Unit {
    type Error = CanvasError;

    fn try_from(suffix: String) -> Result<Self> {
        suffix.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.suffix().to_owned()
    }
}

/// Distance as provided by the caller, either a number in the default unit or a
/// string with an optional unit suffix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Dist {
    Number(Scalar),
    Text(String),
}

impl Dist {
    /// Parse into value and unit, numbers and suffix-less strings get `default_unit`
    pub fn to_length(&self, default_unit: Unit) -> Result<Length> {
        match self {
            Dist::Number(value) => Ok(Length::new(*value, default_unit)),
            Dist::Text(text) => Length::parse(text, default_unit),
        }
    }
}

impl From<Scalar> for Dist {
    fn from(value: Scalar) -> Self {
        Dist::Number(value)
    }
}

impl From<i32> for Dist {
    fn from(value: i32) -> Self {
        Dist::Number(value as Scalar)
    }
}

impl From<&str> for Dist {
    fn from(text: &str) -> Self {
        Dist::Text(text.to_owned())
    }
}

impl From<String> for Dist {
    fn from(text: String) -> Self {
        Dist::Text(text)
    }
}

impl From<Length> for Dist {
    fn from(length: Length) -> Self {
        Dist::Text(length.to_string())
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dist::Number(value) => write_scalar(f, *value),
            Dist::Text(text) => f.write_str(text),
        }
    }
}

/// Distance with resolved numeric value and unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: Scalar,
    pub unit: Unit,
}

impl Length {
    pub fn new(value: Scalar, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Parse distance string, the trailing run of letters and `%` is the unit suffix,
    /// everything before it is evaluated as an arithmetic expression.
    pub fn parse(text: &str, default_unit: Unit) -> Result<Self> {
        let text = text.trim();
        let body_len = text
            .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
            .len();
        let (body, suffix) = text.split_at(body_len);
        let unit = if suffix.is_empty() {
            default_unit
        } else {
            suffix.parse()?
        };
        let value = ExprParser::new(body).parse()?;
        Ok(Self::new(value, unit))
    }

    /// Convert to pixels within the provided unit context
    pub fn to_px(&self, ctx: &UnitContext) -> Result<Scalar> {
        use Unit::*;
        let value = self.value;
        let (width, height) = ctx.canvas_size;
        let pixels = match self.unit {
            Px => value,
            Pt => value / POINTS_PER_INCH * ctx.ppi,
            In => value * ctx.ppi,
            Mm => value * INCH_PER_MM * ctx.ppi,
            Cm => value * INCH_PER_CM * ctx.ppi,
            PercentWidth => width / 100.0 * value,
            PercentHeight => height / 100.0 * value,
            PercentMin => width.min(height) / 100.0 * value,
            PercentMax => width.max(height) / 100.0 * value,
            X => {
                let (coord_width, _) = ctx.coord_size;
                if coord_width == 0.0 {
                    return Err(CanvasError::ZeroDivision);
                }
                width * (value / coord_width)
            }
            Y => {
                let (_, coord_height) = ctx.coord_size;
                if coord_height == 0.0 {
                    return Err(CanvasError::ZeroDivision);
                }
                height * (value / coord_height)
            }
        };
        Ok(pixels)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scalar(f, self.value)?;
        write!(f, "{}", self.unit)
    }
}

fn write_scalar(f: &mut fmt::Formatter<'_>, value: Scalar) -> fmt::Result {
    let mut buffer = [0u8; lexical_core::BUFFER_SIZE];
    let digits = lexical_core::write(value, &mut buffer);
    match std::str::from_utf8(digits) {
        Ok(digits) => f.write_str(digits),
        Err(_) => write!(f, "{}", value),
    }
}

/// Everything needed to resolve a distance into pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
    /// Pixels per inch
    pub ppi: Scalar,
    /// Unit of bare numbers
    pub default_unit: Unit,
    /// Canvas size in pixels
    pub canvas_size: (Scalar, Scalar),
    /// Unsigned coordinate space size
    pub coord_size: (Scalar, Scalar),
}

impl UnitContext {
    /// Resolve distance to pixels
    pub fn to_px(&self, dist: &Dist) -> Result<Scalar> {
        dist.to_length(self.default_unit)?.to_px(self)
    }

    /// Same context with different default unit
    pub fn with_default_unit(&self, default_unit: Unit) -> Self {
        Self {
            default_unit,
            ..*self
        }
    }

    /// Convert horizontal pixel distance into coordinate x units
    pub fn px_to_x(&self, pixels: Scalar) -> Result<Scalar> {
        let (width, _) = self.canvas_size;
        if width == 0.0 {
            return Err(CanvasError::ZeroDivision);
        }
        Ok(self.coord_size.0 * (pixels / width))
    }

    /// Convert vertical pixel distance into coordinate y units
    pub fn px_to_y(&self, pixels: Scalar) -> Result<Scalar> {
        let (_, height) = self.canvas_size;
        if height == 0.0 {
            return Err(CanvasError::ZeroDivision);
        }
        Ok(self.coord_size.1 * (pixels / height))
    }
}

/// Resolve distance to pixels
pub fn parse_dist(
    dist: &Dist,
    ppi: Scalar,
    default_unit: Unit,
    canvas_size: (Scalar, Scalar),
    coord_size: (Scalar, Scalar),
) -> Result<Scalar> {
    let ctx = UnitContext {
        ppi,
        default_unit,
        canvas_size,
        coord_size,
    };
    ctx.to_px(dist)
}

/// Recursive descent evaluator of the distance body
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := ('+' | '-') factor | '(' expr ')' | number
/// ```
struct ExprParser<'a> {
    text: &'a str,
    input: &'a [u8],
    offset: usize,
    depth: usize,
}

impl<'a> ExprParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            input: text.as_bytes(),
            offset: 0,
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Scalar> {
        let value = self.parse_expr()?;
        self.parse_separators();
        if self.offset != self.input.len() || !value.is_finite() {
            return Err(self.error());
        }
        Ok(value)
    }

    fn error(&self) -> CanvasError {
        CanvasError::MalformedDistance(self.text.to_owned())
    }

    // consume whitespace
    fn parse_separators(&mut self) {
        while let Some(byte) = self.input.get(self.offset) {
            if !byte.is_ascii_whitespace() {
                break;
            }
            self.offset += 1;
        }
    }

    // consume single operator byte if it is one of `ops`
    fn parse_op(&mut self, ops: &[u8]) -> Option<u8> {
        self.parse_separators();
        let byte = *self.input.get(self.offset)?;
        if ops.contains(&byte) {
            self.offset += 1;
            Some(byte)
        } else {
            None
        }
    }

    fn parse_expr(&mut self) -> Result<Scalar> {
        let mut value = self.parse_term()?;
        while let Some(op) = self.parse_op(b"+-") {
            let rhs = self.parse_term()?;
            if op == b'+' {
                value += rhs;
            } else {
                value -= rhs;
            }
        }
        Ok(value)
    }

    fn parse_term(&mut self) -> Result<Scalar> {
        let mut value = self.parse_factor()?;
        while let Some(op) = self.parse_op(b"*/") {
            let rhs = self.parse_factor()?;
            if op == b'*' {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(CanvasError::ZeroDivision);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    fn parse_factor(&mut self) -> Result<Scalar> {
        if let Some(op) = self.parse_op(b"+-") {
            let value = self.parse_factor()?;
            return Ok(if op == b'-' { -value } else { value });
        }
        if self.parse_op(b"(").is_some() {
            self.depth += 1;
            if self.depth > MAX_EXPR_DEPTH {
                return Err(self.error());
            }
            let value = self.parse_expr()?;
            if self.parse_op(b")").is_none() {
                return Err(self.error());
            }
            self.depth -= 1;
            return Ok(value);
        }
        self.parse_number()
    }

    fn parse_number(&mut self) -> Result<Scalar> {
        self.parse_separators();
        let rest = &self.input[self.offset..];
        if !matches!(rest.first(), Some(byte) if byte.is_ascii_digit() || *byte == b'.') {
            return Err(self.error());
        }
        let (value, count) =
            lexical_core::parse_partial::<Scalar>(rest).map_err(|_| self.error())?;
        if count == 0 {
            return Err(self.error());
        }
        self.offset += count;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn ctx(ppi: Scalar, canvas_size: (Scalar, Scalar), coord_size: (Scalar, Scalar)) -> UnitContext {
        UnitContext {
            ppi,
            default_unit: Unit::Px,
            canvas_size,
            coord_size,
        }
    }

    #[test]
    fn test_unit_identities() -> Result<()> {
        let c = ctx(300.0, (200.0, 100.0), (1.0, 1.0));
        assert_approx_eq!(c.to_px(&"100px".into())?, 100.0);
        assert_approx_eq!(c.to_px(&"50%w".into())?, 100.0);
        assert_approx_eq!(c.to_px(&"1in".into())?, 300.0);
        Ok(())
    }

    #[test]
    fn test_all_units() -> Result<()> {
        let c = ctx(72.0, (200.0, 100.0), (50.0, 400.0));
        let cases: &[(&str, Scalar)] = &[
            ("10px", 10.0),
            ("36pt", 36.0),
            ("2in", 144.0),
            ("10mm", 10.0 * 0.0393700787 * 72.0),
            ("1cm", 0.393700787 * 72.0),
            ("10%w", 20.0),
            ("10%h", 10.0),
            ("10%min", 10.0),
            ("10%max", 20.0),
            ("5x", 20.0),
            ("100y", 25.0),
        ];
        for (text, expected) in cases {
            assert_approx_eq!(c.to_px(&(*text).into())?, *expected, 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_ppi_affects_physical_only() -> Result<()> {
        let low = ctx(72.0, (200.0, 100.0), (10.0, 10.0));
        let high = ctx(300.0, (200.0, 100.0), (10.0, 10.0));
        for unit in Unit::ALL {
            let dist = Length::new(3.0, unit);
            let (lo, hi) = (dist.to_px(&low)?, dist.to_px(&high)?);
            if unit.is_physical() {
                assert_approx_eq!(hi / lo, 300.0 / 72.0, 1e-9);
            } else {
                assert_approx_eq!(hi, lo);
            }
        }
        Ok(())
    }

    #[test]
    fn test_default_unit() -> Result<()> {
        let c = ctx(300.0, (200.0, 100.0), (1.0, 1.0)).with_default_unit(Unit::PercentWidth);
        assert_approx_eq!(c.to_px(&5.0.into())?, 10.0);
        assert_approx_eq!(c.to_px(&"5".into())?, 10.0);
        assert_approx_eq!(c.to_px(&5.into())?, 10.0);
        assert_approx_eq!(c.to_px(&"5px".into())?, 5.0);
        Ok(())
    }

    #[test]
    fn test_expressions() -> Result<()> {
        let c = ctx(300.0, (200.0, 100.0), (1.0, 1.0));
        assert_approx_eq!(c.to_px(&"2*3px".into())?, 6.0);
        assert_approx_eq!(c.to_px(&" (1 + 2) * 4 px".into())?, 12.0);
        assert_approx_eq!(c.to_px(&"-10/4px".into())?, -2.5);
        assert_approx_eq!(c.to_px(&"1e2px".into())?, 100.0);
        assert_approx_eq!(c.to_px(&".5in".into())?, 150.0);
        assert_approx_eq!(c.to_px(&"-(2 - 5)px".into())?, 3.0);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let c = ctx(300.0, (200.0, 100.0), (0.0, 0.0));
        assert!(matches!(
            c.to_px(&"5furlong".into()),
            Err(CanvasError::UnrecognizedUnit(unit)) if unit == "furlong"
        ));
        assert!(matches!(
            c.to_px(&"5%".into()),
            Err(CanvasError::UnrecognizedUnit(_))
        ));
        assert!(matches!(
            c.to_px(&"5x".into()),
            Err(CanvasError::ZeroDivision)
        ));
        assert!(matches!(
            c.to_px(&"5y".into()),
            Err(CanvasError::ZeroDivision)
        ));
        assert!(matches!(
            c.to_px(&"1/0px".into()),
            Err(CanvasError::ZeroDivision)
        ));
        for text in ["px", "", "2**3px", "(1+2px", "1 2px", "*px"] {
            assert!(
                matches!(c.to_px(&text.into()), Err(CanvasError::MalformedDistance(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_unit_from_str() -> Result<()> {
        for unit in Unit::ALL {
            assert_eq!(unit.suffix().parse::<Unit>()?, unit);
            assert_eq!(unit.to_string(), unit.suffix());
        }
        assert!("%q".parse::<Unit>().is_err());
        Ok(())
    }

    #[test]
    fn test_px_to_coord() -> Result<()> {
        let c = ctx(300.0, (200.0, 100.0), (50.0, 400.0));
        assert_approx_eq!(c.px_to_x(20.0)?, 5.0);
        assert_approx_eq!(c.px_to_y(25.0)?, 100.0);
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::new(2.5, Unit::Cm).to_string(), "2.5cm");
        assert_eq!(Dist::from("5%min").to_string(), "5%min");
    }
}
