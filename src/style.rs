//! Drawing options of the canvas shapes and lines
use crate::{
    Brush, Dist, FillRule, LineCap, LineJoin, Path, Pen, Point, RGBA, Result, Scalar, UnitContext,
};
use std::{fmt, sync::Arc};

/// Fill color used when a style does not specify one
pub const DEFAULT_FILL: RGBA = RGBA::new(70, 130, 180, 255);

/// Style of the filled shapes (symbols, rectangles, polygons)
///
/// Sizes are distances resolved through the canvas units at draw time. `fill_size` is
/// the radius of the symbols, `fill_width`/`fill_height` override the diameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShapeStyle {
    pub fill_color: Option<RGBA>,
    pub outline_color: Option<RGBA>,
    pub outline_width: Dist,
    pub fill_size: Dist,
    pub fill_width: Option<Dist>,
    pub fill_height: Option<Dist>,
    /// Height of the symbols relative to their width
    pub flat_ratio: Scalar,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill_color: Some(DEFAULT_FILL),
            outline_color: Some(RGBA::BLACK),
            outline_width: Dist::from("0.07%min"),
            fill_size: Dist::from("0.7%min"),
            fill_width: None,
            fill_height: None,
            flat_ratio: 1.0,
        }
    }
}

impl ShapeStyle {
    pub fn with_fill(self, fill_color: Option<RGBA>) -> Self {
        Self { fill_color, ..self }
    }

    pub fn with_outline(self, outline_color: Option<RGBA>, outline_width: impl Into<Dist>) -> Self {
        Self {
            outline_color,
            outline_width: outline_width.into(),
            ..self
        }
    }

    pub fn with_size(self, fill_size: impl Into<Dist>) -> Self {
        Self {
            fill_size: fill_size.into(),
            ..self
        }
    }

    pub fn with_dimensions(self, fill_width: impl Into<Dist>, fill_height: impl Into<Dist>) -> Self {
        Self {
            fill_width: Some(fill_width.into()),
            fill_height: Some(fill_height.into()),
            ..self
        }
    }

    pub fn with_flat_ratio(self, flat_ratio: Scalar) -> Self {
        Self { flat_ratio, ..self }
    }

    /// Resolve all distances to pixels
    pub fn resolve(&self, ctx: &UnitContext) -> Result<ResolvedShapeStyle> {
        let size = ctx.to_px(&self.fill_size)?;
        let width = match &self.fill_width {
            Some(width) => ctx.to_px(width)?,
            None => size * 2.0,
        };
        let height = match &self.fill_height {
            Some(height) => ctx.to_px(height)?,
            None => size * 2.0,
        };
        let pen = match self.outline_color {
            Some(color) => {
                let width = ctx.to_px(&self.outline_width)?;
                (width > 0.0).then_some(Pen::new(color, width))
            }
            None => None,
        };
        Ok(ResolvedShapeStyle {
            brush: self.fill_color.map(Brush::new),
            pen,
            size,
            width,
            height: height * self.flat_ratio,
        })
    }
}

/// Shape style with all distances in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedShapeStyle {
    pub brush: Option<Brush>,
    pub pen: Option<Pen>,
    /// Radius
    pub size: Scalar,
    /// Symbol width
    pub width: Scalar,
    /// Symbol height, flat ratio applied
    pub height: Scalar,
}

impl ResolvedShapeStyle {
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        if let Some(brush) = self.brush.as_mut() {
            brush.fill_rule = fill_rule;
        }
        self
    }
}

/// Style of the lines
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineStyle {
    pub color: RGBA,
    pub width: Dist,
    /// Round corners with quadratic curves through the midpoints of the lines
    pub smooth: bool,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: RGBA::BLACK,
            width: Dist::from("0.7%min"),
            smooth: false,
            line_join: LineJoin::Round,
            line_cap: LineCap::Round,
        }
    }
}

impl LineStyle {
    pub fn new(color: RGBA, width: impl Into<Dist>) -> Self {
        Self {
            color,
            width: width.into(),
            ..Self::default()
        }
    }

    pub fn with_smooth(self, smooth: bool) -> Self {
        Self { smooth, ..self }
    }

    pub fn with_join(self, line_join: LineJoin) -> Self {
        Self { line_join, ..self }
    }

    pub fn with_cap(self, line_cap: LineCap) -> Self {
        Self { line_cap, ..self }
    }

    /// Resolve line width to pixels
    pub fn pen(&self, ctx: &UnitContext) -> Result<Pen> {
        let pen = Pen::new(self.color, ctx.to_px(&self.width)?);
        Ok(pen.with_join(self.line_join).with_cap(self.line_cap))
    }
}

/// Function building a custom symbol path from its pixel center, width and height
pub type SymbolFn = Arc<dyn Fn(Point, Scalar, Scalar) -> Path + Send + Sync>;

/// Shape drawn around a single point
#[derive(Clone)]
pub enum Symbol {
    Circle,
    Box,
    Triangle,
    Custom(SymbolFn),
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Circle => write!(f, "Circle"),
            Symbol::Box => write!(f, "Box"),
            Symbol::Triangle => write!(f, "Triangle"),
            Symbol::Custom(_) => write!(f, "Custom"),
        }
    }
}

impl Symbol {
    /// Path of the symbol in pixels
    pub fn path(&self, center: Point, width: Scalar, height: Scalar) -> Path {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let Point([x, y]) = center;
        match self {
            Symbol::Circle => Path::builder().ellipse(center, (hw, hh)).build(),
            Symbol::Box => Path::builder()
                .polygon([
                    (x - hw, y - hh),
                    (x + hw, y - hh),
                    (x + hw, y + hh),
                    (x - hw, y + hh),
                ])
                .build(),
            Symbol::Triangle => Path::builder()
                .polygon([(x, y - hh), (x + hw, y + hh), (x - hw, y + hh)])
                .build(),
            Symbol::Custom(build) => build(center, width, height),
        }
    }
}
