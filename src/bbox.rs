//! Coordinate bounding box and the operations used to reconcile it with the pixel grid
//!
//! Unlike [`crate::Image`] shapes, a coordinate bounding box is not normalized: the
//! relative order of `xleft`/`xright` and `ytop`/`ybottom` encodes the direction of each
//! axis, and every operation here preserves it.
use crate::{CanvasError, Point, Result, Scalar, scalar_fmt};
use std::fmt;

/// Aspect ratio conformance policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Conform {
    /// Grow the box so the target fits entirely inside it (letterbox)
    Fit,
    /// Shrink the box so the target is fully covered (crop)
    Fill,
}

/// Bounding box of the coordinate space given by the coordinates mapped to the
/// left, top, right and bottom sides of the image.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordBBox {
    pub xleft: Scalar,
    pub ytop: Scalar,
    pub xright: Scalar,
    pub ybottom: Scalar,
}

impl fmt::Debug for CoordBBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CoordBBox(")?;
        for (index, value) in self.to_array().into_iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            scalar_fmt(f, value)?;
        }
        write!(f, ")")
    }
}

impl From<[Scalar; 4]> for CoordBBox {
    fn from([xleft, ytop, xright, ybottom]: [Scalar; 4]) -> Self {
        Self::new(xleft, ytop, xright, ybottom)
    }
}

impl CoordBBox {
    pub const fn new(xleft: Scalar, ytop: Scalar, xright: Scalar, ybottom: Scalar) -> Self {
        Self {
            xleft,
            ytop,
            xright,
            ybottom,
        }
    }

    /// Bounds as `[xleft, ytop, xright, ybottom]`
    pub fn to_array(&self) -> [Scalar; 4] {
        [self.xleft, self.ytop, self.xright, self.ybottom]
    }

    /// Unsigned span of the x axis
    pub fn width(&self) -> Scalar {
        (self.xright - self.xleft).abs()
    }

    /// Unsigned span of the y axis
    pub fn height(&self) -> Scalar {
        (self.ybottom - self.ytop).abs()
    }

    /// Centroid of the box
    pub fn center(&self) -> Point {
        Point::new(
            (self.xleft + self.xright) / 2.0,
            (self.ytop + self.ybottom) / 2.0,
        )
    }

    /// Whether x values decrease from the left to the right side
    pub fn x_reversed(&self) -> bool {
        self.xright < self.xleft
    }

    /// Whether y values decrease from the top to the bottom side
    pub fn y_reversed(&self) -> bool {
        self.ybottom < self.ytop
    }

    /// Both spans are finite and non-zero
    pub fn is_valid(&self) -> bool {
        let (width, height) = (self.width(), self.height());
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }

    /// Swap bounds where needed so both axes run in the same direction as in `other`
    pub fn with_directions_of(&self, other: &CoordBBox) -> Self {
        let mut result = *self;
        if (result.xleft < result.xright) != (other.xleft < other.xright) {
            std::mem::swap(&mut result.xleft, &mut result.xright);
        }
        if (result.ytop < result.ybottom) != (other.ytop < other.ybottom) {
            std::mem::swap(&mut result.ytop, &mut result.ybottom);
        }
        result
    }

    /// Scale the box around its center, independently per axis
    pub fn resize_ratio(&self, xratio: Scalar, yratio: Scalar) -> Self {
        let Point([midx, midy]) = self.center();
        let half_width = self.width() / 2.0 * xratio;
        let half_height = self.height() / 2.0 * yratio;
        let (xleft, xright) = if self.xleft < self.xright {
            (midx - half_width, midx + half_width)
        } else {
            (midx + half_width, midx - half_width)
        };
        let (ytop, ybottom) = if self.ytop < self.ybottom {
            (midy - half_height, midy + half_height)
        } else {
            (midy + half_height, midy - half_height)
        };
        Self::new(xleft, ytop, xright, ybottom)
    }

    /// Resize the box around its center to the provided unsigned spans
    pub fn resize_dimensions(&self, width: Scalar, height: Scalar) -> Result<Self> {
        let (cur_width, cur_height) = (self.width(), self.height());
        if cur_width == 0.0 || cur_height == 0.0 {
            return Err(CanvasError::ZeroDivision);
        }
        Ok(self.resize_ratio(width / cur_width, height / cur_height))
    }

    /// Resize the box so its width to height ratio matches `target_width / target_height`
    pub fn conform_aspect(
        &self,
        target_width: Scalar,
        target_height: Scalar,
        conform: Conform,
    ) -> Result<Self> {
        if target_width == 0.0 || target_height == 0.0 {
            return Err(CanvasError::ZeroDivision);
        }
        let xratio = self.width() / target_width;
        let yratio = self.height() / target_height;
        let ratio = match conform {
            Conform::Fit => xratio.max(yratio),
            Conform::Fill => xratio.min(yratio),
        };
        self.resize_dimensions(target_width * ratio, target_height * ratio)
    }

    /// Translate the box so its centroid is at `center`
    pub fn center_on(&self, center: impl Into<Point>) -> Self {
        let shift = center.into() - self.center();
        self.offset(shift.x(), shift.y())
    }

    /// Translate all bounds
    pub fn offset(&self, dx: Scalar, dy: Scalar) -> Self {
        Self::new(
            self.xleft + dx,
            self.ytop + dy,
            self.xright + dx,
            self.ybottom + dy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn assert_bbox(bbox: CoordBBox, expected: [Scalar; 4]) {
        for (value, expected) in bbox.to_array().into_iter().zip(expected) {
            assert_approx_eq!(value, expected, 1e-9);
        }
    }

    #[test]
    fn test_spans() {
        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        assert_eq!(geo.width(), 360.0);
        assert_eq!(geo.height(), 180.0);
        assert!(!geo.x_reversed());
        assert!(geo.y_reversed());
        assert_eq!(geo.center(), Point::new(0.0, 0.0));
        assert!(geo.is_valid());
        assert!(!CoordBBox::new(1.0, 0.0, 1.0, 5.0).is_valid());
    }

    #[test]
    fn test_resize_ratio() {
        let bbox = CoordBBox::new(0.0, 0.0, 100.0, 50.0);
        assert_bbox(bbox.resize_ratio(2.0, 0.5), [-50.0, 12.5, 150.0, 37.5]);

        // reversed axes keep their direction
        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        assert_bbox(geo.resize_ratio(0.5, 0.5), [-90.0, 45.0, 90.0, -45.0]);
        let rev = CoordBBox::new(10.0, 0.0, 0.0, 10.0);
        assert_bbox(rev.resize_ratio(2.0, 1.0), [15.0, 0.0, -5.0, 10.0]);
    }

    #[test]
    fn test_resize_dimensions() -> Result<()> {
        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        assert_bbox(geo.resize_dimensions(36.0, 18.0)?, [-18.0, 9.0, 18.0, -9.0]);
        let empty = CoordBBox::new(0.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            empty.resize_dimensions(1.0, 1.0),
            Err(CanvasError::ZeroDivision)
        ));
        Ok(())
    }

    #[test]
    fn test_conform_aspect() -> Result<()> {
        let bbox = CoordBBox::new(0.0, 0.0, 100.0, 100.0);
        // fit grows the shorter side
        let fit = bbox.conform_aspect(200.0, 100.0, Conform::Fit)?;
        assert_bbox(fit, [-50.0, 0.0, 150.0, 100.0]);
        // fill shrinks the longer side
        let fill = bbox.conform_aspect(200.0, 100.0, Conform::Fill)?;
        assert_bbox(fill, [0.0, 25.0, 100.0, 75.0]);

        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        let fit = geo.conform_aspect(1.0, 1.0, Conform::Fit)?;
        assert_bbox(fit, [-180.0, 180.0, 180.0, -180.0]);
        let fill = geo.conform_aspect(1.0, 1.0, Conform::Fill)?;
        assert_bbox(fill, [-90.0, 90.0, 90.0, -90.0]);
        Ok(())
    }

    #[test]
    fn test_center_and_offset() {
        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        assert_bbox(geo.center_on((10.0, 20.0)), [-170.0, 110.0, 190.0, -70.0]);
        assert_bbox(geo.offset(1.0, -1.0), [-179.0, 89.0, 181.0, -91.0]);
    }

    #[test]
    fn test_with_directions_of() {
        let geo = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
        let zoom = CoordBBox::new(-10.0, -5.0, 10.0, 5.0);
        assert_bbox(zoom.with_directions_of(&geo), [-10.0, 5.0, 10.0, -5.0]);
        let pixels = CoordBBox::new(0.0, 0.0, 10.0, 10.0);
        let rev = CoordBBox::new(5.0, 5.0, 1.0, 1.0);
        assert_bbox(rev.with_directions_of(&pixels), [1.0, 1.0, 5.0, 5.0]);
    }
}
