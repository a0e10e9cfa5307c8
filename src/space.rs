//! Coordinate space, mapping of the caller coordinates onto the pixel grid
use crate::{CanvasError, Conform, CoordBBox, Point, Result, Scalar, Size, Transform};

/// Screen pixels per centimetre used to express zoom levels in coordinate units per cm
pub const PIXELS_PER_CM: Scalar = 28.346457;

/// Coordinate space of the canvas
///
/// Holds the bounding box of the coordinate space together with the transformation
/// from coordinates to pixels, and the pixel size they were derived for. Values are
/// immutable, every operation produces a new consistent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    bbox: CoordBBox,
    transform: Transform,
    width: usize,
    height: usize,
}

impl CoordinateSpace {
    /// Coordinates are pixels
    pub fn pixel(width: usize, height: usize) -> Self {
        Self {
            bbox: CoordBBox::new(0.0, 0.0, width as Scalar, height as Scalar),
            transform: Transform::identity(),
            width,
            height,
        }
    }

    /// Coordinates are fractions `0..1` of the image
    pub fn fraction(width: usize, height: usize) -> Result<Self> {
        Self::custom(width, height, CoordBBox::new(0.0, 0.0, 1.0, 1.0), false)
    }

    /// Coordinates are percentages `0..100` of the image
    pub fn percent(width: usize, height: usize) -> Result<Self> {
        Self::custom(width, height, CoordBBox::new(0.0, 0.0, 100.0, 100.0), false)
    }

    /// Longitude/latitude of the whole world, without distortion
    pub fn geographic(width: usize, height: usize) -> Result<Self> {
        Self::custom(
            width,
            height,
            CoordBBox::new(-180.0, 90.0, 180.0, -90.0),
            true,
        )
    }

    /// Map `bbox` onto the image of `width x height` pixels
    ///
    /// With `lock_ratio` the coordinate space is grown (never shrunk) around its center
    /// until it has the same aspect ratio as the image.
    pub fn custom(width: usize, height: usize, bbox: CoordBBox, lock_ratio: bool) -> Result<Self> {
        Size::new(width, height)?;
        if !bbox.is_valid() || !bbox.to_array().iter().all(|v| v.is_finite()) {
            return Err(CanvasError::EmptyBBox);
        }
        let (pwidth, pheight) = (width as Scalar, height as Scalar);
        let CoordBBox {
            xleft,
            ytop,
            xright,
            ybottom,
        } = bbox;
        let (old_xwidth, old_yheight) = (bbox.width(), bbox.height());
        let (mut xwidth, mut yheight) = (old_xwidth, old_yheight);

        let mut centered = Transform::identity();
        if lock_ratio {
            xwidth = yheight * pwidth / pheight;
            // grow both axes until neither is smaller than requested
            let grow = (old_xwidth / xwidth).max(old_yheight / yheight).max(1.0);
            xwidth *= grow;
            yheight *= grow;
            centered = Transform::new_translate(
                (xwidth - old_xwidth) / 2.0,
                (yheight - old_yheight) / 2.0,
            );
        }

        // world to pixels, lower-value corner anchored at the pixel origin
        let xflip = bbox.x_reversed();
        let yflip = bbox.y_reversed();
        let xmin = xleft.min(xright);
        let ymin = ytop.min(ybottom);
        let scaled = Transform::new_scale(pwidth / xwidth, pheight / yheight).translate(
            if xflip { xmin } else { -xmin },
            if yflip { ymin } else { -ymin },
        );
        // flipped content stays in place
        let flipped = Transform::new_translate(
            if xflip { xwidth } else { 0.0 },
            if yflip { yheight } else { 0.0 },
        )
        .flip(xflip, yflip);

        let transform = scaled * flipped * centered;
        let bbox = if lock_ratio {
            bbox.resize_ratio(xwidth / old_xwidth, yheight / old_yheight)
        } else {
            bbox
        };
        tracing::trace!("[space:custom] {:?} {:?}", bbox, transform);
        Ok(Self {
            bbox,
            transform,
            width,
            height,
        })
    }

    /// Space with an arbitrary transformation, bounding box is recovered from the
    /// image corners.
    pub(crate) fn from_transform(&self, transform: Transform) -> Result<Self> {
        let inverse = transform.invert()?;
        let (pwidth, pheight) = (self.width as Scalar, self.height as Scalar);
        let top_left = inverse.apply((0.0, 0.0));
        let bottom_right = inverse.apply((pwidth, pheight));
        let corners = [
            top_left,
            inverse.apply((pwidth, 0.0)),
            bottom_right,
            inverse.apply((0.0, pheight)),
        ];
        let (mut xmin, mut ymin) = (Scalar::INFINITY, Scalar::INFINITY);
        let (mut xmax, mut ymax) = (Scalar::NEG_INFINITY, Scalar::NEG_INFINITY);
        for corner in corners {
            xmin = xmin.min(corner.x());
            xmax = xmax.max(corner.x());
            ymin = ymin.min(corner.y());
            ymax = ymax.max(corner.y());
        }
        let eps = 1e-9;
        let x_reversed = if (bottom_right.x() - top_left.x()).abs() > eps * (xmax - xmin) {
            bottom_right.x() < top_left.x()
        } else {
            self.bbox.x_reversed()
        };
        let y_reversed = if (bottom_right.y() - top_left.y()).abs() > eps * (ymax - ymin) {
            bottom_right.y() < top_left.y()
        } else {
            self.bbox.y_reversed()
        };
        let (xleft, xright) = if x_reversed { (xmax, xmin) } else { (xmin, xmax) };
        let (ytop, ybottom) = if y_reversed { (ymax, ymin) } else { (ymin, ymax) };
        let bbox = CoordBBox::new(xleft, ytop, xright, ybottom);
        tracing::trace!("[space:from_transform] {:?} {:?}", bbox, transform);
        Ok(Self {
            bbox,
            transform,
            width: self.width,
            height: self.height,
        })
    }

    pub fn bbox(&self) -> CoordBBox {
        self.bbox
    }

    /// Transformation from coordinates to pixels
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Transformation from pixels to coordinates
    pub fn inverse(&self) -> Result<Transform> {
        self.transform.invert()
    }

    /// Pixel size this space was derived for
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Unsigned width of the coordinate space
    pub fn width(&self) -> Scalar {
        self.bbox.width()
    }

    /// Unsigned height of the coordinate space
    pub fn height(&self) -> Scalar {
        self.bbox.height()
    }

    /// Coordinate units per screen centimetre
    pub fn units_per_cm(&self) -> Scalar {
        let width_cm = self.width as Scalar / PIXELS_PER_CM;
        self.width() / width_cm
    }

    pub fn coord_to_pixel(&self, point: impl Into<Point>) -> Point {
        self.transform.apply(point)
    }

    pub fn pixel_to_coord(&self, point: impl Into<Point>) -> Result<Point> {
        Ok(self.inverse()?.apply(point))
    }

    /// Bounding box that a zoom to `(xmin, ymin, xmax, ymax)` results in
    ///
    /// Axis directions are inherited from the current space, bounds are swapped where
    /// needed. With `conform` the box takes the aspect ratio of the current coordinate
    /// space.
    pub fn zoom_target(
        &self,
        xmin: Scalar,
        ymin: Scalar,
        xmax: Scalar,
        ymax: Scalar,
        conform: Option<Conform>,
    ) -> Result<CoordBBox> {
        let bbox = CoordBBox::new(xmin, ymax, xmax, ymin).with_directions_of(&self.bbox);
        self.conform(bbox, conform)
    }

    /// Same as [`CoordinateSpace::zoom_target`] but rejects a box that would flip an
    /// axis relative to the current space.
    pub fn zoom_target_strict(
        &self,
        bbox: CoordBBox,
        conform: Option<Conform>,
    ) -> Result<CoordBBox> {
        if bbox.with_directions_of(&self.bbox) != bbox {
            return Err(CanvasError::AxisDirectionMismatch);
        }
        self.conform(bbox, conform)
    }

    fn conform(&self, bbox: CoordBBox, conform: Option<Conform>) -> Result<CoordBBox> {
        match conform {
            None => Ok(bbox),
            Some(conform) => bbox.conform_aspect(self.width(), self.height(), conform),
        }
    }

    /// Bounding box after zooming by `factor`
    ///
    /// `factor > 1` zooms in, `factor < -1` zooms out, anything in between is an error.
    pub fn zoom_factor_target(&self, factor: Scalar, center: Option<Point>) -> Result<CoordBBox> {
        if !(factor > 1.0 || factor < -1.0) {
            return Err(CanvasError::InvalidZoomFactor(factor));
        }
        let ratio = if factor > 1.0 { 1.0 / factor } else { -factor };
        let bbox = self.bbox.resize_ratio(ratio, ratio);
        Ok(match center {
            Some(center) => bbox.center_on(center),
            None => bbox,
        })
    }

    /// Bounding box after zooming to `units` coordinate units per screen centimetre
    pub fn zoom_units_target(&self, units: Scalar, center: Option<Point>) -> Result<CoordBBox> {
        if !(units > 0.0 && units.is_finite()) {
            return Err(CanvasError::InvalidZoomUnits(units));
        }
        let pixels_per_unit = PIXELS_PER_CM / units;
        let bbox = self.bbox.resize_dimensions(
            self.width as Scalar / pixels_per_unit,
            self.height as Scalar / pixels_per_unit,
        )?;
        let bbox = match center {
            Some(center) => bbox.center_on(center),
            None => bbox,
        };
        self.conform(bbox, Some(Conform::Fill))
    }

    /// Space rotated by `degrees` around the center of the bounding box
    pub fn rotated(&self, degrees: Scalar) -> Result<Self> {
        let transform = self.transform.rotate_around(degrees, self.bbox.center());
        self.from_transform(transform)
    }

    /// Space rotated by `degrees` around the center of the bounding box, the image is
    /// enlarged to the envelope of the rotated image so no content is cut off.
    pub fn rotated_expand(&self, degrees: Scalar) -> Result<Self> {
        let rotated = self.transform.rotate_around(degrees, self.bbox.center());
        let pixel_map = rotated * self.inverse()?;
        let (width, height) = (self.width as Scalar, self.height as Scalar);
        let (mut xmin, mut ymin) = (Scalar::INFINITY, Scalar::INFINITY);
        let (mut xmax, mut ymax) = (Scalar::NEG_INFINITY, Scalar::NEG_INFINITY);
        for corner in [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)] {
            let corner = pixel_map.apply(corner);
            xmin = xmin.min(corner.x());
            xmax = xmax.max(corner.x());
            ymin = ymin.min(corner.y());
            ymax = ymax.max(corner.y());
        }
        let size = Size::from_scalars(xmax - xmin, ymax - ymin)?;
        // rounding slack is split evenly on both sides
        let dx = (size.width as Scalar - (xmax - xmin)) / 2.0 - xmin;
        let dy = (size.height as Scalar - (ymax - ymin)) / 2.0 - ymin;
        let transform = Transform::new_translate(dx, dy) * rotated;
        let expanded = Self {
            width: size.width,
            height: size.height,
            ..*self
        };
        expanded.from_transform(transform)
    }

    /// Space mirrored about the center of the bounding box
    pub fn flipped(&self, xflip: bool, yflip: bool) -> Result<Self> {
        let CoordBBox {
            xleft,
            ytop,
            xright,
            ybottom,
        } = self.bbox;
        let transform = self
            .transform
            .translate(
                if xflip { xleft + xright } else { 0.0 },
                if yflip { ytop + ybottom } else { 0.0 },
            )
            .flip(xflip, yflip);
        self.from_transform(transform)
    }

    /// Space moved by a pixel offset, content follows the offset
    pub fn moved(&self, dx: Scalar, dy: Scalar) -> Result<Self> {
        let offset = self.inverse()?.apply_vector((dx, dy));
        let transform = self.transform.translate(offset.x(), offset.y());
        self.from_transform(transform)
    }

    /// Space for the image resized to `width x height` pixels
    pub fn resized(&self, width: usize, height: usize, conform: Option<Conform>) -> Result<Self> {
        let bbox = match conform {
            None => self.bbox,
            Some(conform) => {
                self.bbox
                    .conform_aspect(width as Scalar, height as Scalar, conform)?
            }
        };
        Self::custom(width, height, bbox, false)
    }

    /// Space for the image cropped to the coordinate box `(xmin, ymin, xmax, ymax)`,
    /// image size is the pixel size of the box.
    pub fn cropped(&self, xmin: Scalar, ymin: Scalar, xmax: Scalar, ymax: Scalar) -> Result<Self> {
        let bbox = self.zoom_target(xmin, ymin, xmax, ymax, None)?;
        let top_left = self.coord_to_pixel((bbox.xleft, bbox.ytop));
        let bottom_right = self.coord_to_pixel((bbox.xright, bbox.ybottom));
        let size = Size::from_scalars(
            (bottom_right.x() - top_left.x()).abs(),
            (bottom_right.y() - top_left.y()).abs(),
        )?;
        Self::custom(size.width, size.height, bbox, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn assert_point(p: Point, x: Scalar, y: Scalar) {
        assert_approx_eq!(p.x(), x, 1e-9);
        assert_approx_eq!(p.y(), y, 1e-9);
    }

    #[test]
    fn test_pixel_space() {
        let space = CoordinateSpace::pixel(200, 100);
        assert_eq!(space.transform(), Transform::identity());
        assert_eq!(space.bbox(), CoordBBox::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn test_corner_mapping() -> Result<()> {
        let boxes = [
            [0.0, 0.0, 1.0, 1.0],
            [-180.0, 90.0, 180.0, -90.0],
            [10.0, -5.0, -30.0, 25.0],
            [100.0, 100.0, 0.0, 0.0],
            [0.5, 1e6, 1.5, 2e6],
        ];
        for bbox in boxes {
            let bbox = CoordBBox::from(bbox);
            let space = CoordinateSpace::custom(300, 120, bbox, false)?;
            assert_point(space.coord_to_pixel((bbox.xleft, bbox.ytop)), 0.0, 0.0);
            assert_point(space.coord_to_pixel((bbox.xright, bbox.ybottom)), 300.0, 120.0);
            assert_eq!(space.bbox(), bbox);
        }
        Ok(())
    }

    #[test]
    fn test_lock_ratio_never_shrinks() -> Result<()> {
        let boxes = [
            [0.0, 0.0, 100.0, 100.0],
            [-180.0, 90.0, 180.0, -90.0],
            [0.0, 0.0, 1.0, 10.0],
            [5.0, 3.0, -5.0, 2.0],
        ];
        for (width, height) in [(200, 100), (100, 200), (50, 50), (1, 1000)] {
            for bbox in boxes {
                let bbox = CoordBBox::from(bbox);
                let space = CoordinateSpace::custom(width, height, bbox, true)?;
                let result = space.bbox();
                assert!(result.width() >= bbox.width() * (1.0 - 1e-12));
                assert!(result.height() >= bbox.height() * (1.0 - 1e-12));
                assert_approx_eq!(
                    result.width() / result.height(),
                    width as Scalar / height as Scalar,
                    1e-9
                );
                // direction is preserved and the requested box stays centered
                assert_eq!(result.x_reversed(), bbox.x_reversed());
                assert_eq!(result.y_reversed(), bbox.y_reversed());
                assert_point(result.center(), bbox.center().x(), bbox.center().y());
                // resulting box spans the whole image
                assert_point(space.coord_to_pixel((result.xleft, result.ytop)), 0.0, 0.0);
                assert_point(
                    space.coord_to_pixel((result.xright, result.ybottom)),
                    width as Scalar,
                    height as Scalar,
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_lock_ratio_square_on_wide_canvas() -> Result<()> {
        let space =
            CoordinateSpace::custom(200, 100, CoordBBox::new(0.0, 0.0, 100.0, 100.0), true)?;
        let bbox = space.bbox();
        assert_approx_eq!(bbox.width() / bbox.height(), 2.0, 1e-12);
        assert!(bbox.width() >= 100.0 && bbox.height() >= 100.0);
        assert_eq!(bbox, CoordBBox::new(-50.0, 0.0, 150.0, 100.0));
        Ok(())
    }

    #[test]
    fn test_presets() -> Result<()> {
        let space = CoordinateSpace::fraction(200, 100)?;
        assert_point(space.coord_to_pixel((0.5, 0.5)), 100.0, 50.0);
        let space = CoordinateSpace::percent(200, 100)?;
        assert_point(space.coord_to_pixel((25.0, 100.0)), 50.0, 100.0);
        let space = CoordinateSpace::geographic(200, 100)?;
        assert_eq!(space.bbox(), CoordBBox::new(-180.0, 90.0, 180.0, -90.0));
        assert_point(space.coord_to_pixel((0.0, 0.0)), 100.0, 50.0);
        assert_point(space.coord_to_pixel((-180.0, 90.0)), 0.0, 0.0);
        // square canvas grows latitude span instead of squeezing longitudes
        let space = CoordinateSpace::geographic(100, 100)?;
        assert_eq!(space.bbox(), CoordBBox::new(-180.0, 180.0, 180.0, -180.0));
        assert_point(space.coord_to_pixel((-180.0, 90.0)), 0.0, 25.0);
        Ok(())
    }

    #[test]
    fn test_invalid_spaces() {
        let empty = CoordBBox::new(0.0, 0.0, 0.0, 1.0);
        assert!(matches!(
            CoordinateSpace::custom(10, 10, empty, false),
            Err(CanvasError::EmptyBBox)
        ));
        let nan = CoordBBox::new(0.0, 0.0, Scalar::NAN, 1.0);
        assert!(matches!(
            CoordinateSpace::custom(10, 10, nan, true),
            Err(CanvasError::EmptyBBox)
        ));
        assert!(matches!(
            CoordinateSpace::fraction(0, 10),
            Err(CanvasError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_zoom_factor() -> Result<()> {
        let space = CoordinateSpace::geographic(200, 100)?;
        for factor in [0.5, -0.9, 1.0, -1.0, 0.0, Scalar::NAN] {
            assert!(matches!(
                space.zoom_factor_target(factor, None),
                Err(CanvasError::InvalidZoomFactor(_))
            ));
        }
        let bbox = space.zoom_factor_target(2.0, None)?;
        assert_approx_eq!(bbox.width(), 180.0, 1e-9);
        assert_approx_eq!(bbox.height(), 90.0, 1e-9);
        let bbox = space.zoom_factor_target(-2.0, Some(Point::new(10.0, 10.0)))?;
        assert_approx_eq!(bbox.width(), 720.0, 1e-9);
        assert_point(bbox.center(), 10.0, 10.0);
        assert!(bbox.y_reversed());
        Ok(())
    }

    #[test]
    fn test_axis_direction_preserved() -> Result<()> {
        let mut space = CoordinateSpace::geographic(300, 200)?;
        let steps: [(Scalar, Option<Scalar>); 6] = [
            (2.0, None),
            (-3.0, None),
            (5.0, Some(2.0)),
            (1.5, None),
            (-1.5, Some(0.5)),
            (4.0, Some(40.0)),
        ];
        for (factor, units) in steps {
            let bbox = match units {
                None => space.zoom_factor_target(factor, Some(Point::new(12.0, 41.0)))?,
                Some(units) => space.zoom_units_target(units, None)?,
            };
            let (width, height) = space.pixel_size();
            space = CoordinateSpace::custom(width, height, bbox, false)?;
            assert!(space.bbox().ytop > space.bbox().ybottom);
            assert!(space.bbox().xleft < space.bbox().xright);
        }
        Ok(())
    }

    #[test]
    fn test_zoom_target_directions() -> Result<()> {
        let space = CoordinateSpace::geographic(200, 100)?;
        // min/max form is reordered to the current directions
        let bbox = space.zoom_target(-10.0, -5.0, 10.0, 5.0, None)?;
        assert_eq!(bbox, CoordBBox::new(-10.0, 5.0, 10.0, -5.0));
        // conform to the coordinate space aspect, not the pixel one
        let bbox = space.zoom_target(-10.0, -10.0, 10.0, 10.0, Some(Conform::Fit))?;
        assert_approx_eq!(bbox.width(), 40.0, 1e-9);
        assert_approx_eq!(bbox.height(), 20.0, 1e-9);

        let strict = space.zoom_target_strict(CoordBBox::new(-10.0, -5.0, 10.0, 5.0), None);
        assert!(matches!(strict, Err(CanvasError::AxisDirectionMismatch)));
        let strict = space.zoom_target_strict(CoordBBox::new(-10.0, 5.0, 10.0, -5.0), None)?;
        assert_eq!(strict, CoordBBox::new(-10.0, 5.0, 10.0, -5.0));
        Ok(())
    }

    #[test]
    fn test_zoom_units() -> Result<()> {
        let space = CoordinateSpace::geographic(200, 100)?;
        let units = space.units_per_cm();
        assert_approx_eq!(units, 360.0 / (200.0 / PIXELS_PER_CM), 1e-9);
        let bbox = space.zoom_units_target(units / 2.0, None)?;
        let zoomed = CoordinateSpace::custom(200, 100, bbox, false)?;
        assert_approx_eq!(zoomed.units_per_cm(), units / 2.0, 1e-9);
        assert!(matches!(
            space.zoom_units_target(0.0, None),
            Err(CanvasError::InvalidZoomUnits(_))
        ));
        Ok(())
    }

    #[test]
    fn test_rotate_four_times() -> Result<()> {
        for space in [
            CoordinateSpace::pixel(200, 100),
            CoordinateSpace::geographic(200, 100)?,
            CoordinateSpace::custom(50, 80, CoordBBox::new(3.0, 9.0, -4.0, 1.0), false)?,
        ] {
            let mut rotated = space;
            for _ in 0..4 {
                rotated = rotated.rotated(90.0)?;
            }
            assert!(rotated.transform().is_close_to(space.transform(), 1e-9));
            for (value, expected) in rotated.bbox().to_array().into_iter().zip(space.bbox().to_array()) {
                assert_approx_eq!(value, expected, 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rotate_keeps_center() -> Result<()> {
        let space = CoordinateSpace::geographic(200, 100)?;
        let rotated = space.rotated(30.0)?;
        assert_point(rotated.coord_to_pixel((0.0, 0.0)), 100.0, 50.0);
        assert!(rotated.bbox().is_valid());
        Ok(())
    }

    #[test]
    fn test_rotate_expand() -> Result<()> {
        let space = CoordinateSpace::geographic(200, 100)?;
        let rotated = space.rotated_expand(90.0)?;
        assert_eq!(rotated.pixel_size(), (100, 200));
        assert_point(rotated.coord_to_pixel((0.0, 0.0)), 50.0, 100.0);
        assert_approx_eq!(rotated.width(), 360.0, 1e-9);
        assert_approx_eq!(rotated.height(), 180.0, 1e-9);
        // corner of the world lands on a corner of the enlarged image
        let corner = rotated.coord_to_pixel((-180.0, 90.0));
        let distance = corner
            .dist(Point::new(100.0, 0.0))
            .min(corner.dist(Point::new(0.0, 200.0)));
        assert!(distance < 1e-9, "{:?}", corner);

        let rotated = space.rotated_expand(30.0)?;
        assert_eq!(rotated.pixel_size(), (223, 187));
        assert_point(rotated.coord_to_pixel((0.0, 0.0)), 111.5, 93.5);

        let same = space.rotated_expand(0.0)?;
        assert_eq!(same.pixel_size(), (200, 100));
        assert!(same.transform().is_close_to(space.transform(), 1e-9));
        Ok(())
    }

    #[test]
    fn test_flip() -> Result<()> {
        let space = CoordinateSpace::pixel(200, 100);
        let flipped = space.flipped(true, false)?;
        assert_point(flipped.coord_to_pixel((0.0, 10.0)), 200.0, 10.0);
        assert_eq!(flipped.bbox(), CoordBBox::new(200.0, 0.0, 0.0, 100.0));

        // box that does not start at the origin stays in view
        let space = CoordinateSpace::custom(100, 100, CoordBBox::new(100.0, 0.0, 200.0, 50.0), false)?;
        let flipped = space.flipped(true, true)?;
        assert_point(flipped.coord_to_pixel((100.0, 0.0)), 100.0, 100.0);
        assert_eq!(flipped.bbox(), CoordBBox::new(200.0, 50.0, 100.0, 0.0));
        let twice = flipped.flipped(true, true)?;
        assert!(twice.transform().is_close_to(space.transform(), 1e-9));
        Ok(())
    }

    #[test]
    fn test_moved() -> Result<()> {
        let space = CoordinateSpace::geographic(360, 180)?;
        let moved = space.moved(10.0, 20.0)?;
        let before = space.coord_to_pixel((5.0, 5.0));
        let after = moved.coord_to_pixel((5.0, 5.0));
        assert_point(after - before, 10.0, 20.0);
        assert_eq!(moved.bbox(), CoordBBox::new(-190.0, 110.0, 170.0, -70.0));
        Ok(())
    }

    #[test]
    fn test_resized() -> Result<()> {
        let space = CoordinateSpace::percent(200, 100)?;
        let resized = space.resized(400, 400, None)?;
        assert_eq!(resized.bbox(), space.bbox());
        assert_point(resized.coord_to_pixel((100.0, 100.0)), 400.0, 400.0);

        let space = CoordinateSpace::pixel(200, 100);
        let fit = space.resized(400, 400, Some(Conform::Fit))?;
        assert_approx_eq!(fit.width(), 200.0, 1e-9);
        assert_approx_eq!(fit.height(), 200.0, 1e-9);
        let fill = space.resized(400, 400, Some(Conform::Fill))?;
        assert_approx_eq!(fill.width(), 100.0, 1e-9);
        assert_approx_eq!(fill.height(), 100.0, 1e-9);
        assert_point(fill.bbox().center(), 100.0, 50.0);
        Ok(())
    }

    #[test]
    fn test_cropped() -> Result<()> {
        let space = CoordinateSpace::geographic(360, 180)?;
        let cropped = space.cropped(0.0, 0.0, 90.0, 45.0)?;
        assert_eq!(cropped.pixel_size(), (90, 45));
        assert_eq!(cropped.bbox(), CoordBBox::new(0.0, 45.0, 90.0, 0.0));
        assert!(matches!(
            space.cropped(0.0, 0.0, 0.1, 0.1),
            Err(CanvasError::InvalidSize { .. })
        ));
        // far outside of the pixel limit
        assert!(matches!(
            space.cropped(-1e9, -1e9, 1e9, 1e9),
            Err(CanvasError::InvalidSize { .. })
        ));
        assert!(CoordinateSpace::geographic(usize::MAX, 2).is_err());
        Ok(())
    }
}
