//! Canvas, pixel buffer together with the coordinate space it is drawn in
use crate::{
    Brush, CanvasError, Conform, CoordBBox, CoordinateSpace, Dist, FillRule, Image, ImageMut,
    ImageOwned, Path, Pen, Point, RGBA, Renderer, Result, Scalar, SignedDifferenceRenderer,
    Size, Symbol, Transform, Unit, UnitContext, raster,
    style::{LineStyle, ShapeStyle},
};
use std::fmt;

/// Named canvas sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preset {
    /// 210mm x 297mm
    A4,
    /// 8.5in x 11in
    Letter,
}

impl Preset {
    /// Width and height as distances
    pub fn dimensions(self) -> (Dist, Dist) {
        match self {
            Preset::A4 => (Dist::from("210mm"), Dist::from("297mm")),
            Preset::Letter => (Dist::from("8.5in"), Dist::from("11in")),
        }
    }
}

/// Part of the pasted image that is placed at the paste location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Anchor {
    #[default]
    NW,
    N,
    NE,
    W,
    Center,
    E,
    SW,
    S,
    SE,
}

impl Anchor {
    /// Position of the anchor relative to the image size, `(0, 0)` is the top-left corner
    fn fraction(self) -> (Scalar, Scalar) {
        match self {
            Anchor::NW => (0.0, 0.0),
            Anchor::N => (0.5, 0.0),
            Anchor::NE => (1.0, 0.0),
            Anchor::W => (0.0, 0.5),
            Anchor::Center => (0.5, 0.5),
            Anchor::E => (1.0, 0.5),
            Anchor::SW => (0.0, 1.0),
            Anchor::S => (0.5, 1.0),
            Anchor::SE => (1.0, 1.0),
        }
    }
}

/// Canvas construction options
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CanvasConfig {
    /// Width of the image, bare numbers are pixels
    pub width: Option<Dist>,
    /// Height of the image, bare numbers are pixels
    pub height: Option<Dist>,
    /// Used when width or height is missing
    pub preset: Option<Preset>,
    /// Pixels per inch, used by physical units
    pub ppi: Scalar,
    pub background: RGBA,
    /// Unit of bare numbers in drawing sizes
    pub default_unit: Unit,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            preset: None,
            ppi: 300.0,
            background: RGBA::new(255, 255, 255, 0),
            default_unit: Unit::PercentWidth,
        }
    }
}

impl CanvasConfig {
    pub fn with_size(self, width: impl Into<Dist>, height: impl Into<Dist>) -> Self {
        Self {
            width: Some(width.into()),
            height: Some(height.into()),
            ..self
        }
    }

    pub fn with_preset(self, preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            ..self
        }
    }

    pub fn with_ppi(self, ppi: Scalar) -> Self {
        Self { ppi, ..self }
    }

    pub fn with_background(self, background: RGBA) -> Self {
        Self { background, ..self }
    }

    pub fn with_default_unit(self, default_unit: Unit) -> Self {
        Self {
            default_unit,
            ..self
        }
    }

    /// Resolve image size in pixels, also rejects non-positive or non-finite `ppi`
    pub fn pixel_size(&self) -> Result<Size> {
        if !(self.ppi.is_finite() && self.ppi > 0.0) {
            return Err(CanvasError::InvalidPpi(self.ppi));
        }
        let (width, height) = match (&self.width, &self.height, self.preset) {
            (Some(width), Some(height), _) => (width.clone(), height.clone()),
            (_, _, Some(preset)) => preset.dimensions(),
            _ => {
                return Err(CanvasError::InvalidSize {
                    width: 0.0,
                    height: 0.0,
                });
            }
        };
        let ctx = UnitContext {
            ppi: self.ppi,
            default_unit: Unit::Px,
            canvas_size: (0.0, 0.0),
            coord_size: (0.0, 0.0),
        };
        Size::from_scalars(ctx.to_px(&width)?, ctx.to_px(&height)?)
    }

    /// Load configuration from JSON
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Image with a coordinate space attached
///
/// Every operation that changes the image (resize, rotation, zoom, ...) updates the
/// coordinate space so that coordinates keep pointing to the same content. Operations
/// either succeed completely or leave the canvas unchanged.
pub struct Canvas {
    image: ImageOwned<RGBA>,
    space: CoordinateSpace,
    ppi: Scalar,
    default_unit: Unit,
    background: RGBA,
    renderer: Box<dyn Renderer>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("ppi", &self.ppi)
            .field("default_unit", &self.default_unit)
            .field("space", &self.space)
            .finish()
    }
}

impl Canvas {
    /// Blank canvas of the provided size, bare numbers are pixels
    pub fn new(width: impl Into<Dist>, height: impl Into<Dist>) -> Result<Self> {
        Self::from_config(&CanvasConfig::default().with_size(width, height))
    }

    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        let size = config.pixel_size()?;
        let image = ImageOwned::new_with(size.height, size.width, |_, _| config.background)?;
        tracing::debug!("[canvas:new] {}x{}", size.width, size.height);
        Self::from_parts(image, config)
    }

    /// Canvas on top of the existing image, in pixel space
    pub fn from_image(image: ImageOwned<RGBA>) -> Result<Self> {
        Self::from_parts(image, &CanvasConfig::default())
    }

    fn from_parts(image: ImageOwned<RGBA>, config: &CanvasConfig) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(CanvasError::InvalidSize {
                width: image.width() as Scalar,
                height: image.height() as Scalar,
            });
        }
        let space = CoordinateSpace::pixel(image.width(), image.height());
        let mut renderer = Box::new(SignedDifferenceRenderer::new());
        renderer.set_transform(space.transform());
        Ok(Self {
            image,
            space,
            ppi: config.ppi,
            default_unit: config.default_unit,
            background: config.background,
            renderer,
        })
    }

    /// Independent copy of the canvas: image, coordinate space and configuration
    ///
    /// Renderers are not cloneable, the copy draws with the default renderer.
    pub fn copy(&self) -> Self {
        let mut renderer = Box::new(SignedDifferenceRenderer::new());
        renderer.set_transform(self.space.transform());
        Self {
            image: self.image.clone(),
            space: self.space,
            ppi: self.ppi,
            default_unit: self.default_unit,
            background: self.background,
            renderer,
        }
    }

    /// Replace rendering backend
    pub fn with_renderer(mut self, mut renderer: Box<dyn Renderer>) -> Self {
        renderer.set_transform(self.space.transform());
        self.renderer = renderer;
        self
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn ppi(&self) -> Scalar {
        self.ppi
    }

    pub fn background(&self) -> RGBA {
        self.background
    }

    pub fn default_unit(&self) -> Unit {
        self.default_unit
    }

    /// Set unit of bare numbers in drawing sizes
    pub fn set_default_unit(&mut self, unit: Unit) {
        self.default_unit = unit;
    }

    pub fn space(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn coordspace_bbox(&self) -> CoordBBox {
        self.space.bbox()
    }

    pub fn coordspace_width(&self) -> Scalar {
        self.space.width()
    }

    pub fn coordspace_height(&self) -> Scalar {
        self.space.height()
    }

    /// Coordinate units per screen centimetre
    pub fn coordspace_units(&self) -> Scalar {
        self.space.units_per_cm()
    }

    pub fn coordspace_transform(&self) -> Transform {
        self.space.transform()
    }

    pub fn coordspace_invtransform(&self) -> Result<Transform> {
        self.space.inverse()
    }

    pub fn coord_to_pixel(&self, point: impl Into<Point>) -> Point {
        self.space.coord_to_pixel(point)
    }

    pub fn pixel_to_coord(&self, point: impl Into<Point>) -> Result<Point> {
        self.space.pixel_to_coord(point)
    }

    /// Euclidean distance between two coordinates
    pub fn measure_dist(&self, from: impl Into<Point>, to: impl Into<Point>) -> Scalar {
        from.into().dist(to.into())
    }

    /// Units of the canvas in its current state
    pub fn unit_context(&self) -> UnitContext {
        UnitContext {
            ppi: self.ppi,
            default_unit: self.default_unit,
            canvas_size: (self.width() as Scalar, self.height() as Scalar),
            coord_size: (self.space.width(), self.space.height()),
        }
    }

    /// Resolve distance to pixels
    pub fn parse_dist(&self, dist: impl Into<Dist>) -> Result<Scalar> {
        self.unit_context().to_px(&dist.into())
    }

    /// Resolve pairs of distances to pixels
    pub fn parse_points<X, Y>(&self, points: impl IntoIterator<Item = (X, Y)>) -> Result<Vec<Point>>
    where
        X: Into<Dist>,
        Y: Into<Dist>,
    {
        let ctx = self.unit_context();
        points
            .into_iter()
            .map(|(x, y)| Ok(Point::new(ctx.to_px(&x.into())?, ctx.to_px(&y.into())?)))
            .collect()
    }

    /// The only place where coordinate space changes
    fn set_space(&mut self, space: CoordinateSpace) {
        self.renderer.set_transform(space.transform());
        self.space = space;
    }

    /// Resample the image into `space` and make it current
    fn commit(&mut self, space: CoordinateSpace) -> Result<()> {
        let (width, height) = space.pixel_size();
        let pixel_map = space.transform() * self.space.transform().invert()?;
        let image = if pixel_map == Transform::identity() && self.image.size() == (Size { width, height }) {
            self.image.clone()
        } else {
            raster::warp(&self.image, Size { width, height }, pixel_map, self.background)?
        };
        self.image = image;
        self.set_space(space);
        Ok(())
    }

    /// Coordinates are pixels
    pub fn pixel_space(&mut self) {
        self.set_space(CoordinateSpace::pixel(self.width(), self.height()));
    }

    /// Coordinates are fractions `0..1` of the image
    pub fn fraction_space(&mut self) -> Result<()> {
        self.set_space(CoordinateSpace::fraction(self.width(), self.height())?);
        Ok(())
    }

    /// Coordinates are percentages `0..100` of the image
    pub fn percent_space(&mut self) -> Result<()> {
        self.set_space(CoordinateSpace::percent(self.width(), self.height())?);
        Ok(())
    }

    /// Longitude/latitude of the whole world, aspect ratio is preserved
    pub fn geographic_space(&mut self) -> Result<()> {
        self.set_space(CoordinateSpace::geographic(self.width(), self.height())?);
        Ok(())
    }

    /// Map coordinates `(xleft, ytop)` and `(xright, ybottom)` to the image corners
    pub fn custom_space(
        &mut self,
        xleft: Scalar,
        ytop: Scalar,
        xright: Scalar,
        ybottom: Scalar,
        lock_ratio: bool,
    ) -> Result<()> {
        let bbox = CoordBBox::new(xleft, ytop, xright, ybottom);
        let space = CoordinateSpace::custom(self.width(), self.height(), bbox, lock_ratio)?;
        tracing::debug!("[canvas:custom_space] {:?}", space.bbox());
        self.set_space(space);
        Ok(())
    }

    /// Zoom the image and the coordinate space to the provided extent
    ///
    /// Axis directions of the current space are kept, bounds are swapped as needed.
    /// With `conform` the extent is adjusted to the aspect ratio of the current space.
    pub fn zoom_bbox(
        &mut self,
        xmin: Scalar,
        ymin: Scalar,
        xmax: Scalar,
        ymax: Scalar,
        conform: Option<Conform>,
    ) -> Result<()> {
        let bbox = self.space.zoom_target(xmin, ymin, xmax, ymax, conform)?;
        self.zoom_to(bbox)
    }

    /// Same as [`Canvas::zoom_bbox`] but the bounding box is given as left/top/right/bottom,
    /// a box that flips an axis is rejected.
    pub fn zoom_bbox_strict(&mut self, bbox: CoordBBox, conform: Option<Conform>) -> Result<()> {
        let bbox = self.space.zoom_target_strict(bbox, conform)?;
        self.zoom_to(bbox)
    }

    fn zoom_to(&mut self, bbox: CoordBBox) -> Result<()> {
        let space = CoordinateSpace::custom(self.width(), self.height(), bbox, false)?;
        tracing::debug!("[canvas:zoom] {:?}", space.bbox());
        self.commit(space)
    }

    /// Zoom in for `factor > 1`, zoom out for `factor < -1`
    pub fn zoom_factor(&mut self, factor: Scalar, center: Option<Point>) -> Result<()> {
        let bbox = self.space.zoom_factor_target(factor, center)?;
        self.zoom_to(bbox)
    }

    pub fn zoom_in(&mut self, factor: Scalar, center: Option<Point>) -> Result<()> {
        self.zoom_factor(factor, center)
    }

    pub fn zoom_out(&mut self, factor: Scalar, center: Option<Point>) -> Result<()> {
        self.zoom_factor(-factor, center)
    }

    /// Zoom to `units` coordinate units per screen centimetre
    pub fn zoom_units(&mut self, units: Scalar, center: Option<Point>) -> Result<()> {
        let bbox = self.space.zoom_units_target(units, center)?;
        self.zoom_to(bbox)
    }

    /// Resize the image, bare numbers are pixels
    ///
    /// Without `conform` the image is stretched, otherwise the coordinate space is
    /// extended (`Fit`) or cut (`Fill`) to keep the aspect ratio of the content.
    pub fn resize(
        &mut self,
        width: impl Into<Dist>,
        height: impl Into<Dist>,
        conform: Option<Conform>,
    ) -> Result<()> {
        let ctx = self.unit_context().with_default_unit(Unit::Px);
        let size = Size::from_scalars(ctx.to_px(&width.into())?, ctx.to_px(&height.into())?)?;
        let space = self.space.resized(size.width, size.height, conform)?;
        tracing::debug!("[canvas:resize] {}x{} {:?}", size.width, size.height, space.bbox());
        self.commit(space)
    }

    /// Rotate the image by `degrees` around the center of the coordinate space, size
    /// of the image is preserved.
    pub fn rotate(&mut self, degrees: Scalar) -> Result<()> {
        let space = self.space.rotated(degrees)?;
        tracing::debug!("[canvas:rotate] {} {:?}", degrees, space.bbox());
        self.commit(space)
    }

    /// Rotate the image by `degrees` around the center of the coordinate space, the
    /// image grows to hold all of the rotated content.
    pub fn rotate_expand(&mut self, degrees: Scalar) -> Result<()> {
        let space = self.space.rotated_expand(degrees)?;
        tracing::debug!(
            "[canvas:rotate_expand] {} {:?} {:?}",
            degrees,
            space.pixel_size(),
            space.bbox()
        );
        self.commit(space)
    }

    /// Mirror the image horizontally and/or vertically
    pub fn flip(&mut self, xflip: bool, yflip: bool) -> Result<()> {
        let space = self.space.flipped(xflip, yflip)?;
        tracing::debug!("[canvas:flip] {} {} {:?}", xflip, yflip, space.bbox());
        self.commit(space)
    }

    /// Offset the image, bare numbers are pixels
    pub fn move_by(&mut self, dx: impl Into<Dist>, dy: impl Into<Dist>) -> Result<()> {
        let ctx = self.unit_context().with_default_unit(Unit::Px);
        let (dx, dy) = (ctx.to_px(&dx.into())?, ctx.to_px(&dy.into())?);
        let space = self.space.moved(dx, dy)?;
        tracing::debug!("[canvas:move] {} {} {:?}", dx, dy, space.bbox());
        self.commit(space)
    }

    /// Crop the image to the coordinate extent, image gets the pixel size of the extent
    pub fn crop(&mut self, xmin: Scalar, ymin: Scalar, xmax: Scalar, ymax: Scalar) -> Result<()> {
        let space = self.space.cropped(xmin, ymin, xmax, ymax)?;
        tracing::debug!("[canvas:crop] {:?} {:?}", space.pixel_size(), space.bbox());
        self.commit(space)
    }

    /// Alpha composite `image` with its `anchor` at the pixel location `(x, y)`,
    /// bare numbers are pixels.
    pub fn paste<I>(
        &mut self,
        image: &I,
        x: impl Into<Dist>,
        y: impl Into<Dist>,
        anchor: Anchor,
    ) -> Result<()>
    where
        I: Image<Pixel = RGBA> + ?Sized,
    {
        let ctx = self.unit_context().with_default_unit(Unit::Px);
        let (x, y) = (ctx.to_px(&x.into())?, ctx.to_px(&y.into())?);
        let (fx, fy) = anchor.fraction();
        let left = (x - fx * image.width() as Scalar).floor();
        let top = (y - fy * image.height() as Scalar).floor();
        if !left.is_finite() || !top.is_finite() {
            return Err(CanvasError::MalformedDistance(format!("{},{}", x, y)));
        }
        raster::composite(&mut self.image, image, left as i64, top as i64);
        Ok(())
    }

    /// Resize `image` into the coordinate box `bbox` and alpha composite it there
    ///
    /// Without `conform` the image is stretched over the box, otherwise its aspect ratio
    /// is kept and the image is fitted inside (`Fit`) or covers (`Fill`) the centered
    /// box. With `outline` the box is outlined afterwards.
    pub fn paste_bbox(
        &mut self,
        image: &ImageOwned<RGBA>,
        bbox: impl Into<CoordBBox>,
        conform: Option<Conform>,
        outline: Option<&Pen>,
    ) -> Result<()> {
        let (left, top, width, height) = self.pixel_rect(bbox.into())?;
        let size = Size::from_scalars(width, height)?;
        let (iwidth, iheight) = (image.width() as Scalar, image.height() as Scalar);
        let (mut sx, mut sy) = (size.width as Scalar / iwidth, size.height as Scalar / iheight);
        match conform {
            None => {}
            Some(Conform::Fit) => {
                sx = sx.min(sy);
                sy = sx;
            }
            Some(Conform::Fill) => {
                sx = sx.max(sy);
                sy = sx;
            }
        }
        let pixel_map = Transform::new_translate(
            (size.width as Scalar - iwidth * sx) / 2.0,
            (size.height as Scalar - iheight * sy) / 2.0,
        )
        .scale(sx, sy);
        let resized = raster::warp(image, size, pixel_map, RGBA::TRANSPARENT)?;
        let (left, top) = (left.round(), top.round());
        tracing::debug!("[canvas:paste_bbox] {}x{} at {} {}", size.width, size.height, left, top);
        raster::composite(&mut self.image, &resized, left as i64, top as i64);
        if let Some(pen) = outline {
            let (right, bottom) = (left + size.width as Scalar, top + size.height as Scalar);
            let path = Path::builder()
                .polygon([(left, top), (right, top), (right, bottom), (left, bottom)])
                .build();
            self.draw_pixel_path(&path, Some(pen), None)?;
        }
        Ok(())
    }

    /// Pixel rectangle `(left, top, width, height)` covered by the coordinate box
    fn pixel_rect(&self, bbox: CoordBBox) -> Result<(Scalar, Scalar, Scalar, Scalar)> {
        let p0 = self.coord_to_pixel((bbox.xleft, bbox.ytop));
        let p1 = self.coord_to_pixel((bbox.xright, bbox.ybottom));
        let (left, top) = (p0.x().min(p1.x()), p0.y().min(p1.y()));
        let (width, height) = ((p1.x() - p0.x()).abs(), (p1.y() - p0.y()).abs());
        if !(left.is_finite() && top.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(CanvasError::EmptyBBox);
        }
        Ok((left, top, width, height))
    }

    /// Draw path given in pixels, ignoring the coordinate space
    fn draw_pixel_path(
        &mut self,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> Result<()> {
        self.renderer.set_transform(Transform::identity());
        let result = self.renderer.draw_path(&mut self.image, path, pen, brush);
        self.renderer.set_transform(self.space.transform());
        result
    }

    /// Draw symbol centered at coordinate `xy`
    ///
    /// Symbols are drawn in pixels so they are never distorted by the coordinate space.
    pub fn draw_symbol(
        &mut self,
        xy: impl Into<Point>,
        symbol: &Symbol,
        style: &ShapeStyle,
    ) -> Result<()> {
        let resolved = style.resolve(&self.unit_context())?;
        let center = self.coord_to_pixel(xy);
        let path = symbol.path(center, resolved.width, resolved.height);
        self.draw_pixel_path(&path, resolved.pen.as_ref(), resolved.brush.as_ref())
    }

    /// Draw symbol stretched over the coordinate box `bbox`, size of the style is ignored
    pub fn draw_symbol_bbox(
        &mut self,
        bbox: impl Into<CoordBBox>,
        symbol: &Symbol,
        style: &ShapeStyle,
    ) -> Result<()> {
        let resolved = style.resolve(&self.unit_context())?;
        let (left, top, width, height) = self.pixel_rect(bbox.into())?;
        let center = Point::new(left + width / 2.0, top + height / 2.0);
        let path = symbol.path(center, width, height);
        self.draw_pixel_path(&path, resolved.pen.as_ref(), resolved.brush.as_ref())
    }

    pub fn draw_circle_bbox(
        &mut self,
        bbox: impl Into<CoordBBox>,
        style: &ShapeStyle,
    ) -> Result<()> {
        self.draw_symbol_bbox(bbox, &Symbol::Circle, style)
    }

    pub fn draw_box_bbox(
        &mut self,
        bbox: impl Into<CoordBBox>,
        style: &ShapeStyle,
    ) -> Result<()> {
        self.draw_symbol_bbox(bbox, &Symbol::Box, style)
    }

    pub fn draw_triangle_bbox(
        &mut self,
        bbox: impl Into<CoordBBox>,
        style: &ShapeStyle,
    ) -> Result<()> {
        self.draw_symbol_bbox(bbox, &Symbol::Triangle, style)
    }

    pub fn draw_circle(&mut self, xy: impl Into<Point>, style: &ShapeStyle) -> Result<()> {
        self.draw_symbol(xy, &Symbol::Circle, style)
    }

    pub fn draw_box(&mut self, xy: impl Into<Point>, style: &ShapeStyle) -> Result<()> {
        self.draw_symbol(xy, &Symbol::Box, style)
    }

    pub fn draw_triangle(&mut self, xy: impl Into<Point>, style: &ShapeStyle) -> Result<()> {
        self.draw_symbol(xy, &Symbol::Triangle, style)
    }

    /// Draw pie slice of radius `fill_size` centered at coordinate `xy`, angles are in
    /// degrees clockwise from 3 o'clock.
    pub fn draw_pie(
        &mut self,
        xy: impl Into<Point>,
        start: Scalar,
        end: Scalar,
        style: &ShapeStyle,
    ) -> Result<()> {
        let resolved = style.resolve(&self.unit_context())?;
        let center = self.coord_to_pixel(xy);
        let radius = resolved.size;
        let path = Path::builder()
            .pie(center, (radius, radius), start, end)
            .build();
        self.draw_pixel_path(&path, resolved.pen.as_ref(), resolved.brush.as_ref())
    }

    /// Draw rectangle given by its coordinate bounds
    pub fn draw_rect(&mut self, bbox: impl Into<CoordBBox>, style: &ShapeStyle) -> Result<()> {
        let CoordBBox {
            xleft,
            ytop,
            xright,
            ybottom,
        } = bbox.into();
        let path = Path::builder()
            .polygon([
                (xleft, ytop),
                (xright, ytop),
                (xright, ybottom),
                (xleft, ybottom),
            ])
            .build();
        let resolved = style.resolve(&self.unit_context())?;
        self.draw_path(&path, resolved.pen.as_ref(), resolved.brush.as_ref())
    }

    /// Draw polygon with holes, interior is filled with the even-odd rule
    pub fn draw_polygon<P>(
        &mut self,
        exterior: &[P],
        holes: &[Vec<P>],
        style: &ShapeStyle,
    ) -> Result<()>
    where
        P: Into<Point> + Copy,
    {
        let mut builder = Path::builder();
        for ring in std::iter::once(exterior).chain(holes.iter().map(Vec::as_slice)) {
            builder.polygon(ring.iter().copied());
        }
        let path = builder.build();
        let resolved = style
            .resolve(&self.unit_context())?
            .with_fill_rule(FillRule::EvenOdd);
        self.draw_path(&path, resolved.pen.as_ref(), resolved.brush.as_ref())
    }

    /// Draw line through coordinates
    pub fn draw_line<P>(&mut self, coords: &[P], style: &LineStyle) -> Result<()>
    where
        P: Into<Point> + Copy,
    {
        let pen = style.pen(&self.unit_context())?;
        let points: Vec<Point> = coords.iter().copied().map(Into::into).collect();
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() > 1 => (*first, *last),
            _ => return Ok(()),
        };
        let mut builder = Path::builder();
        builder.move_to(first);
        if style.smooth && points.len() > 2 {
            // curves through the midpoints, original points are the control points
            builder.line_to(first.mid(points[1]));
            for pair in points[1..].windows(2) {
                builder.quad_to(pair[0], pair[0].mid(pair[1]));
            }
            builder.line_to(last);
        } else {
            for point in points[1..].iter() {
                builder.line_to(*point);
            }
        }
        self.draw_path(&builder.build(), Some(&pen), None)
    }

    /// Draw path given in coordinates
    pub fn draw_path(
        &mut self,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> Result<()> {
        self.renderer.draw_path(&mut self.image, path, pen, brush)
    }

    /// Fill the image with the background color
    pub fn clear(&mut self) {
        self.image.fill(self.background);
    }

    pub fn image(&self) -> &ImageOwned<RGBA> {
        &self.image
    }

    pub fn into_image(self) -> ImageOwned<RGBA> {
        self.image
    }

    /// Encode image as PNG
    #[cfg(feature = "png")]
    pub fn write_png(&self, out: impl std::io::Write) -> Result<()> {
        raster::write_png(&self.image, out)
    }

    /// Save image as PNG file
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        tracing::debug!("[canvas:save] {}", path.as_ref().display());
        self.write_png(std::io::BufWriter::new(file))
    }

    /// Canvas on top of decoded PNG image
    #[cfg(feature = "png")]
    pub fn read_png(input: impl std::io::Read) -> Result<Self> {
        Self::from_image(raster::read_png(input)?)
    }

    /// Canvas on top of PNG file
    #[cfg(feature = "png")]
    pub fn load_png(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_png(std::io::BufReader::new(file))
    }
}
