//! Rendering backend used by the canvas to paint paths into the pixel buffer
use crate::{
    DEFAULT_FLATNESS, Image, ImageMut, ImageOwned, PI, Path, Point, Polyline, RGBA, Result,
    Scalar, Transform,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Shape of the outline at the corners of a path
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineJoin {
    /// Sharp corner, becomes a bevel when the miter is longer than `limit * width`
    Miter(Scalar),
    Bevel,
    Round,
}

impl Default for LineJoin {
    fn default() -> Self {
        Self::Miter(4.0)
    }
}

/// Shape of the outline at the ends of an open path
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Outline configuration, width is in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: RGBA,
    pub width: Scalar,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Pen {
    pub fn new(color: RGBA, width: Scalar) -> Self {
        Self {
            color,
            width,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        }
    }

    pub fn with_join(self, line_join: LineJoin) -> Self {
        Self { line_join, ..self }
    }

    pub fn with_cap(self, line_cap: LineCap) -> Self {
        Self { line_cap, ..self }
    }
}

/// Fill configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: RGBA,
    pub fill_rule: FillRule,
}

impl Brush {
    pub fn new(color: RGBA) -> Self {
        Self {
            color,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// Drawing backend
///
/// Paths are given in coordinates, the backend maps them to pixels with its current
/// transformation. Canvas keeps this transformation equal to the transformation of its
/// coordinate space.
pub trait Renderer {
    /// Set transformation from coordinates to pixels
    fn set_transform(&mut self, tr: Transform);

    /// Current transformation from coordinates to pixels
    fn transform(&self) -> Transform;

    /// Fill path with `brush` and then outline it with `pen`
    fn draw_path(
        &mut self,
        image: &mut ImageOwned<RGBA>,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> Result<()>;
}

/// Anti-aliased renderer based on the signed area accumulation
///
/// Every line of the flattened path adds the signed difference of the area it covers
/// to a coverage mask, the running sum along each row is the coverage of the pixel.
/// Outlines are filled as a union of segment quads, joins and caps.
#[derive(Debug, Clone)]
pub struct SignedDifferenceRenderer {
    tr: Transform,
    flatness: Scalar,
}

impl Default for SignedDifferenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignedDifferenceRenderer {
    pub fn new() -> Self {
        Self {
            tr: Transform::identity(),
            flatness: DEFAULT_FLATNESS,
        }
    }

    /// Maximum distance in pixels between curves and their flattened approximation
    pub fn with_flatness(self, flatness: Scalar) -> Self {
        Self { flatness, ..self }
    }
}

impl Renderer for SignedDifferenceRenderer {
    fn set_transform(&mut self, tr: Transform) {
        self.tr = tr;
    }

    fn transform(&self) -> Transform {
        self.tr
    }

    fn draw_path(
        &mut self,
        image: &mut ImageOwned<RGBA>,
        path: &Path,
        pen: Option<&Pen>,
        brush: Option<&Brush>,
    ) -> Result<()> {
        let _span = tracing::debug_span!("[render]").entered();
        let polylines = path.flatten(self.tr, self.flatness);
        if let Some(brush) = brush {
            fill_polylines(image, &polylines, brush.color, brush.fill_rule)?;
        }
        if let Some(pen) = pen {
            if pen.width > 0.0 && pen.color.alpha() > 0 {
                let outline = stroke_polylines(&polylines, pen, self.flatness);
                fill_polylines(image, &outline, pen.color, FillRule::NonZero)?;
            }
        }
        Ok(())
    }
}

/// Fill polylines (always treated as closed) into the image
///
/// Coverage is accumulated only for the pixels of the image under the polylines.
pub fn fill_polylines(
    image: &mut ImageOwned<RGBA>,
    polylines: &[Polyline],
    color: RGBA,
    fill_rule: FillRule,
) -> Result<()> {
    if color.alpha() == 0 {
        return Ok(());
    }
    let mut lines = Vec::new();
    for polyline in polylines {
        let (Some(first), Some(last)) = (polyline.points.first(), polyline.points.last()) else {
            continue;
        };
        let edges = polyline.points.windows(2).map(|pair| (pair[0], pair[1]));
        lines.extend(edges.chain(Some((*last, *first))).filter(|(p0, p1)| {
            p0.x().is_finite() && p0.y().is_finite() && p1.x().is_finite() && p1.y().is_finite()
        }));
    }

    // pixels of the image under the lines
    let (mut xmin, mut ymin) = (Scalar::INFINITY, Scalar::INFINITY);
    let (mut xmax, mut ymax) = (Scalar::NEG_INFINITY, Scalar::NEG_INFINITY);
    for point in lines.iter().flat_map(|(p0, p1)| [p0, p1]) {
        xmin = xmin.min(point.x());
        ymin = ymin.min(point.y());
        xmax = xmax.max(point.x());
        ymax = ymax.max(point.y());
    }
    let (col_start, row_start) = (xmin.floor().max(0.0), ymin.floor().max(0.0));
    let col_end = xmax.ceil().min(image.width() as Scalar);
    let row_end = ymax.ceil().min(image.height() as Scalar);
    if !(col_start < col_end && row_start < row_end) {
        return Ok(());
    }
    let (cols, rows) = ((col_end - col_start) as usize, (row_end - row_start) as usize);
    let (col_start, row_start) = (col_start as usize, row_start as usize);

    // two extra columns receive the difference of the lines at the right edge
    let mut mask = ImageOwned::new_default(rows, cols + 2)?;
    let shift = Point::new(col_start as Scalar, row_start as Scalar);
    for (p0, p1) in lines {
        signed_difference_line(&mut mask, cols as Scalar, p0 - shift, p1 - shift);
    }
    signed_difference_to_mask(&mut mask, fill_rule);

    for row in 0..rows {
        for col in 0..cols {
            let coverage = mask.get(row, col).copied().unwrap_or(0.0);
            if coverage <= 0.0 {
                continue;
            }
            if let Some(pixel) = image.get_mut(row_start + row, col_start + col) {
                *pixel = pixel.blend_over(color.with_alpha(coverage));
            }
        }
    }
    Ok(())
}

/// Point of the line `p0 -> p1` at `x`
fn intersect_x(p0: Point, p1: Point, x: Scalar) -> Point {
    let t = (x - p0.x()) / (p1.x() - p0.x());
    Point::new(x, (1.0 - t) * p0.y() + t * p1.y())
}

/// Update the mask with the signed difference of the line
///
/// Signed difference is a difference between adjacent pixels of a row introduced by
/// the line. Parts of the line right of `limit` do not change the coverage of the
/// columns before it and are dropped, parts left of `x == 0` are projected onto it.
fn signed_difference_line(mask: &mut ImageOwned<Scalar>, limit: Scalar, p0: Point, p1: Point) {
    let (p0, p1) = if p0.x() > limit || p1.x() > limit {
        if p0.x() > limit && p1.x() > limit {
            return;
        }
        let mid = intersect_x(p0, p1, limit);
        if p1.x() > limit { (p0, mid) } else { (mid, p1) }
    } else {
        (p0, p1)
    };

    // left part is rasterized as a vertical line spanning the same rows
    let (p0, p1) = if p0.x() < 0.0 || p1.x() < 0.0 {
        if p0.x() <= 0.0 && p1.x() <= 0.0 {
            (Point::new(0.0, p0.y()), Point::new(0.0, p1.y()))
        } else {
            let mid = intersect_x(p0, p1, 0.0);
            if p0.x() < 0.0 {
                signed_difference_span(mask, limit, Point::new(0.0, p0.y()), mid);
                (mid, p1)
            } else {
                signed_difference_span(mask, limit, mid, Point::new(0.0, p1.y()));
                (p0, mid)
            }
        }
    } else {
        (p0, p1)
    };
    signed_difference_span(mask, limit, p0, p1);
}

/// Signed difference of the line with all points in `0..=limit` columns range
fn signed_difference_span(mask: &mut ImageOwned<Scalar>, limit: Scalar, p0: Point, p1: Point) {
    if (p0.y() - p1.y()).abs() < crate::EPSILON {
        // horizontal lines do not introduce any coverage
        return;
    }
    // always iterate from the point with the smallest y
    let (dir, p0, p1) = if p0.y() < p1.y() {
        (1.0, p0, p1)
    } else {
        (-1.0, p1, p0)
    };
    let shape = mask.shape();
    let data = mask.data_mut();
    let dxdy = (p1.x() - p0.x()) / (p1.y() - p0.y());
    let row_start = p0.y().max(0.0) as usize;
    let row_end = (p1.y().ceil().max(0.0) as usize).min(shape.height);
    let mut x_next = if p0.y() < 0.0 {
        p0.x() - p0.y() * dxdy
    } else {
        p0.x()
    }
    .clamp(0.0, limit);
    for row in row_start..row_end {
        let x = x_next;
        let dy = ((row + 1) as Scalar).min(p1.y()) - (row as Scalar).max(p0.y());
        let d = dir * dy;
        x_next = (x + dxdy * dy).clamp(0.0, limit);
        let at = |col: usize| shape.offset(row, col);

        let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
        let x0_floor = x0.floor().max(0.0);
        let x0i = x0_floor as usize;
        let x1_ceil = x1.ceil();
        let x1i = x1_ceil as usize;
        if x1i <= x0i + 1 {
            // all of `d` goes to a single pixel and the one after it
            let xmf = 0.5 * (x + x_next) - x0_floor;
            data[at(x0i)] += d * (1.0 - xmf);
            data[at(x0i + 1)] += d * xmf;
        } else {
            let s = (x1 - x0).recip();
            let x0f = x0 - x0_floor;
            let x1f = x1 - x1_ceil + 1.0;
            // covered area of the first and the last pixels
            let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
            let am = 0.5 * s * x1f * x1f;
            data[at(x0i)] += d * a0;
            if x1i == x0i + 2 {
                data[at(x0i + 1)] += d * (1.0 - a0 - am);
            } else {
                let a1 = s * (1.5 - x0f);
                data[at(x0i + 1)] += d * (a1 - a0);
                for col in x0i + 2..x1i - 1 {
                    data[at(col)] += d * s;
                }
                let a2 = a1 + (x1i - x0i - 3) as Scalar * s;
                data[at(x1i - 1)] += d * (1.0 - a2 - am);
            }
            data[at(x1i)] += d * am;
        }
    }
}

/// Convert accumulated signed differences into coverage in `0..=1`
fn signed_difference_to_mask(mask: &mut ImageOwned<Scalar>, fill_rule: FillRule) {
    let shape = mask.shape();
    let data = mask.data_mut();
    for row in 0..shape.height {
        let mut acc = 0.0;
        for col in 0..shape.width {
            let offset = shape.offset(row, col);
            acc += data[offset];
            data[offset] = match fill_rule {
                FillRule::NonZero => {
                    let value = acc.abs();
                    if value > 1.0 {
                        1.0
                    } else if value < 1e-6 {
                        0.0
                    } else {
                        value
                    }
                }
                FillRule::EvenOdd => ((acc + 1.0).rem_euclid(2.0) - 1.0).abs(),
            };
        }
    }
}

/// Outline of polylines as a set of positively oriented polygons, to be filled
/// with the non-zero rule.
fn stroke_polylines(polylines: &[Polyline], pen: &Pen, flatness: Scalar) -> Vec<Polyline> {
    let radius = pen.width / 2.0;
    let mut result = Vec::new();
    for polyline in polylines {
        let mut points = polyline.points.clone();
        points.dedup();
        if polyline.closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        let polyline = Polyline {
            closed: polyline.closed && points.len() > 2,
            points,
        };
        let segments: Vec<(Point, Point, Point)> = polyline
            .lines()
            .filter_map(|(p0, p1)| Some((p0, p1, (p1 - p0).normalize()?)))
            .collect();
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            // single point
            if let Some(point) = polyline.points.first() {
                result.extend(stroke_dot(*point, radius, pen.line_cap, flatness));
            }
            continue;
        };

        for (p0, p1, dir) in segments.iter() {
            let normal = dir.normal() * radius;
            result.push(oriented(vec![
                *p0 + normal,
                *p1 + normal,
                *p1 - normal,
                *p0 - normal,
            ]));
        }
        for pair in segments.windows(2) {
            let (_, point, dir0) = pair[0];
            let (_, _, dir1) = pair[1];
            result.extend(stroke_join(point, dir0, dir1, radius, pen.line_join, flatness));
        }
        if polyline.closed {
            let (_, point, dir0) = *last;
            result.extend(stroke_join(point, dir0, first.2, radius, pen.line_join, flatness));
        } else {
            let (start, _, dir) = *first;
            result.extend(stroke_cap(start, Point::new(0.0, 0.0) - dir, radius, pen.line_cap, flatness));
            let (_, end, dir) = *last;
            result.extend(stroke_cap(end, dir, radius, pen.line_cap, flatness));
        }
    }
    result
}

/// Join between the segment with direction `dir0` ending at `point` and the segment
/// with direction `dir1` starting there, directions are unit vectors.
fn stroke_join(
    point: Point,
    dir0: Point,
    dir1: Point,
    radius: Scalar,
    join: LineJoin,
    flatness: Scalar,
) -> Option<Polyline> {
    let turn = dir0.cross(dir1);
    if turn.abs() < 1e-9 && dir0.dot(dir1) > 0.0 {
        // straight continuation
        return None;
    }
    // offset towards the outer side of the corner
    let side = if turn > 0.0 { -radius } else { radius };
    let (normal0, normal1) = (dir0.normal(), dir1.normal());
    let outer0 = point + normal0 * side;
    let outer1 = point + normal1 * side;
    match join {
        LineJoin::Round => Some(oriented(circle(point, radius, flatness))),
        LineJoin::Miter(limit) if 2.0 / (dir0 + dir1).length() <= limit => {
            let tip = point + (normal0 + normal1) * (side / (1.0 + dir0.dot(dir1)));
            Some(oriented(vec![point, outer0, tip, outer1]))
        }
        LineJoin::Miter(_) | LineJoin::Bevel => Some(oriented(vec![point, outer0, outer1])),
    }
}

/// Cap at the end `point` of a segment, `dir` is a unit vector pointing outwards
fn stroke_cap(
    point: Point,
    dir: Point,
    radius: Scalar,
    cap: LineCap,
    flatness: Scalar,
) -> Option<Polyline> {
    match cap {
        LineCap::Butt => None,
        LineCap::Round => Some(oriented(circle(point, radius, flatness))),
        LineCap::Square => {
            let normal = dir.normal() * radius;
            let extent = dir * radius;
            Some(oriented(vec![
                point + normal,
                point + normal + extent,
                point - normal + extent,
                point - normal,
            ]))
        }
    }
}

/// Outline of a zero length path, it only has caps
fn stroke_dot(point: Point, radius: Scalar, cap: LineCap, flatness: Scalar) -> Option<Polyline> {
    match cap {
        LineCap::Butt => None,
        LineCap::Round => Some(oriented(circle(point, radius, flatness))),
        LineCap::Square => Some(oriented(vec![
            point + Point::new(-radius, -radius),
            point + Point::new(radius, -radius),
            point + Point::new(radius, radius),
            point + Point::new(-radius, radius),
        ])),
    }
}

/// Regular polygon approximating circle within `flatness`
fn circle(center: Point, radius: Scalar, flatness: Scalar) -> Vec<Point> {
    // sagitta of the chord: r * (1 - cos(pi / n)) <= flatness
    let ratio = (1.0 - flatness / radius).clamp(-1.0, 1.0);
    let count = (PI / ratio.acos()).ceil();
    let count = if count.is_finite() {
        (count as usize).clamp(8, 128)
    } else {
        128
    };
    (0..count)
        .map(|index| {
            let (sin, cos) = (2.0 * PI * index as Scalar / count as Scalar).sin_cos();
            center + Point::new(radius * cos, radius * sin)
        })
        .collect()
}

/// Closed polyline with non-negative signed area
fn oriented(mut points: Vec<Point>) -> Polyline {
    let area: Scalar = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p0, p1)| p0.cross(*p1))
        .sum();
    if area < 0.0 {
        points.reverse();
    }
    Polyline {
        points,
        closed: true,
    }
}
