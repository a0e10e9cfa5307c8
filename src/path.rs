use crate::{EPSILON, Point, Scalar, Transform};

/// flatness of 0.05px gives good accuracy tradeoff
pub const DEFAULT_FLATNESS: Scalar = 0.05;

/// Upper bound on the number of lines a single curve is flattened into
const MAX_CURVE_SEGMENTS: usize = 256;

/// Path segment, stores its own start point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line([Point; 2]),
    Quad([Point; 3]),
    Cubic([Point; 4]),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line([p0, _]) => *p0,
            Segment::Quad([p0, ..]) => *p0,
            Segment::Cubic([p0, ..]) => *p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line([_, p1]) => *p1,
            Segment::Quad([.., p2]) => *p2,
            Segment::Cubic([.., p3]) => *p3,
        }
    }

    fn points_mut(&mut self) -> &mut [Point] {
        match self {
            Segment::Line(points) => points,
            Segment::Quad(points) => points,
            Segment::Cubic(points) => points,
        }
    }

    /// Point at parameter `t` in `0..1`
    pub fn at(&self, t: Scalar) -> Point {
        let s = 1.0 - t;
        match *self {
            Segment::Line([p0, p1]) => s * p0 + t * p1,
            Segment::Quad([p0, p1, p2]) => (s * s) * p0 + (2.0 * s * t) * p1 + (t * t) * p2,
            Segment::Cubic([p0, p1, p2, p3]) => {
                (s * s * s) * p0
                    + (3.0 * s * s * t) * p1
                    + (3.0 * s * t * t) * p2
                    + (t * t * t) * p3
            }
        }
    }

    /// Number of lines needed to stay within `flatness` of the curve
    fn lines_count(&self, flatness: Scalar) -> usize {
        let (dd, coeff) = match *self {
            Segment::Line(_) => return 1,
            Segment::Quad([p0, p1, p2]) => ((p0 - 2.0 * p1 + p2).length(), 0.25),
            Segment::Cubic([p0, p1, p2, p3]) => {
                let dd0 = (p0 - 2.0 * p1 + p2).length();
                let dd1 = (p1 - 2.0 * p2 + p3).length();
                (dd0.max(dd1), 0.75)
            }
        };
        let count = (coeff * dd / flatness.max(EPSILON)).sqrt().ceil();
        if count.is_finite() {
            crate::utils::clamp(count as usize, 1, MAX_CURVE_SEGMENTS)
        } else {
            MAX_CURVE_SEGMENTS
        }
    }
}

/// Non-empty collection of connected segments
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    segments: Vec<Segment>,
    /// Whether SubPath contains an implicit line segment connecting start and the end of it.
    closed: bool,
}

impl SubPath {
    pub fn new(segments: Vec<Segment>, closed: bool) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments, closed })
        }
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments.first().map_or(Point::new(0.0, 0.0), Segment::start)
    }

    pub fn end(&self) -> Point {
        self.segments.last().map_or(Point::new(0.0, 0.0), Segment::end)
    }

    /// Apply transformation to the subpath in place
    pub fn transform(&mut self, tr: Transform) {
        for segment in self.segments.iter_mut() {
            for point in segment.points_mut() {
                *point = tr.apply(*point);
            }
        }
    }

    /// Approximate subpath transformed by `tr` with a polyline
    pub fn flatten(&self, tr: Transform, flatness: Scalar) -> Polyline {
        let mut points = vec![tr.apply(self.start())];
        for segment in self.segments.iter() {
            let mut segment = *segment;
            for point in segment.points_mut() {
                *point = tr.apply(*point);
            }
            let count = segment.lines_count(flatness);
            for index in 1..count {
                points.push(segment.at(index as Scalar / count as Scalar));
            }
            points.push(segment.end());
        }
        Polyline {
            points,
            closed: self.closed,
        }
    }
}

/// Flattened subpath
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    /// Iterate over lines of the polyline including the closing one
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 1 => Some((*last, *first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing)
    }
}

/// Collection of the SubPath treated as a single unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    /// Create path from the list of subpaths
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Convenience method to create `PathBuilder`
    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    /// Apply transformation to the path in place
    pub fn transform(&mut self, tr: Transform) {
        for subpath in self.subpaths.iter_mut() {
            subpath.transform(tr);
        }
    }

    /// Approximate path transformed by `tr` with polylines
    pub fn flatten(&self, tr: Transform, flatness: Scalar) -> Vec<Polyline> {
        self.subpaths
            .iter()
            .map(|subpath| subpath.flatten(tr, flatness))
            .collect()
    }
}

/// Path builder similar to Canvas/Cairo interface.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    position: Point,
    subpath: Vec<Segment>,
    subpaths: Vec<SubPath>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build path
    pub fn build(&mut self) -> Path {
        let PathBuilder {
            subpath,
            mut subpaths,
            ..
        } = std::mem::take(self);
        subpaths.extend(SubPath::new(subpath, false));
        Path::new(subpaths)
    }

    /// Move current position, ending current subpath
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        self.subpaths.extend(SubPath::new(subpath, false));
        self.position = p.into();
        self
    }

    /// Close current subpath
    pub fn close(&mut self) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        if let Some(seg) = subpath.first() {
            self.position = seg.start();
        }
        self.subpaths.extend(SubPath::new(subpath, true));
        self
    }

    /// Add line from the current position to the specified point
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        if !self.position.is_close_to(p, EPSILON) {
            self.subpath.push(Segment::Line([self.position, p]));
            self.position = p;
        }
        self
    }

    /// Add quadratic bezier curve
    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) -> &mut Self {
        let p2 = p2.into();
        self.subpath.push(Segment::Quad([self.position, p1.into(), p2]));
        self.position = p2;
        self
    }

    /// Add cubic beizer curve
    pub fn cubic_to(
        &mut self,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> &mut Self {
        let p3 = p3.into();
        self.subpath
            .push(Segment::Cubic([self.position, p1.into(), p2.into(), p3]));
        self.position = p3;
        self
    }

    /// Add closed polygon, current position is moved to its first point
    pub fn polygon<P: Into<Point>>(&mut self, points: impl IntoIterator<Item = P>) -> &mut Self {
        let mut points = points.into_iter().map(Into::into);
        if let Some(first) = points.next() {
            self.move_to(first);
            for point in points {
                self.line_to(point);
            }
            self.close();
        }
        self
    }

    /// Add elliptic arc around `center`, angles are in degrees and grow from the
    /// positive x axis towards the positive y axis.
    ///
    /// Current position is connected to the start of the arc with a line.
    pub fn arc(
        &mut self,
        center: impl Into<Point>,
        radii: impl Into<Point>,
        start: Scalar,
        sweep: Scalar,
    ) -> &mut Self {
        let center = center.into();
        let Point([rx, ry]) = radii.into();
        let on_ellipse = |angle: Scalar| {
            let (sin, cos) = angle.sin_cos();
            center + Point::new(rx * cos, ry * sin)
        };
        let tangent = |angle: Scalar| {
            let (sin, cos) = angle.sin_cos();
            Point::new(-rx * sin, ry * cos)
        };
        let start = start.to_radians();
        let sweep = sweep.to_radians();
        self.line_to(on_ellipse(start));
        // each cubic spans at most a quarter of the ellipse
        let count = (sweep.abs() / (crate::PI / 2.0)).ceil().max(1.0) as usize;
        let step = sweep / count as Scalar;
        // (4/3)*tan(step/4) is the control point offset along the tangent
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        for index in 0..count {
            let a0 = start + step * index as Scalar;
            let a1 = a0 + step;
            let (p0, p3) = (on_ellipse(a0), on_ellipse(a1));
            self.cubic_to(p0 + k * tangent(a0), p3 - k * tangent(a1), p3);
        }
        self
    }

    /// Add closed ellipse with the center at `center`
    ///
    /// Current position is not changed after invocation.
    pub fn ellipse(&mut self, center: impl Into<Point>, radii: impl Into<Point>) -> &mut Self {
        let position = self.position;
        let center = center.into();
        let radii = radii.into();
        self.move_to(center + Point::new(radii.x(), 0.0))
            .arc(center, radii, 0.0, 360.0)
            .close()
            .move_to(position)
    }

    /// Add closed pie slice of the ellipse from `start` to `end` degrees
    pub fn pie(
        &mut self,
        center: impl Into<Point>,
        radii: impl Into<Point>,
        start: Scalar,
        end: Scalar,
    ) -> &mut Self {
        let center = center.into();
        let mut sweep = (end - start) % 360.0;
        if sweep <= 0.0 {
            sweep += 360.0;
        }
        self.move_to(center)
            .arc(center, radii, start, sweep)
            .close()
    }

    /// Current possition of the builder
    pub fn position(&self) -> Point {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_builder() {
        let path = Path::builder()
            .move_to((1.0, 1.0))
            .line_to((3.0, 1.0))
            .line_to((3.0, 1.0))
            .line_to((3.0, 4.0))
            .close()
            .move_to((10.0, 10.0))
            .quad_to((11.0, 12.0), (12.0, 10.0))
            .build();
        assert_eq!(path.subpaths().len(), 2);
        let first = &path.subpaths()[0];
        assert!(first.closed());
        // duplicated point does not produce an empty segment
        assert_eq!(first.segments().len(), 2);
        assert_eq!(first.end(), Point::new(3.0, 4.0));
        assert!(!path.subpaths()[1].closed());
    }

    #[test]
    fn test_flatten_lines() {
        let path = Path::builder()
            .polygon([(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)])
            .build();
        let lines = path.flatten(Transform::new_scale(2.0, 1.0), DEFAULT_FLATNESS);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 2.0)
            ]
        );
        // implicit closing line is reported
        assert_eq!(lines[0].lines().count(), 3);
    }

    #[test]
    fn test_flatten_quad() {
        let path = Path::builder()
            .move_to((0.0, 0.0))
            .quad_to((50.0, 100.0), (100.0, 0.0))
            .build();
        let flatness = 0.1;
        let lines = path.flatten(Transform::identity(), flatness);
        let points = &lines[0].points;
        assert!(points.len() > 10);
        assert_eq!(points.last(), Some(&Point::new(100.0, 0.0)));
        // every chord midpoint is within flatness of the curve y = 2x - x^2 / 50
        for pair in points.windows(2) {
            let mid = pair[0].mid(pair[1]);
            let x = mid.x();
            assert!((2.0 * x - x * x / 50.0 - mid.y()).abs() <= flatness);
        }
    }

    #[test]
    fn test_ellipse() {
        let path = Path::builder().ellipse((10.0, 20.0), (5.0, 3.0)).build();
        assert_eq!(path.subpaths().len(), 1);
        let subpath = &path.subpaths()[0];
        assert!(subpath.closed());
        assert_eq!(subpath.segments().len(), 4);
        for point in subpath.flatten(Transform::identity(), 0.01).points {
            let dx = (point.x() - 10.0) / 5.0;
            let dy = (point.y() - 20.0) / 3.0;
            assert_approx_eq!(dx.hypot(dy), 1.0, 1e-3);
        }
    }

    #[test]
    fn test_pie() {
        let path = Path::builder().pie((0.0, 0.0), (10.0, 10.0), 0.0, 90.0).build();
        let subpath = &path.subpaths()[0];
        assert!(subpath.closed());
        assert_eq!(subpath.start(), Point::new(0.0, 0.0));
        let end = subpath.end();
        assert_approx_eq!(end.x(), 0.0, 1e-9);
        assert_approx_eq!(end.y(), 10.0, 1e-9);

        // end before start wraps around the full circle
        let path = Path::builder().pie((0.0, 0.0), (1.0, 1.0), 270.0, 0.0).build();
        assert_eq!(path.subpaths()[0].segments().len(), 2);
    }
}
