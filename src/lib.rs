//! Raster drawing canvas with caller-defined coordinate spaces and dimension units.
//!
//! Main features:
//!  - Coordinate spaces (pixel, fraction, percent, geographic, custom) mapped onto the image
//!  - Zoom, resize, rotate, flip, move and crop that keep coordinates attached to the content
//!  - Distances with units (`"2cm"`, `"5%min"`, `"0.5 * 10x"`) resolved against the canvas
//!  - Anti-aliased rendering of symbols, polygons and lines
//!
#![deny(warnings)]

mod bbox;
mod canvas;
mod color;
mod error;
mod geometry;
mod image;
mod path;
mod raster;
mod render;
mod space;
mod style;
mod units;
mod utils;

pub use bbox::{Conform, CoordBBox};
pub use canvas::{Anchor, Canvas, CanvasConfig, Preset};
pub use color::{ColorError, RGBA};
pub use error::{CanvasError, Result};
pub use geometry::{EPSILON, PI, Point, Scalar, Transform, scalar_fmt};
pub use image::{Image, ImageIter, ImageMut, ImageOwned, MAX_PIXELS, Shape, Size};
pub use path::{DEFAULT_FLATNESS, Path, PathBuilder, Polyline, Segment, SubPath};
#[cfg(feature = "png")]
pub use raster::{read_png, write_png};
pub use raster::{composite, warp};
pub use render::{
    Brush, FillRule, LineCap, LineJoin, Pen, Renderer, SignedDifferenceRenderer, fill_polylines,
};
pub use space::{CoordinateSpace, PIXELS_PER_CM};
pub use style::{
    DEFAULT_FILL, LineStyle, ResolvedShapeStyle, ShapeStyle, Symbol, SymbolFn,
};
pub use units::{Dist, Length, Unit, UnitContext, parse_dist};
