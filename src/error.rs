use crate::{ColorError, Scalar};
use std::fmt;

/// Error produced by canvas, coordinate space and unit operations
#[derive(Debug)]
pub enum CanvasError {
    /// Transformation can not be inverted (zero determinant)
    DegenerateTransform,
    /// Zoom factor must be greater than `1` or less than `-1`
    InvalidZoomFactor(Scalar),
    /// Coordinate units per centimetre must be positive
    InvalidZoomUnits(Scalar),
    /// Bounding box would flip an axis of the current coordinate space
    AxisDirectionMismatch,
    /// Unit suffix is not one of the recognized units
    UnrecognizedUnit(String),
    /// Numeric body of the distance can not be evaluated
    MalformedDistance(String),
    /// Division by zero while resolving a distance
    ZeroDivision,
    /// Coordinate bounding box has zero or non-finite width or height
    EmptyBBox,
    /// Pixel dimensions must be at least one pixel and at most `MAX_PIXELS` in total
    InvalidSize { width: Scalar, height: Scalar },
    /// Pixels per inch must be finite and positive
    InvalidPpi(Scalar),
    /// Failed to parse color
    Color(ColorError),
    /// IO error propagated while reading or writing images
    Io(std::io::Error),
    #[cfg(feature = "png")]
    PngEncoding(png::EncodingError),
    #[cfg(feature = "png")]
    PngDecoding(png::DecodingError),
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanvasError::{:?}", self)
    }
}

impl std::error::Error for CanvasError {}

impl From<ColorError> for CanvasError {
    fn from(error: ColorError) -> Self {
        Self::Color(error)
    }
}

impl From<std::io::Error> for CanvasError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

#[cfg(feature = "png")]
impl From<png::EncodingError> for CanvasError {
    fn from(error: png::EncodingError) -> Self {
        Self::PngEncoding(error)
    }
}

#[cfg(feature = "png")]
impl From<png::DecodingError> for CanvasError {
    fn from(error: png::DecodingError) -> Self {
        Self::PngDecoding(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for CanvasError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<CanvasError> for std::io::Error {
    fn from(error: CanvasError) -> Self {
        match error {
            CanvasError::Io(error) => error,
            _ => Self::new(std::io::ErrorKind::InvalidData, error),
        }
    }
}
