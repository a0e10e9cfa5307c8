use crate::{CanvasError, Result, Scalar};

/// Largest number of pixels an image buffer may hold
pub const MAX_PIXELS: usize = 1 << 28;

/// Size of an image in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    /// Non-empty size with at most [`MAX_PIXELS`] pixels
    pub fn new(width: usize, height: usize) -> Result<Self> {
        match width.checked_mul(height) {
            Some(count) if count > 0 && count <= MAX_PIXELS => Ok(Self { width, height }),
            _ => Err(CanvasError::InvalidSize {
                width: width as Scalar,
                height: height as Scalar,
            }),
        }
    }

    /// Size from floating point dimensions rounded to the nearest pixel, both must be
    /// at least one pixel.
    pub fn from_scalars(width: Scalar, height: Scalar) -> Result<Self> {
        let (rwidth, rheight) = (width.round(), height.round());
        // also rejects NaN and infinities before the casts
        if !(rwidth >= 1.0 && rheight >= 1.0 && rwidth * rheight <= MAX_PIXELS as Scalar) {
            return Err(CanvasError::InvalidSize { width, height });
        }
        Self::new(rwidth as usize, rheight as usize)
    }

    /// Number of pixels
    pub fn count(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Width of the image
    pub width: usize,
    /// Height of the image
    pub height: usize,
    /// How many elements we need to skip to get to the next row.
    pub row_stride: usize,
    /// How many elements we need to skip to get to the next column.
    pub col_stride: usize,
}

impl Shape {
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        row * self.row_stride + col * self.col_stride
    }

    #[inline]
    pub fn nth(&self, n: usize) -> Option<(usize, usize)> {
        if self.width == 0 {
            return None;
        }
        let row = n / self.width;
        let col = n - row * self.width;
        (row < self.height).then_some((row, col))
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

pub trait Image {
    type Pixel;

    fn data(&self) -> &[Self::Pixel];

    fn shape(&self) -> Shape;

    fn width(&self) -> usize {
        self.shape().width
    }

    fn height(&self) -> usize {
        self.shape().height
    }

    fn get(&self, row: usize, col: usize) -> Option<&Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data().get(shape.offset(row, col))
    }

    fn iter(&self) -> ImageIter<'_, Self::Pixel> {
        ImageIter {
            index: 0,
            shape: self.shape(),
            data: self.data(),
        }
    }
}

pub struct ImageIter<'a, P> {
    index: usize,
    shape: Shape,
    data: &'a [P],
}

impl<'a, P> Iterator for ImageIter<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        self.nth(0)
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.index += n + 1;
        let (row, col) = self.shape.nth(self.index - 1)?;
        self.data.get(self.shape.offset(row, col))
    }
}

pub trait ImageMut: Image {
    fn data_mut(&mut self) -> &mut [Self::Pixel];

    fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Self::Pixel> {
        let shape = self.shape();
        if row >= shape.height || col >= shape.width {
            return None;
        }
        self.data_mut().get_mut(shape.offset(row, col))
    }

    /// Set all pixels to `value`
    fn fill(&mut self, value: Self::Pixel)
    where
        Self::Pixel: Clone,
    {
        let shape = self.shape();
        let data = self.data_mut();
        for row in 0..shape.height {
            for col in 0..shape.width {
                data[shape.offset(row, col)] = value.clone();
            }
        }
    }

    fn clear(&mut self)
    where
        Self::Pixel: Default + Clone,
    {
        self.fill(Default::default())
    }
}

/// Image that owns its pixels, stored row by row without gaps
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOwned<P> {
    shape: Shape,
    data: Vec<P>,
}

impl<P> ImageOwned<P> {
    /// Wrap row-major pixel data, its length must be `width * height`
    pub fn from_vec(width: usize, height: usize, data: Vec<P>) -> Result<Self> {
        let size = Size::new(width, height)?;
        if data.len() != size.count() {
            return Err(CanvasError::InvalidSize {
                width: width as Scalar,
                height: height as Scalar,
            });
        }
        Ok(Self {
            shape: Self::contiguous(width, height),
            data,
        })
    }

    pub fn new_default(height: usize, width: usize) -> Result<Self>
    where
        P: Default,
    {
        Self::new_with(height, width, |_, _| Default::default())
    }

    /// Image with pixels initialized by `f(row, col)`
    pub fn new_with<F>(height: usize, width: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> P,
    {
        let size = Size::new(width, height)?;
        let mut data = Vec::with_capacity(size.count());
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col))
            }
        }
        Ok(Self {
            shape: Self::contiguous(width, height),
            data,
        })
    }

    fn contiguous(width: usize, height: usize) -> Shape {
        Shape {
            width,
            height,
            row_stride: width,
            col_stride: 1,
        }
    }

    pub fn size(&self) -> Size {
        self.shape.size()
    }

    pub fn into_vec(self) -> Vec<P> {
        self.data
    }
}

impl<P> Image for ImageOwned<P> {
    type Pixel = P;

    fn shape(&self) -> Shape {
        self.shape
    }

    fn data(&self) -> &[Self::Pixel] {
        &self.data
    }
}

impl<P> ImageMut for ImageOwned<P> {
    fn data_mut(&mut self) -> &mut [Self::Pixel] {
        &mut self.data
    }
}

impl<I> Image for &I
where
    I: Image + ?Sized,
{
    type Pixel = I::Pixel;

    fn shape(&self) -> Shape {
        (*self).shape()
    }

    fn data(&self) -> &[Self::Pixel] {
        (*self).data()
    }
}
