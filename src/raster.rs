//! Pixel buffer resampling, compositing and PNG codec
use crate::{Image, ImageMut, ImageOwned, Point, RGBA, Result, Scalar, Size, Transform};
#[cfg(feature = "png")]
use std::io::{Read, Write};

/// Offsets closer than this to a pixel center are snapped to it, so that integer
/// translations and right-angle rotations copy pixels without blurring.
const SNAP_EPSILON: Scalar = 1e-6;

/// Resample `src` into a new image of `size`
///
/// `pixel_map` maps pixel positions of `src` to pixel positions of the result. Every
/// result pixel is sampled bilinearly at the inverse-mapped pixel center, pixels that
/// fall outside of the source are filled with `background`.
pub fn warp(
    src: &ImageOwned<RGBA>,
    size: Size,
    pixel_map: Transform,
    background: RGBA,
) -> Result<ImageOwned<RGBA>> {
    let inverse = pixel_map.invert()?;
    let _span = tracing::debug_span!("[warp]", width = size.width, height = size.height).entered();
    ImageOwned::new_with(size.height, size.width, |row, col| {
        let pos = inverse.apply((col as Scalar + 0.5, row as Scalar + 0.5));
        sample(src, pos - Point::new(0.5, 0.5), background)
    })
}

/// Bilinear sample at a position given in pixel index space
fn sample(src: &ImageOwned<RGBA>, pos: Point, background: RGBA) -> RGBA {
    let snap = |value: Scalar| {
        let round = value.round();
        if (value - round).abs() < SNAP_EPSILON {
            round
        } else {
            value
        }
    };
    let (x, y) = (snap(pos.x()), snap(pos.y()));
    if !x.is_finite() || !y.is_finite() {
        return background;
    }
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = ((x - x0) as f32, (y - y0) as f32);
    let pixel = |col: Scalar, row: Scalar| -> RGBA {
        if col < 0.0 || row < 0.0 {
            return background;
        }
        src.get(row as usize, col as usize)
            .copied()
            .unwrap_or(background)
    };
    if fx == 0.0 && fy == 0.0 {
        return pixel(x0, y0);
    }
    let taps = [
        (pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (pixel(x0 + 1.0, y0), fx * (1.0 - fy)),
        (pixel(x0, y0 + 1.0), (1.0 - fx) * fy),
        (pixel(x0 + 1.0, y0 + 1.0), fx * fy),
    ];
    let mut acc = [0.0f32; 4];
    for (color, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        for (acc, channel) in acc.iter_mut().zip(color.to_premultiplied()) {
            *acc += channel * weight;
        }
    }
    RGBA::from_premultiplied(acc)
}

/// Alpha composite `src` over `dst` with the top-left corner of `src` at `(x, y)`,
/// parts outside of `dst` are clipped.
pub fn composite<I>(dst: &mut ImageOwned<RGBA>, src: &I, x: i64, y: i64)
where
    I: Image<Pixel = RGBA> + ?Sized,
{
    let (dst_width, dst_height) = (dst.width() as i64, dst.height() as i64);
    for row in 0..src.height() as i64 {
        let dst_row = y + row;
        if dst_row < 0 || dst_row >= dst_height {
            continue;
        }
        for col in 0..src.width() as i64 {
            let dst_col = x + col;
            if dst_col < 0 || dst_col >= dst_width {
                continue;
            }
            let Some(color) = src.get(row as usize, col as usize).copied() else {
                continue;
            };
            if let Some(pixel) = dst.get_mut(dst_row as usize, dst_col as usize) {
                *pixel = pixel.blend_over(color);
            }
        }
    }
}

/// Encode image as 8-bit RGBA PNG
#[cfg(feature = "png")]
pub fn write_png<W: Write>(image: &ImageOwned<RGBA>, out: W) -> Result<()> {
    let mut encoder = png::Encoder::new(out, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(bytemuck::cast_slice(image.data()))?;
    writer.finish()?;
    Ok(())
}

/// Decode PNG image of any color type into RGBA pixels
#[cfg(feature = "png")]
pub fn read_png<R: Read>(input: R) -> Result<ImageOwned<RGBA>> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let header = reader.info();
    Size::new(header.width as usize, header.height as usize)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];
    let pixels: Vec<RGBA> = match info.color_type {
        png::ColorType::Rgba => bytes
            .chunks_exact(4)
            .map(|c| RGBA::new(c[0], c[1], c[2], c[3]))
            .collect(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| RGBA::new(c[0], c[1], c[2], 255))
            .collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|c| RGBA::new(c[0], c[0], c[0], c[1]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&c| RGBA::new(c, c, c, 255)).collect(),
        png::ColorType::Indexed => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "indexed PNG was not expanded",
            )
            .into());
        }
    };
    tracing::debug!("[read_png] {}x{} {:?}", info.width, info.height, info.color_type);
    ImageOwned::from_vec(info.width as usize, info.height as usize, pixels)
}
