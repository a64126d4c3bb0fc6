// ============================================================================
// COLOR ADJUSTMENTS — saturation, invert, equalize, channel balance
// ============================================================================
//
// Pure per-pixel operations: (source, params) -> new image.
// Invert, equalize and color balance work on an RGB projection and force
// the result opaque; saturation keeps the source alpha.
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

/// ITU-R 601 luma weights, the classic grayscale projection.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Row-parallel per-pixel map. `transform` receives and returns
/// (r, g, b, a) as f32 in the 0..=255 range.
fn map_pixels<F>(src: &RgbaImage, transform: F) -> RgbaImage
where
    F: Fn(f32, f32, f32, f32) -> (f32, f32, f32, f32) + Sync,
{
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w * 4;
    let mut dst_raw = vec![0u8; stride * h];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                let (r, g, b, a) = transform(
                    row_in[pi] as f32,
                    row_in[pi + 1] as f32,
                    row_in[pi + 2] as f32,
                    row_in[pi + 3] as f32,
                );
                row_out[pi] = r.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 1] = g.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 2] = b.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 3] = a.round().clamp(0.0, 255.0) as u8;
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
        .unwrap_or_else(|| RgbaImage::new(w as u32, h as u32))
}

/// Scale color saturation by `level`: 1.0 leaves the image unchanged,
/// 0.0 is fully grayscale, values above 1.0 oversaturate. Each channel is
/// interpolated between its luma and its original value; alpha is kept.
pub fn saturation(src: &RgbaImage, level: f32) -> RgbaImage {
    map_pixels(src, |r, g, b, a| {
        let gray = luma(r, g, b);
        (
            gray + (r - gray) * level,
            gray + (g - gray) * level,
            gray + (b - gray) * level,
            a,
        )
    })
}

/// Invert every color channel on an RGB projection. The alpha channel is
/// discarded: the result is fully opaque.
pub fn invert(src: &RgbaImage) -> RgbaImage {
    map_pixels(src, |r, g, b, _a| (255.0 - r, 255.0 - g, 255.0 - b, 255.0))
}

/// Scale individual channels of an RGB projection. A `None` factor leaves
/// that channel untouched. The result is fully opaque.
pub fn color_balance(
    src: &RgbaImage,
    r_factor: Option<f32>,
    g_factor: Option<f32>,
    b_factor: Option<f32>,
) -> RgbaImage {
    let rf = r_factor.unwrap_or(1.0);
    let gf = g_factor.unwrap_or(1.0);
    let bf = b_factor.unwrap_or(1.0);
    map_pixels(src, |r, g, b, _a| (r * rf, g * gf, b * bf, 255.0))
}

/// Convert to grayscale, then equalize the intensity histogram.
///
/// The grayscale-first behavior is deliberate: this operation flattens the
/// luminance distribution of the gray projection rather than equalizing
/// each color channel. Output is gray in all three channels, fully opaque.
pub fn equalize(src: &RgbaImage) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let gray: Vec<u8> = (0..w * h)
        .map(|i| {
            let pi = i * 4;
            luma(
                src_raw[pi] as f32,
                src_raw[pi + 1] as f32,
                src_raw[pi + 2] as f32,
            )
            .round()
            .clamp(0.0, 255.0) as u8
        })
        .collect();

    let mut histogram = [0u32; 256];
    for &v in &gray {
        histogram[v as usize] += 1;
    }
    let lut = equalize_lut(&histogram);

    let stride = w * 4;
    let mut dst_raw = vec![0u8; stride * h];
    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_gray = &gray[y * w..(y + 1) * w];
            for x in 0..w {
                let v = lut[row_gray[x] as usize];
                let pi = x * 4;
                row_out[pi] = v;
                row_out[pi + 1] = v;
                row_out[pi + 2] = v;
                row_out[pi + 3] = 255;
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
        .unwrap_or_else(|| RgbaImage::new(w as u32, h as u32))
}

/// Cumulative-histogram lookup table. A degenerate histogram (one occupied
/// bin, or too few samples to spread) maps to identity.
fn equalize_lut(histogram: &[u32; 256]) -> [u8; 256] {
    let mut identity = [0u8; 256];
    for (i, v) in identity.iter_mut().enumerate() {
        *v = i as u8;
    }

    let occupied: Vec<u32> = histogram.iter().copied().filter(|&c| c != 0).collect();
    if occupied.len() <= 1 {
        return identity;
    }
    let total: u64 = occupied.iter().map(|&c| c as u64).sum();
    let step = (total - *occupied.last().unwrap_or(&0) as u64) / 255;
    if step == 0 {
        return identity;
    }

    let mut lut = [0u8; 256];
    let mut n = step / 2;
    for (i, v) in lut.iter_mut().enumerate() {
        *v = (n / step).min(255) as u8;
        n += histogram[i] as u64;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn saturation_level_one_is_identity() {
        let mut src = RgbaImage::new(3, 2);
        for (i, px) in src.pixels_mut().enumerate() {
            *px = Rgba([(i * 40) as u8, 200 - (i * 30) as u8, (i * 17) as u8, 255]);
        }
        let out = saturation(&src, 1.0);
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn saturation_level_zero_is_grayscale() {
        let src = solid(2, 2, [255, 0, 0, 255]);
        let out = saturation(&src, 0.0);
        for px in out.pixels() {
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
        }
    }

    #[test]
    fn saturation_keeps_alpha() {
        let src = solid(2, 2, [10, 80, 160, 99]);
        let out = saturation(&src, 0.5);
        for px in out.pixels() {
            assert_eq!(px.0[3], 99);
        }
    }

    #[test]
    fn invert_flips_channels_and_drops_alpha() {
        let src = solid(1, 1, [100, 200, 50, 128]);
        let out = invert(&src);
        assert_eq!(out.get_pixel(0, 0), &Rgba([155, 55, 205, 255]));
    }

    #[test]
    fn color_balance_scales_only_given_channels() {
        let src = solid(2, 2, [200, 100, 60, 255]);
        let out = color_balance(&src, Some(0.5), None, None);
        for px in out.pixels() {
            assert_eq!(px, &Rgba([100, 100, 60, 255]));
        }
    }

    #[test]
    fn color_balance_forces_opaque() {
        let src = solid(1, 1, [10, 10, 10, 40]);
        let out = color_balance(&src, None, Some(2.0), None);
        assert_eq!(out.get_pixel(0, 0), &Rgba([10, 20, 10, 255]));
    }

    #[test]
    fn equalize_output_is_gray_and_opaque() {
        let mut src = RgbaImage::new(4, 4);
        for (i, px) in src.pixels_mut().enumerate() {
            *px = Rgba([(i * 16) as u8, (255 - i * 10) as u8, (i * 3) as u8, 77]);
        }
        let out = equalize(&src);
        for px in out.pixels() {
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
            assert_eq!(px.0[3], 255);
        }
    }

    #[test]
    fn equalize_of_flat_image_is_identity_mapping() {
        let src = solid(6, 6, [128, 128, 128, 255]);
        let out = equalize(&src);
        for px in out.pixels() {
            assert_eq!(px, &Rgba([128, 128, 128, 255]));
        }
    }
}
