// ============================================================================
// TRANSFORM OPERATIONS — box-filter resampling
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

/// Resample `src` to `new_w` × `new_h` with an area-averaging (box) filter.
///
/// Each destination pixel is the coverage-weighted mean of the source region
/// it maps onto. Fractional cell coverage at the region edges is included,
/// so non-integer scale factors stay artifact-free in both directions.
pub fn resize_box(src: &RgbaImage, new_w: u32, new_h: u32) -> RgbaImage {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 || new_w == 0 || new_h == 0 || (sw, sh) == (new_w, new_h) {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let src_stride = sw as usize * 4;
    let x_ratio = sw as f64 / new_w as f64;
    let y_ratio = sh as f64 / new_h as f64;

    let dst_stride = new_w as usize * 4;
    let mut dst_raw = vec![0u8; dst_stride * new_h as usize];

    dst_raw
        .par_chunks_mut(dst_stride)
        .enumerate()
        .for_each(|(dy, row_out)| {
            let y0 = dy as f64 * y_ratio;
            let y1 = (dy as f64 + 1.0) * y_ratio;
            let iy0 = y0.floor() as usize;
            let iy1 = (y1.ceil() as usize).min(sh as usize);

            for dx in 0..new_w as usize {
                let x0 = dx as f64 * x_ratio;
                let x1 = (dx as f64 + 1.0) * x_ratio;
                let ix0 = x0.floor() as usize;
                let ix1 = (x1.ceil() as usize).min(sw as usize);

                let mut acc = [0.0f64; 4];
                let mut area = 0.0f64;
                for iy in iy0..iy1 {
                    let wy = (y1.min(iy as f64 + 1.0) - y0.max(iy as f64)).max(0.0);
                    if wy == 0.0 {
                        continue;
                    }
                    let row = iy * src_stride;
                    for ix in ix0..ix1 {
                        let wx = (x1.min(ix as f64 + 1.0) - x0.max(ix as f64)).max(0.0);
                        if wx == 0.0 {
                            continue;
                        }
                        let w = wx * wy;
                        let pi = row + ix * 4;
                        acc[0] += src_raw[pi] as f64 * w;
                        acc[1] += src_raw[pi + 1] as f64 * w;
                        acc[2] += src_raw[pi + 2] as f64 * w;
                        acc[3] += src_raw[pi + 3] as f64 * w;
                        area += w;
                    }
                }

                let pi = dx * 4;
                if area > 0.0 {
                    for c in 0..4 {
                        row_out[pi + c] = (acc[c] / area).round().clamp(0.0, 255.0) as u8;
                    }
                }
            }
        });

    // Raw buffer has exactly new_w * new_h * 4 bytes.
    RgbaImage::from_raw(new_w, new_h, dst_raw).unwrap_or_else(|| RgbaImage::new(new_w, new_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn downscale_dimensions() {
        let src = solid(100, 200, [10, 20, 30, 255]);
        let out = resize_box(&src, 50, 200);
        assert_eq!(out.dimensions(), (50, 200));
        let out = resize_box(&src, 100, 50);
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn two_by_two_averages_to_single_pixel() {
        let mut src = RgbaImage::new(2, 2);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([100, 0, 0, 255]));
        src.put_pixel(0, 1, Rgba([0, 200, 0, 255]));
        src.put_pixel(1, 1, Rgba([0, 0, 60, 255]));

        let out = resize_box(&src, 1, 1);
        assert_eq!(out.get_pixel(0, 0), &Rgba([25, 50, 15, 255]));
    }

    #[test]
    fn upscale_keeps_solid_color() {
        let src = solid(3, 3, [7, 77, 177, 255]);
        let out = resize_box(&src, 9, 5);
        assert_eq!(out.dimensions(), (9, 5));
        for px in out.pixels() {
            assert_eq!(px, &Rgba([7, 77, 177, 255]));
        }
    }

    #[test]
    fn same_size_is_identity() {
        let src = solid(4, 6, [1, 2, 3, 4]);
        let out = resize_box(&src, 4, 6);
        assert_eq!(out.as_raw(), src.as_raw());
    }
}
