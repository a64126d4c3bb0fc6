// ============================================================================
// CONVOLUTION FILTERS — fixed-kernel effects + gaussian blur
// ============================================================================
//
// All filters are pure: (source) -> new image, nothing shared.
// Kernels run over R, G and B with clamp-to-edge sampling; alpha is carried
// over from the source pixel untouched. Rows are processed in parallel.
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

/// Blur strength of the fixed gaussian filter (standard deviation).
const GAUSSIAN_SIGMA: f32 = 3.0;

/// A square convolution kernel with a divisor and bias, matching the
/// classic built-in filter definitions.
struct Kernel {
    size: usize,
    div: f32,
    bias: f32,
    weights: &'static [f32],
}

#[rustfmt::skip]
const BLUR_KERNEL: Kernel = Kernel {
    size: 5, div: 16.0, bias: 0.0,
    weights: &[
        1.0, 1.0, 1.0, 1.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 1.0, 1.0, 1.0, 1.0,
    ],
};

#[rustfmt::skip]
const SHARPEN_KERNEL: Kernel = Kernel {
    size: 3, div: 16.0, bias: 0.0,
    weights: &[
        -2.0, -2.0, -2.0,
        -2.0, 32.0, -2.0,
        -2.0, -2.0, -2.0,
    ],
};

#[rustfmt::skip]
const EDGE_ENHANCE_KERNEL: Kernel = Kernel {
    size: 3, div: 2.0, bias: 0.0,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0, 10.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
};

#[rustfmt::skip]
const EMBOSS_KERNEL: Kernel = Kernel {
    size: 3, div: 1.0, bias: 128.0,
    weights: &[
        -1.0, 0.0, 0.0,
         0.0, 1.0, 0.0,
         0.0, 0.0, 0.0,
    ],
};

#[rustfmt::skip]
const CONTOUR_KERNEL: Kernel = Kernel {
    size: 3, div: 1.0, bias: 255.0,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  8.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
};

#[rustfmt::skip]
const DETAIL_KERNEL: Kernel = Kernel {
    size: 3, div: 6.0, bias: 0.0,
    weights: &[
         0.0, -1.0,  0.0,
        -1.0, 10.0, -1.0,
         0.0, -1.0,  0.0,
    ],
};

#[rustfmt::skip]
const SMOOTH_KERNEL: Kernel = Kernel {
    size: 3, div: 13.0, bias: 0.0,
    weights: &[
        1.0, 1.0, 1.0,
        1.0, 5.0, 1.0,
        1.0, 1.0, 1.0,
    ],
};

/// Fixed-kernel box blur.
pub fn blur(src: &RgbaImage) -> RgbaImage {
    convolve(src, &BLUR_KERNEL)
}

pub fn sharpen(src: &RgbaImage) -> RgbaImage {
    convolve(src, &SHARPEN_KERNEL)
}

pub fn edge_enhance(src: &RgbaImage) -> RgbaImage {
    convolve(src, &EDGE_ENHANCE_KERNEL)
}

pub fn emboss(src: &RgbaImage) -> RgbaImage {
    convolve(src, &EMBOSS_KERNEL)
}

pub fn contour(src: &RgbaImage) -> RgbaImage {
    convolve(src, &CONTOUR_KERNEL)
}

pub fn detail(src: &RgbaImage) -> RgbaImage {
    convolve(src, &DETAIL_KERNEL)
}

pub fn smooth(src: &RgbaImage) -> RgbaImage {
    convolve(src, &SMOOTH_KERNEL)
}

/// Run a fixed kernel over the image. Samples outside the image clamp to
/// the nearest edge pixel.
fn convolve(src: &RgbaImage, kernel: &Kernel) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w * 4;
    let margin = (kernel.size / 2) as isize;
    let inv_div = 1.0 / kernel.div;

    let mut dst_raw = vec![0u8; stride * h];
    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let mut r = 0.0f32;
                let mut g = 0.0f32;
                let mut b = 0.0f32;
                for ky in 0..kernel.size {
                    let sy = (y as isize + ky as isize - margin).clamp(0, h as isize - 1) as usize;
                    let row = sy * stride;
                    for kx in 0..kernel.size {
                        let sx =
                            (x as isize + kx as isize - margin).clamp(0, w as isize - 1) as usize;
                        let weight = kernel.weights[ky * kernel.size + kx];
                        let pi = row + sx * 4;
                        r += src_raw[pi] as f32 * weight;
                        g += src_raw[pi + 1] as f32 * weight;
                        b += src_raw[pi + 2] as f32 * weight;
                    }
                }
                let pi = x * 4;
                row_out[pi] = (r * inv_div + kernel.bias).round().clamp(0.0, 255.0) as u8;
                row_out[pi + 1] = (g * inv_div + kernel.bias).round().clamp(0.0, 255.0) as u8;
                row_out[pi + 2] = (b * inv_div + kernel.bias).round().clamp(0.0, 255.0) as u8;
                row_out[pi + 3] = src_raw[y * stride + pi + 3];
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
        .unwrap_or_else(|| RgbaImage::new(w as u32, h as u32))
}

// ---------------------------------------------------------------------------
//  Separable gaussian blur (rayon)
// ---------------------------------------------------------------------------

/// Gaussian blur at the fixed application radius. No exposed parameter.
pub fn gaussian_blur(src: &RgbaImage) -> RgbaImage {
    gaussian_blur_sigma(src, GAUSSIAN_SIGMA)
}

/// Build a 1-D gaussian kernel truncated at ceil(3 * sigma), normalized.
fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel = vec![0.0f32; len];
    let mut sum = 0.0f32;
    for (i, v) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *v = (-x * x / s2).exp();
        sum += *v;
    }
    let inv = 1.0 / sum;
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

fn gaussian_blur_sigma(src: &RgbaImage, sigma: f32) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let kernel = build_gaussian_kernel(sigma);
    let radius = kernel.len() / 2;

    // Work in f32 across both passes; quantize once at the end.
    let buf_in: Vec<f32> = src.as_raw().iter().map(|&b| b as f32).collect();
    let count = w * h * 4;

    // Horizontal pass, parallel by row.
    let mut buf_h = vec![0.0f32; count];
    buf_h
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_start = y * w * 4;
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sx = (x as isize + ki as isize - radius as isize)
                        .clamp(0, w as isize - 1) as usize;
                    let pi = row_start + sx * 4;
                    for c in 0..4 {
                        acc[c] += buf_in[pi + c] * kv;
                    }
                }
                let pi = x * 4;
                row_out[pi..pi + 4].copy_from_slice(&acc);
            }
        });

    // Vertical pass, parallel by row.
    let mut buf_v = vec![0.0f32; count];
    buf_v
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row_out)| {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sy = (y as isize + ki as isize - radius as isize)
                        .clamp(0, h as isize - 1) as usize;
                    let pi = sy * w * 4 + x * 4;
                    for c in 0..4 {
                        acc[c] += buf_h[pi + c] * kv;
                    }
                }
                let pi = x * 4;
                row_out[pi..pi + 4].copy_from_slice(&acc);
            }
        });

    let dst_raw: Vec<u8> = buf_v
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
        .unwrap_or_else(|| RgbaImage::new(w as u32, h as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn blur_is_identity_on_flat_image() {
        let src = solid(8, 8, [90, 120, 30, 255]);
        assert_eq!(blur(&src).as_raw(), src.as_raw());
    }

    #[test]
    fn sharpen_is_identity_on_flat_image() {
        let src = solid(6, 6, [200, 10, 99, 255]);
        assert_eq!(sharpen(&src).as_raw(), src.as_raw());
    }

    #[test]
    fn emboss_of_flat_image_is_mid_gray() {
        let src = solid(5, 5, [42, 160, 220, 255]);
        let out = emboss(&src);
        for px in out.pixels() {
            assert_eq!(px, &Rgba([128, 128, 128, 255]));
        }
    }

    #[test]
    fn contour_of_flat_image_is_white() {
        let src = solid(5, 5, [13, 37, 101, 255]);
        let out = contour(&src);
        for px in out.pixels() {
            assert_eq!(px, &Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn convolution_preserves_alpha() {
        let src = solid(4, 4, [50, 60, 70, 77]);
        let out = smooth(&src);
        for px in out.pixels() {
            assert_eq!(px.0[3], 77);
        }
    }

    #[test]
    fn gaussian_blur_preserves_flat_image() {
        let src = solid(12, 9, [64, 64, 64, 255]);
        let out = gaussian_blur(&src);
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn gaussian_kernel_is_normalized() {
        let k = build_gaussian_kernel(3.0);
        assert_eq!(k.len(), 19);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}
