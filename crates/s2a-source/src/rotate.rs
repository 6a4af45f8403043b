//! Rotation anti-horaire avec agrandissement du cadre.
//!
//! Reverse mapping: every output pixel is traced back through the inverse
//! rotation and sampled with a bicubic kernel (a = -0.5) in premultiplied
//! alpha, so transparent surroundings do not darken the sprite's edges.

use rayon::prelude::*;
use s2a_core::pixels::PixelBuffer;

/// Bicubic kernel parameter, Catmull-Rom.
const CUBIC_A: f32 = -0.5;

/// Rotate `src` counter-clockwise by `degrees` about its center.
///
/// The output grows to contain the whole rotated image; uncovered corners are
/// transparent. Multiples of 360° return an untouched copy, and exact quarter
/// turns are done losslessly by transposition.
///
/// # Example
/// ```
/// use s2a_core::pixels::PixelBuffer;
/// use s2a_source::rotate::rotate;
///
/// let src = PixelBuffer::new(4, 2);
/// let out = rotate(&src, 90.0);
/// assert_eq!((out.width, out.height), (2, 4));
/// ```
#[must_use]
pub fn rotate(src: &PixelBuffer, degrees: f32) -> PixelBuffer {
    if src.width == 0 || src.height == 0 {
        return src.clone();
    }
    let turn = degrees.rem_euclid(360.0);
    let quarters = turn / 90.0;
    if (quarters - quarters.round()).abs() < 1e-6 {
        return match quarters.round() as u8 % 4 {
            0 => src.clone(),
            n => quarter_turns(src, n),
        };
    }
    rotate_bicubic(src, turn.to_radians())
}

/// Lossless rotation by `n` counter-clockwise quarter turns.
fn quarter_turns(src: &PixelBuffer, n: u8) -> PixelBuffer {
    let (w, h) = (src.width, src.height);
    let mut out = if n == 2 {
        PixelBuffer::new(w, h)
    } else {
        PixelBuffer::new(h, w)
    };
    for y in 0..h {
        for x in 0..w {
            let (r, g, b, a) = src.pixel(x, y);
            let (ox, oy) = match n {
                1 => (y, w - 1 - x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (h - 1 - y, x),
            };
            out.set_pixel(ox, oy, [r, g, b, a]);
        }
    }
    out
}

fn rotate_bicubic(src: &PixelBuffer, radians: f32) -> PixelBuffer {
    let cos_a = radians.cos();
    let sin_a = radians.sin();

    let in_w = src.width as f32;
    let in_h = src.height as f32;

    // Expanded bounds: extents of the rotated corners
    let half_w = (in_w * cos_a.abs() + in_h * sin_a.abs()) / 2.0;
    let half_h = (in_w * sin_a.abs() + in_h * cos_a.abs()) / 2.0;
    let out_w = ((half_w * 2.0) - 1e-3).ceil().max(1.0) as u32;
    let out_h = ((half_h * 2.0) - 1e-3).ceil().max(1.0) as u32;

    let mut output = PixelBuffer::new(out_w, out_h);

    let center_x = out_w as f32 / 2.0;
    let center_y = out_h as f32 / 2.0;
    let in_center_x = in_w / 2.0;
    let in_center_y = in_h / 2.0;

    let out_stride = out_w as usize * 4;

    output
        .data
        .par_chunks_exact_mut(out_stride)
        .enumerate()
        .for_each(|(y_out, row)| {
            let y_f = y_out as f32 + 0.5 - center_y;
            for x_out in 0..out_w as usize {
                let x_f = x_out as f32 + 0.5 - center_x;

                // Inverse rotation, back to pixel-center source coordinates
                let x_src = x_f * cos_a - y_f * sin_a + in_center_x - 0.5;
                let y_src = x_f * sin_a + y_f * cos_a + in_center_y - 0.5;

                let px = sample_bicubic(src, x_src, y_src);
                row[x_out * 4..x_out * 4 + 4].copy_from_slice(&px);
            }
        });

    output
}

#[inline(always)]
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        (((t - 5.0) * t + 8.0) * t - 4.0) * CUBIC_A
    } else {
        0.0
    }
}

/// Sample `src` at fractional pixel-center coordinates; outside is transparent.
fn sample_bicubic(src: &PixelBuffer, x: f32, y: f32) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let w = i64::from(src.width);
    let h = i64::from(src.height);

    // Quick reject: the 4×4 footprint misses the image entirely
    if x0 + 2 < 0 || y0 + 2 < 0 || x0 - 1 >= w || y0 - 1 >= h {
        return [0; 4];
    }

    let wx = [
        cubic_weight(fx + 1.0),
        cubic_weight(fx),
        cubic_weight(1.0 - fx),
        cubic_weight(2.0 - fx),
    ];
    let wy = [
        cubic_weight(fy + 1.0),
        cubic_weight(fy),
        cubic_weight(1.0 - fy),
        cubic_weight(2.0 - fy),
    ];

    // Premultiplied accumulation
    let mut acc = [0.0f32; 4];
    for (j, wyj) in wy.iter().enumerate() {
        let sy = y0 - 1 + j as i64;
        if sy < 0 || sy >= h {
            continue;
        }
        for (i, wxi) in wx.iter().enumerate() {
            let sx = x0 - 1 + i as i64;
            if sx < 0 || sx >= w {
                continue;
            }
            let (r, g, b, a) = src.pixel(sx as u32, sy as u32);
            let weight = wxi * wyj;
            let alpha = f32::from(a) / 255.0;
            acc[0] += f32::from(r) * alpha * weight;
            acc[1] += f32::from(g) * alpha * weight;
            acc[2] += f32::from(b) * alpha * weight;
            acc[3] += f32::from(a) * weight;
        }
    }

    if acc[3] < 0.5 {
        return [0; 4];
    }
    let a = acc[3].min(255.0);
    let unpremul = 255.0 / acc[3];
    [
        (acc[0] * unpremul).round().clamp(0.0, 255.0) as u8,
        (acc[1] * unpremul).round().clamp(0.0, 255.0) as u8,
        (acc[2] * unpremul).round().clamp(0.0, 255.0) as u8,
        a.round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_full_turns_are_identity() {
        let mut src = PixelBuffer::new(5, 3);
        src.set_pixel(4, 0, [1, 2, 3, 255]);
        assert_eq!(rotate(&src, 0.0), src);
        assert_eq!(rotate(&src, 360.0), src);
        assert_eq!(rotate(&src, -720.0), src);
    }

    #[test]
    fn quarter_turn_moves_right_edge_to_top() {
        // Marker on the right edge, middle row
        let mut src = PixelBuffer::new(3, 3);
        src.set_pixel(2, 1, [255, 0, 0, 255]);
        let out = rotate(&src, 90.0);
        assert_eq!(out.pixel(1, 0), (255, 0, 0, 255));
        assert_eq!(out.alpha(2, 1), 0);
    }

    #[test]
    fn half_turn_flips_corners() {
        let mut src = PixelBuffer::new(4, 2);
        src.set_pixel(0, 0, [9, 9, 9, 255]);
        let out = rotate(&src, 180.0);
        assert_eq!((out.width, out.height), (4, 2));
        assert_eq!(out.pixel(3, 1), (9, 9, 9, 255));
    }

    #[test]
    fn quarter_turns_compose_to_identity() {
        let mut src = PixelBuffer::new(4, 3);
        src.set_pixel(1, 2, [7, 8, 9, 255]);
        let out = rotate(&rotate(&src, 90.0), 270.0);
        assert_eq!(out, src);
    }

    #[test]
    fn diagonal_rotation_expands_bounds() {
        let src = PixelBuffer::filled(10, 10, [255, 255, 255, 255]);
        let out = rotate(&src, 45.0);
        // 10·√2 ≈ 14.14
        assert_eq!((out.width, out.height), (15, 15));
        // Center stays opaque, corners are uncovered
        assert!(out.alpha(7, 7) > 250);
        assert_eq!(out.alpha(0, 0), 0);
    }

    #[test]
    fn opaque_color_is_not_darkened_at_edges() {
        let src = PixelBuffer::filled(8, 8, [200, 120, 40, 255]);
        let out = rotate(&src, 30.0);
        for px in out.data.chunks_exact(4) {
            if px[3] > 64 {
                assert!(px[0].abs_diff(200) <= 12, "{px:?}");
            }
        }
    }

    #[test]
    fn cubic_weights_sum_to_one() {
        for step in 0..10 {
            let f = step as f32 / 10.0;
            let sum = cubic_weight(f + 1.0)
                + cubic_weight(f)
                + cubic_weight(1.0 - f)
                + cubic_weight(2.0 - f);
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }
}
