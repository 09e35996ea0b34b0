//! Separable gaussian blur over premultiplied RGBA8 pixels.

use frost_core::TileMode;

/// Normalized gaussian weights covering +-3 sigma.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = (sigma * 3.0).ceil() as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Maps a sample coordinate into `0..len`, or `None` when it reads transparent.
fn resolve(i: i32, len: i32, tile_mode: TileMode) -> Option<i32> {
    if (0..len).contains(&i) {
        return Some(i);
    }
    match tile_mode {
        TileMode::Clamp => Some(i.clamp(0, len - 1)),
        TileMode::Repeat => Some(i.rem_euclid(len)),
        TileMode::Mirror => {
            let period = 2 * len;
            let m = i.rem_euclid(period);
            Some(if m < len { m } else { period - 1 - m })
        }
        TileMode::Decal => None,
    }
}

fn pass(
    src: &[u8],
    dst: &mut [u8],
    width: i32,
    height: i32,
    kernel: &[f32],
    horizontal: bool,
    tile_mode: TileMode,
) {
    let radius = (kernel.len() / 2) as i32;
    let len = if horizontal { width } else { height };
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0f32; 4];
            for (k, &w) in kernel.iter().enumerate() {
                let offset = k as i32 - radius;
                let along = if horizontal { x } else { y } + offset;
                let Some(along) = resolve(along, len, tile_mode) else {
                    continue;
                };
                let (sx, sy) = if horizontal { (along, y) } else { (x, along) };
                let idx = ((sy * width + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += w * src[idx + c] as f32;
                }
            }
            let out = ((y * width + x) as usize) * 4;
            // Keep channels premultiplied: color never exceeds alpha.
            let a = acc[3].round().clamp(0.0, 255.0);
            dst[out + 3] = a as u8;
            for c in 0..3 {
                dst[out + c] = acc[c].round().clamp(0.0, a) as u8;
            }
        }
    }
}

/// Blurs `pixels` (`width * height * 4` premultiplied bytes) in place.
pub fn blur_rgba8_premul(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    sigma_x: f32,
    sigma_y: f32,
    tile_mode: TileMode,
) {
    if width == 0 || height == 0 {
        return;
    }
    let (w, h) = (width as i32, height as i32);
    let mut scratch = vec![0u8; pixels.len()];
    if sigma_x > 0.0 {
        pass(pixels, &mut scratch, w, h, &gaussian_kernel(sigma_x), true, tile_mode);
        pixels.copy_from_slice(&scratch);
    }
    if sigma_y > 0.0 {
        pass(pixels, &mut scratch, w, h, &gaussian_kernel(sigma_y), false, tile_mode);
        pixels.copy_from_slice(&scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized() {
        let k = gaussian_kernel(2.5);
        assert_eq!(k.len() % 2, 1);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn constant_image_is_unchanged_with_clamp() {
        let mut px = [40u8, 30, 20, 200].repeat(6 * 4);
        let before = px.clone();
        blur_rgba8_premul(&mut px, 6, 4, 2.0, 2.0, TileMode::Clamp);
        assert_eq!(px, before);
    }

    #[test]
    fn mirror_reflects_at_edges() {
        assert_eq!(resolve(-1, 4, TileMode::Mirror), Some(0));
        assert_eq!(resolve(4, 4, TileMode::Mirror), Some(3));
        assert_eq!(resolve(-1, 4, TileMode::Repeat), Some(3));
        assert_eq!(resolve(-1, 4, TileMode::Decal), None);
    }
}
