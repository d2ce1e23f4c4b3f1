//! Scanline helpers shared by `Surface`'s draw calls.
//!
//! All destination buffers hold premultiplied RGBA8. Geometry is rasterized by
//! inverse-mapping each destination pixel center into local space, so any
//! affine transform (rotation, mirrored scale) goes through the same path.

use image::RgbaImage;

use crate::coords::{Affine, Rect, Vec2};
use crate::paint::Color;

/// Source-over blend of a premultiplied color into one pixel.
#[inline]
pub(crate) fn blend_pixel(dst: &mut RgbaImage, x: u32, y: u32, src: Color) {
    if src.a <= 0.0 {
        return;
    }
    let px = dst.get_pixel_mut(x, y);
    if src.a >= 1.0 {
        px.0 = src.to_premul_u8();
        return;
    }
    let below = Color::from_premul_u8(px.0);
    px.0 = src.over(below).to_premul_u8();
}

/// Pixel-space bounds of `local` under `transform`, clipped to the target.
///
/// Returns `(x0, y0, x1, y1)` with exclusive upper bounds, or `None` when
/// nothing is covered.
fn device_span(dst: &RgbaImage, transform: Affine, local: Rect) -> Option<(u32, u32, u32, u32)> {
    let b = transform.transform_bounds(local);
    if !b.origin.is_finite() || !b.size.is_finite() {
        return None;
    }

    let x0 = b.x().floor().max(0.0);
    let y0 = b.y().floor().max(0.0);
    let x1 = b.right().ceil().min(dst.width() as f32);
    let y1 = b.bottom().ceil().min(dst.height() as f32);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Rasterizes `local` (a rect in pre-transform space) and blends whatever
/// `shade` returns for each covered pixel.
///
/// `shade` receives the pixel center mapped back into local space.
pub(crate) fn rasterize<F>(dst: &mut RgbaImage, transform: Affine, local: Rect, mut shade: F)
where
    F: FnMut(Vec2) -> Option<Color>,
{
    let local = local.normalized();
    if local.is_empty() {
        return;
    }
    let Some(inverse) = transform.inverse() else {
        return;
    };
    let Some((x0, y0, x1, y1)) = device_span(dst, transform, local) else {
        return;
    };

    for y in y0..y1 {
        for x in x0..x1 {
            let p = inverse.apply(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            // Half-open so adjacent tiles never double-cover a pixel.
            if p.x < local.x() || p.x >= local.right() || p.y < local.y() || p.y >= local.bottom() {
                continue;
            }
            if let Some(c) = shade(p) {
                blend_pixel(dst, x, y, c);
            }
        }
    }
}

/// Reads a straight-alpha texel as premultiplied, clamping to `region`.
#[inline]
fn texel(image: &RgbaImage, region: (u32, u32, u32, u32), x: i64, y: i64) -> Color {
    let (rx0, ry0, rx1, ry1) = region;
    let x = x.clamp(rx0 as i64, rx1 as i64 - 1) as u32;
    let y = y.clamp(ry0 as i64, ry1 as i64 - 1) as u32;
    let [r, g, b, a] = image.get_pixel(x, y).0;
    Color::from_rgba_u8(r, g, b, a)
}

/// Samples `image` at continuous texel coordinates `(u, v)`.
///
/// `region` is the source sub-rectangle in whole pixels (exclusive max);
/// sampling never bleeds outside it, which keeps sprite-sheet frames clean.
pub(crate) fn sample(image: &RgbaImage, region: (u32, u32, u32, u32), u: f32, v: f32, smooth: bool) -> Color {
    if !smooth {
        return texel(image, region, u.floor() as i64, v.floor() as i64);
    }

    let fx = u - 0.5;
    let fy = v - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let c00 = texel(image, region, x0, y0);
    let c10 = texel(image, region, x0 + 1, y0);
    let c01 = texel(image, region, x0, y0 + 1);
    let c11 = texel(image, region, x0 + 1, y0 + 1);

    let mix = |a: Color, b: Color, t: f32| {
        Color::from_premul(
            a.r + (b.r - a.r) * t,
            a.g + (b.g - a.g) * t,
            a.b + (b.b - a.b) * t,
            a.a + (b.a - a.a) * t,
        )
    };
    mix(mix(c00, c10, tx), mix(c01, c11, tx), ty)
}

/// Clips a floating source rect to whole image pixels.
pub(crate) fn source_region(image: &RgbaImage, src: Option<Rect>) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = image.dimensions();
    let region = match src {
        None => (0, 0, w, h),
        Some(r) => {
            let r = r.normalized();
            let x0 = r.x().floor().max(0.0) as u32;
            let y0 = r.y().floor().max(0.0) as u32;
            let x1 = (r.right().ceil().max(0.0) as u32).min(w);
            let y1 = (r.bottom().ceil().max(0.0) as u32).min(h);
            (x0, y0, x1, y1)
        }
    };
    (region.2 > region.0 && region.3 > region.1).then_some(region)
}

/// Integer-offset, identity-transform blit of a premultiplied buffer.
pub(crate) fn blit_premul(dst: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64, alpha: f32) {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();

    let x_start = dx.max(0);
    let y_start = dy.max(0);
    let x_end = (dx + sw as i64).min(dw as i64);
    let y_end = (dy + sh as i64).min(dh as i64);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let s = Color::from_premul_u8(src.get_pixel((x - dx) as u32, (y - dy) as u32).0);
            blend_pixel(dst, x as u32, y as u32, s.faded(alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterize_axis_aligned_covers_exact_pixels() {
        let mut img = RgbaImage::new(8, 8);
        rasterize(&mut img, Affine::IDENTITY, Rect::new(2.0, 2.0, 3.0, 2.0), |_| Some(Color::WHITE));
        let covered = img.pixels().filter(|p| p.0[3] == 255).count();
        assert_eq!(covered, 6);
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(5, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn rasterize_clips_to_target() {
        let mut img = RgbaImage::new(4, 4);
        rasterize(&mut img, Affine::IDENTITY, Rect::new(-10.0, -10.0, 100.0, 100.0), |_| Some(Color::WHITE));
        assert!(img.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn nearest_sample_stays_inside_region() {
        let mut img = RgbaImage::new(4, 1);
        img.put_pixel(1, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(2, 0, image::Rgba([0, 0, 255, 255]));
        let c = sample(&img, (1, 0, 2, 1), 3.7, 0.5, false);
        assert_eq!(c.to_premul_u8(), [255, 0, 0, 255]);
    }

    #[test]
    fn source_region_rejects_empty() {
        let img = RgbaImage::new(4, 4);
        assert!(source_region(&img, Some(Rect::new(8.0, 8.0, 2.0, 2.0))).is_none());
        assert_eq!(source_region(&img, None), Some((0, 0, 4, 4)));
    }

    #[test]
    fn blit_respects_offset_and_alpha() {
        let mut src = RgbaImage::new(2, 2);
        for p in src.pixels_mut() {
            p.0 = [255, 255, 255, 255];
        }
        let mut dst = RgbaImage::new(4, 4);
        blit_premul(&mut dst, &src, 3, 3, 0.5);
        assert_eq!(dst.get_pixel(3, 3).0, [128, 128, 128, 128]);
        assert_eq!(dst.get_pixel(2, 2).0, [0, 0, 0, 0]);
    }
}
