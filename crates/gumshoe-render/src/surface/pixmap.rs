use image::RgbaImage;

use crate::coords::{Affine, Rect};
use crate::paint::Color;

use super::DrawContext;
use super::raster;

#[derive(Debug, Copy, Clone, PartialEq)]
struct DrawState {
    transform: Affine,
    global_alpha: f32,
    fill: Color,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            fill: Color::BLACK,
        }
    }
}

/// Offscreen drawing target: premultiplied RGBA8 pixels plus canvas-like state.
///
/// A surface is exclusively owned (one per layer, one per destination canvas).
/// `draw_ops()` counts every pixel-mutating call, which lets callers observe
/// whether a frame actually touched a surface.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    state: DrawState,
    stack: Vec<DrawState>,
    image_smoothing: bool,
    draw_ops: u64,
}

impl Surface {
    /// Creates a transparent surface. Zero dimensions are allowed (nothing draws).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            state: DrawState::default(),
            stack: Vec::new(),
            image_smoothing: false,
            draw_ops: 0,
        }
    }

    /// Reallocates the pixel buffer.
    ///
    /// Content and draw state are discarded even when the size is unchanged,
    /// matching canvas resize semantics. Image smoothing and the op counter survive.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
        self.state = DrawState::default();
        self.stack.clear();
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Number of pixel-mutating calls since construction.
    #[inline]
    pub fn draw_ops(&self) -> u64 {
        self.draw_ops
    }

    /// Current transform (for tests and debugging overlays).
    #[inline]
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (w, h) = self.size();
        (x < w && y < h).then(|| Color::from_premul_u8(self.pixels.get_pixel(x, y).0))
    }

    /// Raw premultiplied storage.
    #[inline]
    pub fn as_premul_image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Straight-alpha copy, suitable for encoding to PNG.
    pub fn to_image(&self) -> RgbaImage {
        let mut out = self.pixels.clone();
        for px in out.pixels_mut() {
            px.0 = Color::from_premul_u8(px.0).to_straight_u8();
        }
        out
    }

    #[inline]
    fn bump(&mut self) {
        self.draw_ops = self.draw_ops.wrapping_add(1);
    }
}

impl DrawContext for Surface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        // Unbalanced restore is a no-op, as on a canvas.
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform.rotate(radians);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.scale(sx, sy);
    }

    fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn image_smoothing(&self) -> bool {
        self.image_smoothing
    }

    fn set_image_smoothing(&mut self, enabled: bool) {
        self.image_smoothing = enabled;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.bump();
        let color = self.state.fill.faded(self.state.global_alpha);
        raster::rasterize(&mut self.pixels, self.state.transform, rect, |_| Some(color));
    }

    fn draw_image(&mut self, image: &RgbaImage, src: Option<Rect>, dest: Rect) {
        self.bump();
        let Some(region) = raster::source_region(image, src) else {
            return;
        };
        let dest = dest.normalized();
        if dest.is_empty() {
            return;
        }

        let alpha = self.state.global_alpha;
        let smooth = self.image_smoothing;
        let (rx0, ry0, rx1, ry1) = region;
        let sx = (rx1 - rx0) as f32 / dest.width();
        let sy = (ry1 - ry0) as f32 / dest.height();

        raster::rasterize(&mut self.pixels, self.state.transform, dest, |p| {
            let u = rx0 as f32 + (p.x - dest.x()) * sx;
            let v = ry0 as f32 + (p.y - dest.y()) * sy;
            Some(raster::sample(image, region, u, v, smooth).faded(alpha))
        });
    }

    fn draw_surface(&mut self, surface: &Surface, x: f32, y: f32) {
        self.bump();
        let alpha = self.state.global_alpha;
        let t = self.state.transform.translate(x, y);

        let integral = t.a == 1.0 && t.b == 0.0 && t.c == 0.0 && t.d == 1.0 && t.e.fract() == 0.0 && t.f.fract() == 0.0;
        if integral {
            raster::blit_premul(&mut self.pixels, &surface.pixels, t.e as i64, t.f as i64, alpha);
            return;
        }

        let (sw, sh) = surface.size();
        let src = &surface.pixels;
        raster::rasterize(&mut self.pixels, t, Rect::new(0.0, 0.0, sw as f32, sh as f32), |p| {
            let px = src.get_pixel((p.x as u32).min(sw - 1), (p.y as u32).min(sh - 1));
            Some(Color::from_premul_u8(px.0).faded(alpha))
        });
    }

    fn clear(&mut self) {
        self.bump();
        for px in self.pixels.pixels_mut() {
            px.0 = [0, 0, 0, 0];
        }
    }

    fn fill(&mut self, color: Color) {
        self.bump();
        let value = color.to_premul_u8();
        for px in self.pixels.pixels_mut() {
            px.0 = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_hex("#ff0000").unwrap()
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn save_restore_round_trips_transform_and_alpha() {
        let mut s = Surface::new(4, 4);
        s.save();
        s.translate(3.0, 2.0);
        s.set_global_alpha(0.25);
        s.restore();
        assert!(s.transform().is_identity());
        assert_eq!(s.global_alpha(), 1.0);
    }

    #[test]
    fn global_alpha_is_clamped() {
        let mut s = Surface::new(1, 1);
        s.set_global_alpha(3.0);
        assert_eq!(s.global_alpha(), 1.0);
        s.set_global_alpha(-1.0);
        assert_eq!(s.global_alpha(), 0.0);
    }

    #[test]
    fn resize_discards_content() {
        let mut s = Surface::new(4, 4);
        s.fill(Color::WHITE);
        s.resize(8, 2);
        assert_eq!(s.size(), (8, 2));
        assert_eq!(s.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn fill_rect_uses_transform() {
        let mut s = Surface::new(10, 10);
        s.set_fill_color(red());
        s.translate(5.0, 5.0);
        s.fill_rect(Rect::new(-1.0, -1.0, 2.0, 2.0));
        assert_eq!(s.pixel(4, 4).unwrap().to_premul_u8(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(5, 5).unwrap().to_premul_u8(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(6, 6), Some(Color::TRANSPARENT));
    }

    #[test]
    fn draw_image_scales_nearest() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));

        let mut s = Surface::new(4, 2);
        s.draw_image(&img, None, Rect::new(0.0, 0.0, 4.0, 2.0));
        assert_eq!(s.pixel(1, 1).unwrap().to_premul_u8(), [255, 0, 0, 255]);
        assert_eq!(s.pixel(2, 0).unwrap().to_premul_u8(), [0, 0, 255, 255]);
    }

    #[test]
    fn draw_image_from_source_region() {
        let mut sheet = RgbaImage::new(4, 1);
        sheet.put_pixel(3, 0, image::Rgba([0, 255, 0, 255]));

        let mut s = Surface::new(2, 2);
        s.draw_image(&sheet, Some(Rect::new(3.0, 0.0, 1.0, 1.0)), Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(s.pixel(1, 1).unwrap().to_premul_u8(), [0, 255, 0, 255]);
    }

    #[test]
    fn draw_surface_applies_global_alpha() {
        let mut layer = Surface::new(2, 2);
        layer.fill(Color::WHITE);

        let mut dst = Surface::new(2, 2);
        dst.fill(Color::BLACK);
        dst.set_global_alpha(0.5);
        dst.draw_surface(&layer, 0.0, 0.0);
        assert_eq!(dst.pixel(0, 0).unwrap().to_premul_u8(), [128, 128, 128, 255]);
    }

    #[test]
    fn ops_are_counted() {
        let mut s = Surface::new(2, 2);
        s.clear();
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        s.set_global_alpha(0.5);
        assert_eq!(s.draw_ops(), 2);
    }

    #[test]
    fn to_image_unpremultiplies() {
        let mut s = Surface::new(1, 1);
        s.fill(Color::from_straight(1.0, 0.0, 0.0, 0.5));
        assert_eq!(s.to_image().get_pixel(0, 0).0, [255, 0, 0, 128]);
    }
}
