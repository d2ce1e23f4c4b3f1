use image::RgbaImage;

use crate::coords::Rect;
use crate::paint::Color;

use super::Surface;

/// Immediate-mode 2D drawing API.
///
/// Modeled after a canvas 2D context: a current transform and global alpha
/// apply to every draw call, and `save`/`restore` push and pop that state.
/// `clear`/`fill` ignore the transform and global alpha and cover the whole
/// target.
pub trait DrawContext {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn global_alpha(&self) -> f32;
    /// Clamped to `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f32);

    fn image_smoothing(&self) -> bool;
    fn set_image_smoothing(&mut self, enabled: bool);

    fn set_fill_color(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect);

    /// Draws `image` (straight alpha) into `dest`, optionally from a source
    /// sub-rectangle in image pixels.
    fn draw_image(&mut self, image: &RgbaImage, src: Option<Rect>, dest: Rect);

    /// Blits a whole surface with its top-left corner at `(x, y)`.
    fn draw_surface(&mut self, surface: &Surface, x: f32, y: f32);

    /// Wipes to transparent.
    fn clear(&mut self);
    /// Wipes to an opaque (or translucent) color.
    fn fill(&mut self, color: Color);
}
