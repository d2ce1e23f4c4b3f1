use crate::surface::{DrawContext, Surface};

/// Destination the frame coordinator renders into.
///
/// Mirrors an HTML canvas: a layout ("client") size decided by the host, a
/// backing store size in pixels, and a 2D context over the backing store.
pub trait Canvas {
    /// Size the host laid the canvas out at.
    fn client_size(&self) -> (u32, u32);

    /// Pixel size of the backing store. Zero means no usable canvas.
    fn backing_size(&self) -> (u32, u32);

    /// Reallocates the backing store; previous content is lost.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// 2D drawing context over the backing store, if one can be obtained.
    fn context_2d(&mut self) -> Option<&mut dyn DrawContext>;
}

/// Headless canvas over an owned [`Surface`].
///
/// The client size starts equal to the backing size; `set_client_size`
/// simulates the host re-laying out the canvas.
#[derive(Debug, Clone)]
pub struct OffscreenCanvas {
    surface: Surface,
    client: (u32, u32),
}

impl OffscreenCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            client: (width, height),
        }
    }

    pub fn set_client_size(&mut self, width: u32, height: u32) {
        self.client = (width, height);
    }

    /// Rendered pixels.
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

impl Canvas for OffscreenCanvas {
    fn client_size(&self) -> (u32, u32) {
        self.client
    }

    fn backing_size(&self) -> (u32, u32) {
        self.surface.size()
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawContext> {
        Some(&mut self.surface)
    }
}
