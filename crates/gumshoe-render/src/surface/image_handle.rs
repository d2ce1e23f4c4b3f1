use std::fmt;
use std::sync::{Arc, OnceLock};

use image::RgbaImage;

/// Shared, write-once image slot for sprite pixels.
///
/// An asset loader fulfils the slot whenever decoding finishes; until then
/// `get()` returns `None` and renderers fall back to a flat color. Clones share
/// the slot.
#[derive(Clone, Default)]
pub struct ImageHandle {
    slot: Arc<OnceLock<RgbaImage>>,
}

impl ImageHandle {
    /// Creates an empty (not yet loaded) handle.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Creates an already-loaded handle.
    pub fn ready(image: RgbaImage) -> Self {
        let handle = Self::pending();
        handle.fulfil(image);
        handle
    }

    /// Stores the decoded image. Returns `false` if the slot was already filled.
    pub fn fulfil(&self, image: RgbaImage) -> bool {
        self.slot.set(image).is_ok()
    }

    #[inline]
    pub fn get(&self) -> Option<&RgbaImage> {
        self.slot.get()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// Handles compare by slot identity, not pixel content.
impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(img) => write!(f, "ImageHandle({}x{})", img.width(), img.height()),
            None => f.write_str("ImageHandle(pending)"),
        }
    }
}
