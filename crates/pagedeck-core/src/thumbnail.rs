use std::fmt;

use image::{Rgba, RgbaImage};

use crate::types::{EditorError, Result};

/// Fixed pixel width thumbnails are rendered at. Rotation is applied at
/// display time and never re-renders the bitmap.
pub const THUMBNAIL_WIDTH: u32 = 200;

/// Preview image for one page entry, rendered exactly once when the
/// entry is created. Shared by reference when a page is duplicated.
pub struct Thumbnail {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl Thumbnail {
    /// Wrap raw RGBA pixels produced by the rendering collaborator
    pub fn from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(EditorError::Render(format!(
                "expected {expected} bytes of RGBA data for {width}x{height}, got {}",
                rgba.len()
            )));
        }
        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    /// Synthetic preview for pages that have no renderable source, such
    /// as inserted blanks: a white leaf with a gray border.
    pub fn placeholder(width: u32, height: u32) -> Self {
        let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        let border = Rgba([180, 180, 180, 255]);
        for x in 0..width {
            img.put_pixel(x, 0, border);
            img.put_pixel(x, height - 1, border);
        }
        for y in 0..height {
            img.put_pixel(0, y, border);
            img.put_pixel(width - 1, y, border);
        }
        Self {
            rgba: img.into_raw(),
            width,
            height,
        }
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
