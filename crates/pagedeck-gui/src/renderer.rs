use pagedeck_core::{EditorError, PageRenderer, Result, THUMBNAIL_WIDTH, Thumbnail};
use pdfium_render::prelude::*;

/// Pdfium-backed rendering collaborator. Pdfium is not thread-safe, so
/// each blocking task binds its own instance instead of sharing one.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    pub fn new() -> Result<Self> {
        let pdfium = Self::bind().map_err(|e| EditorError::Render(e.to_string()))?;
        Ok(Self { pdfium })
    }

    /// Bind to the vendored library first, falling back to the system one
    fn bind() -> std::result::Result<Pdfium, PdfiumError> {
        // When running from cargo, the working directory is the workspace root
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        if let Some(vendor_path) = vendor_path {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&vendor_path))
            {
                return Ok(Pdfium::new(binding));
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }

    /// Extract the text content of one page
    pub fn page_text(&self, bytes: &[u8], page_number: u32) -> Result<String> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| EditorError::Render(e.to_string()))?;
        let page = document
            .pages()
            .get(page_number.saturating_sub(1) as u16)
            .map_err(|e| EditorError::Render(e.to_string()))?;
        let text = page
            .text()
            .map_err(|e| EditorError::Render(e.to_string()))?;
        Ok(text.all())
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_page(&self, bytes: &[u8], page_number: u32) -> Result<Thumbnail> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| EditorError::Render(e.to_string()))?;
        let page = document
            .pages()
            .get(page_number.saturating_sub(1) as u16)
            .map_err(|e| EditorError::Render(e.to_string()))?;

        let config = PdfRenderConfig::new().set_target_width(THUMBNAIL_WIDTH as i32);
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| EditorError::Render(e.to_string()))?;

        Thumbnail::from_rgba(
            bitmap.as_rgba_bytes().to_vec(),
            bitmap.width() as u32,
            bitmap.height() as u32,
        )
    }
}
