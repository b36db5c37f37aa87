//! Single-page PDF export of a prediction message.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use crate::config::EXPORT_FILENAME;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const FONT_SIZE: f32 = 14.0;
const LINE_HEIGHT_MM: f32 = 10.0;
/// Characters per line at 14pt Helvetica across the printable width.
const WRAP_CHARS: usize = 70;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    EmptyMessage,
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
}

/// Rendered export, ready to be offered for download.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: &'static str,
    /// Exact text printed on the page.
    pub text: String,
    pub bytes: Vec<u8>,
}

/// Render `message` verbatim onto one A4 page.
pub fn export_result(message: &str) -> Result<ExportedDocument, ExportError> {
    if message.trim().is_empty() {
        return Err(ExportError::EmptyMessage);
    }

    let (doc, page1, layer1) = PdfDocument::new(
        "Prediction Result",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Font(e.to_string()))?;

    let max_lines = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize;
    let top = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
    for (i, line) in wrap_text(message, WRAP_CHARS).iter().take(max_lines).enumerate() {
        let y = top - i as f32 * LINE_HEIGHT_MM;
        layer.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Save(e.to_string()))?;
    let bytes = buf
        .into_inner()
        .map_err(|e| ExportError::Save(format!("PDF buffer error: {e}")))?;

    tracing::debug!(size = bytes.len(), "Prediction exported");

    Ok(ExportedDocument {
        filename: EXPORT_FILENAME,
        text: message.to_string(),
        bytes,
    })
}

/// Greedy word wrap. Words longer than `max_chars` get their own line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
