use std::path::Path;

use log::debug;

use crate::error::{ExtractoError, Result};
use crate::models::{Page, SourceDocument};

/// Read text-extractor output: JSON pages with positioned words, or plain text
/// with one form feed between pages.
pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let doc = if is_json {
        serde_json::from_str::<SourceDocument>(&content)?
    } else {
        from_plain_text(&content)
    };
    if !doc.has_text() {
        return Err(ExtractoError::EmptyDocument(path.display().to_string()));
    }
    debug!("loaded {} page(s) from {}", doc.pages.len(), path.display());
    Ok(doc)
}

pub fn from_plain_text(content: &str) -> SourceDocument {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut pages: Vec<Page> = content
        .split('\u{c}')
        .map(|text| Page {
            text: text.to_string(),
            words: Vec::new(),
        })
        .collect();
    // pdftotext ends the last page with a form feed too.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.text.trim().is_empty()) {
        pages.pop();
    }
    SourceDocument { pages }
}
