// Text extraction module
// Turns an uploaded file into plain text based on its extension


use std::path::Path;

use docx_rs::{DocumentChild, read_docx};
use tracing::debug;

use crate::{BuddyError, Result};

/// Extract plain text from a PDF, TXT, or DOCX file.
///
/// Any other extension is an error; the caller surfaces it as an ingestion
/// failure.
#[inline]
pub async fn extract_text(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    debug!("Extracting text from {} ({})", path.display(), extension);

    match extension.as_str() {
        "pdf" => {
            let bytes = tokio::fs::read(path).await?;
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| BuddyError::Extraction(format!("Failed to parse PDF: {}", e)))
        }
        "txt" => Ok(tokio::fs::read_to_string(path).await?),
        "docx" => {
            let bytes = tokio::fs::read(path).await?;
            let docx = read_docx(&bytes)
                .map_err(|e| BuddyError::Extraction(format!("Failed to parse DOCX: {}", e)))?;
            Ok(docx_raw_text(&docx))
        }
        other => Err(BuddyError::Extraction(format!(
            "Unsupported file type: {}",
            other
        ))),
    }
}

/// Collect the raw run text of every paragraph, one line per paragraph.
/// Tables and other block elements are skipped.
fn docx_raw_text(docx: &docx_rs::Docx) -> String {
    let mut lines = Vec::new();

    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            lines.push(paragraph.raw_text());
        }
    }

    lines.join("\n")
}
