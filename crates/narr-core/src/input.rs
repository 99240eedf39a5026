//! Extraction of the story text from a form submission or a file.

use std::path::Path;

use crate::config::LimitSettings;
use crate::error::{NarrError, NarrResult};
use crate::structure::StructureType;

/// Extensions the upload form accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["txt", "pdf", "doc", "docx"];

/// An uploaded file.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Where the analysed text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Text,
    File,
}

/// Text ready for analysis.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub source: InputSource,
    pub text: String,
}

/// Pick the text to analyse from the submitted fields.
///
/// A non-empty file takes precedence over the text field.
pub fn extract_text(
    text: Option<&str>,
    file: Option<&UploadedFile>,
    limits: &LimitSettings,
) -> NarrResult<ExtractedText> {
    if let Some(file) = file.filter(|f| !f.bytes.is_empty()) {
        let text = decode_file(file, limits)?;
        if text.trim().is_empty() {
            return Err(NarrError::EmptyInput);
        }
        return Ok(ExtractedText { source: InputSource::File, text });
    }

    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(NarrError::EmptyInput);
    }
    check_size(text.len(), limits)?;

    Ok(ExtractedText {
        source: InputSource::Text,
        text: text.to_string(),
    })
}

/// Decode an uploaded file into text. Only plain text files are readable.
pub fn decode_file(file: &UploadedFile, limits: &LimitSettings) -> NarrResult<String> {
    let extension = Path::new(&file.name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        let shown = if extension.is_empty() { file.name.clone() } else { format!(".{}", extension) };
        return Err(NarrError::UnsupportedFileType(shown));
    }
    if extension != "txt" {
        return Err(NarrError::UnreadableDocument(file.name.clone()));
    }

    check_size(file.bytes.len(), limits)?;

    let text = String::from_utf8(file.bytes.clone())
        .map_err(|_| NarrError::InvalidEncoding(file.name.clone()))?;
    // Drop a UTF-8 byte order mark written by some editors.
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Parse the form's structure selector. Empty means auto-detect.
pub fn parse_structure_choice(value: Option<&str>) -> NarrResult<Option<StructureType>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(slug) => slug.parse().map(Some),
    }
}

fn check_size(size: usize, limits: &LimitSettings) -> NarrResult<()> {
    if size > limits.max_input_bytes {
        return Err(NarrError::InputTooLarge {
            size,
            limit: limits.max_input_bytes,
        });
    }
    Ok(())
}
