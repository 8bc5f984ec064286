//! File type detection

use std::path::Path;

/// Extensions accepted for upload, including the leading dot
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".doc", ".txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            // legacy .doc is routed to the docx reader, which rejects it
            "docx" | "doc" => FileType::Docx,
            "txt" => FileType::Text,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path) != FileType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_supported_extensions_case_insensitively() {
        assert_eq!(FileType::from_path(Path::new("cv.PDF")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("cv.docx")), FileType::Docx);
        assert_eq!(FileType::from_path(Path::new("cv.doc")), FileType::Docx);
        assert_eq!(FileType::from_path(Path::new("notes.txt")), FileType::Text);
    }

    #[test]
    fn test_unknown_and_missing_extensions() {
        assert_eq!(FileType::from_path(Path::new("resume.md")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);
        assert!(!FileType::is_supported(Path::new("image.png")));
    }
}
