pub mod epub;
pub mod fetch;
pub mod html;
pub mod markdown;
pub mod office;
pub mod rtf;
pub mod text;

use log::{debug, info};

use crate::error::LoadError;
use crate::models::{DocumentFormat, SourceFile};

/// Default size ceiling for loaded files: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// External text decoder for formats the loader does not decode itself.
///
/// PDF extraction goes through this seam: the loader ships without a PDF
/// implementation and reports a decode failure unless one is injected.
pub trait TextDecoder: Send + Sync {
    /// Human-readable name of the format this decoder handles.
    fn format_name(&self) -> &'static str;

    /// Extract plain text from the file's bytes.
    fn decode(&self, file: &SourceFile) -> Result<String, LoadError>;
}

/// Turns source files of any supported format into plain text ready for
/// tokenization.
pub struct ContentLoader {
    max_file_size: u64,
    pdf_decoder: Option<Box<dyn TextDecoder>>,
}

impl ContentLoader {
    pub fn new() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            pdf_decoder: None,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Install a PDF text decoder. Without one, PDF files fail with a
    /// decode error instead of being misread as text.
    pub fn with_pdf_decoder(mut self, decoder: Box<dyn TextDecoder>) -> Self {
        self.pdf_decoder = Some(decoder);
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Extract plain text from a source file.
    ///
    /// The size ceiling is enforced before any decoding work. Unknown
    /// media types fall back to extension-based detection; files that
    /// match neither are rejected as unsupported.
    pub fn load(&self, file: &SourceFile) -> Result<String, LoadError> {
        if file.size > self.max_file_size {
            return Err(LoadError::FileTooLarge {
                size: file.size,
                limit: self.max_file_size,
            });
        }

        let format = DocumentFormat::detect(&file.media_type, &file.name).ok_or_else(|| {
            LoadError::UnsupportedFormat {
                media_type: file.media_type.clone(),
                file_name: file.name.clone(),
            }
        })?;
        debug!("Loading '{}' as {}", file.name, format);

        let extracted = match format {
            DocumentFormat::PlainText
            | DocumentFormat::Css
            | DocumentFormat::Code
            | DocumentFormat::Json => text::decode_bytes(&file.bytes),
            DocumentFormat::Csv => text::flatten_csv(&text::decode_bytes(&file.bytes)),
            DocumentFormat::Markdown => markdown::strip(&text::decode_bytes(&file.bytes)),
            DocumentFormat::Html => html::extract_text(&text::decode_bytes(&file.bytes)),
            DocumentFormat::Rtf => rtf::strip(&text::decode_bytes(&file.bytes)),
            DocumentFormat::Epub => epub::extract_text(&file.bytes)?,
            DocumentFormat::Word => office::extract_docx(&file.bytes)?,
            DocumentFormat::Odt => office::extract_odt(&file.bytes)?,
            DocumentFormat::Pdf => match &self.pdf_decoder {
                Some(decoder) => decoder.decode(file)?,
                None => {
                    return Err(LoadError::DecodeFailure {
                        format: "PDF".to_string(),
                        reason: "no PDF decoder is configured".to_string(),
                    })
                }
            },
        };

        info!(
            "Extracted {} characters from '{}' ({})",
            extracted.len(),
            file.name,
            format
        );
        Ok(extracted)
    }

    /// Pasted text needs no extraction.
    pub fn load_text(&self, text: &str) -> String {
        text.to_string()
    }

    /// Read a file from disk and extract its text. The size ceiling is
    /// checked against metadata before the bytes are read.
    pub async fn load_path(&self, path: impl AsRef<std::path::Path>) -> Result<String, LoadError> {
        let file = SourceFile::from_path(path, self.max_file_size).await?;
        self.load(&file)
    }

    /// Fetch a URL and extract its text. Responses whose type and name
    /// match no known format are read as HTML, since web pages routinely
    /// arrive without a useful extension or Content-Type.
    pub async fn load_url(&self, fetcher: &fetch::UrlFetcher, url: &str) -> Result<String, LoadError> {
        let file = fetcher.fetch(url).await?;
        match self.load(&file) {
            Err(LoadError::UnsupportedFormat { .. }) => {
                Ok(html::extract_text(&text::decode_bytes(&file.bytes)))
            }
            other => other,
        }
    }
}

impl Default for ContentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePdfDecoder;

    impl TextDecoder for FakePdfDecoder {
        fn format_name(&self) -> &'static str {
            "PDF"
        }

        fn decode(&self, _file: &SourceFile) -> Result<String, LoadError> {
            Ok("extracted pdf text".to_string())
        }
    }

    #[test]
    fn test_plain_text_passthrough() {
        let loader = ContentLoader::new();
        let file = SourceFile::new("notes.txt", "text/plain", b"hello world".to_vec());
        assert_eq!(loader.load(&file).unwrap(), "hello world");
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let loader = ContentLoader::new();
        let file = SourceFile::new("archive.zip", "application/zip", vec![0x50, 0x4b]);

        let err = loader.load(&file).unwrap_err();
        match err {
            LoadError::UnsupportedFormat { media_type, file_name } => {
                assert_eq!(media_type, "application/zip");
                assert_eq!(file_name, "archive.zip");
            }
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_size_ceiling_checked_before_decode() {
        let loader = ContentLoader::new().with_max_file_size(8);
        let file = SourceFile::new("big.txt", "text/plain", vec![b'a'; 16]);

        let err = loader.load(&file).unwrap_err();
        match err {
            LoadError::FileTooLarge { size, limit } => {
                assert_eq!(size, 16);
                assert_eq!(limit, 8);
            }
            other => panic!("Expected FileTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_extension_fallback_for_generic_media_type() {
        let loader = ContentLoader::new();
        let file = SourceFile::new(
            "readme.md",
            "application/octet-stream",
            b"# Title\n\nBody text".to_vec(),
        );
        let extracted = loader.load(&file).unwrap();
        assert!(extracted.contains("Title"));
        assert!(extracted.contains("Body text"));
        assert!(!extracted.contains('#'));
    }

    #[test]
    fn test_csv_flattened() {
        let loader = ContentLoader::new();
        let file = SourceFile::new("data.csv", "text/csv", b"a,b,c\n1,2,3".to_vec());
        assert_eq!(loader.load(&file).unwrap(), "a b c\n1 2 3");
    }

    #[test]
    fn test_pdf_without_decoder_fails() {
        let loader = ContentLoader::new();
        let file = SourceFile::new("doc.pdf", "application/pdf", b"%PDF-1.4".to_vec());

        let err = loader.load(&file).unwrap_err();
        match err {
            LoadError::DecodeFailure { format, .. } => assert_eq!(format, "PDF"),
            other => panic!("Expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_with_injected_decoder() {
        let loader = ContentLoader::new().with_pdf_decoder(Box::new(FakePdfDecoder));
        let file = SourceFile::new("doc.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        assert_eq!(loader.load(&file).unwrap(), "extracted pdf text");
    }

    #[tokio::test]
    async fn test_load_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        tokio::fs::write(&path, "once upon a time").await.unwrap();

        let loader = ContentLoader::new();
        assert_eq!(loader.load_path(&path).await.unwrap(), "once upon a time");
    }
}
