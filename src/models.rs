use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::LoadError;

/// The in-memory result of content loading: raw text plus its tokenized
/// word sequence. Replaced wholesale whenever new content loads.
#[derive(Debug, Clone)]
pub struct Document {
    raw_text: Arc<str>,
    words: Arc<[String]>,
}

impl Document {
    /// Tokenize `text` into a word sequence, splitting on runs of whitespace
    /// and discarding empty tokens.
    pub fn from_text(text: impl Into<String>) -> Self {
        let raw_text: Arc<str> = Arc::from(text.into());
        let words: Arc<[String]> = raw_text
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into();
        Self { raw_text, words }
    }

    /// Create an empty document (no words loaded).
    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub fn raw_text(&self) -> Arc<str> {
        Arc::clone(&self.raw_text)
    }

    /// Immutable shared view of the word sequence.
    pub fn words(&self) -> Arc<[String]> {
        Arc::clone(&self.words)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `index`, or None past the end.
    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }
}

/// Supported document formats. Dispatch on this enum is exhaustive, so
/// adding a format without a handler fails at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Html,
    Css,
    Code,
    Json,
    Csv,
    Pdf,
    Word,
    Odt,
    Rtf,
    Epub,
}

impl DocumentFormat {
    /// Get the human-readable name of the format
    pub fn name(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "plain text",
            DocumentFormat::Markdown => "Markdown",
            DocumentFormat::Html => "HTML",
            DocumentFormat::Css => "CSS",
            DocumentFormat::Code => "source code",
            DocumentFormat::Json => "JSON",
            DocumentFormat::Csv => "CSV",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Word => "Word",
            DocumentFormat::Odt => "OpenDocument",
            DocumentFormat::Rtf => "RTF",
            DocumentFormat::Epub => "EPUB",
        }
    }

    /// Check whether the format is a binary container that needs a
    /// dedicated decoder rather than a text transform.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            DocumentFormat::Pdf | DocumentFormat::Word | DocumentFormat::Odt | DocumentFormat::Epub
        )
    }

    /// Map a declared MIME type to a format.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        // Parameters like "; charset=utf-8" are not part of the type.
        let essence = media_type.split(';').next().unwrap_or("").trim();
        match essence {
            "text/plain" => Some(DocumentFormat::PlainText),
            "text/markdown" => Some(DocumentFormat::Markdown),
            "text/html" | "application/xhtml+xml" => Some(DocumentFormat::Html),
            "text/css" => Some(DocumentFormat::Css),
            "text/javascript" | "application/javascript" => Some(DocumentFormat::Code),
            "application/json" => Some(DocumentFormat::Json),
            "text/csv" => Some(DocumentFormat::Csv),
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/msword"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentFormat::Word)
            }
            "application/vnd.oasis.opendocument.text" => Some(DocumentFormat::Odt),
            "application/rtf" | "text/rtf" => Some(DocumentFormat::Rtf),
            "application/epub+zip" => Some(DocumentFormat::Epub),
            _ => None,
        }
    }

    /// Map a filename extension to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(DocumentFormat::PlainText),
            "md" | "markdown" => Some(DocumentFormat::Markdown),
            "html" | "htm" | "xhtml" => Some(DocumentFormat::Html),
            "css" => Some(DocumentFormat::Css),
            "js" | "ts" | "rs" | "py" | "c" | "cpp" | "java" | "go" => Some(DocumentFormat::Code),
            "json" => Some(DocumentFormat::Json),
            "csv" => Some(DocumentFormat::Csv),
            "pdf" => Some(DocumentFormat::Pdf),
            "doc" | "docx" => Some(DocumentFormat::Word),
            "odt" => Some(DocumentFormat::Odt),
            "rtf" => Some(DocumentFormat::Rtf),
            "epub" => Some(DocumentFormat::Epub),
            _ => None,
        }
    }

    /// Detect the format of a file from its declared media type, falling
    /// back to the filename extension when the type is absent or generic.
    pub fn detect(media_type: &str, file_name: &str) -> Option<Self> {
        let generic = media_type.is_empty() || media_type == "application/octet-stream";
        if !generic {
            if let Some(format) = Self::from_media_type(media_type) {
                return Some(format);
            }
        }
        let extension = Path::new(file_name).extension().and_then(|e| e.to_str())?;
        Self::from_extension(extension)
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A file-like input source: name, declared media type, declared size and
/// the raw bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size,
            bytes,
        }
    }

    /// Read a source file from disk. The size ceiling is checked against
    /// file metadata before any bytes are read.
    pub async fn from_path(path: impl AsRef<Path>, max_size: u64) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > max_size {
            return Err(LoadError::FileTooLarge {
                size: metadata.len(),
                limit: max_size,
            });
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        // Media type left for extension-based detection.
        Ok(Self::new(name, "", bytes))
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Playback state enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Idle => "Idle",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the engine's observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderStatus {
    pub state: PlaybackState,
    pub current_index: usize,
    pub word_count: usize,
    pub speed_wpm: u32,
}

impl ReaderStatus {
    /// Get progress as a ratio (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.word_count > 1 {
            self.current_index as f32 / (self.word_count - 1) as f32
        } else {
            0.0
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing)
    }
}
