use thiserror::Error;

/// Main reader error type
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ReaderError {
    /// Get user-friendly error message with suggested solutions
    pub fn user_message(&self) -> String {
        match self {
            ReaderError::Load(err) => err.user_message(),
            ReaderError::Playback(err) => err.user_message(),
            ReaderError::Config(err) => err.user_message(),
        }
    }

    /// Get suggested recovery actions for the error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReaderError::Load(err) => err.recovery_suggestions(),
            ReaderError::Playback(err) => err.recovery_suggestions(),
            ReaderError::Config(err) => err.recovery_suggestions(),
        }
    }

    /// Check if this error allows for automatic recovery
    pub fn is_recoverable(&self) -> bool {
        match self {
            ReaderError::Load(err) => err.is_recoverable(),
            ReaderError::Playback(_) => false, // Requires a valid seek target
            ReaderError::Config(err) => err.is_recoverable(),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReaderError::Load(LoadError::UnsupportedFormat { .. }) => ErrorSeverity::Warning,
            ReaderError::Load(LoadError::FileTooLarge { .. }) => ErrorSeverity::Warning,
            ReaderError::Load(_) => ErrorSeverity::Error,
            ReaderError::Playback(_) => ErrorSeverity::Info,
            ReaderError::Config(_) => ErrorSeverity::Warning,
        }
    }
}

/// Error severity levels for logging and user feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl ErrorSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSeverity::Info => "INFO",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Error => "ERROR",
            ErrorSeverity::Critical => "CRITICAL",
        }
    }

    pub fn log_level(&self) -> log::Level {
        match self {
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error => log::Level::Error,
            ErrorSeverity::Critical => log::Level::Error,
        }
    }
}

/// Content loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported format: {media_type} ({file_name})")]
    UnsupportedFormat { media_type: String, file_name: String },

    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Decode failure for {format}: {reason}")]
    DecodeFailure { format: String, reason: String },

    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub fn user_message(&self) -> String {
        match self {
            LoadError::UnsupportedFormat { media_type, file_name } => {
                format!("File '{}' has an unsupported type '{}'", file_name, media_type)
            }
            LoadError::FileTooLarge { size, limit } => {
                format!(
                    "File is too large ({:.1} MB) - the limit is {:.1} MB",
                    *size as f64 / (1024.0 * 1024.0),
                    *limit as f64 / (1024.0 * 1024.0)
                )
            }
            LoadError::DecodeFailure { format, reason } => {
                format!("Could not extract text from {} document: {}", format, reason)
            }
            LoadError::FetchFailed { url, reason } => {
                format!("Could not load content from '{}': {}", url, reason)
            }
            LoadError::Io(err) => {
                format!("Cannot read source: {}", err)
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            LoadError::UnsupportedFormat { .. } => vec![
                "Supported formats: TXT, MD, HTML, CSS, JS, JSON, CSV, PDF, DOC/DOCX, ODT, RTF, EPUB".to_string(),
                "Check if the file extension matches the actual format".to_string(),
                "Convert the file to plain text and try again".to_string(),
            ],
            LoadError::FileTooLarge { .. } => vec![
                "Split the document into smaller files".to_string(),
                "Paste the relevant section as plain text instead".to_string(),
            ],
            LoadError::DecodeFailure { .. } => vec![
                "Check that the file is not corrupted or password protected".to_string(),
                "Try exporting the document to plain text or PDF first".to_string(),
                "Scanned documents contain no extractable text".to_string(),
            ],
            LoadError::FetchFailed { .. } => vec![
                "Check the URL and your network connection".to_string(),
                "Some sites block automated fetching - copy the text manually".to_string(),
            ],
            LoadError::Io(_) => vec![
                "Check that the file path is correct".to_string(),
                "Check file permissions".to_string(),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            LoadError::UnsupportedFormat { .. } => false, // Requires a different file
            LoadError::FileTooLarge { .. } => false,      // Requires a smaller file
            LoadError::DecodeFailure { .. } => false,     // Requires a readable document
            LoadError::FetchFailed { .. } => true,        // Network conditions may change
            LoadError::Io(_) => true,                     // Can retry the read
        }
    }
}

/// Playback engine errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Index out of range: {index} (word count: {total})")]
    IndexOutOfRange { index: usize, total: usize },
}

impl PlaybackError {
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::IndexOutOfRange { index, total } => {
                if *total == 0 {
                    format!("Cannot seek to word {} - no content is loaded", index)
                } else {
                    format!("Cannot seek to word {} - document has {} words", index, total)
                }
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PlaybackError::IndexOutOfRange { total, .. } => {
                if *total == 0 {
                    vec!["Load content before seeking".to_string()]
                } else {
                    vec![format!("Use a word index between 0 and {}", total - 1)]
                }
            }
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ConfigDirNotFound => {
                "Cannot find or create configuration directory".to_string()
            }
            ConfigError::IoError(err) => {
                format!("Cannot access configuration file: {}", err)
            }
            ConfigError::SerializationError(_) => {
                "Failed to save configuration settings".to_string()
            }
            ConfigError::DeserializationError(_) => {
                "Configuration file is corrupted or has invalid format".to_string()
            }
        }
    }

    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::ConfigDirNotFound => vec![
                "Check that you have write permissions to your home directory".to_string(),
                "Try creating the directory manually: ~/.config/rsvp-reader/".to_string(),
            ],
            ConfigError::IoError(_) => vec![
                "Check file permissions for the configuration directory".to_string(),
                "Ensure the disk is not full".to_string(),
            ],
            ConfigError::SerializationError(_) => vec![
                "Configuration will use default values".to_string(),
                "Try resetting configuration to defaults".to_string(),
            ],
            ConfigError::DeserializationError(_) => vec![
                "Delete the configuration file to reset to defaults".to_string(),
                "Check the configuration file format manually".to_string(),
            ],
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            ConfigError::ConfigDirNotFound => true,       // Can use defaults
            ConfigError::IoError(_) => true,              // Can retry or use defaults
            ConfigError::SerializationError(_) => true,   // Can keep current settings
            ConfigError::DeserializationError(_) => true, // Can use defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_reader_error_from_load_error() {
        let load_error = LoadError::UnsupportedFormat {
            media_type: "application/zip".to_string(),
            file_name: "archive.zip".to_string(),
        };
        let reader_error: ReaderError = load_error.into();

        match reader_error {
            ReaderError::Load(LoadError::UnsupportedFormat { media_type, .. }) => {
                assert_eq!(media_type, "application/zip");
            }
            _ => panic!("Expected Load error variant"),
        }
    }

    #[test]
    fn test_reader_error_from_playback_error() {
        let playback_error = PlaybackError::IndexOutOfRange { index: 10, total: 4 };
        let reader_error: ReaderError = playback_error.into();

        match reader_error {
            ReaderError::Playback(PlaybackError::IndexOutOfRange { index, total }) => {
                assert_eq!(index, 10);
                assert_eq!(total, 4);
            }
            _ => panic!("Expected Playback error variant"),
        }
    }

    #[test]
    fn test_reader_error_from_config_error() {
        let config_error = ConfigError::ConfigDirNotFound;
        let reader_error: ReaderError = config_error.into();

        match reader_error {
            ReaderError::Config(ConfigError::ConfigDirNotFound) => {}
            _ => panic!("Expected Config error variant"),
        }
    }

    #[test]
    fn test_load_error_display() {
        let error = LoadError::UnsupportedFormat {
            media_type: "application/zip".to_string(),
            file_name: "archive.zip".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Unsupported format: application/zip (archive.zip)"
        );

        let error = LoadError::FileTooLarge { size: 20, limit: 10 };
        assert_eq!(
            format!("{}", error),
            "File too large: 20 bytes exceeds limit of 10 bytes"
        );

        let error = LoadError::DecodeFailure {
            format: "PDF".to_string(),
            reason: "no text content could be extracted".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Decode failure for PDF: no text content could be extracted"
        );

        let error = LoadError::FetchFailed {
            url: "https://example.com".to_string(),
            reason: "connection refused".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Fetch failed for https://example.com: connection refused"
        );
    }

    #[test]
    fn test_playback_error_display() {
        let error = PlaybackError::IndexOutOfRange { index: 7, total: 3 };
        assert_eq!(format!("{}", error), "Index out of range: 7 (word count: 3)");
    }

    #[test]
    fn test_playback_error_user_message_empty_document() {
        let error = PlaybackError::IndexOutOfRange { index: 0, total: 0 };
        assert!(error.user_message().contains("no content is loaded"));
        assert_eq!(error.recovery_suggestions().len(), 1);
    }

    #[test]
    fn test_config_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let config_error: ConfigError = io_error.into();

        match config_error {
            ConfigError::IoError(_) => {}
            _ => panic!("Expected IoError variant"),
        }
    }

    #[test]
    fn test_error_severity_mapping() {
        let warning = ReaderError::Load(LoadError::UnsupportedFormat {
            media_type: "application/zip".to_string(),
            file_name: "a.zip".to_string(),
        });
        assert_eq!(warning.severity(), ErrorSeverity::Warning);
        assert_eq!(warning.severity().log_level(), log::Level::Warn);

        let info = ReaderError::Playback(PlaybackError::IndexOutOfRange { index: 1, total: 0 });
        assert_eq!(info.severity(), ErrorSeverity::Info);

        let error = ReaderError::Load(LoadError::FetchFailed {
            url: "u".to_string(),
            reason: "r".to_string(),
        });
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_recoverability() {
        assert!(LoadError::FetchFailed {
            url: "u".to_string(),
            reason: "r".to_string()
        }
        .is_recoverable());
        assert!(!LoadError::FileTooLarge { size: 2, limit: 1 }.is_recoverable());
        assert!(!ReaderError::Playback(PlaybackError::IndexOutOfRange { index: 1, total: 1 })
            .is_recoverable());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let load_error = LoadError::Io(io_error);
        let reader_error = ReaderError::Load(load_error);

        let mut current_error: &dyn Error = &reader_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert!(error_count >= 1);
    }
}
