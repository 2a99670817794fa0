//! Error types for emoji conversion

use crate::config::SUPPORTED_FORMATS;

/// Errors that can occur while building a converter or converting a document
#[derive(Debug, thiserror::Error)]
pub enum EmojiError {
    /// Requested output format is not one of the supported formats
    #[error("Unknown emoji format: '{0}'; supported formats are: {SUPPORTED_FORMATS:?}")]
    UnsupportedFormat(String),
    /// Asset retrieval failed for an embedded SVG
    #[error("Emoji asset unavailable at '{location}': {reason}")]
    AssetUnavailable {
        /// Path or URL that was requested
        location: String,
        /// Underlying I/O or HTTP failure
        reason: String,
    },
    /// Retrieved asset could not be used as an SVG element
    #[error("Invalid emoji asset at '{location}': {reason}")]
    InvalidAsset {
        /// Path or URL that was requested
        location: String,
        /// Why the asset was rejected
        reason: String,
    },
    /// Reference record is incomplete or carries invalid codepoints
    #[error("Malformed emoji record: {0}")]
    MalformedRecord(String),
    /// Reference data could not be decoded
    #[error("Invalid emoji reference data: {0}")]
    ReferenceData(#[from] serde_json::Error),
    /// Site configuration could not be decoded
    #[error("Invalid site configuration: {0}")]
    Config(#[from] serde_yaml::Error),
    /// Document nesting exceeds the traversal limit
    #[error("Document nesting depth {0} exceeds the supported maximum")]
    NestingTooDeep(usize),
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Composite token pattern failed to compile
    #[error("Failed to compile emoji pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// Document serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[source] std::io::Error),
}

impl EmojiError {
    /// Get numeric error code for FFI
    pub fn code(&self) -> u32 {
        match self {
            EmojiError::UnsupportedFormat(_) => 1,
            EmojiError::AssetUnavailable { .. } => 2,
            EmojiError::InvalidAsset { .. } => 3,
            EmojiError::MalformedRecord(_) | EmojiError::ReferenceData(_) => 4,
            EmojiError::Config(_) => 5,
            EmojiError::NestingTooDeep(_) => 6,
            EmojiError::InvalidInput(_) => 7,
            EmojiError::Pattern(_) => 8,
            EmojiError::Serialize(_) => 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message_lists_formats() {
        let err = EmojiError::UnsupportedFormat("gif".to_string());
        let message = err.to_string();
        assert!(message.contains("'gif'"));
        assert!(message.contains("emojione-svg-embed"));
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_asset_error_mentions_location() {
        let err = EmojiError::AssetUnavailable {
            location: "/assets/1f609.svg".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("/assets/1f609.svg"));
        assert_eq!(err.code(), 2);
    }

    #[test]
    fn test_codes_are_distinct_per_kind() {
        let errors = [
            EmojiError::UnsupportedFormat(String::new()),
            EmojiError::AssetUnavailable {
                location: String::new(),
                reason: String::new(),
            },
            EmojiError::InvalidAsset {
                location: String::new(),
                reason: String::new(),
            },
            EmojiError::MalformedRecord(String::new()),
            EmojiError::NestingTooDeep(1001),
            EmojiError::InvalidInput(String::new()),
            EmojiError::Serialize(std::io::Error::other("closed")),
        ];
        let mut codes: Vec<u32> = errors.iter().map(EmojiError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|&code| code != 0 && code != 99));
    }
}
