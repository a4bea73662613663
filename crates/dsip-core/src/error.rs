//! Error types shared by the pipeline, codec, and profile store.

use std::fmt;

/// Result type for pipeline operations.
pub type DsipResult<T> = Result<T, DsipError>;

/// Errors that abort a processing call before any pixel work begins.
#[derive(Debug, thiserror::Error)]
pub enum DsipError {
    /// Input buffers or LUT layout cannot be processed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An image could not be decoded or encoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// I/O error while reading or writing a profile.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Processing was cancelled before all rows were written.
    #[error("processing cancelled")]
    Cancelled,
}

impl DsipError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Failures from the image codec.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single profile line that could not be applied.
///
/// Warnings never abort loading; the affected field keeps its zero value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWarning {
    /// 1-based line number, or `None` when a key is missing entirely.
    pub line: Option<usize>,
    pub kind: ProfileWarningKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileWarningKind {
    /// Line has no `key:value` separator.
    Malformed(String),
    /// Key is not one of the profile fields.
    UnknownKey(String),
    /// Value could not be parsed for the named key.
    InvalidValue { key: &'static str, value: String },
    /// Key appears more than once; the later value wins.
    Duplicate(&'static str),
    /// Key never appeared in the file.
    Missing(&'static str),
}

impl fmt::Display for ProfileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {line}: ")?;
        }
        match &self.kind {
            ProfileWarningKind::Malformed(text) => write!(f, "malformed entry {text:?}"),
            ProfileWarningKind::UnknownKey(key) => write!(f, "unknown key {key:?}"),
            ProfileWarningKind::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
            ProfileWarningKind::Duplicate(key) => write!(f, "duplicate key {key}"),
            ProfileWarningKind::Missing(key) => write!(f, "missing key {key}, using 0"),
        }
    }
}
