use std::path::PathBuf;
use thiserror::Error;

use crate::decode::Kind;

/// Failure to turn a raw string into a field value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("Destination cannot be nil")]
    NilTarget,

    #[error("Destination must be writable")]
    NotWritable,

    #[error("Cannot parse '{value}' as {kind}: {reason}")]
    ParseError {
        value: String,
        kind: Kind,
        reason: String,
    },

    #[error("Map value must be a comma separated list of key:value, got '{0}'")]
    BadMapFormat(String),

    #[error("Cannot decode into unsupported type {0}")]
    UnsupportedType(Kind),

    #[error("Expected a {expected} value, found {found}")]
    Mismatch { expected: Kind, found: &'static str },
}

impl DecodeError {
    pub(crate) fn parse(value: &str, kind: Kind, reason: impl ToString) -> Self {
        DecodeError::ParseError {
            value: value.to_string(),
            kind,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum YamfigError {
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(serde_yaml::Error),

    #[error("Unknown key '{key}' in YAML document")]
    UnknownKey { key: String },

    #[error("Unknown keys in YAML document")]
    UnknownKeys(Vec<YamfigError>),

    #[error("Key not found: {0}")]
    PathNotFound(String),

    #[error("Invalid value for '{key}': {source}")]
    InvalidValue { key: String, source: DecodeError },

    #[error("Invalid value in environment variable {name}: {source}")]
    InvalidEnv { name: String, source: DecodeError },

    #[error("Invalid default for '{key}': {source}")]
    InvalidDefault { key: String, source: DecodeError },
}

impl YamfigError {
    /// True when the error only says the config file does not exist.
    pub fn is_missing_file(&self) -> bool {
        matches!(
            self,
            YamfigError::IoError { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_formats_correctly() {
        let err = DecodeError::parse("yesterday", Kind::Duration, "unknown unit");
        let msg = err.to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("duration"));
        assert!(msg.contains("unknown unit"));
    }

    #[test]
    fn path_not_found_formats() {
        let err = YamfigError::PathNotFound("hey.dress".into());
        assert!(err.to_string().contains("hey.dress"));
    }

    #[test]
    fn invalid_value_includes_key_and_cause() {
        let err = YamfigError::InvalidValue {
            key: "sub.level".into(),
            source: DecodeError::parse("x", Kind::Int { bits: 32 }, "invalid digit"),
        };
        let msg = err.to_string();
        assert!(msg.contains("sub.level"));
        assert!(msg.contains("i32"));
    }

    #[test]
    fn missing_file_detected() {
        let err = YamfigError::IoError {
            path: "config.yml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_missing_file());
        assert!(!YamfigError::PathNotFound("x".into()).is_missing_file());
    }
}
