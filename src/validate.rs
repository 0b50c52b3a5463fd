//! Strict-mode validation: detect YAML keys that match no record field.
//!
//! Uses `serde_ignored` while deserializing the merged document into the
//! record type and captures every key the record doesn't consume.

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::YamfigError;

/// Deserialize `document` into `R`, rejecting unconsumed keys when `strict`.
///
/// In lenient mode unknown keys are dropped silently.
pub fn deserialize_checked<R: DeserializeOwned>(
    document: Value,
    strict: bool,
) -> Result<R, YamfigError> {
    let (record, unknown_keys) = deserialize_tracked(document)?;
    if strict && !unknown_keys.is_empty() {
        return Err(unknown_keys_error(unknown_keys));
    }
    Ok(record)
}

/// Deserialize `document` into `R`, returning the dotted paths of the keys
/// it did not consume.
pub fn deserialize_tracked<R: DeserializeOwned>(
    document: Value,
) -> Result<(R, Vec<String>), YamfigError> {
    let mut unknown_keys: Vec<String> = Vec::new();
    let record: R = serde_ignored::deserialize(document, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })?;
    Ok((record, unknown_keys))
}

pub(crate) fn unknown_keys_error(keys: Vec<String>) -> YamfigError {
    let errors = keys
        .into_iter()
        .map(|key| YamfigError::UnknownKey { key })
        .collect();
    YamfigError::UnknownKeys(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{ArgsConfig, TestConfig};

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    const VALID: &str = "
address: http://example.com/
count: 3
passive: true
period: 5s
";

    #[test]
    fn valid_document_passes() {
        let config: TestConfig = deserialize_checked(yaml(VALID), true).unwrap();
        assert_eq!(config.count, 3);
    }

    #[test]
    fn unknown_top_level_key_detected() {
        let mut text = VALID.to_string();
        text.push_str("typo_key: 1\n");
        let result: Result<TestConfig, _> = deserialize_checked(yaml(&text), true);
        match result.unwrap_err() {
            YamfigError::UnknownKeys(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("typo_key"));
            }
            other => panic!("expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn unknown_nested_key_reports_dotted_path() {
        let text = "
address: x
timeout: 1s
build: dev
sub:
  enabled: true
  level: 2
  typo: 3
";
        let result: Result<ArgsConfig, _> = deserialize_checked(yaml(text), true);
        match result.unwrap_err() {
            YamfigError::UnknownKeys(errors) => {
                assert!(errors[0].to_string().contains("sub.typo"));
            }
            other => panic!("expected UnknownKeys, got {other:?}"),
        }
    }

    #[test]
    fn lenient_ignores_unknown_keys() {
        let mut text = VALID.to_string();
        text.push_str("typo_key: 1\n");
        let config: TestConfig = deserialize_checked(yaml(&text), false).unwrap();
        assert_eq!(config.address, "http://example.com/");
    }

    #[test]
    fn tracked_lists_ignored_paths() {
        let mut text = VALID.to_string();
        text.push_str("typo_key: 1\n");
        let (config, ignored): (TestConfig, _) = deserialize_tracked(yaml(&text)).unwrap();
        assert_eq!(config.count, 3);
        assert_eq!(ignored, vec!["typo_key".to_string()]);
    }

    #[test]
    fn type_errors_still_reported() {
        let text = VALID.replace("count: 3", "count: many");
        let result: Result<TestConfig, _> = deserialize_checked(yaml(&text), false);
        assert!(matches!(result.unwrap_err(), YamfigError::Yaml(_)));
    }
}
