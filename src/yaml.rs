//! YAML overlay and serialization.
//!
//! Overlaying serializes the record, deep-merges the parsed document on top
//! of it and deserializes the result into a scratch copy. Only the fields
//! the document names are then moved into the record, so keys missing from
//! the document, null leaves (`key: ~`) and fields the serde form does not
//! carry all keep their current value. Nothing is written unless the whole
//! document deserialized cleanly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::YamfigError;
use crate::merge::deep_merge;
use crate::record::{Entry, Record, Touched};
use crate::validate;

/// Overlay the YAML document `yaml` onto `record`.
pub fn from_yaml<R>(yaml: &str, record: &mut R) -> Result<(), YamfigError>
where
    R: Record + Serialize + DeserializeOwned,
{
    overlay(yaml, record, false)
}

/// Read the YAML file at `path` and overlay it onto `record`.
pub fn from_yaml_file<R>(path: impl AsRef<Path>, record: &mut R) -> Result<(), YamfigError>
where
    R: Record + Serialize + DeserializeOwned,
{
    overlay_file(path.as_ref(), record, false)
}

/// Serialize `record` to YAML, starting with a `---` document marker.
pub fn to_yaml<R: Serialize + ?Sized>(record: &R) -> Result<String, YamfigError> {
    let body = serde_yaml::to_string(record).map_err(YamfigError::SerializeError)?;
    Ok(format!("---\n{body}"))
}

pub(crate) fn overlay<R>(yaml: &str, record: &mut R, strict: bool) -> Result<(), YamfigError>
where
    R: Record + Serialize + DeserializeOwned,
{
    let document: Value = serde_yaml::from_str(yaml)?;
    if document.is_null() {
        return Ok(());
    }

    let base = serde_yaml::to_value(&*record).map_err(YamfigError::SerializeError)?;
    let (mut merged, ignored): (R, _) =
        validate::deserialize_tracked(deep_merge(base, document.clone()))?;

    let mut unlisted = Vec::new();
    let touched = match &document {
        Value::Mapping(mapping) => {
            touched_fields(&mut *record, mapping, "", &ignored, &mut unlisted)
        }
        _ => Touched::Whole,
    };
    if !unlisted.is_empty() {
        if strict {
            return Err(validate::unknown_keys_error(unlisted));
        }
        debug!(keys = ?unlisted, "ignoring YAML keys that match no field");
    }

    record.adopt(&mut merged, &touched);
    Ok(())
}

/// Map the document's keys onto the record's field table. Keys that match
/// no listed field, or that serde ignored, land in `unlisted`.
fn touched_fields(
    record: &mut dyn Record,
    document: &Mapping,
    prefix: &str,
    ignored: &[String],
    unlisted: &mut Vec<String>,
) -> Touched {
    let mut fields = BTreeMap::new();
    for (key, value) in document {
        if value.is_null() {
            continue;
        }
        let path = match key.as_str() {
            Some(name) => format!("{prefix}{name}"),
            None => format!("{prefix}{key:?}"),
        };
        let spec = key
            .as_str()
            .and_then(|name| record.fields().iter().find(|spec| spec.name == name));
        let Some(spec) = spec.filter(|_| !ignored.contains(&path)) else {
            unlisted.push(path);
            continue;
        };

        let touched = match (record.field(spec.name), value) {
            (Some(Entry::Record(nested)), Value::Mapping(inner)) => {
                touched_fields(nested, inner, &format!("{path}."), ignored, unlisted)
            }
            _ => Touched::Whole,
        };
        fields.insert(spec.name, touched);
    }
    Touched::Fields(fields)
}

pub(crate) fn overlay_file<R>(path: &Path, record: &mut R, strict: bool) -> Result<(), YamfigError>
where
    R: Record + Serialize + DeserializeOwned,
{
    let content = std::fs::read_to_string(path).map_err(|e| YamfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    overlay(&content, record, strict).map_err(|e| match e {
        YamfigError::Yaml(source) => YamfigError::ParseError {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!(path = %path.display(), "applied YAML config file");
    Ok(())
}
