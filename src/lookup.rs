//! Resolve dotted key paths such as `sub.level` against a [`Record`].
//!
//! Path segments are compared ASCII case-insensitively with field names
//! split on `_`, so `Sub.Level`, `sub.level` and `pool.size` (for a field
//! named `pool_size`) all resolve. When several fields match at one level,
//! a field consuming the whole remaining path is preferred, then the nested
//! record consuming the most segments.

use crate::error::YamfigError;
use crate::record::{Entry, FieldMode, FieldSpec, Record};

/// Find the field addressed by `path`.
///
/// A path that stops on a nested record resolves to [`Entry::Record`].
pub fn lookup<'a>(mut record: &'a mut dyn Record, path: &str) -> Result<Entry<'a>, YamfigError> {
    let not_found = || YamfigError::PathNotFound(path.to_string());
    let segments: Vec<&str> = path.split('.').collect();
    let mut rest = &segments[..];

    loop {
        let (name, used) = select_field(record.fields(), rest).ok_or_else(not_found)?;
        rest = &rest[used..];

        let entry = record.field(name).ok_or_else(not_found)?;
        if rest.is_empty() {
            return Ok(entry);
        }
        match entry {
            Entry::Record(nested) => record = nested,
            Entry::Value(_) => return Err(not_found()),
        }
    }
}

fn select_field(fields: &'static [FieldSpec], segments: &[&str]) -> Option<(&'static str, usize)> {
    let mut best: Option<(&'static str, usize)> = None;
    for spec in fields {
        let Some(used) = matched_segments(spec.name, segments) else {
            continue;
        };
        if used == segments.len() {
            return Some((spec.name, used));
        }
        if spec.mode == FieldMode::Nested && best.is_none_or(|(_, longest)| used > longest) {
            best = Some((spec.name, used));
        }
    }
    best
}

/// How many leading `segments` the field `name` spells out, if any.
fn matched_segments(name: &str, segments: &[&str]) -> Option<usize> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() > segments.len() {
        return None;
    }
    parts
        .iter()
        .zip(segments)
        .all(|(part, segment)| part.eq_ignore_ascii_case(segment))
        .then_some(parts.len())
}
