use crate::decode::{FieldRef, decode};
use crate::error::YamfigError;
use crate::record::{Entry, Record};

/// Decode each declared default into its field while the field is still zero.
///
/// Nested records are visited recursively. Fields that already hold a
/// non-zero value are left alone, so calling this twice is harmless.
pub fn apply_defaults<R: Record>(record: &mut R) -> Result<(), YamfigError> {
    fill(record, "")
}

fn fill(record: &mut dyn Record, prefix: &str) -> Result<(), YamfigError> {
    for spec in record.fields() {
        let key = format!("{prefix}{}", spec.name);
        match record.field(spec.name) {
            Some(Entry::Record(nested)) => fill(nested, &format!("{key}."))?,
            Some(Entry::Value(FieldRef::Writable(slot))) => {
                let Some(default) = spec.default else {
                    continue;
                };
                if !slot.is_zero() {
                    continue;
                }
                decode(default, FieldRef::Writable(slot))
                    .map_err(|source| YamfigError::InvalidDefault { key, source })?;
            }
            _ => {}
        }
    }
    Ok(())
}
