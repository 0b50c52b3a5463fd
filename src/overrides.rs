//! Apply `key=value` arguments to a record.
//!
//! Keys are dotted paths such as `database.url`; `_` works as a separator
//! too, so `database_url` names the same field.

use tracing::debug;

use crate::decode::{Kind, decode};
use crate::error::{DecodeError, YamfigError};
use crate::lookup::lookup;
use crate::record::{Entry, Record};

/// Overlay `key=value` entries onto `record`, in order.
///
/// Entries without exactly one `=` are skipped. The first unknown key or
/// undecodable value stops the stage; entries applied before it stay set.
pub fn from_arguments<R, I>(args: I, record: &mut R) -> Result<(), YamfigError>
where
    R: Record,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    for arg in args {
        let arg = arg.as_ref();
        let Some((key, raw)) = split_argument(arg) else {
            debug!(argument = arg, "skipping argument that is not key=value");
            continue;
        };
        apply(&mut *record, key, raw)?;
    }
    Ok(())
}

/// Split `key=value`, requiring exactly one `=`.
pub fn split_argument(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    (!value.contains('=')).then_some((key, value))
}

fn apply(record: &mut dyn Record, key: &str, raw: &str) -> Result<(), YamfigError> {
    let path = key.replace('_', ".");
    let result = match lookup(record, &path)? {
        Entry::Value(field) => decode(raw, field),
        Entry::Record(_) => Err(DecodeError::UnsupportedType(Kind::Record)),
    };
    result.map_err(|source| YamfigError::InvalidValue {
        key: key.to_string(),
        source,
    })
}
