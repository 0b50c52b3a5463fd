use std::collections::HashMap;

use tracing::debug;

use crate::decode::{FieldRef, decode};
use crate::error::YamfigError;
use crate::record::{Entry, Record};

/// Overlay process environment variables onto `record`.
///
/// Variables whose name or value is not valid Unicode are ignored.
pub fn from_environment<R: Record>(app_name: &str, record: &mut R) -> Result<(), YamfigError> {
    let vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
    from_env_vars(app_name, vars, record)
}

/// Overlay variables from `vars` onto `record`.
///
/// Every writable leaf is bound to `{APP}_{PATH}` where `PATH` is the field
/// path with segments joined by `_` and uppercased, e.g. `FUNAPP_SUB_LEVEL`
/// for `sub.level` under app `funapp`. With an empty `app_name` the prefix
/// is dropped. A variable that is present is decoded even when empty.
/// Read-only fields are never bound.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn from_env_vars<R: Record>(
    app_name: &str,
    vars: impl IntoIterator<Item = (String, String)>,
    record: &mut R,
) -> Result<(), YamfigError> {
    let vars: HashMap<String, String> = vars.into_iter().collect();
    let prefix = if app_name.is_empty() {
        String::new()
    } else {
        format!("{}_", app_name.to_uppercase())
    };
    bind(record, &prefix, &vars)
}

fn bind(
    record: &mut dyn Record,
    prefix: &str,
    vars: &HashMap<String, String>,
) -> Result<(), YamfigError> {
    for spec in record.fields() {
        let name = format!("{prefix}{}", spec.name.to_uppercase());
        match record.field(spec.name) {
            Some(Entry::Record(nested)) => bind(nested, &format!("{name}_"), vars)?,
            Some(Entry::Value(field @ FieldRef::Writable(_))) => {
                let Some(raw) = vars.get(&name) else {
                    continue;
                };
                decode(raw, field).map_err(|source| YamfigError::InvalidEnv {
                    name: name.clone(),
                    source,
                })?;
                debug!(variable = %name, "applied environment variable");
            }
            _ => {}
        }
    }
    Ok(())
}
