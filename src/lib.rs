//! Layered configuration for Rust applications: struct defaults, a YAML
//! file, environment variables and `key=value` arguments, applied in that
//! order onto a struct you own.
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! struct AppConfig {
//!     address: String,
//!     #[serde(with = "yamfig::duration")]
//!     timeout: Duration,
//!     database: DbConfig,
//! }
//!
//! yamfig::record!(AppConfig {
//!     address = "127.0.0.1:8080",
//!     timeout = "30s",
//!     database: nested,
//! });
//!
//! let mut config = AppConfig::default();
//! yamfig::load("myapp", "", &mut config);
//! ```
//!
//! That call fills `timeout` with `30s` unless it already holds a value,
//! overlays `./config.yml`, then `MYAPP_ADDRESS`, `MYAPP_TIMEOUT`,
//! `MYAPP_DATABASE_URL` and friends, and finally any `database.url=...`
//! entries among the process arguments.
//!
//! # Layer precedence
//!
//! ```text
//! Declared defaults     record!(T { field = "..." })   only into zero-valued fields
//!        ↑ overridden by
//! YAML file             ./config.yml or Loader::file()
//!        ↑ overridden by
//! Environment vars      APP_FIELD_PATH
//!        ↑ overridden by
//! Arguments             field.path=value
//! ```
//!
//! Every layer is **sparse**: it only touches the fields it names. A YAML
//! file with one key leaves every other field as it was.
//!
//! # Best effort or strict
//!
//! [`load()`] and [`Loader::load_into()`] never fail. Each stage that errors
//! is logged through `tracing` and the next stage still runs; `load_into`
//! also hands the collected [`StageFailure`]s back. The stage functions
//! ([`apply_defaults`], [`from_yaml`], [`from_yaml_file`],
//! [`from_environment`], [`from_arguments`]) and [`Loader::try_load_into()`]
//! return the first error instead. Either way a value that fails to decode
//! never clobbers the field it was aimed at.
//!
//! # Records
//!
//! Rust has no runtime reflection, so each config struct lists its fields
//! with the [`record!`] macro. The macro implements [`Record`], which the
//! defaults, environment and argument stages walk. The YAML stages decode
//! through `serde`, so the struct also derives `Serialize` and
//! `Deserialize`, but they only write the listed fields the document names.
//! Fields left out of [`record!`], such as `#[serde(skip)]` runtime state,
//! are never changed by any stage.
//!
//! # The decoder
//!
//! Environment variables, arguments and defaults are plain strings. The
//! [`decode`](mod@decode) module converts them according to the target field's
//! [`Kind`]:
//!
//! | Kind | Accepted text |
//! |------|---------------|
//! | string, path | anything, verbatim |
//! | bool | `1 t true 0 f false`, any case |
//! | integers | decimal, or `0x`/`0o`/`0b` prefixed; range-checked |
//! | floats | decimal or exponent notation |
//! | duration | `300ms`, `1h30m`, `2.5s` |
//! | list | `a, b, c` |
//! | map | `key:value, key:value` |
//!
//! [`unmarshal`] and [`decode_str`] expose the decoder for plain variables.
//!
//! # Environment variables
//!
//! With app name `myapp`, the field path is uppercased and joined with `_`:
//!
//! | Env var | Field |
//! |---------|-------|
//! | `MYAPP_ADDRESS` | `address` |
//! | `MYAPP_DATABASE_MAX_CONNS` | `database.max_conns` |
//!
//! Fields marked `read_only` in [`record!`] are never bound.
//!
//! # Arguments
//!
//! Entries must contain exactly one `=`; anything else is skipped. Keys are
//! dotted paths matched case-insensitively, and `_` works as a separator
//! too, so `Database.Max.Conns=4`, `database.max_conns=4` and
//! `database_max_conns=4` all reach the same field.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! `OverrideArgs`, a flattenable set of `--config FILE` and `--set KEY=VALUE`
//! flags, plus `Loader::cli()` to feed them to the loader. To use yamfig
//! without clap:
//!
//! ```toml
//! yamfig = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! Decoding failures are [`DecodeError`]s; everything a stage can report
//! is a [`YamfigError`], which wraps the decode error together with the key
//! or variable name that produced it. See the [`error`] module.

pub mod decode;
pub mod duration;
pub mod error;
pub mod record;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod defaults;
mod env;
mod lookup;
mod merge;
mod overrides;
mod validate;
mod yaml;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_CONFIG_PATH, Loader, load};
#[cfg(feature = "clap")]
pub use cli::OverrideArgs;
pub use decode::{Decode, FieldRef, Kind, Slot, Value, decode, decode_str, parse, unmarshal};
pub use defaults::apply_defaults;
pub use env::{from_env_vars, from_environment};
pub use error::{DecodeError, YamfigError};
pub use lookup::lookup;
pub use overrides::{from_arguments, split_argument};
pub use record::{Entry, FieldMode, FieldSpec, Record, Touched};
pub use types::{Stage, StageFailure};
pub use yaml::{from_yaml, from_yaml_file, to_yaml};
