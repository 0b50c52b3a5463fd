//! Field tables for destination records.
//!
//! Rust has no runtime reflection, so a record describes its own fields: a
//! static table of [`FieldSpec`]s plus a by-name accessor handing out
//! [`Entry`] handles. Everything that walks a record (defaults, environment
//! variables, argument lookup) goes through this trait.
//!
//! The [`record!`](crate::record!) macro writes the impl for a plain struct:
//!
//! ```ignore
//! #[derive(Default, Serialize, Deserialize)]
//! struct Cfg {
//!     address: String,
//!     #[serde(with = "yamfig::duration")]
//!     timeout: Duration,
//!     sub: Sub,
//! }
//!
//! yamfig::record!(Cfg {
//!     address,
//!     timeout = "30s",
//!     sub: nested,
//! });
//! ```
//!
//! Each entry is a field name, optionally followed by `: nested` (the field
//! is itself a record) or `: read_only` (visible but never written), and
//! optionally by `= "default"`, a string decoded into the field while it
//! still holds its zero value.
//!
//! Only listed fields are reached by the YAML overlay, under their Rust
//! field name. Unlisted fields, such as `#[serde(skip)]` runtime state, are
//! never touched by any stage.

use std::collections::BTreeMap;

use crate::decode::FieldRef;

/// How a field is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Value,
    ReadOnly,
    Nested,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub default: Option<&'static str>,
    pub mode: FieldMode,
}

/// A resolved field: either a leaf value or a nested record.
pub enum Entry<'a> {
    Value(FieldRef<'a>),
    Record(&'a mut dyn Record),
}

/// The fields an overlay document names, nested like the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Touched {
    /// The whole value is replaced.
    Whole,
    /// Only these fields are replaced.
    Fields(BTreeMap<&'static str, Touched>),
}

impl Touched {
    pub fn is_whole(&self) -> bool {
        matches!(self, Touched::Whole)
    }

    /// What is replaced inside the field `name`, if anything.
    pub fn field(&self, name: &str) -> Option<&Touched> {
        match self {
            Touched::Whole => Some(self),
            Touched::Fields(fields) => fields.get(name),
        }
    }
}

/// A structured value whose fields can be listed and reached by name.
pub trait Record {
    /// Fields in declaration order.
    fn fields(&self) -> &'static [FieldSpec];

    /// Borrow the field called `name`, if it exists.
    fn field(&mut self, name: &str) -> Option<Entry<'_>>;

    /// Swap the `touched` fields between `self` and `source`, leaving every
    /// other field of `self` as it was.
    fn adopt(&mut self, source: &mut Self, touched: &Touched)
    where
        Self: Sized;
}

/// Implement [`Record`] for a struct from a list of its fields.
///
/// See the [module docs](crate::record) for the syntax.
#[macro_export]
macro_rules! record {
    (@default) => { None };
    (@default $default:literal) => { Some($default) };

    (@mode) => { $crate::FieldMode::Value };
    (@mode nested) => { $crate::FieldMode::Nested };
    (@mode read_only) => { $crate::FieldMode::ReadOnly };

    (@entry $place:expr) => {
        $crate::Entry::Value($crate::FieldRef::Writable(&mut $place))
    };
    (@entry $place:expr, nested) => {
        $crate::Entry::Record(&mut $place)
    };
    (@entry $place:expr, read_only) => {
        $crate::Entry::Value($crate::FieldRef::ReadOnly(&$place))
    };

    (@adopt $target:expr, $source:expr, $touched:expr) => {
        ::core::mem::swap(&mut $target, &mut $source)
    };
    (@adopt $target:expr, $source:expr, $touched:expr, nested) => {
        $crate::Record::adopt(&mut $target, &mut $source, $touched)
    };
    (@adopt $target:expr, $source:expr, $touched:expr, read_only) => {
        ::core::mem::swap(&mut $target, &mut $source)
    };

    ($ty:ty { $( $field:ident $(: $mode:ident)? $(= $default:literal)? ),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $(
                        $crate::FieldSpec {
                            name: stringify!($field),
                            default: $crate::record!(@default $($default)?),
                            mode: $crate::record!(@mode $($mode)?),
                        },
                    )*
                ];
                FIELDS
            }

            fn field(&mut self, name: &str) -> Option<$crate::Entry<'_>> {
                $(
                    if name == stringify!($field) {
                        return Some($crate::record!(@entry self.$field $(, $mode)?));
                    }
                )*
                None
            }

            fn adopt(&mut self, source: &mut Self, touched: &$crate::Touched) {
                if touched.is_whole() {
                    ::core::mem::swap(self, source);
                    return;
                }
                $(
                    if let Some(inner) = touched.field(stringify!($field)) {
                        $crate::record!(@adopt self.$field, source.$field, inner $(, $mode)?);
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{Kind, Slot};
    use crate::fixtures::test::{ArgsConfig, SubConfig};

    #[test]
    fn table_lists_fields_in_order() {
        let cfg = ArgsConfig::default();
        let names: Vec<&str> = cfg.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["address", "timeout", "sub", "build"]);
    }

    #[test]
    fn modes_and_defaults_recorded() {
        let sub = SubConfig::default();
        let level = sub.fields().iter().find(|f| f.name == "level").unwrap();
        assert_eq!(level.mode, FieldMode::Value);
        assert_eq!(level.default, None);

        let cfg = ArgsConfig::default();
        let fields = cfg.fields();
        assert_eq!(fields[2].mode, FieldMode::Nested);
        assert_eq!(fields[3].mode, FieldMode::ReadOnly);
    }

    #[test]
    fn field_hands_out_writable_slot() {
        let mut cfg = ArgsConfig::default();
        match cfg.field("address") {
            Some(Entry::Value(FieldRef::Writable(slot))) => {
                assert_eq!(slot.kind(), Kind::Text);
            }
            _ => panic!("expected a writable address field"),
        }
    }

    #[test]
    fn nested_field_is_a_record() {
        let mut cfg = ArgsConfig::default();
        assert!(matches!(cfg.field("sub"), Some(Entry::Record(_))));
    }

    #[test]
    fn read_only_field_not_writable() {
        let mut cfg = ArgsConfig::default();
        assert!(matches!(
            cfg.field("build"),
            Some(Entry::Value(FieldRef::ReadOnly(_)))
        ));
    }

    #[test]
    fn adopt_swaps_only_touched_fields() {
        let mut cfg = ArgsConfig {
            address: "keep".into(),
            build: "v1".into(),
            ..ArgsConfig::default()
        };
        let mut source = ArgsConfig {
            address: "new".into(),
            build: "v2".into(),
            sub: SubConfig {
                enabled: true,
                level: 3,
            },
            ..ArgsConfig::default()
        };
        let touched = Touched::Fields(BTreeMap::from([
            ("build", Touched::Whole),
            ("sub", Touched::Fields(BTreeMap::from([("level", Touched::Whole)]))),
        ]));

        cfg.adopt(&mut source, &touched);
        assert_eq!(cfg.address, "keep");
        assert_eq!(cfg.build, "v2");
        assert_eq!(cfg.sub.level, 3);
        assert!(!cfg.sub.enabled);
    }

    #[test]
    fn adopt_whole_replaces_record() {
        let mut cfg = SubConfig::default();
        let mut source = SubConfig {
            enabled: true,
            level: 8,
        };
        cfg.adopt(&mut source, &Touched::Whole);
        assert_eq!(
            cfg,
            SubConfig {
                enabled: true,
                level: 8
            }
        );
    }

    #[test]
    fn unknown_field_is_none() {
        let mut cfg = ArgsConfig::default();
        assert!(cfg.field("nope").is_none());
    }
}
