use serde_yaml::Value;

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// A null overlay keeps `base`; any other overlay value wins.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(mut base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_val = std::mem::replace(slot, Value::Null);
                        *slot = deep_merge(base_val, overlay_val);
                    }
                    None => {
                        base_map.insert(key, overlay_val);
                    }
                }
            }
            Value::Mapping(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn disjoint_keys_merge() {
        let merged = deep_merge(yaml("host: localhost"), yaml("port: 3000"));
        assert_eq!(merged["host"].as_str().unwrap(), "localhost");
        assert_eq!(merged["port"].as_i64().unwrap(), 3000);
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let merged = deep_merge(yaml("port: 8080"), yaml("port: 3000"));
        assert_eq!(merged["port"].as_i64().unwrap(), 3000);
    }

    #[test]
    fn nested_mappings_recurse() {
        let base = yaml(
            "
            database:
              url: postgres://old
              pool_size: 5
            ",
        );
        let overlay = yaml(
            "
            database:
              pool_size: 20
            ",
        );
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["database"]["url"].as_str().unwrap(), "postgres://old");
        assert_eq!(merged["database"]["pool_size"].as_i64().unwrap(), 20);
    }

    #[test]
    fn overlay_scalar_replaces_mapping() {
        let merged = deep_merge(yaml("database:\n  url: x\n"), yaml("database: flat_string"));
        assert_eq!(merged["database"].as_str().unwrap(), "flat_string");
    }

    #[test]
    fn sequences_replaced_not_appended() {
        let merged = deep_merge(yaml("tags: [a, b]"), yaml("tags: [c]"));
        assert_eq!(merged["tags"], yaml("[c]"));
    }

    #[test]
    fn null_overlay_keeps_base() {
        let base = yaml("port: 8080");
        assert_eq!(deep_merge(base.clone(), Value::Null), base);
        assert_eq!(deep_merge(base.clone(), yaml("")), base);
    }

    #[test]
    fn null_leaf_keeps_base_value() {
        let merged = deep_merge(yaml("port: 8080"), yaml("port: ~"));
        assert_eq!(merged["port"].as_i64().unwrap(), 8080);
    }

    #[test]
    fn empty_base_mapping_takes_overlay() {
        let overlay = yaml("port: 3000");
        let merged = deep_merge(Value::Mapping(Default::default()), overlay.clone());
        assert_eq!(merged, overlay);
    }

    #[test]
    fn multiple_sequential_merges() {
        let merged = deep_merge(
            deep_merge(yaml("host: a"), yaml("port: 1000")),
            yaml("host: c"),
        );
        assert_eq!(merged["host"].as_str().unwrap(), "c");
        assert_eq!(merged["port"].as_i64().unwrap(), 1000);
    }
}
