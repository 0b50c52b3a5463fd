#[cfg(test)]
pub mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TestConfig {
        pub address: String,
        pub count: i64,
        pub passive: bool,
        #[serde(with = "crate::duration")]
        pub period: Duration,
    }

    crate::record!(TestConfig {
        address,
        count,
        passive = "true",
        period = "1m",
    });

    pub const TEST_YAML: &str = "
---
address: http://example.com/
count: 23
passive: false
period: 2m22s
";

    pub const BAD_YAML: &str = "This is really NOT YAML.";

    // -- Fixture for argument overlay tests ------------------------------------

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ArgsConfig {
        pub address: String,
        #[serde(with = "crate::duration")]
        pub timeout: Duration,
        pub sub: SubConfig,
        pub build: String,
    }

    crate::record!(ArgsConfig {
        address,
        timeout,
        sub: nested,
        build: read_only,
    });

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SubConfig {
        pub enabled: bool,
        pub level: i32,
    }

    crate::record!(SubConfig { enabled, level });

    // -- Fixture with collections and snake_case names -------------------------

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RichConfig {
        pub pool_size: u16,
        pub ratio: f64,
        pub tags: Vec<String>,
        pub limits: HashMap<String, u32>,
        pub motd: Option<String>,
        pub database: DbConfig,
    }

    crate::record!(RichConfig {
        pool_size = "4",
        ratio,
        tags = "web, api",
        limits,
        motd,
        database: nested,
    });

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DbConfig {
        pub url: String,
        pub max_conns: usize,
        #[serde(with = "crate::duration")]
        pub retry_delay: Duration,
    }

    crate::record!(DbConfig {
        url,
        max_conns = "10",
        retry_delay = "250ms",
    });

    // -- Fixtures with fields the YAML overlay must not reach -----------------

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct WithSkip {
        pub address: String,
        #[serde(skip)]
        pub runtime_token: String,
    }

    crate::record!(WithSkip { address });

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PartialListing {
        pub name: String,
        pub internal: u32,
    }

    crate::record!(PartialListing { name });

    // -- Fixture whose default cannot be decoded -------------------------------

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BrokenDefault {
        pub port: u16,
    }

    crate::record!(BrokenDefault { port = "eighty" });

    #[test]
    fn fixtures_start_at_zero() {
        let config = TestConfig::default();
        assert_eq!(config.address, "");
        assert_eq!(config.count, 0);
        assert!(!config.passive);
        assert_eq!(config.period, Duration::ZERO);
    }
}
