//! Clap adapter for yamfig.
//!
//! This module is the **optional integration layer** between yamfig's
//! framework-agnostic loader and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`OverrideArgs`] adds `--config <FILE>` and repeatable `--set KEY=VALUE`
//! flags to an application's parser. [`Loader::cli()`] feeds them to the
//! loader, replacing the default config path and the raw process arguments.
//!
//! If you use a different CLI parser (or no CLI at all), skip this module
//! and call [`Loader::file()`] and [`Loader::args()`] directly.

use std::path::PathBuf;

use clap::Args;

use crate::builder::Loader;

/// Clap-derived config flags.
///
/// Flatten this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: OverrideArgs,
/// }
/// ```
#[derive(Debug, Clone, Default, Args)]
pub struct OverrideArgs {
    /// Read configuration from FILE instead of ./config.yml.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a configuration value (e.g. "sub.level=3"). Repeatable.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

impl Loader {
    /// Use the file and overrides parsed from the command line.
    ///
    /// The `--set` entries replace the process arguments as the arguments
    /// stage. Without `--config` the default file path is kept.
    pub fn cli(self, args: &OverrideArgs) -> Self {
        let loader = match &args.config {
            Some(path) => self.file(path),
            None => self,
        };
        loader.args(args.set.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::ArgsConfig;
    use clap::Parser;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Wrapper so we can use `try_parse_from` on the flattened args.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: OverrideArgs,
    }

    fn parse(args: &[&str]) -> OverrideArgs {
        TestCli::try_parse_from(args).unwrap().config
    }

    #[test]
    fn parse_nothing() {
        let args = parse(&["test"]);
        assert_eq!(args.config, None);
        assert!(args.set.is_empty());
    }

    #[test]
    fn parse_config_short_and_long() {
        assert_eq!(
            parse(&["test", "-c", "app.yml"]).config,
            Some(PathBuf::from("app.yml"))
        );
        assert_eq!(
            parse(&["test", "--config", "/etc/app.yml"]).config,
            Some(PathBuf::from("/etc/app.yml"))
        );
    }

    #[test]
    fn parse_repeated_set() {
        let args = parse(&["test", "--set", "address=x", "-s", "sub.level=2"]);
        assert_eq!(args.set, vec!["address=x", "sub.level=2"]);
    }

    #[test]
    fn set_requires_value() {
        assert!(TestCli::try_parse_from(["test", "--set"]).is_err());
    }

    #[test]
    fn cli_feeds_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yml");
        fs::write(&path, "address: from-file\ntimeout: 5s\n").unwrap();

        let args = parse(&[
            "test",
            "--config",
            path.to_str().unwrap(),
            "--set",
            "sub.level=9",
            "--set",
            "address=from-cli",
        ]);

        let mut cfg = ArgsConfig::default();
        let failures = Loader::new()
            .env_vars(Vec::new())
            .cli(&args)
            .load_into(&mut cfg);

        assert!(failures.is_empty(), "{failures:?}");
        assert_eq!(cfg.address, "from-cli");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.sub.level, 9);
    }

    #[test]
    fn cli_without_config_keeps_default_path() {
        let loader = Loader::new().cli(&OverrideArgs::default());
        assert_eq!(loader.effective_file_path(), PathBuf::from("./config.yml"));
    }

    #[test]
    fn cli_replaces_process_arguments() {
        let mut cfg = ArgsConfig::default();
        let failures = Loader::new()
            .no_file()
            .env_vars(Vec::new())
            .cli(&OverrideArgs::default())
            .load_into(&mut cfg);
        assert!(failures.is_empty());
        assert_eq!(cfg, ArgsConfig::default());
    }
}
