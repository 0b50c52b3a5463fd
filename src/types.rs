use std::fmt;

use crate::error::YamfigError;

/// One layer of the load pipeline, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Declared field defaults, applied to zero-valued fields.
    Defaults,
    /// The YAML config file.
    File,
    /// Process (or injected) environment variables.
    Environment,
    /// `key=value` arguments.
    Arguments,
}

impl Stage {
    /// Every stage, lowest precedence first.
    pub const ALL: [Stage; 4] = [
        Stage::Defaults,
        Stage::File,
        Stage::Environment,
        Stage::Arguments,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Defaults => "defaults",
            Stage::File => "file",
            Stage::Environment => "environment",
            Stage::Arguments => "arguments",
        };
        f.write_str(name)
    }
}

/// A stage error that best-effort loading logged and moved past.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: YamfigError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage: {}", self.stage, self.error)
    }
}
