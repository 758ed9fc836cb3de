//! Immutable snapshot of the environment the configuration is resolved from.
//!
//! The process environment is captured once; every resolver takes the
//! snapshot as a parameter instead of reading process-wide state.

use regex_lite::{Captures, Regex};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::sync::OnceLock;
use tracing::warn;

/// Environment variable names.
pub mod vars {
    pub const MNEMONIC_FILE: &str = "MNEMONIC_FILE";
    pub const HOME: &str = "HOME";
    pub const PK: &str = "PK";
    pub const CUSTOM_DETERMINISTIC_DEPLOYMENT: &str = "CUSTOM_DETERMINISTIC_DEPLOYMENT";
    pub const INFURA_KEY: &str = "INFURA_KEY";
    pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
    pub const COVERAGE: &str = "COVERAGE";
    pub const SINGLETON_FACTORY_ARTIFACTS: &str = "SINGLETON_FACTORY_ARTIFACTS";
}

/// Point-in-time copy of environment variables.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build a snapshot from raw OS pairs.
    ///
    /// Variables whose name or value is not valid unicode are skipped with
    /// a warning.
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_pairs(pairs.into_iter().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    warn!(var = %key, "Skipping environment variable with non-unicode value");
                    None
                }
                (Err(key), _) => {
                    warn!(
                        var = %key.to_string_lossy(),
                        "Skipping environment variable with non-unicode name"
                    );
                    None
                }
            }
        }))
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn mnemonic_file(&self) -> Option<&str> {
        self.get(vars::MNEMONIC_FILE)
    }

    pub fn home(&self) -> Option<&str> {
        self.get(vars::HOME)
    }

    /// Explicit signing secret. An empty `PK` counts as unset.
    pub fn private_key(&self) -> Option<&str> {
        self.get(vars::PK).filter(|pk| !pk.is_empty())
    }

    /// Only the exact string `"true"` enables deterministic deployment.
    pub fn deterministic_deployment_enabled(&self) -> bool {
        self.get(vars::CUSTOM_DETERMINISTIC_DEPLOYMENT) == Some("true")
    }

    pub fn infura_key(&self) -> Option<&str> {
        self.get(vars::INFURA_KEY)
    }

    pub fn etherscan_api_key(&self) -> Option<&str> {
        self.get(vars::ETHERSCAN_API_KEY)
    }

    /// Any non-empty `COVERAGE` value enables coverage mode.
    pub fn coverage_enabled(&self) -> bool {
        self.get(vars::COVERAGE).is_some_and(|v| !v.is_empty())
    }

    pub fn factory_artifacts_dir(&self) -> Option<&str> {
        self.get(vars::SINGLETON_FACTORY_ARTIFACTS)
    }

    /// Expand `${VAR_NAME}` placeholders from the snapshot.
    ///
    /// Unknown variables keep their placeholder.
    pub fn expand(&self, template: &str) -> String {
        placeholder_pattern()
            .replace_all(template, |caps: &Captures<'_>| {
                self.get(&caps[1])
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

// Values may hold secrets; only names are printed.
impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}
