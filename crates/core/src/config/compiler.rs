//! Solidity compiler profiles.
//!
//! The project compiles with one default profile, and a handful of hot
//! contracts get a more aggressive profile through per-path overrides.
//! Coverage instrumentation cannot handle the multi-compiler shape, so in
//! coverage mode the whole section collapses to the default profile.

use super::EnvSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default compiler version for the project.
pub const DEFAULT_SOLC_VERSION: &str = "0.8.15";

/// Compiler version for the optimized sources.
pub const OPTIMIZED_SOLC_VERSION: &str = "0.8.17";

/// Optimizer runs used by both profiles.
pub const OPTIMIZER_RUNS: u32 = 1_000_000;

/// Sources compiled with the optimized profile.
pub const OPTIMIZED_SOURCES: &[&str] = &[
    "contracts/core/EntryPoint.sol",
    "contracts/samples/SimpleAccount.sol",
];

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub enabled: bool,
    pub runs: u32,
}

/// Compiler settings block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// Compile through the IR pipeline
    #[serde(rename = "viaIR", default, skip_serializing_if = "is_false")]
    pub via_ir: bool,
    pub optimizer: OptimizerSettings,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A compiler version plus its settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerProfile {
    /// Semver compiler version, e.g. "0.8.17"
    pub version: String,
    pub settings: CompilerSettings,
}

impl CompilerProfile {
    /// Profile with the optimizer enabled for `runs` iterations.
    pub fn optimized(version: impl Into<String>, runs: u32) -> Self {
        Self {
            version: version.into(),
            settings: CompilerSettings {
                optimizer: OptimizerSettings {
                    enabled: true,
                    runs,
                },
                via_ir: false,
            },
        }
    }

    /// Enable the IR pipeline.
    pub fn with_via_ir(mut self) -> Self {
        self.settings.via_ir = true;
        self
    }

    /// The project's default profile.
    pub fn project_default() -> Self {
        Self::optimized(DEFAULT_SOLC_VERSION, OPTIMIZER_RUNS)
    }

    /// The profile applied to [`OPTIMIZED_SOURCES`].
    pub fn project_optimized() -> Self {
        Self::optimized(OPTIMIZED_SOLC_VERSION, OPTIMIZER_RUNS).with_via_ir()
    }
}

/// Per-source profile overrides keyed by source path.
pub type CompilerOverrideMap = BTreeMap<String, CompilerProfile>;

/// The project's override map.
pub fn project_overrides() -> CompilerOverrideMap {
    OPTIMIZED_SOURCES
        .iter()
        .map(|path| (path.to_string(), CompilerProfile::project_optimized()))
        .collect()
}

/// Global compilation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompilerMode {
    /// Default profile plus per-path overrides
    #[default]
    Standard,
    /// Single flat profile for coverage instrumentation
    Coverage,
}

impl CompilerMode {
    pub fn from_env(env: &EnvSnapshot) -> Self {
        if env.coverage_enabled() {
            Self::Coverage
        } else {
            Self::Standard
        }
    }
}

/// Profile for one source path.
pub fn select_profile<'a>(
    path: &str,
    overrides: &'a CompilerOverrideMap,
    default: &'a CompilerProfile,
    mode: CompilerMode,
) -> &'a CompilerProfile {
    match mode {
        CompilerMode::Coverage => default,
        CompilerMode::Standard => overrides.get(path).unwrap_or(default),
    }
}

/// The compiler section of the assembled configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolidityConfig {
    /// Default compiler plus per-path overrides
    Multi {
        default: CompilerProfile,
        overrides: CompilerOverrideMap,
    },
    /// Flat single profile (coverage mode)
    Single(CompilerProfile),
}

/// Build-tool shape: `{ compilers: [default], overrides }` or a bare profile.
#[derive(Serialize)]
#[serde(untagged)]
enum SolidityDocument<'a> {
    Multi {
        compilers: [&'a CompilerProfile; 1],
        overrides: &'a CompilerOverrideMap,
    },
    Single(&'a CompilerProfile),
}

impl Serialize for SolidityConfig {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = match self {
            SolidityConfig::Multi { default, overrides } => SolidityDocument::Multi {
                compilers: [default],
                overrides,
            },
            SolidityConfig::Single(profile) => SolidityDocument::Single(profile),
        };
        document.serialize(serializer)
    }
}

impl SolidityConfig {
    /// Build the section for `mode`. Coverage drops the overrides entirely.
    pub fn for_mode(
        default: CompilerProfile,
        overrides: CompilerOverrideMap,
        mode: CompilerMode,
    ) -> Self {
        match mode {
            CompilerMode::Standard => SolidityConfig::Multi { default, overrides },
            CompilerMode::Coverage => SolidityConfig::Single(default),
        }
    }

    /// The project section for `mode`.
    pub fn project(mode: CompilerMode) -> Self {
        Self::for_mode(CompilerProfile::project_default(), project_overrides(), mode)
    }

    /// The default compiler entry.
    pub fn default_profile(&self) -> &CompilerProfile {
        match self {
            SolidityConfig::Multi { default, .. } => default,
            SolidityConfig::Single(profile) => profile,
        }
    }

    /// Profile that compiles `path`.
    pub fn select(&self, path: &str) -> &CompilerProfile {
        match self {
            SolidityConfig::Multi { default, overrides } => {
                select_profile(path, overrides, default, CompilerMode::Standard)
            }
            SolidityConfig::Single(profile) => profile,
        }
    }

    pub fn mode(&self) -> CompilerMode {
        match self {
            SolidityConfig::Multi { .. } => CompilerMode::Standard,
            SolidityConfig::Single(_) => CompilerMode::Coverage,
        }
    }
}
