//! Engine configuration.
//!
//! Loaded from `recon_config.json` with support for an environment variable
//! override. The divisor that buckets ticks into turns is a policy value,
//! never a hidden constant.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_RECON_CONFIG: &str = include_str!("data/recon_config.json");

/// Policy values for the reconstruction engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Snapshot ticks per discrete turn; `turn = tick / ticks_per_turn`.
    pub ticks_per_turn: u32,
    /// Absolute per-axis tolerance when comparing star positions across
    /// reports, absorbing floating-point snapshot noise.
    pub star_position_tolerance: f64,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            ticks_per_turn: 6,
            star_position_tolerance: 1e-4,
        }
    }
}

impl ReconConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_RECON_CONFIG).expect("builtin recon config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ReconConfig = serde_json::from_str(json)?;
        if config.ticks_per_turn == 0 {
            return Err(ConfigError::ZeroTicksPerTurn);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse recon config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read recon config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ticks_per_turn must be at least 1")]
    ZeroTicksPerTurn,
}

/// Load configuration from the `STARVEIL_RECON_CONFIG` override path, falling
/// back to the builtin values when the variable is unset or the file is bad.
pub fn load_recon_config() -> ReconConfig {
    if let Some(path) = env::var("STARVEIL_RECON_CONFIG").ok().map(PathBuf::from) {
        match ReconConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "starveil::config",
                    path = %path.display(),
                    "recon_config.loaded=file"
                );
                return config;
            }
            Err(err) => {
                tracing::warn!(
                    target: "starveil::config",
                    path = %path.display(),
                    error = %err,
                    "recon_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "starveil::config", "recon_config.loaded=builtin");
    ReconConfig::builtin()
}
