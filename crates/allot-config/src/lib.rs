//! # allot-config
//!
//! Layered configuration loading for Allot analytics runs using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ALLOT_*` prefix, `__` as separator)
//! 2. Project-level `.allot/config.toml`
//! 3. User-level `~/.config/allot/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ALLOT_RELIABILITY__MIN_SAMPLE_SCHOOL` -> `reliability.min_sample_school`,
//! `ALLOT_NUMERICS__CENTRALITY_MAX_ITER` -> `numerics.centrality_max_iter`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use allot_config::AnalysisConfig;
//!
//! let config = AnalysisConfig::load_with_dotenv().expect("config");
//! assert!(config.reliability.min_sample_school > 0);
//! ```

mod embedding;
mod error;
mod numerics;
mod partition;
mod reliability;

pub use embedding::EmbeddingConfig;
pub use error::ConfigError;
pub use numerics::NumericsConfig;
pub use partition::PartitionConfig;
pub use reliability::ReliabilityConfig;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every tunable of one analytics run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub reliability: ReliabilityConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub partition: PartitionConfig,
    #[serde(default)]
    pub numerics: NumericsConfig,
}

impl AnalysisConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] if the merged values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load defaults overlaid with one explicit TOML file and the environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed("ALLOT_").split("__")),
        )
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".allot/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ALLOT_").split("__"))
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.n_principal_components == 0 {
            return Err(ConfigError::invalid(
                "embedding.n_principal_components",
                "must be at least 1",
            ));
        }
        if self.embedding.n_mixture_components == 0 {
            return Err(ConfigError::invalid(
                "embedding.n_mixture_components",
                "must be at least 1",
            ));
        }
        if self.embedding.mixture_max_iter == 0 {
            return Err(ConfigError::invalid(
                "embedding.mixture_max_iter",
                "must be at least 1",
            ));
        }
        if self.partition.kmeans_n_init == 0 {
            return Err(ConfigError::invalid(
                "partition.kmeans_n_init",
                "must be at least 1",
            ));
        }
        if self.partition.kmeans_max_iter == 0 {
            return Err(ConfigError::invalid(
                "partition.kmeans_max_iter",
                "must be at least 1",
            ));
        }
        if self.numerics.centrality_max_iter == 0 {
            return Err(ConfigError::invalid(
                "numerics.centrality_max_iter",
                "must be at least 1",
            ));
        }
        for (field, value) in [
            ("numerics.entropy_epsilon", self.numerics.entropy_epsilon),
            ("numerics.interaction_epsilon", self.numerics.interaction_epsilon),
            ("numerics.centrality_tolerance", self.numerics.centrality_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a positive finite number, got {value}"),
                ));
            }
        }
        Ok(())
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("allot").join("config.toml"))
    }
}
