//! Run configuration loaded via OrthoConfig.
//!
//! Every value can come from a `--kebab-case` flag, a `SELFCHECK_*`
//! environment variable or a configuration file. Raw values are kept as
//! loaded; the accessors apply defaults and parse them into domain types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    EducationLevel, EducationLevelParseError, Region, RegionParseError, SelfCheckConfig,
};
use crate::outbound::hcs::{
    DEFAULT_REGION_BASE_TEMPLATE, DEFAULT_SEARCH_BASE_URL, HcsEndpoints, HcsEndpointsError,
};

const DEFAULT_LIST_PATH: &str = "./list.json";
const DEFAULT_DELAY_SECONDS: u64 = 300;
const DEFAULT_REGION: Region = Region::Gyeongbuk;
const DEFAULT_LEVEL: EducationLevel = EducationLevel::High;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `region` is not a known region.
    #[error(transparent)]
    Region(#[from] RegionParseError),
    /// `level` is not a known education level.
    #[error(transparent)]
    Level(#[from] EducationLevelParseError),
    /// `request_timeout_seconds` is zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// The endpoint overrides do not form valid URLs.
    #[error(transparent)]
    Endpoints(#[from] HcsEndpointsError),
}

/// Settings for one self-check run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SELFCHECK")]
pub struct SelfCheckSettings {
    /// Roster file (JSON array of `{school, name, birth}`).
    pub list_path: Option<PathBuf>,
    /// Submission log file; outcomes go to tracing when absent.
    pub log_path: Option<PathBuf>,
    /// Upper bound of the random pause before each student; 0 disables it.
    pub delay_seconds: Option<u64>,
    /// Region name, subdomain or index.
    pub region: Option<String>,
    /// Education level name or code.
    pub level: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout_seconds: Option<u64>,
    /// Keep the roster in file order instead of shuffling it.
    #[ortho_config(default = false)]
    pub no_shuffle: bool,
    /// Base URL of the shared school search host.
    pub search_base_url: Option<String>,
    /// Base URL of the region hosts; `{region}` becomes the subdomain.
    pub region_base_template: Option<String>,
}

impl SelfCheckSettings {
    /// Return the roster path, falling back to `./list.json`.
    pub fn list_path(&self) -> PathBuf {
        self.list_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LIST_PATH))
    }

    /// Return the submission log path, if one is configured.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Return the maximum pause before each student.
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.delay_seconds.unwrap_or(DEFAULT_DELAY_SECONDS))
    }

    /// Parse the configured region.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Region`] for an unknown region.
    pub fn region(&self) -> Result<Region, SettingsError> {
        self.region
            .as_deref()
            .map_or(Ok(DEFAULT_REGION), str::parse::<Region>)
            .map_err(SettingsError::from)
    }

    /// Parse the configured education level.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Level`] for an unknown level.
    pub fn level(&self) -> Result<EducationLevel, SettingsError> {
        self.level
            .as_deref()
            .map_or(Ok(DEFAULT_LEVEL), str::parse::<EducationLevel>)
            .map_err(SettingsError::from)
    }

    /// Return the HTTP request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when configured as zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS)
        {
            0 => Err(SettingsError::ZeroTimeout),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Whether to shuffle the roster; on unless `no_shuffle` is set.
    pub fn shuffle(&self) -> bool {
        !self.no_shuffle
    }

    /// Build the HCS endpoints from the host overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Endpoints`] when an override is not a valid
    /// URL.
    pub fn endpoints(&self) -> Result<HcsEndpoints, SettingsError> {
        Ok(HcsEndpoints::new(
            self.search_base_url
                .as_deref()
                .unwrap_or(DEFAULT_SEARCH_BASE_URL),
            self.region_base_template
                .as_deref()
                .unwrap_or(DEFAULT_REGION_BASE_TEMPLATE),
        )?)
    }

    /// Assemble the batch runner configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the region or level is invalid.
    pub fn runner_config(&self) -> Result<SelfCheckConfig, SettingsError> {
        Ok(SelfCheckConfig {
            region: self.region()?,
            level: self.level()?,
            max_delay: self.max_delay(),
        })
    }
}
