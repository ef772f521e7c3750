//! Port and runtime dependency bundles for the self-check runner.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rand::Rng;

use crate::domain::ports::{
    IdentityEncoder, SchoolDirectory, SessionGateway, SubmissionLog, SurveyGateway,
};

use super::{DelayJitter, PacingSleeper};

/// Port bundle required by the runner.
pub struct SelfCheckPorts {
    /// Identity field encryption.
    pub encoder: Arc<dyn IdentityEncoder>,
    /// School search.
    pub directory: Arc<dyn SchoolDirectory>,
    /// Session exchange endpoints.
    pub sessions: Arc<dyn SessionGateway>,
    /// Survey registration endpoint.
    pub surveys: Arc<dyn SurveyGateway>,
    /// Outcome log.
    pub log: Arc<dyn SubmissionLog>,
}

impl SelfCheckPorts {
    /// Build a strongly-typed runner port bundle.
    pub fn new(
        encoder: Arc<dyn IdentityEncoder>,
        directory: Arc<dyn SchoolDirectory>,
        sessions: Arc<dyn SessionGateway>,
        surveys: Arc<dyn SurveyGateway>,
        log: Arc<dyn SubmissionLog>,
    ) -> Self {
        Self {
            encoder,
            directory,
            sessions,
            surveys,
            log,
        }
    }
}

/// Runtime helpers used for pacing and the run banner.
pub struct SelfCheckRuntime {
    /// Async sleep implementation.
    pub sleeper: Arc<dyn PacingSleeper>,
    /// Delay picker between records.
    pub jitter: Arc<dyn DelayJitter>,
    /// Clock used for the run banner.
    pub clock: Arc<dyn Clock>,
}

impl Default for SelfCheckRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(UniformDelayJitter),
            clock: Arc::new(DefaultClock),
        }
    }
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl PacingSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Picks a uniformly random whole number of seconds below the maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDelayJitter;

impl DelayJitter for UniformDelayJitter {
    fn pick_delay(&self, max: Duration) -> Duration {
        let max_secs = max.as_secs();
        if max_secs == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs(rand::thread_rng().gen_range(0..max_secs))
    }
}
