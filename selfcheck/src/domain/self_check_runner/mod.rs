//! Batch driver: one full self-check per roster record, strictly in sequence.
//!
//! For every student the runner resolves the school, negotiates a session and
//! submits the survey, then writes exactly one success or failure line to the
//! submission log. Records rejected while loading the roster get their
//! failure line in the same position. A failing student never stops the
//! batch; only a configuration error does.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityEncoder, SchoolDirectory, SessionGateway, SubmissionLog, SurveyGateway,
};
use crate::domain::{
    BatchRecord, EducationLevel, Region, SchoolResolver, SelfCheckError, SessionNegotiator,
    StudentIdentity, SurveySubmitter,
};

mod runtime;

pub use runtime::{SelfCheckPorts, SelfCheckRuntime, TokioSleeper, UniformDelayJitter};

/// Banner line written when a run starts.
pub const RUN_SEPARATOR: &str = "-----------------------";

/// Runner configuration shared by every record of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfCheckConfig {
    /// Region whose hosts serve every student in the roster.
    pub region: Region,
    /// Course level of every school in the roster.
    pub level: EducationLevel,
    /// Upper bound of the random pause before each record; zero disables it.
    pub max_delay: Duration,
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Students whose survey was accepted.
    pub succeeded: usize,
    /// Students whose self-check failed at any stage.
    pub failed: usize,
}

impl BatchSummary {
    /// Total number of records processed.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Async sleeping abstraction used for pacing between records.
#[async_trait]
pub trait PacingSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Chooses the pause before the next record.
pub trait DelayJitter: Send + Sync {
    /// Return a delay in `[0, max)`.
    fn pick_delay(&self, max: Duration) -> Duration;
}

/// Sequential batch driver over the self-check domain services.
pub struct SelfCheckRunner {
    resolver: SchoolResolver<dyn SchoolDirectory>,
    negotiator: SessionNegotiator<dyn IdentityEncoder, dyn SessionGateway>,
    submitter: SurveySubmitter<dyn SurveyGateway>,
    log: Arc<dyn SubmissionLog>,
    sleeper: Arc<dyn PacingSleeper>,
    jitter: Arc<dyn DelayJitter>,
    clock: Arc<dyn Clock>,
    config: SelfCheckConfig,
}

impl SelfCheckRunner {
    /// Build a runner using the default sleeper, jitter and clock.
    pub fn new(ports: SelfCheckPorts, config: SelfCheckConfig) -> Self {
        Self::with_runtime(ports, SelfCheckRuntime::default(), config)
    }

    /// Build a runner with injected runtime abstractions.
    pub fn with_runtime(
        ports: SelfCheckPorts,
        runtime: SelfCheckRuntime,
        config: SelfCheckConfig,
    ) -> Self {
        Self {
            resolver: SchoolResolver::new(ports.directory),
            negotiator: SessionNegotiator::new(ports.encoder, ports.sessions),
            submitter: SurveySubmitter::new(ports.surveys),
            log: ports.log,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            clock: runtime.clock,
            config,
        }
    }

    /// Process every record in order and report the outcome counts.
    pub async fn run(&self, records: &[BatchRecord]) -> BatchSummary {
        self.write_banner();
        self.log.info("self-check run started");

        let mut summary = BatchSummary::default();
        for record in records {
            let (label, outcome) = match record {
                BatchRecord::Student(student) => {
                    self.pause_before_next().await;
                    (student.name.as_str(), self.check_one(student).await)
                }
                BatchRecord::Invalid(invalid) => (
                    invalid.label.as_str(),
                    Err(SelfCheckError::InvalidRecord(invalid.clone())),
                ),
            };
            match outcome {
                Ok(()) => {
                    summary.succeeded += 1;
                    info!(region = %self.config.region, "self-check submitted");
                    self.log
                        .info(&format!("{label}: self-check submission [success]"));
                }
                Err(error) => {
                    summary.failed += 1;
                    warn!(
                        region = %self.config.region,
                        kind = %error.kind(),
                        error = %error,
                        "self-check failed"
                    );
                    self.log.error(&failure_line(label, &error));
                    if error.kind().is_fatal() {
                        self.log.error("self-check run aborted: configuration error");
                        break;
                    }
                }
            }
        }

        self.log.info(&format!(
            "self-check run finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
        summary
    }

    /// Record a roster that could not be read at all.
    ///
    /// Writes the run banner followed by the error, so the submission log
    /// shows why no student was processed.
    pub fn report_roster_failure(&self, error: &dyn std::error::Error) {
        warn!(error = %error, "roster could not be loaded");
        self.write_banner();
        self.log.error(&format!("roster could not be loaded: {error}"));
    }

    /// Resolve, negotiate and submit for one student.
    ///
    /// Performs exactly one school search, three session calls and one survey
    /// post when every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SelfCheckError`] tagged with the failed stage; nothing is
    /// retried.
    pub async fn check_one(&self, student: &StudentIdentity) -> Result<(), SelfCheckError> {
        let SelfCheckConfig { region, level, .. } = self.config;
        let org_code = self
            .resolver
            .resolve(&student.school, region, level)
            .await
            .map_err(SelfCheckError::SchoolLookup)?;
        let session = self
            .negotiator
            .negotiate(region, &org_code, &student.name, &student.birth)
            .await?;
        self.submitter
            .submit_all_healthy(&session)
            .await
            .map_err(SelfCheckError::Submission)
    }

    fn write_banner(&self) {
        self.log.info(RUN_SEPARATOR);
        self.log
            .info(&self.clock.local().format("%Y-%m-%d %H:%M:%S").to_string());
    }

    async fn pause_before_next(&self) {
        if self.config.max_delay.is_zero() {
            return;
        }
        let delay = self.jitter.pick_delay(self.config.max_delay);
        self.sleeper.sleep(delay).await;
    }
}

fn failure_line(name: &str, error: &SelfCheckError) -> String {
    let stage = match error {
        SelfCheckError::SchoolLookup(_) | SelfCheckError::Negotiation(_) => "student lookup",
        SelfCheckError::Submission(_) => "self-check submission",
        SelfCheckError::InvalidRecord(_) => "roster entry",
    };
    format!("{name}: {stage} [failure] ({}): {error}", error.kind())
}
