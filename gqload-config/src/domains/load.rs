//! Load shape and pass/fail threshold configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Name of the aggregated check failure rate metric
pub const CHECK_FAILURE_RATE: &str = "check_failure_rate";

/// Name of the request latency metric, in milliseconds
pub const HTTP_REQ_DURATION: &str = "http_req_duration";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Scenario to run when none is given on the command line
    #[serde(default = "default_scenario")]
    pub scenario: String,

    /// Virtual-user ramp, executed in order
    #[serde(default = "default_stages")]
    pub stages: Vec<StageConfig>,

    /// Threshold expressions keyed by metric name
    #[serde(default = "default_thresholds")]
    pub thresholds: BTreeMap<String, Vec<ThresholdConfig>>,

    /// Seed for every virtual user's RNG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Stop each virtual user after this many iterations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
}

/// One ramp segment: move linearly to `target` VUs over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub target: u32,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub duration: Duration,
}

/// A threshold is either a bare expression or an expression with options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThresholdConfig {
    Expression(String),
    Detailed {
        threshold: String,
        #[serde(default, alias = "abortOnFail")]
        abort_on_fail: bool,
    },
}

impl ThresholdConfig {
    pub fn expression(&self) -> &str {
        match self {
            ThresholdConfig::Expression(expr) => expr,
            ThresholdConfig::Detailed { threshold, .. } => threshold,
        }
    }

    pub fn abort_on_fail(&self) -> bool {
        match self {
            ThresholdConfig::Expression(_) => false,
            ThresholdConfig::Detailed { abort_on_fail, .. } => *abort_on_fail,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            scenario: default_scenario(),
            stages: default_stages(),
            thresholds: default_thresholds(),
            seed: None,
            iterations: None,
        }
    }
}

impl LoadConfig {
    /// Replace the ramp with `vus` users held for `duration`.
    ///
    /// A zero-length first stage jumps straight to `vus` instead of ramping
    /// up from zero.
    pub fn set_constant(&mut self, vus: u32, duration: Duration) {
        self.stages = vec![
            StageConfig {
                target: vus,
                duration: Duration::ZERO,
            },
            StageConfig {
                target: vus,
                duration,
            },
        ];
    }

    /// Sum of all stage durations
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.scenario, "scenario", self.domain_name())?;

        if self.stages.is_empty() {
            return Err(self.validation_error("at least one stage must be configured"));
        }

        if self.total_duration().is_zero() {
            return Err(self.validation_error("stages must last longer than 0 seconds"));
        }

        if self.stages.iter().all(|s| s.target == 0) {
            return Err(self.validation_error("at least one stage must target more than 0 VUs"));
        }

        if self.iterations == Some(0) {
            return Err(self.validation_error("iterations must be greater than 0 when set"));
        }

        for (metric, thresholds) in &self.thresholds {
            for threshold in thresholds {
                if threshold.expression().trim().is_empty() {
                    return Err(self.validation_error(format!(
                        "empty threshold expression for metric '{}'",
                        metric
                    )));
                }
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

fn default_scenario() -> String {
    "home".to_string()
}

fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig {
            target: 100,
            duration: Duration::from_secs(5),
        },
        StageConfig {
            target: 100,
            duration: Duration::from_secs(10),
        },
    ]
}

fn default_thresholds() -> BTreeMap<String, Vec<ThresholdConfig>> {
    let mut thresholds = BTreeMap::new();
    thresholds.insert(
        HTTP_REQ_DURATION.to_string(),
        vec![ThresholdConfig::Expression("p(95)<500".to_string())],
    );
    thresholds.insert(
        CHECK_FAILURE_RATE.to_string(),
        vec![
            ThresholdConfig::Expression("rate<0.01".to_string()),
            ThresholdConfig::Detailed {
                threshold: "rate<=0.05".to_string(),
                abort_on_fail: true,
            },
        ],
    );
    thresholds
}
