//! k6-style threshold expressions

use crate::error::{RunnerError, RunnerResult};
use crate::summary::{DurationStats, ThresholdOutcome};
use gqload_config::{ThresholdConfig, CHECK_FAILURE_RATE, HTTP_REQ_DURATION};
use gqload_http::RateSnapshot;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    Rate,
    Avg,
    Min,
    Max,
    Med,
    Percentile(f64),
}

impl Aggregation {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "rate" => Some(Aggregation::Rate),
            "avg" => Some(Aggregation::Avg),
            "min" => Some(Aggregation::Min),
            "max" => Some(Aggregation::Max),
            "med" => Some(Aggregation::Med),
            _ => {
                let inner = token.strip_prefix("p(")?.strip_suffix(')')?;
                let p: f64 = inner.trim().parse().ok()?;
                (0.0..=100.0).contains(&p).then_some(Aggregation::Percentile(p))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparison {
    fn holds(self, observed: f64, limit: f64) -> bool {
        match self {
            Comparison::Lt => observed < limit,
            Comparison::Le => observed <= limit,
            Comparison::Gt => observed > limit,
            Comparison::Ge => observed >= limit,
            Comparison::Eq => observed == limit,
        }
    }
}

/// A single parsed expression such as `p(95)<500` or `rate<=0.05`
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub expression: String,
    pub aggregation: Aggregation,
    pub comparison: Comparison,
    pub limit: f64,
    pub abort_on_fail: bool,
}

impl Threshold {
    pub fn with_abort(mut self, abort_on_fail: bool) -> Self {
        self.abort_on_fail = abort_on_fail;
        self
    }

    /// Whether `observed` satisfies the expression; no data never fails
    pub fn check(&self, observed: Option<f64>) -> bool {
        observed.map_or(true, |value| self.comparison.holds(value, self.limit))
    }
}

impl FromStr for Threshold {
    type Err = RunnerError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RunnerError::InvalidThreshold {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        let op_start = expression
            .find(['<', '>', '='])
            .ok_or_else(|| invalid("missing comparison operator"))?;
        let (lhs, rest) = expression.split_at(op_start);

        let (comparison, rhs) = if let Some(rhs) = rest.strip_prefix("<=") {
            (Comparison::Le, rhs)
        } else if let Some(rhs) = rest.strip_prefix(">=") {
            (Comparison::Ge, rhs)
        } else if let Some(rhs) = rest.strip_prefix("==") {
            (Comparison::Eq, rhs)
        } else if let Some(rhs) = rest.strip_prefix('<') {
            (Comparison::Lt, rhs)
        } else if let Some(rhs) = rest.strip_prefix('>') {
            (Comparison::Gt, rhs)
        } else {
            return Err(invalid("unsupported comparison operator"));
        };

        let aggregation = Aggregation::parse(lhs.trim()).ok_or_else(|| invalid("unknown aggregation"))?;
        let limit: f64 = rhs.trim().parse().map_err(|_| invalid("limit is not a number"))?;

        Ok(Threshold {
            expression: expression.trim().to_string(),
            aggregation,
            comparison,
            limit,
            abort_on_fail: false,
        })
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    CheckFailureRate,
    HttpReqDuration,
}

impl Metric {
    fn name(self) -> &'static str {
        match self {
            Metric::CheckFailureRate => CHECK_FAILURE_RATE,
            Metric::HttpReqDuration => HTTP_REQ_DURATION,
        }
    }

    fn accepts(self, aggregation: Aggregation) -> bool {
        match self {
            Metric::CheckFailureRate => aggregation == Aggregation::Rate,
            Metric::HttpReqDuration => aggregation != Aggregation::Rate,
        }
    }
}

/// Thresholds grouped by the metric they constrain
#[derive(Debug, Clone, Default)]
pub struct ThresholdSet {
    entries: Vec<(Metric, Threshold)>,
}

impl ThresholdSet {
    pub fn from_config(config: &BTreeMap<String, Vec<ThresholdConfig>>) -> RunnerResult<Self> {
        let mut entries = Vec::new();

        for (name, thresholds) in config {
            let metric = match name.as_str() {
                CHECK_FAILURE_RATE => Metric::CheckFailureRate,
                HTTP_REQ_DURATION => Metric::HttpReqDuration,
                other => return Err(RunnerError::UnknownMetric(other.to_string())),
            };

            for threshold in thresholds {
                let parsed = threshold
                    .expression()
                    .parse::<Threshold>()?
                    .with_abort(threshold.abort_on_fail());

                if !metric.accepts(parsed.aggregation) {
                    return Err(RunnerError::InvalidThreshold {
                        expression: parsed.expression,
                        reason: format!("aggregation not supported by {}", metric.name()),
                    });
                }
                entries.push((metric, parsed));
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First abort-on-fail rate threshold breached by `checks`.
    ///
    /// Only rate thresholds are evaluated while the run is in progress.
    pub fn abort_breach(&self, checks: RateSnapshot) -> Option<ThresholdOutcome> {
        if checks.total == 0 {
            return None;
        }
        self.entries
            .iter()
            .filter(|(metric, t)| *metric == Metric::CheckFailureRate && t.abort_on_fail)
            .map(|(metric, t)| outcome(*metric, t, Some(checks.rate())))
            .find(|outcome| !outcome.passed)
    }

    /// Evaluate every threshold against final results
    pub fn evaluate(&self, checks: RateSnapshot, durations: &DurationStats) -> Vec<ThresholdOutcome> {
        self.entries
            .iter()
            .map(|(metric, threshold)| {
                let observed = match (metric, threshold.aggregation) {
                    (Metric::CheckFailureRate, _) => Some(checks.rate()),
                    (Metric::HttpReqDuration, Aggregation::Avg) => durations.avg(),
                    (Metric::HttpReqDuration, Aggregation::Min) => durations.min(),
                    (Metric::HttpReqDuration, Aggregation::Max) => durations.max(),
                    (Metric::HttpReqDuration, Aggregation::Med) => durations.percentile(50.0),
                    (Metric::HttpReqDuration, Aggregation::Percentile(p)) => durations.percentile(p),
                    (Metric::HttpReqDuration, Aggregation::Rate) => None,
                };
                outcome(*metric, threshold, observed)
            })
            .collect()
    }
}

fn outcome(metric: Metric, threshold: &Threshold, observed: Option<f64>) -> ThresholdOutcome {
    ThresholdOutcome {
        metric: metric.name().to_string(),
        expression: threshold.expression.clone(),
        observed,
        passed: threshold.check(observed),
        abort_on_fail: threshold.abort_on_fail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqload_config::LoadConfig;
    use gqload_scenarios::Sample;
    use std::time::Duration;

    #[test]
    fn test_parse_expressions() {
        let t: Threshold = "p(95)<500".parse().unwrap();
        assert_eq!(t.aggregation, Aggregation::Percentile(95.0));
        assert_eq!(t.comparison, Comparison::Lt);
        assert_eq!(t.limit, 500.0);

        let t: Threshold = "rate <= 0.05".parse().unwrap();
        assert_eq!(t.aggregation, Aggregation::Rate);
        assert_eq!(t.comparison, Comparison::Le);
        assert_eq!(t.expression, "rate <= 0.05");

        assert_eq!("min>0".parse::<Threshold>().unwrap().comparison, Comparison::Gt);
        assert_eq!("avg>=1".parse::<Threshold>().unwrap().comparison, Comparison::Ge);
        assert_eq!("max==2".parse::<Threshold>().unwrap().comparison, Comparison::Eq);
        assert_eq!("p(99.9)<1000".parse::<Threshold>().unwrap().aggregation, Aggregation::Percentile(99.9));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["rate", "rate<", "p95<1", "p(101)<1", "count<3", "rate<abc", "rate!0.1", "rate=0.1"] {
            assert!(
                matches!(bad.parse::<Threshold>(), Err(RunnerError::InvalidThreshold { .. })),
                "{} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_check() {
        let t: Threshold = "rate<0.01".parse().unwrap();
        assert!(t.check(Some(0.0)));
        assert!(!t.check(Some(0.01)));
        assert!(t.check(None));
    }

    #[test]
    fn test_default_thresholds() {
        let set = ThresholdSet::from_config(&LoadConfig::default().thresholds).unwrap();
        assert_eq!(set.len(), 3);

        let healthy = RateSnapshot { failures: 0, total: 100 };
        assert!(set.abort_breach(healthy).is_none());

        let degraded = RateSnapshot { failures: 3, total: 100 };
        assert!(set.abort_breach(degraded).is_none());

        let broken = RateSnapshot { failures: 6, total: 100 };
        let breach = set.abort_breach(broken).unwrap();
        assert_eq!(breach.expression, "rate<=0.05");
        assert!(breach.abort_on_fail);

        assert!(set.abort_breach(RateSnapshot::default()).is_none());
    }

    #[test]
    fn test_evaluate() {
        let set = ThresholdSet::from_config(&LoadConfig::default().thresholds).unwrap();
        let samples: Vec<_> = (1..=100)
            .map(|ms| Sample {
                elapsed: Duration::from_millis(ms * 10),
                passed: true,
            })
            .collect();
        let durations = DurationStats::from_samples(&samples);

        let outcomes = set.evaluate(RateSnapshot { failures: 2, total: 100 }, &durations);
        let latency = outcomes.iter().find(|o| o.metric == HTTP_REQ_DURATION).unwrap();
        assert_eq!(latency.observed, Some(950.0));
        assert!(!latency.passed);

        let rates: Vec<_> = outcomes.iter().filter(|o| o.metric == CHECK_FAILURE_RATE).collect();
        assert!(!rates[0].passed);
        assert!(rates[1].passed);
    }

    #[test]
    fn test_metric_validation() {
        let mut config = BTreeMap::new();
        config.insert("http_reqs".to_string(), vec![ThresholdConfig::Expression("count>0".into())]);
        assert!(matches!(
            ThresholdSet::from_config(&config),
            Err(RunnerError::UnknownMetric(_))
        ));

        let mut config = BTreeMap::new();
        config.insert(
            CHECK_FAILURE_RATE.to_string(),
            vec![ThresholdConfig::Expression("p(95)<1".into())],
        );
        assert!(matches!(
            ThresholdSet::from_config(&config),
            Err(RunnerError::InvalidThreshold { .. })
        ));
    }
}
