//! End-of-run report

use chrono::{DateTime, Utc};
use colored::Colorize;
use gqload_http::RateSnapshot;
use gqload_scenarios::{OperationSamples, Sample};
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

/// Sorted latencies in milliseconds
#[derive(Debug, Clone, Default)]
pub struct DurationStats {
    sorted_ms: Vec<f64>,
}

impl DurationStats {
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Self {
        let mut sorted_ms: Vec<f64> = samples
            .into_iter()
            .map(|s| s.elapsed.as_nanos() as f64 / 1_000_000.0)
            .collect();
        sorted_ms.sort_unstable_by(f64::total_cmp);
        Self { sorted_ms }
    }

    pub fn len(&self) -> usize {
        self.sorted_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_ms.is_empty()
    }

    pub fn min(&self) -> Option<f64> {
        self.sorted_ms.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.sorted_ms.last().copied()
    }

    pub fn avg(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sorted_ms.iter().sum::<f64>() / self.len() as f64)
        }
    }

    /// Nearest-rank percentile, `p` in 0..=100
    pub fn percentile(&self, p: f64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let rank = (p / 100.0 * self.len() as f64).ceil() as usize;
        let index = rank.clamp(1, self.len()) - 1;
        Some(self.sorted_ms[index])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationStats {
    pub operation: String,
    pub count: usize,
    pub failures: usize,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub max_ms: f64,
}

impl OperationStats {
    pub fn from_samples(operation: &str, samples: &[Sample]) -> Self {
        let stats = DurationStats::from_samples(samples);
        Self {
            operation: operation.to_string(),
            count: samples.len(),
            failures: samples.iter().filter(|s| !s.passed).count(),
            min_ms: stats.min().unwrap_or_default(),
            avg_ms: stats.avg().unwrap_or_default(),
            p50_ms: stats.percentile(50.0).unwrap_or_default(),
            p95_ms: stats.percentile(95.0).unwrap_or_default(),
            p99_ms: stats.percentile(99.0).unwrap_or_default(),
            max_ms: stats.max().unwrap_or_default(),
        }
    }

    pub fn collect(samples: &OperationSamples) -> Vec<Self> {
        samples
            .iter()
            .map(|(operation, samples)| Self::from_samples(operation, samples))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ThresholdOutcome {
    pub metric: String,
    pub expression: String,
    /// `None` when the metric had no samples
    pub observed: Option<f64>,
    pub passed: bool,
    pub abort_on_fail: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub max_vus: usize,
    pub iterations: u64,
    pub errored_iterations: u64,
    pub checks: RateSnapshot,
    pub check_failure_rate: f64,
    pub operations: Vec<OperationStats>,
    pub thresholds: Vec<ThresholdOutcome>,
    pub aborted: bool,
}

impl RunSummary {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }

    /// True when the run completed and every threshold held
    pub fn passed(&self) -> bool {
        !self.aborted && self.thresholds.iter().all(|t| t.passed)
    }

    pub fn failed_thresholds(&self) -> impl Iterator<Item = &ThresholdOutcome> {
        self.thresholds.iter().filter(|t| !t.passed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", format!("Scenario: {}", self.scenario).bold());
        let _ = writeln!(
            out,
            "  started {}  elapsed {:.1}s  max VUs {}",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.elapsed_secs,
            self.max_vus
        );
        let _ = writeln!(
            out,
            "  iterations {}  errored {}",
            self.iterations, self.errored_iterations
        );
        let _ = writeln!(
            out,
            "  checks {}/{} passed  check_failure_rate {:.2}%",
            self.checks.passes(),
            self.checks.total,
            self.check_failure_rate * 100.0
        );

        if !self.operations.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "  {:<32} {:>7} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9}",
                "operation", "count", "fail", "avg", "p50", "p95", "p99", "max"
            );
            for op in &self.operations {
                let failures = if op.failures > 0 {
                    op.failures.to_string().red().to_string()
                } else {
                    op.failures.to_string()
                };
                let _ = writeln!(
                    out,
                    "  {:<32} {:>7} {:>6} {:>7.1}ms {:>7.1}ms {:>7.1}ms {:>7.1}ms {:>7.1}ms",
                    op.operation, op.count, failures, op.avg_ms, op.p50_ms, op.p95_ms, op.p99_ms, op.max_ms
                );
            }
        }

        if !self.thresholds.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  thresholds:");
            for t in &self.thresholds {
                let mark = if t.passed { "✅" } else { "❌" };
                let observed = t
                    .observed
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_else(|| "no data".to_string());
                let _ = writeln!(out, "    {} {} {} (observed {})", mark, t.metric, t.expression, observed);
            }
        }

        let _ = writeln!(out);
        if self.aborted {
            let _ = writeln!(out, "{}", "❌ Run aborted by threshold".red().bold());
        } else if self.passed() {
            let _ = writeln!(out, "{}", "✅ All thresholds passed".green().bold());
        } else {
            let _ = writeln!(out, "{}", "❌ Some thresholds failed".red().bold());
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ms: u64, passed: bool) -> Sample {
        Sample {
            elapsed: Duration::from_millis(ms),
            passed,
        }
    }

    #[test]
    fn test_percentiles() {
        let samples: Vec<_> = (1..=100).map(|ms| sample(ms, true)).collect();
        let stats = DurationStats::from_samples(&samples);
        assert_eq!(stats.percentile(50.0), Some(50.0));
        assert_eq!(stats.percentile(95.0), Some(95.0));
        assert_eq!(stats.percentile(100.0), Some(100.0));
        assert_eq!(stats.percentile(0.0), Some(1.0));
        assert_eq!(stats.min(), Some(1.0));
        assert_eq!(stats.max(), Some(100.0));
        assert_eq!(stats.avg(), Some(50.5));
    }

    #[test]
    fn test_empty_stats() {
        let stats = DurationStats::default();
        assert!(stats.percentile(95.0).is_none());
        assert!(stats.avg().is_none());
    }

    #[test]
    fn test_operation_stats() {
        let mut samples = OperationSamples::default();
        samples.record("orders", sample(10, true));
        samples.record("orders", sample(30, false));
        samples.record("order", sample(5, true));

        let stats = OperationStats::collect(&samples);
        assert_eq!(stats.len(), 2);
        let orders = stats.iter().find(|s| s.operation == "orders").unwrap();
        assert_eq!(orders.count, 2);
        assert_eq!(orders.failures, 1);
        assert_eq!(orders.avg_ms, 20.0);
        assert_eq!(orders.max_ms, 30.0);
    }

    fn summary(aborted: bool, threshold_passed: bool) -> RunSummary {
        RunSummary {
            scenario: "home".to_string(),
            started_at: Utc::now(),
            elapsed_secs: 1.5,
            max_vus: 2,
            iterations: 4,
            errored_iterations: 0,
            checks: RateSnapshot { failures: 1, total: 44 },
            check_failure_rate: 1.0 / 44.0,
            operations: vec![OperationStats::from_samples("settings", &[sample(12, true)])],
            thresholds: vec![ThresholdOutcome {
                metric: "check_failure_rate".to_string(),
                expression: "rate<0.01".to_string(),
                observed: Some(1.0 / 44.0),
                passed: threshold_passed,
                abort_on_fail: false,
            }],
            aborted,
        }
    }

    #[test]
    fn test_passed() {
        assert!(summary(false, true).passed());
        assert!(!summary(false, false).passed());
        assert!(!summary(true, true).passed());
        assert_eq!(summary(false, false).failed_thresholds().count(), 1);
    }

    #[test]
    fn test_render_and_json() {
        colored::control::set_override(false);
        let summary = summary(false, false);

        let text = summary.render();
        assert!(text.contains("Scenario: home"));
        assert!(text.contains("settings"));
        assert!(text.contains("❌ check_failure_rate rate<0.01"));
        assert!(text.contains("Some thresholds failed"));

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["scenario"], "home");
        assert_eq!(json["checks"]["failures"], 1);
        assert_eq!(json["operations"][0]["operation"], "settings");
        assert_eq!(json["aborted"], false);
    }
}
