//! Virtual-user ramp

use gqload_config::{LoadConfig, StageConfig};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub target: u32,
    pub duration: Duration,
}

impl From<&StageConfig> for Stage {
    fn from(stage: &StageConfig) -> Self {
        Self {
            target: stage.target,
            duration: stage.duration,
        }
    }
}

/// Ordered stages; each moves the VU count linearly from the previous
/// stage's target (0 for the first) to its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProfile {
    stages: Vec<Stage>,
}

impl LoadProfile {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn from_config(config: &LoadConfig) -> Self {
        Self::new(config.stages.iter().map(Stage::from).collect())
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn max_target(&self) -> u32 {
        self.stages.iter().map(|s| s.target).max().unwrap_or(0)
    }

    /// Index of the stage running at `elapsed`, `None` once the profile is over
    pub fn stage_at(&self, elapsed: Duration) -> Option<usize> {
        let mut stage_start = Duration::ZERO;
        for (index, stage) in self.stages.iter().enumerate() {
            let stage_end = stage_start + stage.duration;
            if elapsed < stage_end {
                return Some(index);
            }
            stage_start = stage_end;
        }
        None
    }

    /// VU target at `elapsed`. Zero once the profile is over.
    pub fn target_at(&self, elapsed: Duration) -> u32 {
        let mut from = 0u32;
        let mut remaining = elapsed;

        for stage in &self.stages {
            if remaining < stage.duration {
                let progress = remaining.as_secs_f64() / stage.duration.as_secs_f64();
                let delta = f64::from(stage.target) - f64::from(from);
                return (f64::from(from) + delta * progress).round() as u32;
            }
            remaining -= stage.duration;
            from = stage.target;
        }

        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn profile(stages: &[(u32, u64)]) -> LoadProfile {
        LoadProfile::new(
            stages
                .iter()
                .map(|&(target, duration)| Stage {
                    target,
                    duration: secs(duration),
                })
                .collect(),
        )
    }

    #[test]
    fn test_ramp_then_hold() {
        let profile = profile(&[(100, 5), (100, 10)]);
        assert_eq!(profile.total_duration(), secs(15));
        assert_eq!(profile.target_at(Duration::ZERO), 0);
        assert_eq!(profile.target_at(Duration::from_millis(2500)), 50);
        assert_eq!(profile.target_at(secs(5)), 100);
        assert_eq!(profile.target_at(secs(14)), 100);
        assert_eq!(profile.target_at(secs(15)), 0);
    }

    #[test]
    fn test_ramp_down() {
        let profile = profile(&[(10, 1), (0, 10)]);
        assert_eq!(profile.target_at(secs(1)), 10);
        assert_eq!(profile.target_at(secs(6)), 5);
        assert_eq!(profile.max_target(), 10);
    }

    #[test]
    fn test_zero_length_stage_jumps() {
        let profile = profile(&[(8, 0), (8, 3)]);
        assert_eq!(profile.target_at(Duration::ZERO), 8);
        assert_eq!(profile.stage_at(Duration::ZERO), Some(1));
    }

    #[test]
    fn test_stage_at() {
        let profile = profile(&[(1, 2), (2, 2)]);
        assert_eq!(profile.stage_at(secs(1)), Some(0));
        assert_eq!(profile.stage_at(secs(2)), Some(1));
        assert_eq!(profile.stage_at(secs(4)), None);
    }

    #[test]
    fn test_from_config_constant() {
        let mut config = LoadConfig::default();
        config.set_constant(3, secs(7));
        let profile = LoadProfile::from_config(&config);
        assert_eq!(profile.total_duration(), secs(7));
        assert_eq!(profile.target_at(Duration::from_millis(1)), 3);
    }
}
