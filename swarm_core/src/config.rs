//! Tunable thresholds for the scheduler.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Configuration for one colony's overseer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Spawn energy below which a crashed colony enters bootstrap mode.
    pub emergency_energy_threshold: u32,

    /// Effective hostile count (boosted hostiles count double) that triggers invasion defense.
    pub invasion_threshold: u32,

    /// Body length at which a hostile counts as big.
    pub big_hostile_body_size: usize,

    /// Ticks a defense directive stays alive before it may remove itself.
    pub defense_grace_ticks: u32,

    pub siege: SiegeConfig,
    pub priorities: PriorityConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            emergency_energy_threshold: 1300,
            invasion_threshold: 3,
            big_hostile_body_size: 10,
            defense_grace_ticks: 100,
            siege: SiegeConfig::default(),
            priorities: PriorityConfig::default(),
        }
    }
}

/// Siege behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    /// Fraction of max hits below which a sieger leaves the target room.
    pub retreat_hits_ratio: f32,

    /// Siegers requested per siege directive.
    pub sieger_amount: usize,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            retreat_hits_ratio: 0.75,
            sieger_amount: 3,
        }
    }
}

/// Overlord priorities; lower numbers are serviced first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub bootstrap: u32,
    pub invasion_defense: u32,
    pub guard: u32,
    pub fortify: u32,
    pub siege: u32,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            bootstrap: 0,
            invasion_defense: 100,
            guard: 200,
            fortify: 250,
            siege: 300,
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate a TOML document. Missing keys fall back to defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let ratio = self.siege.retreat_hits_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(SchedulerError::Config(format!(
                "siege.retreat_hits_ratio must be in (0, 1], got {ratio}"
            )));
        }
        if self.invasion_threshold == 0 {
            return Err(SchedulerError::Config(
                "invasion_threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SchedulerConfig::from_toml_str(
            r#"
            invasion_threshold = 5

            [siege]
            retreat_hits_ratio = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.invasion_threshold, 5);
        assert_eq!(config.emergency_energy_threshold, 1300);
        assert!((config.siege.retreat_hits_ratio - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.siege.sieger_amount, 3);
        assert_eq!(config.priorities.guard, 200);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let err = SchedulerConfig::from_toml_str("[siege]\nretreat_hits_ratio = 1.5\n").unwrap_err();
        assert!(matches!(err, SchedulerError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = SchedulerConfig::from_toml_str("invasion_threshold = \"many\"").unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigParse(_)));
    }
}
