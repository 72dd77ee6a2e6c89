use crate::error::{Result, StrideError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScoreWeights
// ---------------------------------------------------------------------------

/// Fixed factor weights for the overall monthly score. Stable across calls;
/// `Config::validate` flags a set that does not sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    #[serde(default = "default_completion_weight")]
    pub completion: f64,
    #[serde(default = "default_on_time_weight")]
    pub on_time: f64,
    #[serde(default = "default_consistency_weight")]
    pub consistency: f64,
    #[serde(default = "default_adherence_weight")]
    pub adherence: f64,
    #[serde(default = "default_production_weight")]
    pub production: f64,
}

fn default_completion_weight() -> f64 {
    0.30
}

fn default_on_time_weight() -> f64 {
    0.20
}

fn default_consistency_weight() -> f64 {
    0.20
}

fn default_adherence_weight() -> f64 {
    0.15
}

fn default_production_weight() -> f64 {
    0.15
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completion: default_completion_weight(),
            on_time: default_on_time_weight(),
            consistency: default_consistency_weight(),
            adherence: default_adherence_weight(),
            production: default_production_weight(),
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.completion + self.on_time + self.consistency + self.adherence + self.production
    }
}

// ---------------------------------------------------------------------------
// ConsistencyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Gaps up to this many consecutive inactive days carry no penalty.
    #[serde(default = "default_max_gap_days")]
    pub max_gap_days: u32,
    /// Points subtracted per gap day beyond the threshold.
    #[serde(default = "default_gap_penalty_per_day")]
    pub gap_penalty_per_day: u32,
}

fn default_max_gap_days() -> u32 {
    7
}

fn default_gap_penalty_per_day() -> u32 {
    5
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            max_gap_days: default_max_gap_days(),
            gap_penalty_per_day: default_gap_penalty_per_day(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub consistency: ConsistencyConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            weights: ScoreWeights::default(),
            consistency: ConsistencyConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(StrideError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-9 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("score weights sum to {sum}, expected 1.0"),
            });
        }

        for (name, w) in [
            ("completion", self.weights.completion),
            ("on_time", self.weights.on_time),
            ("consistency", self.weights.consistency),
            ("adherence", self.weights.adherence),
            ("production", self.weights.production),
        ] {
            if !(0.0..=1.0).contains(&w) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("weight '{name}' is {w}, expected 0.0-1.0"),
                });
            }
        }

        if self.consistency.gap_penalty_per_day > 100 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "gap_penalty_per_day={} zeroes the consistency factor after one excess day",
                    self.consistency.gap_penalty_per_day
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::new("acme-marketing");
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, "acme-marketing");
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.consistency.max_gap_days, 7);
    }

    #[test]
    fn load_without_init_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(StrideError::NotInitialized)
        ));
    }

    #[test]
    fn default_weights_sum_to_one() {
        let cfg = Config::new("p");
        assert!(cfg.validate().is_empty());
        assert!((cfg.weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn skewed_weights_flagged() {
        let mut cfg = Config::new("p");
        cfg.weights.completion = 0.9;
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
    }

    #[test]
    fn negative_weight_flagged() {
        let mut cfg = Config::new("p");
        cfg.weights.production = -0.15;
        cfg.weights.completion = 0.60;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("'production'")));
    }
}
