use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use lotobayes_data::parser::ParseMode;

/// Largest accepted escape-iteration cap.
pub const MAX_ITER_CAP: u32 = 10_000;

/// What happens to parsed numbers outside `1..=N` before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Counted in the smoothing denominator, never given a probability.
    #[default]
    IncludeInSmoothing,
    /// Removed before counting.
    Discard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub alpha: f64,
    pub max_iter: u32,
    pub top_k: usize,
    pub display_top: usize,
    pub out_of_range: OutOfRangePolicy,
    pub parse_mode: ParseMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iter: 20,
            top_k: 6,
            display_top: 10,
            out_of_range: OutOfRangePolicy::IncludeInSmoothing,
            parse_mode: ParseMode::Lenient,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            bail!("alpha doit être un réel strictement positif (reçu {})", self.alpha);
        }
        if self.top_k == 0 {
            bail!("top_k doit être ≥ 1");
        }
        if self.max_iter > MAX_ITER_CAP {
            bail!("max_iter doit être ≤ {} (reçu {})", MAX_ITER_CAP, self.max_iter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert!((config.alpha - 1.0).abs() < 1e-12);
        assert_eq!(config.max_iter, 20);
        assert_eq!(config.top_k, 6);
        assert_eq!(config.out_of_range, OutOfRangePolicy::IncludeInSmoothing);
        assert_eq!(config.parse_mode, ParseMode::Lenient);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"out_of_range":"discard","parse_mode":"strict"}"#).unwrap();
        assert_eq!(config.out_of_range, OutOfRangePolicy::Discard);
        assert_eq!(config.parse_mode, ParseMode::Strict);
        assert_eq!(config.top_k, 6);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        let config = AnalysisConfig {
            alpha: 0.5,
            max_iter: 30,
            ..AnalysisConfig::default()
        };
        config.save(&path).unwrap();
        let restored = AnalysisConfig::load(&path).unwrap();
        assert!((restored.alpha - 0.5).abs() < 1e-12);
        assert_eq!(restored.max_iter, 30);
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let config = AnalysisConfig {
            alpha: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_max_iter() {
        let capped = AnalysisConfig {
            max_iter: MAX_ITER_CAP,
            ..AnalysisConfig::default()
        };
        assert!(capped.validate().is_ok());

        let huge = AnalysisConfig {
            max_iter: u32::MAX,
            ..AnalysisConfig::default()
        };
        assert!(huge.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(&path, r#"{"max_iter":4294967295}"#).unwrap();
        assert!(AnalysisConfig::load(&path).is_err());
    }
}
