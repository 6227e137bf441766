//! Configuration options for the engine

use super::driver::{DriverConfig, FallbackPolicy};
use crate::ai::EvalWeights;

use anyhow::{bail, ensure, Context, Result};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Full rounds searched below the root
    pub max_depth: usize,
    /// Whether protocol errors end the session
    pub strict_mode: bool,
    pub fallback: FallbackPolicy,
    /// Whether the agent considers dynamaxed attacks
    pub include_dynamax: bool,
    pub weights: EvalWeights,
    /// Fixed seed for the fallback's randomness
    pub seed: Option<u64>,
    /// Keep a DOT rendering of every searched tree
    pub graphviz: bool,
}

impl EngineOptions {
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        let weight = || -> Result<f64> {
            let w: f64 = value.parse().with_context(|| format!("Invalid weight for {}: {}", name, value))?;
            ensure!(w.is_finite(), "Weight for {} must be finite, got {}", name, value);
            Ok(w)
        };

        match name {
            "maxdepth" => {
                let depth: usize = value.parse().context("Invalid maxdepth")?;
                ensure!(depth >= 1, "maxdepth must be at least 1");
                self.max_depth = depth;
            }
            "strictmode" => self.strict_mode = value.parse()?,
            "fallback" => self.fallback = value.parse()?,
            "dynamax" => self.include_dynamax = value.parse()?,
            "seed" => self.seed = Some(value.parse().context("Invalid seed")?),
            "graphviz" => self.graphviz = value.parse()?,
            "knockoutbonus" => self.weights.knockout_bonus = weight()?,
            "damagedealt" => self.weights.damage_dealt = weight()?,
            "knockoutpenalty" => self.weights.knockout_penalty = weight()?,
            "damagetaken" => self.weights.damage_taken = weight()?,
            "speedpenalty" => self.weights.speed_penalty = weight()?,
            "typematchup" => self.weights.type_matchup = weight()?,
            "dynamaxpenalty" => self.weights.dynamax_penalty = weight()?,
            _ => bail!("Unknown option: {}", name),
        }

        Ok(())
    }

    /// Driver settings for one decision, searching `depth` rounds if given
    pub fn driver_config(&self, depth: Option<usize>) -> DriverConfig {
        DriverConfig {
            max_depth: depth.unwrap_or(self.max_depth),
            include_dynamax: self.include_dynamax,
            weights: self.weights,
            fallback: self.fallback,
            export_tree: self.graphviz,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            strict_mode: true,
            fallback: FallbackPolicy::Random,
            include_dynamax: true,
            weights: EvalWeights::default(),
            seed: None,
            graphviz: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_set_weights() {
        let mut options = EngineOptions::default();
        options.set_option("knockoutbonus", "500").unwrap();
        options.set_option("typematchup", "12.5").unwrap();

        assert_eq!(options.weights.knockout_bonus, 500.0);
        assert_eq!(options.weights.type_matchup, 12.5);
        assert_eq!(options.weights.damage_dealt, 3.0);
    }

    #[test]
    fn test_depth_override() {
        let mut options = EngineOptions::default();
        options.set_option("maxdepth", "3").unwrap();

        assert_eq!(options.driver_config(None).max_depth, 3);
        assert_eq!(options.driver_config(Some(2)).max_depth, 2);
    }

    #[test_case("maxdepth", "0")]
    #[test_case("maxdepth", "deep")]
    #[test_case("strictmode", "maybe")]
    #[test_case("fallback", "panic")]
    #[test_case("speedpenalty", "fast")]
    #[test_case("knockoutbonus", "nan")]
    #[test_case("damagetaken", "inf")]
    #[test_case("typematchup", "-inf")]
    #[test_case("hashsize", "16")]
    fn test_rejects_bad_option(name: &str, value: &str) {
        let mut options = EngineOptions::default();
        assert!(options.set_option(name, value).is_err());
    }
}
