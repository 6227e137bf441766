use super::driver::{decide, Decision, DriverConfig, TurnMemory};
use crate::core::BattleView;

use anyhow::{bail, ensure, Context, Result};
use rand::rngs::StdRng;

use std::str::FromStr;
use std::time::Instant;

/// Options for one `go`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Overrides the engine's maxdepth for this search
    pub depth: Option<usize>,
}

impl FromStr for SearchOptions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut i = 0;
        let mut search_options = SearchOptions::default();

        let parts = s.split_whitespace().collect::<Vec<_>>();

        while i < parts.len() {
            match parts[i] {
                "depth" if i + 1 < parts.len() => {
                    let depth: usize = parts[i + 1].parse().context("invalid depth")?;
                    ensure!(depth >= 1, "depth must be at least 1");
                    search_options.depth = Some(depth);
                    i += 1;
                }
                p => bail!("invalid go argument {}", p),
            }
            i += 1;
        }
        Ok(search_options)
    }
}

/// Run the driver and time it, returning the elapsed seconds alongside
pub fn timed_decide<V: BattleView>(
    view: &V,
    config: &DriverConfig,
    memory: &TurnMemory,
    rng: &mut StdRng,
) -> Result<(Decision, TurnMemory, f64)> {
    let start_time = Instant::now();
    let (decision, memory) = decide(view, config, memory, rng)?;

    Ok((decision, memory, start_time.elapsed().as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth() {
        assert_eq!("".parse::<SearchOptions>().unwrap(), SearchOptions::default());
        assert_eq!("depth 3".parse::<SearchOptions>().unwrap().depth, Some(3));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!("depth".parse::<SearchOptions>().is_err());
        assert!("depth 0".parse::<SearchOptions>().is_err());
        assert!("movetime 100".parse::<SearchOptions>().is_err());
    }
}
