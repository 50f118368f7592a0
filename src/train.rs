//! Training configuration and epoch driver
//!
//! The net's own [`Net::learn`] and [`Net::learn_by_layer`] make exactly
//! one pass over a pattern list. This module wraps them in an epoch loop
//! with a serializable hyperparameter struct and optional CSV logging.
//!
//! ## Example
//!
//! ```rust
//! use harmonium::{train, Net, PatternList, TrainingConfig};
//!
//! let patterns = PatternList::from_rows(vec![
//!     vec![1.0, 1.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 1.0, 1.0],
//! ]).unwrap();
//!
//! let mut net = Net::deep_belief_net(&[4, 3], true).unwrap();
//! net.reseed(1);
//!
//! let config = TrainingConfig::tiny();
//! let final_error = train::run(&mut net, &patterns, &config, None).unwrap();
//! assert!(final_error.is_finite());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::NetResult;
use crate::net::Net;
use crate::pattern::PatternList;
use crate::training_logger::TrainingLogger;

/// Which training procedure an epoch runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Joint contrastive divergence over all layers per pattern.
    Joint,
    /// Greedy layer-wise pretraining, earliest layer first.
    ByLayer,
}

/// Hyperparameters for a training run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Learning rate passed to every CD-1 update.
    pub learning_rate: f64,
    /// Number of passes over the pattern list.
    pub epochs: usize,
    /// Log every N epochs (0 disables periodic logging).
    pub log_every: usize,
    /// Joint or greedy layer-wise training.
    pub regime: Regime,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 100,
            log_every: 10,
            regime: Regime::Joint,
        }
    }
}

impl TrainingConfig {
    /// A small configuration for quick experiments and tests.
    pub fn tiny() -> Self {
        Self {
            learning_rate: 0.05,
            epochs: 20,
            log_every: 5,
            regime: Regime::Joint,
        }
    }

    /// Greedy layer-wise pretraining with conservative settings.
    pub fn pretraining() -> Self {
        Self {
            learning_rate: 0.001,
            epochs: 500,
            log_every: 50,
            regime: Regime::ByLayer,
        }
    }
}

/// Run a full training loop.
///
/// Each epoch makes one pass over `patterns` with the configured regime,
/// then measures the mean first-layer reconstruction error. When a logger
/// is given, the error is logged every `log_every` epochs and at the end.
///
/// Returns the final mean reconstruction error.
pub fn run(
    net: &mut Net,
    patterns: &PatternList,
    config: &TrainingConfig,
    mut logger: Option<&mut TrainingLogger>,
) -> NetResult<f64> {
    let mut error = net.mean_reconstruction_error(patterns)?;
    for epoch in 1..=config.epochs {
        match config.regime {
            Regime::Joint => net.learn(patterns, config.learning_rate)?,
            Regime::ByLayer => net.learn_by_layer(patterns, config.learning_rate)?,
        }
        error = net.mean_reconstruction_error(patterns)?;
        if let Some(logger) = logger.as_deref_mut() {
            let last_epoch = epoch == config.epochs;
            if last_epoch || (config.log_every > 0 && epoch % config.log_every == 0) {
                logger.log(epoch, config.learning_rate, error)?;
            }
        }
    }
    Ok(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> PatternList {
        PatternList::from_rows(vec![
            vec![1.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_run_returns_final_error() {
        let mut net = Net::deep_belief_net(&[4, 3], true).unwrap();
        net.reseed(1);
        let error = run(&mut net, &patterns(), &TrainingConfig::tiny(), None).unwrap();
        assert!(error.is_finite());
        assert!(error >= 0.0);
    }

    #[test]
    fn test_run_trains_the_net() {
        let mut net = Net::deep_belief_net(&[4, 3], true).unwrap();
        net.reseed(2);
        run(&mut net, &patterns(), &TrainingConfig::tiny(), None).unwrap();
        assert!(net
            .extract_weights(1)
            .unwrap()
            .as_slice()
            .iter()
            .any(|&w| w != 0.0));
    }

    #[test]
    fn test_by_layer_regime_runs() {
        let mut net = Net::deep_belief_net(&[4, 3, 2], true).unwrap();
        net.reseed(3);
        let config = TrainingConfig {
            regime: Regime::ByLayer,
            epochs: 5,
            ..TrainingConfig::tiny()
        };
        run(&mut net, &patterns(), &config, None).unwrap();
        assert!(net
            .extract_weights(2)
            .unwrap()
            .as_slice()
            .iter()
            .any(|&w| w != 0.0));
    }

    #[test]
    fn test_run_logs_requested_epochs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut logger = TrainingLogger::new(&path).unwrap();

        let mut net = Net::deep_belief_net(&[4, 3], true).unwrap();
        net.reseed(4);
        let config = TrainingConfig {
            epochs: 10,
            log_every: 5,
            ..TrainingConfig::tiny()
        };
        run(&mut net, &patterns(), &config, Some(&mut logger)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        // Header + epochs 5 and 10.
        assert_eq!(contents.lines().count(), 3);
    }
}
