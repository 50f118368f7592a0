//! Activation modes and the logistic nonlinearity
//!
//! Every propagation pass runs in one of two modes:
//!
//! - **Deterministic**: unit activities are left as probabilities (or raw
//!   excitations for Gaussian inputs). Two deterministic passes over the
//!   same state produce identical results.
//! - **Stochastic**: after the deterministic computation, binary units are
//!   resampled as Bernoulli draws on their probabilities, and Gaussian
//!   inputs get unit-variance noise around their excitation. This is the
//!   mode contrastive-divergence training uses for its positive phase.
//!
//! ## Logistic function
//!
//! Binary units squash their excitation through the logistic function:
//!
//! ```text
//! logistic(x) = 1 / (1 + exp(-x))
//! ```
//!
//! which maps any excitation into a probability in (0, 1).

use serde::{Deserialize, Serialize};

/// Whether a propagation pass samples its units or leaves probabilities.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Activities stay at their computed probabilities.
    Deterministic,
    /// Binary activities are replaced by Bernoulli draws, Gaussian ones
    /// by unit-variance draws around their excitation.
    Stochastic,
}

/// The logistic sigmoid, mapping an excitation to a probability.
///
/// # Example
///
/// ```rust
/// # use harmonium::layers::logistic;
/// assert_eq!(logistic(0.0), 0.5);
/// assert!(logistic(10.0) > 0.999);
/// assert!(logistic(-10.0) < 0.001);
/// ```
#[inline]
pub fn logistic(excitation: f64) -> f64 {
    1.0 / (1.0 + (-excitation).exp())
}
