//! Network layers
//!
//! This module contains the layer abstraction and its concrete variants.
//!
//! ## Layers
//!
//! - **activation**: propagation modes and the logistic nonlinearity
//! - **rbm**: the restricted-Boltzmann-machine layer
//!
//! ## Design pattern
//!
//! Every layer variant implements the same capability set:
//!
//! ```rust,ignore
//! layer.spread_up(mode, rng);                // inputs → outputs
//! layer.spread_down(mode, rng);              // outputs → inputs
//! layer.spread_down_to_reconstruction();     // negative-phase visible pass
//! layer.spread_up_from_reconstruction();     // negative-phase hidden pass
//! layer.sample_input(rng);                   // in-place visible resampling
//! layer.update(learning_rate);               // CD-1 parameter update
//! layer.extract_weights();                   // detached snapshots
//! ```
//!
//! [`Layer`] is a tagged variant over the concrete layer types rather than
//! a trait object: nets own their layers by value, dispatch is a plain
//! `match`, and adding a variant (say, a deterministic fully connected
//! layer) extends the enum without touching ownership.

pub mod activation;
pub mod rbm;

pub use activation::{logistic, Activation};
pub use rbm::RbmLayer;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;

/// A network layer: the tagged variant the [`crate::net::Net`] pipeline
/// is built from.
///
/// Currently one concrete variant exists, the RBM layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Layer {
    Rbm(RbmLayer),
}

impl Layer {
    fn rbm(&self) -> &RbmLayer {
        match self {
            Layer::Rbm(layer) => layer,
        }
    }

    fn rbm_mut(&mut self) -> &mut RbmLayer {
        match self {
            Layer::Rbm(layer) => layer,
        }
    }

    /// Number of input (visible) nodes.
    pub fn input_len(&self) -> usize {
        self.rbm().input_len()
    }

    /// Number of output (hidden) nodes.
    pub fn output_len(&self) -> usize {
        self.rbm().output_len()
    }

    /// Whether the input units are binary (true) or Gaussian (false).
    pub fn inputs_are_binary(&self) -> bool {
        self.rbm().inputs_are_binary()
    }

    /// Propagate input activities up into output activities.
    pub fn spread_up<R: Rng>(&mut self, mode: Activation, rng: &mut R) {
        self.rbm_mut().spread_up(mode, rng)
    }

    /// Propagate output activities down into input activities.
    pub fn spread_down<R: Rng>(&mut self, mode: Activation, rng: &mut R) {
        self.rbm_mut().spread_down(mode, rng)
    }

    /// Downward pass into the reconstruction buffer; never samples.
    pub fn spread_down_to_reconstruction(&mut self) {
        self.rbm_mut().spread_down_to_reconstruction()
    }

    /// Upward pass from the reconstruction buffer; never samples.
    pub fn spread_up_from_reconstruction(&mut self) {
        self.rbm_mut().spread_up_from_reconstruction()
    }

    /// Resample the input activities in place.
    pub fn sample_input<R: Rng>(&mut self, rng: &mut R) {
        self.rbm_mut().sample_input(rng)
    }

    /// Resample the output activities as Bernoulli draws in place.
    pub fn sample_output<R: Rng>(&mut self, rng: &mut R) {
        self.rbm_mut().sample_output(rng)
    }

    /// One-step contrastive-divergence parameter update.
    pub fn update(&mut self, learning_rate: f64) {
        self.rbm_mut().update(learning_rate)
    }

    /// Sum of squared differences between input activities and the input
    /// reconstruction.
    pub fn reconstruction_error(&self) -> f64 {
        self.rbm().reconstruction_error()
    }

    /// Detached 1×n copy of the input activities.
    pub fn extract_input_activities(&self) -> Matrix {
        self.rbm().extract_input_activities()
    }

    /// Detached 1×n copy of the output activities.
    pub fn extract_output_activities(&self) -> Matrix {
        self.rbm().extract_output_activities()
    }

    /// Detached 1×n copy of the input reconstruction buffer.
    pub fn extract_input_reconstruction(&self) -> Matrix {
        self.rbm().extract_input_reconstruction()
    }

    /// Detached 1×n copy of the output reconstruction buffer.
    pub fn extract_output_reconstruction(&self) -> Matrix {
        self.rbm().extract_output_reconstruction()
    }

    /// Detached 1×n copy of the input biases.
    pub fn extract_input_biases(&self) -> Matrix {
        self.rbm().extract_input_biases()
    }

    /// Detached 1×n copy of the output biases.
    pub fn extract_output_biases(&self) -> Matrix {
        self.rbm().extract_output_biases()
    }

    /// Detached copy of the weight grid (input nodes × output nodes).
    pub fn extract_weights(&self) -> Matrix {
        self.rbm().extract_weights()
    }

    pub(crate) fn input_activities(&self) -> &[f64] {
        &self.rbm().input_activities
    }

    pub(crate) fn input_activities_mut(&mut self) -> &mut [f64] {
        &mut self.rbm_mut().input_activities
    }

    pub(crate) fn output_activities(&self) -> &[f64] {
        &self.rbm().output_activities
    }

    pub(crate) fn output_activities_mut(&mut self) -> &mut [f64] {
        &mut self.rbm_mut().output_activities
    }
}
