//! Restricted Boltzmann Machine layer
//!
//! An RBM layer is a bipartite pair of node banks: input (visible) nodes
//! and output (hidden) nodes, fully connected by a weight grid with no
//! within-bank connections. Output nodes are always binary with logistic
//! activation; input nodes are either binary/logistic or Gaussian
//! (real-valued, mean = excitation, unit variance), chosen at construction.
//!
//! ## Propagation
//!
//! ```text
//! spread_up:      excitation_j = Σ_i input_activities[i] · weights[i][j] + output_biases[j]
//!                 output_activities[j] = logistic(excitation_j)
//!
//! spread_down:    excitation_i = Σ_j weights[i][j] · output_activities[j] + input_biases[i]
//!                 input_activities[i] = logistic(excitation_i)   (binary inputs)
//!                                     = excitation_i             (Gaussian inputs)
//! ```
//!
//! Both sums run through [`pairwise_dot`] so floating-point error stays
//! logarithmic in the fan-in. In stochastic mode the computed
//! probabilities are replaced by Bernoulli draws (or, for Gaussian
//! inputs, by unit-variance draws around the excitation).
//!
//! ## Contrastive divergence (CD-1)
//!
//! Training alternates a data-driven pass with a one-step reconstruction:
//!
//! 1. `spread_up(Stochastic)` — positive-phase statistics
//! 2. `spread_down_to_reconstruction()` — negative-phase visible estimate
//! 3. `spread_up_from_reconstruction()` — negative-phase hidden estimate
//! 4. `update(lr)` — move parameters toward the data statistics and away
//!    from the reconstruction statistics:
//!
//! ```text
//! Δ output_biases[j] = lr · (output_activities[j] − output_reconstruction[j])
//! Δ input_biases[i]  = lr · (input_activities[i]  − input_reconstruction[i])
//! Δ weights[i][j]    = lr · (input_activities[i] · output_activities[j]
//!                          − input_reconstruction[i] · output_reconstruction[j])
//! ```
//!
//! The reconstruction passes never sample and never mutate the live
//! activities, so the positive-phase statistics survive until `update`.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layers::activation::{logistic, Activation};
use crate::matrix::{pairwise_dot, Matrix};

/// One restricted-Boltzmann-machine layer.
///
/// All parameters and buffers start at zero; training mutates them in
/// place. The struct owns every buffer exclusively — the `extract_*`
/// methods return detached copies, never views.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RbmLayer {
    pub(crate) input_biases: Vec<f64>,
    pub(crate) output_biases: Vec<f64>,
    /// Weight grid: rows = input nodes, columns = output nodes.
    pub(crate) weights: Matrix,
    pub(crate) input_activities: Vec<f64>,
    pub(crate) output_activities: Vec<f64>,
    /// Negative-phase visible estimate, overwritten by each
    /// `spread_down_to_reconstruction` call.
    pub(crate) input_reconstruction: Vec<f64>,
    /// Negative-phase hidden estimate, overwritten by each
    /// `spread_up_from_reconstruction` call.
    pub(crate) output_reconstruction: Vec<f64>,
    /// True: binary/logistic input units. False: Gaussian input units.
    pub(crate) inputs_are_binary: bool,
}

impl RbmLayer {
    /// Create a zero-initialized layer.
    ///
    /// # Arguments
    ///
    /// * `input_nodes` - number of input (visible) nodes
    /// * `output_nodes` - number of output (hidden) nodes
    /// * `inputs_are_binary` - binary/logistic inputs if true, Gaussian
    ///   if false; outputs are always binary
    pub fn new(input_nodes: usize, output_nodes: usize, inputs_are_binary: bool) -> Self {
        Self {
            input_biases: vec![0.0; input_nodes],
            output_biases: vec![0.0; output_nodes],
            weights: Matrix::zeros(input_nodes, output_nodes),
            input_activities: vec![0.0; input_nodes],
            output_activities: vec![0.0; output_nodes],
            input_reconstruction: vec![0.0; input_nodes],
            output_reconstruction: vec![0.0; output_nodes],
            inputs_are_binary,
        }
    }

    /// Number of input (visible) nodes.
    pub fn input_len(&self) -> usize {
        self.input_biases.len()
    }

    /// Number of output (hidden) nodes.
    pub fn output_len(&self) -> usize {
        self.output_biases.len()
    }

    /// Whether the input units are binary (true) or Gaussian (false).
    pub fn inputs_are_binary(&self) -> bool {
        self.inputs_are_binary
    }

    /// Propagate input activities up into output activities.
    ///
    /// Excitations are computed in parallel (pure per-node work); sampling,
    /// when requested, runs sequentially over the caller's generator so
    /// seeded runs stay reproducible.
    pub fn spread_up<R: Rng>(&mut self, mode: Activation, rng: &mut R) {
        let excitations: Vec<f64> = (0..self.output_len())
            .into_par_iter()
            .map(|j| {
                pairwise_dot(&self.input_activities, &self.weights.column(j))
                    + self.output_biases[j]
            })
            .collect();
        for (activity, excitation) in self.output_activities.iter_mut().zip(excitations) {
            *activity = logistic(excitation);
        }
        if mode == Activation::Stochastic {
            self.sample_output(rng);
        }
    }

    /// Propagate output activities down into input activities.
    ///
    /// Binary inputs go through the logistic; Gaussian inputs take the raw
    /// excitation. Stochastic mode then resamples the inputs in place.
    pub fn spread_down<R: Rng>(&mut self, mode: Activation, rng: &mut R) {
        let excitations: Vec<f64> = (0..self.input_len())
            .into_par_iter()
            .map(|i| {
                pairwise_dot(self.weights.row(i), &self.output_activities)
                    + self.input_biases[i]
            })
            .collect();
        for (activity, excitation) in self.input_activities.iter_mut().zip(excitations) {
            *activity = if self.inputs_are_binary {
                logistic(excitation)
            } else {
                excitation
            };
        }
        if mode == Activation::Stochastic {
            self.sample_input(rng);
        }
    }

    /// Resample the input activities in place.
    ///
    /// Binary inputs become Bernoulli draws on their current value (read
    /// as a probability); Gaussian inputs become draws from
    /// N(current value, 1).
    pub fn sample_input<R: Rng>(&mut self, rng: &mut R) {
        for activity in &mut self.input_activities {
            if self.inputs_are_binary {
                let probability = *activity;
                *activity = if rng.random::<f64>() < probability { 1.0 } else { 0.0 };
            } else {
                let noise: f64 = StandardNormal.sample(rng);
                *activity += noise;
            }
        }
    }

    /// Resample the output activities as Bernoulli draws in place.
    pub fn sample_output<R: Rng>(&mut self, rng: &mut R) {
        for activity in &mut self.output_activities {
            let probability = *activity;
            *activity = if rng.random::<f64>() < probability { 1.0 } else { 0.0 };
        }
    }

    /// Downward pass into the reconstruction buffer.
    ///
    /// Same formula as `spread_down`, but writes `input_reconstruction`
    /// and never samples — this is the negative-phase visible estimate.
    pub fn spread_down_to_reconstruction(&mut self) {
        let excitations: Vec<f64> = (0..self.input_len())
            .into_par_iter()
            .map(|i| {
                pairwise_dot(self.weights.row(i), &self.output_activities)
                    + self.input_biases[i]
            })
            .collect();
        for (reconstruction, excitation) in
            self.input_reconstruction.iter_mut().zip(excitations)
        {
            *reconstruction = if self.inputs_are_binary {
                logistic(excitation)
            } else {
                excitation
            };
        }
    }

    /// Upward pass from the reconstruction buffer.
    ///
    /// Mirrors `spread_up` with `input_reconstruction` as source and
    /// `output_reconstruction` as destination; always deterministic.
    pub fn spread_up_from_reconstruction(&mut self) {
        let excitations: Vec<f64> = (0..self.output_len())
            .into_par_iter()
            .map(|j| {
                pairwise_dot(&self.input_reconstruction, &self.weights.column(j))
                    + self.output_biases[j]
            })
            .collect();
        for (reconstruction, excitation) in
            self.output_reconstruction.iter_mut().zip(excitations)
        {
            *reconstruction = logistic(excitation);
        }
    }

    /// One-step contrastive-divergence update.
    ///
    /// Positive statistics come from the live activities, negative
    /// statistics from the reconstruction buffers; both must have been
    /// computed by the caller beforehand.
    pub fn update(&mut self, learning_rate: f64) {
        for (bias, (activity, reconstruction)) in self.output_biases.iter_mut().zip(
            self.output_activities
                .iter()
                .zip(&self.output_reconstruction),
        ) {
            *bias += learning_rate * (activity - reconstruction);
        }
        for i in 0..self.input_biases.len() {
            self.input_biases[i] += learning_rate
                * (self.input_activities[i] - self.input_reconstruction[i]);
            let weight_row = self.weights.row_mut(i);
            for (j, weight) in weight_row.iter_mut().enumerate() {
                *weight += learning_rate
                    * (self.input_activities[i] * self.output_activities[j]
                        - self.input_reconstruction[i] * self.output_reconstruction[j]);
            }
        }
    }

    /// Sum of squared differences between the input activities and the
    /// current input reconstruction.
    pub fn reconstruction_error(&self) -> f64 {
        self.input_activities
            .iter()
            .zip(&self.input_reconstruction)
            .map(|(activity, reconstruction)| {
                let diff = activity - reconstruction;
                diff * diff
            })
            .sum()
    }

    /// Detached 1×n copy of the input activities.
    pub fn extract_input_activities(&self) -> Matrix {
        Matrix::from_row(&self.input_activities)
    }

    /// Detached 1×n copy of the output activities.
    pub fn extract_output_activities(&self) -> Matrix {
        Matrix::from_row(&self.output_activities)
    }

    /// Detached 1×n copy of the input reconstruction buffer.
    pub fn extract_input_reconstruction(&self) -> Matrix {
        Matrix::from_row(&self.input_reconstruction)
    }

    /// Detached 1×n copy of the output reconstruction buffer.
    pub fn extract_output_reconstruction(&self) -> Matrix {
        Matrix::from_row(&self.output_reconstruction)
    }

    /// Detached 1×n copy of the input biases.
    pub fn extract_input_biases(&self) -> Matrix {
        Matrix::from_row(&self.input_biases)
    }

    /// Detached 1×n copy of the output biases.
    pub fn extract_output_biases(&self) -> Matrix {
        Matrix::from_row(&self.output_biases)
    }

    /// Detached copy of the weight grid (input nodes × output nodes).
    pub fn extract_weights(&self) -> Matrix {
        self.weights.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_new_layer_is_zeroed() {
        let layer = RbmLayer::new(3, 2, true);
        assert_eq!(layer.input_len(), 3);
        assert_eq!(layer.output_len(), 2);
        let weights = layer.extract_weights();
        assert_eq!(weights.rows(), 3);
        assert_eq!(weights.cols(), 2);
        assert!(weights.as_slice().iter().all(|&w| w == 0.0));
        assert!(layer.extract_input_biases().as_slice().iter().all(|&b| b == 0.0));
        assert!(layer.extract_output_biases().as_slice().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_spread_up_with_zero_parameters_gives_half() {
        let mut layer = RbmLayer::new(4, 3, true);
        layer.input_activities = vec![1.0, 0.0, 1.0, 0.0];
        layer.spread_up(Activation::Deterministic, &mut rng());
        for &activity in &layer.output_activities {
            assert_eq!(activity, 0.5);
        }
    }

    #[test]
    fn test_deterministic_spread_up_is_pure() {
        let mut layer = RbmLayer::new(5, 4, true);
        layer.input_activities = vec![0.2, 0.9, 0.1, 0.7, 0.4];
        layer.weights.set(0, 0, 0.3);
        layer.weights.set(4, 3, -0.8);
        layer.output_biases[1] = 0.25;

        layer.spread_up(Activation::Deterministic, &mut rng());
        let first = layer.output_activities.clone();
        layer.spread_up(Activation::Deterministic, &mut rng());
        assert_eq!(layer.output_activities, first);
    }

    #[test]
    fn test_spread_up_uses_weights_and_biases() {
        let mut layer = RbmLayer::new(2, 1, true);
        layer.input_activities = vec![1.0, 1.0];
        layer.weights.set(0, 0, 2.0);
        layer.weights.set(1, 0, -1.0);
        layer.output_biases[0] = 0.5;
        layer.spread_up(Activation::Deterministic, &mut rng());
        // excitation = 2.0 - 1.0 + 0.5
        assert!((layer.output_activities[0] - logistic(1.5)).abs() < 1e-15);
    }

    #[test]
    fn test_spread_down_binary_applies_logistic() {
        let mut layer = RbmLayer::new(2, 2, true);
        layer.output_activities = vec![1.0, 1.0];
        layer.weights.set(0, 0, 1.0);
        layer.weights.set(0, 1, 1.0);
        layer.input_biases[1] = -0.5;
        layer.spread_down(Activation::Deterministic, &mut rng());
        assert!((layer.input_activities[0] - logistic(2.0)).abs() < 1e-15);
        assert!((layer.input_activities[1] - logistic(-0.5)).abs() < 1e-15);
    }

    #[test]
    fn test_spread_down_gaussian_is_linear() {
        let mut layer = RbmLayer::new(2, 1, false);
        layer.output_activities = vec![1.0];
        layer.weights.set(0, 0, 3.0);
        layer.weights.set(1, 0, -2.0);
        layer.input_biases[0] = 0.25;
        layer.spread_down(Activation::Deterministic, &mut rng());
        assert_eq!(layer.input_activities, vec![3.25, -2.0]);
    }

    #[test]
    fn test_reconstruction_passes_leave_activities_untouched() {
        let mut layer = RbmLayer::new(3, 2, true);
        layer.input_activities = vec![1.0, 0.0, 1.0];
        layer.spread_up(Activation::Deterministic, &mut rng());
        let inputs = layer.input_activities.clone();
        let outputs = layer.output_activities.clone();

        layer.spread_down_to_reconstruction();
        layer.spread_up_from_reconstruction();

        assert_eq!(layer.input_activities, inputs);
        assert_eq!(layer.output_activities, outputs);
        // The buffers did get written.
        assert!(layer.input_reconstruction.iter().all(|&r| r == 0.5));
    }

    #[test]
    fn test_update_with_zero_learning_rate_is_noop() {
        let mut layer = RbmLayer::new(4, 3, true);
        layer.input_activities = vec![1.0, 0.0, 1.0, 1.0];
        layer.weights.set(1, 2, 0.6);
        layer.input_biases[0] = -0.1;
        layer.output_biases[2] = 0.4;

        layer.spread_up(Activation::Deterministic, &mut rng());
        layer.spread_down_to_reconstruction();
        layer.spread_up_from_reconstruction();

        let weights_before = layer.extract_weights();
        let input_biases_before = layer.extract_input_biases();
        let output_biases_before = layer.extract_output_biases();

        layer.update(0.0);

        assert_eq!(layer.extract_weights(), weights_before);
        assert_eq!(layer.extract_input_biases(), input_biases_before);
        assert_eq!(layer.extract_output_biases(), output_biases_before);
    }

    #[test]
    fn test_update_applies_cd1_rule() {
        let mut layer = RbmLayer::new(1, 1, true);
        layer.input_activities = vec![1.0];
        layer.output_activities = vec![1.0];
        layer.input_reconstruction = vec![0.25];
        layer.output_reconstruction = vec![0.5];

        layer.update(0.1);

        // Δw = 0.1 * (1*1 - 0.25*0.5)
        assert!((layer.weights.get(0, 0) - 0.0875).abs() < 1e-15);
        // Δb_in = 0.1 * (1 - 0.25), Δb_out = 0.1 * (1 - 0.5)
        assert!((layer.input_biases[0] - 0.075).abs() < 1e-15);
        assert!((layer.output_biases[0] - 0.05).abs() < 1e-15);
    }

    #[test]
    fn test_sampling_is_reproducible_under_a_fixed_seed() {
        let mut first = RbmLayer::new(20, 10, true);
        let mut second = first.clone();
        first.input_activities = vec![0.5; 20];
        second.input_activities = vec![0.5; 20];

        first.spread_up(Activation::Stochastic, &mut StdRng::seed_from_u64(7));
        second.spread_up(Activation::Stochastic, &mut StdRng::seed_from_u64(7));
        assert_eq!(first.output_activities, second.output_activities);
    }

    #[test]
    fn test_stochastic_output_is_binary() {
        let mut layer = RbmLayer::new(8, 16, true);
        layer.input_activities = vec![1.0; 8];
        layer.spread_up(Activation::Stochastic, &mut rng());
        assert!(layer
            .output_activities
            .iter()
            .all(|&a| a == 0.0 || a == 1.0));
    }

    #[test]
    fn test_binary_sample_input_respects_certainty() {
        let mut layer = RbmLayer::new(4, 1, true);
        layer.input_activities = vec![0.0, 1.0, 0.0, 1.0];
        layer.sample_input(&mut rng());
        assert_eq!(layer.input_activities, vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_gaussian_sample_input_perturbs_around_mean() {
        let mut layer = RbmLayer::new(1000, 1, false);
        layer.input_activities = vec![5.0; 1000];
        layer.sample_input(&mut rng());
        let mean: f64 =
            layer.input_activities.iter().sum::<f64>() / layer.input_len() as f64;
        // Unit variance around 5.0; the sample mean of 1000 draws stays close.
        assert!((mean - 5.0).abs() < 0.2);
        assert!(layer.input_activities.iter().any(|&a| a != 5.0));
    }

    #[test]
    fn test_reconstruction_error_is_sum_of_squares() {
        let mut layer = RbmLayer::new(2, 1, true);
        layer.input_activities = vec![1.0, 0.0];
        layer.input_reconstruction = vec![0.5, 0.5];
        assert!((layer.reconstruction_error() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_extraction_is_detached() {
        let mut layer = RbmLayer::new(2, 2, true);
        let snapshot = layer.extract_weights();
        layer.weights.set(0, 0, 9.0);
        assert_eq!(snapshot.get(0, 0), 0.0);
    }
}
