//! The deep belief net
//!
//! A [`Net`] is an ordered, owned sequence of [`Layer`]s forming a
//! pipeline: each layer's output nodes feed the next layer's input nodes.
//! The net orchestrates whole-pipeline propagation, the two training
//! regimes, and the exchange of pattern rows and extracted matrices with
//! the caller.
//!
//! ## Pipeline threading
//!
//! `spread_up` walks the layers bottom to top; before each layer except
//! the first it copies the previous layer's output activities verbatim
//! into that layer's input activities. `spread_down` is the mirror image,
//! top to bottom. This threading is why adjacent layer boundaries must
//! match exactly — guaranteed here by chain construction. The
//! reconstruction passes are layer-local and do no threading.
//!
//! ## Training regimes
//!
//! - [`Net::learn`]: joint contrastive divergence. Each pattern row gets
//!   one full stochastic upward pass (all layers see simultaneously
//!   computed positive-phase statistics), then every layer runs its own
//!   reconstruction cycle and CD-1 update.
//! - [`Net::learn_by_layer`]: greedy layer-wise pretraining. Layers train
//!   one at a time, earliest first; the forward pass up to the target
//!   layer is recomputed from the bottom for every pattern, and layers
//!   below the target are frozen (forward only, no updates). Once a later
//!   layer starts training, earlier layers are never touched again.
//!
//! ## Randomness
//!
//! The net owns a single seeded generator used by every stochastic pass,
//! so seeded runs are bit-reproducible. There is no process-wide RNG
//! state.
//!
//! ## Example
//!
//! ```rust
//! use harmonium::{Activation, Net, PatternList};
//!
//! let patterns = PatternList::from_rows(vec![
//!     vec![1.0, 1.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 1.0, 1.0],
//! ]).unwrap();
//!
//! let mut net = Net::deep_belief_net(&[4, 3, 2], true).unwrap();
//! net.reseed(1);
//! net.learn(&patterns, 0.1).unwrap();
//!
//! let activations = net.to_activations(&patterns, Activation::Deterministic).unwrap();
//! assert_eq!(activations.len(), 2);
//! assert_eq!(activations.width(), 2);
//! ```

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};
use crate::layers::{Activation, Layer, RbmLayer};
use crate::matrix::Matrix;
use crate::pattern::{ActivationList, PatternList};

/// Seed of the generator a net starts with (and reverts to after `load`).
const DEFAULT_SEED: u64 = 0;

fn default_rng() -> StdRng {
    StdRng::seed_from_u64(DEFAULT_SEED)
}

/// A deep belief net: an owned chain of layers plus the single random
/// generator all stochastic passes draw from.
///
/// Layer numbering in the public API is 1-based, matching how the layers
/// are usually talked about (layer 1 touches the external input). The
/// generator is not serialized; a loaded net starts from the default
/// seed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    layers: Vec<Layer>,
    #[serde(skip, default = "default_rng")]
    rng: StdRng,
}

impl Net {
    /// Create a net with no layers.
    ///
    /// Propagation and training on an empty net are no-ops; pattern
    /// application and extraction report [`NetError::LayerOutOfRange`].
    pub fn empty() -> Self {
        Self {
            layers: Vec::new(),
            rng: default_rng(),
        }
    }

    /// Create a deep belief net as a chain of RBM layers.
    ///
    /// `sizes` lists the node counts per level; `sizes.len() - 1` layers
    /// are built, each layer's output count equal to the next layer's
    /// input count. Only the first layer inherits `inputs_are_binary`:
    /// every later layer consumes the previous layer's binary outputs, so
    /// its inputs are binary regardless.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::ShapeMismatch`] if `sizes` has fewer than two
    /// entries.
    pub fn deep_belief_net(sizes: &[usize], inputs_are_binary: bool) -> NetResult<Self> {
        if sizes.len() < 2 {
            return Err(NetError::ShapeMismatch {
                context: "deep belief net construction: levels of nodes".to_string(),
                actual: sizes.len(),
                expected: 2,
            });
        }
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                Layer::Rbm(RbmLayer::new(
                    pair[0],
                    pair[1],
                    if i == 0 { inputs_are_binary } else { true },
                ))
            })
            .collect();
        Ok(Self {
            layers,
            rng: default_rng(),
        })
    }

    /// Reset the net's generator to a known seed.
    ///
    /// Two nets with identical parameters and the same seed produce
    /// bit-identical stochastic passes.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn check_layer_number(&self, number: usize) -> NetResult<usize> {
        if number == 0 || number > self.layers.len() {
            return Err(NetError::LayerOutOfRange {
                requested: number,
                max: self.layers.len(),
            });
        }
        Ok(number - 1)
    }

    fn first_layer(&self) -> NetResult<&Layer> {
        self.layers.first().ok_or(NetError::LayerOutOfRange {
            requested: 1,
            max: 0,
        })
    }

    fn last_layer(&self) -> NetResult<&Layer> {
        self.layers.last().ok_or(NetError::LayerOutOfRange {
            requested: 1,
            max: 0,
        })
    }

    /// Copy layer `from`'s output activities into layer `to = from + 1`'s
    /// input activities. Boundaries match by construction.
    fn thread_up(&mut self, to: usize) {
        let (lower, upper) = self.layers.split_at_mut(to);
        upper[0]
            .input_activities_mut()
            .copy_from_slice(lower[to - 1].output_activities());
    }

    /// Copy layer `from = to + 1`'s input activities into layer `to`'s
    /// output activities.
    fn thread_down(&mut self, to: usize) {
        let (lower, upper) = self.layers.split_at_mut(to + 1);
        lower[to]
            .output_activities_mut()
            .copy_from_slice(upper[0].input_activities());
    }

    /// Propagate the first layer's input activities up through the whole
    /// chain, threading activations across each layer boundary.
    pub fn spread_up(&mut self, mode: Activation) {
        for i in 0..self.layers.len() {
            if i > 0 {
                self.thread_up(i);
            }
            self.layers[i].spread_up(mode, &mut self.rng);
        }
    }

    /// Propagate the last layer's output activities down through the
    /// whole chain, threading activations across each layer boundary.
    pub fn spread_down(&mut self, mode: Activation) {
        for i in (0..self.layers.len()).rev() {
            if i + 1 < self.layers.len() {
                self.thread_down(i);
            }
            self.layers[i].spread_down(mode, &mut self.rng);
        }
    }

    /// Run every layer's downward reconstruction pass, top to bottom.
    ///
    /// Layer-local: each layer reconstructs from its own output
    /// activities; nothing is threaded between layers.
    pub fn spread_down_to_reconstruction(&mut self) {
        for layer in self.layers.iter_mut().rev() {
            layer.spread_down_to_reconstruction();
        }
    }

    /// Run every layer's upward reconstruction pass, bottom to top.
    pub fn spread_up_from_reconstruction(&mut self) {
        for layer in &mut self.layers {
            layer.spread_up_from_reconstruction();
        }
    }

    /// Resample the first layer's input activities in place.
    ///
    /// Only the two ends of the chain carry externally visible units; a
    /// net with no layers does nothing.
    pub fn sample_input(&mut self) {
        if let Some(layer) = self.layers.first_mut() {
            layer.sample_input(&mut self.rng);
        }
    }

    /// Resample the last layer's output activities in place.
    pub fn sample_output(&mut self) {
        if let Some(layer) = self.layers.last_mut() {
            layer.sample_output(&mut self.rng);
        }
    }

    /// Apply every layer's CD-1 update in order.
    ///
    /// Each layer updates independently from its own previously computed
    /// activity and reconstruction buffers.
    pub fn update(&mut self, learning_rate: f64) {
        for layer in &mut self.layers {
            layer.update(learning_rate);
        }
    }

    /// Copy one pattern row into the first layer's input activities.
    ///
    /// `row` is zero-based.
    ///
    /// # Errors
    ///
    /// [`NetError::ShapeMismatch`] if the row width differs from the
    /// first layer's input node count; [`NetError::LayerOutOfRange`] on
    /// an empty net.
    ///
    /// # Panics
    ///
    /// Panics if `row >= patterns.len()`.
    pub fn apply_pattern_to_input(
        &mut self,
        patterns: &PatternList,
        row: usize,
    ) -> NetResult<()> {
        let expected = self.first_layer()?.input_len();
        if patterns.width() != expected {
            return Err(NetError::ShapeMismatch {
                context: format!("pattern row {} applied to input", row + 1),
                actual: patterns.width(),
                expected,
            });
        }
        self.layers[0]
            .input_activities_mut()
            .copy_from_slice(patterns.row(row));
        Ok(())
    }

    /// Copy one pattern row into the last layer's output activities.
    ///
    /// `row` is zero-based.
    ///
    /// # Errors
    ///
    /// [`NetError::ShapeMismatch`] if the row width differs from the
    /// last layer's output node count; [`NetError::LayerOutOfRange`] on
    /// an empty net.
    ///
    /// # Panics
    ///
    /// Panics if `row >= patterns.len()`.
    pub fn apply_pattern_to_output(
        &mut self,
        patterns: &PatternList,
        row: usize,
    ) -> NetResult<()> {
        let expected = self.last_layer()?.output_len();
        if patterns.width() != expected {
            return Err(NetError::ShapeMismatch {
                context: format!("pattern row {} applied to output", row + 1),
                actual: patterns.width(),
                expected,
            });
        }
        let last = self.layers.len() - 1;
        self.layers[last]
            .output_activities_mut()
            .copy_from_slice(patterns.row(row));
        Ok(())
    }

    /// Joint contrastive-divergence training over a pattern list.
    ///
    /// For every row: load it into the input, run one full stochastic
    /// upward pass (positive-phase statistics for all layers at once),
    /// then give every layer its reconstruction cycle and CD-1 update.
    ///
    /// Updates applied before a failure are kept; nothing rolls back.
    pub fn learn(&mut self, patterns: &PatternList, learning_rate: f64) -> NetResult<()> {
        for row in 0..patterns.len() {
            self.apply_pattern_to_input(patterns, row)?;
            self.spread_up(Activation::Stochastic);
            for layer in &mut self.layers {
                layer.spread_down_to_reconstruction();
                layer.spread_up_from_reconstruction();
                layer.update(learning_rate);
            }
        }
        Ok(())
    }

    /// Train one layer greedily: recompute the stochastic forward pass
    /// from the bottom through the target for every pattern, then run the
    /// target's reconstruction cycle and update. Layers below the target
    /// only spread forward; layers above are not touched at all.
    fn learn_single_layer(
        &mut self,
        target: usize,
        patterns: &PatternList,
        learning_rate: f64,
    ) -> NetResult<()> {
        for row in 0..patterns.len() {
            self.apply_pattern_to_input(patterns, row)?;
            self.layers[0].spread_up(Activation::Stochastic, &mut self.rng);
            for i in 1..=target {
                self.thread_up(i);
                self.layers[i].spread_up(Activation::Stochastic, &mut self.rng);
            }
            let layer = &mut self.layers[target];
            layer.spread_down_to_reconstruction();
            layer.spread_up_from_reconstruction();
            layer.update(learning_rate);
        }
        Ok(())
    }

    /// Greedy layer-wise pretraining over a pattern list.
    ///
    /// Layers train one at a time from the bottom; the forward pass up to
    /// the current layer is recomputed from layer 1 for every pattern
    /// rather than cached. Once a later layer starts training, earlier
    /// layers' parameters are final.
    pub fn learn_by_layer(
        &mut self,
        patterns: &PatternList,
        learning_rate: f64,
    ) -> NetResult<()> {
        for target in 0..self.layers.len() {
            self.learn_single_layer(target, patterns, learning_rate)?;
        }
        Ok(())
    }

    /// Run every pattern row through the net and collect the final
    /// layer's output activations, one row per pattern.
    ///
    /// Mutates activities (every row is a fresh forward pass) but never
    /// weights or biases.
    pub fn to_activations(
        &mut self,
        patterns: &PatternList,
        mode: Activation,
    ) -> NetResult<ActivationList> {
        let width = self.last_layer()?.output_len();
        let mut activations = ActivationList::zeros(patterns.len(), width);
        for row in 0..patterns.len() {
            self.apply_pattern_to_input(patterns, row)?;
            self.spread_up(mode);
            let last = self.layers.len() - 1;
            activations.set_row(row, self.layers[last].output_activities());
        }
        Ok(activations)
    }

    /// The first layer's current reconstruction error: the sum of squared
    /// differences between its input activities and input reconstruction.
    pub fn reconstruction_error(&self) -> f64 {
        self.layers
            .first()
            .map_or(0.0, Layer::reconstruction_error)
    }

    /// Mean first-layer reconstruction error over a pattern list.
    ///
    /// For every row: fresh deterministic upward pass, then the first
    /// layer's reconstruction pass. Mutates activities only — weights and
    /// biases stay put — so it can interleave with training as a progress
    /// measure.
    pub fn mean_reconstruction_error(&mut self, patterns: &PatternList) -> NetResult<f64> {
        if patterns.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for row in 0..patterns.len() {
            self.apply_pattern_to_input(patterns, row)?;
            self.spread_up(Activation::Deterministic);
            self.layers[0].spread_down_to_reconstruction();
            total += self.layers[0].reconstruction_error();
        }
        Ok(total / patterns.len() as f64)
    }

    /// Detached 1×n copy of the first layer's input activities.
    pub fn extract_input_activities(&self) -> NetResult<Matrix> {
        Ok(self.first_layer()?.extract_input_activities())
    }

    /// Detached 1×n copy of the last layer's output activities.
    pub fn extract_output_activities(&self) -> NetResult<Matrix> {
        Ok(self.last_layer()?.extract_output_activities())
    }

    /// Detached 1×n copy of the first layer's input reconstruction.
    pub fn extract_input_reconstruction(&self) -> NetResult<Matrix> {
        Ok(self.first_layer()?.extract_input_reconstruction())
    }

    /// Detached 1×n copy of the last layer's output reconstruction.
    pub fn extract_output_reconstruction(&self) -> NetResult<Matrix> {
        Ok(self.last_layer()?.extract_output_reconstruction())
    }

    /// Detached 1×n copy of one layer's input biases.
    ///
    /// `layer_number` is 1-based.
    ///
    /// # Errors
    ///
    /// [`NetError::LayerOutOfRange`] unless 1 ≤ `layer_number` ≤ layer
    /// count.
    pub fn extract_input_biases(&self, layer_number: usize) -> NetResult<Matrix> {
        let index = self.check_layer_number(layer_number)?;
        Ok(self.layers[index].extract_input_biases())
    }

    /// Detached 1×n copy of one layer's output biases.
    ///
    /// `layer_number` is 1-based.
    pub fn extract_output_biases(&self, layer_number: usize) -> NetResult<Matrix> {
        let index = self.check_layer_number(layer_number)?;
        Ok(self.layers[index].extract_output_biases())
    }

    /// Detached copy of one layer's weight grid (input nodes × output
    /// nodes).
    ///
    /// `layer_number` is 1-based.
    pub fn extract_weights(&self, layer_number: usize) -> NetResult<Matrix> {
        let index = self.check_layer_number(layer_number)?;
        Ok(self.layers[index].extract_weights())
    }

    /// Save the net (layers and parameters, not the generator) as
    /// pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> NetResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a net previously written by [`Net::save`].
    ///
    /// The loaded net's generator starts from the default seed; call
    /// [`Net::reseed`] for a different stream.
    pub fn load<P: AsRef<Path>>(path: P) -> NetResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
