//! Harmonium: Deep Belief Nets from Scratch
//!
//! A small training engine for stacked Restricted Boltzmann Machines
//! composed into a Deep Belief Net, implemented from scratch in Rust.
//! All learning is hand-derived one-step contrastive divergence (CD-1)
//! over sigmoid units — no automatic differentiation, no GPU. Named after
//! Smolensky's original name for the Restricted Boltzmann Machine.
//!
//! # Modules
//!
//! - [`layers`] - the layer abstraction and the RBM layer
//! - [`net`] - the layer pipeline, propagation, and both training regimes
//! - [`pattern`] - pattern and activation tables for data exchange
//! - [`matrix`] - dense matrices and order-stable pairwise summation
//! - [`train`] - training configuration and the epoch driver
//! - [`training_logger`] - CSV/console progress logging
//! - [`error`] - the crate's error type
//!
//! # Example
//!
//! Train a two-layer deep belief net on a toy dataset and inspect what
//! the top layer makes of each pattern:
//!
//! ```rust
//! use harmonium::{Activation, Net, PatternList};
//!
//! let patterns = PatternList::from_rows(vec![
//!     vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
//! ]).unwrap();
//!
//! // 6 visible nodes -> 4 hidden -> 2 top-level nodes.
//! let mut net = Net::deep_belief_net(&[6, 4, 2], true).unwrap();
//! net.reseed(42);
//!
//! for _ in 0..100 {
//!     net.learn(&patterns, 0.05).unwrap();
//! }
//!
//! let activations = net.to_activations(&patterns, Activation::Deterministic).unwrap();
//! assert_eq!(activations.len(), 2);
//! assert_eq!(activations.width(), 2);
//! ```

pub mod error;
pub mod layers;
pub mod matrix;
pub mod net;
pub mod pattern;
pub mod train;
pub mod training_logger;

// Re-export main types for convenience
pub use error::{NetError, NetResult};
pub use layers::{Activation, Layer, RbmLayer};
pub use matrix::Matrix;
pub use net::Net;
pub use pattern::{ActivationList, PatternList};
pub use train::{Regime, TrainingConfig};
pub use training_logger::TrainingLogger;
