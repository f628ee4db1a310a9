//! Deterministic gradient-boosted decision-stump classifier.
//!
//! An alternative to the forest with a very different bias:
//! - Multi-class classification via softmax boosting.
//! - Binned split search, so training cost grows with bins rather than distinct values.
//! - No randomness at all; the same data always gives the same model.

mod model;
mod train;

pub use model::{GbdtStumpModel, Stump, softmax};
pub use train::{BoostingOptions, GbdtStump};
