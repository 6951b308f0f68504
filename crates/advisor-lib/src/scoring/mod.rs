//! Candidate scoring and ranking
//!
//! Each eligible instance gets a composite score from three parts:
//! - **Performance fit**: how the instance's capacity compares to the minimum,
//!   rewarded or penalized depending on the priority regime
//! - **Cost**: min-max normalized monthly cost across the eligible set
//! - **Suitability**: alignment of the instance category with the archetype

mod engine;
mod fit;
mod ranker;


pub use engine::{CostRange, ScoringEngine, SUITABILITY_BASE, SUITABILITY_DIVISOR};
pub use fit::{fit_score, overkill_ratio, FitRegime, MAX_FIT, MIN_FIT};
pub use ranker::rank;
