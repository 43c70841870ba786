//! Near-duplicate text detection via pairwise similarity scoring.
//!
//! The ratio itself ([`ratio::similarity_ratio`]) is a pure function over
//! two strings; [`scorer`] applies it to eligible files with candidate-pair
//! pruning so the all-pairs comparison stays tractable.

pub mod ratio;
pub mod scorer;

pub use ratio::similarity_ratio;
pub use scorer::{score_near_text, NearTextStats, SimilarityPair};
