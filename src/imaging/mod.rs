//! Image normalization and optional external size optimization

mod normalizer;
pub(crate) mod optimizer;

pub use normalizer::{normalize, NormalizedImage};
