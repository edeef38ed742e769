pub mod catalog;
pub mod descriptor;
pub mod estimator;
pub mod features;

#[cfg(test)]
pub(crate) mod fixtures;

pub use descriptor::{DescriptorError, DescriptorRegistry, FingerRule, GestureDescriptor};
pub use estimator::{DEFAULT_MIN_CONFIDENCE, GestureEstimator, select_winner};
pub use features::{CurlThresholds, FeatureExtractor};
