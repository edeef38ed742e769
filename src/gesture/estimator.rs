use crate::{
    gesture::{
        descriptor::{DescriptorRegistry, GestureDescriptor},
        features::FeatureExtractor,
    },
    types::{Finger, GestureCandidate, Hand, HandFeatures},
};

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;

/// Scores every registered descriptor against one hand.
///
/// A descriptor's confidence is the importance-weighted mean of its ten
/// per-finger contributions (curl weight and direction weight for each
/// finger). With unit importances this is the plain arithmetic mean.
#[derive(Clone, Debug)]
pub struct GestureEstimator {
    registry: DescriptorRegistry,
    extractor: FeatureExtractor,
    min_confidence: f32,
}

impl GestureEstimator {
    /// `min_confidence` is clamped to [0, 1]; NaN falls back to the default.
    pub fn new(registry: DescriptorRegistry, min_confidence: f32) -> Self {
        let min_confidence = if min_confidence.is_nan() {
            log::warn!("confidence floor is NaN, using {DEFAULT_MIN_CONFIDENCE}");
            DEFAULT_MIN_CONFIDENCE
        } else {
            min_confidence.clamp(0.0, 1.0)
        };
        Self {
            registry,
            extractor: FeatureExtractor::default(),
            min_confidence,
        }
    }

    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Every descriptor's score in registration order, ignoring the floor.
    pub fn score_all(&self, features: &HandFeatures) -> Vec<GestureCandidate> {
        self.registry
            .iter()
            .map(|descriptor| GestureCandidate {
                name: descriptor.name().to_string(),
                confidence: score(descriptor, features),
            })
            .collect()
    }

    /// Candidates at or above the confidence floor, in registration order.
    pub fn estimate(&self, features: &HandFeatures) -> Vec<GestureCandidate> {
        let mut candidates = self.score_all(features);
        candidates.retain(|c| c.confidence >= self.min_confidence);
        candidates
    }

    pub fn estimate_hand(&self, hand: &Hand) -> (HandFeatures, Vec<GestureCandidate>) {
        let features = self.extractor.extract(hand);
        let candidates = self.estimate(&features);
        (features, candidates)
    }
}

fn score(descriptor: &GestureDescriptor, features: &HandFeatures) -> f32 {
    let mut total = 0.0;
    let mut importance_sum = 0.0;

    for finger in Finger::ALL {
        let observed = features.finger(finger);
        let (contribution, importance) = match descriptor.rule_ref(finger) {
            Some(rule) => (
                rule.curl_weight(observed.curl) + rule.direction_weight(observed.direction),
                rule.importance,
            ),
            None => (0.0, 1.0),
        };
        total += contribution * importance;
        importance_sum += 2.0 * importance;
    }

    (total / importance_sum).clamp(0.0, 1.0)
}

/// Highest-confidence candidate. Exact ties go to the earliest entry, which
/// for estimator output is the first registered descriptor.
pub fn select_winner(candidates: &[GestureCandidate]) -> Option<&GestureCandidate> {
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if current.confidence >= candidate.confidence => Some(current),
        _ => Some(candidate),
    })
}
