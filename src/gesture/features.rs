use serde::Deserialize;

use crate::types::{
    Finger, FingerCurl, FingerDirection, FingerFeatures, Hand, HandFeatures, LandmarkPoint,
};

const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Bend-sum limits (degrees) separating the three curl buckets.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurlThresholds {
    pub half_curl_deg: f32,
    pub full_curl_deg: f32,
}

impl Default for CurlThresholds {
    fn default() -> Self {
        Self {
            half_curl_deg: 60.0,
            full_curl_deg: 150.0,
        }
    }
}

impl CurlThresholds {
    pub fn bucket(&self, bend_sum_deg: f32) -> FingerCurl {
        if bend_sum_deg < self.half_curl_deg {
            FingerCurl::NoCurl
        } else if bend_sum_deg < self.full_curl_deg {
            FingerCurl::HalfCurl
        } else {
            FingerCurl::FullCurl
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FeatureExtractor {
    thresholds: CurlThresholds,
}

impl FeatureExtractor {
    pub fn new(thresholds: CurlThresholds) -> Self {
        Self { thresholds }
    }

    pub fn extract(&self, hand: &Hand) -> HandFeatures {
        HandFeatures::new(Finger::ALL.map(|finger| {
            let chain = hand.chain(finger);
            FingerFeatures {
                curl: self.thresholds.bucket(bend_sum_deg(&chain)),
                direction: classify_direction(chain[1], chain[4]),
            }
        }))
    }
}

/// Total bend at the three knuckles of a wrist-to-tip chain. Straight chain is 0.
fn bend_sum_deg(chain: &[LandmarkPoint; 5]) -> f32 {
    chain
        .windows(3)
        .map(|w| bend_deg(sub(w[1], w[0]), sub(w[2], w[1])))
        .sum()
}

fn bend_deg(incoming: [f32; 3], outgoing: [f32; 3]) -> f32 {
    if length(incoming) < MIN_SEGMENT_LENGTH || length(outgoing) < MIN_SEGMENT_LENGTH {
        return 0.0;
    }
    dot(normalize(incoming), normalize(outgoing))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

fn classify_direction(base: LandmarkPoint, tip: LandmarkPoint) -> FingerDirection {
    let dx = tip[0] - base[0];
    // Image y grows downward; flip so positive means toward the top of the frame.
    let dy = base[1] - tip[1];
    if (dx * dx + dy * dy).sqrt() < MIN_SEGMENT_LENGTH {
        return FingerDirection::VerticalUp;
    }

    let degrees = dy.atan2(dx).to_degrees();
    let octant = (degrees / 45.0).round().rem_euclid(8.0) as usize;
    FingerDirection::OCTANTS[octant % 8]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len < MIN_SEGMENT_LENGTH {
        [0.0, 0.0, 0.0]
    } else {
        [v[0] / len, v[1] / len, v[2] / len]
    }
}
