use std::{collections::BTreeMap, collections::HashSet, fs, path::Path, sync::Arc};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{Finger, FingerCurl, FingerDirection};

#[derive(Debug, Error, PartialEq)]
pub enum DescriptorError {
    #[error("gesture descriptor has an empty name")]
    EmptyName,
    #[error("gesture `{0}` is registered more than once")]
    DuplicateName(String),
    #[error("gesture `{name}`: {finger} weight {weight} is outside [0, 1]")]
    WeightOutOfRange {
        name: String,
        finger: &'static str,
        weight: f32,
    },
    #[error("gesture `{name}`: {finger} importance must be positive, got {importance}")]
    InvalidImportance {
        name: String,
        finger: &'static str,
        importance: f32,
    },
    #[error("gesture `{name}`: unknown {kind} `{key}`")]
    UnknownKey {
        name: String,
        kind: &'static str,
        key: String,
    },
}

/// Scoring rule for one finger: how much each observed curl and direction
/// counts toward the gesture. Unlisted values score zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FingerRule {
    pub curl: BTreeMap<FingerCurl, f32>,
    pub direction: BTreeMap<FingerDirection, f32>,
    pub importance: f32,
}

impl Default for FingerRule {
    fn default() -> Self {
        Self {
            curl: BTreeMap::new(),
            direction: BTreeMap::new(),
            importance: 1.0,
        }
    }
}

impl FingerRule {
    pub fn curl_weight(&self, curl: FingerCurl) -> f32 {
        self.curl.get(&curl).copied().unwrap_or(0.0)
    }

    pub fn direction_weight(&self, direction: FingerDirection) -> f32 {
        self.direction.get(&direction).copied().unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureDescriptor {
    name: String,
    fingers: BTreeMap<Finger, FingerRule>,
}

impl GestureDescriptor {
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder {
            descriptor: GestureDescriptor {
                name: name.into(),
                fingers: BTreeMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule for `finger`; fingers the descriptor never mentions score zero
    /// with unit importance.
    pub fn rule(&self, finger: Finger) -> FingerRule {
        self.fingers.get(&finger).cloned().unwrap_or_default()
    }

    pub(crate) fn rule_ref(&self, finger: Finger) -> Option<&FingerRule> {
        self.fingers.get(&finger)
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        for (finger, rule) in &self.fingers {
            let weights = rule.curl.values().chain(rule.direction.values());
            for &weight in weights {
                if !(0.0..=1.0).contains(&weight) {
                    return Err(DescriptorError::WeightOutOfRange {
                        name: self.name.clone(),
                        finger: finger.label(),
                        weight,
                    });
                }
            }
            if !(rule.importance.is_finite() && rule.importance > 0.0) {
                return Err(DescriptorError::InvalidImportance {
                    name: self.name.clone(),
                    finger: finger.label(),
                    importance: rule.importance,
                });
            }
        }

        Ok(())
    }
}

/// Incremental construction in the style of "add curl, add direction".
pub struct DescriptorBuilder {
    descriptor: GestureDescriptor,
}

impl DescriptorBuilder {
    pub fn curl(mut self, finger: Finger, curl: FingerCurl, weight: f32) -> Self {
        self.entry(finger).curl.insert(curl, weight);
        self
    }

    pub fn direction(mut self, finger: Finger, direction: FingerDirection, weight: f32) -> Self {
        self.entry(finger).direction.insert(direction, weight);
        self
    }

    pub fn importance(mut self, finger: Finger, importance: f32) -> Self {
        self.entry(finger).importance = importance;
        self
    }

    pub fn build(self) -> GestureDescriptor {
        self.descriptor
    }

    fn entry(&mut self, finger: Finger) -> &mut FingerRule {
        self.descriptor.fingers.entry(finger).or_default()
    }
}

/// Immutable, ordered set of descriptors shared by every estimator clone.
/// Registration order is the tie-break order.
#[derive(Clone, Debug)]
pub struct DescriptorRegistry {
    descriptors: Arc<[GestureDescriptor]>,
}

impl DescriptorRegistry {
    pub fn new(descriptors: Vec<GestureDescriptor>) -> Result<Self, DescriptorError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            descriptor.validate()?;
            if !seen.insert(descriptor.name.as_str()) {
                return Err(DescriptorError::DuplicateName(descriptor.name.clone()));
            }
        }

        Ok(Self {
            descriptors: descriptors.into(),
        })
    }

    pub fn empty() -> Self {
        Self {
            descriptors: Arc::from(Vec::new()),
        }
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let table: DescriptorTable =
            toml::from_str(raw).context("invalid gesture descriptor table")?;
        let descriptors = table
            .gesture
            .into_iter()
            .map(GestureDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(descriptors)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read gesture table {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to load gesture table {}", path.display()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(GestureDescriptor::name).collect()
    }
}

#[derive(Deserialize)]
struct DescriptorTable {
    #[serde(default)]
    gesture: Vec<DescriptorEntry>,
}

#[derive(Deserialize)]
struct DescriptorEntry {
    name: String,
    #[serde(default)]
    fingers: BTreeMap<String, FingerEntry>,
}

#[derive(Deserialize)]
struct FingerEntry {
    #[serde(default)]
    curl: BTreeMap<String, f32>,
    #[serde(default)]
    direction: BTreeMap<String, f32>,
    #[serde(default = "unit_importance")]
    weight: f32,
}

fn unit_importance() -> f32 {
    1.0
}

impl TryFrom<DescriptorEntry> for GestureDescriptor {
    type Error = DescriptorError;

    fn try_from(entry: DescriptorEntry) -> Result<Self, Self::Error> {
        let unknown = |kind: &'static str, key: &str| DescriptorError::UnknownKey {
            name: entry.name.clone(),
            kind,
            key: key.to_string(),
        };

        let mut builder = GestureDescriptor::builder(entry.name.clone());
        for (finger_key, rule) in &entry.fingers {
            let finger =
                Finger::from_label(finger_key).ok_or_else(|| unknown("finger", finger_key))?;
            for (key, weight) in &rule.curl {
                let curl = FingerCurl::from_label(key).ok_or_else(|| unknown("curl", key))?;
                builder = builder.curl(finger, curl, *weight);
            }
            for (key, weight) in &rule.direction {
                let direction =
                    FingerDirection::from_label(key).ok_or_else(|| unknown("direction", key))?;
                builder = builder.direction(finger, direction, *weight);
            }
            builder = builder.importance(finger, rule.weight);
        }

        Ok(builder.build())
    }
}
