//! Landmark source that plays back a recorded trace.
//!
//! A trace is a JSON array with one entry per poll cycle: `null` for a cycle
//! without a hand, otherwise the 21 `[x, y, z]` landmarks of the hand.

use std::{collections::VecDeque, fs, path::Path};

use anyhow::{Context, Result};

use super::LandmarkSource;
use crate::types::{Frame, Hand, LandmarkPoint};

#[derive(Clone, Debug, Default)]
pub struct ReplaySource {
    entries: VecDeque<Option<Vec<LandmarkPoint>>>,
    cycle: usize,
}

impl ReplaySource {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: Vec<Option<Vec<LandmarkPoint>>> =
            serde_json::from_str(raw).context("invalid landmark trace")?;
        Ok(Self {
            entries: entries.into(),
            cycle: 0,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read trace {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn from_hands(hands: impl IntoIterator<Item = Option<Hand>>) -> Self {
        let entries = hands
            .into_iter()
            .map(|hand| hand.map(|h| h.points().to_vec()))
            .collect();
        Self { entries, cycle: 0 }
    }

    /// Cycles left before the trace runs dry.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn load(&mut self) -> Result<()> {
        log::info!("replaying {} recorded cycles", self.entries.len());
        Ok(())
    }

    fn estimate_hand(&mut self, _frame: &Frame) -> Result<Option<Hand>> {
        let cycle = self.cycle;
        self.cycle += 1;
        match self.entries.pop_front().flatten() {
            Some(points) => Hand::from_points(&points)
                .map(Some)
                .with_context(|| format!("bad landmarks in trace cycle {cycle}")),
            None => Ok(None),
        }
    }
}
