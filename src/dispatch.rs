use std::{collections::HashMap, fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::gesture::catalog;

pub const DEFAULT_SCROLL_STEP: f64 = 40.0;

/// What a bound label does once it wins a cycle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Action {
    /// Level-triggered: advances the page every cycle the label holds.
    Scroll,
    /// One-shot: fires on the rising edge only.
    Navigate(String),
    /// One-shot: ends the session on the rising edge only.
    Logout,
}

impl Action {
    pub fn is_one_shot(&self) -> bool {
        !matches!(self, Action::Scroll)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action `{0}` (expected `scroll`, `logout` or `navigate:<route>`)")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "scroll" => Ok(Action::Scroll),
            "logout" => Ok(Action::Logout),
            other => match other.strip_prefix("navigate:") {
                Some(route) if !route.trim().is_empty() => {
                    Ok(Action::Navigate(route.trim().to_string()))
                }
                _ => Err(ParseActionError(raw.to_string())),
            },
        }
    }
}

impl TryFrom<String> for Action {
    type Error = ParseActionError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Scroll => f.write_str("scroll"),
            Action::Navigate(route) => write!(f, "navigate:{route}"),
            Action::Logout => f.write_str("logout"),
        }
    }
}

/// Label-to-action table. Labels without a binding only update the icon.
/// The `home!` -> `/` and `yoo!` -> logout bindings are additions; drop them
/// from the table to keep those two gestures display-only.
pub fn default_bindings() -> HashMap<String, Action> {
    HashMap::from([
        (catalog::SCROLL.to_string(), Action::Scroll),
        (catalog::PLAN.to_string(), Action::Navigate("/dashboard".into())),
        (catalog::PRICE.to_string(), Action::Navigate("/plans".into())),
        (catalog::HOME.to_string(), Action::Navigate("/".into())),
        (catalog::YOO.to_string(), Action::Logout),
    ])
}

/// Snapshot of the host's scrollable area, read before dispatching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ViewportMetrics {
    pub fn remaining(&self) -> f64 {
        self.content_height - (self.scroll_y + self.viewport_height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    ScrollBy { delta_y: f64 },
    Navigate { route: String },
    Logout,
}

/// Everything one cycle asks the host to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispatchOutput {
    pub icon: Option<String>,
    pub effects: Vec<Effect>,
}

/// Turns the winning label of each cycle into host effects.
///
/// Remembers the label it last acted on so one-shot actions fire once per
/// hold. A cycle with no winner clears that memory.
#[derive(Clone, Debug)]
pub struct ActionDispatcher {
    bindings: HashMap<String, Action>,
    scroll_step: f64,
    last_label: Option<String>,
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(default_bindings(), DEFAULT_SCROLL_STEP)
    }
}

impl ActionDispatcher {
    pub fn new(bindings: HashMap<String, Action>, scroll_step: f64) -> Self {
        Self {
            bindings,
            scroll_step: scroll_step.max(0.0),
            last_label: None,
        }
    }

    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    pub fn binding(&self, label: &str) -> Option<&Action> {
        self.bindings.get(label)
    }

    pub fn reset(&mut self) {
        self.last_label = None;
    }

    pub fn dispatch(
        &mut self,
        label: Option<&str>,
        viewport: Option<ViewportMetrics>,
    ) -> DispatchOutput {
        let Some(label) = label else {
            self.last_label = None;
            return DispatchOutput::default();
        };

        let rising_edge = self.last_label.as_deref() != Some(label);
        let mut effects = Vec::new();

        match self.bindings.get(label) {
            Some(Action::Scroll) => {
                if let Some(delta_y) = viewport.and_then(|v| self.clamped_step(v)) {
                    log::debug!("scrolling by {delta_y:.0}px");
                    effects.push(Effect::ScrollBy { delta_y });
                }
            }
            Some(Action::Navigate(route)) if rising_edge => {
                log::info!("gesture {label} -> navigate {route}");
                effects.push(Effect::Navigate {
                    route: route.clone(),
                });
            }
            Some(Action::Logout) if rising_edge => {
                log::info!("gesture {label} -> logout");
                effects.push(Effect::Logout);
            }
            _ => {}
        }

        if rising_edge {
            self.last_label = Some(label.to_string());
        }

        DispatchOutput {
            icon: Some(label.to_string()),
            effects,
        }
    }

    fn clamped_step(&self, viewport: ViewportMetrics) -> Option<f64> {
        let delta = self.scroll_step.min(viewport.remaining());
        (delta > 0.0).then_some(delta)
    }
}
