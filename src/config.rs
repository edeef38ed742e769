use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, ensure};
use serde::Deserialize;

use crate::{
    dispatch::{self, Action, ActionDispatcher},
    gesture::{
        CurlThresholds, DEFAULT_MIN_CONFIDENCE, DescriptorRegistry, FeatureExtractor,
        GestureEstimator, catalog,
    },
};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_LOGOUT_REDIRECT: &str = "/login";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    pub min_confidence: f32,
    pub curl: CurlThresholds,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            curl: CurlThresholds::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    pub scroll_step: f64,
    pub bindings: HashMap<String, Action>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            scroll_step: dispatch::DEFAULT_SCROLL_STEP,
            bindings: dispatch::default_bindings(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub poll: PollSettings,
    pub estimator: EstimatorSettings,
    pub dispatch: DispatchSettings,
    /// Gesture table; the built-in catalog is used when unset.
    pub descriptors: Option<PathBuf>,
    /// Endpoint for the logout gesture; logout is a no-op when unset.
    pub logout_url: Option<String>,
    /// Route shown after a successful logout; defaults to `/login`.
    pub logout_redirect: Option<String>,
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(raw).context("invalid settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads `path` when given, then applies `GESTURE_*` environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings {}", path.display()))?;
                Self::from_toml_str(&raw)
                    .with_context(|| format!("failed to parse settings {}", path.display()))?
            }
            None => Self::default(),
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn logout_redirect(&self) -> &str {
        self.logout_redirect
            .as_deref()
            .unwrap_or(DEFAULT_LOGOUT_REDIRECT)
    }

    /// Rejects values that would silently disable estimation or scrolling.
    pub fn validate(&self) -> anyhow::Result<()> {
        let floor = self.estimator.min_confidence;
        ensure!(
            floor.is_finite(),
            "estimator.min_confidence must be a finite number, got {floor}"
        );

        let curl = self.estimator.curl;
        ensure!(
            curl.half_curl_deg.is_finite() && curl.full_curl_deg.is_finite(),
            "estimator.curl thresholds must be finite, got {} and {}",
            curl.half_curl_deg,
            curl.full_curl_deg
        );
        ensure!(
            0.0 <= curl.half_curl_deg && curl.half_curl_deg < curl.full_curl_deg,
            "estimator.curl needs 0 <= half_curl_deg < full_curl_deg, got {} and {}",
            curl.half_curl_deg,
            curl.full_curl_deg
        );

        let step = self.dispatch.scroll_step;
        ensure!(
            step.is_finite() && step >= 0.0,
            "dispatch.scroll_step must be a non-negative number, got {step}"
        );
        Ok(())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GESTURE_POLL_INTERVAL_MS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.poll.interval_ms = parsed,
                Err(_) => log::warn!("ignoring GESTURE_POLL_INTERVAL_MS={v}: not an integer"),
            }
        }
        if let Some(v) = lookup("GESTURE_MIN_CONFIDENCE") {
            match v.parse::<f32>() {
                Ok(parsed) if parsed.is_finite() => self.estimator.min_confidence = parsed,
                _ => log::warn!("ignoring GESTURE_MIN_CONFIDENCE={v}: not a finite number"),
            }
        }
        if let Some(v) = lookup("GESTURE_SCROLL_STEP") {
            match v.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => self.dispatch.scroll_step = parsed,
                _ => log::warn!("ignoring GESTURE_SCROLL_STEP={v}: not a finite number"),
            }
        }
        if let Some(v) = lookup("GESTURE_LOGOUT_URL") {
            self.logout_url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Some(v) = lookup("GESTURE_DESCRIPTORS") {
            self.descriptors = Some(PathBuf::from(v));
        }
    }

    pub fn registry(&self) -> anyhow::Result<DescriptorRegistry> {
        match &self.descriptors {
            Some(path) => DescriptorRegistry::load(path),
            None => Ok(catalog::builtin_registry()?),
        }
    }

    pub fn estimator(&self) -> anyhow::Result<GestureEstimator> {
        let registry = self.registry()?;
        log::info!(
            "loaded {} gestures: {}",
            registry.len(),
            registry.names().join(", ")
        );
        Ok(
            GestureEstimator::new(registry, self.estimator.min_confidence)
                .with_extractor(FeatureExtractor::new(self.estimator.curl)),
        )
    }

    pub fn dispatcher(&self) -> ActionDispatcher {
        for (label, action) in &self.dispatch.bindings {
            let trigger = if action.is_one_shot() { "once" } else { "held" };
            log::debug!("binding {label} -> {action} ({trigger})");
        }
        ActionDispatcher::new(self.dispatch.bindings.clone(), self.dispatch.scroll_step)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let settings = Settings::default();
        assert_eq!(settings.poll.interval(), Duration::from_millis(100));
        assert_eq!(settings.estimator.min_confidence, 0.6);
        assert_eq!(settings.dispatch.scroll_step, 40.0);
        assert_eq!(
            settings.dispatch.bindings.get("plan!"),
            Some(&Action::Navigate("/dashboard".into()))
        );
        assert!(settings.logout_url.is_none());
        assert_eq!(settings.logout_redirect(), "/login");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            logout_url = "http://localhost:8090/api/v1/users/logout"

            [poll]
            interval_ms = 50

            [estimator.curl]
            full_curl_deg = 170.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.poll.interval_ms, 50);
        assert_eq!(settings.estimator.min_confidence, 0.6);
        assert_eq!(settings.estimator.curl.half_curl_deg, 60.0);
        assert_eq!(settings.estimator.curl.full_curl_deg, 170.0);
        assert_eq!(settings.dispatch.bindings.len(), 5);
        assert!(settings.logout_url.is_some());
        assert_eq!(settings.logout_redirect(), "/login");

        let custom = Settings::from_toml_str(r#"logout_redirect = "/goodbye""#).unwrap();
        assert_eq!(custom.logout_redirect(), "/goodbye");
    }

    #[test]
    fn bindings_table_replaces_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [dispatch.bindings]
            "scroll" = "scroll"
            "victory" = "navigate:/celebrate"
            "#,
        )
        .unwrap();

        let dispatcher = settings.dispatcher();
        assert_eq!(
            dispatcher.binding("victory"),
            Some(&Action::Navigate("/celebrate".into()))
        );
        assert!(dispatcher.binding("plan!").is_none());
    }

    #[test]
    fn rejects_unknown_action() {
        let err = Settings::from_toml_str(
            r#"
            [dispatch.bindings]
            "scroll" = "teleport"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown action"));
    }

    #[test]
    fn env_overrides_win() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("GESTURE_POLL_INTERVAL_MS", "250"),
            ("GESTURE_MIN_CONFIDENCE", "0.8"),
            ("GESTURE_SCROLL_STEP", "not-a-number"),
            ("GESTURE_LOGOUT_URL", "http://example.test/logout"),
        ]);
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.poll.interval_ms, 250);
        assert_eq!(settings.estimator.min_confidence, 0.8);
        assert_eq!(settings.dispatch.scroll_step, 40.0);
        assert_eq!(
            settings.logout_url.as_deref(),
            Some("http://example.test/logout")
        );
    }

    #[test]
    fn non_finite_env_values_are_ignored() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("GESTURE_MIN_CONFIDENCE", "NaN"),
            ("GESTURE_SCROLL_STEP", "inf"),
        ]);
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.estimator.min_confidence, 0.6);
        assert_eq!(settings.dispatch.scroll_step, 40.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_nan_floor_in_file() {
        let err = Settings::from_toml_str(
            r#"
            [estimator]
            min_confidence = nan
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("min_confidence"), "{err:#}");
    }

    #[test]
    fn rejects_inverted_curl_thresholds() {
        let err = Settings::from_toml_str(
            r#"
            [estimator.curl]
            half_curl_deg = 200.0
            full_curl_deg = 10.0
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("half_curl_deg < full_curl_deg"), "{err:#}");

        let mut settings = Settings::default();
        settings.estimator.curl.full_curl_deg = f32::INFINITY;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_rejects_negative_scroll_step() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dispatch]\nscroll_step = -5.0").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("scroll_step"), "{err:#}");
    }

    #[test]
    fn loads_descriptor_table_from_disk() {
        let mut table = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            table,
            r#"
            [[gesture]]
            name = "point"
            [gesture.fingers.index]
            curl = {{ no_curl = 1.0 }}
            "#
        )
        .unwrap();

        let settings = Settings {
            descriptors: Some(table.path().to_path_buf()),
            ..Settings::default()
        };
        let estimator = settings.estimator().unwrap();
        assert_eq!(estimator.registry().names(), vec!["point"]);
    }

    #[test]
    fn missing_descriptor_table_is_an_error() {
        let settings = Settings {
            descriptors: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Settings::default()
        };
        let err = settings.registry().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read gesture table"));
    }

    #[test]
    fn builtin_catalog_when_unset() {
        let estimator = Settings::default().estimator().unwrap();
        assert_eq!(estimator.registry().len(), 7);
        assert_eq!(estimator.min_confidence(), 0.6);
    }
}
