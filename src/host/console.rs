use std::{collections::HashMap, path::PathBuf};

use super::{IconDisplay, Navigator, Viewport};
use crate::dispatch::ViewportMetrics;

/// Navigator that only logs and remembers where it was sent.
#[derive(Debug, Default)]
pub struct LogNavigator {
    history: Vec<String>,
}

impl LogNavigator {
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl Navigator for LogNavigator {
    fn navigate(&mut self, route: &str) -> anyhow::Result<()> {
        log::info!("navigate -> {route}");
        self.history.push(route.to_string());
        Ok(())
    }
}

/// In-memory scrollable page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulatedPage {
    metrics: ViewportMetrics,
}

impl SimulatedPage {
    pub fn new(viewport_height: f64, content_height: f64) -> Self {
        Self {
            metrics: ViewportMetrics {
                scroll_y: 0.0,
                viewport_height,
                content_height,
            },
        }
    }

    pub fn scroll_y(&self) -> f64 {
        self.metrics.scroll_y
    }
}

impl Viewport for SimulatedPage {
    fn metrics(&self) -> Option<ViewportMetrics> {
        Some(self.metrics)
    }

    fn scroll_by(&mut self, delta_y: f64) -> anyhow::Result<()> {
        let max_scroll = (self.metrics.content_height - self.metrics.viewport_height).max(0.0);
        self.metrics.scroll_y = (self.metrics.scroll_y + delta_y).clamp(0.0, max_scroll);
        log::info!(
            "page scrolled to {:.0}/{:.0}",
            self.metrics.scroll_y,
            max_scroll
        );
        Ok(())
    }
}

/// Logs the image bound to each label, or the bare label when none is bound.
#[derive(Debug, Default)]
pub struct LogIconDisplay {
    icons: HashMap<String, PathBuf>,
}

impl LogIconDisplay {
    pub fn new(icons: HashMap<String, PathBuf>) -> Self {
        Self { icons }
    }

    pub fn with_default_icons() -> Self {
        Self::new(HashMap::from([
            ("thumbs_up".to_string(), PathBuf::from("assets/thumbs_up.png")),
            ("victory".to_string(), PathBuf::from("assets/victory.png")),
        ]))
    }

    pub fn icon_for(&self, label: &str) -> Option<&PathBuf> {
        self.icons.get(label)
    }
}

impl IconDisplay for LogIconDisplay {
    fn set_icon(&mut self, label: Option<&str>) -> anyhow::Result<()> {
        match label {
            Some(label) => match self.icon_for(label) {
                Some(path) => log::info!("icon -> {} ({label})", path.display()),
                None => log::info!("icon -> {label}"),
            },
            None => log::info!("icon cleared"),
        }
        Ok(())
    }
}
