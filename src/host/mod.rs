//! Boundary between dispatcher output and the host environment.
//!
//! The core never touches navigation, scrolling, icons or the session
//! directly; it returns a [`DispatchOutput`] and [`Host::apply`] carries it out.
//! Every collaborator is optional and every failure stops here.

mod console;
mod session;

pub use console::{LogIconDisplay, LogNavigator, SimulatedPage};
pub use session::HttpSession;

use crossbeam_channel::Receiver;

use crate::dispatch::{DispatchOutput, Effect, ViewportMetrics};

pub trait Navigator: Send {
    fn navigate(&mut self, route: &str) -> anyhow::Result<()>;
}

pub trait Viewport: Send {
    fn metrics(&self) -> Option<ViewportMetrics>;
    fn scroll_by(&mut self, delta_y: f64) -> anyhow::Result<()>;
}

pub trait IconDisplay: Send {
    fn set_icon(&mut self, label: Option<&str>) -> anyhow::Result<()>;
}

pub trait Session: Send {
    /// Must return immediately; completion and failure are the session's
    /// own business.
    fn logout(&mut self);
}

#[derive(Default)]
pub struct Host {
    navigator: Option<Box<dyn Navigator>>,
    viewport: Option<Box<dyn Viewport>>,
    display: Option<Box<dyn IconDisplay>>,
    session: Option<Box<dyn Session>>,
    pending_routes: Option<Receiver<String>>,
    shown_icon: Option<String>,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Some(Box::new(viewport));
        self
    }

    pub fn with_display(mut self, display: impl IconDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn with_session(mut self, session: impl Session + 'static) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    /// Routes requested from outside the dispatcher, such as the redirect
    /// after a completed logout. Followed at the start of the next `apply`.
    pub fn with_pending_routes(mut self, routes: Receiver<String>) -> Self {
        self.pending_routes = Some(routes);
        self
    }

    pub fn viewport_metrics(&self) -> Option<ViewportMetrics> {
        self.viewport.as_ref().and_then(|v| v.metrics())
    }

    pub fn shown_icon(&self) -> Option<&str> {
        self.shown_icon.as_deref()
    }

    pub fn apply(&mut self, output: &DispatchOutput) {
        self.follow_pending_routes();
        self.update_icon(output.icon.as_deref());

        for effect in &output.effects {
            match effect {
                Effect::ScrollBy { delta_y } => match self.viewport.as_mut() {
                    Some(viewport) => {
                        if let Err(err) = viewport.scroll_by(*delta_y) {
                            log::error!("scroll by {delta_y} failed: {err:?}");
                        }
                    }
                    None => log::debug!("no viewport, dropping scroll"),
                },
                Effect::Navigate { route } => self.navigate(route),
                Effect::Logout => match self.session.as_mut() {
                    Some(session) => session.logout(),
                    None => log::debug!("no session, dropping logout"),
                },
            }
        }
    }

    fn follow_pending_routes(&mut self) {
        let Some(routes) = &self.pending_routes else {
            return;
        };
        let pending: Vec<String> = routes.try_iter().collect();
        for route in pending {
            self.navigate(&route);
        }
    }

    fn navigate(&mut self, route: &str) {
        match self.navigator.as_mut() {
            Some(navigator) => {
                if let Err(err) = navigator.navigate(route) {
                    log::error!("navigation to {route} failed: {err:?}");
                }
            }
            None => log::debug!("no navigator, dropping navigation to {route}"),
        }
    }

    fn update_icon(&mut self, icon: Option<&str>) {
        if self.shown_icon.as_deref() == icon {
            return;
        }
        let Some(display) = self.display.as_mut() else {
            self.shown_icon = icon.map(str::to_string);
            return;
        };
        match display.set_icon(icon) {
            Ok(()) => self.shown_icon = icon.map(str::to_string),
            Err(err) => log::error!("failed to update gesture icon: {err:?}"),
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;

    use super::*;

    /// Collaborators that write what they were asked to do into a shared log.
    #[derive(Clone, Default)]
    pub struct Recorder {
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Navigator for Recorder {
        fn navigate(&mut self, route: &str) -> anyhow::Result<()> {
            self.push(format!("navigate {route}"));
            Ok(())
        }
    }

    impl IconDisplay for Recorder {
        fn set_icon(&mut self, label: Option<&str>) -> anyhow::Result<()> {
            self.push(format!("icon {}", label.unwrap_or("-")));
            Ok(())
        }
    }

    impl Session for Recorder {
        fn logout(&mut self) {
            self.push("logout".into());
        }
    }

    pub struct Broken;

    impl Navigator for Broken {
        fn navigate(&mut self, _route: &str) -> anyhow::Result<()> {
            Err(anyhow!("router unavailable"))
        }
    }

    impl Viewport for Broken {
        fn metrics(&self) -> Option<ViewportMetrics> {
            Some(ViewportMetrics {
                scroll_y: 0.0,
                viewport_height: 100.0,
                content_height: 1000.0,
            })
        }

        fn scroll_by(&mut self, _delta_y: f64) -> anyhow::Result<()> {
            Err(anyhow!("document detached"))
        }
    }

    impl IconDisplay for Broken {
        fn set_icon(&mut self, _label: Option<&str>) -> anyhow::Result<()> {
            Err(anyhow!("no display surface"))
        }
    }
}
