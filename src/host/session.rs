use std::{thread, time::Duration};

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use reqwest::{blocking::Client, header::CONTENT_TYPE};

use super::Session;

const LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Ends the session with a POST to the logout endpoint on a background thread.
/// On success the optional redirect route is handed back to the host.
#[derive(Clone, Debug)]
pub struct HttpSession {
    client: Client,
    logout_url: String,
    redirect: Option<(String, Sender<String>)>,
}

impl HttpSession {
    pub fn new(logout_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(LOGOUT_TIMEOUT)
            .build()
            .context("failed to build logout http client")?;

        Ok(Self {
            client,
            logout_url: logout_url.into(),
            redirect: None,
        })
    }

    /// Sends `route` on `route_tx` once a logout succeeds. Pair the receiver
    /// with [`super::Host::with_pending_routes`].
    pub fn with_redirect(mut self, route: impl Into<String>, route_tx: Sender<String>) -> Self {
        self.redirect = Some((route.into(), route_tx));
        self
    }

    pub fn logout_url(&self) -> &str {
        &self.logout_url
    }

    fn post_logout(client: &Client, url: &str) -> Result<()> {
        client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .with_context(|| format!("failed to reach {url}"))?
            .error_for_status()
            .with_context(|| format!("logout rejected by {url}"))?;
        Ok(())
    }
}

impl Session for HttpSession {
    fn logout(&mut self) {
        let client = self.client.clone();
        let url = self.logout_url.clone();
        let redirect = self.redirect.clone();
        let spawned = thread::Builder::new()
            .name("logout".into())
            .spawn(move || match Self::post_logout(&client, &url) {
                Ok(()) => {
                    log::info!("logged out via {url}");
                    if let Some((route, route_tx)) = redirect {
                        let _ = route_tx.send(route);
                    }
                }
                Err(err) => log::error!("logout failed: {err:?}"),
            });

        if let Err(err) = spawned {
            log::error!("failed to start logout request: {err:?}");
        }
    }
}
