use std::{thread, time::Duration};

use anyhow::{Context, Result};
use crossbeam_channel::{Sender, bounded, select, tick};

use super::{CancellationToken, FrameSource, LandmarkSource};
use crate::{
    dispatch::{ActionDispatcher, DispatchOutput, Effect},
    gesture::{GestureEstimator, select_winner},
    host::Host,
    types::{GestureCandidate, Hand, HandFeatures},
};

/// What one tick saw and did.
#[derive(Clone, Debug)]
pub struct CycleReport {
    pub hand: Option<Hand>,
    pub features: Option<HandFeatures>,
    pub candidates: Vec<GestureCandidate>,
    pub winner: Option<GestureCandidate>,
    pub output: DispatchOutput,
}

impl CycleReport {
    pub fn summary(&self) -> String {
        let gesture = match (&self.hand, &self.winner) {
            (None, _) => "no hand".to_string(),
            (Some(_), None) => "no gesture".to_string(),
            (Some(_), Some(winner)) => winner.display_text(),
        };
        let effects = self
            .output
            .effects
            .iter()
            .map(|effect| match effect {
                Effect::ScrollBy { delta_y } => format!("scroll {delta_y:.0}px"),
                Effect::Navigate { route } => format!("navigate {route}"),
                Effect::Logout => "logout".to_string(),
            })
            .collect::<Vec<_>>();

        if effects.is_empty() {
            gesture
        } else {
            format!("{gesture} -> {}", effects.join(", "))
        }
    }
}

/// Samples the landmark source on a fixed period and drives estimation,
/// selection and dispatch. One cycle runs at a time.
pub struct PollLoop<F, L> {
    frames: F,
    landmarks: L,
    estimator: GestureEstimator,
    dispatcher: ActionDispatcher,
    host: Host,
    cancel: CancellationToken,
    report_tx: Option<Sender<CycleReport>>,
}

impl<F: FrameSource, L: LandmarkSource> PollLoop<F, L> {
    pub fn new(
        frames: F,
        landmarks: L,
        estimator: GestureEstimator,
        dispatcher: ActionDispatcher,
        host: Host,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            frames,
            landmarks,
            estimator,
            dispatcher,
            host,
            cancel,
            report_tx: None,
        }
    }

    /// Every report is offered to `report_tx`; it is dropped if the channel is full.
    pub fn with_reports(mut self, report_tx: Sender<CycleReport>) -> Self {
        self.report_tx = Some(report_tx);
        self
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Runs one tick. Returns `None` when the loop was cancelled during the
    /// cycle; nothing reaches the host in that case.
    pub fn run_cycle(&mut self) -> Option<CycleReport> {
        let hand = match self.frames.next_frame() {
            Some(frame) => match self.landmarks.estimate_hand(&frame) {
                Ok(hand) => hand,
                Err(err) => {
                    log::warn!("hand estimation failed: {err:?}");
                    None
                }
            },
            None => {
                log::debug!("no frame available");
                None
            }
        };

        if self.cancel.is_cancelled() {
            log::debug!("poll loop cancelled mid-cycle, dropping result");
            return None;
        }

        let (features, candidates) = match &hand {
            Some(hand) => {
                let (features, candidates) = self.estimator.estimate_hand(hand);
                log::debug!("hand features: {}", features.summary());
                (Some(features), candidates)
            }
            None => (None, Vec::new()),
        };

        let winner = select_winner(&candidates).cloned();
        let viewport = self.host.viewport_metrics();
        let output = self
            .dispatcher
            .dispatch(winner.as_ref().map(|w| w.name.as_str()), viewport);

        if self.cancel.is_cancelled() {
            log::debug!("poll loop cancelled before apply, dropping effects");
            return None;
        }
        self.host.apply(&output);

        let report = CycleReport {
            hand,
            features,
            candidates,
            winner,
            output,
        };
        if let Some(report_tx) = &self.report_tx {
            let _ = report_tx.try_send(report.clone());
        }
        Some(report)
    }

    /// Moves the loop onto its own thread. The landmark source is loaded
    /// there first; ticks start once it is ready.
    pub fn spawn(mut self, interval: Duration) -> Result<PollHandle> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let cancel = self.cancel.clone();

        let handle = thread::Builder::new()
            .name("gesture-poll".into())
            .spawn(move || {
                if let Err(err) = self.landmarks.load() {
                    log::error!("failed to load hand landmark model: {err:?}");
                    return;
                }
                log::info!(
                    "hand landmark model ready, polling every {}ms",
                    interval.as_millis()
                );

                let ticker = tick(interval);
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            if self.cancel.is_cancelled() {
                                break;
                            }
                            self.run_cycle();
                        }
                        recv(shutdown_rx) -> _ => break,
                    }
                }
                log::info!("gesture poll loop stopped");
            })
            .context("failed to spawn gesture poll thread")?;

        Ok(PollHandle {
            cancel,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }
}

/// Owner of a running poll thread. Stopping (or dropping) cancels the loop
/// and waits for the current cycle to finish.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    shutdown_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        // Dropping the sender disconnects the channel and wakes the select.
        self.shutdown_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("gesture poll thread panicked");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
