use std::{env, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, unbounded};
use gesture_pilot::{
    config::Settings,
    host::{Host, HttpSession, LogIconDisplay, LogNavigator, SimulatedPage},
    pipeline::{CancellationToken, IdleFrames, PollLoop, replay::ReplaySource},
};

const DEMO_TRACE: &str = include_str!("../demos/demo_trace.json");

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args_os().skip(1).map(PathBuf::from);
    let trace_path = args.next();
    let settings_path = args.next();

    let settings = Settings::load(settings_path.as_deref())?;
    let source = match &trace_path {
        Some(path) => ReplaySource::load(path)?,
        None => ReplaySource::from_json_str(DEMO_TRACE).context("built-in demo trace")?,
    };
    let cycles = source.remaining();

    let mut host = Host::new()
        .with_navigator(LogNavigator::default())
        .with_viewport(SimulatedPage::new(800.0, 2400.0))
        .with_display(LogIconDisplay::with_default_icons());
    if let Some(url) = &settings.logout_url {
        let (route_tx, route_rx) = unbounded();
        let session =
            HttpSession::new(url.as_str())?.with_redirect(settings.logout_redirect(), route_tx);
        host = host.with_session(session).with_pending_routes(route_rx);
    }

    let (report_tx, report_rx) = bounded(cycles.max(1));
    let interval = settings.poll.interval();
    let handle = PollLoop::new(
        IdleFrames,
        source,
        settings.estimator()?,
        settings.dispatcher(),
        host,
        CancellationToken::new(),
    )
    .with_reports(report_tx)
    .spawn(interval)?;

    let deadline = report_deadline(interval);
    for cycle in 0..cycles {
        match report_rx.recv_timeout(deadline) {
            Ok(report) => println!("{cycle:>3}  {}", report.summary()),
            Err(_) => {
                log::error!("poll loop stopped after {cycle} of {cycles} cycles");
                break;
            }
        }
    }

    handle.stop();
    Ok(())
}

/// How long to wait for one cycle report before giving up on the loop.
fn report_deadline(interval: Duration) -> Duration {
    interval
        .saturating_mul(4)
        .saturating_add(Duration::from_secs(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_allows_a_few_missed_ticks() {
        assert_eq!(
            report_deadline(Duration::from_millis(100)),
            Duration::from_millis(2400)
        );
    }

    #[test]
    fn deadline_saturates_for_huge_intervals() {
        let huge = Duration::from_millis(u64::MAX);
        assert_eq!(report_deadline(huge), Duration::MAX);
    }
}
