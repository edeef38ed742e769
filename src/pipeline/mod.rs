mod poll;
pub mod replay;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crossbeam_channel::Receiver;

use crate::types::{Frame, Hand};

pub use poll::{CycleReport, PollHandle, PollLoop};

/// Upstream pose model. Runs on the poll thread; `estimate_hand` is the only
/// call in a cycle allowed to take real time.
pub trait LandmarkSource: Send + 'static {
    /// Called once on the poll thread before the first tick.
    fn load(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// First hand found in `frame`, if any.
    fn estimate_hand(&mut self, frame: &Frame) -> anyhow::Result<Option<Hand>>;
}

pub trait FrameSource: Send + 'static {
    /// Most recent frame, or `None` when the capture device is not ready.
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Hands out an empty frame every tick, for sources that ignore pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleFrames;

impl FrameSource for IdleFrames {
    fn next_frame(&mut self) -> Option<Frame> {
        Some(Frame::empty())
    }
}

/// Frames pushed by a capture thread; stale frames are skipped.
pub struct LatestFrame {
    frame_rx: Receiver<Frame>,
}

impl LatestFrame {
    pub fn new(frame_rx: Receiver<Frame>) -> Self {
        Self { frame_rx }
    }
}

impl FrameSource for LatestFrame {
    fn next_frame(&mut self) -> Option<Frame> {
        let mut frame = self.frame_rx.try_recv().ok()?;
        while let Ok(newer) = self.frame_rx.try_recv() {
            frame = newer;
        }
        Some(frame)
    }
}

/// Shared liveness flag. Once cancelled, no further effects are applied.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
