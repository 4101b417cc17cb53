//! Render progress published to observers on other threads.
//!
//! The driver stores after every bounce; observers load at any rate. Nothing
//! an observer does can influence the render.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

/// Where the driver is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RenderPhase {
    Idle = 0,
    BuildingAccel = 1,
    GeneratingPrimaryRays = 2,
    Bouncing = 3,
    Accumulating = 4,
    Done = 5,
}

impl RenderPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RenderPhase::BuildingAccel,
            2 => RenderPhase::GeneratingPrimaryRays,
            3 => RenderPhase::Bouncing,
            4 => RenderPhase::Accumulating,
            5 => RenderPhase::Done,
            _ => RenderPhase::Idle,
        }
    }
}

/// Point-in-time copy of [`RenderProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Samples fully accumulated
    pub completed_samples: u32,
    /// Index of the sample in flight (or the last one, once done)
    pub sample: u32,
    /// Bounces finished in the sample in flight
    pub depth: u32,
    pub phase: RenderPhase,
}

#[derive(Debug)]
struct ProgressInner {
    completed_samples: AtomicU32,
    sample: AtomicU32,
    depth: AtomicU32,
    phase: AtomicU8,
}

/// Shared, lock-free progress counters.
///
/// Cloning yields another handle to the same counters.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    inner: Arc<ProgressInner>,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ProgressInner {
                completed_samples: AtomicU32::new(0),
                sample: AtomicU32::new(0),
                depth: AtomicU32::new(0),
                phase: AtomicU8::new(RenderPhase::Idle as u8),
            }),
        }
    }

    /// Read the current values.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed_samples: self.inner.completed_samples.load(Ordering::Acquire),
            sample: self.inner.sample.load(Ordering::Acquire),
            depth: self.inner.depth.load(Ordering::Acquire),
            phase: RenderPhase::from_u8(self.inner.phase.load(Ordering::Acquire)),
        }
    }

    pub fn phase(&self) -> RenderPhase {
        RenderPhase::from_u8(self.inner.phase.load(Ordering::Acquire))
    }

    pub(crate) fn set_phase(&self, phase: RenderPhase) {
        self.inner.phase.store(phase as u8, Ordering::Release);
    }

    pub(crate) fn begin_sample(&self, sample: u32) {
        self.inner.sample.store(sample, Ordering::Release);
        self.inner.depth.store(0, Ordering::Release);
        self.set_phase(RenderPhase::GeneratingPrimaryRays);
    }

    pub(crate) fn finish_bounce(&self, depth: u32) {
        self.inner.depth.store(depth, Ordering::Release);
    }

    pub(crate) fn finish_sample(&self, completed: u32) {
        self.inner.completed_samples.store(completed, Ordering::Release);
    }

    pub(crate) fn reset(&self) {
        self.inner.completed_samples.store(0, Ordering::Release);
        self.inner.sample.store(0, Ordering::Release);
        self.inner.depth.store(0, Ordering::Release);
        self.set_phase(RenderPhase::Idle);
    }
}

impl Default for RenderProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Request to stop a render at the next sample boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear a previous cancellation so the renderer can run again.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tracks_updates() {
        let progress = RenderProgress::new();
        assert_eq!(progress.phase(), RenderPhase::Idle);

        progress.begin_sample(3);
        progress.set_phase(RenderPhase::Bouncing);
        progress.finish_bounce(2);
        let observer = progress.clone();
        let snapshot = observer.snapshot();
        assert_eq!(snapshot.sample, 3);
        assert_eq!(snapshot.depth, 2);
        assert_eq!(snapshot.phase, RenderPhase::Bouncing);

        progress.reset();
        assert_eq!(observer.snapshot().sample, 0);
        assert_eq!(observer.phase(), RenderPhase::Idle);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!other.is_cancelled());
    }
}
