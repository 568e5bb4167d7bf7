//! The output side: whatever actually makes sound out of a playback plan.
//!
//! Scheduling only decides offsets, durations and envelopes. A [`Playout`]
//! realizes them. Any backend implementing the trait can be driven by a
//! [`TrackPlayer`](crate::player::TrackPlayer); [`buffer`] provides one that
//! renders an in-memory source on the audio thread.

#[cfg(feature = "rtrb")]
pub mod buffer;
pub mod curve;
#[cfg(feature = "rtrb")]
pub mod message;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::timeline::FadeShape;

/// Capability set of an audio output backend for one track.
///
/// Times passed to `play` and the fade methods are absolute instants on
/// the backend's own clock (the same clock the `now` given to the scheduler
/// was read from). `stop` takes seconds from the backend's current time.
pub trait Playout {
    /// Prepare a fresh source bound to the track's content. The returned
    /// handle resolves when that source stops, naturally or by `stop`.
    fn set_up_source(&mut self) -> Completion;

    /// Start the source at instant `at`, from `offset` seconds into the
    /// content, for `duration` seconds.
    fn play(&mut self, at: f64, offset: f64, duration: f64);

    /// Halt the current source `when` seconds from now (0 = immediately).
    /// Does nothing if nothing is playing.
    fn stop(&mut self, when: f64);

    fn set_gain_level(&mut self, level: f32);

    fn set_master_gain_level(&mut self, level: f32);

    fn apply_fade_in(&mut self, start: f64, length: f64, shape: FadeShape);

    fn apply_fade_out(&mut self, start: f64, length: f64, shape: FadeShape);

    fn is_playing(&self) -> bool;

    /// Length of the underlying source content in seconds
    fn duration(&self) -> f64;
}

/// Resolves once a scheduled source has stopped.
///
/// Cloning shares the same state. Completing is an atomic swap plus a
/// non-blocking `try_send` on a one-slot channel, so it is safe to do from
/// the audio thread. Waiters block on that channel.
#[derive(Debug, Clone)]
pub struct Completion {
    inner: Arc<CompletionInner>,
}

#[derive(Debug)]
struct CompletionInner {
    done: AtomicBool,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Completion {
    fn with_state(done: bool) -> Self {
        let (tx, rx) = bounded(1);
        if done {
            let _ = tx.try_send(());
        }
        Self {
            inner: Arc::new(CompletionInner {
                done: AtomicBool::new(done),
                tx,
                rx,
            }),
        }
    }

    /// A handle that has not resolved yet
    pub fn pending() -> Self {
        Self::with_state(false)
    }

    /// An already resolved handle, used for tracks that have nothing to play
    pub fn resolved() -> Self {
        Self::with_state(true)
    }

    /// Resolve the handle. Later calls do nothing.
    pub fn complete(&self) {
        if !self.inner.done.swap(true, Ordering::AcqRel) {
            let _ = self.inner.tx.try_send(());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.inner.done.load(Ordering::Acquire)
    }

    /// Block the calling (non-audio) thread until resolved.
    pub fn wait(&self) {
        if self.is_complete() {
            return;
        }
        // The channel owns both ends, so it never disconnects
        if self.inner.rx.recv().is_ok() {
            self.pass_on();
        }
    }

    /// Block the calling (non-audio) thread until resolved or `timeout`
    /// passes. Returns whether the handle resolved.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_complete() {
            return true;
        }
        match self.inner.rx.recv_timeout(timeout) {
            Ok(()) => {
                self.pass_on();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.is_complete()
            }
        }
    }

    /// Put the signal back for the next waiter on another clone
    fn pass_on(&self) {
        let _ = self.inner.tx.try_send(());
    }
}
