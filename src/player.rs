//! TrackPlayer - one track bound to its output collaborator
//!
//! The player owns the track model and a [`Playout`]. Scheduling reads a
//! snapshot of the track, so edits made between calls are only seen by the
//! next call. Callers that edit from another thread should wrap the player
//! in whatever single-writer scheme they already use; the player itself does
//! no locking.

use log::debug;

use crate::error::{ensure_finite, TrackError};
use crate::playout::{Completion, Playout};
use crate::schedule::{schedule_play, PlaybackPlan, PlaybackWindow, Schedule};
use crate::timeline::{FadeKind, Track};

pub struct TrackPlayer<P: Playout> {
    track: Track,
    playout: P,
}

impl<P: Playout> TrackPlayer<P> {
    pub fn new(track: Track, playout: P) -> Self {
        Self { track, playout }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Mutable access for edits (fades, trim, placement)
    pub fn track_mut(&mut self) -> &mut Track {
        &mut self.track
    }

    pub fn playout(&self) -> &P {
        &self.playout
    }

    pub fn playout_mut(&mut self) -> &mut P {
        &mut self.playout
    }

    pub fn into_parts(self) -> (Track, P) {
        (self.track, self.playout)
    }

    /// Store the track gain and update the live gain on the output
    pub fn set_gain_level(&mut self, level: f32) -> Result<(), TrackError> {
        self.track.set_gain(level)?;
        self.playout.set_gain_level(level);
        Ok(())
    }

    pub fn set_master_gain_level(&mut self, level: f32) -> Result<(), TrackError> {
        ensure_finite(f64::from(level), "master gain")?;
        self.playout.set_master_gain_level(level);
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playout.is_playing()
    }

    /// Compute the schedule for this track without touching the output
    pub fn plan(&self, now: f64, window: &PlaybackWindow, master_gain: f32) -> Schedule {
        schedule_play(&self.track.snapshot(), now, window, master_gain)
    }

    /// Schedule this track and hand the plan to the output.
    ///
    /// Returns a handle that resolves when playback stops. A track with
    /// nothing to play in the window gets an already resolved handle and the
    /// output is left untouched.
    pub fn schedule_play(
        &mut self,
        now: f64,
        window: &PlaybackWindow,
        master_gain: f32,
    ) -> Result<Completion, TrackError> {
        ensure_finite(now, "now")?;
        ensure_finite(f64::from(master_gain), "master gain")?;

        let completion = match self.plan(now, window, master_gain) {
            Schedule::Silent => {
                debug!("track {:?}: nothing to play", self.track.name());
                Completion::resolved()
            }
            Schedule::Play(plan) => self.realize(&plan),
        };
        Ok(completion)
    }

    /// Halt playback `when` seconds from now (0 = immediately)
    pub fn schedule_stop(&mut self, when: f64) {
        debug!("track {:?}: stop in {}s", self.track.name(), when);
        self.playout.stop(when);
    }

    fn realize(&mut self, plan: &PlaybackPlan) -> Completion {
        let completion = self.playout.set_up_source();

        for segment in &plan.envelopes {
            let start = segment.start_at(plan.now);
            match segment.kind {
                FadeKind::FadeIn => {
                    self.playout
                        .apply_fade_in(start, segment.length, segment.shape)
                }
                FadeKind::FadeOut => {
                    self.playout
                        .apply_fade_out(start, segment.length, segment.shape)
                }
            }
        }

        self.playout.set_gain_level(plan.gain);
        self.playout.set_master_gain_level(plan.master_gain);
        self.playout
            .play(plan.start_at(), plan.source_offset, plan.duration);

        completion
    }
}
