use crate::timeline::{FadeKind, FadeShape};

/// Outcome of scheduling one track against a playback window
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    /// The track does not overlap the window; nothing to play
    Silent,
    Play(PlaybackPlan),
}

impl Schedule {
    pub fn is_silent(&self) -> bool {
        matches!(self, Schedule::Silent)
    }

    pub fn plan(&self) -> Option<&PlaybackPlan> {
        match self {
            Schedule::Silent => None,
            Schedule::Play(plan) => Some(plan),
        }
    }

    pub fn into_plan(self) -> Option<PlaybackPlan> {
        match self {
            Schedule::Silent => None,
            Schedule::Play(plan) => Some(plan),
        }
    }
}

/// What a track should sound and when, relative to `now`
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackPlan {
    /// Reference instant all delays are measured from
    pub now: f64,
    /// Seconds after `now` the source starts sounding
    pub delay: f64,
    /// Position within the source content to start from (cue-in applied)
    pub source_offset: f64,
    /// Seconds of content to play
    pub duration: f64,
    /// Window start relative to the track origin; negative when the window
    /// starts before the track
    pub relative_position: f64,
    /// Fade automation, ordered by start
    pub envelopes: Vec<EnvelopeSegment>,
    pub gain: f32,
    pub master_gain: f32,
}

impl PlaybackPlan {
    /// Absolute instant the source starts
    pub fn start_at(&self) -> f64 {
        self.now + self.delay
    }
}

/// One fade resolved against the playback cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSegment {
    pub kind: FadeKind,
    pub shape: FadeShape,
    /// Seconds from `now` the fade begins. Negative when the cursor is
    /// already inside the fade.
    pub start: f64,
    /// Full nominal length of the fade
    pub length: f64,
}

impl EnvelopeSegment {
    /// Absolute instant the fade (nominally) begins
    pub fn start_at(&self, now: f64) -> f64 {
        now + self.start
    }

    /// How much of the fade has already passed at `now`
    pub fn elapsed(&self) -> f64 {
        (-self.start).max(0.0)
    }

    /// Length still to be heard after `now`
    pub fn remaining(&self) -> f64 {
        self.length - self.elapsed()
    }
}
