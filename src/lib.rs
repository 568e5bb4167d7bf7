//! Timeline-relative playback scheduling for audio tracks.
//!
//! A [`Track`] holds a clip's placement on the shared timeline, its trim
//! region, gain and fades. [`schedule::schedule_play`] turns a track plus a
//! playback window into a [`Schedule`]: either silence, or a plan describing
//! the delay, source offset, duration and fade envelopes to realize. A
//! [`TrackPlayer`] hands that plan to any [`Playout`] backend.

pub mod config; // Sample rate and block size
pub mod error;
pub mod player; // Track + output collaborator
pub mod playout; // Output collaborator seam and a buffer-backed implementation
pub mod schedule; // Window resolution and envelope resolution
pub mod timeline; // Track timeline model

pub use config::PlayoutConfig;
pub use error::TrackError;
pub use player::TrackPlayer;
pub use playout::{Completion, Playout};
pub use schedule::{EnvelopeSegment, PlaybackPlan, PlaybackWindow, Schedule};
pub use timeline::{Fade, FadeId, FadeKind, FadeShape, Interaction, Track, TrackSnapshot};

pub const MAX_BLOCK_SIZE: usize = 2048;
