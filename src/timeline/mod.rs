//! Track timeline model: placement, trim, gain, fades and interaction
//! permissions. Pure data plus invariants; no scheduling happens here.

pub mod fade;
pub mod peaks;
pub mod states;
pub mod track;

pub use fade::{Fade, FadeId, FadeKind, FadeMap, FadeShape};
pub use peaks::{ChannelPeaks, Peaks};
pub use states::{EnabledStates, Interaction};
pub use track::{Track, TrackBuilder, TrackId, TrackSnapshot};
