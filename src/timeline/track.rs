//! Track - one placed clip on the shared timeline
//!
//! A track knows where it sits on the master timeline (`start_time` /
//! `end_time`), which part of its source content is playable (`cue_in` /
//! `cue_out`), its gain and its fades. Placement and trim are kept
//! independently: `duration()` (trim-derived) is the content length, the
//! placement is the timeline window. Neither is rewritten when the other
//! changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fade::{Fade, FadeId, FadeKind, FadeMap, FadeShape};
use super::peaks::Peaks;
use super::states::{EnabledStates, Interaction};
use crate::error::{ensure_finite, TrackError};

/// Stable identity of a track for its whole life.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(Uuid);

/// A placed, independently playable clip
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "camelCase", try_from = "TrackRecord")
)]
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    /// Display name
    name: String,
    /// Placement on the master timeline, in seconds
    start_time: f64,
    end_time: f64,
    /// Trim region within the source content, in seconds
    cue_in: f64,
    cue_out: f64,
    /// Length of the underlying source content
    source_duration: f64,
    /// Linear amplitude multiplier
    gain: f32,
    fades: FadeMap,
    enabled_states: EnabledStates,
    #[cfg_attr(feature = "serde", serde(skip))]
    peaks: Option<Peaks>,
}

impl Track {
    /// Start building a track over source content of `source_duration` seconds
    pub fn builder(source_duration: f64) -> TrackBuilder {
        TrackBuilder::new(source_duration)
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn cue_in(&self) -> f64 {
        self.cue_in
    }

    pub fn cue_out(&self) -> f64 {
        self.cue_out
    }

    pub fn source_duration(&self) -> f64 {
        self.source_duration
    }

    /// Playable content length (`cue_out - cue_in`)
    pub fn duration(&self) -> f64 {
        self.cue_out - self.cue_in
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Store a new gain. Only affects scheduling calls made afterwards.
    pub fn set_gain(&mut self, gain: f32) -> Result<(), TrackError> {
        validate_gain(gain)?;
        self.gain = gain;
        Ok(())
    }

    /// Reposition on the timeline, keeping the placement length
    pub fn move_to(&mut self, start_time: f64) -> Result<(), TrackError> {
        let length = self.end_time - self.start_time;
        self.set_placement(start_time, start_time + length)
    }

    /// Replace the placement window. Cue points are left untouched.
    pub fn set_placement(&mut self, start_time: f64, end_time: f64) -> Result<(), TrackError> {
        validate_placement(start_time, end_time)?;
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Move the trim points. The placement is left untouched.
    pub fn trim(&mut self, cue_in: f64, cue_out: f64) -> Result<(), TrackError> {
        validate_cue(cue_in, cue_out, self.source_duration)?;
        self.cue_in = cue_in;
        self.cue_out = cue_out;
        Ok(())
    }

    /// Attach peak data for the renderer
    pub fn set_peaks(&mut self, peaks: Peaks) {
        self.peaks = Some(peaks);
    }

    pub fn peaks(&self) -> Option<&Peaks> {
        self.peaks.as_ref()
    }

    /// Number of peak entries per channel, if peaks are attached
    pub fn peak_length(&self) -> Option<usize> {
        self.peaks.as_ref().map(Peaks::len)
    }

    /// Store a new fade and return its freshly allocated id.
    ///
    /// Overlapping fades, including ones of the same kind, are accepted and
    /// all of them are scheduled.
    pub fn save_fade(
        &mut self,
        kind: FadeKind,
        shape: FadeShape,
        start: f64,
        end: f64,
    ) -> Result<FadeId, TrackError> {
        let fade = Fade::new(kind, shape, start, end)?;
        let id = FadeId::generate();
        Arc::make_mut(&mut self.fades).insert(id, fade);
        Ok(id)
    }

    /// Remove a fade by id. Unknown ids are ignored.
    pub fn remove_fade(&mut self, id: FadeId) {
        if !self.fades.contains_key(&id) {
            return;
        }
        Arc::make_mut(&mut self.fades).remove(&id);
        debug!("track {:?}: removed fade {}", self.name, id);
    }

    /// Remove every fade of the given kind
    pub fn remove_fade_type(&mut self, kind: FadeKind) {
        if !self.fades.values().any(|fade| fade.kind == kind) {
            return;
        }
        Arc::make_mut(&mut self.fades).retain(|_, fade| fade.kind != kind);
        debug!("track {:?}: removed all {:?} fades", self.name, kind);
    }

    pub fn fade(&self, id: FadeId) -> Option<&Fade> {
        self.fades.get(&id)
    }

    pub fn fades(&self) -> impl Iterator<Item = (FadeId, &Fade)> {
        self.fades.iter().map(|(id, fade)| (*id, fade))
    }

    pub fn fade_count(&self) -> usize {
        self.fades.len()
    }

    pub fn enabled_states(&self) -> &EnabledStates {
        &self.enabled_states
    }

    pub fn is_enabled(&self, interaction: Interaction) -> bool {
        self.enabled_states.is_enabled(interaction)
    }

    pub fn set_enabled(&mut self, interaction: Interaction, enabled: bool) {
        self.enabled_states.set_enabled(interaction, enabled);
    }

    /// Capture the fields scheduling needs. The fade set is shared, not
    /// copied; later edits to this track do not show up in the snapshot.
    pub fn snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            start_time: self.start_time,
            end_time: self.end_time,
            cue_in: self.cue_in,
            duration: self.duration(),
            gain: self.gain,
            fades: Arc::clone(&self.fades),
        }
    }

    /// Re-check every invariant, e.g. after loading a persisted track
    pub fn validate(&self) -> Result<(), TrackError> {
        validate_placement(self.start_time, self.end_time)?;
        validate_cue(self.cue_in, self.cue_out, self.source_duration)?;
        validate_gain(self.gain)?;
        self.fades.values().try_for_each(Fade::validate)
    }
}

/// Persisted form of a [`Track`]. Loading goes through [`Track::validate`],
/// so a saved record can never produce a track the builder would refuse.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRecord {
    id: TrackId,
    name: String,
    start_time: f64,
    end_time: f64,
    cue_in: f64,
    cue_out: f64,
    source_duration: f64,
    gain: f32,
    fades: BTreeMap<FadeId, Fade>,
    #[serde(default)]
    enabled_states: EnabledStates,
}

#[cfg(feature = "serde")]
impl TryFrom<TrackRecord> for Track {
    type Error = TrackError;

    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        let track = Track {
            id: record.id,
            name: record.name,
            start_time: record.start_time,
            end_time: record.end_time,
            cue_in: record.cue_in,
            cue_out: record.cue_out,
            source_duration: record.source_duration,
            gain: record.gain,
            fades: Arc::new(record.fades),
            enabled_states: record.enabled_states,
            peaks: None,
        };
        track.validate()?;
        Ok(track)
    }
}

/// Immutable view of a track used for one scheduling pass
#[derive(Debug, Clone)]
pub struct TrackSnapshot {
    pub start_time: f64,
    pub end_time: f64,
    pub cue_in: f64,
    /// Trim-derived content length
    pub duration: f64,
    pub gain: f32,
    pub fades: FadeMap,
}

impl From<&Track> for TrackSnapshot {
    fn from(track: &Track) -> Self {
        track.snapshot()
    }
}

fn validate_placement(start_time: f64, end_time: f64) -> Result<(), TrackError> {
    ensure_finite(start_time, "start time")?;
    ensure_finite(end_time, "end time")?;
    if end_time <= start_time {
        return Err(TrackError::InvalidPlacement {
            start: start_time,
            end: end_time,
        });
    }
    Ok(())
}

fn validate_gain(gain: f32) -> Result<(), TrackError> {
    ensure_finite(f64::from(gain), "gain").map(|_| ())
}

fn validate_cue(cue_in: f64, cue_out: f64, source_duration: f64) -> Result<(), TrackError> {
    ensure_finite(cue_in, "cue in")?;
    ensure_finite(cue_out, "cue out")?;
    ensure_finite(source_duration, "source duration")?;
    if cue_in < 0.0 || cue_out <= cue_in || cue_out > source_duration {
        return Err(TrackError::InvalidCue {
            cue_in,
            cue_out,
            source_duration,
        });
    }
    Ok(())
}

/// Builder for constructing tracks with a fluent API
pub struct TrackBuilder {
    name: String,
    source_duration: f64,
    start_time: Option<f64>,
    end_time: Option<f64>,
    cue_in: Option<f64>,
    cue_out: Option<f64>,
    gain: f32,
    fades: Vec<Fade>,
    enabled_states: EnabledStates,
}

impl TrackBuilder {
    fn new(source_duration: f64) -> Self {
        Self {
            name: "Untitled".to_string(),
            source_duration,
            start_time: None,
            end_time: None,
            cue_in: None,
            cue_out: None,
            gain: 1.0,
            fades: Vec::new(),
            enabled_states: EnabledStates::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Timeline start (default: 0)
    pub fn start(mut self, start_time: f64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Timeline end (default: start + source duration)
    pub fn end(mut self, end_time: f64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Trim start within the source (default: 0)
    pub fn cue_in(mut self, cue_in: f64) -> Self {
        self.cue_in = Some(cue_in);
        self
    }

    /// Trim end within the source (default: source duration)
    pub fn cue_out(mut self, cue_out: f64) -> Self {
        self.cue_out = Some(cue_out);
        self
    }

    pub fn gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Add a fade; it receives an id when the track is built
    pub fn fade(mut self, fade: Fade) -> Self {
        self.fades.push(fade);
        self
    }

    pub fn disable(mut self, interaction: Interaction) -> Self {
        self.enabled_states.set_enabled(interaction, false);
        self
    }

    /// Validate every invariant and build the track
    pub fn build(self) -> Result<Track, TrackError> {
        let start_time = self.start_time.unwrap_or(0.0);
        let end_time = self
            .end_time
            .unwrap_or(start_time + self.source_duration);
        let cue_in = self.cue_in.unwrap_or(0.0);
        let cue_out = self.cue_out.unwrap_or(self.source_duration);

        validate_placement(start_time, end_time)?;
        validate_cue(cue_in, cue_out, self.source_duration)?;
        validate_gain(self.gain)?;

        let mut fades = BTreeMap::new();
        for fade in self.fades {
            fade.validate()?;
            fades.insert(FadeId::generate(), fade);
        }

        Ok(Track {
            id: TrackId(Uuid::new_v4()),
            name: self.name,
            start_time,
            end_time,
            cue_in,
            cue_out,
            source_duration: self.source_duration,
            gain: self.gain,
            fades: Arc::new(fades),
            enabled_states: self.enabled_states,
            peaks: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::peaks::ChannelPeaks;

    fn clip() -> Track {
        Track::builder(10.0)
            .name("clip")
            .start(5.0)
            .end(15.0)
            .build()
            .unwrap()
    }

    #[test]
    fn defaults_follow_source_duration() {
        let track = Track::builder(8.0).build().unwrap();

        assert_eq!(track.name(), "Untitled");
        assert_eq!(track.start_time(), 0.0);
        assert_eq!(track.end_time(), 8.0);
        assert_eq!(track.cue_in(), 0.0);
        assert_eq!(track.cue_out(), 8.0);
        assert_eq!(track.duration(), 8.0);
        assert_eq!(track.gain(), 1.0);
        assert!(track.is_enabled(Interaction::Record));
    }

    #[test]
    fn end_defaults_relative_to_start() {
        let track = Track::builder(4.0).start(3.0).build().unwrap();
        assert_eq!(track.end_time(), 7.0);
    }

    #[test]
    fn rejects_inverted_placement() {
        let result = Track::builder(10.0).start(5.0).end(5.0).build();
        assert!(matches!(result, Err(TrackError::InvalidPlacement { .. })));
    }

    #[test]
    fn rejects_bad_cue_points() {
        let result = Track::builder(10.0).cue_in(4.0).cue_out(2.0).build();
        assert!(matches!(result, Err(TrackError::InvalidCue { .. })));

        let result = Track::builder(10.0).cue_out(12.0).build();
        assert!(matches!(result, Err(TrackError::InvalidCue { .. })));

        let result = Track::builder(10.0).cue_in(-1.0).build();
        assert!(matches!(result, Err(TrackError::InvalidCue { .. })));
    }

    #[test]
    fn rejects_non_finite_gain() {
        let result = Track::builder(10.0).gain(f32::NAN).build();
        assert_eq!(result.err(), Some(TrackError::NonFinite("gain")));

        let mut track = clip();
        assert!(track.set_gain(f32::INFINITY).is_err());
        assert_eq!(track.gain(), 1.0);
        track.set_gain(-0.5).unwrap();
        assert_eq!(track.gain(), -0.5);
    }

    #[test]
    fn trim_does_not_touch_placement() {
        let mut track = clip();
        track.trim(2.0, 6.0).unwrap();

        assert_eq!(track.duration(), 4.0);
        assert_eq!(track.start_time(), 5.0);
        assert_eq!(track.end_time(), 15.0);
        assert!(track.trim(6.0, 11.0).is_err());
        assert_eq!(track.cue_in(), 2.0);
    }

    #[test]
    fn move_keeps_placement_length() {
        let mut track = clip();
        track.move_to(20.0).unwrap();
        assert_eq!(track.start_time(), 20.0);
        assert_eq!(track.end_time(), 30.0);
    }

    #[test]
    fn save_and_remove_fades() {
        let mut track = clip();
        let fade_in = track
            .save_fade(FadeKind::FadeIn, FadeShape::Linear, 0.0, 2.0)
            .unwrap();
        let fade_out = track
            .save_fade(FadeKind::FadeOut, FadeShape::Exponential, 8.0, 10.0)
            .unwrap();

        assert_ne!(fade_in, fade_out);
        assert_eq!(track.fade_count(), 2);
        assert_eq!(track.fade(fade_in).map(|f| f.kind), Some(FadeKind::FadeIn));

        track.remove_fade(fade_in);
        assert!(track.fade(fade_in).is_none());
        assert_eq!(track.fade_count(), 1);

        // Removing twice is a no-op
        track.remove_fade(fade_in);
        assert_eq!(track.fade_count(), 1);
    }

    #[test]
    fn overlapping_fades_are_kept() {
        let mut track = clip();
        track
            .save_fade(FadeKind::FadeIn, FadeShape::Linear, 0.0, 2.0)
            .unwrap();
        track
            .save_fade(FadeKind::FadeIn, FadeShape::SCurve, 1.0, 3.0)
            .unwrap();
        assert_eq!(track.fade_count(), 2);
    }

    #[test]
    fn remove_fade_type_only_touches_matching_kind() {
        let mut track = clip();
        track
            .save_fade(FadeKind::FadeIn, FadeShape::Linear, 0.0, 1.0)
            .unwrap();
        track
            .save_fade(FadeKind::FadeIn, FadeShape::Linear, 0.5, 1.5)
            .unwrap();
        let out = track
            .save_fade(FadeKind::FadeOut, FadeShape::Linear, 9.0, 10.0)
            .unwrap();

        track.remove_fade_type(FadeKind::FadeIn);

        assert_eq!(track.fade_count(), 1);
        assert!(track.fade(out).is_some());
    }

    #[test]
    fn remove_fade_type_without_matches_keeps_shared_snapshot() {
        let mut track = clip();
        track
            .save_fade(FadeKind::FadeIn, FadeShape::Linear, 0.0, 1.0)
            .unwrap();
        let before = track.snapshot();

        track.remove_fade_type(FadeKind::FadeOut);

        assert_eq!(track.fade_count(), 1);
        assert!(Arc::ptr_eq(&before.fades, &track.snapshot().fades));
    }

    #[test]
    fn snapshot_does_not_see_later_edits() {
        let mut track = clip();
        let snapshot = track.snapshot();
        track
            .save_fade(FadeKind::FadeOut, FadeShape::Linear, 8.0, 10.0)
            .unwrap();
        track.set_gain(0.25).unwrap();

        assert!(snapshot.fades.is_empty());
        assert_eq!(snapshot.gain, 1.0);
        assert_eq!(track.snapshot().fades.len(), 1);
    }

    #[test]
    fn builder_fades_get_ids() {
        let fade = Fade::new(FadeKind::FadeIn, FadeShape::Logarithmic, 0.0, 1.0).unwrap();
        let track = Track::builder(4.0).fade(fade).fade(fade).build().unwrap();
        assert_eq!(track.fade_count(), 2);
    }

    #[test]
    fn peaks_are_stored_untouched() {
        let mut track = clip();
        assert_eq!(track.peak_length(), None);

        track.set_peaks(Peaks::new(vec![ChannelPeaks {
            min_peaks: vec![-1.0, -0.5],
            max_peaks: vec![1.0, 0.5],
        }]));
        assert_eq!(track.peak_length(), Some(2));
    }
}
