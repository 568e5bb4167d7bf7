//! Playback scheduling: resolve a track against a playback window.

/*
Window Resolution
=================

Every track is scheduled on its own against the same playback window. The
result says whether the track sounds at all and, if so, when it starts,
where in the source content it starts and for how long.

Vocabulary
----------

  window        The requested interval on the shared timeline. Its end is
                optional; an unbounded window plays every track out.

  placement     Where the track sits on the timeline (start_time..end_time).

  duration      The trimmed content length (cue_out - cue_in). This is the
                authority for how much audio there is, even if it differs
                from the placement length.

  relative      The window start measured from the track's origin:
  position          relative_position = window.start - track.start_time
                Negative when the window starts before the track.


The Two Branches
----------------

Track starts at or after the window start:

    window  |=========================|
    track          |~~~~~~~~~~~~|
            ^------^
             delay = start_time - window.start, offset = 0

Track starts before the window start:

    window         |==================|
    track   |~~~~~~~~~~~~~~|
            ^------^
             offset = window.start - start_time, delay = 0

With a bounded window the duration is clamped so playback never runs past
the window end, and never past the content either. The content offset is
finally shifted by cue_in to address the source itself.


Envelope Resolution
-------------------

Fades are expressed relative to the track origin, so they are compared
against the relative position:

    fade ahead of cursor      cursor inside fade        fade behind cursor
    rel  |                    |----rel----|             |------| rel
         |   |--fade--|       |--fade--|                |-fade-|
         start = s - rel      start = -(rel - s)        skipped

A fade the cursor is already inside keeps its full nominal length; its
start lies in the past, so whoever applies it must evaluate the curve at
the elapsed position instead of replaying it from zero.
*/

pub mod plan;
pub mod window;

use log::{debug, trace};

pub use plan::{EnvelopeSegment, PlaybackPlan, Schedule};
pub use window::PlaybackWindow;

use crate::timeline::{FadeMap, TrackSnapshot};

/// Schedule one track against a playback window.
///
/// `now` is the reference instant all delays in the resulting plan are
/// measured from. Pure and total: every input yields either
/// [`Schedule::Silent`] or a complete plan.
pub fn schedule_play(
    track: &TrackSnapshot,
    now: f64,
    window: &PlaybackWindow,
    master_gain: f32,
) -> Schedule {
    let window_start = window.start();
    let segment = window.segment_length();

    // Track has ended before the window starts
    if track.end_time <= window_start {
        debug!(
            "track ends at {}s, before window start {}s: silent",
            track.end_time, window_start
        );
        return Schedule::Silent;
    }

    // Bounded window ends before the track begins
    if let Some(segment) = segment {
        if window_start + segment < track.start_time {
            debug!(
                "window ends at {}s, before track start {}s: silent",
                window_start + segment,
                track.start_time
            );
            return Schedule::Silent;
        }
    }

    let (delay, offset, duration) = if track.start_time >= window_start {
        let delay = track.start_time - window_start;
        let duration = match segment {
            Some(segment) => (segment - delay).min(track.duration),
            None => track.duration,
        };
        (delay, 0.0, duration)
    } else {
        let offset = window_start - track.start_time;
        let remaining = track.duration - offset;
        let duration = match segment {
            Some(segment) => segment.min(remaining),
            None => remaining,
        };
        (0.0, offset, duration)
    };

    // Placement may outlast the trimmed content
    let duration = duration.max(0.0);
    let source_offset = offset + track.cue_in;
    let relative_position = window_start - track.start_time;
    let envelopes = resolve_envelopes(&track.fades, relative_position);

    debug!(
        "scheduled: delay {}s, source offset {}s, duration {}s, {} envelope(s)",
        delay,
        source_offset,
        duration,
        envelopes.len()
    );

    Schedule::Play(PlaybackPlan {
        now,
        delay,
        source_offset,
        duration,
        relative_position,
        envelopes,
        gain: track.gain,
        master_gain,
    })
}

/// Resolve fades against a cursor position relative to the track origin.
///
/// Fades entirely behind the cursor (`end <= relative_position`) are
/// dropped. The rest come back ordered by start.
pub fn resolve_envelopes(fades: &FadeMap, relative_position: f64) -> Vec<EnvelopeSegment> {
    let mut segments: Vec<EnvelopeSegment> = fades
        .values()
        .filter(|fade| relative_position < fade.end)
        .map(|fade| {
            // Before the fade: starts in the future. Inside: started in the past.
            let start = if relative_position <= fade.start {
                fade.start - relative_position
            } else {
                -(relative_position - fade.start)
            };
            let segment = EnvelopeSegment {
                kind: fade.kind,
                shape: fade.shape,
                start,
                length: fade.length(),
            };
            trace!("{:?} envelope: start {}s, length {}s", fade.kind, start, segment.length);
            segment
        })
        .collect();

    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
    segments
}
