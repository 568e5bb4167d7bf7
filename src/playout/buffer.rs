//! Buffer-backed playout: renders a track's in-memory source on the audio
//! thread.
//!
//! [`BufferPlayout::new`] returns a control handle and a [`PlayoutVoice`].
//! The handle implements [`Playout`] and lives on the control thread; it
//! only pushes messages into a ring buffer. The voice drains that buffer at
//! the top of every block and renders. The voice never allocates or locks
//! while rendering: fades per source are capped at [`MAX_FADES`], the size
//! the voice reserves up front.
//!
//! If the queue is full, the message is dropped and the current source is
//! abandoned: its [`Completion`] resolves right away and the voice retires
//! it at the next block. A handle therefore never hangs on a lost `Play`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::warn;
use rtrb::{Consumer, Producer, RingBuffer};

use super::curve::fade_factor;
use super::message::{MessageReceiver, PlayoutMessage};
use super::{Completion, Playout};
use crate::config::PlayoutConfig;
use crate::timeline::{FadeKind, FadeShape};

/// Fades kept per source; further ones are ignored
pub const MAX_FADES: usize = 64;

/// Room for a full source setup (fades, gains, play, stop) several times over
const PLAYOUT_QUEUE_SIZE: usize = 4 * (MAX_FADES + 4);

/// State the voice publishes for the control side
struct Shared {
    /// Frames rendered so far
    clock: AtomicU64,
}

/// Control-thread half of a buffer playout
pub struct BufferPlayout {
    tx: Producer<PlayoutMessage>,
    shared: Arc<Shared>,
    config: PlayoutConfig,
    source_duration: f64,
    current: Option<Completion>,
    started: bool,
    /// Fades sent for the current source
    fades_sent: usize,
    /// A message for the current source was dropped
    abandoned: bool,
}

impl BufferPlayout {
    /// Create a playout over a mono `source` sampled at `config.sample_rate`
    pub fn new(source: Arc<[f32]>, config: PlayoutConfig) -> (Self, PlayoutVoice) {
        let (tx, rx) = RingBuffer::<PlayoutMessage>::new(PLAYOUT_QUEUE_SIZE);
        let shared = Arc::new(Shared {
            clock: AtomicU64::new(0),
        });
        let source_duration = config.frames_to_seconds(source.len() as u64);

        let voice = PlayoutVoice::new(source, config, rx, Arc::clone(&shared));
        let playout = Self {
            tx,
            shared,
            config,
            source_duration,
            current: None,
            started: false,
            fades_sent: 0,
            abandoned: false,
        };

        (playout, voice)
    }

    /// Current time on the voice clock, in seconds. Use this as `now` when
    /// scheduling.
    pub fn now(&self) -> f64 {
        self.config
            .frames_to_seconds(self.shared.clock.load(Ordering::Acquire))
    }

    /// Push a message for the current source. Once one is dropped the rest
    /// of that source's messages are skipped.
    fn send(&mut self, msg: PlayoutMessage) {
        if self.abandoned {
            return;
        }
        if let Err(err) = self.tx.push(msg) {
            warn!("playout queue full, abandoning source: {:?}", err);
            self.abandon();
        }
    }

    fn abandon(&mut self) {
        self.abandoned = true;
        self.started = false;
        if let Some(completion) = &self.current {
            completion.complete();
        }
    }

    fn send_fade(&mut self, kind: FadeKind, shape: FadeShape, start: f64, length: f64) {
        if self.fades_sent >= MAX_FADES {
            warn!("more than {} fades on one source, ignoring {:?}", MAX_FADES, kind);
            return;
        }
        self.fades_sent += 1;
        self.send(PlayoutMessage::Fade {
            kind,
            shape,
            start,
            length,
        });
    }
}

impl Playout for BufferPlayout {
    fn set_up_source(&mut self) -> Completion {
        let completion = Completion::pending();
        self.current = Some(completion.clone());
        self.started = false;
        self.fades_sent = 0;
        self.abandoned = false;
        self.send(PlayoutMessage::SetUpSource {
            completion: completion.clone(),
        });
        completion
    }

    fn play(&mut self, at: f64, offset: f64, duration: f64) {
        if self.abandoned {
            return;
        }
        self.started = true;
        self.send(PlayoutMessage::Play {
            at,
            offset,
            duration,
        });
    }

    fn stop(&mut self, when: f64) {
        if !self.is_playing() {
            return;
        }
        let at = self.now() + when.max(0.0);
        self.send(PlayoutMessage::Stop { at });
    }

    fn set_gain_level(&mut self, level: f32) {
        self.send(PlayoutMessage::Gain(level));
    }

    fn set_master_gain_level(&mut self, level: f32) {
        self.send(PlayoutMessage::MasterGain(level));
    }

    fn apply_fade_in(&mut self, start: f64, length: f64, shape: FadeShape) {
        self.send_fade(FadeKind::FadeIn, shape, start, length);
    }

    fn apply_fade_out(&mut self, start: f64, length: f64, shape: FadeShape) {
        self.send_fade(FadeKind::FadeOut, shape, start, length);
    }

    fn is_playing(&self) -> bool {
        self.started
            && self
                .current
                .as_ref()
                .is_some_and(|completion| !completion.is_complete())
    }

    fn duration(&self) -> f64 {
        self.source_duration
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start_frame: u64,
    offset_frame: u64,
    end_frame: u64,
}

struct ActiveSource {
    completion: Completion,
    span: Option<Span>,
    stop_frame: Option<u64>,
}

impl ActiveSource {
    /// Frame at which this source is done, if known yet
    fn end_frame(&self) -> Option<u64> {
        match (self.span, self.stop_frame) {
            (Some(span), Some(stop)) => Some(span.end_frame.min(stop)),
            (Some(span), None) => Some(span.end_frame),
            (None, stop) => stop,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScheduledFade {
    kind: FadeKind,
    shape: FadeShape,
    start: f64,
    length: f64,
}

/// Audio-thread half of a buffer playout
pub struct PlayoutVoice<R: MessageReceiver = Consumer<PlayoutMessage>> {
    source: Arc<[f32]>,
    sample_rate: f32,
    rx: R,
    shared: Arc<Shared>,
    clock: u64,
    gain: f32,
    master_gain: f32,
    active: Option<ActiveSource>,
    fades: Vec<ScheduledFade>,
}

impl<R: MessageReceiver> PlayoutVoice<R> {
    fn new(source: Arc<[f32]>, config: PlayoutConfig, rx: R, shared: Arc<Shared>) -> Self {
        Self {
            source,
            sample_rate: config.sample_rate,
            rx,
            shared,
            clock: 0,
            gain: 1.0,
            master_gain: 1.0,
            active: None,
            fades: Vec::with_capacity(MAX_FADES),
        }
    }

    /// Render the next block. Silence is written wherever the source is not
    /// sounding.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Some(msg) = self.rx.pop() {
            self.handle(msg);
        }
        self.retire_abandoned();

        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.sample_at(self.clock + i as u64);
        }

        self.clock += out.len() as u64;
        self.shared.clock.store(self.clock, Ordering::Release);
        self.retire_finished();
    }

    /// Voice clock in seconds
    pub fn clock(&self) -> f64 {
        self.clock as f64 / self.sample_rate as f64
    }

    /// Whether a source is set up and not yet finished
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    fn frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64).round() as u64
    }

    fn handle(&mut self, msg: PlayoutMessage) {
        match msg {
            PlayoutMessage::SetUpSource { completion } => {
                // A new source replaces the old one along with its automation
                if let Some(previous) = self.active.take() {
                    previous.completion.complete();
                }
                self.fades.clear();
                self.active = Some(ActiveSource {
                    completion,
                    span: None,
                    stop_frame: None,
                });
            }
            PlayoutMessage::Play {
                at,
                offset,
                duration,
            } => {
                // A late start skips the frames it missed, so content stays
                // aligned with its fades and still ends on time
                let requested = self.frames(at);
                let late = self.clock.saturating_sub(requested);
                let start_frame = requested.max(self.clock);
                let offset_frame = self.frames(offset) + late;
                let end_frame = (requested + self.frames(duration)).max(start_frame);
                if let Some(active) = self.active.as_mut() {
                    active.span = Some(Span {
                        start_frame,
                        offset_frame,
                        end_frame,
                    });
                }
            }
            PlayoutMessage::Stop { at } => {
                let stop_frame = self.frames(at).max(self.clock);
                if let Some(active) = self.active.as_mut() {
                    active.stop_frame = Some(stop_frame);
                }
            }
            PlayoutMessage::Gain(level) => self.gain = level,
            PlayoutMessage::MasterGain(level) => self.master_gain = level,
            PlayoutMessage::Fade {
                kind,
                shape,
                start,
                length,
            } => {
                if self.fades.len() == MAX_FADES {
                    return;
                }
                self.fades.push(ScheduledFade {
                    kind,
                    shape,
                    start,
                    length,
                });
            }
        }
    }

    fn sample_at(&self, frame: u64) -> f32 {
        let Some(active) = &self.active else {
            return 0.0;
        };
        let Some(span) = active.span else {
            return 0.0;
        };
        if frame < span.start_frame || frame >= span.end_frame {
            return 0.0;
        }
        if active.stop_frame.is_some_and(|stop| frame >= stop) {
            return 0.0;
        }

        let index = span.offset_frame + (frame - span.start_frame);
        let Some(&sample) = self.source.get(index as usize) else {
            return 0.0;
        };

        let t = frame as f64 / self.sample_rate as f64;
        sample * self.gain * self.master_gain * self.envelope_at(t)
    }

    /// Overlapping fades multiply
    fn envelope_at(&self, t: f64) -> f32 {
        self.fades
            .iter()
            .map(|fade| fade_factor(fade.kind, fade.shape, fade.start, fade.length, t))
            .product()
    }

    /// Drop a source the control side already gave up on
    fn retire_abandoned(&mut self) {
        if self
            .active
            .as_ref()
            .is_some_and(|active| active.completion.is_complete())
        {
            self.active = None;
            self.fades.clear();
        }
    }

    fn retire_finished(&mut self) {
        let finished = self
            .active
            .as_ref()
            .and_then(ActiveSource::end_frame)
            .is_some_and(|end| self.clock >= end);

        if finished {
            if let Some(active) = self.active.take() {
                active.completion.complete();
            }
            self.fades.clear();
        }
    }
}
