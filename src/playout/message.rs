use rtrb::Consumer;

use super::Completion;
use crate::timeline::{FadeKind, FadeShape};

/// Control messages from a [`BufferPlayout`](super::buffer::BufferPlayout)
/// to its voice. All times are absolute seconds on the voice clock.
#[derive(Debug, Clone)]
pub enum PlayoutMessage {
    SetUpSource { completion: Completion },
    Play { at: f64, offset: f64, duration: f64 },
    Stop { at: f64 },
    Gain(f32),
    MasterGain(f32),
    Fade {
        kind: FadeKind,
        shape: FadeShape,
        start: f64,
        length: f64,
    },
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<PlayoutMessage>;
}

impl MessageReceiver for Consumer<PlayoutMessage> {
    fn pop(&mut self) -> Option<PlayoutMessage> {
        Consumer::pop(self).ok()
    }
}
