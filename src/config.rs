//! Output configuration shared by playout backends.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_BLOCK_SIZE;

/// Rendering configuration for a playout backend.
///
/// The scheduler itself works purely in seconds; only backends that turn a
/// plan into samples care about the sample rate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayoutConfig {
    /// Samples per second
    pub sample_rate: f32,
    /// Largest block a voice is asked to render at once
    pub block_size: usize,
}

impl PlayoutConfig {
    pub fn new() -> Self {
        Self {
            sample_rate: 48_000.0,
            block_size: MAX_BLOCK_SIZE,
        }
    }

    /// Set the sample rate in Hz
    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the render block size, clamped to `1..=MAX_BLOCK_SIZE`
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    /// Convert seconds to a whole number of frames at this sample rate
    pub fn seconds_to_frames(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.sample_rate as f64).round() as u64
    }

    /// Convert frames to seconds at this sample rate
    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.sample_rate as f64
    }
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
