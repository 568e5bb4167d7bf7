//! Fade definitions stored on a track.
//!
//! Fade positions are seconds relative to the track's own origin, not the
//! master timeline. A fade is identified by an opaque [`FadeId`] allocated
//! when it is saved; ids are never reused.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ensure_finite, TrackError};

/// Opaque handle to a fade owned by a track.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FadeId(Uuid);

impl FadeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FadeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Direction of a fade. Persisted as `"FadeIn"` / `"FadeOut"`; any other
/// tag fails to deserialize.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeKind {
    FadeIn,
    FadeOut,
}

/// Curve used when the fade is realized as gain automation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FadeShape {
    #[default]
    Linear,
    Exponential,
    Logarithmic,
    SCurve,
}

/// A time-bounded gain envelope relative to the track origin.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "FadeRecord"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: FadeKind,
    pub shape: FadeShape,
    /// Seconds from the track origin where the fade begins
    pub start: f64,
    /// Seconds from the track origin where the fade ends
    pub end: f64,
}

impl Fade {
    /// Create a fade, enforcing `0 <= start < end`.
    pub fn new(kind: FadeKind, shape: FadeShape, start: f64, end: f64) -> Result<Self, TrackError> {
        let fade = Self {
            kind,
            shape,
            start,
            end,
        };
        fade.validate()?;
        Ok(fade)
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        ensure_finite(self.start, "fade start")?;
        ensure_finite(self.end, "fade end")?;
        if self.start < 0.0 || self.end <= self.start {
            return Err(TrackError::InvalidFade {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Nominal length in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Persisted form of a [`Fade`], checked on load
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct FadeRecord {
    #[serde(rename = "type")]
    kind: FadeKind,
    shape: FadeShape,
    start: f64,
    end: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<FadeRecord> for Fade {
    type Error = TrackError;

    fn try_from(record: FadeRecord) -> Result<Self, Self::Error> {
        Fade::new(record.kind, record.shape, record.start, record.end)
    }
}

/// Copy-on-write fade collection.
///
/// Scheduling reads a cheap `Arc` clone of the map; edits go through
/// `Arc::make_mut`, so a snapshot taken before an edit never observes it.
pub type FadeMap = Arc<BTreeMap<FadeId, Fade>>;
