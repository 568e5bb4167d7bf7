use crate::error::{ensure_finite, TrackError};

/// Requested playback interval on the shared timeline, in seconds.
///
/// An unbounded window plays from `start` until each track runs out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackWindow {
    start: f64,
    end: Option<f64>,
}

impl PlaybackWindow {
    /// Play from `start` with no end bound
    pub fn starting_at(start: f64) -> Result<Self, TrackError> {
        ensure_finite(start, "window start")?;
        Ok(Self { start, end: None })
    }

    /// Play the interval `start..end`. An empty interval is allowed.
    pub fn between(start: f64, end: f64) -> Result<Self, TrackError> {
        ensure_finite(start, "window start")?;
        ensure_finite(end, "window end")?;
        if end < start {
            return Err(TrackError::InvalidWindow { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    pub fn is_bounded(&self) -> bool {
        self.end.is_some()
    }

    /// Length of a bounded window (`end - start`)
    pub fn segment_length(&self) -> Option<f64> {
        self.end.map(|end| end - self.start)
    }
}
