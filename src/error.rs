use thiserror::Error;

/// Errors raised when a track, fade or playback window would violate its
/// invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    /// Placement must satisfy `end > start`
    #[error("invalid placement: end {end}s must be after start {start}s")]
    InvalidPlacement { start: f64, end: f64 },
    /// Trim must satisfy `0 <= cue_in < cue_out <= source_duration`
    #[error("invalid cue points: need 0 <= cue_in ({cue_in}s) < cue_out ({cue_out}s) <= source duration ({source_duration}s)")]
    InvalidCue {
        cue_in: f64,
        cue_out: f64,
        source_duration: f64,
    },
    /// Fade bounds must satisfy `0 <= start < end`
    #[error("invalid fade: need 0 <= start ({start}s) < end ({end}s)")]
    InvalidFade { start: f64, end: f64 },
    /// A bounded window must not end before it starts
    #[error("invalid playback window: end {end}s is before start {start}s")]
    InvalidWindow { start: f64, end: f64 },
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// Reject NaN and infinities before they reach interval arithmetic.
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> Result<f64, TrackError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TrackError::NonFinite(what))
    }
}
