//! Fade curve shapes.

/*
Fade Curves
===========

A fade is a gain ramp between silence and full level. The shape decides how
the gain moves between the two ends.

Vocabulary
----------

  progress    How far through the fade we are, 0.0 (start) to 1.0 (end).

  factor      The gain multiplier at that progress, 0.0 to 1.0.

  mirror      A fade-out is the fade-in read backwards:
                  fade_out(p) = fade_in(1 - p)


The Shapes (fade-in direction)
------------------------------

  Linear        f(p) = p
                Equal steps in amplitude. Sounds like it rushes at the end
                because loudness perception is logarithmic.

  Exponential   f(p) = (100^p - 1) / 99
                Starts very quiet and swells at the end (40 dB range).

  Logarithmic   f(p) = ln(1 + 10p) / ln(11)
                Jumps up quickly then settles. Useful for fast onsets that
                should not click.

  SCurve        f(p) = (sin(pi*p - pi/2) + 1) / 2
                Slow at both ends, fastest in the middle. The smoothest
                choice when a fade must be inaudible at its edges.

    1.0 ┤            ____...          Linear       ╱
        │        ..''                 Exponential  _╱
        │     .'                      Logarithmic  ╭─
        │   .'                        SCurve       _╱‾
        │  /
    0.0 ┼─'──────────────→ progress

Every shape is pinned to exactly 0.0 at p = 0 and 1.0 at p = 1, so fades of
different shapes can be stacked without level jumps at their edges.
*/

use std::f32::consts::{LN_10, PI};

use crate::timeline::{FadeKind, FadeShape};

impl FadeShape {
    /// Fade-in gain factor at `progress` (clamped to 0.0..=1.0)
    pub fn fade_in_at(self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        let factor = match self {
            FadeShape::Linear => p,
            FadeShape::Exponential => ((2.0 * LN_10 * p).exp() - 1.0) / 99.0,
            FadeShape::Logarithmic => (1.0 + 10.0 * p).ln() / 11.0_f32.ln(),
            FadeShape::SCurve => ((PI * p - PI / 2.0).sin() + 1.0) / 2.0,
        };
        factor.clamp(0.0, 1.0)
    }

    /// Gain factor for a fade of `kind` at `progress`
    pub fn gain_at(self, kind: FadeKind, progress: f32) -> f32 {
        match kind {
            FadeKind::FadeIn => self.fade_in_at(progress),
            FadeKind::FadeOut => self.fade_in_at(1.0 - progress.clamp(0.0, 1.0)),
        }
    }
}

/// Gain factor of a fade at absolute time `t`.
///
/// Before a fade-in starts its factor is 0, after it ends 1; a fade-out is
/// 1 before and 0 after. A fade whose start is in the past is evaluated at
/// the elapsed position.
pub fn fade_factor(kind: FadeKind, shape: FadeShape, start: f64, length: f64, t: f64) -> f32 {
    let progress = if length <= 0.0 {
        if t < start {
            0.0
        } else {
            1.0
        }
    } else {
        ((t - start) / length).clamp(0.0, 1.0) as f32
    };
    shape.gain_at(kind, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SHAPES: [FadeShape; 4] = [
        FadeShape::Linear,
        FadeShape::Exponential,
        FadeShape::Logarithmic,
        FadeShape::SCurve,
    ];

    #[test]
    fn every_shape_is_pinned_at_its_ends() {
        for shape in SHAPES {
            assert_abs_diff_eq!(shape.fade_in_at(0.0), 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(shape.fade_in_at(1.0), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn fade_in_is_monotonic() {
        for shape in SHAPES {
            let mut last = 0.0;
            for step in 0..=100 {
                let factor = shape.fade_in_at(step as f32 / 100.0);
                assert!(factor + 1e-6 >= last, "{:?} dipped at step {}", shape, step);
                last = factor;
            }
        }
    }

    #[test]
    fn fade_out_mirrors_fade_in() {
        for shape in SHAPES {
            assert_abs_diff_eq!(
                shape.gain_at(FadeKind::FadeOut, 0.25),
                shape.gain_at(FadeKind::FadeIn, 0.75),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn shapes_differ_in_the_middle() {
        assert_abs_diff_eq!(FadeShape::Linear.fade_in_at(0.5), 0.5);
        assert_abs_diff_eq!(FadeShape::SCurve.fade_in_at(0.5), 0.5, epsilon = 1e-6);
        assert!(FadeShape::Exponential.fade_in_at(0.5) < 0.1);
        assert!(FadeShape::Logarithmic.fade_in_at(0.5) > 0.7);
    }

    #[test]
    fn factor_outside_the_fade() {
        let linear = FadeShape::Linear;
        assert_eq!(fade_factor(FadeKind::FadeIn, linear, 1.0, 2.0, 0.0), 0.0);
        assert_eq!(fade_factor(FadeKind::FadeIn, linear, 1.0, 2.0, 5.0), 1.0);
        assert_eq!(fade_factor(FadeKind::FadeOut, linear, 1.0, 2.0, 0.0), 1.0);
        assert_eq!(fade_factor(FadeKind::FadeOut, linear, 1.0, 2.0, 5.0), 0.0);
    }

    #[test]
    fn partially_elapsed_fade_resumes_mid_curve() {
        // Fade-out started 1s ago and lasts 2s: halfway through right now
        let factor = fade_factor(FadeKind::FadeOut, FadeShape::Linear, 99.0, 2.0, 100.0);
        assert_abs_diff_eq!(factor, 0.5);
    }
}
