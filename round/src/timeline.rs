//! Per-bead repeating animation cycle, modelled as an explicit state machine.

use std::time::Duration;

use bead_hunt_core::{CyclePhase, Level, RoundTuning};

/// Record of one finished fade-in/traverse/fade-out lap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CycleCompletion {
    /// Zero-based index of the lap that just finished.
    pub(crate) iteration: u32,
    /// Playback rate the finished lap ran at.
    pub(crate) playback_rate: f64,
}

/// State machine driving one bead's repeating three-phase cycle.
///
/// `FadingIn -> Traversing -> FadingOut -> Resting -> (repeat slower)`,
/// until [`CycleTimeline::finalize`] detaches it permanently. Completing the
/// fade-out yields a [`CycleCompletion`], after which every phase duration is
/// divided by the new, smaller playback rate.
#[derive(Clone, Debug)]
pub(crate) struct CycleTimeline {
    phase: CyclePhase,
    elapsed: Duration,
    iteration: u32,
    playback_rate: f64,
    fade: Duration,
    traverse: Duration,
    rest: Duration,
    slowdown_factor: f64,
}

impl CycleTimeline {
    pub(crate) fn new(level: &Level, tuning: &RoundTuning) -> Self {
        let slowdown_factor = if tuning.slowdown_factor > 0.0 {
            tuning.slowdown_factor
        } else {
            1.0
        };
        Self {
            phase: CyclePhase::FadingIn,
            elapsed: Duration::ZERO,
            iteration: 0,
            playback_rate: 1.0,
            fade: tuning.fade,
            traverse: level.time_per_move() * level.num_moves(),
            rest: tuning.rest,
            slowdown_factor,
        }
    }

    pub(crate) const fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub(crate) const fn iteration(&self) -> u32 {
        self.iteration
    }

    pub(crate) const fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    /// Completed fraction of the current phase, clamped to `0.0..=1.0`.
    pub(crate) fn phase_progress(&self) -> f64 {
        let duration = self.phase_duration(self.phase);
        if duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Advances the timeline by `dt`, crossing as many phase boundaries as
    /// the delta covers and recording every completed lap in `out`.
    pub(crate) fn advance(&mut self, dt: Duration, out: &mut Vec<CycleCompletion>) {
        if self.phase == CyclePhase::Finalized {
            return;
        }
        let mut remaining = dt;
        loop {
            let duration = self.phase_duration(self.phase);
            let left = duration.saturating_sub(self.elapsed);
            if remaining < left {
                self.elapsed = self.elapsed.saturating_add(remaining);
                return;
            }
            remaining = remaining.saturating_sub(left);
            self.enter_next_phase(out);
        }
    }

    /// Detaches the timeline; all later advances are no-ops and no further
    /// completions are produced.
    pub(crate) fn finalize(&mut self) {
        self.phase = CyclePhase::Finalized;
        self.elapsed = Duration::ZERO;
    }

    fn enter_next_phase(&mut self, out: &mut Vec<CycleCompletion>) {
        self.elapsed = Duration::ZERO;
        self.phase = match self.phase {
            CyclePhase::FadingIn => CyclePhase::Traversing,
            CyclePhase::Traversing => CyclePhase::FadingOut,
            CyclePhase::FadingOut => {
                out.push(CycleCompletion {
                    iteration: self.iteration,
                    playback_rate: self.playback_rate,
                });
                self.iteration += 1;
                self.playback_rate *= self.slowdown_factor;
                CyclePhase::Resting
            }
            CyclePhase::Resting => CyclePhase::FadingIn,
            CyclePhase::Finalized => CyclePhase::Finalized,
        };
    }

    fn phase_duration(&self, phase: CyclePhase) -> Duration {
        // The slowdown stretches the three animation phases; the pause
        // between cycles stays constant.
        let base = match phase {
            CyclePhase::FadingIn | CyclePhase::FadingOut => self.fade,
            CyclePhase::Traversing => self.traverse,
            CyclePhase::Resting => return self.rest,
            CyclePhase::Finalized => return Duration::ZERO,
        };
        base.div_f64(self.playback_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_level() -> Level {
        Level::new(5, 3, 3, Duration::from_millis(400), 5).expect("valid level")
    }

    fn test_tuning() -> RoundTuning {
        RoundTuning {
            fade: Duration::from_millis(500),
            rest: Duration::from_millis(400),
            slowdown_factor: 0.5,
            total_stars: 5,
        }
    }

    #[test]
    fn phases_run_strictly_in_sequence() {
        let level = test_level();
        let tuning = test_tuning();
        let mut timeline = CycleTimeline::new(&level, &tuning);
        let mut completions = Vec::new();

        assert_eq!(timeline.phase(), CyclePhase::FadingIn);
        timeline.advance(Duration::from_millis(500), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::Traversing);
        timeline.advance(Duration::from_millis(1200), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::FadingOut);
        assert!(completions.is_empty());
        timeline.advance(Duration::from_millis(500), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::Resting);
        assert_eq!(
            completions,
            vec![CycleCompletion {
                iteration: 0,
                playback_rate: 1.0,
            }]
        );
    }

    #[test]
    fn slowdown_stretches_the_next_cycle() {
        let level = test_level();
        let tuning = test_tuning();
        let mut timeline = CycleTimeline::new(&level, &tuning);
        let mut completions = Vec::new();

        // One full lap plus the rest pause at rate 1.0.
        timeline.advance(Duration::from_millis(500 + 1200 + 500 + 400), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::FadingIn);
        assert_eq!(timeline.iteration(), 1);
        assert!((timeline.playback_rate() - 0.5).abs() < f64::EPSILON);

        // The fade now takes twice its base duration.
        timeline.advance(Duration::from_millis(500), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::FadingIn);
        timeline.advance(Duration::from_millis(500), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::Traversing);
    }

    #[test]
    fn one_large_delta_yields_every_crossed_completion() {
        let level = test_level();
        let mut tuning = test_tuning();
        tuning.slowdown_factor = 1.0;
        let mut timeline = CycleTimeline::new(&level, &tuning);
        let mut completions = Vec::new();

        // Two 2200 ms laps separated by the 400 ms rest.
        timeline.advance(Duration::from_millis(2200 + 400 + 2200), &mut completions);
        assert_eq!(completions.len(), 2);
        assert_eq!(completions[1].iteration, 1);
    }

    #[test]
    fn finalized_timelines_ignore_advances() {
        let level = test_level();
        let tuning = test_tuning();
        let mut timeline = CycleTimeline::new(&level, &tuning);
        let mut completions = Vec::new();

        timeline.finalize();
        timeline.advance(Duration::from_secs(60), &mut completions);
        assert_eq!(timeline.phase(), CyclePhase::Finalized);
        assert!(completions.is_empty());
    }
}
