#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system folding round events into a report.
//!
//! The engine observes itself through its event stream rather than a
//! logging facade; this system consumes that stream and accumulates the
//! per-round figures adapters display after the final score.

use std::time::Duration;

use bead_hunt_core::{BeadKind, Event, RoundOutcome};

/// Aggregated figures describing one played round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundReport {
    /// Cycle completions observed across all beads.
    pub cycles_completed: u32,
    /// Stars consumed by elapsed laps and wrong guesses combined.
    pub stars_consumed: u32,
    /// Stars restored by the same-instant win rule.
    pub stars_restored: u32,
    /// Decoy selections made by the player.
    pub wrong_guesses: u32,
    /// Simulated time the round ran for.
    pub elapsed: Duration,
    /// Terminal outcome once the round ended.
    pub outcome: Option<RoundOutcome>,
}

/// Pure system that accumulates a [`RoundReport`] from broadcast events.
#[derive(Clone, Copy, Debug, Default)]
pub struct RoundAnalytics {
    report: RoundReport,
}

impl RoundAnalytics {
    /// Creates an analytics system with an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a batch of round events, updating the report.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.report.elapsed = self.report.elapsed.saturating_add(*dt);
                }
                Event::CycleCompleted { .. } => {
                    self.report.cycles_completed += 1;
                }
                Event::StarConsumed { .. } => {
                    self.report.stars_consumed += 1;
                }
                Event::StarRestored { .. } => {
                    self.report.stars_restored += 1;
                }
                Event::BeadSelected {
                    kind: BeadKind::Decoy,
                    ..
                } => {
                    self.report.wrong_guesses += 1;
                }
                Event::RoundWon { score } => {
                    self.report.outcome = Some(RoundOutcome::Won { score: *score });
                }
                Event::RoundLost => {
                    self.report.outcome = Some(RoundOutcome::Lost);
                }
                _ => {}
            }
        }
    }

    /// The report accumulated so far.
    #[must_use]
    pub fn report(&self) -> &RoundReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bead_hunt_core::BeadId;

    #[test]
    fn events_fold_into_the_expected_report() {
        let mut analytics = RoundAnalytics::new();
        analytics.handle(&[
            Event::RoundStarted,
            Event::TimeAdvanced {
                dt: Duration::from_millis(700),
            },
            Event::BeadSelected {
                bead: BeadId::new(2),
                kind: BeadKind::Decoy,
            },
            Event::DecoyHidden {
                bead: BeadId::new(2),
            },
            Event::StarConsumed { remaining: 4 },
            Event::TimeAdvanced {
                dt: Duration::from_millis(2_400),
            },
            Event::CycleCompleted {
                bead: BeadId::new(0),
                iteration: 0,
                playback_rate: 1.0,
            },
            Event::StarConsumed { remaining: 3 },
            Event::BeadSelected {
                bead: BeadId::new(0),
                kind: BeadKind::Target,
            },
            Event::StarRestored { remaining: 4 },
            Event::RoundWon { score: 4 },
            Event::BeadsRevealed,
        ]);

        let report = analytics.report();
        assert_eq!(report.cycles_completed, 1);
        assert_eq!(report.stars_consumed, 2);
        assert_eq!(report.stars_restored, 1);
        assert_eq!(report.wrong_guesses, 1);
        assert_eq!(report.elapsed, Duration::from_millis(3_100));
        assert_eq!(report.outcome, Some(RoundOutcome::Won { score: 4 }));
    }

    #[test]
    fn a_loss_is_reported_without_a_score() {
        let mut analytics = RoundAnalytics::new();
        analytics.handle(&[Event::StarConsumed { remaining: 0 }, Event::RoundLost]);
        let report = analytics.report();
        assert_eq!(report.outcome, Some(RoundOutcome::Lost));
        assert_eq!(report.outcome.and_then(|outcome| outcome.score()), None);
    }
}
